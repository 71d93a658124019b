use crate::browser;
use crate::config::SequenceConfig;
use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::hash::Hash;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// One observation of a section against the (margin-narrowed) viewport
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Visibility {
    pub intersecting: bool,
    pub ratio: f64,
}

/// unseen -> seen, once per section. Leaving the viewport changes nothing.
#[derive(Debug)]
pub struct RevealLatch<K> {
    threshold: f64,
    revealed: HashSet<K>,
}

impl<K: Eq + Hash> RevealLatch<K> {
    pub fn new(threshold: f64) -> Self {
        RevealLatch {
            threshold,
            revealed: HashSet::new(),
        }
    }

    /// True exactly once per section: the first time it is in view
    pub fn observe(&mut self, section: K, visibility: Visibility) -> bool {
        if !visibility.intersecting || visibility.ratio < self.threshold {
            return false;
        }
        self.revealed.insert(section)
    }

    pub fn is_revealed(&self, section: &K) -> bool {
        self.revealed.contains(section)
    }
}

/// Watches every element matching `section_selector` and adds
/// `visible_class` to it once it is sufficiently in view
pub fn watch_sections(config: &SequenceConfig) -> Result<IntersectionObserver> {
    let sections = browser::query_selector_all(&config.section_selector)?;
    let mut latch = RevealLatch::new(config.reveal_threshold);
    let visible_class = config.visible_class.clone();
    let tracked = sections.clone();

    let callback = browser::closure_wrap(Box::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let target = entry.target();
                let index = match tracked.iter().position(|section| *section == target) {
                    Some(index) => index,
                    None => continue,
                };
                let visibility = Visibility {
                    intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                };
                if latch.observe(index, visibility) {
                    reveal(&target, &visible_class, &observer);
                }
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    options.set_root_margin(&config.reveal_root_margin);

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(|err| anyhow!("Could not create IntersectionObserver : {:#?}", err))?;
    // the observer lives as long as the page
    callback.forget();

    for section in &sections {
        observer.observe(section);
    }

    Ok(observer)
}

fn reveal(section: &Element, class: &str, observer: &IntersectionObserver) {
    if let Err(err) = section.class_list().add_1(class) {
        warn!("Could not add class '{}' : {:#?}", class, err);
        return;
    }
    // latched, nothing left to watch for
    observer.unobserve(section);
}

//! Browser tests: `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use scroll_sequence::browser;
use scroll_sequence::config::SequenceConfig;
use scroll_sequence::engine::{self, CanvasSurface, FrameImage, ImageSource, Size, Surface};
use scroll_sequence::sequence::{ScrollMetrics, ScrollSequence, BACKGROUND};
use scroll_sequence::viewport;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

// 1x1 transparent gif
const PIXEL: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";
const MISSING: &str = "images/does-not-exist.jpg";

const ON_SCREEN: &str = "position:fixed;top:40%;left:40%;width:20%;height:20%";
const OFF_SCREEN: &str = "position:absolute;top:20000px;left:0;width:10px;height:10px";

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn new_canvas() -> HtmlCanvasElement {
    document()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap()
}

fn append_div(class: &str, style: &str) -> Element {
    let div = document().create_element("div").unwrap();
    div.set_class_name(class);
    div.set_attribute("style", style).unwrap();
    document().body().unwrap().append_child(&div).unwrap();
    div
}

/// Resolves after the callbacks already queued for the next repaint ran
async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn is_visible(element: &Element) -> bool {
    element.class_list().contains("visible")
}

#[wasm_bindgen_test]
fn partial_options_fall_back_to_defaults() {
    let options = js_sys::Object::new();
    js_sys::Reflect::set(&options, &"canvasId".into(), &"hero".into()).unwrap();
    js_sys::Reflect::set(&options, &"coalesceResize".into(), &JsValue::TRUE).unwrap();

    let config = SequenceConfig::from_js(options.into()).unwrap();

    assert_eq!(config.canvas_id, "hero");
    assert!(config.coalesce_resize);
    assert_eq!(config.loading_id, "loading");
    assert_eq!(config.reveal_threshold, 0.3);
}

#[wasm_bindgen_test]
fn undefined_options_are_defaults() {
    let config = SequenceConfig::from_js(JsValue::UNDEFINED).unwrap();
    assert_eq!(config, SequenceConfig::default());
}

#[wasm_bindgen_test]
async fn load_image_reports_missing_file() {
    assert!(engine::load_image(MISSING).await.is_err());
}

#[wasm_bindgen_test]
async fn load_all_settles_mixed_batch() {
    let paths = vec![PIXEL.to_string(), MISSING.to_string(), PIXEL.to_string()];

    let frames = engine::load_all(&ImageSource, paths).await;

    assert_eq!(frames.len(), 3);
    assert!(frames[0].is_some());
    assert!(frames[1].is_none());
    assert_eq!(
        frames[2].as_ref().and_then(|image| image.dimensions()),
        Some(Size {
            width: 1.0,
            height: 1.0
        })
    );
}

#[wasm_bindgen_test]
async fn sequence_draws_onto_canvas() {
    let mut surface = CanvasSurface::new(new_canvas()).unwrap();
    let frames = engine::load_all(&ImageSource, vec![PIXEL.to_string(), PIXEL.to_string()]).await;
    let mut sequence = ScrollSequence::new(BACKGROUND);

    assert!(!sequence.render(&mut surface));
    sequence.finish_loading(frames);

    let size = Size {
        width: 320.0,
        height: 180.0,
    };
    assert!(sequence.resize(size, &mut surface));
    assert_eq!(surface.size(), size);

    let bottom = ScrollMetrics {
        scroll_top: 1000.0,
        document_height: 2000.0,
        viewport_height: 1000.0,
    };
    assert!(sequence.update_frame(&bottom, &mut surface));
    assert_eq!(sequence.current_frame(), 1);
}

#[wasm_bindgen_test]
async fn burst_of_events_runs_one_update_per_repaint() {
    let target: EventTarget = document().create_element("div").unwrap().into();
    let runs = Rc::new(Cell::new(0));
    let counter = runs.clone();
    let throttle = engine::on_repaint(&target, "scroll", move || counter.set(counter.get() + 1))
        .unwrap();

    for _ in 0..5 {
        target.dispatch_event(&Event::new("scroll").unwrap()).unwrap();
    }
    assert_eq!(runs.get(), 0);
    assert!(throttle.borrow().is_pending());

    next_frame().await;
    assert_eq!(runs.get(), 1);
    assert!(!throttle.borrow().is_pending());

    target.dispatch_event(&Event::new("scroll").unwrap()).unwrap();
    next_frame().await;
    assert_eq!(runs.get(), 2);

    // no events, no update
    next_frame().await;
    assert_eq!(runs.get(), 2);
}

#[wasm_bindgen_test]
async fn sections_in_view_are_marked_and_stay_marked() {
    let shown = append_div("reveal-check", ON_SCREEN);
    let below = append_div("reveal-check", OFF_SCREEN);
    let config = SequenceConfig {
        section_selector: ".reveal-check".into(),
        ..SequenceConfig::default()
    };

    let _observer = viewport::watch_sections(&config).unwrap();
    for _ in 0..30 {
        if is_visible(&shown) {
            break;
        }
        next_frame().await;
    }
    assert!(is_visible(&shown));
    assert!(!is_visible(&below));

    shown.set_attribute("style", OFF_SCREEN).unwrap();
    for _ in 0..5 {
        next_frame().await;
    }
    shown.set_attribute("style", ON_SCREEN).unwrap();
    for _ in 0..5 {
        next_frame().await;
    }
    assert!(is_visible(&shown));
    assert_eq!(
        shown
            .class_name()
            .split_whitespace()
            .filter(|class| *class == "visible")
            .count(),
        1
    );

    shown.remove();
    below.remove();
}

#[wasm_bindgen_test]
fn dom_ready_runs_immediately_once_parsed() {
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();

    browser::on_dom_ready(move || flag.set(true)).unwrap();

    assert!(ran.get());
}

#[wasm_bindgen_test]
fn loading_indicator_is_hidden() {
    let loading = append_div("", "display:block");
    loading.set_id("loading-check");

    browser::hide_by_id("loading-check").unwrap();

    let style = loading.dyn_ref::<HtmlElement>().unwrap().style();
    assert_eq!(style.get_property_value("display").unwrap(), "none");
    assert!(browser::hide_by_id("no-such-indicator").is_err());

    loading.remove();
}

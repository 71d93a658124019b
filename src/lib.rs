// ==================== Imports ====================
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::HtmlImageElement;

#[macro_use]
pub mod browser;
pub mod config;
pub mod engine;
pub mod sequence;
pub mod viewport;

use crate::config::SequenceConfig;
use crate::engine::{CanvasSurface, ImageSource, Surface};
use crate::sequence::ScrollSequence;

// ==================== Structs ====================
/// Everything the event handlers mutate. wasm runs handlers one at a time,
/// so a single Rc<RefCell<_>> is shared between them.
struct Scene {
    sequence: ScrollSequence<HtmlImageElement>,
    surface: CanvasSurface,
}

type SharedScene = Rc<RefCell<Scene>>;

impl Scene {
    fn render(&mut self) -> bool {
        self.sequence.render(&mut self.surface)
    }

    fn scroll(&mut self) -> Result<()> {
        let metrics = browser::scroll_metrics()?;
        self.sequence.update_frame(&metrics, &mut self.surface);
        Ok(())
    }

    /// Canvas buffer follows the viewport, nothing is drawn
    fn size_to_viewport(&mut self) -> Result<()> {
        self.surface.set_size(browser::viewport_size()?);
        Ok(())
    }

    fn fit_viewport(&mut self) -> Result<()> {
        let size = browser::viewport_size()?;
        self.sequence.resize(size, &mut self.surface);
        Ok(())
    }
}

// ==================== Main Functions ====================
/// Main entry for Webassembly module, with the default page hooks
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();
    launch(SequenceConfig::default())
}

/// Same as `main_js`, with a partial options object
/// (e.g. `{ canvasId: "hero", coalesceResize: true }`)
#[wasm_bindgen]
pub fn start_with_config(options: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let config = SequenceConfig::from_js(options).map_err(to_js)?;
    launch(config)
}

fn to_js(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}

fn launch(config: SequenceConfig) -> Result<(), JsValue> {
    browser::on_dom_ready(move || {
        browser::spawn_local(async move {
            if let Err(err) = start(config).await {
                warn!("Scroll sequence did not start : {:#}", err);
            }
        })
    })
    .map_err(to_js)
}

/// load frames -> first render -> size canvas -> listeners
async fn start(config: SequenceConfig) -> Result<()> {
    let canvas = browser::canvas(&config.canvas_id)?;
    let scene: SharedScene = Rc::new(RefCell::new(Scene {
        sequence: ScrollSequence::new(config.background.clone()),
        surface: CanvasSurface::new(canvas)?,
    }));

    let frames = engine::load_all(&ImageSource, sequence::frame_paths()).await;
    let usable = frames.iter().filter(|frame| frame.is_some()).count();
    {
        let mut scene = scene.borrow_mut();
        scene.sequence.finish_loading(frames);
        log!("Loaded {}/{} frames", usable, scene.sequence.frame_count());
        if let Err(err) = browser::hide_by_id(&config.loading_id) {
            warn!("Loading indicator left in place : {:#}", err);
        }
        scene.render();
    }

    scene.borrow_mut().size_to_viewport()?;
    watch_scroll(&scene)?;
    // sections are independent of the canvas, a failure here only loses the reveal
    if let Err(err) = viewport::watch_sections(&config) {
        warn!("Sections will not be revealed : {:#}", err);
    }
    scene.borrow_mut().fit_viewport()?;
    watch_resize(&scene, config.coalesce_resize)?;

    Ok(())
}

// ==================== Event Handlers ====================
fn watch_scroll(scene: &SharedScene) -> Result<()> {
    let window = browser::window()?;
    let scene = scene.clone();
    engine::on_repaint(&window, "scroll", move || {
        if let Err(err) = scene.borrow_mut().scroll() {
            warn!("Repaint skipped : {:#}", err);
        }
    })?;
    Ok(())
}

/// Every resize redraws immediately, unless `coalesce` puts resizes behind
/// their own per-repaint throttle
fn watch_resize(scene: &SharedScene, coalesce: bool) -> Result<()> {
    let window = browser::window()?;
    let scene = scene.clone();
    let redraw = move || {
        if let Err(err) = scene.borrow_mut().fit_viewport() {
            warn!("Resize skipped : {:#}", err);
        }
    };

    if coalesce {
        engine::on_repaint(&window, "resize", redraw)?;
        return Ok(());
    }
    let callback = browser::closure_wrap(Box::new(move |_event: web_sys::Event| redraw())
        as Box<dyn FnMut(web_sys::Event)>);
    browser::add_listener(&window, "resize", callback)
}

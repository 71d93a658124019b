use anyhow::{anyhow, Result};
use std::future::Future;
use wasm_bindgen::closure::{Closure, WasmClosure, WasmClosureFnOnce};
use wasm_bindgen::{JsCast, JsValue};

#[rustfmt::skip]
use web_sys::{
    CanvasRenderingContext2d,
    Document,
    Element,
    EventTarget,
    HtmlCanvasElement,
    HtmlElement,
    HtmlImageElement,
    Window,
};

use crate::engine::Size;
use crate::sequence::ScrollMetrics;

// ==================== Macros ====================
// console.log with format! arguments
macro_rules! log {
    ($($t:tt)*) => {
        $crate::browser::console_log(&format!($($t)*))
    }
}

// console.warn with format! arguments
macro_rules! warn {
    ($($t:tt)*) => {
        $crate::browser::console_warn(&format!($($t)*))
    }
}

// web_sys imports only resolve inside wasm, native test builds use stderr
#[cfg(target_arch = "wasm32")]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn console_log(message: &str) {
    eprintln!("{}", message);
}

#[cfg(target_arch = "wasm32")]
pub fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn console_warn(message: &str) {
    eprintln!("warning: {}", message);
}

// ==================== Constants ====================
mod html {
    pub const CONTEXT_2D: &str = "2d";
    pub const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";
    pub const READY_STATE_LOADING: &str = "loading";
}

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

pub fn element_by_id(id: &str) -> Result<Element> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| anyhow!("No Element found with ID : '{}'", id))
}

pub fn canvas(id: &str) -> Result<HtmlCanvasElement> {
    element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlCanvasElement", element))
}

pub fn context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    // get_context is Result<Option<Object>, JsValue>
    // - JsValue error -> anyhow
    // - None -> anyhow
    canvas
        .get_context(html::CONTEXT_2D)
        .map_err(|js_value| anyhow!("Error getting context : {:#?}", js_value))?
        .ok_or_else(|| anyhow!("No 2d context found"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|element| {
            anyhow!(
                "Error converting {:#?} to CanvasRenderingContext2d",
                element
            )
        })
}

pub fn new_image() -> Result<HtmlImageElement> {
    HtmlImageElement::new()
        .map_err(|err| anyhow!("Could not create image element : {:#?}", err))
}

/// Hides the element with the given id
pub fn hide_by_id(id: &str) -> Result<()> {
    hide(&element_by_id(id)?)
}

/// Sets `display: none` on the element
pub fn hide(element: &Element) -> Result<()> {
    element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| anyhow!("Element {:#?} is not an HtmlElement", element))?
        .style()
        .set_property("display", "none")
        .map_err(|err| anyhow!("Could not hide element : {:#?}", err))
}

pub fn query_selector_all(selector: &str) -> Result<Vec<Element>> {
    let nodes = document()?
        .query_selector_all(selector)
        .map_err(|err| anyhow!("Invalid selector '{}' : {:#?}", selector, err))?;

    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn as_pixels(value: JsValue, name: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| anyhow!("{} is not a number : {:#?}", name, value))
}

pub fn viewport_size() -> Result<Size> {
    let window = window()?;
    let width = window
        .inner_width()
        .map_err(|err| anyhow!("Could not read innerWidth : {:#?}", err))?;
    let height = window
        .inner_height()
        .map_err(|err| anyhow!("Could not read innerHeight : {:#?}", err))?;

    Ok(Size {
        width: as_pixels(width, "innerWidth")?,
        height: as_pixels(height, "innerHeight")?,
    })
}

pub fn scroll_metrics() -> Result<ScrollMetrics> {
    let window = window()?;
    let scroll_top = window
        .scroll_y()
        .map_err(|err| anyhow!("Could not read scrollY : {:#?}", err))?;
    let document_height = document()?
        .document_element()
        .ok_or_else(|| anyhow!("Document has no root element"))?
        .scroll_height();

    Ok(ScrollMetrics {
        scroll_top,
        document_height: document_height.into(),
        viewport_height: viewport_size()?.height,
    })
}

pub fn closure_once<F, A, R>(f: F) -> Closure<F::FnMut>
where
    F: 'static + WasmClosureFnOnce<A, R>,
{
    Closure::once(f)
}

pub fn closure_wrap<T: WasmClosure + ?Sized>(data: Box<T>) -> Closure<T> {
    Closure::wrap(data)
}

/// Registers a page-lifetime listener. The closure is leaked on purpose:
/// nothing ever removes these listeners.
pub fn add_listener(
    target: &EventTarget,
    event: &str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
) -> Result<()> {
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not add '{}' listener : {:#?}", event, err))?;
    callback.forget();
    Ok(())
}

/// Runs `f` once on the next repaint
pub fn request_animation_frame_once(f: impl FnOnce(f64) + 'static) -> Result<i32> {
    let callback = Closure::once_into_js(f);
    window()?
        .request_animation_frame(callback.unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame : {:#?}", err))
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

/// Runs `f` now if the document is parsed, otherwise on DOMContentLoaded
pub fn on_dom_ready(f: impl FnOnce() + 'static) -> Result<()> {
    let document = document()?;
    if document.ready_state() != html::READY_STATE_LOADING {
        f();
        return Ok(());
    }

    let callback = closure_once(move |_event: web_sys::Event| f());
    document
        .add_event_listener_with_callback(
            html::DOM_CONTENT_LOADED,
            callback.as_ref().unchecked_ref(),
        )
        .map_err(|err| anyhow!("Could not wait for DOMContentLoaded : {:#?}", err))?;
    callback.forget();
    Ok(())
}

use crate::browser;
use anyhow::{anyhow, Error, Result};
// wasm is single threaded, so Rc RefCell over Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use futures::future::join_all;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, HtmlImageElement};

// ==================== Geometry ====================
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn from_size(size: Size) -> Self {
        Rect {
            position: Point::default(),
            size,
        }
    }
}

/// Scales `image` uniformly so it fits entirely inside `surface`, centered.
/// The leftover band on one axis is the letterbox (or pillarbox).
///
/// Returns `None` when the image has no usable dimensions.
pub fn contain_fit(image: Size, surface: Size) -> Option<Rect> {
    if !image.is_drawable() {
        return None;
    }

    let ratio = f64::min(surface.width / image.width, surface.height / image.height);
    let fitted = Size {
        width: image.width * ratio,
        height: image.height * ratio,
    };

    Some(Rect {
        position: Point {
            x: (surface.width - fitted.width) / 2.0,
            y: (surface.height - fitted.height) / 2.0,
        },
        size: fitted,
    })
}

// ==================== Drawing ====================
/// Something a frame can be drawn from
pub trait FrameImage {
    /// Natural size, or `None` if the image never became usable
    fn dimensions(&self) -> Option<Size>;
}

impl FrameImage for HtmlImageElement {
    fn dimensions(&self) -> Option<Size> {
        let size = Size {
            width: self.natural_width().into(),
            height: self.natural_height().into(),
        };
        (self.complete() && size.is_drawable()).then_some(size)
    }
}

/// Drawing target for the sequence. The browser implementation is
/// `CanvasSurface`; tests record calls instead.
pub trait Surface {
    type Image: FrameImage;

    fn size(&self) -> Size;
    fn set_size(&mut self, size: Size);
    fn fill_rect(&mut self, color: &str, rect: &Rect);
    fn draw_image(&mut self, image: &Self::Image, frame: &Rect, destination: &Rect);
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let context = browser::context(&canvas)?;
        Ok(CanvasSurface { canvas, context })
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn size(&self) -> Size {
        Size {
            width: self.canvas.width().into(),
            height: self.canvas.height().into(),
        }
    }

    fn set_size(&mut self, size: Size) {
        // canvas buffer dimensions are whole pixels
        self.canvas.set_width(size.width.max(0.0) as u32);
        self.canvas.set_height(size.height.max(0.0) as u32);
    }

    fn fill_rect(&mut self, color: &str, rect: &Rect) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            rect.position.x,
            rect.position.y,
            rect.size.width,
            rect.size.height,
        );
    }

    fn draw_image(&mut self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.position.x,
                frame.position.y,
                frame.size.width,
                frame.size.height,
                destination.position.x,
                destination.position.y,
                destination.size.width,
                destination.size.height,
            )
        {
            warn!("Could not draw {} : {:#?}", image.src(), err);
        }
    }
}

// ==================== Loading ====================
/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let path = source.to_string();
    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!("Error loading image {} : {:#?}", path, err)));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // whichever callback fires, the other one still has to outlive the image
    success_callback.forget();
    error_callback.forget();

    // Result<Result<(), Error>, oneshot::Canceled>
    rx.await??;

    Ok(image)
}

#[async_trait(?Send)]
pub trait FrameSource {
    type Image;

    async fn load(&self, path: &str) -> Result<Self::Image>;
}

/// Loads frames as `<img>` elements
pub struct ImageSource;

#[async_trait(?Send)]
impl FrameSource for ImageSource {
    type Image = HtmlImageElement;

    async fn load(&self, path: &str) -> Result<HtmlImageElement> {
        load_image(path).await
    }
}

/// Starts every load at once and resolves when all of them have settled.
/// A failed load leaves an empty slot at its index; the batch never fails.
pub async fn load_all<S, P>(source: &S, paths: P) -> Vec<Option<S::Image>>
where
    S: FrameSource,
    P: IntoIterator<Item = String>,
{
    let loads = paths.into_iter().map(|path| async move {
        match source.load(&path).await {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("Skipping frame {} : {:#}", path, err);
                None
            }
        }
    });

    join_all(loads).await
}

// ==================== Scheduling ====================
/// Coalesces bursts of events into one pending repaint callback
#[derive(Debug, Default)]
pub struct RepaintThrottle {
    pending: bool,
}

impl RepaintThrottle {
    /// True if the caller should schedule a callback; false while one is pending
    pub fn try_schedule(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn settle(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

pub type SharedThrottle = Rc<RefCell<RepaintThrottle>>;

/// Runs `update` on the next repaint unless a run is already queued
pub fn schedule_repaint(throttle: &SharedThrottle, update: impl FnOnce() + 'static) {
    if !throttle.borrow_mut().try_schedule() {
        return;
    }

    let pending = throttle.clone();
    let scheduled = browser::request_animation_frame_once(move |_time: f64| {
        update();
        pending.borrow_mut().settle();
    });

    if let Err(err) = scheduled {
        throttle.borrow_mut().settle();
        warn!("{:#}", err);
    }
}

/// Listens for `event` on `target`, running `update` at most once per
/// repaint however many events arrive in between
pub fn on_repaint(
    target: &EventTarget,
    event: &str,
    update: impl Fn() + 'static,
) -> Result<SharedThrottle> {
    let throttle: SharedThrottle = Rc::new(RefCell::new(RepaintThrottle::default()));
    let update = Rc::new(update);
    let listener_throttle = throttle.clone();
    let callback = browser::closure_wrap(Box::new(move |_event: web_sys::Event| {
        let update = update.clone();
        schedule_repaint(&listener_throttle, move || update());
    }) as Box<dyn FnMut(web_sys::Event)>);

    browser::add_listener(target, event, callback)?;
    Ok(throttle)
}

// sequence/
// ├── mod.rs    ScrollSequence: loaded frames, current frame, drawing
// ├── frames.rs asset naming
// └── scroll.rs scroll position -> frame index
mod frames;
mod scroll;

pub use self::frames::{frame_path, frame_paths, FRAME_COUNT};
pub use self::scroll::{frame_for_scroll, ScrollMetrics};

use crate::engine::{contain_fit, FrameImage, Rect, Size, Surface};

pub const BACKGROUND: &str = "#050505";

/// Scroll-scrubbed image sequence.
///
/// Nothing is drawn and the current frame never moves until
/// `finish_loading` has run.
pub struct ScrollSequence<I> {
    frames: Vec<Option<I>>,
    current: usize,
    loaded: bool,
    background: String,
}

impl<I: FrameImage> ScrollSequence<I> {
    pub fn new(background: impl Into<String>) -> Self {
        ScrollSequence {
            frames: Vec::new(),
            current: 0,
            loaded: false,
            background: background.into(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Takes ownership of the settled batch. Empty slots are frames that
    /// failed to load and are skipped when drawing.
    pub fn finish_loading(&mut self, frames: Vec<Option<I>>) {
        self.frames = frames;
        self.current = 0;
        self.loaded = true;
    }

    fn current_image(&self) -> Option<(&I, Size)> {
        let image = self.frames.get(self.current)?.as_ref()?;
        Some((image, image.dimensions()?))
    }

    /// Fills the surface with the background and draws the current frame
    /// contain-fitted and centered. Returns whether anything was drawn.
    pub fn render<S>(&self, surface: &mut S) -> bool
    where
        S: Surface<Image = I>,
    {
        if !self.loaded {
            return false;
        }
        let (image, image_size) = match self.current_image() {
            Some(current) => current,
            None => return false,
        };
        let surface_size = surface.size();
        let destination = match contain_fit(image_size, surface_size) {
            Some(destination) => destination,
            None => return false,
        };

        surface.fill_rect(&self.background, &Rect::from_size(surface_size));
        surface.draw_image(image, &Rect::from_size(image_size), &destination);
        true
    }

    /// Moves to the frame for `metrics`, redrawing only when it changed.
    /// Returns whether the frame changed.
    pub fn update_frame<S>(&mut self, metrics: &ScrollMetrics, surface: &mut S) -> bool
    where
        S: Surface<Image = I>,
    {
        if !self.loaded {
            return false;
        }

        let frame = frame_for_scroll(metrics, self.frames.len());
        if frame == self.current {
            return false;
        }
        self.current = frame;
        self.render(surface);
        true
    }

    /// Resizes the surface and redraws the same frame
    pub fn resize<S>(&self, size: Size, surface: &mut S) -> bool
    where
        S: Surface<Image = I>,
    {
        surface.set_size(size);
        self.render(surface)
    }
}

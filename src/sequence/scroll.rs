/// Page scroll position, in CSS pixels
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Normalized position in [0, 1]. A page that cannot scroll sits at 0.
    pub fn progress(&self) -> f64 {
        let range = self.document_height - self.viewport_height;
        if !(range.is_finite() && range > 0.0) {
            return 0.0;
        }

        let progress = self.scroll_top / range;
        if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        }
    }
}

/// Maps the scroll position onto `frame_count` frames, first frame at the
/// top of the page and last frame at the bottom
pub fn frame_for_scroll(metrics: &ScrollMetrics, frame_count: usize) -> usize {
    let last = match frame_count.checked_sub(1) {
        Some(last) => last,
        None => return 0,
    };

    // progress is clamped, so the product is a finite non-negative float
    let index = (metrics.progress() * last as f64).floor() as usize;
    index.min(last)
}

use anyhow::{anyhow, Result};
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::sequence::BACKGROUND;

/// DOM hooks and presentation knobs. Every key is optional on the JS side;
/// the frame count and asset names are fixed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequenceConfig {
    pub canvas_id: String,
    pub loading_id: String,
    pub section_selector: String,
    pub visible_class: String,
    pub background: String,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    /// Route resize redraws through the same per-repaint throttle as scroll
    pub coalesce_resize: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        SequenceConfig {
            canvas_id: "canvas".into(),
            loading_id: "loading".into(),
            section_selector: ".section".into(),
            visible_class: "visible".into(),
            background: BACKGROUND.into(),
            reveal_threshold: 0.3,
            reveal_root_margin: "-10%".into(),
            coalesce_resize: false,
        }
    }
}

impl SequenceConfig {
    /// `undefined` and `null` mean all defaults
    pub fn from_js(options: JsValue) -> Result<Self> {
        if options.is_undefined() || options.is_null() {
            return Ok(Self::default());
        }
        let config: SequenceConfig = serde_wasm_bindgen::from_value(options)
            .map_err(|err| anyhow!("Invalid options : {}", err))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(anyhow!(
                "revealThreshold must be within [0, 1], got {}",
                self.reveal_threshold
            ));
        }
        if self.canvas_id.is_empty() {
            return Err(anyhow!("canvasId must not be empty"));
        }
        if !is_root_margin(&self.reveal_root_margin) {
            return Err(anyhow!(
                "revealRootMargin must be 1 to 4 px or % lengths, got '{}'",
                self.reveal_root_margin
            ));
        }
        if !is_color(&self.background) {
            return Err(anyhow!(
                "background must be a hex, functional or named color, got '{}'",
                self.background
            ));
        }
        Ok(())
    }
}

/// Same grammar IntersectionObserver accepts for rootMargin: one to four
/// lengths, each `0` or a number with a `px` or `%` unit
fn is_root_margin(margin: &str) -> bool {
    let lengths: Vec<&str> = margin.split_whitespace().collect();
    (1..=4).contains(&lengths.len()) && lengths.iter().all(|length| is_margin_length(length))
}

fn is_margin_length(length: &str) -> bool {
    if length == "0" {
        return true;
    }
    let number = length
        .strip_suffix("px")
        .or_else(|| length.strip_suffix('%'));
    matches!(number.map(str::parse::<f64>), Some(Ok(value)) if value.is_finite())
}

/// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`-style functions or a
/// keyword such as `black`
fn is_color(color: &str) -> bool {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(open) = color.find('(') {
        let name = &color[..open];
        let function = matches!(
            name,
            "rgb" | "rgba" | "hsl" | "hsla" | "hwb" | "lab" | "lch" | "oklab" | "oklch"
        );
        return function
            && color.ends_with(')')
            && color.len() > open + 2;
    }
    !color.is_empty() && color.chars().all(|c| c.is_ascii_alphabetic())
}

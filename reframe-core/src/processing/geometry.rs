//! Canvas selection and scale+pad geometry.
//!
//! A source is fitted inside one of two fixed 1080p canvases with its aspect
//! ratio preserved, then centered with black borders. The arithmetic mirrors
//! ffmpeg's `scale=W:H:force_original_aspect_ratio=decrease` followed by
//! `pad=W:H:(ow-iw)/2:(oh-ih)/2`, so the layout computed here is the layout
//! the encoder produces.

use serde::Serialize;
use std::fmt;

/// Width and height of a video stream, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    /// Returns `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn is_portrait(&self) -> bool {
        self.width < self.height
    }
}

impl fmt::Display for VideoDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The two output frames a source can be normalized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetCanvas {
    /// 1920x1080
    Landscape,
    /// 1080x1920
    Portrait,
}

impl TargetCanvas {
    /// Landscape for `width >= height` (squares included), portrait otherwise.
    pub fn for_source(source: VideoDimensions) -> Self {
        if source.is_portrait() {
            TargetCanvas::Portrait
        } else {
            TargetCanvas::Landscape
        }
    }

    pub fn width(self) -> u32 {
        match self {
            TargetCanvas::Landscape => 1920,
            TargetCanvas::Portrait => 1080,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            TargetCanvas::Landscape => 1080,
            TargetCanvas::Portrait => 1920,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetCanvas::Landscape => "landscape",
            TargetCanvas::Portrait => "portrait",
        }
    }

    /// The ffmpeg video filter that fits a source into this canvas.
    pub fn filter(self) -> String {
        let (w, h) = (self.width(), self.height());
        format!("scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2")
    }
}

impl fmt::Display for TargetCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.label(), self.width(), self.height())
    }
}

/// Where the scaled picture sits inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameLayout {
    pub canvas: TargetCanvas,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub pad_left: u32,
    pub pad_right: u32,
    pub pad_top: u32,
    pub pad_bottom: u32,
}

impl FrameLayout {
    /// Computes the layout for `source` on its target canvas.
    pub fn for_source(source: VideoDimensions) -> Self {
        Self::compute(source, TargetCanvas::for_source(source))
    }

    pub fn compute(source: VideoDimensions, canvas: TargetCanvas) -> Self {
        let (cw, ch) = (canvas.width(), canvas.height());

        // Candidate sizes keeping the source aspect with one side pinned to the box.
        let fit_width = rescale_rounded(ch, source.width, source.height);
        let fit_height = rescale_rounded(cw, source.height, source.width);

        let scaled_width = fit_width.min(cw).max(1);
        let scaled_height = fit_height.min(ch).max(1);

        let pad_left = (cw - scaled_width) / 2;
        let pad_top = (ch - scaled_height) / 2;

        Self {
            canvas,
            scaled_width,
            scaled_height,
            pad_left,
            pad_right: cw - scaled_width - pad_left,
            pad_top,
            pad_bottom: ch - scaled_height - pad_top,
        }
    }

    pub fn is_exact_fit(&self) -> bool {
        self.pad_left == 0 && self.pad_right == 0 && self.pad_top == 0 && self.pad_bottom == 0
    }

    /// Ratio of scaled content to source size along the pinned axis.
    pub fn scale_factor(&self, source: VideoDimensions) -> f64 {
        let by_width = self.scaled_width as f64 / source.width as f64;
        let by_height = self.scaled_height as f64 / source.height as f64;
        by_width.min(by_height)
    }
}

/// `value * num / den` rounded to nearest, halves away from zero.
fn rescale_rounded(value: u32, num: u32, den: u32) -> u32 {
    let den = u64::from(den);
    let scaled = (u64::from(value) * u64::from(num) + den / 2) / den;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

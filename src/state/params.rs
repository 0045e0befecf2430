/// User-tunable extraction parameters
///
/// These values are sent alongside the image on every extraction request.
/// The service owns their interpretation; the client only clamps them into
/// their documented ranges.

use serde::{Deserialize, Serialize};

/// Lower/upper bound shared by brightness and contrast
pub const ADJUSTMENT_RANGE: std::ops::RangeInclusive<i32> = -100..=100;

/// All extraction parameters
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractionParameters {
    /// Number of dominant colors to extract (must be >= 1 to submit)
    pub color_count: u32,

    /// Brightness adjustment (-100 to +100)
    /// - 0 = no adjustment
    pub brightness: i32,

    /// Contrast adjustment (-100 to +100)
    /// - 0 = no adjustment
    pub contrast: i32,

    /// Extract from a grayscale version of the image
    pub grayscale: bool,
}

impl Default for ExtractionParameters {
    fn default() -> Self {
        Self {
            color_count: 5,
            brightness: 0,
            contrast: 0,
            grayscale: false,
        }
    }
}

impl ExtractionParameters {
    pub fn set_brightness(&mut self, value: i32) {
        self.brightness = clamp_adjustment(value);
    }

    pub fn set_contrast(&mut self, value: i32) {
        self.contrast = clamp_adjustment(value);
    }

    /// Apply the text of the color-count field.
    ///
    /// Anything that is not a non-negative integer becomes 0, which the
    /// request builder refuses.
    pub fn set_color_count_text(&mut self, text: &str) {
        self.color_count = text.trim().parse().unwrap_or(0);
    }

    /// Copy with brightness and contrast forced into range
    pub fn clamped(mut self) -> Self {
        self.brightness = clamp_adjustment(self.brightness);
        self.contrast = clamp_adjustment(self.contrast);
        self
    }
}

fn clamp_adjustment(value: i32) -> i32 {
    value.clamp(*ADJUSTMENT_RANGE.start(), *ADJUSTMENT_RANGE.end())
}

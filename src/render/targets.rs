//! Aspect-ratio targets and their fixed pixel sizes.

/// A closed set of output sizes. Anything unrecognized renders square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectTarget {
    Square,
    Portrait,
    Story,
    Landscape,
}

/// Device pixel ratio every target is captured at.
pub const DEVICE_SCALE_FACTOR: f64 = 2.0;

impl AspectTarget {
    pub const ALL: [AspectTarget; 4] = [
        AspectTarget::Square,
        AspectTarget::Portrait,
        AspectTarget::Story,
        AspectTarget::Landscape,
    ];

    /// Resolve a ratio label such as `"4:5"`. Unknown labels fall back to [`AspectTarget::Square`].
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "4:5" => Self::Portrait,
            "9:16" => Self::Story,
            "16:9" => Self::Landscape,
            _ => Self::Square,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "4:5",
            Self::Story => "9:16",
            Self::Landscape => "16:9",
        }
    }

    /// Filename-safe form of the label (`16:9` → `16x9`).
    pub fn slug(self) -> &'static str {
        match self {
            Self::Square => "1x1",
            Self::Portrait => "4x5",
            Self::Story => "9x16",
            Self::Landscape => "16x9",
        }
    }

    /// CSS viewport size `(width, height)` before the device scale factor.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Square => (1080, 1080),
            Self::Portrait => (1080, 1350),
            Self::Story => (1080, 1920),
            Self::Landscape => (1920, 1080),
        }
    }

    /// Size of the captured image in pixels.
    pub fn output_pixels(self) -> (u32, u32) {
        let (w, h) = self.dimensions();
        (
            (w as f64 * DEVICE_SCALE_FACTOR) as u32,
            (h as f64 * DEVICE_SCALE_FACTOR) as u32,
        )
    }
}

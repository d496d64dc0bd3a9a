//! Per-platform formatting rules for generated captions.
//!
//! Every supported social platform gets a word-count band and a hashtag
//! target. The table is fixed at compile time; unknown keys resolve to the
//! Instagram guide.

/// Formatting constraints for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformGuide {
    pub key: &'static str,
    pub name: &'static str,
    /// Target length band, already phrased for the prompt (e.g. `"30-60 kata"`).
    pub words: &'static str,
    pub hashtags: u32,
}

pub const INSTAGRAM: PlatformGuide = PlatformGuide {
    key: "instagram",
    name: "Instagram",
    words: "120-180 kata",
    hashtags: 6,
};

pub const GUIDES: &[PlatformGuide] = &[
    INSTAGRAM,
    PlatformGuide {
        key: "facebook",
        name: "Facebook",
        words: "120-180 kata",
        hashtags: 3,
    },
    PlatformGuide {
        key: "whatsapp",
        name: "WhatsApp",
        words: "30-60 kata",
        hashtags: 0,
    },
    PlatformGuide {
        key: "tiktok",
        name: "TikTok",
        words: "30-80 kata",
        hashtags: 5,
    },
    PlatformGuide {
        key: "threads",
        name: "Threads",
        words: "60-120 kata",
        hashtags: 4,
    },
    PlatformGuide {
        key: "marketplace",
        name: "Marketplace",
        words: "60-120 kata",
        hashtags: 0,
    },
];

/// Exact-key lookup.
pub fn find(key: &str) -> Option<&'static PlatformGuide> {
    GUIDES.iter().find(|g| g.key == key)
}

/// Lookup with the Instagram fallback used by the prompt compiler.
pub fn guide_for(key: &str) -> &'static PlatformGuide {
    find(key).unwrap_or(&GUIDES[0])
}

//! Interpretation of raw model output as caption variants.

use crate::types::CaptionVariant;

/// Result of reading model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCaptions {
    /// Output was a JSON array of caption objects, kept in order.
    Structured(Vec<CaptionVariant>),
    /// Output was anything else; the raw text is kept whole.
    Fallback(String),
}

impl ParsedCaptions {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Flatten to variants. A fallback becomes one variant with no hashtags.
    pub fn into_variants(self) -> Vec<CaptionVariant> {
        match self {
            Self::Structured(variants) => variants,
            Self::Fallback(raw) => vec![CaptionVariant::raw(raw)],
        }
    }
}

/// Parse model output.
///
/// Only a top-level JSON array whose elements are objects counts as
/// structured. Scalars, objects, and arrays of non-objects take the fallback
/// path, so every platform always ends up with at least one entry.
pub fn parse_captions(raw: &str) -> ParsedCaptions {
    match serde_json::from_str::<Vec<CaptionVariant>>(raw) {
        Ok(variants) => ParsedCaptions::Structured(variants),
        Err(e) => {
            tracing::debug!("model output is not a caption array ({e}), keeping raw text");
            ParsedCaptions::Fallback(raw.to_string())
        }
    }
}

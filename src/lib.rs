//! # larisin
//!
//! A marketing asset service for small shops. From one description of a
//! product and the shop selling it, larisin produces:
//!
//! - short social captions for each requested platform, written by an
//!   OpenAI-compatible chat model,
//! - a promotional poster rendered to PNG at several aspect ratios,
//! - a day-by-day posting plan,
//! - a zip bundle of all of the above.
//!
//! # Architecture
//!
//! ```text
//! request ─┬─ prompt → llm → parse   (per platform, concurrent)  → CaptionBundle
//!          ├─ poster → render        (per ratio, sequential)     → outputs/poster-*.png
//!          ├─ schedule                                           → Vec<SchedulePlanItem>
//!          └─ export  (captions + plan + posters)                → outputs/larisin-*.zip
//! ```
//!
//! The pipeline pieces are plain functions over plain types; the two
//! external systems sit behind traits ([`llm::TextGenerator`] and
//! [`render::RenderBackend`]) so the whole service runs in tests without a
//! network or a browser.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Request types shared by every endpoint (`Product`, `Shop`, `CaptionVariant`) |
//! | [`platform`] | Per-platform word-count and hashtag targets |
//! | [`locale`] | Rupiah formatting, Indonesian date labels, URI component encoding |
//! | [`prompt`] | Copywriter system prompt and per-platform user prompt |
//! | [`llm`] | Chat completion client that degrades instead of failing |
//! | [`parse`] | Model output → caption variants, with raw-text fallback |
//! | [`caption`] | Concurrent per-platform caption generation |
//! | [`poster`] | Poster HTML document (Maud) |
//! | [`render`] | Aspect targets, render backend trait, headless Chrome backend |
//! | [`schedule`] | Deterministic N-day posting plan |
//! | [`export`] | Zip bundle with path-checked asset copies |
//! | [`naming`] | Unique output file names and their public URLs |
//! | [`config`] | `larisin.toml` loading, environment overrides, validation |
//! | [`server`] | Axum router, shared state, handlers, error responses |
//!
//! # Design Decisions
//!
//! ## Degrade, Don't Fail
//!
//! A missing API key, a rate limit, or a malformed model reply never turns
//! into an HTTP error. The client returns [`llm::Generation::Degraded`] with
//! placeholder text and a cause, and the parser turns unparseable replies
//! into a single raw-text variant. Only a missing product name is rejected.
//!
//! ## One Document, Many Viewports
//!
//! The poster is one fluid HTML document. Each aspect ratio is the same page
//! captured at a different window size, at 2x density, inside one browser
//! session per request. Ratios are rendered in the order requested and the
//! first failure stops the loop.
//!
//! ## Untrusted Paths
//!
//! The export endpoint receives file paths from the client. Each is reduced
//! to its normal components, joined to the public root, canonicalized, and
//! checked to still be inside the root before it is read.

pub mod caption;
pub mod config;
pub mod export;
pub mod llm;
pub mod locale;
pub mod naming;
pub mod parse;
pub mod platform;
pub mod poster;
pub mod prompt;
pub mod render;
pub mod schedule;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

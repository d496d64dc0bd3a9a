//! File names and public URLs for generated artifacts.
//!
//! Everything the service writes lands flat in `<public_dir>/outputs/` and is
//! addressed over HTTP as `/outputs/<file>`. Every name carries a fresh v4
//! UUID, so concurrent requests never write to the same path:
//!
//! - Posters: `poster-<uuid>-<ratio slug>.png` (e.g. `poster-…-16x9.png`)
//! - Bundles: `larisin-<uuid>.zip`

use uuid::Uuid;

/// Directory under the public root that holds generated files.
pub const OUTPUTS_SEGMENT: &str = "outputs";

pub fn poster_file_name(ratio_slug: &str) -> String {
    format!("poster-{}-{ratio_slug}.png", Uuid::new_v4())
}

pub fn archive_file_name() -> String {
    format!("larisin-{}.zip", Uuid::new_v4())
}

/// Public URL of a file in the outputs directory.
pub fn public_url(file_name: &str) -> String {
    format!("/{OUTPUTS_SEGMENT}/{file_name}")
}

//! Poster rasterization.
//!
//! | Piece | Role |
//! |---|---|
//! | **Targets** | [`AspectTarget`]: ratio label → CSS size, output slug |
//! | **Backend** | [`RenderBackend`] / [`RenderSession`] traits |
//! | **Chrome** | [`ChromeBackend`]: headless Chrome via `headless_chrome` |
//! | **Loop** | [`render_targets`]: one session, one PNG per ratio, in order |
//!
//! A request moves through `Idle → SessionOpen → (Capture)* → Closed`. The
//! session is dropped on every exit path, including a capture failure
//! partway through the list. Files already written for earlier ratios stay
//! on disk in that case; only the error is reported.
//!
//! Everything here is blocking. The HTTP layer runs it on
//! `tokio::task::spawn_blocking`.

pub mod backend;
pub mod chrome;
pub mod targets;

pub use backend::{RenderBackend, RenderError, RenderSession};
pub use chrome::ChromeBackend;
pub use targets::AspectTarget;

use crate::naming;
use crate::poster::{PosterSpec, render_poster};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One PNG written to the outputs directory.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedAsset {
    #[serde(skip)]
    pub path: PathBuf,
    pub url: String,
    pub ratio: &'static str,
}

/// Capture `markup` once per ratio label, in input order.
///
/// Unknown labels render as 1:1 and are named with the `1x1` slug. An empty
/// list returns immediately without opening a session.
pub fn render_targets(
    backend: &dyn RenderBackend,
    markup: &str,
    ratios: &[String],
    outputs_dir: &Path,
) -> Result<Vec<RenderedAsset>, RenderError> {
    if ratios.is_empty() {
        return Ok(Vec::new());
    }
    fs::create_dir_all(outputs_dir)?;

    let mut session = backend.open_session()?;
    let mut assets = Vec::with_capacity(ratios.len());
    for label in ratios {
        let target = AspectTarget::from_label(label);
        if target.label() != label.trim() {
            tracing::debug!(label = %label, "unknown aspect ratio, rendering 1:1");
        }
        let png = session.capture(markup, target)?;

        let file_name = naming::poster_file_name(target.slug());
        let path = outputs_dir.join(&file_name);
        fs::write(&path, png)?;
        tracing::info!(ratio = target.label(), file = %file_name, "poster rendered");

        assets.push(RenderedAsset {
            path,
            url: naming::public_url(&file_name),
            ratio: target.label(),
        });
    }
    Ok(assets)
}

/// Build the poster document for `spec` and rasterize it at every ratio.
pub fn render_poster_files(
    backend: &dyn RenderBackend,
    spec: &PosterSpec,
    ratios: &[String],
    outputs_dir: &Path,
) -> Result<Vec<RenderedAsset>, RenderError> {
    let markup = render_poster(spec).into_string();
    render_targets(backend, &markup, ratios, outputs_dir)
}

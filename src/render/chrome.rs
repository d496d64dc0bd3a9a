//! Headless Chrome render backend.
//!
//! Each session launches its own browser with one tab. Per target the tab's
//! window is resized to the target's CSS size, the poster is loaded from a
//! session-private temp file, and a PNG is captured with a 2x clip scale.
//!
//! `headless_chrome` has no network-idle wait, so after navigation the page
//! is held until web fonts are ready and every `<img>` has loaded or failed.

use super::backend::{RenderBackend, RenderError, RenderSession};
use super::targets::{AspectTarget, DEVICE_SCALE_FACTOR};
use crate::config::RenderConfig;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Resolves once fonts and images have settled.
const SETTLE_SCRIPT: &str = r#"Promise.all([
    document.fonts ? document.fonts.ready : Promise.resolve(),
    ...Array.from(document.images).map(img => img.complete
        ? Promise.resolve()
        : new Promise(resolve => { img.onload = img.onerror = resolve; }))
]).then(() => true)"#;

pub struct ChromeBackend {
    executable_path: Option<PathBuf>,
    timeout: Duration,
}

impl ChromeBackend {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            executable_path: config.executable_path.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl RenderBackend for ChromeBackend {
    fn open_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let (width, height) = AspectTarget::Square.dimensions();
        let options = LaunchOptions {
            headless: true,
            sandbox: false,
            path: self.executable_path.clone(),
            window_size: Some((width, height)),
            idle_browser_timeout: self.timeout * 4,
            ..Default::default()
        };
        let browser = Browser::new(options).map_err(|e| RenderError::Launch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(e.to_string()))?;
        tab.set_default_timeout(self.timeout);

        let page_file = tempfile::Builder::new()
            .prefix("larisin-poster-")
            .suffix(".html")
            .tempfile()?;

        tracing::debug!("render session opened");
        Ok(Box::new(ChromeSession {
            tab,
            _browser: browser,
            page_file,
        }))
    }
}

struct ChromeSession {
    tab: Arc<Tab>,
    // Dropping the browser kills the Chrome process.
    _browser: Browser,
    page_file: NamedTempFile,
}

impl ChromeSession {
    fn load(&mut self, markup: &str) -> Result<(), RenderError> {
        std::fs::write(self.page_file.path(), markup)?;

        let url = format!("file://{}", self.page_file.path().display());
        self.tab
            .navigate_to(&url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| RenderError::Load(e.to_string()))?;
        self.tab
            .evaluate(SETTLE_SCRIPT, true)
            .map_err(|e| RenderError::Load(e.to_string()))?;
        Ok(())
    }
}

impl RenderSession for ChromeSession {
    fn capture(&mut self, markup: &str, target: AspectTarget) -> Result<Vec<u8>, RenderError> {
        let (width, height) = target.dimensions();
        self.tab
            .set_bounds(Bounds::Normal {
                left: Some(0),
                top: Some(0),
                width: Some(width as f64),
                height: Some(height as f64),
            })
            .map_err(|e| RenderError::Load(e.to_string()))?;

        self.load(markup)?;

        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: width as f64,
            height: height as f64,
            scale: DEVICE_SCALE_FACTOR,
        };
        self.tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .map_err(|e| RenderError::Capture(e.to_string()))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        tracing::debug!("render session closed");
    }
}

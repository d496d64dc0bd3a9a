//! Poster HTML generation.
//!
//! Produces one self-contained HTML document per [`PosterSpec`]. The same
//! document is rasterized at every requested aspect ratio, so the layout is
//! fluid: it fills whatever viewport the renderer sets.
//!
//! ## Layout
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │ Shop name                                 │
//! │ address                                   │
//! │ ┌──────────────────────┐ ┌──────────────┐ │
//! │ │ Product name         │ │  photo or    │ │
//! │ │ benefit highlight    │ │  placeholder │ │
//! │ │ Rp 18.000 (accent)   │ └──────────────┘ │
//! │ │ [Chat WhatsApp]      │  Tema: ...       │
//! │ └──────────────────────┘                  │
//! │ • maps link                               │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Escaping
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/), so every
//! interpolated field (shop name, address, product name, benefits, theme,
//! URLs) is escaped. Colors end up inside a `<style>` block, so they are
//! checked against a small CSS color grammar instead and replaced with the
//! defaults when they don't match.
//!
//! The stylesheet is embedded at compile time from `static/poster.css`; the
//! document references no external scripts or stylesheets. Only a product
//! photo URL, when present, is fetched by the browser.

use crate::locale::format_idr;
use crate::prompt::whatsapp_link;
use crate::types::{Product, Shop};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const POSTER_CSS: &str = include_str!("../static/poster.css");

pub const DEFAULT_THEME: &str = "Minimalis & Bersih";
pub const DEFAULT_BACKGROUND: &str = "#0B2447";
pub const DEFAULT_ACCENT: &str = "#FFD700";

const FALLBACK_SHOP_NAME: &str = "Brand Kamu";
const FALLBACK_PRODUCT_NAME: &str = "Nama Produk";

/// Background and accent colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPair {
    pub background: String,
    pub accent: String,
}

impl Default for ColorPair {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl ColorPair {
    /// Build from a caller-supplied list: first entry is the background, second the accent.
    ///
    /// Missing or unsafe entries fall back to the default for that slot.
    pub fn from_list(colors: &[String]) -> Self {
        let pick = |idx: usize, fallback: &str| {
            colors
                .get(idx)
                .map(|c| c.trim())
                .filter(|c| is_safe_css_color(c))
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            background: pick(0, DEFAULT_BACKGROUND),
            accent: pick(1, DEFAULT_ACCENT),
        }
    }
}

/// Everything a poster is rendered from.
#[derive(Debug, Clone)]
pub struct PosterSpec {
    pub theme: String,
    pub colors: ColorPair,
    pub product: Product,
    pub shop: Shop,
}

/// Accepts `#rgb[a]`, `#rrggbb[aa]`, named colors, and `rgb()/rgba()/hsl()/hsla()`.
pub fn is_safe_css_color(value: &str) -> bool {
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if !value.is_empty() && value.len() <= 32 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        return true;
    }
    ["rgb(", "rgba(", "hsl(", "hsla("].iter().any(|prefix| {
        value
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(')'))
            .is_some_and(|args| {
                !args.is_empty()
                    && args
                        .chars()
                        .all(|c| c.is_ascii_digit() || " .,%/-".contains(c))
            })
    })
}

/// First sentence-or-line of the benefits text.
///
/// Text up to the first `.` or newline, trimmed. Without either delimiter the
/// whole string is used.
pub fn benefit_highlight(benefits: &str) -> &str {
    benefits
        .split(['.', '\n'])
        .next()
        .unwrap_or_default()
        .trim()
}

/// CSS custom properties for the poster colors followed by the static stylesheet.
fn poster_css(colors: &ColorPair) -> String {
    format!(
        ":root {{\n    --poster-bg: {};\n    --poster-accent: {};\n}}\n\n{}",
        colors.background, colors.accent, POSTER_CSS
    )
}

/// Render the poster document.
pub fn render_poster(spec: &PosterSpec) -> Markup {
    let product = &spec.product;
    let shop = &spec.shop;

    let shop_name = shop
        .name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(FALLBACK_SHOP_NAME);
    let product_name = product.display_name().unwrap_or(FALLBACK_PRODUCT_NAME);
    let benefit = benefit_highlight(product.benefits.as_deref().unwrap_or(""));
    let price = format_idr(product.price_value());
    let cta_href = whatsapp_link(product, shop).unwrap_or_else(|| "#".to_string());
    let css = poster_css(&spec.colors);

    html! {
        (DOCTYPE)
        html lang="id" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { (product_name) " | " (shop_name) }
                style { (PreEscaped(css)) }
            }
            body {
                div.poster {
                    div.shop-name { (shop_name) }
                    div.shop-address { (shop.address.as_deref().unwrap_or("")) }
                    div.content {
                        div.card {
                            div.product-name { (product_name) }
                            div.benefit { (benefit) }
                            div.price { (price) }
                            a.cta href=(cta_href) { "Chat WhatsApp" }
                        }
                        div.media {
                            div.photo {
                                @if let Some(url) = product.photo() {
                                    img src=(url) alt=(product_name);
                                } @else {
                                    div.photo-placeholder {
                                        "Foto Produk"
                                        br;
                                        span.hint { "(unggah via halaman utama)" }
                                    }
                                }
                            }
                            div.theme { "Tema: " (spec.theme) }
                        }
                    }
                    div.footer {
                        div.dot {}
                        div { (shop.maps_url().unwrap_or("")) }
                    }
                }
            }
        }
    }
}

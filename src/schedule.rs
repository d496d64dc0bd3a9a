//! Posting plan: one content idea per day, no model call involved.
//!
//! Ideas rotate through a fixed seven-item list starting at the first entry,
//! so a seven-day plan covers each idea exactly once. Dates are labelled in
//! Indonesian (`Jumat, 16 Okt`) starting from the supplied day.

use crate::caption::{default_platforms, platforms_or_default, tone_or_default};
use crate::locale::date_label;
use crate::prompt::DEFAULT_TONE;
use crate::types::{Product, SchedulePlanItem, Shop, null_as_default};
use chrono::{Days, NaiveDate};
use serde::Deserialize;

pub const DEFAULT_DAYS: i64 = 7;
/// Longest plan a single request can ask for.
pub const MAX_DAYS: i64 = 90;

pub const IDEAS: [&str; 7] = [
    "Foto produk + testimoni",
    "Manfaat utama (carousel)",
    "Behind the scene pembuatan",
    "Harga & promo bundling",
    "FAQ singkat",
    "UGC pelanggan",
    "Tips pakai/menyajikan",
];

const FALLBACK_PRODUCT_NAME: &str = "Produk";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub product: Product,
    /// Accepted for symmetry with the other endpoints; the plan doesn't use it.
    #[serde(deserialize_with = "null_as_default")]
    pub shop: Shop,
    #[serde(deserialize_with = "platforms_or_default")]
    pub platforms: Vec<String>,
    pub days: i64,
    #[serde(deserialize_with = "tone_or_default")]
    pub tone: String,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            product: Product::default(),
            shop: Shop::default(),
            platforms: default_platforms(),
            days: DEFAULT_DAYS,
            tone: DEFAULT_TONE.to_string(),
        }
    }
}

/// Build the plan for `days` consecutive days from `start`.
///
/// Non-positive day counts give an empty plan; counts above [`MAX_DAYS`] are capped.
pub fn plan(
    product: &Product,
    platforms: &[String],
    days: i64,
    tone: &str,
    start: NaiveDate,
) -> Vec<SchedulePlanItem> {
    let name = product.display_name().unwrap_or(FALLBACK_PRODUCT_NAME);
    let days = days.clamp(0, MAX_DAYS) as u64;

    (0..days)
        .map_while(|offset| {
            let date = start.checked_add_days(Days::new(offset))?;
            let idea = IDEAS[offset as usize % IDEAS.len()];
            Some(SchedulePlanItem {
                date: date_label(date),
                platforms: platforms.to_vec(),
                idea: idea.to_string(),
                caption: format!("{name} — {idea}. Gaya: {tone}. CTA: Chat WhatsApp."),
            })
        })
        .collect()
}

impl PlanRequest {
    pub fn plan_from(&self, start: NaiveDate) -> Vec<SchedulePlanItem> {
        plan(&self.product, &self.platforms, self.days, &self.tone, start)
    }
}

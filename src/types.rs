//! Shared request and asset types.
//!
//! These types cross every stage of the pipeline (caption → poster → export)
//! and are deserialized straight from request bodies, so every field a caller
//! may leave out has a default. Price handling is lenient: callers send
//! numbers, numeric strings, or nothing at all.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// The product being promoted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Product {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_price")]
    pub price: Option<f64>,
    /// Older form field kept for clients that still send it.
    #[serde(deserialize_with = "lenient_price")]
    pub price_idr: Option<f64>,
    pub benefits: Option<String>,
    pub audience: Option<String>,
    pub photo_url: Option<String>,
}

impl Product {
    /// Product name with surrounding whitespace removed, `None` when blank.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Effective price: `price` unless absent or zero, then `price_idr`, then 0.
    pub fn price_value(&self) -> f64 {
        self.price
            .filter(|p| *p != 0.0)
            .or(self.price_idr)
            .unwrap_or(0.0)
    }

    /// Photo URL if one was supplied and is not just whitespace.
    pub fn photo(&self) -> Option<&str> {
        non_blank(self.photo_url.as_deref())
    }
}

/// The shop selling the product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Shop {
    pub name: Option<String>,
    pub address: Option<String>,
    /// WhatsApp number in international format, e.g. `6281234567890`.
    pub whatsapp_e164: Option<String>,
    pub google_maps_url: Option<String>,
}

impl Shop {
    /// WhatsApp number reduced to its digits, `None` if nothing usable remains.
    pub fn whatsapp_digits(&self) -> Option<String> {
        let digits: String = self
            .whatsapp_e164
            .as_deref()?
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        (!digits.is_empty()).then_some(digits)
    }

    pub fn maps_url(&self) -> Option<&str> {
        non_blank(self.google_maps_url.as_deref())
    }
}

/// One generated caption and its hashtags, in model output order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptionVariant {
    #[serde(default, deserialize_with = "lenient_caption")]
    pub caption: String,
    #[serde(default, deserialize_with = "lenient_hashtags")]
    pub hashtags: Vec<String>,
}

impl CaptionVariant {
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            caption: text.into(),
            hashtags: Vec::new(),
        }
    }
}

/// All generated variants, keyed by platform in request order.
pub type CaptionBundle = IndexMap<String, Vec<CaptionVariant>>;

/// One day of the posting plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulePlanItem {
    pub date: String,
    pub platforms: Vec<String>,
    pub idea: String,
    pub caption: String,
}

/// `null` deserializes to the type's default, same as an absent field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts a JSON number or a numeric string; anything else becomes `None`.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let price = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(price.filter(|p| p.is_finite()))
}

/// Strings pass through; any other JSON value keeps its JSON text.
fn lenient_caption<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A sequence of strings; non-sequences become empty and non-string entries are dropped.
fn lenient_hashtags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

//! Caption generation across platforms.
//!
//! Each requested platform runs its own compile → generate → parse chain.
//! The chains run concurrently and share nothing, so a degraded or
//! unparseable result on one platform has no effect on the others. Results
//! are keyed by the platform key the caller asked for.

use crate::llm::{Generation, Sampling, TextGenerator};
use crate::parse::parse_captions;
use crate::prompt::{self, PromptInput, SYSTEM_COPYWRITER};
use crate::types::{CaptionBundle, CaptionVariant, Product, Shop, null_as_default};
use futures::future::join_all;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Sampling used for caption calls.
pub const CAPTION_SAMPLING: Sampling = Sampling {
    temperature: 0.8,
    max_tokens: 700,
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CaptionError {
    #[error("product name is required")]
    MissingProductName,
}

/// A caption request as accepted over the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptionRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub product: Product,
    #[serde(deserialize_with = "null_as_default")]
    pub shop: Shop,
    #[serde(deserialize_with = "tone_or_default")]
    pub tone: String,
    #[serde(deserialize_with = "platforms_or_default")]
    pub platforms: Vec<String>,
    pub wa_text_cta: bool,
}

impl Default for CaptionRequest {
    fn default() -> Self {
        Self {
            product: Product::default(),
            shop: Shop::default(),
            tone: prompt::DEFAULT_TONE.to_string(),
            platforms: default_platforms(),
            wa_text_cta: true,
        }
    }
}

pub fn default_platforms() -> Vec<String> {
    vec!["instagram".to_string(), "whatsapp".to_string()]
}

/// `null` platforms mean the default pair, same as an absent field.
pub fn platforms_or_default<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_else(default_platforms))
}

pub fn tone_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .unwrap_or_else(|| prompt::DEFAULT_TONE.to_string()))
}

/// Generate captions for every requested platform.
///
/// Rejects the request before any generator call when the product has no name.
/// A platform requested twice is generated once.
pub async fn generate_captions<G>(
    generator: &G,
    request: &CaptionRequest,
) -> Result<CaptionBundle, CaptionError>
where
    G: TextGenerator + ?Sized,
{
    if request.product.display_name().is_none() {
        return Err(CaptionError::MissingProductName);
    }

    let mut platforms: Vec<&str> = Vec::with_capacity(request.platforms.len());
    for platform in &request.platforms {
        if !platforms.contains(&platform.as_str()) {
            platforms.push(platform.as_str());
        }
    }

    let jobs = platforms
        .iter()
        .map(|platform| caption_platform(generator, request, platform));
    let results = join_all(jobs).await;

    Ok(platforms
        .into_iter()
        .map(str::to_string)
        .zip(results)
        .collect())
}

async fn caption_platform<G>(
    generator: &G,
    request: &CaptionRequest,
    platform: &str,
) -> Vec<CaptionVariant>
where
    G: TextGenerator + ?Sized,
{
    let user = prompt::compile(&PromptInput {
        product: &request.product,
        shop: &request.shop,
        tone: &request.tone,
        platform,
        wants_whatsapp_cta: request.wa_text_cta,
    });

    let generation = generator
        .generate(SYSTEM_COPYWRITER, &user, CAPTION_SAMPLING)
        .await;
    if let Generation::Degraded { cause, .. } = &generation {
        tracing::warn!(platform, ?cause, "caption generation degraded");
    }

    let parsed = parse_captions(generation.text());
    if parsed.is_fallback() {
        tracing::debug!(platform, "using raw model output as a single caption");
    }
    parsed.into_variants()
}

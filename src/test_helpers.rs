//! Shared test utilities for the larisin test suite.
//!
//! Provides request fixtures (a coffee stall and its best seller) and a
//! [`TextGenerator`] that records every call.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let generator = RecordingGenerator::new(|_| Generation::Text("[]".into()));
//! let bundle = generate_captions(&generator, &request).await.unwrap();
//! assert_eq!(generator.calls().len(), 1);
//! ```

use async_trait::async_trait;
use std::sync::Mutex;

use crate::config::LlmConfig;
use crate::llm::{Generation, Sampling, TextGenerator};
use crate::types::{Product, Shop};

// =========================================================================
// Fixtures
// =========================================================================

pub fn sample_product() -> Product {
    Product {
        name: Some("Kopi Susu Gula Aren".into()),
        category: Some("Minuman".into()),
        price: Some(18000.0),
        price_idr: None,
        benefits: Some("Manis gurih dari gula aren asli. Cocok untuk teman kerja sore.".into()),
        audience: Some("Pekerja kantoran dan mahasiswa".into()),
        photo_url: None,
    }
}

pub fn sample_shop() -> Shop {
    Shop {
        name: Some("Kedai Senja".into()),
        address: Some("Jl. Kaliurang Km 5, Yogyakarta".into()),
        whatsapp_e164: Some("6281234567890".into()),
        google_maps_url: Some("https://maps.app.goo.gl/senja".into()),
    }
}

/// LLM settings with no API key: the client never touches the network.
pub fn offline_llm_config() -> LlmConfig {
    LlmConfig {
        api_key: None,
        ..LlmConfig::default()
    }
}

// =========================================================================
// Recording generator
// =========================================================================

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub user: String,
    pub sampling: Sampling,
}

/// Answers each call with `respond(user_prompt)` and keeps a log of calls.
pub struct RecordingGenerator<F> {
    respond: F,
    calls: Mutex<Vec<RecordedCall>>,
}

impl<F> RecordingGenerator<F>
where
    F: Fn(&str) -> Generation + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> TextGenerator for RecordingGenerator<F>
where
    F: Fn(&str) -> Generation + Send + Sync,
{
    async fn generate(&self, system: &str, user: &str, sampling: Sampling) -> Generation {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            user: user.to_string(),
            sampling,
        });
        (self.respond)(user)
    }
}

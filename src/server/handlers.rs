use super::error::{ApiError, Result};
use super::extract::ApiJson;
use super::state::AppState;
use crate::caption::{CaptionRequest, generate_captions};
use crate::export::{ExportRequest, write_archive};
use crate::poster::{ColorPair, DEFAULT_THEME, PosterSpec};
use crate::render::{AspectTarget, RenderError, render_poster_files};
use crate::schedule::PlanRequest;
use crate::types::{CaptionBundle, Product, SchedulePlanItem, Shop, null_as_default};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub ok: bool,
    pub outputs: CaptionBundle,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PosterRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub product: Product,
    #[serde(deserialize_with = "null_as_default")]
    pub shop: Shop,
    pub theme: Option<String>,
    /// `[background, accent]`
    #[serde(deserialize_with = "null_as_default")]
    pub dominant_colors: Vec<String>,
    /// Absent means `["1:1"]`; an explicit empty list renders nothing.
    pub aspect_ratios: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct PosterResponse {
    pub ok: bool,
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub ok: bool,
    pub plan: Vec<SchedulePlanItem>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub ok: bool,
    pub url: String,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn generate_caption(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CaptionRequest>,
) -> Result<Json<CaptionResponse>> {
    tracing::info!(platforms = ?req.platforms, "caption request");
    let outputs = generate_captions(state.generator.as_ref(), &req).await?;
    Ok(Json(CaptionResponse { ok: true, outputs }))
}

pub async fn generate_poster(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<PosterRequest>,
) -> Result<Json<PosterResponse>> {
    let ratios = req
        .aspect_ratios
        .unwrap_or_else(|| vec![AspectTarget::Square.label().to_string()]);
    let spec = PosterSpec {
        theme: req.theme.unwrap_or_else(|| DEFAULT_THEME.to_string()),
        colors: ColorPair::from_list(&req.dominant_colors),
        product: req.product,
        shop: req.shop,
    };
    tracing::info!(ratios = ?ratios, "poster request");

    let renderer = state.renderer.clone();
    let outputs_dir = state.outputs_dir();
    let assets = tokio::task::spawn_blocking(move || {
        render_poster_files(renderer.as_ref(), &spec, &ratios, &outputs_dir)
    })
    .await
    .map_err(|e| RenderError::Task(e.to_string()))??;

    Ok(Json(PosterResponse {
        ok: true,
        files: assets.into_iter().map(|asset| asset.url).collect(),
    }))
}

pub async fn schedule_plan(ApiJson(req): ApiJson<PlanRequest>) -> Result<Json<PlanResponse>> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(PlanResponse {
        ok: true,
        plan: req.plan_from(today),
    }))
}

pub async fn export_zip(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ExportRequest>,
) -> Result<Json<ExportResponse>> {
    tracing::info!(files = req.files.len(), "export request");

    let public_dir = state.public_dir();
    let outputs_dir = state.outputs_dir();
    let archive =
        tokio::task::spawn_blocking(move || write_archive(&req, &public_dir, &outputs_dir))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(ExportResponse {
        ok: true,
        url: archive.url,
    }))
}

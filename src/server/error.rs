use crate::caption::CaptionError;
use crate::export::ExportError;
use crate::render::RenderError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Messages shown to users. Causes go to the log, never to the client.
pub const MSG_PRODUCT_NAME_REQUIRED: &str = "Nama produk wajib diisi";
pub const MSG_BAD_REQUEST: &str = "Format permintaan tidak valid";
pub const MSG_TOO_LARGE: &str = "Permintaan terlalu besar";
pub const MSG_RENDER_FAILED: &str = "Gagal render poster. Pastikan Chrome terpasang.";
pub const MSG_EXPORT_FAILED: &str = "Gagal membuat ZIP";
pub const MSG_INTERNAL: &str = "Terjadi kesalahan pada server";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid caption request: {0}")]
    Caption(#[from] CaptionError),

    #[error("Malformed request body: {0}")]
    BadRequest(#[from] JsonRejection),

    #[error("Poster rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Caption(CaptionError::MissingProductName) => {
                tracing::warn!("Rejected request: {}", self);
                (StatusCode::BAD_REQUEST, MSG_PRODUCT_NAME_REQUIRED)
            }
            Self::BadRequest(rejection)
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
            {
                tracing::warn!("Rejected request: {}", self);
                (StatusCode::PAYLOAD_TOO_LARGE, MSG_TOO_LARGE)
            }
            Self::BadRequest(_) => {
                tracing::warn!("Rejected request: {}", self);
                (StatusCode::BAD_REQUEST, MSG_BAD_REQUEST)
            }
            Self::Render(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_RENDER_FAILED)
            }
            Self::Export(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_EXPORT_FAILED)
            }
            Self::Internal(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
            }
        };

        let body = Json(json!({
            "ok": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

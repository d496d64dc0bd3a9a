use super::error::ApiError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejections answer in the API's `{ok:false,error}` shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Request extractors
///
/// [`ApiJson`] behaves like `axum::Json` but reports malformed bodies with
/// the standard JSON error response instead of axum's plain-text rejection.
/// [`ApiPath`] does the same for path parameters: an ID that does not parse
/// names no resource, so it is a 404.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body extractor with [`ApiError`] rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor with [`ApiError`] rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

// src/web/extract.rs
use crate::error::AppError;
use axum::extract::{FromRequestParts, Query};

/// `Query` cuja rejeição sai como `AppError` (corpo `{"erro": ...}`).
#[derive(FromRequestParts, Debug)]
#[from_request(via(Query), rejection(AppError))]
pub struct QueryValida<T>(pub T);

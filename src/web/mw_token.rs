// src/web/mw_token.rs
use crate::{error::AppError, state::AppState};
use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

pub const WEBHOOK_TOKEN_HEADER: &str = "x-webhook-token";

// ?token=... (o browser não consegue pôr headers no WebSocket)
#[derive(Deserialize, Debug)]
pub struct TokenQuery {
    token: Option<String>,
}

// Extrai o valor de "Authorization: Bearer <token>"
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Middleware das rotas /api e /painel: aceita o token no header Authorization
/// ou no parâmetro `token` da query.
pub async fn require_api_token(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let recebido = bearer_token(&headers).or(query.token.as_deref());

    match recebido {
        Some(token) if token == state.config.api_token => {
            tracing::trace!("Token MW: acesso concedido a {}", request.uri().path());
            Ok(next.run(request).await)
        }
        Some(_) => {
            tracing::warn!("Token MW: token inválido para {}", request.uri().path());
            Err(AppError::Unauthorized)
        }
        None => {
            tracing::debug!("Token MW: pedido sem token para {}", request.uri().path());
            Err(AppError::Unauthorized)
        }
    }
}

/// Middleware do webhook de entrada de leads (header `x-webhook-token`).
pub async fn require_webhook_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let recebido = headers
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if recebido == Some(state.config.webhook_token.as_str()) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Webhook MW: token ausente ou inválido, pedido recusado.");
        Err(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::bearer_token;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn bearer_token_le_so_o_esquema_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer segredo"));
        assert_eq!(bearer_token(&headers), Some("segredo"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }
}

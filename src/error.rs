// src/error.rs
use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use thiserror::Error;

/// Erros do domínio da roleta.
#[derive(Error, Debug)]
pub enum RoletaError {
    // Nem plantão nem corretores com roleta_ativa
    #[error("Nenhum corretor elegível para receber o lead")]
    SemCorretorElegivel,

    #[error("Lead não encontrado: {0}")]
    LeadNaoEncontrado(String),

    // Qualquer falha de acesso ao store; não há retry
    #[error("Erro no store da roleta: {0}")]
    Store(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuração inválida: {0}")]
    Config(String),

    #[error(transparent)]
    Roleta(#[from] RoletaError),

    #[error("Não encontrado: {0}")]
    NaoEncontrado(String),

    #[error("Requisição inválida: {0}")]
    RequisicaoInvalida(String),

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Não autorizado")]
    Unauthorized,
}

// Query string inválida (ex: ?etapa=arquivado) responde no mesmo formato JSON
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::RequisicaoInvalida(rejection.body_text())
    }
}

// Como converter AppError numa resposta HTTP (JSON)
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor
        tracing::error!("Erro processado: {:?}", self);

        let (status, mensagem): (StatusCode, String) = match self {
            AppError::SqlxError(_)
            | AppError::SqlxMigrateError(_)
            | AppError::Roleta(RoletaError::Store(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao aceder aos dados.".into(),
            ),
            AppError::EnvVarError(_) | AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro de configuração.".into())
            }
            AppError::Roleta(RoletaError::SemCorretorElegivel) => (
                StatusCode::CONFLICT,
                "Nenhum corretor disponível na roleta neste momento.".into(),
            ),
            AppError::Roleta(RoletaError::LeadNaoEncontrado(id)) => {
                (StatusCode::NOT_FOUND, format!("Lead '{}' não encontrado.", id))
            }
            AppError::NaoEncontrado(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::RequisicaoInvalida(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Não autorizado.".into()),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ocorreu um erro inesperado.".into(),
            ),
        };

        (status, Json(json!({ "erro": mensagem }))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

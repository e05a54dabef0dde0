// src/models/corretor.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Corretor visto pela roleta (não é o perfil completo do CRM).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Corretor {
    pub id: String,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    // Elegível para a roleta por defeito quando não há plantão para o dia/turno
    pub roleta_ativa: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NovoCorretorPayload {
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    #[serde(default)]
    pub roleta_ativa: bool,
}

#[derive(Debug, Deserialize)]
pub struct AlterarRoletaPayload {
    pub ativa: bool,
}

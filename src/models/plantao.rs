// src/models/plantao.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Entrada do planejamento de plantão: o corretor X está no turno Y no dia Z.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Plantao {
    pub id: i64,
    pub turno_id: i64,
    pub corretor_id: String,
    pub data: NaiveDate, // YYYY-MM-DD
    pub ordem: i64,
}

/// Linha de listagem com os nomes já resolvidos (JOIN).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlantaoDetalhado {
    pub id: i64,
    pub turno_id: i64,
    pub turno_nome: String,
    pub corretor_id: String,
    pub corretor_nome: String,
    pub data: NaiveDate,
    pub ordem: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlantaoPayload {
    pub turno_id: i64,
    pub corretor_id: String,
    pub data: NaiveDate,
    // Sem ordem explícita o corretor entra no fim da fila do dia
    pub ordem: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PlantaoQuery {
    pub data: NaiveDate,
    pub turno_id: Option<i64>,
}

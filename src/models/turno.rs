// src/models/turno.rs
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// --- Estruturas que espelham as Tabelas da DB ---

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Turno {
    pub id: i64,
    pub nome: String,
    pub hora_inicio: NaiveTime, // guardado como TEXT "HH:MM:SS"
    pub hora_fim: NaiveTime,
    pub ativo: bool,
    pub created_at: NaiveDateTime,
}

impl Turno {
    pub fn janela(&self) -> JanelaTurno {
        JanelaTurno::new(self.hora_inicio, self.hora_fim)
    }

    /// Um turno é "atual" se estiver ativo e a hora cair dentro da sua janela.
    pub fn cobre(&self, hora: NaiveTime) -> bool {
        self.ativo && self.janela().contains(hora)
    }
}

/// Intervalo de horário de um turno, fechado no início e aberto no fim.
///
/// Quando `inicio > fim` a janela atravessa a meia-noite (ex: 22:00 → 06:00).
/// Quando `inicio == fim` a janela é vazia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JanelaTurno {
    pub inicio: NaiveTime,
    pub fim: NaiveTime,
}

impl JanelaTurno {
    pub fn new(inicio: NaiveTime, fim: NaiveTime) -> Self {
        Self { inicio, fim }
    }

    pub fn atravessa_meia_noite(&self) -> bool {
        self.inicio > self.fim
    }

    pub fn contains(&self, hora: NaiveTime) -> bool {
        if self.atravessa_meia_noite() {
            hora >= self.inicio || hora < self.fim
        } else {
            hora >= self.inicio && hora < self.fim
        }
    }
}

/// Aceita "HH:MM" ou "HH:MM:SS".
pub fn parse_hora(valor: &str) -> Option<NaiveTime> {
    let valor = valor.trim();
    NaiveTime::parse_from_str(valor, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(valor, "%H:%M"))
        .ok()
}

// --- Payloads da API ---

#[derive(Debug, Deserialize)]
pub struct TurnoPayload {
    pub nome: String,
    pub hora_inicio: String,
    pub hora_fim: String,
    #[serde(default = "ativo_por_defeito")]
    pub ativo: bool,
}

fn ativo_por_defeito() -> bool {
    true
}

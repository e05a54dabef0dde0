// src/models/lead.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lead {
    pub id: String, // UUID
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub mensagem: Option<String>,
    pub canal: String, // 'manual', 'webhook', ou o nome da campanha
    pub responsavel_id: Option<String>,
    pub atribuido: bool,
    pub etapa: String, // ver EtapaLead
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Etapas do funil. `Novo` é a etapa inicial e também aquela para onde a
/// roleta devolve o lead ao atribuí-lo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtapaLead {
    Novo,
    EmAtendimento,
    Visita,
    Proposta,
    Fechado,
    Perdido,
}

impl EtapaLead {
    pub const TODAS: [EtapaLead; 6] = [
        EtapaLead::Novo,
        EtapaLead::EmAtendimento,
        EtapaLead::Visita,
        EtapaLead::Proposta,
        EtapaLead::Fechado,
        EtapaLead::Perdido,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EtapaLead::Novo => "novo",
            EtapaLead::EmAtendimento => "em_atendimento",
            EtapaLead::Visita => "visita",
            EtapaLead::Proposta => "proposta",
            EtapaLead::Fechado => "fechado",
            EtapaLead::Perdido => "perdido",
        }
    }
}

impl FromStr for EtapaLead {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EtapaLead::TODAS
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Etapa desconhecida: '{}'", s))
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize)]
pub struct NovoLeadPayload {
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub mensagem: Option<String>,
    pub canal: Option<String>,
    // Se true, o lead passa logo pela roleta (origem "manual")
    #[serde(default)]
    pub distribuir: bool,
}

/// Corpo enviado por formulários/portais externos para /webhook/leads.
#[derive(Debug, Deserialize)]
pub struct WebhookLeadPayload {
    pub nome: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub mensagem: Option<String>,
    pub campanha: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlterarEtapaPayload {
    pub etapa: EtapaLead,
}

#[derive(Debug, Deserialize)]
pub struct LeadsQuery {
    pub etapa: Option<EtapaLead>,
}

// src/models/rodada.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_SUCESSO: &str = "sucesso";

/// Uma rodada da roleta. Linha imutável: nunca é alterada nem apagada.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct RodadaDistribuicao {
    pub id: i64,
    pub corretor_id: String,
    pub lead_id: String,
    pub cliente: String, // rótulo de exibição (nome do lead)
    pub status: String,
    pub origem_disparo: String, // ver OrigemDisparo
    pub escopo: String,         // chave do escopo de rotação
    pub created_at: NaiveDateTime,
}

/// Quem disparou a distribuição.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrigemDisparo {
    Manual,
    Automatica,
    Webhook,
}

impl OrigemDisparo {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrigemDisparo::Manual => "manual",
            OrigemDisparo::Automatica => "automatica",
            OrigemDisparo::Webhook => "webhook",
        }
    }
}

/// Rodada com o nome do corretor, para o painel.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RodadaComCorretor {
    pub id: i64,
    pub corretor_id: String,
    pub corretor_nome: Option<String>,
    pub lead_id: String,
    pub cliente: String,
    pub origem_disparo: String,
    pub created_at: NaiveDateTime,
}

/// Contagem de leads recebidos por corretor num dia.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContagemCorretor {
    pub corretor_id: String,
    pub corretor_nome: Option<String>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct RodadasQuery {
    pub limite: Option<i64>,
}

/// Mensagem enviada pelo WebSocket do painel a cada rodada nova.
#[derive(Debug, Clone, Serialize)]
pub struct EventoRoleta {
    pub tipo: &'static str, // sempre "rodada"
    pub rodada: RodadaDistribuicao,
    // Nome para exibir no painel; None se o corretor já não existir
    pub corretor_nome: Option<String>,
}

impl EventoRoleta {
    pub fn nova_rodada(rodada: RodadaDistribuicao, corretor_nome: Option<String>) -> Self {
        Self { tipo: "rodada", rodada, corretor_nome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evento_leva_o_nome_do_corretor() {
        let rodada = RodadaDistribuicao {
            id: 7,
            corretor_id: "c-1".into(),
            lead_id: "l-1".into(),
            cliente: "Maria".into(),
            status: STATUS_SUCESSO.into(),
            origem_disparo: OrigemDisparo::Webhook.as_str().into(),
            escopo: "roleta_ativa".into(),
            created_at: NaiveDateTime::default(),
        };

        let json = serde_json::to_value(EventoRoleta::nova_rodada(rodada, Some("Ana".into()))).unwrap();
        assert_eq!(json["tipo"], "rodada");
        assert_eq!(json["corretor_nome"], "Ana");
        assert_eq!(json["rodada"]["corretor_id"], "c-1");
    }
}

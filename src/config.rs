// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr};

pub const BIND_ADDR_PADRAO: &str = "0.0.0.0:3000";
pub const DB_MAX_CONNECTIONS_PADRAO: u32 = 5;

/// Configuração lida do ambiente (e do .env, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    // Token das rotas /api e /painel (Bearer ou ?token=)
    pub api_token: String,
    // Token do webhook de entrada de leads; por defeito igual ao api_token
    pub webhook_token: String,
    // Se os leads vindos do webhook passam logo pela roleta
    pub roleta_automatica: bool,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| BIND_ADDR_PADRAO.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR inválido: {}", e)))?;

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|e| AppError::Config(format!("DB_MAX_CONNECTIONS inválido: {}", e)))?,
            Err(_) => DB_MAX_CONNECTIONS_PADRAO,
        };

        let api_token = env::var("API_TOKEN")?;
        if api_token.trim().is_empty() {
            return Err(AppError::Config("API_TOKEN não pode ser vazio".into()));
        }
        let webhook_token = env::var("WEBHOOK_TOKEN").unwrap_or_else(|_| api_token.clone());

        let roleta_automatica = match env::var("ROLETA_AUTOMATICA") {
            Ok(v) => parse_bool(&v).ok_or_else(|| {
                AppError::Config(format!("ROLETA_AUTOMATICA inválido: '{}'", v))
            })?,
            Err(_) => true,
        };

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            api_token,
            webhook_token,
            roleta_automatica,
        })
    }
}

fn parse_bool(valor: &str) -> Option<bool> {
    match valor.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "sim" | "on" => Some(true),
        "0" | "false" | "nao" | "não" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_bool;

    #[test]
    fn parse_bool_aceita_variantes_comuns() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" SIM "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("não"), Some(false));
        assert_eq!(parse_bool("talvez"), None);
    }
}

// src/web/mod.rs
pub mod corretor_handlers;
pub mod extract;
pub mod lead_handlers;
pub mod mw_token;
pub mod painel_handlers;
pub mod routes;
pub mod turno_handlers;
pub mod webhook_handlers;

// src/services/mod.rs
pub mod corretor_service;
pub mod lead_service;
pub mod painel_service;
pub mod roleta_service;
pub mod roleta_store;
pub mod turno_service;

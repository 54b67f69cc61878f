// src/lib.rs

use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod services;

use crate::config::AppState;

// Monta o router completo; o main só cuida do listener.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/api/leads", get(handlers::leads::list_leads))
        .route("/api/leads/salvar", post(handlers::leads::save_lead))
        .route("/api/leads/atualizar-estagio", post(handlers::leads::update_stage))
        .route("/api/leads/{codleed}", delete(handlers::leads::delete_lead))
        .route("/api/sankhya/parceiros", get(handlers::partners::list_partners))
        .with_state(app_state)
}

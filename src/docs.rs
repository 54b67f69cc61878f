// src/docs.rs

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::save_lead,
        handlers::leads::update_stage,
        handlers::leads::delete_lead,

        // --- Parceiros ---
        handlers::partners::list_partners,
    ),
    components(
        schemas(
            models::lead::LeadStage,
            models::lead::Lead,
            models::partner::Partner,
            models::partner::PartnerPage,
            handlers::leads::UpdateStagePayload,
        )
    ),
    tags(
        (name = "Leads", description = "Kanban de leads (dataset AD_LEEDS do Sankhya)"),
        (name = "Parceiros", description = "Busca de parceiros do Sankhya")
    )
)]
pub struct ApiDoc;

// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

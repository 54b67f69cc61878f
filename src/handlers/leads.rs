// src/handlers/leads.rs

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::lead::{Lead, LeadStage},
};

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Leads ativos (ATIVO = 'S')", body = Vec<Lead>),
        (status = 500, description = "Falha ao consultar o Sankhya")
    )
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list_leads().await;

    Ok((StatusCode::OK, Json(leads)))
}

// POST /api/leads/salvar
// Sem validação de schema: o corpo é um lead parcial, com ou sem CODLEED.
#[utoipa::path(
    post,
    path = "/api/leads/salvar",
    tag = "Leads",
    request_body = Lead,
    responses(
        (status = 200, description = "Lead criado ou atualizado", body = Lead),
        (status = 500, description = "Falha ao salvar")
    )
)]
pub async fn save_lead(
    State(app_state): State<AppState>,
    payload: Result<Json<Lead>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Corpo inválido também responde 500 com { error }
    let Json(lead) = payload.map_err(|e| AppError::InvalidPayload(e.body_text()))?;
    tracing::info!("📥 Salvando lead: {:?}", lead);

    let saved = app_state.lead_service.save_lead(lead).await?;

    Ok((StatusCode::OK, Json(saved)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStagePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "123")]
    pub cod_leed: String,

    #[schema(example = "Discovery")]
    pub novo_estagio: LeadStage,
}

// POST /api/leads/atualizar-estagio
#[utoipa::path(
    post,
    path = "/api/leads/atualizar-estagio",
    tag = "Leads",
    request_body = UpdateStagePayload,
    responses(
        (status = 200, description = "Estágio atualizado", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 500, description = "Falha ao atualizar")
    )
)]
pub async fn update_stage(
    State(app_state): State<AppState>,
    Json(payload): Json<UpdateStagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state.lead_service
        .update_stage(&payload.cod_leed, payload.novo_estagio)
        .await?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{codleed}
#[utoipa::path(
    delete,
    path = "/api/leads/{codleed}",
    tag = "Leads",
    params(
        ("codleed" = String, Path, description = "CODLEED do lead")
    ),
    responses(
        (status = 204, description = "Lead desativado (ATIVO = 'N')"),
        (status = 500, description = "Falha ao desativar")
    )
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    Path(codleed): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_service.soft_delete(&codleed).await?;

    Ok(StatusCode::NO_CONTENT)
}

// src/handlers/partners.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PartnerQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "invalid_page"))]
    pub page: u32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 200, message = "invalid_page_size"))]
    pub page_size: u32,

    pub search_name: Option<String>,
}

// GET /api/sankhya/parceiros
#[utoipa::path(
    get,
    path = "/api/sankhya/parceiros",
    tag = "Parceiros",
    params(PartnerQuery),
    responses(
        (status = 200, description = "Página de parceiros", body = crate::models::partner::PartnerPage),
        (status = 400, description = "Paginação inválida"),
        (status = 500, description = "Falha ao consultar o Sankhya")
    )
)]
pub async fn list_partners(
    State(app_state): State<AppState>,
    Query(query): Query<PartnerQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let page = app_state.partner_service
        .search_partners(query.page, query.page_size, query.search_name.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(page)))
}

// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use convert_case::{Case, Casing};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Todas as falhas vindas do Sankhya viram 500 com a mensagem em texto livre.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Login recusado ou resposta de login sem token
    #[error("Falha na autenticação Sankhya: {0}")]
    Authentication(String),

    // O Sankhya respondeu 401/403: o token em cache já foi descartado
    #[error("Sessão expirada. Tente novamente.")]
    SessionExpired,

    #[error("Falha na comunicação com a API Sankhya: {0}")]
    Communication(String),

    // O save funcionou, mas o registro não apareceu na recarga da lista
    #[error("Lead salvo, mas não encontrado na recarga: {0}")]
    LeadNotFoundAfterSave(String),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidPayload(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            // Retorna todos os detalhes da validação, com as chaves em
            // camelCase como o cliente enviou.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .map(|e| e.message.as_ref().map_or_else(|| e.code.to_string(), |m| m.to_string()))
                        .collect();
                    details.insert(field.to_string().to_case(Case::Camel), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // O resto colapsa em 500, sem código estruturado.
            ref e => {
                tracing::error!("🔥 Erro ao processar requisição: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

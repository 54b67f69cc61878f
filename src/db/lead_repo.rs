// src/db/lead_repo.rs

use serde_json::{json, Value};

use crate::{
    common::error::AppError,
    db::{
        record_mapper::{
            entities_of, has_more_results, leads_from_entities, load_records_payload, save_payload,
            WireFields, LEAD_ENTITY, LOAD_RECORDS_SERVICE, SAVE_SERVICE,
        },
        SankhyaClient,
    },
    models::lead::Lead,
};

const LEAD_FIELDSET: &str =
    "NOME, DESCRICAO, VALOR, ESTAGIO, DATA_VENCIMENTO, TIPO_TAG, COR_TAG, CODPARC, ATIVO, DATA_CRIACAO, DATA_ATUALIZACAO";

// Teto de páginas do loadRecords numa única listagem
const MAX_PAGES: u32 = 100;

// O repositório de leads: todas as interações com o dataset AD_LEEDS
#[derive(Clone)]
pub struct LeadRepository {
    client: SankhyaClient,
}

impl LeadRepository {
    pub fn new(client: SankhyaClient) -> Self {
        Self { client }
    }

    // Busca todos os leads com ATIVO = 'S', página por página
    pub async fn find_active(&self) -> Result<Vec<Lead>, AppError> {
        let criteria = json!({ "expression": { "$": "ATIVO = 'S'" } });
        let mut leads = Vec::new();

        for page in 0..MAX_PAGES {
            let payload = load_records_payload(LEAD_ENTITY, LEAD_FIELDSET, Some(criteria.clone()), page);
            let response = self.client.call_service(LOAD_RECORDS_SERVICE, &payload).await?;
            tracing::debug!("📥 Resposta da consulta (página {}): {}", page, response);

            let Some(entities) = entities_of(&response) else {
                tracing::warn!("⚠️ Resposta sem responseBody.entities");
                break;
            };

            leads.extend(leads_from_entities(entities));

            if !has_more_results(entities) {
                break;
            }
        }

        Ok(leads)
    }

    // Grava um registro no AD_LEEDS (criação, atualização ou exclusão lógica)
    pub async fn save(&self, wire: &WireFields) -> Result<Value, AppError> {
        let payload = save_payload(LEAD_ENTITY, wire);
        tracing::info!("📤 Salvando lead: {}", payload);

        let response = self.client.call_service(SAVE_SERVICE, &payload).await.inspect_err(|e| {
            tracing::error!("❌ Erro ao salvar lead: {} payload={}", e, payload);
        })?;

        tracing::info!("✅ Lead salvo com sucesso");
        Ok(response)
    }
}

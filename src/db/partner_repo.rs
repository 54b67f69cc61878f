// src/db/partner_repo.rs

use serde_json::json;

use crate::{
    common::error::AppError,
    db::{
        record_mapper::{entities_of, has_more_results, load_records_payload, to_domain, LOAD_RECORDS_SERVICE},
        SankhyaClient,
    },
    models::partner::Partner,
};

const PARTNER_ENTITY: &str = "Parceiro";
const PARTNER_KEY: &str = "CODPARC";
const PARTNER_FIELDSET: &str = "CODPARC, NOMEPARC, CGC_CPF";

/// Linhas por página do `loadRecords` (fixo no Sankhya).
pub const ERP_PAGE_SIZE: usize = 50;

#[derive(Clone)]
pub struct PartnerRepository {
    client: SankhyaClient,
}

impl PartnerRepository {
    pub fn new(client: SankhyaClient) -> Self {
        Self { client }
    }

    // Uma página do loadRecords de parceiros, opcionalmente filtrada pelo nome,
    // junto com o `hasMoreResult`.
    // O termo vai como parâmetro do critério, nunca concatenado na expressão.
    pub async fn search(&self, name: Option<&str>, offset_page: u32) -> Result<(Vec<Partner>, bool), AppError> {
        let criteria = name.map(|term| {
            json!({
                "expression": { "$": "NOMEPARC LIKE ?" },
                "parameter": [{ "$": format!("%{}%", term.to_uppercase()), "type": "S" }]
            })
        });

        let payload = load_records_payload(PARTNER_ENTITY, PARTNER_FIELDSET, criteria, offset_page);
        let response = self.client.call_service(LOAD_RECORDS_SERVICE, &payload).await?;

        Ok(entities_of(&response)
            .map(|entities| (to_domain(entities, &[PARTNER_KEY]), has_more_results(entities)))
            .unwrap_or_default())
    }
}

// src/models/partner.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::lead::lenient_string;

// Parceiro (cliente) do Sankhya, só leitura: alimenta o seletor do formulário.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub struct Partner {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "42")]
    pub codparc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "ACME LTDA")]
    pub nomeparc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "12345678000199")]
    pub cgc_cpf: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerPage {
    pub parceiros: Vec<Partner>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 50)]
    pub page_size: u32,
}

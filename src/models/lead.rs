// src/models/lead.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// --- ENUMS ---

// Colunas do kanban
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
pub enum LeadStage {
    #[default]
    Leads,
    Discovery,
    Demo,
    Won,
}

impl LeadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStage::Leads => "Leads",
            LeadStage::Discovery => "Discovery",
            LeadStage::Demo => "Demo",
            LeadStage::Won => "Won",
        }
    }
}

// --- LEAD (registro do AD_LEEDS) ---

// Todos os campos são opcionais: o mesmo tipo serve de "lead parcial" no POST
// e campos ausentes no Sankhya não aparecem no JSON de saída.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "123")]
    pub codleed: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "Acme")]
    pub nome: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub descricao: Option<String>,

    // O Sankhya devolve números como texto ("1500.50"); aceitamos os dois.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_decimal")]
    #[schema(example = "1500.50")]
    pub valor: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_stage")]
    pub estagio: Option<LeadStage>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "2024-01-10")]
    pub data_vencimento: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "Web Design")]
    pub tipo_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "#3b82f6")]
    pub cor_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    #[schema(example = "42")]
    pub codparc: Option<String>,

    // "S" ativo / "N" excluído (soft delete)
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub ativo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub data_criacao: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub data_atualizacao: Option<String>,
}

impl Lead {
    // Sem CODLEED (ou com CODLEED vazio) é criação.
    pub fn key(&self) -> Option<&str> {
        self.codleed.as_deref().filter(|k| !k.is_empty())
    }
}

// Os desserializadores abaixo nunca falham: um campo que não converte vira
// ausente (com aviso) e o resto do registro é mantido.

// Aceita string, número ou booleano e guarda como texto.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            tracing::warn!("⚠️ Campo de texto ignorado: {}", other);
            None
        }
    })
}

// Número ou texto numérico, sem passar por f64; texto vazio vira ausente.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    };

    if text.is_empty() {
        return Ok(None);
    }

    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(valor) => Ok(Some(valor)),
        Err(_) => {
            tracing::warn!("⚠️ VALOR inválido ignorado: {}", text);
            Ok(None)
        }
    }
}

// Estágio fora das colunas do kanban vira ausente.
pub(crate) fn lenient_stage<'de, D>(deserializer: D) -> Result<Option<LeadStage>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => match serde_json::from_value::<LeadStage>(raw.clone()) {
            Ok(stage) => Ok(Some(stage)),
            Err(_) => {
                tracing::warn!("⚠️ ESTAGIO desconhecido ignorado: {}", raw);
                Ok(None)
            }
        },
    }
}

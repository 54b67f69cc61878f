// src/db/record_mapper.rs
//
// Tradução entre o formato de registro do Sankhya e os nossos modelos.
//
// Leitura: `metadata.fields.field` traz a lista ordenada de nomes e cada
// `entity` traz as chaves posicionais `f0`, `f1`, ... (mais a chave primária
// literal), com o valor embrulhado em `{ "$": valor }`.
//
// Escrita: `DatasetSP.save` recebe `fields` e um `values` indexado pela
// posição (em texto) dentro de `fields`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Map, Value};

use crate::models::lead::{Lead, LeadStage};

pub const LEAD_ENTITY: &str = "AD_LEEDS";
pub const LEAD_KEY: &str = "CODLEED";

pub const LOAD_RECORDS_SERVICE: &str = "CRUDServiceProvider.loadRecords";
pub const SAVE_SERVICE: &str = "DatasetSP.save";

const DEFAULT_TAG_COLOR: &str = "#3b82f6";

// Campos gravados numa atualização, na ordem do `fields` (índice 0 é a chave).
const UPDATE_FIELDS: [&str; 9] = [
    "CODLEED",
    "NOME",
    "DESCRICAO",
    "VALOR",
    "ESTAGIO",
    "DATA_VENCIMENTO",
    "TIPO_TAG",
    "COR_TAG",
    "DATA_ATUALIZACAO",
];

// Campos gravados numa criação: o Sankhya gera o CODLEED.
const CREATE_FIELDS: [&str; 11] = [
    "NOME",
    "DESCRICAO",
    "VALOR",
    "ESTAGIO",
    "DATA_VENCIMENTO",
    "TIPO_TAG",
    "COR_TAG",
    "CODPARC",
    "ATIVO",
    "DATA_CRIACAO",
    "DATA_ATUALIZACAO",
];

// =============================================================================
//  LEITURA
// =============================================================================

/// `responseBody.entities` de uma resposta do `loadRecords`.
pub fn entities_of(response: &Value) -> Option<&Value> {
    response.get("responseBody")?.get("entities")
}

/// O Sankhya pagina o `loadRecords`; `hasMoreResult` vem como texto.
pub fn has_more_results(entities: &Value) -> bool {
    match entities.get("hasMoreResult") {
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

fn field_names(entities: &Value) -> Vec<String> {
    let descriptors = match entities.pointer("/metadata/fields/field") {
        Some(Value::Array(list)) => list.iter().collect::<Vec<_>>(),
        // Com um campo só o Sankhya manda um objeto em vez de lista
        Some(single @ Value::Object(_)) => vec![single],
        _ => Vec::new(),
    };

    descriptors
        .into_iter()
        .map(|d| d.get("name").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect()
}

// `{ "$": v }` -> v. Objeto sem `$` é campo nulo e fica de fora.
fn unwrap_value(raw: &Value) -> Option<Value> {
    match raw {
        Value::Object(obj) => obj.get("$").cloned(),
        Value::Null => None,
        other => Some(other.clone()),
    }
}

/// Junta nomes e chaves posicionais de cada entidade num objeto plano.
/// Chaves posicionais ausentes são omitidas; sem `entity` a lista é vazia.
pub fn flatten_entities(entities: &Value, key_fields: &[&str]) -> Vec<Map<String, Value>> {
    let raw_entities = match entities.get("entity") {
        Some(Value::Array(list)) => list.iter().collect::<Vec<_>>(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => return Vec::new(),
    };

    let names = field_names(entities);

    raw_entities
        .into_iter()
        .map(|raw| {
            let mut clean = Map::new();

            // 1. Chave primária vem com o nome literal
            for key in key_fields {
                if let Some(value) = raw.get(*key).and_then(unwrap_value) {
                    clean.insert((*key).to_string(), value);
                }
            }

            // 2. f0..fN na ordem do metadata
            for (i, name) in names.iter().enumerate() {
                if let Some(value) = raw.get(format!("f{i}")).and_then(unwrap_value) {
                    clean.insert(name.clone(), value);
                }
            }

            clean
        })
        .collect()
}

/// Converte as entidades no tipo de domínio. Os modelos tratam campo a campo
/// o que não converte; só um registro que nem chega a ser objeto é descartado.
pub fn to_domain<T: DeserializeOwned>(entities: &Value, key_fields: &[&str]) -> Vec<T> {
    flatten_entities(entities, key_fields)
        .into_iter()
        .filter_map(|record| {
            let raw = Value::Object(record);
            match serde_json::from_value::<T>(raw.clone()) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("⚠️ Registro ignorado ({}): {}", e, raw);
                    None
                }
            }
        })
        .collect()
}

pub fn leads_from_entities(entities: &Value) -> Vec<Lead> {
    to_domain(entities, &[LEAD_KEY])
}

/// Corpo do `CRUDServiceProvider.loadRecords`.
pub fn load_records_payload(root_entity: &str, fieldset: &str, criteria: Option<Value>, offset_page: u32) -> Value {
    let mut data_set = json!({
        "rootEntity": root_entity,
        "includePresentationFields": "S",
        "offsetPage": offset_page.to_string(),
        "entity": {
            "fieldset": { "list": fieldset }
        }
    });

    if let Some(criteria) = criteria {
        data_set["criteria"] = criteria;
    }

    json!({ "requestBody": { "dataSet": data_set } })
}

// =============================================================================
//  ESCRITA
// =============================================================================

/// Um registro pronto para o `DatasetSP.save`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireFields {
    pub fields: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pk: Option<BTreeMap<String, String>>,
    pub values: BTreeMap<String, String>,
}

impl WireFields {
    fn keyed(key: &str, fields: Vec<&'static str>, values: BTreeMap<String, String>) -> Self {
        let pk = BTreeMap::from([(LEAD_KEY.to_string(), key.to_string())]);
        Self { fields, pk: Some(pk), values }
    }

    /// `{ pk?, values }`, o item de `records`.
    pub fn record(&self) -> Value {
        let mut record = json!({ "values": self.values });
        if let Some(pk) = &self.pk {
            record["pk"] = json!(pk);
        }
        record
    }
}

/// `YYYY-MM-DD` -> `DD/MM/YYYY` só quebrando o texto, sem validar a data.
/// Texto fora desse formato passa sem alteração.
pub fn format_wire_date(iso: &str) -> String {
    let parts: Vec<&str> = iso.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => iso.to_string(),
    }
}

pub fn wire_today(today: NaiveDate) -> String {
    format_wire_date(&today.format("%Y-%m-%d").to_string())
}

// Mantém a escala lida do Sankhya ("1500.50" volta como "1500.50").
fn format_valor(valor: Option<Decimal>) -> String {
    match valor {
        Some(v) if !v.is_zero() => v.to_string(),
        _ => "0".to_string(),
    }
}

fn text_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(default)
}

/// Layout de atualização (com `pk`) ou de criação (sem `pk`), conforme o CODLEED.
pub fn to_wire_fields(lead: &Lead, today: NaiveDate) -> WireFields {
    let current_date = wire_today(today);

    let vencimento = lead
        .data_vencimento
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(format_wire_date)
        .unwrap_or_default();

    let mut columns = vec![
        text_or(&lead.nome, "").to_string(),
        text_or(&lead.descricao, "").to_string(),
        format_valor(lead.valor),
        lead.estagio.unwrap_or_default().as_str().to_string(),
        vencimento,
        text_or(&lead.tipo_tag, "").to_string(),
        text_or(&lead.cor_tag, DEFAULT_TAG_COLOR).to_string(),
    ];

    match lead.key() {
        Some(key) => {
            columns.push(current_date);
            // O índice 0 é o próprio CODLEED e fica no `pk`
            WireFields::keyed(key, UPDATE_FIELDS.to_vec(), indexed(1, columns))
        }
        None => {
            columns.push(text_or(&lead.codparc, "").to_string());
            columns.push("S".to_string());
            columns.push(current_date.clone());
            columns.push(current_date);
            WireFields {
                fields: CREATE_FIELDS.to_vec(),
                pk: None,
                values: indexed(0, columns),
            }
        }
    }
}

/// Grava só o estágio (arrastar e soltar no kanban).
pub fn stage_update_fields(lead_id: &str, stage: LeadStage, today: NaiveDate) -> WireFields {
    WireFields::keyed(
        lead_id,
        vec![LEAD_KEY, "ESTAGIO", "DATA_ATUALIZACAO"],
        indexed(1, vec![stage.as_str().to_string(), wire_today(today)]),
    )
}

/// Soft delete: o registro continua no Sankhya com ATIVO = "N".
pub fn soft_delete_fields(lead_id: &str, today: NaiveDate) -> WireFields {
    WireFields::keyed(
        lead_id,
        vec![LEAD_KEY, "ATIVO", "DATA_ATUALIZACAO"],
        indexed(1, vec!["N".to_string(), wire_today(today)]),
    )
}

fn indexed(start: usize, columns: Vec<String>) -> BTreeMap<String, String> {
    columns
        .into_iter()
        .enumerate()
        .map(|(i, value)| ((start + i).to_string(), value))
        .collect()
}

/// Envelope completo do `DatasetSP.save`.
pub fn save_payload(entity_name: &str, wire: &WireFields) -> Value {
    json!({
        "serviceName": SAVE_SERVICE,
        "requestBody": {
            "entityName": entity_name,
            "standAlone": false,
            "fields": wire.fields,
            "records": [wire.record()]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn lead_envelope(entity: Value) -> Value {
        let names = [
            "NOME", "DESCRICAO", "VALOR", "ESTAGIO", "DATA_VENCIMENTO", "TIPO_TAG",
            "COR_TAG", "CODPARC", "ATIVO", "DATA_CRIACAO", "DATA_ATUALIZACAO",
        ];
        json!({
            "total": "1",
            "hasMoreResult": "false",
            "metadata": {
                "fields": { "field": names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>() }
            },
            "entity": entity
        })
    }

    fn full_entity() -> Value {
        json!({
            "CODLEED": { "$": "123" },
            "f0": { "$": "Acme" },
            "f1": { "$": "Site novo" },
            "f2": { "$": "500" },
            "f3": { "$": "Demo" },
            "f4": { "$": "10/01/2024" },
            "f5": { "$": "Web Design" },
            "f6": { "$": "#ff0000" },
            "f7": { "$": "42" },
            "f8": { "$": "S" },
            "f9": { "$": "01/01/2024" },
            "f10": { "$": "02/01/2024" }
        })
    }

    #[test]
    fn converts_iso_dates_to_wire_format() {
        assert_eq!(format_wire_date("2024-03-05"), "05/03/2024");
        assert_eq!(wire_today(day()), "05/03/2024");
    }

    #[test]
    fn non_iso_dates_pass_through() {
        assert_eq!(format_wire_date("10/01/2024"), "10/01/2024");
        assert_eq!(format_wire_date(""), "");
    }

    #[test]
    fn date_conversion_is_not_calendar_aware() {
        assert_eq!(format_wire_date("2024-02-31"), "31/02/2024");
    }

    #[test]
    fn zips_field_names_with_positional_keys() {
        let leads = leads_from_entities(&lead_envelope(full_entity()));

        assert_eq!(leads.len(), 1);
        let lead = &leads[0];
        assert_eq!(lead.codleed.as_deref(), Some("123"));
        assert_eq!(lead.nome.as_deref(), Some("Acme"));
        assert_eq!(lead.valor, Some(Decimal::from(500)));
        assert_eq!(lead.estagio, Some(LeadStage::Demo));
        assert_eq!(lead.codparc.as_deref(), Some("42"));
        assert_eq!(lead.data_atualizacao.as_deref(), Some("02/01/2024"));
    }

    #[test]
    fn missing_positional_keys_are_omitted() {
        let entity = json!({
            "CODLEED": { "$": "9" },
            "f0": { "$": "Sem descrição" },
            "f3": { "$": "Leads" },
            "f5": {}
        });
        let flat = flatten_entities(&lead_envelope(entity), &[LEAD_KEY]);

        assert_eq!(flat.len(), 1);
        assert_eq!(
            Value::Object(flat[0].clone()),
            json!({ "CODLEED": "9", "NOME": "Sem descrição", "ESTAGIO": "Leads" })
        );
    }

    #[test]
    fn single_entity_object_is_a_one_element_list() {
        let leads = leads_from_entities(&lead_envelope(full_entity()));
        assert_eq!(leads.len(), 1);

        let many = leads_from_entities(&lead_envelope(json!([full_entity(), full_entity()])));
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn envelope_without_entity_is_empty() {
        let envelope = json!({ "total": "0", "metadata": { "fields": { "field": [] } } });
        assert!(leads_from_entities(&envelope).is_empty());
    }

    #[test]
    fn records_with_bad_fields_are_kept() {
        let mut bad = full_entity();
        bad["f2"] = json!({ "$": "quinhentos" });
        bad["f3"] = json!({ "$": "Lost" });
        let leads = leads_from_entities(&lead_envelope(json!([bad, full_entity()])));

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].codleed.as_deref(), Some("123"));
        assert_eq!(leads[0].nome.as_deref(), Some("Acme"));
        assert_eq!(leads[0].valor, None);
        assert_eq!(leads[0].estagio, None);
    }

    #[test]
    fn single_field_metadata_is_an_object() {
        let envelope = json!({
            "metadata": { "fields": { "field": { "name": "NOME" } } },
            "entity": { "CODLEED": { "$": "3" }, "f0": { "$": "Solo" } }
        });
        let flat = flatten_entities(&envelope, &[LEAD_KEY]);

        assert_eq!(flat.len(), 1);
        assert_eq!(Value::Object(flat[0].clone()), json!({ "CODLEED": "3", "NOME": "Solo" }));
    }

    #[test]
    fn valor_text_survives_read_then_write() {
        for text in ["12345678901234567.89", "1500.50", "500"] {
            let mut entity = full_entity();
            entity["f2"] = json!({ "$": text });
            let lead = leads_from_entities(&lead_envelope(entity)).remove(0);

            let wire = to_wire_fields(&lead, day());
            assert_eq!(wire.values["3"], text);
        }
    }

    #[test]
    fn create_layout_has_no_pk_and_indices_0_to_10() {
        let lead = Lead {
            nome: Some("Acme".into()),
            valor: Some(Decimal::from(500)),
            estagio: Some(LeadStage::Leads),
            data_vencimento: Some("2024-01-10".into()),
            tipo_tag: Some("Web Design".into()),
            cor_tag: Some("#3b82f6".into()),
            codparc: Some("42".into()),
            ..Default::default()
        };
        let wire = to_wire_fields(&lead, day());

        assert_eq!(wire.pk, None);
        let keys: std::collections::BTreeSet<usize> = wire.values.keys().map(|k| k.parse().unwrap()).collect();
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), (0..=10).collect::<Vec<_>>());
        assert_eq!(wire.fields, CREATE_FIELDS.to_vec());

        assert_eq!(wire.values["0"], "Acme");
        assert_eq!(wire.values["2"], "500");
        assert_eq!(wire.values["4"], "10/01/2024");
        assert_eq!(wire.values["7"], "42");
        assert_eq!(wire.values["8"], "S");
        assert_eq!(wire.values["9"], "05/03/2024");
        assert_eq!(wire.values["10"], "05/03/2024");

        let payload = save_payload(LEAD_ENTITY, &wire);
        assert!(payload["requestBody"]["records"][0].get("pk").is_none());
    }

    #[test]
    fn update_layout_has_pk_and_indices_1_to_8() {
        let lead = Lead {
            codleed: Some("123".into()),
            nome: Some("Acme".into()),
            ..Default::default()
        };
        let wire = to_wire_fields(&lead, day());

        let pk = wire.pk.as_ref().unwrap();
        assert_eq!(pk["CODLEED"], "123");
        let keys: std::collections::BTreeSet<usize> = wire.values.keys().map(|k| k.parse().unwrap()).collect();
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());
        assert_eq!(wire.values["8"], "05/03/2024");

        let payload = save_payload(LEAD_ENTITY, &wire);
        assert_eq!(payload["requestBody"]["records"][0]["pk"]["CODLEED"], "123");
        assert_eq!(payload["requestBody"]["entityName"], "AD_LEEDS");
        assert_eq!(payload["requestBody"]["standAlone"], false);
    }

    #[test]
    fn absent_values_get_the_form_defaults() {
        let wire = to_wire_fields(&Lead::default(), day());

        assert_eq!(wire.values["0"], "");
        assert_eq!(wire.values["2"], "0");
        assert_eq!(wire.values["3"], "Leads");
        assert_eq!(wire.values["4"], "");
        assert_eq!(wire.values["6"], "#3b82f6");
        // Sem parceiro grava referência vazia
        assert_eq!(wire.values["7"], "");
    }

    #[test]
    fn read_then_write_preserves_envelope_values() {
        let entity = full_entity();
        let lead = leads_from_entities(&lead_envelope(entity.clone())).remove(0);
        let wire = to_wire_fields(&lead, day());

        assert_eq!(wire.pk.as_ref().unwrap()["CODLEED"], "123");
        // values "1".."7" seguem f0..f6; "8" é a DATA_ATUALIZACAO regenerada
        for i in 0..7 {
            assert_eq!(
                entity[format!("f{i}")]["$"].as_str().unwrap(),
                wire.values[&(i + 1).to_string()],
                "campo f{i}"
            );
        }

        // Sem a chave, o caminho de criação também leva o parceiro
        let mut unsaved = lead.clone();
        unsaved.codleed = None;
        let wire = to_wire_fields(&unsaved, day());
        for i in 0..8 {
            assert_eq!(entity[format!("f{i}")]["$"].as_str().unwrap(), wire.values[&i.to_string()]);
        }
    }

    #[test]
    fn stage_and_delete_write_only_their_columns() {
        let stage = stage_update_fields("77", LeadStage::Won, day());
        assert_eq!(stage.fields, vec!["CODLEED", "ESTAGIO", "DATA_ATUALIZACAO"]);
        assert_eq!(stage.values["1"], "Won");
        assert_eq!(stage.values["2"], "05/03/2024");

        let delete = soft_delete_fields("77", day());
        assert_eq!(delete.pk.as_ref().unwrap()["CODLEED"], "77");
        assert_eq!(delete.values["1"], "N");
        assert_eq!(delete.values.len(), 2);
    }

    #[test]
    fn load_payload_carries_criteria_and_page() {
        let payload = load_records_payload(
            LEAD_ENTITY,
            "NOME, ATIVO",
            Some(json!({ "expression": { "$": "ATIVO = 'S'" } })),
            2,
        );
        let data_set = &payload["requestBody"]["dataSet"];
        assert_eq!(data_set["rootEntity"], "AD_LEEDS");
        assert_eq!(data_set["offsetPage"], "2");
        assert_eq!(data_set["criteria"]["expression"]["$"], "ATIVO = 'S'");
    }

    #[test]
    fn reads_has_more_result_flag() {
        assert!(has_more_results(&json!({ "hasMoreResult": "true" })));
        assert!(!has_more_results(&json!({ "hasMoreResult": "false" })));
        assert!(!has_more_results(&json!({})));
    }
}

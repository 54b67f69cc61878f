// tests/common/mod.rs
//
// ERP falso (wiremock) e helpers para disparar requisições no Router.

#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use leads_backend::{
    config::{AppState, SankhyaConfig},
    create_router,
    db::record_mapper::{wire_today, LOAD_RECORDS_SERVICE, SAVE_SERVICE},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockBuilder, MockServer, ResponseTemplate,
};

pub const SERVICE_PATH: &str = "/gateway/v1/mge/service.sbr";

pub fn sankhya_config(server: &MockServer) -> SankhyaConfig {
    SankhyaConfig {
        base_url: server.uri(),
        token: "token-fixo".to_string(),
        appkey: "app-key".to_string(),
        username: "integracao@empresa.com.br".to_string(),
        password: "senha".to_string(),
        login_timeout: Duration::from_secs(5),
    }
}

pub fn app(server: &MockServer) -> Router {
    let state = AppState::from_config(sankhya_config(server)).unwrap();
    create_router(state)
}

pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("appkey", "app-key"))
        .and(header("username", "integracao@empresa.com.br"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bearerToken": token })))
        .mount(server)
        .await;
}

pub fn service(name: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(SERVICE_PATH))
        .and(query_param("serviceName", name))
}

pub fn load_records() -> MockBuilder {
    service(LOAD_RECORDS_SERVICE)
}

pub fn save() -> MockBuilder {
    service(SAVE_SERVICE)
}

pub fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn lead_entity(codleed: &str, nome: &str, estagio: &str) -> Value {
    json!({
        "CODLEED": { "$": codleed },
        "f0": { "$": nome },
        "f1": { "$": format!("Descrição de {nome}") },
        "f2": { "$": "500" },
        "f3": { "$": estagio },
        "f4": { "$": "10/01/2024" },
        "f5": { "$": "Web Design" },
        "f6": { "$": "#3b82f6" },
        "f7": { "$": "42" },
        "f8": { "$": "S" },
        "f9": { "$": "01/01/2024" },
        "f10": { "$": "01/01/2024" }
    })
}

pub fn lead_fields() -> Value {
    let names = [
        "NOME", "DESCRICAO", "VALOR", "ESTAGIO", "DATA_VENCIMENTO", "TIPO_TAG",
        "COR_TAG", "CODPARC", "ATIVO", "DATA_CRIACAO", "DATA_ATUALIZACAO",
    ];
    json!({ "fields": { "field": names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>() } })
}

// Resposta completa do loadRecords com os leads informados
pub fn leads_response(entities: Vec<Value>) -> Value {
    json!({
        "serviceName": LOAD_RECORDS_SERVICE,
        "status": "1",
        "responseBody": {
            "entities": {
                "total": entities.len().to_string(),
                "hasMoreResult": "false",
                "offsetPage": "0",
                "metadata": lead_fields(),
                "entity": entities
            }
        }
    })
}

pub fn save_ok() -> ResponseTemplate {
    ok_json(json!({ "serviceName": SAVE_SERVICE, "status": "1", "responseBody": { "result": [["1"]] } }))
}

pub fn today() -> String {
    wire_today(Utc::now().date_naive())
}

// Corpos JSON recebidos pelo ERP falso para um serviceName
pub async fn received_bodies(server: &MockServer, service_name: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| {
            r.url
                .query_pairs()
                .any(|(k, v)| k == "serviceName" && v == service_name)
        })
        .map(|r| r.body_json::<Value>().unwrap())
        .collect()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// src/db/sankhya_client.rs

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use crate::{common::error::AppError, config::SankhyaConfig, db::TokenCache};

// Cliente autenticado da API do Sankhya.
// O token de login fica no `TokenCache`; um 401/403 o descarta.
#[derive(Clone)]
pub struct SankhyaClient {
    http: reqwest::Client,
    config: Arc<SankhyaConfig>,
    tokens: TokenCache,
}

impl SankhyaClient {
    pub fn new(config: SankhyaConfig, tokens: TokenCache) -> anyhow::Result<Self> {
        // Sem timeout global: só o login tem um (aplicado por requisição).
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            tokens,
        })
    }

    /// Devolve o bearer token em cache ou faz login para obter um novo.
    ///
    /// Duas requisições concorrentes sem token podem logar as duas vezes;
    /// o último token gravado vence, e ambos são válidos para o Sankhya.
    pub async fn authenticate(&self) -> Result<String, AppError> {
        if let Some(token) = self.tokens.get().await {
            return Ok(token);
        }

        match self.login().await {
            Ok(token) => {
                self.tokens.set(token.clone()).await;
                tracing::info!("🔑 Autenticado no Sankhya");
                Ok(token)
            }
            Err(e) => {
                self.tokens.invalidate().await;
                tracing::error!("🔥 {}", e);
                Err(e)
            }
        }
    }

    async fn login(&self) -> Result<String, AppError> {
        let response = self.http
            .post(self.config.login_url())
            .timeout(self.config.login_timeout)
            .header("token", &self.config.token)
            .header("appkey", &self.config.appkey)
            .header("username", &self.config.username)
            .header("password", &self.config.password)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Authentication(format!("login respondeu {status}: {body}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        extract_token(&body).ok_or_else(|| {
            AppError::Authentication("Token não encontrado na resposta de login.".to_string())
        })
    }

    /// Chamada autenticada genérica. Não existe retry: um 401/403 limpa o
    /// token e devolve `SessionExpired` para quem chamou tentar de novo.
    pub async fn request(&self, method: Method, url: &str, body: &Value) -> Result<Value, AppError> {
        let token = self.authenticate().await?;

        let response = self.http
            .request(method.clone(), url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("❌ Erro na requisição Sankhya: url={} method={} error={}", url, method, e);
                AppError::Communication(json!(e.to_string()).to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.tokens.invalidate().await;
            tracing::warn!("⚠️ Sankhya respondeu {} em {}; token descartado", status, url);
            return Err(AppError::SessionExpired);
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Communication(json!(e.to_string()).to_string()))?;

        if !status.is_success() {
            let details = upstream_details(&text);
            tracing::error!("❌ Erro na requisição Sankhya: url={} method={} status={} error={}", url, method, status, details);
            return Err(AppError::Communication(details));
        }

        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("❌ Resposta do Sankhya não é JSON: url={} error={}", url, e);
            AppError::Communication(upstream_details(&text))
        })?;

        // O gateway responde 200 mesmo quando o serviço falha; status "0" é erro.
        if payload.get("status").and_then(Value::as_str) == Some("0") {
            let message = payload
                .get("statusMessage")
                .and_then(Value::as_str)
                .unwrap_or("erro sem mensagem")
                .to_string();
            tracing::error!("❌ Serviço Sankhya falhou: url={} error={}", url, message);
            return Err(AppError::Communication(message));
        }

        Ok(payload)
    }

    // Atalho para o gateway `service.sbr`
    pub async fn call_service(&self, service_name: &str, body: &Value) -> Result<Value, AppError> {
        let url = self.config.service_url(service_name);
        self.request(Method::POST, &url, body).await
    }
}

// `bearerToken` tem prioridade sobre `token`; string vazia não conta.
fn extract_token(body: &Value) -> Option<String> {
    ["bearerToken", "token"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

// Corpo do erro serializado como JSON (texto cru vira string JSON).
fn upstream_details(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => value.to_string(),
        Err(_) => Value::String(text.to_string()).to_string(),
    }
}

// src/config.rs

use crate::{
    db::{LeadRepository, PartnerRepository, SankhyaClient, TokenCache},
    services::{LeadService, PartnerService},
};
use anyhow::Context;
use std::{env, fmt, time::Duration};

const DEFAULT_BASE_URL: &str = "https://api.sandbox.sankhya.com.br";
const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

// Credenciais estáticas e endpoints do Sankhya
#[derive(Clone)]
pub struct SankhyaConfig {
    pub base_url: String,
    pub token: String,
    pub appkey: String,
    pub username: String,
    pub password: String,
    // Só o login tem timeout; as chamadas de dados não têm.
    pub login_timeout: Duration,
}

// As credenciais nunca aparecem em logs.
impl fmt::Debug for SankhyaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SankhyaConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("appkey", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("login_timeout", &self.login_timeout)
            .finish()
    }
}

impl SankhyaConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("SANKHYA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let login_timeout_secs = match env::var("SANKHYA_LOGIN_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("SANKHYA_LOGIN_TIMEOUT_SECS deve ser um número inteiro")?,
            Err(_) => DEFAULT_LOGIN_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: required("SANKHYA_TOKEN")?,
            appkey: required("SANKHYA_APPKEY")?,
            username: required("SANKHYA_USERNAME")?,
            password: required("SANKHYA_PASSWORD")?,
            login_timeout: Duration::from_secs(login_timeout_secs),
        })
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url)
    }

    pub fn service_url(&self, service_name: &str) -> String {
        format!(
            "{}/gateway/v1/mge/service.sbr?serviceName={}&outputType=json",
            self.base_url, service_name
        )
    }
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{name} deve ser definida"))
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub lead_service: LeadService,
    pub partner_service: PartnerService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let sankhya_config = SankhyaConfig::from_env()?;
        tracing::info!("✅ Configuração do Sankhya carregada ({})", sankhya_config.base_url);

        Self::from_config(sankhya_config)
    }

    // --- Monta o gráfico de dependências ---
    // Separado do `new` para os testes apontarem para um ERP falso.
    pub fn from_config(sankhya_config: SankhyaConfig) -> anyhow::Result<Self> {
        let client = SankhyaClient::new(sankhya_config, TokenCache::new())?;

        let lead_repo = LeadRepository::new(client.clone());
        let partner_repo = PartnerRepository::new(client);

        Ok(Self {
            lead_service: LeadService::new(lead_repo),
            partner_service: PartnerService::new(partner_repo),
        })
    }
}

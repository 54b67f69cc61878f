// src/services/lead_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{
        record_mapper::{soft_delete_fields, stage_update_fields, to_wire_fields},
        LeadRepository,
    },
    models::lead::{Lead, LeadStage},
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self { repo }
    }

    // Listagem "best effort": qualquer falha vira lista vazia.
    pub async fn list_leads(&self) -> Vec<Lead> {
        match self.repo.find_active().await {
            Ok(leads) => {
                tracing::info!("✅ {} leads carregados", leads.len());
                leads
            }
            Err(e) => {
                tracing::error!("❌ Erro ao consultar leads: {}", e);
                Vec::new()
            }
        }
    }

    // Cria ou atualiza, conforme a presença do CODLEED.
    pub async fn save_lead(&self, lead: Lead) -> Result<Lead, AppError> {
        let wire = to_wire_fields(&lead, Utc::now().date_naive());

        if lead.key().is_none() && lead.codparc.as_deref().is_none_or(str::is_empty) {
            tracing::warn!("⚠️ Lead criado sem CODPARC; o parceiro será gravado vazio");
        }

        self.repo.save(&wire).await?;

        // O save do Sankhya não devolve a chave gerada: recarrega a lista.
        let leads = self.repo.find_active().await?;
        let saved = match lead.key() {
            Some(key) => find_by_key(leads, key),
            // Criação: o último da lista recarregada é o recém-criado
            None => leads.into_iter().last(),
        };

        saved.ok_or_else(|| {
            AppError::LeadNotFoundAfterSave(lead.key().unwrap_or("novo lead").to_string())
        })
    }

    // Arrastar e soltar no kanban: grava só ESTAGIO e DATA_ATUALIZACAO.
    pub async fn update_stage(&self, lead_id: &str, new_stage: LeadStage) -> Result<Lead, AppError> {
        let wire = stage_update_fields(lead_id, new_stage, Utc::now().date_naive());
        self.repo.save(&wire).await?;

        let leads = self.repo.find_active().await?;
        find_by_key(leads, lead_id)
            .ok_or_else(|| AppError::LeadNotFoundAfterSave(lead_id.to_string()))
    }

    // Exclusão lógica: ATIVO = "N", o registro continua no Sankhya.
    pub async fn soft_delete(&self, lead_id: &str) -> Result<(), AppError> {
        let wire = soft_delete_fields(lead_id, Utc::now().date_naive());
        self.repo.save(&wire).await?;

        tracing::info!("🗑️ Lead {} desativado", lead_id);
        Ok(())
    }
}

fn find_by_key(leads: Vec<Lead>, key: &str) -> Option<Lead> {
    leads.into_iter().find(|l| l.codleed.as_deref() == Some(key))
}

// src/services/partner_service.rs

use crate::{
    common::error::AppError,
    db::{partner_repo::ERP_PAGE_SIZE, PartnerRepository},
    models::partner::PartnerPage,
};

#[derive(Clone)]
pub struct PartnerService {
    repo: PartnerRepository,
}

impl PartnerService {
    pub fn new(repo: PartnerRepository) -> Self {
        Self { repo }
    }

    // `page` começa em 1 e tem `page_size` linhas; o Sankhya pagina em blocos
    // fixos de ERP_PAGE_SIZE com offsetPage a partir de 0. A janela pedida
    // pode começar no meio de um bloco e atravessar o seguinte.
    pub async fn search_partners(
        &self,
        page: u32,
        page_size: u32,
        search_name: Option<&str>,
    ) -> Result<PartnerPage, AppError> {
        let term = search_name.map(str::trim).filter(|t| !t.is_empty());
        let wanted = page_size as usize;

        let start = page.saturating_sub(1) as usize * wanted;
        let mut offset_page = (start / ERP_PAGE_SIZE) as u32;
        let mut skip = start % ERP_PAGE_SIZE;

        let mut parceiros = Vec::with_capacity(wanted);
        loop {
            let (rows, has_more) = self.repo.search(term, offset_page).await?;
            let fetched = rows.len();
            parceiros.extend(rows.into_iter().skip(skip));
            skip = 0;

            if parceiros.len() >= wanted || !has_more || fetched == 0 {
                break;
            }
            offset_page += 1;
        }
        parceiros.truncate(wanted);

        Ok(PartnerPage { parceiros, page, page_size })
    }
}

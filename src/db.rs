pub mod token_cache;
pub use token_cache::TokenCache;
pub mod sankhya_client;
pub use sankhya_client::SankhyaClient;
pub mod record_mapper;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod partner_repo;
pub use partner_repo::PartnerRepository;

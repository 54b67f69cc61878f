pub mod lead_service;
pub use lead_service::LeadService;
pub mod partner_service;
pub use partner_service::PartnerService;

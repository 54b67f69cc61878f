pub mod lead;
pub mod partner;

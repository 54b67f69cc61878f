pub mod leads;
pub mod partners;

//! Service layer: sentiment inference and entry enrichment

pub mod enrichment;
pub mod sentiment;

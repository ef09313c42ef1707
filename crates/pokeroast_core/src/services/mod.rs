pub mod roast_service;

pub use roast_service::{AnalysisOutcome, RoastService};

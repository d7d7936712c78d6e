pub mod alerts;
pub mod analysis;

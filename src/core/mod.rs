//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod month;
pub mod rates;
pub mod request;
pub mod simulation;

// Re-export main types for cleaner imports
pub use error::SimulationError;
pub use rates::{RateLookup, RateProvider, RateRecord, RateTable};
pub use request::{Simulation, SimulationRequest, run_simulation};
pub use simulation::{LedgerEntry, LedgerSummary, SimulationInput, simulate};

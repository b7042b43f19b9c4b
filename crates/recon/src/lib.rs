//! `timecheck-recon`: timesheet vs sign-in reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded cell grids, returns discrepancies.
//! No CLI or spreadsheet IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod model;
pub mod rates;
pub mod sign_in;
pub mod table;
pub mod timesheet;

pub use config::RatesConfig;
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use model::{Discrepancy, DiscrepancyKind, Entry, ReconReport, ReconSummary, SignInLog};
pub use table::{Cell, CellRef, NamedTable, Table};

//! Payslip Engine library crate.
//!
//! This crate validates and normalizes payslip documents and derives
//! the figures printed on each payslip.  External applications may
//! depend on the `payslip_engine` crate and call
//! [`validate::validate`] and the [`engine`] functions directly, hold
//! a [`session::PayslipSession`] for editor-style use, or embed the
//! HTTP API via `api::build_router`.

pub mod error;
pub mod ids;
pub mod models;
pub mod validate;
pub mod words;
pub mod identity;
pub mod engine;
pub mod session;
pub mod overlay;
pub mod config;
pub mod api;

pub use error::ValidationError;
pub use models::PayslipDocument;
pub use session::{FailurePolicy, PayslipSession};
pub use validate::validate;

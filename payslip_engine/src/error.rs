//! Validation errors.
//!
//! Every failure is recoverable: the caller shows the message to the
//! user, who corrects the text and submits it again.  The `Display`
//! output of each variant is the message intended for the user.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input is not valid JSON.  Carries the parser's message.
    #[error("Invalid JSON format: {0}")]
    MalformedInput(String),

    #[error("Invalid JSON structure. The document must be a JSON object.")]
    NotAnObject,

    #[error("Invalid JSON structure. Must include payslips as an array.")]
    MissingPayslipsArray,

    #[error(
        "Invalid JSON structure. Must include either organization or client information (top-level or per-payslip)."
    )]
    NoIdentitySource,

    #[error("Organization must have name and address.")]
    IncompleteOrganization,

    #[error("Payslip at index {0} must be a JSON object.")]
    InvalidPayslipEntry(usize),

    #[error("Payslip at index {0} must have employee and salaryComponents (as an array).")]
    IncompletePayslip(usize),

    #[error("Employee in payslip at index {0} must have id and name.")]
    IncompleteEmployee(usize),

    /// A field has the wrong type, e.g. a non-numeric amount or an
    /// unknown component type.
    #[error("Invalid {location}: {detail}")]
    SchemaMismatch { location: String, detail: String },
}

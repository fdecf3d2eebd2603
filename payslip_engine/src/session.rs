//! Editor session state.
//!
//! A [`PayslipSession`] holds the outcome of the most recent
//! validation: the current document, the current error, and which
//! payslip is selected.  It is an ordinary value owned by the caller;
//! the HTTP layer keeps one behind a lock, a UI would keep one in its
//! own state store.

use crate::engine::{summarize, PayslipSummary};
use crate::error::ValidationError;
use crate::ids::{ClientIdGenerator, UuidClientIds};
use crate::models::{PayslipDocument, PayslipRecord};
use crate::validate::validate_with;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What happens to the current document when a later submission
/// fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep showing the last valid document next to the error.
    #[default]
    RetainDocument,
    /// Drop the last valid document; only the error remains.
    ClearDocument,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(FailurePolicy::RetainDocument),
            "clear" => Ok(FailurePolicy::ClearDocument),
            other => Err(format!(
                "unknown failure policy {:?} (expected \"retain\" or \"clear\")",
                other
            )),
        }
    }
}

/// Result of [`PayslipSession::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The document was stored; it holds this many payslips.
    Accepted { payslips: usize },
    /// The text failed validation.
    Rejected(ValidationError),
    /// Blank input; nothing changed.
    Ignored,
}

pub struct PayslipSession {
    document: Option<PayslipDocument>,
    error: Option<ValidationError>,
    selected: usize,
    policy: FailurePolicy,
    ids: Arc<dyn ClientIdGenerator>,
}

impl fmt::Debug for PayslipSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayslipSession")
            .field("document", &self.document)
            .field("error", &self.error)
            .field("selected", &self.selected)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for PayslipSession {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

impl PayslipSession {
    pub fn new(policy: FailurePolicy) -> Self {
        Self::with_id_generator(policy, Arc::new(UuidClientIds))
    }

    pub fn with_id_generator(policy: FailurePolicy, ids: Arc<dyn ClientIdGenerator>) -> Self {
        Self {
            document: None,
            error: None,
            selected: 0,
            policy,
            ids,
        }
    }

    /// Validates `raw` and stores the outcome.  The selection is reset
    /// to the first payslip on every non-blank submission.
    pub fn submit(&mut self, raw: &str) -> Submission {
        if raw.trim().is_empty() {
            return Submission::Ignored;
        }
        let result = validate_with(raw, self.ids.as_ref());
        self.selected = 0;
        match self.commit(result) {
            Ok(document) => Submission::Accepted {
                payslips: document.payslips.len(),
            },
            Err(err) => Submission::Rejected(err),
        }
    }

    /// Stores an already computed validation result.  Success replaces
    /// the document and clears the error; failure records the error and
    /// applies the session's [`FailurePolicy`] to the document.
    pub fn commit(
        &mut self,
        result: Result<PayslipDocument, ValidationError>,
    ) -> Result<&PayslipDocument, ValidationError> {
        match result {
            Ok(document) => {
                self.error = None;
                if self.selected >= document.payslips.len() {
                    self.selected = 0;
                }
                let stored: &PayslipDocument = self.document.insert(document);
                Ok(stored)
            }
            Err(err) => {
                if self.policy == FailurePolicy::ClearDocument {
                    self.document = None;
                    self.selected = 0;
                }
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Drops the document, the error and the selection.
    pub fn clear(&mut self) {
        self.document = None;
        self.error = None;
        self.selected = 0;
    }

    /// Selects the payslip at `index`.  Out-of-range indexes leave the
    /// selection unchanged and return `None`.
    pub fn select(&mut self, index: usize) -> Option<&PayslipRecord> {
        let record = self.document.as_ref()?.payslips.get(index)?;
        self.selected = index;
        Some(record)
    }

    pub fn document(&self) -> Option<&PayslipDocument> {
        self.document.as_ref()
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&PayslipRecord> {
        self.document.as_ref()?.payslips.get(self.selected)
    }

    pub fn selected_summary(&self) -> Option<PayslipSummary> {
        summarize(self.document.as_ref()?, self.selected)
    }
}

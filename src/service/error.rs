use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    models::enquirymodel::EnquiryStatus,
    service::valuation::ValuationError,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Validation error: {field} {message}")]
    Validation { field: String, message: String },

    #[error("Enquiry {enquiry_id} is in status {status:?}; cannot {action}")]
    InvalidStateTransition {
        enquiry_id: Uuid,
        status: EnquiryStatus,
        action: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValuationError),

    #[error("Enquiry {0} not found")]
    EnquiryNotFound(Uuid),

    #[error("Agent {0} not found")]
    AgentNotFound(Uuid),

    #[error("Reference data error: {0}")]
    ReferenceData(String),
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Picks one violation from a `validator` report. Field names are sorted so the
    /// reported field is stable across runs.
    pub fn from_validation(prefix: &str, errors: &ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                ServiceError::validation(format!("{}{}", prefix, field), message)
            }
            None => ServiceError::validation(prefix.trim_end_matches('.'), "is invalid"),
        }
    }

    /// Stable code for the presentation layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation { .. } => "validation_error",
            ServiceError::InvalidStateTransition { .. } => "invalid_state_transition",
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::EnquiryNotFound(_) | ServiceError::AgentNotFound(_) => "not_found",
            ServiceError::ReferenceData(_) => "reference_data",
        }
    }

    /// Everything except broken reference data can be fixed by re-prompting the operator.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ServiceError::ReferenceData(_))
    }
}

//! Manual application intake: the two-step form, document checks, and sign-up checks.
//! Every failure here blocks submission; nothing reaches the backend.

mod documents;
mod form;
mod registration;

pub use documents::{DocumentError, DocumentSlot, UploadedDocument, MAX_DOCUMENT_BYTES};
pub use form::{ApplicationForm, FormStep};
pub use registration::Registration;

/// Validation failure on the application or registration form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill all required fields")]
    MissingFields { fields: Vec<&'static str> },
    #[error("Please agree to the Terms & Conditions")]
    TermsNotAccepted,
    #[error("Please upload required documents (PAN and Aadhaar)")]
    MissingDocuments { slots: Vec<DocumentSlot> },
    #[error("{field} must be a number, found '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Passwords do not match!")]
    PasswordMismatch,
}

use std::collections::BTreeMap;

use super::documents::{DocumentSlot, UploadedDocument};
use super::FormError;
use crate::lending::domain::{CollectedFields, LoanApplication};

const DEFAULT_EMPLOYMENT_TYPE: &str = "Salaried";
const DEFAULT_PURPOSE: &str = "Personal Loan";
const DEFAULT_TENURE: &str = "36 Months";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    PersonalInfo,
    Documents,
}

/// Two-step manual application form.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationForm {
    step: FormStep,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub pan: String,
    pub address: String,
    pub employment_type: String,
    pub income: String,
    pub amount: String,
    pub purpose: String,
    pub tenure: String,
    pub agree_to_terms: bool,
    documents: BTreeMap<DocumentSlot, UploadedDocument>,
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self {
            step: FormStep::PersonalInfo,
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            pan: String::new(),
            address: String::new(),
            employment_type: DEFAULT_EMPLOYMENT_TYPE.to_string(),
            income: String::new(),
            amount: String::new(),
            purpose: DEFAULT_PURPOSE.to_string(),
            tenure: DEFAULT_TENURE.to_string(),
            agree_to_terms: false,
            documents: BTreeMap::new(),
        }
    }
}

impl ApplicationForm {
    /// Seed the form from fields the assistant collected. The assistant already walked
    /// the applicant through the details, so the form opens on the document step with
    /// the terms accepted.
    pub fn from_collected(fields: &CollectedFields) -> Self {
        let text = |key: &str| fields.get(key).map(|value| value.trim().to_string());
        let defaults = Self::default();

        let tenure = match text("tenure").filter(|value| !value.is_empty()) {
            Some(value) if value.chars().all(|c| c.is_ascii_digit()) => format!("{value} Months"),
            Some(value) => value,
            None => defaults.tenure.clone(),
        };

        Self {
            step: FormStep::Documents,
            full_name: text("fullName").unwrap_or_default(),
            email: text("email").unwrap_or_default(),
            phone: text("phone").unwrap_or_default(),
            pan: text("pan").unwrap_or_default(),
            address: text("address").unwrap_or_default(),
            employment_type: text("employmentType")
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.employment_type),
            income: text("income").unwrap_or_default(),
            amount: text("amount").unwrap_or_default(),
            purpose: text("purpose")
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.purpose),
            tenure,
            agree_to_terms: true,
            documents: BTreeMap::new(),
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    /// Leave the personal-information step once every required field is filled.
    pub fn advance(&mut self) -> Result<FormStep, FormError> {
        if self.step == FormStep::PersonalInfo {
            self.check_personal_info()?;
            self.step = FormStep::Documents;
        }
        Ok(self.step)
    }

    pub fn attach(&mut self, slot: DocumentSlot, document: UploadedDocument) {
        tracing::debug!(
            slot = slot.label(),
            file = %document.file_name,
            kib = document.size_bytes / 1024,
            "document attached"
        );
        self.documents.insert(slot, document);
    }

    pub fn document(&self, slot: DocumentSlot) -> Option<&UploadedDocument> {
        self.documents.get(&slot)
    }

    /// `"PAN: a.pdf, Aadhaar: b.png"` in slot order.
    pub fn document_summary(&self) -> String {
        let parts: Vec<String> = DocumentSlot::ALL
            .iter()
            .filter_map(|slot| {
                self.documents
                    .get(slot)
                    .map(|doc| format!("{}: {}", slot.label(), doc.file_name))
            })
            .collect();

        if parts.is_empty() {
            "Documents uploaded".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// Validate everything and build the payload for submission.
    pub fn to_application(&self) -> Result<LoanApplication, FormError> {
        self.check_personal_info()?;

        if !self.agree_to_terms {
            return Err(FormError::TermsNotAccepted);
        }

        let missing: Vec<DocumentSlot> = DocumentSlot::ALL
            .into_iter()
            .filter(|slot| slot.is_required() && !self.documents.contains_key(slot))
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingDocuments { slots: missing });
        }

        let income = parse_rupees("income", &self.income)?;
        let amount = parse_rupees("amount", &self.amount)?;

        Ok(LoanApplication {
            name: self.full_name.trim().to_string(),
            pan: self.pan.trim().to_string(),
            income,
            amount,
            purpose: self.purpose.trim().to_string(),
            tenure_months: parse_tenure(&self.tenure),
            document_name: Some(self.document_summary()),
        })
    }

    fn check_personal_info(&self) -> Result<(), FormError> {
        let fields = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("pan", &self.pan),
            ("address", &self.address),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingFields { fields: missing })
        }
    }
}

/// Accepts `50000`, `5,00,000` and `₹ 50000`.
fn parse_rupees(field: &'static str, raw: &str) -> Result<f64, FormError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '₹' | ' '))
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Leading month count of values such as `36 Months`.
fn parse_tenure(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

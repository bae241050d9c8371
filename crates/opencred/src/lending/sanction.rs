//! Sanction letter terms and plain-text rendering for approved loans.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{LoanApplication, LoanId};

pub const ANNUAL_INTEREST_RATE: f64 = 0.085;
pub const TENURE_MONTHS: u32 = 36;
pub const PROCESSING_FEE: &str = "Rs. 2,500 + GST";

/// Commercial terms printed on the letter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanctionTerms {
    pub principal: f64,
    pub annual_rate: f64,
    pub tenure_months: u32,
    pub monthly_emi: u64,
    pub processing_fee: &'static str,
}

impl SanctionTerms {
    pub fn for_amount(principal: f64) -> Self {
        Self {
            principal,
            annual_rate: ANNUAL_INTEREST_RATE,
            tenure_months: TENURE_MONTHS,
            monthly_emi: monthly_emi(principal, ANNUAL_INTEREST_RATE, TENURE_MONTHS),
            processing_fee: PROCESSING_FEE,
        }
    }
}

/// Instalment with payments due at the start of each month, rounded to the rupee.
pub fn monthly_emi(principal: f64, annual_rate: f64, tenure_months: u32) -> u64 {
    if principal <= 0.0 || tenure_months == 0 {
        return 0;
    }

    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return (principal / f64::from(tenure_months)).round() as u64;
    }

    let months = i32::try_from(tenure_months).unwrap_or(i32::MAX);
    let discount = 1.0 - (1.0 + monthly_rate).powi(-months);
    (principal * monthly_rate / discount * (1.0 + monthly_rate)).round() as u64
}

/// Render the letter body.
pub fn render_letter(application: &LoanApplication, loan_id: &LoanId, approved_on: NaiveDate) -> String {
    let terms = SanctionTerms::for_amount(application.amount);
    let name = non_empty_or(&application.name, "Valued Customer");
    let mut letter = String::new();

    let _ = writeln!(letter, "OpenCred - Digital Lending Platform");
    let _ = writeln!(letter, "LOAN APPROVAL CERTIFICATE");
    let _ = writeln!(letter);
    let _ = writeln!(letter, "Dear {name},");
    let _ = writeln!(letter);
    let _ = writeln!(
        letter,
        "Congratulations! Your loan application has been approved. Below are the details:"
    );
    let _ = writeln!(letter);

    let rows = [
        ("Applicant Name", non_empty_or(&application.name, "N/A").to_string()),
        ("PAN Number", non_empty_or(&application.pan, "N/A").to_string()),
        ("Approved Amount", format!("Rs. {}", group_thousands(terms.principal.round() as u64))),
        (
            "Interest Rate",
            format!("{:.1}% per annum", terms.annual_rate * 100.0),
        ),
        ("Tenure", format!("{} months", terms.tenure_months)),
        ("Monthly EMI", format!("Rs. {}", group_thousands(terms.monthly_emi))),
        ("Processing Fee", terms.processing_fee.to_string()),
        ("Approval Date", approved_on.format("%d/%m/%Y").to_string()),
        ("Loan ID", loan_id.to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(letter, "{:<18}{}", format!("{label}:"), value);
    }

    letter
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

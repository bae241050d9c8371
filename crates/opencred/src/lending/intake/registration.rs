use std::fmt;

use super::FormError;

/// Account sign-up details. Only validated client side; there is no account backend.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub pan: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

impl Registration {
    pub fn validate(&self) -> Result<(), FormError> {
        let fields = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("pan", &self.pan),
            ("password", &self.password),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingFields { fields: missing });
        }

        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if !self.agree_to_terms {
            return Err(FormError::TermsNotAccepted);
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("pan", &self.pan)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("agree_to_terms", &self.agree_to_terms)
            .finish()
    }
}

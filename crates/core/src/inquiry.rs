//! Customer inquiries: status lifecycle, contact-form validation and phone
//! normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::{CoreError, FieldErrorCollector};
use crate::sanitize::{sanitize_optional_email, sanitize_optional_text, sanitize_text};

/// Number of digits in a domestic mobile number.
pub const PHONE_DIGITS: usize = 10;

/// Country prefix prepended to stored phone numbers.
pub const PHONE_COUNTRY_PREFIX: &str = "+91";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Where an inquiry is in the sales pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    New,
    Contacted,
    Converted,
    Closed,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 4] = [
        Self::New,
        Self::Contacted,
        Self::Converted,
        Self::Closed,
    ];

    /// Value stored in the `inquiries.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid inquiry status '{s}'. Must be one of: new, contacted, converted, closed"
                ))
            })
    }
}

impl TryFrom<String> for InquiryStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Energy needs
// ---------------------------------------------------------------------------

/// System size the customer picked on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyNeeds {
    #[serde(rename = "3kw")]
    ThreeKw,
    #[serde(rename = "5kw")]
    FiveKw,
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "not-sure")]
    NotSure,
}

impl EnergyNeeds {
    pub const ALL: [EnergyNeeds; 4] = [Self::ThreeKw, Self::FiveKw, Self::Custom, Self::NotSure];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThreeKw => "3kw",
            Self::FiveKw => "5kw",
            Self::Custom => "custom",
            Self::NotSure => "not-sure",
        }
    }

    /// Human-readable label used in notification emails.
    pub fn label(self) -> &'static str {
        match self {
            Self::ThreeKw => "3kW (Small Home)",
            Self::FiveKw => "5kW (Medium Home)",
            Self::Custom => "Custom / Larger",
            Self::NotSure => "Need Consultation",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == tag)
    }
}

// ---------------------------------------------------------------------------
// Phone / email
// ---------------------------------------------------------------------------

/// Normalize a domestic phone number to `+91 XXXXXXXXXX`.
///
/// Every non-digit is ignored; exactly [`PHONE_DIGITS`] digits must remain.
pub fn normalize_phone(input: &str) -> Result<String, String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != PHONE_DIGITS {
        return Err("Please enter a valid 10-digit phone number.".to_string());
    }
    Ok(format!("{PHONE_COUNTRY_PREFIX} {digits}"))
}

/// Digits-only form of a stored phone number, for `tel:`/WhatsApp links.
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Check an email address is syntactically valid.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.validate_email() {
        Ok(())
    } else {
        Err("Please enter a valid email address.".to_string())
    }
}

// ---------------------------------------------------------------------------
// Contact form
// ---------------------------------------------------------------------------

/// Raw contact-form submission from the public site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub location: String,
    pub address: Option<String>,
    pub energy_needs: Option<String>,
    pub message: Option<String>,
}

/// A contact form that passed validation. All strings are sanitized and the
/// phone number is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub location: String,
    pub address: Option<String>,
    pub energy_needs: Option<EnergyNeeds>,
    pub message: Option<String>,
}

impl ContactForm {
    /// Sanitize and validate the submission, reporting every bad field.
    pub fn validate(&self) -> Result<ValidContact, CoreError> {
        let mut errors = FieldErrorCollector::new();

        let name = sanitize_text(&self.name);
        if name.is_empty() {
            errors.add("name", "Name is required.");
        }

        let location = sanitize_text(&self.location);
        if location.is_empty() {
            errors.add("location", "Location is required.");
        }

        let phone = errors.check("phone", normalize_phone(&self.phone));

        let email = sanitize_optional_email(self.email.as_deref());
        if let Some(email) = &email {
            errors.check("email", validate_email(email));
        }

        let energy_needs = match self.energy_needs.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(tag) => {
                let parsed = EnergyNeeds::parse(tag);
                if parsed.is_none() {
                    errors.add("energy_needs", format!("Unknown system size '{tag}'."));
                }
                parsed
            }
        };

        errors.finish()?;

        Ok(ValidContact {
            name,
            email,
            phone: phone.unwrap_or_default(),
            location,
            address: sanitize_optional_text(self.address.as_deref()),
            energy_needs,
            message: sanitize_optional_text(self.message.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Ganesh Pawar".into(),
            email: Some("Ganesh@Example.com".into()),
            phone: "98765 43210".into(),
            location: "Ahmednagar".into(),
            address: Some("  ".into()),
            energy_needs: Some("5kw".into()),
            message: Some("Call after <b>6pm</b>".into()),
        }
    }

    #[test]
    fn status_parses_all_values() {
        for status in InquiryStatus::ALL {
            assert_eq!(status.as_str().parse::<InquiryStatus>().unwrap(), status);
        }
        assert!("archived".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&InquiryStatus::Converted).unwrap();
        assert_eq!(json, "\"converted\"");
    }

    #[test]
    fn phone_is_normalized_with_country_prefix() {
        assert_eq!(normalize_phone("98765-43210").unwrap(), "+91 9876543210");
    }

    #[test]
    fn phone_with_wrong_digit_count_is_rejected() {
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("+91 98765 43210").is_err());
    }

    #[test]
    fn valid_form_is_sanitized() {
        let valid = form().validate().unwrap();
        assert_eq!(valid.phone, "+91 9876543210");
        assert_eq!(valid.email.as_deref(), Some("ganesh@example.com"));
        assert_eq!(valid.address, None);
        assert_eq!(valid.energy_needs, Some(EnergyNeeds::FiveKw));
        assert_eq!(valid.message.as_deref(), Some("Call after 6pm"));
    }

    #[test]
    fn invalid_form_reports_each_field() {
        let bad = ContactForm {
            name: " ".into(),
            email: Some("not-an-email".into()),
            phone: "123".into(),
            location: String::new(),
            energy_needs: Some("50kw".into()),
            ..Default::default()
        };
        assert_matches!(bad.validate(), Err(CoreError::FieldValidation(fields)) => {
            let keys: Vec<_> = fields.keys().map(String::as_str).collect();
            assert_eq!(keys, ["email", "energy_needs", "location", "name", "phone"]);
        });
    }

    #[test]
    fn blank_email_is_allowed() {
        let mut f = form();
        f.email = Some(String::new());
        assert_eq!(f.validate().unwrap().email, None);
    }
}

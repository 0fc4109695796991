//! Quotation form validation, totals and quotation numbers.
//!
//! The admin quotation form submits every value as a string. [`QuotationForm::validate`]
//! turns it into a [`ValidatedQuotation`] or a field-scoped error. Totals are a
//! pure function of the cost breakdown:
//!
//! ```text
//! subtotal = panels + inverter + structure + installation + net_metering
//! total    = subtotal - subsidy - discount
//! ```
//!
//! The total is not clamped; a subsidy larger than the subtotal yields a
//! negative total.

use chrono::Datelike;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldErrorCollector};
use crate::inquiry::normalize_phone;
use crate::sanitize::clean_text;

/// Days a quotation stays valid after issue.
pub const VALIDITY_DAYS: i64 = 30;

/// Prefix of every quotation number.
pub const QUOTATION_PREFIX: &str = "QTN";

/// Random suffixes are drawn from `0..QUOTATION_SUFFIX_SPACE`.
pub const QUOTATION_SUFFIX_SPACE: u16 = 1000;

const MIN_NAME_LEN: usize = 2;
const MIN_ADDRESS_LEN: usize = 5;

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Raw quotation form as submitted by the admin UI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationForm {
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub system_size: String,
    pub roof_type: String,
    pub panel_count: String,
    pub panel_price: String,
    pub inverter_price: String,
    pub structure_price: String,
    pub installation_price: String,
    pub net_metering_price: String,
    #[serde(default)]
    pub subsidy_amount: Option<String>,
    #[serde(default)]
    pub discount_amount: Option<String>,
}

/// Customer block of a quotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationCustomer {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Technical specification block of a quotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSpec {
    /// Capacity in kW, as entered (e.g. `"3"`).
    pub size_kw: String,
    pub roof_type: String,
    pub panel_count: u32,
}

/// The five cost line items plus the two optional reductions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub panels: f64,
    pub inverter: f64,
    pub structure: f64,
    pub installation: f64,
    pub net_metering: f64,
    pub subsidy: f64,
    pub discount: f64,
}

/// Derived totals for a [`CostBreakdown`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuotationTotals {
    pub subtotal: f64,
    pub subsidy: f64,
    pub discount: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// Sum of the five cost items.
    pub fn subtotal(&self) -> f64 {
        self.panels + self.inverter + self.structure + self.installation + self.net_metering
    }

    /// Subtotal minus subsidy and discount. May be negative.
    pub fn total(&self) -> f64 {
        self.subtotal() - self.subsidy - self.discount
    }

    pub fn totals(&self) -> QuotationTotals {
        QuotationTotals {
            subtotal: self.subtotal(),
            subsidy: self.subsidy,
            discount: self.discount,
            total: self.total(),
        }
    }
}

/// A quotation form that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedQuotation {
    pub customer: QuotationCustomer,
    pub system: SystemSpec,
    pub costs: CostBreakdown,
}

impl QuotationForm {
    /// Validate every field, collecting all field-level errors.
    ///
    /// Text is cleaned of markup but not entity-escaped: it ends up printed
    /// on the PDF, never inside HTML.
    pub fn validate(&self) -> Result<ValidatedQuotation, CoreError> {
        let mut errors = FieldErrorCollector::new();

        let name = clean_text(&self.customer_name);
        if name.chars().count() < MIN_NAME_LEN {
            errors.add("customer_name", "Name is required");
        }

        let address = clean_text(&self.customer_address);
        if address.chars().count() < MIN_ADDRESS_LEN {
            errors.add("customer_address", "Address is required");
        }

        let phone = errors.check("customer_phone", normalize_phone(&self.customer_phone));

        let size_kw = clean_text(&self.system_size);
        if size_kw.is_empty() {
            errors.add("system_size", "System size is required");
        }

        let roof_type = clean_text(&self.roof_type);
        if roof_type.is_empty() {
            errors.add("roof_type", "Roof type is required");
        }

        let panel_count = errors.check("panel_count", parse_panel_count(&self.panel_count));

        let mut cost = |field: &str, raw: &str| errors.check(field, parse_amount(raw)).unwrap_or(0.0);
        let panels = cost("panel_price", &self.panel_price);
        let inverter = cost("inverter_price", &self.inverter_price);
        let structure = cost("structure_price", &self.structure_price);
        let installation = cost("installation_price", &self.installation_price);
        let net_metering = cost("net_metering_price", &self.net_metering_price);

        let subsidy = errors
            .check("subsidy_amount", parse_optional_amount(self.subsidy_amount.as_deref()))
            .unwrap_or(0.0);
        let discount = errors
            .check("discount_amount", parse_optional_amount(self.discount_amount.as_deref()))
            .unwrap_or(0.0);

        errors.finish()?;

        Ok(ValidatedQuotation {
            customer: QuotationCustomer {
                name,
                address,
                phone: phone.unwrap_or_default(),
            },
            system: SystemSpec {
                size_kw,
                roof_type,
                panel_count: panel_count.unwrap_or(1),
            },
            costs: CostBreakdown {
                panels,
                inverter,
                structure,
                installation,
                net_metering,
                subsidy,
                discount,
            },
        })
    }
}

/// Parse a required non-negative amount.
pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Must be 0 or more".to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err("Must be 0 or more".to_string()),
    }
}

/// Parse an optional non-negative amount. Missing or blank means zero.
pub fn parse_optional_amount(raw: Option<&str>) -> Result<f64, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(value) => parse_amount(value),
    }
}

/// Parse the panel count: a whole number, at least 1.
pub fn parse_panel_count(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err("Must be at least 1".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Quotation numbers
// ---------------------------------------------------------------------------

/// Format a quotation number, e.g. `QTN-2026-042`.
pub fn format_quotation_number(year: i32, suffix: u16) -> String {
    format!("{QUOTATION_PREFIX}-{year:04}-{:03}", suffix % QUOTATION_SUFFIX_SPACE)
}

/// Draw a random quotation number for the year of `date`.
///
/// Numbers are not unique on their own; callers record issued numbers and
/// retry on collision.
pub fn generate_quotation_number<R: Rng>(date: chrono::NaiveDate, rng: &mut R) -> String {
    let suffix = rng.random_range(0..QUOTATION_SUFFIX_SPACE);
    format_quotation_number(date.year(), suffix)
}

/// Whether `s` has the shape `QTN-<4-digit year>-<3 digits>`.
pub fn is_quotation_number(s: &str) -> bool {
    let mut parts = s.split('-');
    let (Some(prefix), Some(year), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == QUOTATION_PREFIX
        && year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == 3
        && suffix.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn form() -> QuotationForm {
        QuotationForm {
            customer_name: "Ganesh Pawar".into(),
            customer_address: "Savedi, Ahmednagar".into(),
            customer_phone: "9876543210".into(),
            system_size: "3".into(),
            roof_type: "Flat".into(),
            panel_count: "6".into(),
            panel_price: "85000".into(),
            inverter_price: "45000".into(),
            structure_price: "15000".into(),
            installation_price: "10000".into(),
            net_metering_price: "5000".into(),
            subsidy_amount: Some("30000".into()),
            discount_amount: Some("0".into()),
        }
    }

    #[test]
    fn reference_quotation_totals() {
        let q = form().validate().unwrap();
        let totals = q.costs.totals();
        assert_eq!(totals.subtotal, 160_000.0);
        assert_eq!(totals.total, 130_000.0);
    }

    #[test]
    fn totals_follow_the_formula() {
        let grid = [0.0, 1.0, 999.5, 25_000.0];
        for &a in &grid {
            for &s in &grid {
                let costs = CostBreakdown {
                    panels: a,
                    inverter: a * 2.0,
                    structure: 7.0,
                    installation: 0.0,
                    net_metering: 3.0,
                    subsidy: s,
                    discount: 1.0,
                };
                let expected_subtotal = a + a * 2.0 + 7.0 + 0.0 + 3.0;
                assert_eq!(costs.subtotal(), expected_subtotal);
                assert_eq!(costs.total(), expected_subtotal - s - 1.0);
            }
        }
    }

    #[test]
    fn total_may_go_negative() {
        let costs = CostBreakdown {
            panels: 1000.0,
            subsidy: 5000.0,
            ..Default::default()
        };
        assert_eq!(costs.total(), -4000.0);
    }

    #[test]
    fn totals_are_deterministic() {
        let q = form().validate().unwrap();
        assert_eq!(q.costs.totals(), q.costs.totals());
        assert_eq!(form().validate().unwrap(), q);
    }

    #[test]
    fn missing_reductions_default_to_zero() {
        let mut f = form();
        f.subsidy_amount = None;
        f.discount_amount = Some("  ".into());
        let costs = f.validate().unwrap().costs;
        assert_eq!(costs.subsidy, 0.0);
        assert_eq!(costs.discount, 0.0);
    }

    #[test]
    fn negative_and_non_numeric_costs_are_field_errors() {
        let mut f = form();
        f.panel_price = "-1".into();
        f.inverter_price = "abc".into();
        f.discount_amount = Some("-5".into());
        f.panel_count = "0".into();
        assert_matches!(f.validate(), Err(CoreError::FieldValidation(fields)) => {
            assert_eq!(fields["panel_price"], "Must be 0 or more");
            assert_eq!(fields["inverter_price"], "Must be 0 or more");
            assert_eq!(fields["discount_amount"], "Must be 0 or more");
            assert_eq!(fields["panel_count"], "Must be at least 1");
            assert_eq!(fields.len(), 4);
        });
    }

    #[test]
    fn empty_required_cost_is_rejected() {
        let mut f = form();
        f.net_metering_price = String::new();
        assert_matches!(f.validate(), Err(CoreError::FieldValidation(fields)) => {
            assert!(fields.contains_key("net_metering_price"));
        });
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
    }

    #[test]
    fn customer_fields_are_checked() {
        let mut f = form();
        f.customer_name = "G".into();
        f.customer_address = "abc".into();
        f.customer_phone = "12345".into();
        assert_matches!(f.validate(), Err(CoreError::FieldValidation(fields)) => {
            assert!(fields.contains_key("customer_name"));
            assert!(fields.contains_key("customer_address"));
            assert!(fields.contains_key("customer_phone"));
        });
    }

    #[test]
    fn text_is_cleaned_but_not_escaped() {
        let mut f = form();
        f.customer_name = "<b>Sharma & Sons</b>".into();
        f.customer_address = "D'Souza Colony, Pune".into();
        f.roof_type = r#"RCC "flat""#.into();
        let q = f.validate().unwrap();
        assert_eq!(q.customer.name, "Sharma & Sons");
        assert_eq!(q.customer.address, "D'Souza Colony, Pune");
        assert_eq!(q.system.roof_type, r#"RCC "flat""#);
    }

    #[test]
    fn quotation_number_format() {
        assert_eq!(format_quotation_number(2026, 7), "QTN-2026-007");
        assert_eq!(format_quotation_number(2026, 999), "QTN-2026-999");
        assert!(is_quotation_number("QTN-2026-000"));
        assert!(!is_quotation_number("QTN-26-000"));
        assert!(!is_quotation_number("QTN-2026-0001"));
        assert!(!is_quotation_number("INV-2026-001"));
    }

    #[test]
    fn generated_numbers_match_format_and_year() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let number = generate_quotation_number(date, &mut rng);
            assert!(is_quotation_number(&number), "bad number {number}");
            assert!(number.starts_with("QTN-2026-"));
        }
    }
}

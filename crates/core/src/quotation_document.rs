//! Quotation document layout and PDF rendering.
//!
//! [`build_document`] turns a validated quotation into a [`QuotationDocument`]:
//! plain text blocks in display order. [`render_pdf`] lays that out on a
//! single A4 page. Both are pure; the issue date is an input so that the same
//! quotation always renders the same bytes.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::currency::format_inr;
use crate::pdf::{self, Font, Page, Rgb, A4_HEIGHT, A4_WIDTH};
use crate::quotation::{ValidatedQuotation, VALIDITY_DAYS};

/// Company name printed in the header and the signature block.
pub const COMPANY_NAME: &str = "Convex Solar Solutions";

/// Tagline under the company name.
pub const COMPANY_TAGLINE: &str = "Powering Homes with Clean Energy";

/// Document title.
pub const DOCUMENT_TITLE: &str = "SOLAR ROOFTOP QUOTATION";

/// Static terms and conditions, in print order.
pub const TERMS: [&str; 5] = [
    "Payment: 50% advance, 50% on installation completion.",
    "Warranty: 25 years on panels, 5 years on inverter.",
    "Installation timeline: 7-10 working days after advance.",
    "Prices are subject to change without prior notice.",
    "Subsidy disbursement subject to government approval.",
];

/// How a cost-table row is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostRowKind {
    Item,
    Subtotal,
    Subsidy,
    Discount,
    Total,
}

/// One row of the itemized cost table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub label: String,
    pub amount: String,
    pub kind: CostRowKind,
}

/// Everything printed on a quotation, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationDocument {
    pub quotation_number: String,
    pub issue_date: String,
    pub valid_until: String,
    pub customer_lines: Vec<String>,
    pub specification_lines: Vec<String>,
    pub cost_rows: Vec<CostRow>,
    pub terms: Vec<String>,
    pub signatures: [String; 2],
}

/// Long date as printed on the quotation, e.g. `18 October 2026`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Lay out the content of a quotation.
pub fn build_document(
    quotation: &ValidatedQuotation,
    quotation_number: &str,
    issue_date: NaiveDate,
) -> QuotationDocument {
    let costs = &quotation.costs;
    let system = &quotation.system;

    let item = |label: String, amount: f64| CostRow {
        label,
        amount: format_inr(amount),
        kind: CostRowKind::Item,
    };

    let mut cost_rows = vec![
        item(format!("Solar Panels ({} nos)", system.panel_count), costs.panels),
        item("Solar Inverter".into(), costs.inverter),
        item("Mounting Structure".into(), costs.structure),
        item("Installation & Wiring".into(), costs.installation),
        item("Net Metering & Approval".into(), costs.net_metering),
        CostRow {
            label: "Subtotal".into(),
            amount: format_inr(costs.subtotal()),
            kind: CostRowKind::Subtotal,
        },
    ];
    if costs.subsidy > 0.0 {
        cost_rows.push(CostRow {
            label: "Government Subsidy (-)".into(),
            amount: format_inr(costs.subsidy),
            kind: CostRowKind::Subsidy,
        });
    }
    if costs.discount > 0.0 {
        cost_rows.push(CostRow {
            label: "Additional Discount (-)".into(),
            amount: format_inr(costs.discount),
            kind: CostRowKind::Discount,
        });
    }
    cost_rows.push(CostRow {
        label: "TOTAL PAYABLE".into(),
        amount: format_inr(costs.total()),
        kind: CostRowKind::Total,
    });

    QuotationDocument {
        quotation_number: quotation_number.to_string(),
        issue_date: format_long_date(issue_date),
        valid_until: format_long_date(issue_date + Duration::days(VALIDITY_DAYS)),
        customer_lines: vec![
            quotation.customer.name.clone(),
            quotation.customer.address.clone(),
            format!("Ph: {}", quotation.customer.phone),
        ],
        specification_lines: vec![
            format!("System Capacity: {} kW", system.size_kw),
            format!("Roof Type: {}", system.roof_type),
            format!("Number of Panels: {}", system.panel_count),
        ],
        cost_rows,
        terms: TERMS
            .iter()
            .enumerate()
            .map(|(i, term)| format!("{}. {term}", i + 1))
            .collect(),
        signatures: [
            "Customer Signature".to_string(),
            format!("For {COMPANY_NAME}"),
        ],
    }
}

// ---------------------------------------------------------------------------
// PDF layout
// ---------------------------------------------------------------------------

const MARGIN: f32 = 40.0;
const CONTENT_RIGHT: f32 = A4_WIDTH - MARGIN;
const ROW_HEIGHT: f32 = 22.0;
const LINE_HEIGHT: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;

/// Wrapped lines kept per customer or specification field.
const MAX_FIELD_LINES: usize = 2;

const BRAND: Rgb = Rgb(0.976, 0.451, 0.086);
const DARK: Rgb = Rgb(0.122, 0.161, 0.216);
const MUTED: Rgb = Rgb(0.42, 0.447, 0.502);
const ROW_ALT: Rgb = Rgb(0.976, 0.98, 0.984);
const RULE: Rgb = Rgb(0.898, 0.906, 0.922);
const SUBSIDY_GREEN: Rgb = Rgb(0.086, 0.639, 0.29);
const DISCOUNT_BLUE: Rgb = Rgb(0.145, 0.388, 0.922);

/// Render a laid-out quotation as a one-page PDF.
pub fn render_pdf(doc: &QuotationDocument) -> Vec<u8> {
    pdf::write_document(&[layout_page(doc)])
}

/// Wrap each field to `width`, keeping at most [`MAX_FIELD_LINES`] per field.
fn wrap_fields(fields: &[String], width: f32) -> Vec<String> {
    fields
        .iter()
        .flat_map(|field| pdf::wrap_text(field, BODY_SIZE, width, MAX_FIELD_LINES))
        .collect()
}

fn layout_page(doc: &QuotationDocument) -> Page {
    let mut page = Page::new();
    let mut y = A4_HEIGHT - MARGIN;

    // Header band.
    page.fill_rect(0.0, y - 50.0, A4_WIDTH, 50.0 + MARGIN, BRAND);
    page.text(MARGIN, y - 18.0, Font::Bold, 22.0, Rgb::WHITE, COMPANY_NAME);
    page.text(MARGIN, y - 36.0, Font::Regular, 10.0, Rgb::WHITE, COMPANY_TAGLINE);
    y -= 85.0;

    page.text_centered(A4_WIDTH / 2.0, y, Font::Bold, 16.0, DARK, DOCUMENT_TITLE);
    y -= 30.0;

    // Metadata and customer side by side.
    let right_col = A4_WIDTH / 2.0 + 10.0;
    page.text(MARGIN, y, Font::Bold, 11.0, BRAND, "Quotation Details");
    page.text(right_col, y, Font::Bold, 11.0, BRAND, "Customer Details");
    let meta = wrap_fields(
        &[
            format!("Number: {}", doc.quotation_number),
            format!("Date: {}", doc.issue_date),
            format!("Valid Until: {}", doc.valid_until),
        ],
        right_col - MARGIN - 10.0,
    );
    let customer = wrap_fields(&doc.customer_lines, CONTENT_RIGHT - right_col);
    let block_top = y - 16.0;
    for (i, line) in meta.iter().enumerate() {
        page.text(MARGIN, block_top - i as f32 * LINE_HEIGHT, Font::Regular, BODY_SIZE, DARK, line);
    }
    for (i, line) in customer.iter().enumerate() {
        page.text(right_col, block_top - i as f32 * LINE_HEIGHT, Font::Regular, BODY_SIZE, DARK, line);
    }
    let block_lines = meta.len().max(customer.len());
    y = block_top - block_lines as f32 * LINE_HEIGHT - LINE_HEIGHT;

    // Specification.
    page.text(MARGIN, y, Font::Bold, 11.0, BRAND, "Project Specifications");
    y -= 16.0;
    for line in wrap_fields(&doc.specification_lines, CONTENT_RIGHT - MARGIN) {
        page.text(MARGIN, y, Font::Regular, BODY_SIZE, DARK, &line);
        y -= LINE_HEIGHT;
    }
    y -= 12.0;

    // Cost table.
    let table_width = CONTENT_RIGHT - MARGIN;
    // Labels share the row with a right-aligned amount.
    let label_width = table_width * 0.65 - 8.0;
    page.fill_rect(MARGIN, y - ROW_HEIGHT + 6.0, table_width, ROW_HEIGHT, DARK);
    page.text(MARGIN + 8.0, y - 9.0, Font::Bold, 10.0, Rgb::WHITE, "Description");
    page.text_right(CONTENT_RIGHT - 8.0, y - 9.0, Font::Bold, 10.0, Rgb::WHITE, "Amount");
    y -= ROW_HEIGHT;

    for (i, row) in doc.cost_rows.iter().enumerate() {
        let (font, color, size) = match row.kind {
            CostRowKind::Item => (Font::Regular, DARK, 10.0),
            CostRowKind::Subtotal => (Font::Bold, DARK, 10.0),
            CostRowKind::Subsidy => (Font::Regular, SUBSIDY_GREEN, 10.0),
            CostRowKind::Discount => (Font::Regular, DISCOUNT_BLUE, 10.0),
            CostRowKind::Total => (Font::Bold, Rgb::WHITE, 12.0),
        };
        let background = match row.kind {
            CostRowKind::Total => Some(BRAND),
            _ if i % 2 == 1 => Some(ROW_ALT),
            _ => None,
        };
        if let Some(bg) = background {
            page.fill_rect(MARGIN, y - ROW_HEIGHT + 6.0, table_width, ROW_HEIGHT, bg);
        }
        let label = pdf::wrap_text(&row.label, size, label_width, 1)
            .into_iter()
            .next()
            .unwrap_or_default();
        page.text(MARGIN + 8.0, y - 9.0, font, size, color, &label);
        page.text_right(CONTENT_RIGHT - 8.0, y - 9.0, font, size, color, &row.amount);
        page.line(MARGIN, y - ROW_HEIGHT + 6.0, CONTENT_RIGHT, y - ROW_HEIGHT + 6.0, 0.5, RULE);
        y -= ROW_HEIGHT;
    }
    y -= 20.0;

    // Terms.
    page.text(MARGIN, y, Font::Bold, 11.0, DARK, "Terms & Conditions");
    y -= 16.0;
    for term in &doc.terms {
        page.text(MARGIN, y, Font::Regular, 9.0, MUTED, term);
        y -= 13.0;
    }

    // Signatures sit at a fixed distance from the bottom edge.
    let sig_y = MARGIN + 50.0;
    let sig_width = 180.0;
    let sig_x = [MARGIN, CONTENT_RIGHT - sig_width];
    for (x, label) in sig_x.iter().zip(&doc.signatures) {
        page.line(*x, sig_y, x + sig_width, sig_y, 0.8, DARK);
        page.text_centered(x + sig_width / 2.0, sig_y - 14.0, Font::Regular, 9.0, MUTED, label);
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotation::QuotationForm;

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
            subsidy_amount: None,
            discount_amount: None,
        }
    }

    fn quotation(subsidy: &str, discount: &str) -> ValidatedQuotation {
        QuotationForm {
            subsidy_amount: Some(subsidy.into()),
            discount_amount: Some(discount.into()),
            ..form()
        }
        .validate()
        .expect("fixture should validate")
    }

    fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn labels(doc: &QuotationDocument) -> Vec<&str> {
        doc.cost_rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn metadata_and_validity() {
        let doc = build_document(&quotation("0", "0"), "QTN-2026-042", issue_date());
        assert_eq!(doc.quotation_number, "QTN-2026-042");
        assert_eq!(doc.issue_date, "18 October 2026");
        assert_eq!(doc.valid_until, "17 November 2026");
        assert_eq!(doc.customer_lines[2], "Ph: +91 9876543210");
        assert_eq!(doc.specification_lines[0], "System Capacity: 3 kW");
    }

    #[test]
    fn reduction_rows_only_when_positive() {
        let doc = build_document(&quotation("0", "0"), "QTN-2026-001", issue_date());
        assert_eq!(doc.cost_rows.len(), 7);
        assert!(!labels(&doc).contains(&"Government Subsidy (-)"));
        assert!(!labels(&doc).contains(&"Additional Discount (-)"));

        let doc = build_document(&quotation("30000", "2500"), "QTN-2026-001", issue_date());
        assert_eq!(
            labels(&doc)[5..],
            [
                "Subtotal",
                "Government Subsidy (-)",
                "Additional Discount (-)",
                "TOTAL PAYABLE"
            ]
        );
    }

    #[test]
    fn reference_amounts_are_formatted() {
        let doc = build_document(&quotation("30000", "0"), "QTN-2026-001", issue_date());
        let subtotal = doc.cost_rows.iter().find(|r| r.kind == CostRowKind::Subtotal).unwrap();
        let total = doc.cost_rows.last().unwrap();
        assert_eq!(subtotal.amount, "Rs. 1,60,000");
        assert_eq!(total.kind, CostRowKind::Total);
        assert_eq!(total.amount, "Rs. 1,30,000");
        assert_eq!(doc.cost_rows[0].label, "Solar Panels (6 nos)");
    }

    #[test]
    fn terms_are_numbered() {
        let doc = build_document(&quotation("0", "0"), "QTN-2026-001", issue_date());
        assert_eq!(doc.terms.len(), 5);
        assert!(doc.terms[0].starts_with("1. Payment"));
        assert_eq!(doc.signatures[1], "For Convex Solar Solutions");
    }

    #[test]
    fn pdf_contains_every_block() {
        let doc = build_document(&quotation("30000", "0"), "QTN-2026-042", issue_date());
        let bytes = render_pdf(&doc);
        let text = String::from_utf8_lossy(&bytes);

        for needle in [
            "(Convex Solar Solutions)",
            "(SOLAR ROOFTOP QUOTATION)",
            "(Number: QTN-2026-042)",
            "(Ganesh Pawar)",
            "(Roof Type: Flat)",
            "(Government Subsidy \\(-\\))",
            "(Rs. 1,30,000)",
            "(Terms & Conditions)",
            "(Customer Signature)",
        ] {
            assert!(text.contains(needle), "missing {needle}");
        }
        assert!(!text.contains("Additional Discount"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let q = quotation("30000", "1000");
        let a = render_pdf(&build_document(&q, "QTN-2026-123", issue_date()));
        let b = render_pdf(&build_document(&q, "QTN-2026-123", issue_date()));
        assert_eq!(a, b);
    }

    /// `(x, font size, text)` for every text run in a page's content stream.
    fn text_runs(page: &Page) -> Vec<(f32, f32, String)> {
        page.content()
            .lines()
            .filter_map(|line| {
                let (head, rest) = line.split_once(" Td (")?;
                let text = rest.strip_suffix(") Tj ET")?;
                let tokens: Vec<&str> = head.split_whitespace().collect();
                let size = tokens.get(2)?.parse().ok()?;
                let x = tokens.get(8)?.parse().ok()?;
                Some((x, size, text.to_string()))
            })
            .collect()
    }

    #[test]
    fn special_characters_print_literally() {
        let q = QuotationForm {
            customer_name: "Sharma & Sons".into(),
            customer_address: "D'Souza Colony, Pune".into(),
            roof_type: r#"RCC "flat""#.into(),
            ..form()
        }
        .validate()
        .unwrap();
        let doc = build_document(&q, "QTN-2026-007", issue_date());
        assert_eq!(doc.customer_lines[0], "Sharma & Sons");

        let bytes = render_pdf(&doc);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Sharma & Sons)"));
        assert!(text.contains("(D'Souza Colony, Pune)"));
        assert!(text.contains(r#"(Roof Type: RCC "flat")"#));
        assert!(!text.contains("&amp;") && !text.contains("&#x27;") && !text.contains("&quot;"));
    }

    #[test]
    fn long_address_wraps_inside_the_page() {
        let address = "Flat 12, Sunshine Apartments, Near Savedi Naka, Pipeline Road, Ahmednagar 414003";
        let q = QuotationForm {
            customer_address: address.into(),
            ..form()
        }
        .validate()
        .unwrap();
        let page = layout_page(&build_document(&q, "QTN-2026-008", issue_date()));
        let runs = text_runs(&page);

        let address_runs: Vec<&str> = runs
            .iter()
            .map(|(_, _, text)| text.as_str())
            .filter(|text| address.contains(*text) && text.len() > 4)
            .collect();
        assert!(address_runs.len() >= 2, "{address_runs:?}");
        assert_eq!(address_runs.join(" "), address);

        for (x, size, text) in &runs {
            let right = x + pdf::text_width(text, *size);
            assert!(right <= CONTENT_RIGHT + 0.01, "{text} ends at {right}");
        }
    }

    #[test]
    fn oversized_fields_are_cut_with_ellipsis() {
        let q = QuotationForm {
            customer_address: "Savedi Road ".repeat(400),
            ..form()
        }
        .validate()
        .unwrap();
        let page = layout_page(&build_document(&q, "QTN-2026-009", issue_date()));
        let runs = text_runs(&page);

        let address_lines = runs.iter().filter(|(_, _, t)| t.contains("Savedi Road")).count();
        assert_eq!(address_lines, MAX_FIELD_LINES);
        assert!(runs.iter().any(|(_, _, t)| t.ends_with("...")));
    }
}

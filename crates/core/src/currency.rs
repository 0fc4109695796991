//! Rupee amount formatting with Indian digit grouping.
//!
//! Indian grouping puts a separator after the last three digits and then
//! every two digits: `1,30,000`, `12,34,56,789`.

/// Prefix used when printing amounts. Plain ASCII so it survives the
/// standard PDF fonts.
pub const CURRENCY_PREFIX: &str = "Rs.";

/// Round to the nearest whole rupee.
pub fn whole_rupees(amount: f64) -> i64 {
    amount.round() as i64
}

/// Group an integer with Indian thousands separators.
pub fn group_indian(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{sign}{},{tail}", groups.join(","))
}

/// Format an amount for display, e.g. `Rs. 1,30,000`.
pub fn format_inr(amount: f64) -> String {
    format!("{CURRENCY_PREFIX} {}", group_indian(whole_rupees(amount)))
}

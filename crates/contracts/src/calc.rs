//! Derived-value calculator: single source of truth for the planned
//! quantity and the completion percentage.
//!
//! The frontend uses it for live display while the user types; the backend
//! re-runs the same functions before persisting, so client-sent values never
//! reach storage unverified.

/// Per-unit output value by item code. Unknown codes yield 0.
const ITEM_UNIT_VALUES: &[(&str, f64)] = &[
    ("PROD0070", 4166.69),
    ("PROD0071", 4385.96),
    ("INTE9005", 2238.81),
    ("INTE9009", 2112.68),
    ("INTE9020", 2112.68),
];

/// Hourly rate with overtime
const RATE_OVERTIME: f64 = 18.90;
/// Hourly rate for the regular shift
const RATE_REGULAR: f64 = 17.02;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn unit_value(item_code: &str) -> f64 {
    let code = item_code.trim();
    ITEM_UNIT_VALUES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}

/// Planned quantity = per-unit value x hourly rate, 2 decimals.
/// Zero when the item code is not in the table.
pub fn planned_quantity(item_code: &str, overtime: bool) -> f64 {
    let rate = if overtime { RATE_OVERTIME } else { RATE_REGULAR };
    round2(unit_value(item_code) * rate)
}

/// Completion percentage = produced / planned * 100, 2 decimals.
/// Always 0.0 when the planned quantity is non-positive or non-finite,
/// never NaN or infinity.
pub fn completion_percentage(produced_quantity: f64, planned_quantity: f64) -> f64 {
    if !planned_quantity.is_finite() || planned_quantity <= 0.0 || !produced_quantity.is_finite() {
        return 0.0;
    }
    round2(produced_quantity / planned_quantity * 100.0)
}

/// 2-decimal display string ("0.00", "63.49")
pub fn format2(v: f64) -> String {
    format!("{:.2}", v)
}

use serde_json::Value;

use super::{format_scalar, result_of};

/// Headline fields, in priority order, for `--output minimal`.
const PRIORITY_KEYS: [&str; 5] = [
    "monthly_installment",
    "financial_health_score",
    "best_offer",
    "installment",
    "total_payable",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_scalar(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result));
}

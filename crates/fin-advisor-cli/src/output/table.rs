use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, result_of, row_field};

/// Render the result envelope as tables: headline fields first, then any
/// row collection (schedule periods, offer quotes), then warnings.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            print_fields(map);
            if let Some((name, rows)) = row_field(result) {
                println!("\n{name}:");
                print_rows(rows);
            }
        }
        other => println!("{}", format_scalar(other)),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        match val {
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => continue,
            Value::Object(inner) => {
                for (sub, v) in inner {
                    builder.push_record([format!("{key}.{sub}"), format_scalar(v)]);
                }
            }
            _ => builder.push_record([key.clone(), format_scalar(val)]),
        }
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h).map(format_scalar).unwrap_or_default())
            .collect();
        builder.push_record(cells);
    }
    println!("{}", Table::from(builder));
}

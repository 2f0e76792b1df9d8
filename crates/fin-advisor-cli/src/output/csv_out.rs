use serde_json::Value;
use std::io;

use super::{format_scalar, result_of, row_field};

/// Write output as CSV to stdout: one row per schedule period / offer quote
/// when the result has them, otherwise `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let result = result_of(value);

    if let Some((_, rows)) = row_field(result) {
        write_rows(&mut wtr, rows);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            if let Value::Object(inner) = val {
                for (sub, v) in inner {
                    let _ = wtr.write_record([format!("{key}.{sub}"), format_scalar(v)]);
                }
            } else {
                let _ = wtr.write_record([key.clone(), format_scalar(val)]);
            }
        }
    } else {
        let _ = wtr.write_record([format_scalar(result)]);
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&cells);
    }
}

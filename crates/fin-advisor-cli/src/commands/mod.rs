pub mod health;
pub mod loan;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::input;

/// Resolve a typed record from `--input` or piped stdin, in that order.
pub(crate) fn read_record<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        debug!(path, "reading input file");
        return Ok(Some(input::file::read_json(path)?));
    }
    if let Some(data) = input::stdin::read_stdin()? {
        debug!("reading input from stdin");
        return Ok(Some(serde_json::from_value(data)?));
    }
    Ok(None)
}

/// Surface computation warnings on the log as well as in the envelope.
pub(crate) fn log_warnings(warnings: &[String]) {
    for w in warnings {
        warn!("{w}");
    }
}

//! Rate extraction from endpoint payloads and display strings

use serde_json::Value;

/// Extract the rate addressed by `field` from a JSON object payload.
///
/// `field` may be a dotted path such as `rates.EUR`. A field that is absent
/// (or `null`) yields `0.0` rather than an error, so callers cannot tell a
/// missing rate from a genuine zero.
pub fn parse_from_payload(raw: &str, field: &str) -> crate::Result<f64> {
    let payload: Value = serde_json::from_str(raw)
        .map_err(|e| crate::RateWatchError::Parse(format!("Invalid JSON payload: {}", e)))?;

    if !payload.is_object() {
        return Err(crate::RateWatchError::Parse(format!(
            "Expected a JSON object, got {}",
            value_kind(&payload)
        )));
    }

    let mut current = &payload;
    for segment in field.split('.') {
        let object = current.as_object().ok_or_else(|| {
            crate::RateWatchError::Parse(format!(
                "Cannot look up '{}' in {}",
                segment,
                value_kind(current)
            ))
        })?;
        match object.get(segment) {
            Some(next) => current = next,
            None => {
                tracing::debug!("Field '{}' missing from payload, using 0.0", field);
                return Ok(0.0);
            }
        }
    }

    let rate = match current {
        Value::Null => {
            tracing::debug!("Field '{}' is null, using 0.0", field);
            return Ok(0.0);
        }
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match rate {
        Some(rate) if rate.is_finite() => {
            tracing::debug!("Parsed {} rate: {}", field, rate);
            Ok(rate)
        }
        _ => Err(crate::RateWatchError::Parse(format!(
            "Field '{}' is not a finite number: {}",
            field, current
        ))),
    }
}

/// Render a rate in the legacy `"<LABEL>: <number>"` display format
pub fn format_display(label: &str, rate: f64) -> String {
    format!("{}: {}", label, rate)
}

/// Recover the number from a `"<LABEL>: <number>"` display string.
///
/// Returns `0.0` when the label is not followed by a number.
pub fn parse_from_display_string(display: &str, label: &str) -> f64 {
    let pattern = format!("{}: ([0-9.]+)", regex::escape(label));
    let rate = match regex::Regex::new(&pattern) {
        Ok(re) => re
            .captures(display)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0),
        Err(_) => 0.0,
    };
    tracing::debug!("Extracted rate from display string: {}", rate);
    rate
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Configuration argument access
//!
//! Node handlers receive their resolved configuration as an ordered
//! `ConfigItem` slice; these helpers look entries up by key and coerce
//! the loosely typed values the builder frontend submits (numbers often
//! arrive as strings).

use pipeline_engine::{ConfigItem, ExecuteError};
use serde_json::Value;

/// Raw value for a configuration key.
pub fn arg_value<'a>(args: &'a [ConfigItem], name: &str) -> Option<&'a Value> {
    args.iter()
        .find(|item| item.name == name)
        .map(|item| &item.value)
}

/// String value for a key. Non-string scalars are stringified; null and
/// missing entries yield `None`.
pub fn arg_str(args: &[ConfigItem], name: &str) -> Option<String> {
    match arg_value(args, name)? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Numeric value for a key, accepting both numbers and numeric strings.
pub fn arg_f64(args: &[ConfigItem], name: &str) -> Option<f64> {
    match arg_value(args, name)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// String value for a key that must be present and non-empty.
pub fn require_str(args: &[ConfigItem], name: &str) -> Result<String, ExecuteError> {
    arg_str(args, name)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ExecuteError::failed(format!("missing required '{}' configuration", name)))
}

/// Coerce the incoming payload into prompt text.
///
/// List-shaped payloads contribute their first element (the slice this
/// node consumed); strings pass through, everything else stringifies.
pub fn prompt_text(data: &Value) -> String {
    let inner = match data {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return String::new(),
        },
        other => other,
    };
    match inner {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> Vec<ConfigItem> {
        vec![
            ConfigItem::new("Model", "gpt-4o"),
            ConfigItem::new("Temperature", "0.7"),
            ConfigItem::new("Max Tokens", 256),
            ConfigItem::new("Empty", Value::Null),
        ]
    }

    #[test]
    fn test_arg_str_coerces_scalars() {
        let args = args();
        assert_eq!(arg_str(&args, "Model").as_deref(), Some("gpt-4o"));
        assert_eq!(arg_str(&args, "Max Tokens").as_deref(), Some("256"));
        assert_eq!(arg_str(&args, "Empty"), None);
        assert_eq!(arg_str(&args, "Absent"), None);
    }

    #[test]
    fn test_arg_f64_parses_numeric_strings() {
        let args = args();
        assert_eq!(arg_f64(&args, "Temperature"), Some(0.7));
        assert_eq!(arg_f64(&args, "Max Tokens"), Some(256.0));
        assert_eq!(arg_f64(&args, "Model"), None);
    }

    #[test]
    fn test_require_str_rejects_empty() {
        let mut args = args();
        assert!(require_str(&args, "Model").is_ok());
        assert!(require_str(&args, "Absent").is_err());

        args.push(ConfigItem::new("Blank", ""));
        assert!(require_str(&args, "Blank").is_err());
    }

    #[test]
    fn test_prompt_text_unwraps_payload_shapes() {
        assert_eq!(prompt_text(&json!("hello")), "hello");
        assert_eq!(prompt_text(&json!(["first", "second"])), "first");
        assert_eq!(prompt_text(&json!(42)), "42");
        assert_eq!(prompt_text(&json!([])), "");
    }
}

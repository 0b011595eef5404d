use serde_json::{json, Value};

use crate::error::{HyperliquidError, Result};

/// Value type accepted for a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    /// Numeric id or string id, e.g. an order id or a client order id
    IntegerOrString,
    Enum(&'static [&'static str]),
}

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Integer value of `value`, accepting integral floats such as `1700000000000.0`.
fn as_integer(value: &Value) -> Option<Value> {
    if value.is_i64() || value.is_u64() {
        return Some(value.clone());
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || f.abs() > MAX_EXACT_FLOAT {
        return None;
    }
    if f >= 0.0 {
        Some(Value::from(f as u64))
    } else {
        Some(Value::from(f as i64))
    }
}

impl ParamKind {
    /// The value to forward upstream, or `None` if it is the wrong kind
    fn accept(&self, value: &Value) -> Option<Value> {
        match self {
            ParamKind::String if value.is_string() => Some(value.clone()),
            ParamKind::Integer => as_integer(value),
            ParamKind::Boolean if value.is_boolean() => Some(value.clone()),
            ParamKind::IntegerOrString if value.is_string() => Some(value.clone()),
            ParamKind::IntegerOrString => as_integer(value),
            ParamKind::Enum(allowed)
                if value.as_str().map(|s| allowed.contains(&s)).unwrap_or(false) =>
            {
                Some(value.clone())
            }
            _ => None,
        }
    }

    fn expected(&self) -> String {
        match self {
            ParamKind::String => "a string".to_string(),
            ParamKind::Integer => "an integer".to_string(),
            ParamKind::Boolean => "a boolean".to_string(),
            ParamKind::IntegerOrString => "an integer or a string".to_string(),
            ParamKind::Enum(allowed) => format!("one of {}", allowed.join(", ")),
        }
    }
}

/// A single declared tool parameter. The name doubles as the upstream body key.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        ParamSpec {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        ParamSpec {
            name,
            kind,
            required: false,
            description,
        }
    }

    /// JSON Schema fragment for this parameter
    pub fn schema(&self) -> Value {
        match self.kind {
            ParamKind::String => json!({ "type": "string", "description": self.description }),
            ParamKind::Integer => json!({ "type": "integer", "description": self.description }),
            ParamKind::Boolean => json!({ "type": "boolean", "description": self.description }),
            ParamKind::IntegerOrString => json!({
                "type": ["integer", "string"],
                "description": self.description
            }),
            ParamKind::Enum(allowed) => json!({
                "type": "string",
                "enum": allowed,
                "description": self.description
            }),
        }
    }

    /// Check a supplied value against the declared kind and return the
    /// value to send; integral floats are sent as integers.
    pub fn check(&self, value: &Value) -> Result<Value> {
        self.kind.accept(value).ok_or_else(|| {
            HyperliquidError::InvalidArguments(format!(
                "`{}` must be {}, got {}",
                self.name,
                self.kind.expected(),
                value
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVALS: &[&str] = &["1m", "1h"];

    #[test]
    fn test_integer_kind() {
        let param = ParamSpec::required("startTime", ParamKind::Integer, "start");
        assert!(param.check(&json!(1_700_000_000_000u64)).is_ok());
        assert!(param.check(&json!("1700000000000")).is_err());
        assert!(param.check(&json!(1.5)).is_err());
    }

    #[test]
    fn test_integral_float_sent_as_integer() {
        let param = ParamSpec::required("startTime", ParamKind::Integer, "start");
        let value = param.check(&json!(1700000000000.0)).unwrap();
        assert!(value.is_u64());
        assert_eq!(value, json!(1_700_000_000_000u64));
        assert_eq!(serde_json::to_string(&value).unwrap(), "1700000000000");

        assert_eq!(param.check(&json!(-5.0)).unwrap(), json!(-5));
        assert!(param.check(&json!(1e300)).is_err());

        let param = ParamSpec::required("oid", ParamKind::IntegerOrString, "order id");
        assert_eq!(param.check(&json!(91490942.0)).unwrap(), json!(91490942));
    }

    #[test]
    fn test_integer_or_string_kind() {
        let param = ParamSpec::required("oid", ParamKind::IntegerOrString, "order id");
        assert!(param.check(&json!(91490942)).is_ok());
        assert!(param.check(&json!("0x1234567890abcdef1234567890abcdef")).is_ok());
        assert!(param.check(&json!(true)).is_err());
    }

    #[test]
    fn test_enum_kind() {
        let param = ParamSpec::required("interval", ParamKind::Enum(INTERVALS), "interval");
        assert!(param.check(&json!("1h")).is_ok());

        let err = param.check(&json!("2m")).unwrap_err();
        assert!(err.to_string().contains("one of 1m, 1h"));
    }

    #[test]
    fn test_schema_fragments() {
        let param = ParamSpec::optional("aggregateByTime", ParamKind::Boolean, "combine fills");
        assert_eq!(
            param.schema(),
            json!({ "type": "boolean", "description": "combine fills" })
        );

        let param = ParamSpec::required("interval", ParamKind::Enum(INTERVALS), "interval");
        assert_eq!(param.schema()["enum"], json!(["1m", "1h"]));
    }
}

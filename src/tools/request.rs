use serde_json::{Map, Value};

use crate::error::{HyperliquidError, Result};
use crate::tools::endpoints::{BodyLayout, EndpointSpec};

/// Build the upstream request body for a tool call.
///
/// `type` is always the first key. Optional fields appear only when the
/// caller supplied them; `false`, `0` and `""` count as supplied, a JSON
/// `null` does not.
pub fn build_body(spec: &EndpointSpec, args: &Value) -> Result<Value> {
    let args = as_object(spec, args)?;

    let mut fields = Map::new();
    for param in spec.params {
        match args.and_then(|a| a.get(param.name)) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(HyperliquidError::InvalidArguments(format!(
                        "{}: missing required field `{}`",
                        spec.name, param.name
                    )));
                }
            }
            Some(value) => {
                fields.insert(param.name.to_string(), param.check(value)?);
            }
        }
    }

    let mut body = Map::new();
    body.insert(
        "type".to_string(),
        Value::String(spec.discriminator.to_string()),
    );
    match spec.layout {
        BodyLayout::Flat => body.extend(fields),
        BodyLayout::Nested(key) => {
            body.insert(key.to_string(), Value::Object(fields));
        }
    }

    Ok(Value::Object(body))
}

fn as_object<'a>(spec: &EndpointSpec, args: &'a Value) -> Result<Option<&'a Map<String, Value>>> {
    match args {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(HyperliquidError::InvalidArguments(format!(
            "{}: arguments must be an object, got {}",
            spec.name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::endpoints::{find, ENDPOINTS};
    use crate::tools::params::ParamKind;
    use serde_json::json;

    const ADDR: &str = "0x0000000000000000000000000000000000000001";

    fn sample(kind: ParamKind) -> Value {
        match kind {
            ParamKind::String => json!(ADDR),
            ParamKind::Integer => json!(1_700_000_000_000u64),
            ParamKind::Boolean => json!(false),
            ParamKind::IntegerOrString => json!(42),
            ParamKind::Enum(allowed) => json!(allowed[0]),
        }
    }

    fn keys(value: &Value) -> Vec<String> {
        value.as_object().unwrap().keys().cloned().collect()
    }

    fn build(name: &str, args: Value) -> Result<Value> {
        build_body(find(name).unwrap(), &args)
    }

    #[test]
    fn test_required_only_bodies_for_every_tool() {
        for spec in ENDPOINTS {
            let mut args = Map::new();
            for param in spec.params.iter().filter(|p| p.required) {
                args.insert(param.name.to_string(), sample(param.kind));
            }

            let body = build_body(spec, &Value::Object(args.clone())).unwrap();
            assert_eq!(body["type"], spec.discriminator, "{}", spec.name);
            assert_eq!(keys(&body)[0], "type", "{}", spec.name);

            let fields = match spec.layout {
                BodyLayout::Flat => {
                    let mut expected = vec!["type".to_string()];
                    expected.extend(args.keys().cloned());
                    assert_eq!(keys(&body), expected, "{}", spec.name);
                    body.clone()
                }
                BodyLayout::Nested(key) => {
                    assert_eq!(keys(&body), vec!["type".to_string(), key.to_string()]);
                    body[key].clone()
                }
            };

            for param in spec.params.iter().filter(|p| !p.required) {
                assert!(fields.get(param.name).is_none(), "{}.{}", spec.name, param.name);
            }
        }
    }

    #[test]
    fn test_supplied_optionals_appear_for_every_tool() {
        for spec in ENDPOINTS.iter().filter(|s| s.params.iter().any(|p| !p.required)) {
            let args: Map<String, Value> = spec
                .params
                .iter()
                .map(|p| (p.name.to_string(), sample(p.kind)))
                .collect();

            let body = build_body(spec, &Value::Object(args)).unwrap();
            for param in spec.params {
                assert_eq!(body[param.name], sample(param.kind), "{}.{}", spec.name, param.name);
            }
        }
    }

    #[test]
    fn test_positions_body() {
        let body = build("positions", json!({ "user": ADDR })).unwrap();
        assert_eq!(body, json!({ "type": "clearinghouseState", "user": ADDR }));

        let body = build("positions", json!({ "user": ADDR, "dex": "xyz" })).unwrap();
        assert_eq!(
            body,
            json!({ "type": "clearinghouseState", "user": ADDR, "dex": "xyz" })
        );
    }

    #[test]
    fn test_falsy_optionals_are_still_sent() {
        let body = build("user-fills", json!({ "user": ADDR, "aggregateByTime": false })).unwrap();
        assert_eq!(body["aggregateByTime"], json!(false));

        let body = build("all-mids", json!({ "dex": "" })).unwrap();
        assert_eq!(body, json!({ "type": "allMids", "dex": "" }));

        let body = build("funding-history", json!({ "coin": "ETH", "startTime": 0, "endTime": 0 }))
            .unwrap();
        assert_eq!(body["startTime"], json!(0));
        assert_eq!(body["endTime"], json!(0));
    }

    #[test]
    fn test_integral_float_times_forwarded_as_integers() {
        let body = build(
            "user-fills-by-time",
            json!({ "user": ADDR, "startTime": 1700000000000.0, "endTime": 1700003600000.0 }),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            format!(
                r#"{{"type":"userFillsByTime","user":"{}","startTime":1700000000000,"endTime":1700003600000}}"#,
                ADDR
            )
        );

        assert!(build("l2-book", json!({ "coin": "BTC", "nSigFigs": 4.5 })).is_err());
    }

    #[test]
    fn test_null_optional_is_omitted() {
        let body = build("l2-book", json!({ "coin": "BTC", "nSigFigs": null, "mantissa": null }))
            .unwrap();
        assert_eq!(body, json!({ "type": "l2Book", "coin": "BTC" }));
    }

    #[test]
    fn test_candle_snapshot_nests_under_req() {
        let body = build(
            "candle-snapshot",
            json!({
                "coin": "BTC",
                "interval": "15m",
                "startTime": 1681923600000u64,
                "endTime": 1681924499999u64
            }),
        )
        .unwrap();

        assert_eq!(
            body,
            json!({
                "type": "candleSnapshot",
                "req": {
                    "coin": "BTC",
                    "interval": "15m",
                    "startTime": 1681923600000u64,
                    "endTime": 1681924499999u64
                }
            })
        );
        assert!(body.get("coin").is_none());
    }

    #[test]
    fn test_order_status_accepts_numeric_and_cloid() {
        let body = build("order-status", json!({ "user": ADDR, "oid": 91490942 })).unwrap();
        assert_eq!(body["oid"], json!(91490942));

        let cloid = "0x1234567890abcdef1234567890abcdef";
        let body = build("order-status", json!({ "user": ADDR, "oid": cloid })).unwrap();
        assert_eq!(body["oid"], json!(cloid));
    }

    #[test]
    fn test_missing_required_field() {
        let err = build("user-funding", json!({ "user": ADDR })).unwrap_err();
        assert!(matches!(err, HyperliquidError::InvalidArguments(_)));
        assert!(err.to_string().contains("startTime"));

        assert!(build("spot-balances", Value::Null).is_err());
        assert!(build("spot-balances", json!({ "user": null })).is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(build("user-fills", json!({ "user": ADDR, "aggregateByTime": "yes" })).is_err());
        assert!(build("user-funding", json!({ "user": ADDR, "startTime": "yesterday" })).is_err());
        assert!(build(
            "candle-snapshot",
            json!({ "coin": "BTC", "interval": "2m", "startTime": 0, "endTime": 1 })
        )
        .is_err());
    }

    #[test]
    fn test_no_argument_tools() {
        assert_eq!(build("perp-dexs", Value::Null).unwrap(), json!({ "type": "perpDexs" }));
        assert_eq!(build("spot-meta", json!({})).unwrap(), json!({ "type": "spotMeta" }));
        assert!(build("spot-meta", json!(["x"])).is_err());
    }

    #[test]
    fn test_unknown_arguments_ignored() {
        let body = build("user-role", json!({ "user": ADDR, "walletAddress": ADDR })).unwrap();
        assert_eq!(body, json!({ "type": "userRole", "user": ADDR }));
    }
}

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::tools::params::{ParamKind, ParamSpec};
use crate::tools::positions;

/// Upstream path every info-style tool posts to.
pub const INFO_ENDPOINT: &str = "info";

pub const CANDLE_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "8h", "12h", "1d", "3d", "1w", "1M",
];

/// Where the tool's fields go in the upstream body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLayout {
    /// Fields sit next to `type`
    Flat,
    /// Fields nest under a single sub-object key
    Nested(&'static str),
}

/// How the raw upstream JSON becomes the tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Passed through verbatim
    Raw,
    /// Reduced to the open-positions summary
    Positions,
}

impl ResponseShape {
    pub fn apply(self, raw: Value) -> Result<Value> {
        match self {
            ResponseShape::Raw => Ok(raw),
            ResponseShape::Positions => positions::reshape(raw),
        }
    }
}

/// One row of the tool table.
#[derive(Debug, Clone, Copy)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub endpoint: &'static str,
    /// Value of the `type` field in the upstream body
    pub discriminator: &'static str,
    pub params: &'static [ParamSpec],
    pub layout: BodyLayout,
    pub shape: ResponseShape,
}

impl EndpointSpec {
    const fn info(
        name: &'static str,
        discriminator: &'static str,
        description: &'static str,
        params: &'static [ParamSpec],
    ) -> Self {
        EndpointSpec {
            name,
            description,
            endpoint: INFO_ENDPOINT,
            discriminator,
            params,
            layout: BodyLayout::Flat,
            shape: ResponseShape::Raw,
        }
    }

    const fn nested(self, key: &'static str) -> Self {
        EndpointSpec {
            layout: BodyLayout::Nested(key),
            ..self
        }
    }

    const fn reshaped(self, shape: ResponseShape) -> Self {
        EndpointSpec { shape, ..self }
    }

    /// JSON Schema describing the tool's arguments
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }
}

const USER: ParamSpec = ParamSpec::required(
    "user",
    ParamKind::String,
    "Onchain address in 42-character hexadecimal format, e.g. 0x0000000000000000000000000000000000000000",
);
const USER_OPT: ParamSpec = ParamSpec::optional(
    "user",
    ParamKind::String,
    "Onchain address of a depositor; include to get that user's state in the vault",
);
const DEX_OPT: ParamSpec = ParamSpec::optional(
    "dex",
    ParamKind::String,
    "Perp dex name. Omit for the first perp dex; spot mids are only included with the first perp dex",
);
const COIN: ParamSpec = ParamSpec::required(
    "coin",
    ParamKind::String,
    "Coin name, e.g. BTC for perps or PURR/USDC and @107 for spot",
);
const START_TIME: ParamSpec = ParamSpec::required(
    "startTime",
    ParamKind::Integer,
    "Start time in milliseconds, inclusive",
);
const END_TIME: ParamSpec =
    ParamSpec::required("endTime", ParamKind::Integer, "End time in milliseconds, inclusive");
const END_TIME_OPT: ParamSpec = ParamSpec::optional(
    "endTime",
    ParamKind::Integer,
    "End time in milliseconds, inclusive. Defaults to the current time",
);
const AGGREGATE_BY_TIME: ParamSpec = ParamSpec::optional(
    "aggregateByTime",
    ParamKind::Boolean,
    "When true, partial fills are combined when a crossing order is filled by multiple resting orders",
);
const OID: ParamSpec = ParamSpec::required(
    "oid",
    ParamKind::IntegerOrString,
    "Order id (integer) or client order id (16-byte hex string)",
);
const N_SIG_FIGS: ParamSpec = ParamSpec::optional(
    "nSigFigs",
    ParamKind::Integer,
    "Aggregate levels to this many significant figures (2, 3, 4 or 5). Omit for full precision",
);
const MANTISSA: ParamSpec = ParamSpec::optional(
    "mantissa",
    ParamKind::Integer,
    "Only allowed when nSigFigs is 5. Accepts 1, 2 or 5",
);
const INTERVAL: ParamSpec = ParamSpec::required(
    "interval",
    ParamKind::Enum(CANDLE_INTERVALS),
    "Candle interval",
);
const TOKEN_ID: ParamSpec = ParamSpec::required(
    "tokenId",
    ParamKind::String,
    "Onchain id in 34-character hexadecimal format, e.g. 0x00000000000000000000000000000000",
);
const BUILDER: ParamSpec =
    ParamSpec::required("builder", ParamKind::String, "Builder address the fee applies to");
const VAULT_ADDRESS: ParamSpec = ParamSpec::required(
    "vaultAddress",
    ParamKind::String,
    "Vault address in 42-character hexadecimal format",
);

/// Every tool exposed to the host.
pub const ENDPOINTS: &[EndpointSpec] = &[
    EndpointSpec::info(
        "positions",
        "clearinghouseState",
        "Open perpetual positions, unrealized PnL and margin summary for a user",
        &[USER, DEX_OPT],
    )
    .reshaped(ResponseShape::Positions),
    EndpointSpec::info("perp-dexs", "perpDexs", "List all perpetual dexs", &[]),
    EndpointSpec::info(
        "perp-meta",
        "meta",
        "Perpetuals metadata: universe of assets and margin tables",
        &[DEX_OPT],
    ),
    EndpointSpec::info(
        "perp-asset-contexts",
        "metaAndAssetCtxs",
        "Perpetuals metadata with asset contexts such as mark price, funding and open interest",
        &[],
    ),
    EndpointSpec::info(
        "user-funding",
        "userFunding",
        "A user's funding payment history",
        &[USER, START_TIME, END_TIME_OPT],
    ),
    EndpointSpec::info(
        "user-non-funding-ledger",
        "userNonFundingLedgerUpdates",
        "A user's non-funding ledger updates: deposits, transfers and withdrawals",
        &[USER, START_TIME, END_TIME_OPT],
    ),
    EndpointSpec::info(
        "funding-history",
        "fundingHistory",
        "Historical funding rates for a coin",
        &[COIN, START_TIME, END_TIME_OPT],
    ),
    EndpointSpec::info(
        "predicted-fundings",
        "predictedFundings",
        "Predicted funding rates for each asset across venues",
        &[],
    ),
    EndpointSpec::info(
        "perps-at-oi-cap",
        "perpsAtOpenInterestCap",
        "Perpetuals currently at their open interest cap",
        &[],
    ),
    EndpointSpec::info(
        "perp-deploy-auction",
        "perpDeployAuctionStatus",
        "Status of the perp deploy auction",
        &[],
    ),
    EndpointSpec::info("spot-meta", "spotMeta", "Spot metadata: tokens and pairs", &[]),
    EndpointSpec::info(
        "spot-asset-contexts",
        "spotMetaAndAssetCtxs",
        "Spot metadata with asset contexts such as mark price and volume",
        &[],
    ),
    EndpointSpec::info(
        "spot-balances",
        "spotClearinghouseState",
        "A user's spot token balances",
        &[USER],
    ),
    EndpointSpec::info(
        "spot-deploy-auction",
        "spotDeployState",
        "Spot deploy auction state for a user",
        &[USER],
    ),
    EndpointSpec::info(
        "token-details",
        "tokenDetails",
        "Details of a spot token: supply, deployer and genesis",
        &[TOKEN_ID],
    ),
    EndpointSpec::info(
        "all-mids",
        "allMids",
        "Mid prices for all actively traded coins",
        &[DEX_OPT],
    ),
    EndpointSpec::info(
        "open-orders",
        "openOrders",
        "A user's open orders",
        &[USER, DEX_OPT],
    ),
    EndpointSpec::info(
        "frontend-open-orders",
        "frontendOpenOrders",
        "A user's open orders with additional frontend info such as trigger conditions",
        &[USER, DEX_OPT],
    ),
    EndpointSpec::info(
        "user-fills",
        "userFills",
        "A user's most recent fills",
        &[USER, AGGREGATE_BY_TIME],
    ),
    EndpointSpec::info(
        "user-fills-by-time",
        "userFillsByTime",
        "A user's fills within a time range",
        &[USER, START_TIME, END_TIME_OPT, AGGREGATE_BY_TIME],
    ),
    EndpointSpec::info(
        "user-rate-limit",
        "userRateLimit",
        "A user's request rate limit usage",
        &[USER],
    ),
    EndpointSpec::info(
        "order-status",
        "orderStatus",
        "Status of an order by order id or client order id",
        &[USER, OID],
    ),
    EndpointSpec::info(
        "l2-book",
        "l2Book",
        "L2 order book snapshot for a coin, at most 20 levels per side",
        &[COIN, N_SIG_FIGS, MANTISSA],
    ),
    EndpointSpec::info(
        "candle-snapshot",
        "candleSnapshot",
        "Candles for a coin and interval; only the most recent 5000 candles are available",
        &[COIN, INTERVAL, START_TIME, END_TIME],
    )
    .nested("req"),
    EndpointSpec::info(
        "max-builder-fee",
        "maxBuilderFee",
        "Maximum builder fee a user has approved for a builder",
        &[USER, BUILDER],
    ),
    EndpointSpec::info(
        "historical-orders",
        "historicalOrders",
        "A user's most recent historical orders",
        &[USER],
    ),
    EndpointSpec::info(
        "user-twap-slice-fills",
        "userTwapSliceFills",
        "A user's most recent TWAP slice fills",
        &[USER],
    ),
    EndpointSpec::info("subaccounts", "subAccounts", "A user's subaccounts", &[USER]),
    EndpointSpec::info(
        "vault-details",
        "vaultDetails",
        "Details of a vault, optionally including a depositor's state",
        &[VAULT_ADDRESS, USER_OPT],
    ),
    EndpointSpec::info(
        "user-vault-equities",
        "userVaultEquities",
        "A user's vault deposits",
        &[USER],
    ),
    EndpointSpec::info(
        "user-role",
        "userRole",
        "A user's role: user, agent, vault or subaccount",
        &[USER],
    ),
    EndpointSpec::info(
        "user-portfolio",
        "portfolio",
        "A user's portfolio history of account value and PnL",
        &[USER],
    ),
    EndpointSpec::info("user-referral", "referral", "A user's referral information", &[USER]),
    EndpointSpec::info(
        "user-fees",
        "userFees",
        "A user's fee schedule and trading volume",
        &[USER],
    ),
    EndpointSpec::info(
        "user-delegations",
        "delegations",
        "A user's staking delegations",
        &[USER],
    ),
    EndpointSpec::info(
        "user-staking-summary",
        "delegatorSummary",
        "A user's staking summary",
        &[USER],
    ),
    EndpointSpec::info(
        "user-staking-history",
        "delegatorHistory",
        "A user's staking history",
        &[USER],
    ),
    EndpointSpec::info(
        "user-staking-rewards",
        "delegatorRewards",
        "A user's staking rewards",
        &[USER],
    ),
];

/// Look up a tool by name
pub fn find(name: &str) -> Option<&'static EndpointSpec> {
    ENDPOINTS.iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_size_and_unique_names() {
        assert_eq!(ENDPOINTS.len(), 38);

        let names: HashSet<&str> = ENDPOINTS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), ENDPOINTS.len());
    }

    #[test]
    fn test_all_tools_post_to_info() {
        assert!(ENDPOINTS.iter().all(|s| s.endpoint == INFO_ENDPOINT));
    }

    #[test]
    fn test_only_candle_snapshot_nests() {
        let nested: Vec<&str> = ENDPOINTS
            .iter()
            .filter(|s| s.layout != BodyLayout::Flat)
            .map(|s| s.name)
            .collect();
        assert_eq!(nested, vec!["candle-snapshot"]);
        assert_eq!(find("candle-snapshot").unwrap().layout, BodyLayout::Nested("req"));
    }

    #[test]
    fn test_only_positions_reshapes() {
        let reshaped: Vec<&str> = ENDPOINTS
            .iter()
            .filter(|s| s.shape != ResponseShape::Raw)
            .map(|s| s.name)
            .collect();
        assert_eq!(reshaped, vec!["positions"]);
    }

    #[test]
    fn test_discriminators() {
        assert_eq!(find("positions").unwrap().discriminator, "clearinghouseState");
        assert_eq!(find("perps-at-oi-cap").unwrap().discriminator, "perpsAtOpenInterestCap");
        assert_eq!(find("user-portfolio").unwrap().discriminator, "portfolio");
        assert_eq!(find("user-staking-rewards").unwrap().discriminator, "delegatorRewards");
        assert!(find("get-hyperliquid-positions").is_none());
    }

    #[test]
    fn test_input_schema_lists_required_fields() {
        let schema = find("user-fills-by-time").unwrap().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["user", "startTime"]));
        assert_eq!(schema["properties"]["aggregateByTime"]["type"], "boolean");
        assert_eq!(schema["properties"]["endTime"]["type"], "integer");

        let schema = find("perp-dexs").unwrap().input_schema();
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_candle_interval_enum() {
        assert_eq!(CANDLE_INTERVALS.len(), 14);
        let schema = find("candle-snapshot").unwrap().input_schema();
        assert_eq!(schema["properties"]["interval"]["enum"].as_array().unwrap().len(), 14);
        assert_eq!(
            schema["required"],
            json!(["coin", "interval", "startTime", "endTime"])
        );
    }
}

//! Reshaping of `clearinghouseState` into an open-positions summary.
//!
//! Leaf values are carried through untouched (the upstream sends most
//! numbers as decimal strings). A missing or mistyped container field is
//! reported as [`HyperliquidError::MalformedResponse`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HyperliquidError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClearinghouseState {
    asset_positions: Vec<AssetPosition>,
    margin_summary: MarginSummary,
    withdrawable: Value,
}

#[derive(Debug, Deserialize)]
struct AssetPosition {
    position: Position,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Position {
    coin: Value,
    szi: Value,
    entry_px: Value,
    unrealized_pnl: Value,
    leverage: Leverage,
    liquidation_px: Value,
    return_on_equity: Value,
}

#[derive(Debug, Deserialize)]
struct Leverage {
    value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarginSummary {
    account_value: Value,
    total_margin_used: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSummary {
    pub coin: Value,
    pub size: Value,
    pub entry_price: Value,
    pub unrealized_pnl: Value,
    pub leverage: Value,
    pub liquidation_price: Value,
    pub return_on_equity: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub positions: Vec<PositionSummary>,
    pub account_value: Value,
    pub total_margin_used: Value,
    pub withdrawable: Value,
}

impl ClearinghouseState {
    fn into_summary(self) -> PositionsResponse {
        let positions = self
            .asset_positions
            .into_iter()
            .map(|asset| {
                let p = asset.position;
                PositionSummary {
                    coin: p.coin,
                    size: p.szi,
                    entry_price: p.entry_px,
                    unrealized_pnl: p.unrealized_pnl,
                    leverage: p.leverage.value,
                    liquidation_price: p.liquidation_px,
                    return_on_equity: p.return_on_equity,
                }
            })
            .collect();

        PositionsResponse {
            positions,
            account_value: self.margin_summary.account_value,
            total_margin_used: self.margin_summary.total_margin_used,
            withdrawable: self.withdrawable,
        }
    }
}

/// Reduce a raw `clearinghouseState` response to the positions summary
pub fn reshape(raw: Value) -> Result<Value> {
    let state: ClearinghouseState = serde_json::from_value(raw)
        .map_err(|e| HyperliquidError::MalformedResponse(format!("clearinghouseState: {}", e)))?;

    serde_json::to_value(state.into_summary())
        .map_err(|e| HyperliquidError::Serialization(e.to_string()))
}

use serde::{Deserialize, Serialize};

/// Projected profit/loss if the position were sold at a given price.
///
/// Only produced when a sell price is present and the average cost is
/// non-zero. Consumers must treat its absence as "not computed", which
/// is different from a projection that computes to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedGain {
    /// The hypothetical sell price the projection was computed for.
    pub sell_price: f64,

    /// (sell_price − average_cost_with_fees) × total_shares
    pub raw_gain: f64,

    /// (sell_price − average_cost_with_fees) / average_cost_with_fees × 100
    pub gain_percent: f64,

    /// raw_gain × (1 − tax_rate)
    pub gain_after_tax: f64,
}

/// Aggregate metrics over a full transaction list.
///
/// Computed live by the calculator while editing, and frozen into a saved
/// record at save time — a frozen copy is never recomputed, even if the
/// formulas change in a later version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionMetrics {
    /// Sum of all share counts.
    pub total_shares: f64,

    /// Sum of all gross amounts (cost × shares), fees excluded.
    pub total_investment_ex_fees: f64,

    /// Sum of all fee amounts (fixed + percentage).
    pub total_fees: f64,

    /// total_investment_ex_fees + total_fees.
    pub total_investment: f64,

    /// total_investment_ex_fees / total_shares (0 when no shares).
    pub average_cost_ex_fees: f64,

    /// total_investment / total_shares (0 when no shares).
    /// This is the reference price — the "new PRU".
    pub average_cost_with_fees: f64,

    /// total_fees / total_investment_ex_fees × 100 (0 when nothing invested).
    pub fee_impact_percent: f64,

    /// Percentage change of the reference price against the initial lot's
    /// cost per share (0 when either side is zero or unparseable).
    pub cost_change_percent: f64,

    /// Sell projection, absent when no sell price was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_gain: Option<ProjectedGain>,
}

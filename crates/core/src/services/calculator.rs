use crate::models::metrics::{PositionMetrics, ProjectedGain};
use crate::models::simulation::Simulation;
use crate::models::transaction::{parse_non_negative_or_zero, Transaction};

/// Flat capital-gains tax rate applied to projected gains.
pub const DEFAULT_TAX_RATE: f64 = 0.30;

/// Computes aggregate position metrics from a transaction list.
///
/// Pure business logic — no I/O, no state beyond the injected tax rate.
/// Everything is recomputed from the full list on every call; lists are
/// small, so there is no caching and no incremental update.
#[derive(Debug, Clone)]
pub struct PositionCalculator {
    tax_rate: f64,
}

impl PositionCalculator {
    pub fn new() -> Self {
        Self::with_tax_rate(DEFAULT_TAX_RATE)
    }

    /// Use a non-default tax rate (the sole tunable in the gain formula).
    pub fn with_tax_rate(tax_rate: f64) -> Self {
        Self { tax_rate }
    }

    #[must_use]
    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// Sum of all share counts.
    #[must_use]
    pub fn total_shares(&self, transactions: &[Transaction]) -> f64 {
        transactions.iter().map(Transaction::shares).sum()
    }

    /// Sum of all gross amounts, fees excluded.
    #[must_use]
    pub fn total_investment_ex_fees(&self, transactions: &[Transaction]) -> f64 {
        transactions.iter().map(Transaction::gross_amount).sum()
    }

    /// Sum of all fee amounts (fixed + percentage of gross).
    #[must_use]
    pub fn total_fees(&self, transactions: &[Transaction]) -> f64 {
        transactions.iter().map(Transaction::fee_amount).sum()
    }

    /// Total invested including fees.
    #[must_use]
    pub fn total_investment(&self, transactions: &[Transaction]) -> f64 {
        self.total_investment_ex_fees(transactions) + self.total_fees(transactions)
    }

    /// Weighted average cost per share, fees excluded. Zero when the
    /// position holds no shares.
    #[must_use]
    pub fn average_cost_ex_fees(&self, transactions: &[Transaction]) -> f64 {
        let shares = self.total_shares(transactions);
        if shares == 0.0 {
            return 0.0;
        }
        self.total_investment_ex_fees(transactions) / shares
    }

    /// Weighted average cost per share including fees — the reference
    /// price ("new PRU"). Zero when the position holds no shares.
    #[must_use]
    pub fn average_cost_with_fees(&self, transactions: &[Transaction]) -> f64 {
        let shares = self.total_shares(transactions);
        if shares == 0.0 {
            return 0.0;
        }
        self.total_investment(transactions) / shares
    }

    /// How much fees inflate the investment, as a percentage of the
    /// ex-fee total. Zero when nothing was invested.
    #[must_use]
    pub fn fee_impact_percent(&self, transactions: &[Transaction]) -> f64 {
        let ex_fees = self.total_investment_ex_fees(transactions);
        if ex_fees == 0.0 {
            return 0.0;
        }
        self.total_fees(transactions) / ex_fees * 100.0
    }

    /// Percentage change of the reference price against the initial lot's
    /// cost per share. Zero when either side is zero or unparseable.
    #[must_use]
    pub fn cost_change_percent(&self, transactions: &[Transaction]) -> f64 {
        let initial_cost = transactions
            .first()
            .map(Transaction::unit_cost)
            .unwrap_or(0.0);
        let average = self.average_cost_with_fees(transactions);
        if initial_cost == 0.0 || average == 0.0 {
            return 0.0;
        }
        (average - initial_cost) / initial_cost * 100.0
    }

    /// Sell projection for a user-supplied price.
    ///
    /// Returns `None` — not zero — when the sell price is absent,
    /// unparseable, or zero, or when the average cost is zero.
    #[must_use]
    pub fn projected_gain(
        &self,
        transactions: &[Transaction],
        sell_price: &str,
    ) -> Option<ProjectedGain> {
        let sell = parse_non_negative_or_zero(sell_price);
        if sell == 0.0 {
            return None;
        }
        let average = self.average_cost_with_fees(transactions);
        if average == 0.0 {
            return None;
        }

        let raw_gain = (sell - average) * self.total_shares(transactions);
        Some(ProjectedGain {
            sell_price: sell,
            raw_gain,
            gain_percent: (sell - average) / average * 100.0,
            gain_after_tax: raw_gain * (1.0 - self.tax_rate),
        })
    }

    /// Full metric set for a simulation, ready to display or to freeze
    /// into a saved record.
    #[must_use]
    pub fn metrics(&self, simulation: &Simulation) -> PositionMetrics {
        let transactions = &simulation.transactions;
        PositionMetrics {
            total_shares: self.total_shares(transactions),
            total_investment_ex_fees: self.total_investment_ex_fees(transactions),
            total_fees: self.total_fees(transactions),
            total_investment: self.total_investment(transactions),
            average_cost_ex_fees: self.average_cost_ex_fees(transactions),
            average_cost_with_fees: self.average_cost_with_fees(transactions),
            fee_impact_percent: self.fee_impact_percent(transactions),
            cost_change_percent: self.cost_change_percent(transactions),
            projected_gain: self
                .projected_gain(transactions, &simulation.projected_sell_price),
        }
    }
}

impl Default for PositionCalculator {
    fn default() -> Self {
        Self::new()
    }
}

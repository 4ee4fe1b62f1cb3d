use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of position transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// The starting lot. Always the first element of a transaction list,
    /// and never removable.
    Initial,
    /// A later buy adding shares at a given price.
    Purchase,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Initial => write!(f, "initial"),
            TransactionKind::Purchase => write!(f, "purchase"),
        }
    }
}

/// Parse a user-entered numeric field.
///
/// Empty, unparseable, non-finite, or negative input counts as zero.
/// This is an intentional permissive-input policy: numeric fields are
/// routinely empty or half-typed while a simulation is being edited,
/// and that must never surface as an error.
#[must_use]
pub fn parse_non_negative_or_zero(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// A single entry in a simulation's transaction list.
///
/// Numeric fields hold the raw user input as strings; parsing happens on
/// demand through [`parse_non_negative_or_zero`]. `date` and the fee fields
/// are optional because records saved under older schemas lack them.
///
/// Serialization: the unit cost is written as `referencePrice` for the
/// initial lot and `price` for purchases. Unrecognized JSON fields are
/// retained in `extra` so a round-trip through this version never loses
/// data written by a newer one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransaction", into = "RawTransaction")]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Cost per share as entered (decimal string, possibly empty).
    pub cost_per_share: String,
    /// Number of shares as entered (decimal string, possibly empty).
    pub share_count: String,
    /// Transaction date. `None` only for data saved before dates were
    /// recorded; back-filled to today when loaded for editing.
    pub date: Option<NaiveDate>,
    /// Flat fee in currency units (decimal string). `None` = pre-fee schema.
    pub fixed_fee: Option<String>,
    /// Percentage fee on the gross amount, 0–100 scale (decimal string).
    /// `None` = pre-fee schema.
    pub fee_rate: Option<String>,
    /// Fields from schemas we don't recognize, kept verbatim.
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Fresh empty initial lot dated today.
    #[must_use]
    pub fn initial_today() -> Self {
        Self::empty(TransactionKind::Initial)
    }

    /// Fresh empty purchase dated today.
    #[must_use]
    pub fn purchase_today() -> Self {
        Self::empty(TransactionKind::Purchase)
    }

    /// Initial lot with a reference price and share count (fees empty).
    #[must_use]
    pub fn initial(reference_price: impl Into<String>, shares: impl Into<String>) -> Self {
        let mut t = Self::initial_today();
        t.cost_per_share = reference_price.into();
        t.share_count = shares.into();
        t
    }

    /// Purchase with a price and share count (fees empty).
    #[must_use]
    pub fn purchase(price: impl Into<String>, shares: impl Into<String>) -> Self {
        let mut t = Self::purchase_today();
        t.cost_per_share = price.into();
        t.share_count = shares.into();
        t
    }

    /// Set both fee fields, builder-style.
    #[must_use]
    pub fn with_fees(mut self, fixed_fee: impl Into<String>, fee_rate: impl Into<String>) -> Self {
        self.fixed_fee = Some(fixed_fee.into());
        self.fee_rate = Some(fee_rate.into());
        self
    }

    fn empty(kind: TransactionKind) -> Self {
        Self {
            kind,
            cost_per_share: String::new(),
            share_count: String::new(),
            date: Some(Utc::now().date_naive()),
            fixed_fee: Some(String::new()),
            fee_rate: Some(String::new()),
            extra: Map::new(),
        }
    }

    // ── Parsed views ────────────────────────────────────────────────

    /// Cost per share, parsed permissively.
    #[must_use]
    pub fn unit_cost(&self) -> f64 {
        parse_non_negative_or_zero(&self.cost_per_share)
    }

    /// Share count, parsed permissively.
    #[must_use]
    pub fn shares(&self) -> f64 {
        parse_non_negative_or_zero(&self.share_count)
    }

    /// Gross amount: unit cost × shares. Zero when either field is
    /// empty or unparseable.
    #[must_use]
    pub fn gross_amount(&self) -> f64 {
        self.unit_cost() * self.shares()
    }

    /// Fee amount: fixed fee + fee rate applied to the gross amount.
    #[must_use]
    pub fn fee_amount(&self) -> f64 {
        let fixed = parse_opt(&self.fixed_fee);
        let rate = parse_opt(&self.fee_rate);
        fixed + (rate / 100.0) * self.gross_amount()
    }

    /// Net amount: gross + fees. What the transaction actually cost.
    #[must_use]
    pub fn net_amount(&self) -> f64 {
        self.gross_amount() + self.fee_amount()
    }
}

fn parse_opt(field: &Option<String>) -> f64 {
    field
        .as_deref()
        .map(parse_non_negative_or_zero)
        .unwrap_or(0.0)
}

/// Wire representation: splits `cost_per_share` into the kind-dependent
/// `referencePrice` / `price` field names used by the persisted format.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<String>,
    #[serde(default)]
    share_count: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fee_rate: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        // Prefer the field matching the kind, but accept the other one
        // rather than dropping a mislabelled value.
        let cost_per_share = match raw.kind {
            TransactionKind::Initial => raw.reference_price.or(raw.price),
            TransactionKind::Purchase => raw.price.or(raw.reference_price),
        }
        .unwrap_or_default();

        Self {
            kind: raw.kind,
            cost_per_share,
            share_count: raw.share_count,
            date: raw.date,
            fixed_fee: raw.fixed_fee,
            fee_rate: raw.fee_rate,
            extra: raw.extra,
        }
    }
}

impl From<Transaction> for RawTransaction {
    fn from(t: Transaction) -> Self {
        let (reference_price, price) = match t.kind {
            TransactionKind::Initial => (Some(t.cost_per_share), None),
            TransactionKind::Purchase => (None, Some(t.cost_per_share)),
        };

        Self {
            kind: t.kind,
            reference_price,
            price,
            share_count: t.share_count,
            date: t.date,
            fixed_fee: t.fixed_fee,
            fee_rate: t.fee_rate,
            extra: t.extra,
        }
    }
}

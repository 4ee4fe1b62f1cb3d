use async_trait::async_trait;
use chrono::Utc;

use crate::errors::CoreError;
use crate::models::simulation::Simulation;
use crate::services::calculator::PositionCalculator;

/// External sink accepting one block of formatted text — a system
/// clipboard, a share sheet, a file. The engine only depends on the
/// write succeeding or failing, never on the content being interpreted.
#[async_trait]
pub trait ClipboardSink {
    async fn write_text(&self, text: &str) -> Result<(), CoreError>;
}

/// Render the current simulation as a shareable plain-text summary.
#[must_use]
pub fn generate_share_text(simulation: &Simulation, calculator: &PositionCalculator) -> String {
    let metrics = calculator.metrics(simulation);
    let initial = simulation.initial_transaction();
    let purchase_count = simulation.transactions.len() - 1;
    let plural = if purchase_count > 1 { "s" } else { "" };

    let mut lines = vec![
        format!("Reference price analysis - {}", simulation.name),
        format!("{}", Utc::now().date_naive()),
        String::new(),
        "Initial position:".to_string(),
        format!("- Reference price: {:.2}", initial.unit_cost()),
        format!("- Shares: {}", initial.shares()),
        String::new(),
        format!("After {purchase_count} transaction{plural}:"),
        format!(
            "- New reference price: {:.2} ({}{:.2}%)",
            metrics.average_cost_with_fees,
            sign(metrics.cost_change_percent),
            metrics.cost_change_percent
        ),
        format!("- Total shares: {}", metrics.total_shares),
        format!(
            "- Invested: {:.2} (fees: {:.2})",
            metrics.total_investment, metrics.total_fees
        ),
    ];

    if let Some(gain) = &metrics.projected_gain {
        lines.push(String::new());
        lines.push(format!("Sell simulation at {:.2}:", gain.sell_price));
        lines.push(format!(
            "- PnL: {}{:.2} ({}{:.2}%)",
            sign(gain.raw_gain),
            gain.raw_gain,
            sign(gain.raw_gain),
            gain.gain_percent
        ));
        lines.push(format!(
            "- PnL after tax: {}{:.2}",
            sign(gain.raw_gain),
            gain.gain_after_tax
        ));
    }

    lines.join("\n")
}

fn sign(value: f64) -> &'static str {
    if value > 0.0 {
        "+"
    } else {
        ""
    }
}

use crate::{Report, Standing};

/// Plain-text summary suitable for the clipboard or a chat message.
pub fn render_text(report: &Report<'_>) -> String {
    let mut out = String::new();

    out.push_str("💰 Expense Summary\n");
    out.push_str(&format!(
        "Total Expenses: {}\n\n",
        report.money(report.summary.total_expenses)
    ));

    out.push_str("👥 Participants:\n");
    for p in report.participants {
        let balance = report
            .summary
            .balances
            .get(p.id)
            .map(|b| b.balance)
            .unwrap_or(0.0);
        let status = match Standing::of(balance) {
            Standing::Receives => format!("gets back {}", report.money(balance)),
            Standing::Owes => format!("owes {}", report.money(balance.abs())),
            Standing::Settled => "is settled".to_string(),
        };
        out.push_str(&format!("• {}: {}\n", p.name, status));
    }

    if !report.summary.settlements.is_empty() {
        out.push_str("\n💸 Settlements Needed:\n");
        for s in &report.summary.settlements {
            out.push_str(&format!(
                "• {} pays {} to {}\n",
                report.name_of(s.from),
                report.money(s.amount),
                report.name_of(s.to)
            ));
        }
    }

    out.push_str("\n📋 Expense Details:\n");
    for e in report.expenses {
        out.push_str(&format!(
            "• {}: {} (paid by {})\n",
            e.description,
            report.money(e.amount),
            report.name_of(e.paid_by)
        ));
    }

    out
}

/// WhatsApp share link carrying `text`.
pub fn share_url(text: &str) -> String {
    format!("https://wa.me/?text={}", urlencoding::encode(text))
}

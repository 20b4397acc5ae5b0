use chrono::NaiveDate;

use crate::{Report, Standing};

/// Download name for an HTML export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("expense-split-{}.html", date.format("%Y-%m-%d"))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.6; }
.header { text-align: center; color: #333; border-bottom: 2px solid #eee; padding-bottom: 10px; }
.section { margin: 20px 0; }
.settlement { background: #f8f9fa; padding: 10px; border-radius: 5px; margin: 5px 0; }
.expense { background: #fff; border: 1px solid #ddd; padding: 10px; margin: 5px 0; border-radius: 5px; }
.balance { display: flex; justify-content: space-between; padding: 5px 0; }
.positive { color: #16a34a; }
.negative { color: #dc2626; }
.neutral { color: #6b7280; }
";

/// Standalone HTML document summarising the group.
pub fn render_html(report: &Report<'_>) -> String {
    let money = |amount: f64| escape(&report.money(amount));
    let name = |id| escape(report.name_of(id));

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Expense Split Summary</title>\n");
    out.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));

    out.push_str(&format!(
        "<div class=\"header\">\n<h1>Expense Split Summary</h1>\n<p>{}</p>\n</div>\n",
        report.generated_on.format("%Y-%m-%d")
    ));

    out.push_str(&format!(
        "<div class=\"section\">\n<h2>Overview</h2>\n\
         <p><strong>Total Expenses:</strong> {}</p>\n\
         <p><strong>Participants:</strong> {}</p>\n</div>\n",
        money(report.summary.total_expenses),
        report.participants.len()
    ));

    if !report.summary.settlements.is_empty() {
        out.push_str("<div class=\"section\">\n<h2>Settlement Required</h2>\n");
        for s in &report.summary.settlements {
            out.push_str(&format!(
                "<div class=\"settlement\"><strong>{}</strong> owes <strong>{}</strong>: <strong>{}</strong></div>\n",
                name(s.from),
                name(s.to),
                money(s.amount)
            ));
        }
        out.push_str("</div>\n");
    } else if !report.expenses.is_empty() {
        out.push_str("<div class=\"section\">\n<h2>All Settled!</h2>\n<p>No payments needed.</p>\n</div>\n");
    }

    out.push_str("<div class=\"section\">\n<h2>Balance Summary</h2>\n");
    for b in &report.summary.balances {
        let (class, label) = match Standing::of(b.balance) {
            Standing::Receives => ("positive", "to receive"),
            Standing::Owes => ("negative", "owes"),
            Standing::Settled => ("neutral", "settled"),
        };
        out.push_str(&format!(
            "<div class=\"balance\"><span><strong>{}:</strong></span><span class=\"{}\">{} {}</span></div>\n",
            name(b.participant_id),
            class,
            money(b.balance.abs()),
            label
        ));
    }
    out.push_str("</div>\n");

    if !report.expenses.is_empty() {
        out.push_str("<div class=\"section\">\n<h2>Expense Details</h2>\n");
        for e in report.expenses {
            out.push_str(&format!(
                "<div class=\"expense\"><strong>{}</strong><br>Amount: {}<br>Paid by: {}<br>Date: {}</div>\n",
                escape(&e.description),
                money(e.amount),
                name(e.paid_by),
                e.date.format("%Y-%m-%d")
            ));
        }
        out.push_str("</div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

//! Display helpers shared by the role views. All money arithmetic stays in
//! (fractional) cents until it reaches one of these functions.

/// Format cents as Brazilian reais, e.g. `123456.0` → `R$ 1.234,56`.
pub fn format_currency(cents: f64) -> String {
    if !cents.is_finite() {
        return "R$ --".to_string();
    }
    let total = cents.round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let whole = total / 100;
    let fraction = total % 100;
    format!("{sign}R$ {},{fraction:02}", group_thousands(whole))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `125` → `2m 5s`. Hours are folded into minutes.
pub fn format_watch_time(total_seconds: u64) -> String {
    format!("{}m {}s", total_seconds / 60, total_seconds % 60)
}

/// Share of the budget already spent, in percent. Unbounded above; a zero
/// budget reports 0.
pub fn budget_spent_percentage(total_cost: f64, budget: u64) -> f64 {
    if budget == 0 {
        return 0.0;
    }
    total_cost / budget as f64 * 100.0
}

/// Progress-bar width for [`budget_spent_percentage`].
pub fn budget_bar_width(percentage: f64) -> f64 {
    percentage.clamp(0.0, 100.0)
}

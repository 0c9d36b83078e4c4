/// Format a whole-unit amount with thousands separators: 1,234,567 Tenge
pub fn money(val: i64, currency: &str) -> String {
    let digits = val.unsigned_abs().to_string();

    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let sign = if val < 0 { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{with_commas}")
    } else {
        format!("{sign}{with_commas} {currency}")
    }
}

/// Horizontal bar for a percentage, scaled to `width` cells.
pub fn bar(pct: f64, width: usize) -> String {
    let cells = ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    "\u{2588}".repeat(cells)
}

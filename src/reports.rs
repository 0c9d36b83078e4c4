use crate::models::Record;

/// Below this share of the grand total a category may be folded into "Other".
pub const FOLD_THRESHOLD_PCT: f64 = 5.0;
/// Folding only kicks in with more categories than this.
pub const FOLD_MIN_CATEGORIES: usize = 8;

pub const OTHER_LABEL: &str = "Other";

pub struct Slice {
    pub category: String,
    pub total: i64,
    pub pct: f64,
}

/// Sum of all amounts, saturating at `i64::MAX`.
pub fn total(records: &[Record]) -> i64 {
    records.iter().fold(0i64, |acc, r| acc.saturating_add(r.amount))
}

/// Largest and smallest record by amount. Ties go to the first one seen.
pub fn extremes(records: &[Record]) -> Option<(&Record, &Record)> {
    let first = records.first()?;
    let mut max = first;
    let mut min = first;
    for record in &records[1..] {
        if record.amount > max.amount {
            max = record;
        }
        if record.amount < min.amount {
            min = record;
        }
    }
    Some((max, min))
}

/// Per-category totals in order of first appearance.
pub fn category_totals(records: &[Record]) -> Vec<(String, i64)> {
    let mut totals: Vec<(String, i64)> = Vec::new();
    for record in records {
        match totals.iter_mut().find(|(name, _)| *name == record.category) {
            Some((_, sum)) => *sum = sum.saturating_add(record.amount),
            None => totals.push((record.category.clone(), record.amount)),
        }
    }
    totals
}

/// Chart slices. With many categories the small ones collapse into a
/// trailing "Other" slice so the chart stays readable.
pub fn distribution(records: &[Record]) -> Vec<Slice> {
    let totals = category_totals(records);
    let grand_total = totals.iter().fold(0i64, |acc, (_, t)| acc.saturating_add(*t));
    if grand_total == 0 {
        return Vec::new();
    }
    let pct = |t: i64| t as f64 / grand_total as f64 * 100.0;
    let fold = totals.len() > FOLD_MIN_CATEGORIES;

    let mut slices = Vec::new();
    let mut other = 0i64;
    for (category, t) in totals {
        if fold && pct(t) < FOLD_THRESHOLD_PCT {
            other = other.saturating_add(t);
        } else {
            slices.push(Slice {
                category,
                total: t,
                pct: pct(t),
            });
        }
    }
    if other > 0 {
        slices.push(Slice {
            category: OTHER_LABEL.to_string(),
            total: other,
            pct: pct(other),
        });
    }
    slices
}

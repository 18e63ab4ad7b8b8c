use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::data::model::{RecordTable, BRAND, PRICE, RAM_GB};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Summary statistics (describe)
// ---------------------------------------------------------------------------

/// Descriptive statistics for one numeric column.
/// Everything but `count` is `None` when the column has no values;
/// `std` also needs at least two.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|m| {
            let ss: f64 = sorted.iter().map(|v| (v - m).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });
        ColumnSummary {
            column: column.to_string(),
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Quantile of already-sorted values, linearly interpolated between the
/// two nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// `describe` over every numeric column, in table order.
pub fn describe(table: &RecordTable) -> Vec<ColumnSummary> {
    table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind.is_numeric())
        .map(|(i, c)| ColumnSummary::from_values(&c.name, &table.numeric_column(i)))
        .collect()
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Mean of `value` per distinct `key`, keys ascending.
///
/// Missing keys are grouped under `UNKNOWN_KEY`; rows with a missing value are
/// skipped, and a key with no values at all gets no entry.
pub fn group_mean(
    table: &RecordTable,
    key: &str,
    value: &str,
) -> Result<BTreeMap<String, f64>, DataError> {
    let k = table.require_column(key)?;
    let v = table.require_column(value)?;

    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in &table.rows {
        let Some(x) = row[v].as_f64() else {
            continue;
        };
        let slot = acc.entry(row[k].key_label()).or_default();
        slot.0 += x;
        slot.1 += 1;
    }

    Ok(acc
        .into_iter()
        .map(|(key, (sum, n))| (key, sum / n as f64))
        .collect())
}

// ---------------------------------------------------------------------------
// Analysis – everything the analyzer stage produces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub rows: usize,
    pub summary: Vec<ColumnSummary>,
    pub avg_price_by_brand: BTreeMap<String, f64>,
    pub avg_ram_by_brand: BTreeMap<String, f64>,
}

pub fn analyze(table: &RecordTable) -> Result<Analysis, DataError> {
    Ok(Analysis {
        rows: table.len(),
        summary: describe(table),
        avg_price_by_brand: group_mean(table, BRAND, PRICE)?,
        avg_ram_by_brand: group_mean(table, BRAND, RAM_GB)?,
    })
}

/// Terminal rendering: a describe-style block followed by both aggregates.
impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stat = |v: Option<f64>| v.map_or_else(|| "NaN".to_string(), |x| format!("{x:.6}"));
        let width = self
            .summary
            .iter()
            .map(|s| s.column.len())
            .chain(self.summary.iter().map(|s| stat(s.max).len()))
            .chain(self.summary.iter().map(|s| stat(s.mean).len()))
            .max()
            .unwrap_or(0)
            .max(12);

        writeln!(f, "Summary Statistics:")?;
        write!(f, "{:6}", "")?;
        for s in &self.summary {
            write!(f, "  {:>width$}", s.column)?;
        }
        writeln!(f)?;

        type Getter = fn(&ColumnSummary) -> Option<f64>;
        let lines: [(&str, Getter); 7] = [
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.q25),
            ("50%", |s| s.median),
            ("75%", |s| s.q75),
            ("max", |s| s.max),
        ];
        write!(f, "{:6}", "count")?;
        for s in &self.summary {
            write!(f, "  {:>width$}", format!("{:.6}", s.count as f64))?;
        }
        writeln!(f)?;
        for (label, get) in lines {
            write!(f, "{label:6}")?;
            for s in &self.summary {
                write!(f, "  {:>width$}", stat(get(s)))?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\nAverage Price by Brand:")?;
        write_groups(f, &self.avg_price_by_brand)?;
        writeln!(f, "\nAverage RAM by Brand:")?;
        write_groups(f, &self.avg_ram_by_brand)
    }
}

fn write_groups(f: &mut fmt::Formatter<'_>, groups: &BTreeMap<String, f64>) -> fmt::Result {
    let w = groups.keys().map(String::len).max().unwrap_or(0);
    for (k, v) in groups {
        writeln!(f, "{k:<w$}  {v:.6}")?;
    }
    Ok(())
}

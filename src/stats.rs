use crate::models::IndicatorRecord;
use serde::{Deserialize, Serialize};

/// Summary statistics over the numeric values of a record list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    /// Records with a usable numeric value.
    pub count: usize,
    /// Records without any value.
    pub missing: usize,
    /// Records with a value that is not a finite number.
    pub invalid: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute min, max, mean and median over the records' values.
pub fn summarize(records: &[IndicatorRecord]) -> Summary {
    let mut vals: Vec<f64> = Vec::new();
    let mut missing = 0;
    let mut invalid = 0;
    for r in records {
        match (&r.value, r.numeric_value()) {
            (None, _) => missing += 1,
            (Some(_), None) => invalid += 1,
            (Some(_), Some(v)) => vals.push(v),
        }
    }

    // Only finite values reach this point.
    vals.sort_by(f64::total_cmp);
    let count = vals.len();
    let min = vals.first().copied();
    let max = vals.last().copied();
    let mean = if count > 0 {
        Some(vals.iter().sum::<f64>() / count as f64)
    } else {
        None
    };
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };
    Summary {
        count,
        missing,
        invalid,
        min,
        max,
        mean,
        median,
    }
}

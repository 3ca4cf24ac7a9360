use crate::models::IndicatorRecord;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", s),
        _ => s.to_string(),
    }
}

fn opt_cell(s: Option<&str>) -> String {
    s.map(sanitize_cell).unwrap_or_default()
}

/// Save records as CSV with header `country_code,country_name,period,value`.
///
/// The name falls back to the nested country object when `country_name` was not filled in.
/// Numeric values are written as numbers, non-numeric ones as (sanitized) text.
pub fn save_csv<P: AsRef<Path>>(records: &[IndicatorRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(["country_code", "country_name", "period", "value"])?;
    for r in records {
        let name = r
            .country_name
            .clone()
            .or_else(|| r.country.as_ref().and_then(|c| c.value.clone()));
        let value = match (r.numeric_value(), &r.value) {
            (Some(x), _) => x.to_string(),
            (None, Some(raw)) => sanitize_cell(&raw.to_string()),
            (None, None) => String::new(),
        };
        wtr.write_record([
            opt_cell(r.country_code.as_deref()),
            opt_cell(name.as_deref()),
            opt_cell(r.period.as_deref()),
            value,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save records as pretty JSON array.
pub fn save_json<P: AsRef<Path>>(records: &[IndicatorRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

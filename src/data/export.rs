use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::{Table, Value};
use crate::stats::CiRow;

/// Write the table as CSV with a header row. Nulls become empty fields.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.column_names())
        .context("writing CSV header")?;

    for row in 0..table.len() {
        let record = table
            .row(row)
            .with_context(|| format!("row {row} out of range"))?
            .into_iter()
            .map(|(_, value)| match value {
                Value::Null => String::new(),
                other => other.to_string(),
            });
        out.write_record(record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    out.flush().context("flushing CSV")?;
    Ok(())
}

#[derive(Serialize)]
struct SeriesSummary<'a> {
    series: &'a str,
    rows: &'a [CiRow],
}

/// Write named sets of confidence-interval rows as a pretty-printed JSON
/// array of `{ "series": …, "rows": [{ "group", "stat", "low", "high" }] }`.
pub fn write_summary_json<'a, W, I>(series: I, writer: W) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a [CiRow])>,
{
    let summaries: Vec<SeriesSummary<'a>> = series
        .into_iter()
        .map(|(series, rows)| SeriesSummary { series, rows })
        .collect();
    serde_json::to_writer_pretty(writer, &summaries).context("writing summary JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_empty_nulls() {
        let mut t = Table::with_columns(["x", "treatment"]);
        t.push_row(vec![Value::Float(1.5), Value::from("ctrl")]);
        t.push_row(vec![Value::Integer(2), Value::Null]);

        let mut buf = Vec::new();
        write_csv(&t, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "x,treatment\n1.5,ctrl\n2,\n");
    }

    #[test]
    fn summary_json_groups_rows_by_series() {
        let rows = vec![CiRow {
            group: Value::Integer(3),
            stat: 1.0,
            low: 0.5,
            high: 1.5,
        }];
        let mut buf = Vec::new();
        write_summary_json([("ctrl", rows.as_slice())], &mut buf).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{
                "series": "ctrl",
                "rows": [{ "group": 3, "stat": 1.0, "low": 0.5, "high": 1.5 }]
            }])
        );
    }
}

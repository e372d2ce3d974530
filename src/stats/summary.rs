use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;

use super::bootstrap::{bootstrap_ci, mean};
use super::{DEFAULT_ALPHA, DEFAULT_RESAMPLES};
use crate::data::model::{Table, Value};

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("no column named '{0}'")]
    MissingColumn(String),
    #[error("column '{column}', row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("alpha must be in (0, 1), got {0}")]
    InvalidAlpha(f64),
    #[error("at least one bootstrap resample is required")]
    NoResamples,
}

/// Bootstrap settings for [`quick_ci`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CiOptions {
    /// Significance level; bounds are the `alpha/2` and `1 - alpha/2`
    /// percentiles.
    pub alpha: f64,
    /// Resamples drawn per group.
    pub resamples: usize,
    /// Fixed RNG seed for reproducible intervals.
    pub seed: Option<u64>,
}

impl Default for CiOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            resamples: DEFAULT_RESAMPLES,
            seed: None,
        }
    }
}

/// One summary row per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CiRow {
    pub group: Value,
    pub stat: f64,
    pub low: f64,
    pub high: f64,
}

/// Bootstrap interval of the mean of `column` for each value of `group`.
pub fn quick_ci(
    table: &Table,
    group: &str,
    column: &str,
    options: &CiOptions,
) -> Result<Vec<CiRow>, StatsError> {
    quick_ci_with(table, group, column, mean, options)
}

/// Bootstrap interval of `stat` over `column` for each value of `group`.
///
/// Rows come back in the group column's natural order. Rows with a null
/// group are ignored, as are null or NaN values; a group left with no
/// values produces no row.
pub fn quick_ci_with<F>(
    table: &Table,
    group: &str,
    column: &str,
    stat: F,
    options: &CiOptions,
) -> Result<Vec<CiRow>, StatsError>
where
    F: Fn(&[f64]) -> f64,
{
    if !(options.alpha > 0.0 && options.alpha < 1.0) {
        return Err(StatsError::InvalidAlpha(options.alpha));
    }
    if options.resamples == 0 {
        return Err(StatsError::NoResamples);
    }

    let groups = grouped_values(table, group, column)?;

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let rows: Vec<CiRow> = groups
        .into_iter()
        .filter_map(|(key, values)| {
            let ci = bootstrap_ci(&values, &stat, options.alpha, options.resamples, &mut rng)?;
            Some(CiRow {
                group: key.clone(),
                stat: ci.stat,
                low: ci.low,
                high: ci.high,
            })
        })
        .collect();

    log::debug!(
        "bootstrap CI of '{column}' by '{group}': {} groups, alpha {}, {} resamples",
        rows.len(),
        options.alpha,
        options.resamples
    );
    Ok(rows)
}

fn grouped_values<'a>(
    table: &'a Table,
    group: &str,
    column: &str,
) -> Result<BTreeMap<&'a Value, Vec<f64>>, StatsError> {
    let keys = table
        .column(group)
        .ok_or_else(|| StatsError::MissingColumn(group.to_string()))?;
    let values = table
        .column(column)
        .ok_or_else(|| StatsError::MissingColumn(column.to_string()))?;

    let mut groups: BTreeMap<&Value, Vec<f64>> = BTreeMap::new();
    for (row, (key, value)) in keys.iter().zip(values).enumerate() {
        if key.is_null() || value.is_null() {
            continue;
        }
        let v = value.as_f64().ok_or_else(|| StatsError::NonNumeric {
            column: column.to_string(),
            row,
            value: value.to_string(),
        })?;
        if v.is_nan() {
            continue;
        }
        groups.entry(key).or_default().push(v);
    }
    Ok(groups)
}

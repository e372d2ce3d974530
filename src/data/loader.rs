use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use regex::Regex;
use thiserror::Error;

use super::model::{Table, Value};

/// Column filled with the treatment label of each row.
pub const TREATMENT_COLUMN: &str = "treatment";
/// Column filled with the trial identifier of each row.
pub const TRIAL_COLUMN: &str = "trial";

/// `<parent>/<treatment>_<trial>/<file>`, e.g. `runs/ctrl_3/fitness.dat`.
/// ASCII word characters only; the file name may also contain dots.
const PATH_METADATA_PATTERN: &str = r"^.*/([A-Za-z0-9_]+)_([0-9]+)/[A-Za-z0-9_.]*$";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("no header line")]
    MissingHeader,
    #[error("line {line}: expected at most {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Where the `trial` column comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrialMode {
    /// Digits of the `<treatment>_<trial>` directory (only when no explicit
    /// treatment is given).
    #[default]
    FromPath,
    /// Zero-based index of the file in the input list.
    Series,
}

impl TrialMode {
    /// `"series"` selects [`TrialMode::Series`]; any other name keeps the
    /// path-derived trial.
    pub fn from_name(name: &str) -> Self {
        if name == "series" {
            TrialMode::Series
        } else {
            TrialMode::FromPath
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Label every row with this treatment instead of reading it from the path.
    pub treatment: Option<String>,
    pub trial: TrialMode,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and concatenate whitespace-delimited tables, gzip-compressed or
/// plain, annotating rows with `treatment` / `trial`.
///
/// Without an explicit treatment both values come from the
/// `<treatment>_<trial>/<file>` part of each path. Files whose path does not
/// follow that layout are loaded without annotation; this is not an error.
/// In [`TrialMode::Series`] the k-th file gets trial `k` whatever its path.
///
/// Rows keep file order then line order and are reindexed from 0.
pub fn load_files<P: AsRef<Path>>(files: &[P], options: &LoadOptions) -> Result<Table> {
    let mut tables = Vec::with_capacity(files.len());

    for (k, file) in files.iter().enumerate() {
        let path = file.as_ref();
        let mut table = load_one(path)?;

        match &options.treatment {
            Some(treatment) => {
                table.fill_column(TREATMENT_COLUMN, Value::String(treatment.clone()));
            }
            None => match path_metadata(path) {
                Some((treatment, trial)) => {
                    table.fill_column(TREATMENT_COLUMN, Value::String(treatment));
                    table.fill_column(TRIAL_COLUMN, Value::String(trial));
                }
                None => log::warn!(
                    "{}: path is not <treatment>_<trial>/<file>, rows left unannotated",
                    path.display()
                ),
            },
        }

        if options.trial == TrialMode::Series {
            table.fill_column(TRIAL_COLUMN, Value::Integer(k as i64));
        }

        log::debug!("{}: {} rows", path.display(), table.len());
        tables.push(table);
    }

    let combined = Table::concat(tables);
    log::info!(
        "Loaded {} rows from {} files with columns {:?}",
        combined.len(),
        files.len(),
        combined.column_names()
    );
    Ok(combined)
}

fn load_one(path: &Path) -> Result<Table> {
    let text = read_maybe_gz(path).with_context(|| format!("reading {}", path.display()))?;
    parse_table(&text).with_context(|| format!("parsing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Decompression
// ---------------------------------------------------------------------------

/// Read a whole file as text, gunzipping it first if it starts with the
/// gzip magic bytes.
pub fn read_maybe_gz(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    let mut bytes = Vec::new();
    if is_gzip {
        MultiGzDecoder::new(reader).read_to_end(&mut bytes)?;
    } else {
        reader.read_to_end(&mut bytes)?;
    }
    String::from_utf8(bytes).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("not UTF-8 text: {e}"))
    })
}

// ---------------------------------------------------------------------------
// Whitespace-delimited parser
// ---------------------------------------------------------------------------

/// Parse a header line plus data lines separated by runs of whitespace.
///
/// Blank lines are skipped. Data lines shorter than the header are padded
/// with nulls; longer ones are rejected.
pub fn parse_table(text: &str) -> Result<Table, TableError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(TableError::MissingHeader)?;
    let mut table = Table::with_columns(header.split_whitespace());
    let width = table.column_names().len();

    for (line_no, line) in lines {
        let row: Vec<Value> = line.split_whitespace().map(Value::infer).collect();
        if row.len() > width {
            return Err(TableError::FieldCount {
                line: line_no + 1,
                expected: width,
                found: row.len(),
            });
        }
        table.push_row(row);
    }

    table.promote_numeric_columns();
    Ok(table)
}

// ---------------------------------------------------------------------------
// Path metadata
// ---------------------------------------------------------------------------

fn path_metadata_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PATH_METADATA_PATTERN).expect("valid path metadata pattern"))
}

/// `(treatment, trial)` from a `<treatment>_<trial>/<file>` path.
pub fn path_metadata(path: &Path) -> Option<(String, String)> {
    let text = path.to_string_lossy();
    let caps = path_metadata_regex().captures(&text)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

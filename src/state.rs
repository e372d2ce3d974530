use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::SeriesPalette;
use crate::data::discover::{find_files, DEFAULT_FILE_PATTERN};
use crate::data::filter::{apply, init_filter_state, FilterState};
use crate::data::loader::{load_files, LoadOptions, TrialMode, TREATMENT_COLUMN};
use crate::data::model::{Table, Value};
use crate::stats::CiOptions;
use crate::ui::plot::{ci_series, series_label, CiSeries, SeriesStyle};

/// Seed for viewer intervals so they do not jitter between refreshes.
const VIEWER_SEED: u64 = 0x5eed;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Folder searched for data files.
    pub root: Option<PathBuf>,
    /// Regex matched against file paths under `root`.
    pub pattern: String,
    /// Explicit treatment label; empty means "read it from the path".
    pub treatment: String,
    /// Number trials by file position instead of by directory name.
    pub series_trials: bool,

    /// Combined table (None until a folder is loaded).
    pub table: Option<Table>,
    /// Number of files behind `table`.
    pub file_count: usize,

    pub x_column: Option<String>,
    pub y_column: Option<String>,
    /// Column splitting the data into separately coloured series.
    pub series_column: Option<String>,

    /// Which series values are shown.
    pub filters: FilterState,
    pub palette: Option<SeriesPalette>,

    /// Shared line / band style and bootstrap settings.
    pub style: SeriesStyle,
    /// Draw the confidence band, not just the mean line.
    pub show_band: bool,

    /// Computed series for the current selection (cached).
    pub series: Vec<CiSeries>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            root: None,
            pattern: DEFAULT_FILE_PATTERN.to_string(),
            treatment: String::new(),
            series_trials: false,
            table: None,
            file_count: 0,
            x_column: None,
            y_column: None,
            series_column: None,
            filters: FilterState::default(),
            palette: None,
            style: SeriesStyle {
                ci: CiOptions {
                    seed: Some(VIEWER_SEED),
                    ..CiOptions::default()
                },
                ..SeriesStyle::default()
            },
            show_band: true,
            series: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn load_options(&self) -> LoadOptions {
        let treatment = self.treatment.trim();
        LoadOptions {
            treatment: (!treatment.is_empty()).then(|| treatment.to_string()),
            trial: if self.series_trials {
                TrialMode::Series
            } else {
                TrialMode::FromPath
            },
        }
    }

    /// Discover and load every matching file under `root`.
    pub fn load_folder(&mut self, root: &Path) -> Result<()> {
        let files = find_files(root, &self.pattern)
            .with_context(|| format!("searching {}", root.display()))?;
        if files.is_empty() {
            anyhow::bail!("no files under {} match {:?}", root.display(), self.pattern);
        }
        let table = load_files(&files, &self.load_options())?;

        self.root = Some(root.to_path_buf());
        self.file_count = files.len();
        self.set_table(table);
        Ok(())
    }

    /// Reload the current folder, e.g. after the pattern or options changed.
    pub fn reload(&mut self) -> Result<()> {
        let root = self.root.clone().context("no folder loaded")?;
        self.load_folder(&root)
    }

    /// Ingest a newly loaded table, pick default columns and compute series.
    pub fn set_table(&mut self, table: Table) {
        let columns = table.column_names();
        let keep = |current: &Option<String>| current.clone().filter(|c| table.has_column(c));

        self.series_column = keep(&self.series_column)
            .or_else(|| table.has_column(TREATMENT_COLUMN).then(|| TREATMENT_COLUMN.to_string()));
        self.x_column = keep(&self.x_column).or_else(|| columns.first().cloned());
        self.y_column = keep(&self.y_column).or_else(|| {
            columns
                .iter()
                .find(|c| Some(*c) != self.x_column.as_ref() && Some(*c) != self.series_column.as_ref())
                .cloned()
        });

        self.table = Some(table);
        self.status_message = None;
        self.reset_filters();
    }

    /// Select every value of the series column and rebuild colours.
    pub fn reset_filters(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.filters = match self.series_column.as_deref() {
            Some(col) => init_filter_state(table, &[col]),
            None => FilterState::default(),
        };
        self.palette = self
            .series_column
            .as_deref()
            .map(|col| SeriesPalette::new(col, &table.unique_values(col)));
        self.refresh();
    }

    /// Recompute the plotted series after any selection change.
    pub fn refresh(&mut self) {
        self.series.clear();
        let (Some(table), Some(x), Some(y)) = (&self.table, &self.x_column, &self.y_column) else {
            return;
        };

        let result = match self.series_column.as_deref() {
            Some(col) => self
                .filters
                .get(col)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|value| {
                    let style = SeriesStyle {
                        name: series_label(col, &value),
                        color: self
                            .palette
                            .as_ref()
                            .map(|p| p.color_for(&value))
                            .unwrap_or(self.style.color),
                        ..self.style.clone()
                    };
                    let mut only = FilterState::new();
                    only.insert(col.to_string(), BTreeSet::from([value]));
                    ci_series(x, y, &apply(table, &only), &style)
                })
                .filter(|s| !matches!(s, Ok(s) if s.rows.is_empty()))
                .collect::<Result<Vec<_>, _>>(),
            None => ci_series(x, y, table, &self.style).map(|s| vec![s]),
        };

        match result {
            Ok(series) => {
                self.series = series;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to summarise '{y}' by '{x}': {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_series_column(&mut self, col: Option<String>) {
        self.series_column = col;
        self.reset_filters();
    }

    /// Toggle a single series value.
    pub fn toggle_series(&mut self, value: &Value) {
        let Some(col) = self.series_column.clone() else {
            return;
        };
        let selected = self.filters.entry(col).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refresh();
    }

    /// Show every series value.
    pub fn select_all(&mut self) {
        if let (Some(table), Some(col)) = (&self.table, &self.series_column) {
            self.filters.insert(col.clone(), table.unique_values(col));
            self.refresh();
        }
    }

    /// Hide every series value.
    pub fn select_none(&mut self) {
        if let Some(col) = &self.series_column {
            self.filters.insert(col.clone(), BTreeSet::new());
            self.refresh();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut t = Table::with_columns(["update", "fitness", "treatment", "trial"]);
        for (u, f, tr) in [(0, 1.0, "ctrl"), (1, 2.0, "ctrl"), (0, 5.0, "heat"), (1, 6.0, "heat")] {
            t.push_row(vec![Value::Integer(u), Value::Float(f), Value::from(tr), Value::from("1")]);
        }
        t
    }

    #[test]
    fn load_options_follow_the_controls() {
        let mut state = AppState::default();
        assert_eq!(state.load_options(), LoadOptions::default());
        state.treatment = "  heat ".to_string();
        state.series_trials = true;
        assert_eq!(
            state.load_options(),
            LoadOptions {
                treatment: Some("heat".to_string()),
                trial: TrialMode::Series
            }
        );
    }

    #[test]
    fn new_table_picks_columns_and_one_series_per_treatment() {
        let mut state = AppState::default();
        state.set_table(table());
        assert_eq!(state.x_column.as_deref(), Some("update"));
        assert_eq!(state.y_column.as_deref(), Some("fitness"));
        assert_eq!(state.series_column.as_deref(), Some("treatment"));

        let names: Vec<&str> = state.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["treatment=ctrl", "treatment=heat"]);
        assert_eq!(state.series[1].points, vec![[0.0, 5.0], [1.0, 6.0]]);
        assert_ne!(state.series[0].color, state.series[1].color);
    }

    #[test]
    fn toggling_hides_a_series() {
        let mut state = AppState::default();
        state.set_table(table());
        state.toggle_series(&Value::from("ctrl"));
        assert_eq!(state.series.len(), 1);
        state.select_none();
        assert!(state.series.is_empty());
        state.select_all();
        assert_eq!(state.series.len(), 2);
    }

    #[test]
    fn bad_value_column_is_reported() {
        let mut state = AppState::default();
        state.set_table(table());
        state.y_column = Some("treatment".to_string());
        state.refresh();
        assert!(state.series.is_empty());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn load_folder_reads_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        for (sub, text) in [("ctrl_1", "update fitness\n0 1\n"), ("heat_1", "update fitness\n0 3\n")] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
            std::fs::write(dir.path().join(sub).join("fitness.dat"), text).unwrap();
        }
        let mut state = AppState::default();
        state.load_folder(dir.path()).unwrap();
        assert_eq!(state.file_count, 2);
        assert_eq!(state.series.len(), 2);

        state.pattern = "nothing-matches".to_string();
        assert!(state.reload().is_err());
    }
}

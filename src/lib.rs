//! Load experiment trial tables and summarise them with bootstrap
//! confidence intervals.
//!
//! ```no_run
//! use rusty_trials::{find_files, load_files, quick_ci, CiOptions, LoadOptions};
//!
//! let files = find_files("runs", r"fitness\.dat(\.gz)?$")?;
//! let table = load_files(&files, &LoadOptions::default())?;
//! for row in quick_ci(&table, "update", "fitness", &CiOptions::default())? {
//!     println!("{} {} [{}, {}]", row.group, row.stat, row.low, row.high);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod stats;
pub mod ui;

pub use data::discover::{find_files, find_files_with, DiscoverError};
pub use data::loader::{load_files, LoadOptions, TrialMode, TREATMENT_COLUMN, TRIAL_COLUMN};
pub use data::model::{Table, Value};
pub use stats::{quick_ci, quick_ci_with, CiOptions, CiRow, StatsError};
pub use ui::plot::{quick_ciplot, quick_mean, CiSeries, SeriesStyle};

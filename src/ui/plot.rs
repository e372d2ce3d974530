use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, PlotUi, Polygon};

use crate::color::band_color;
use crate::data::model::{Table, Value};
use crate::state::AppState;
use crate::stats::{quick_ci, CiOptions, CiRow, StatsError};

// ---------------------------------------------------------------------------
// Series style and handle
// ---------------------------------------------------------------------------

/// How one mean-and-interval series is drawn.
#[derive(Debug, Clone)]
pub struct SeriesStyle {
    /// Legend name.
    pub name: String,
    pub color: Color32,
    pub width: f32,
    /// Opacity of the confidence band relative to the line colour.
    pub band_opacity: f32,
    pub ci: CiOptions,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Color32::LIGHT_BLUE,
            width: 1.5,
            band_opacity: 0.25,
            ci: CiOptions::default(),
        }
    }
}

/// A computed series: the per-group summary plus where it lands on the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct CiSeries {
    pub name: String,
    pub color: Color32,
    /// `[x, mean]` per group, in group order.
    pub points: Vec<[f64; 2]>,
    pub rows: Vec<CiRow>,
}

impl CiSeries {
    /// Lower and upper band edges as `[x, y]` points.
    pub fn bounds(&self) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        self.points
            .iter()
            .zip(&self.rows)
            .map(|(p, r)| ([p[0], r.low], [p[0], r.high]))
            .unzip()
    }

    /// The band as one convex quad per segment (egui only fills convex
    /// polygons), or a single vertical bar for a one-group series.
    pub fn band_polygons(&self) -> Vec<Vec<[f64; 2]>> {
        let (low, high) = self.bounds();
        if low.len() == 1 {
            return vec![vec![low[0], high[0]]];
        }
        (1..low.len())
            .map(|i| vec![low[i - 1], low[i], high[i], high[i - 1]])
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// x coordinates for summary groups: the group value itself when every group
/// is numeric, otherwise the group's ordinal position.
pub fn group_positions(rows: &[CiRow]) -> Vec<f64> {
    let numeric: Option<Vec<f64>> = rows.iter().map(|r| r.group.as_f64()).collect();
    numeric.unwrap_or_else(|| (0..rows.len()).map(|i| i as f64).collect())
}

/// Summarise `y` by `x` with bootstrap intervals, ready to draw.
pub fn ci_series(x: &str, y: &str, table: &Table, style: &SeriesStyle) -> Result<CiSeries, StatsError> {
    let rows = quick_ci(table, x, y, &style.ci)?;
    let points = group_positions(&rows)
        .into_iter()
        .zip(&rows)
        .map(|(px, r)| [px, r.stat])
        .collect();
    let name = if style.name.is_empty() {
        y.to_string()
    } else {
        style.name.clone()
    };
    Ok(CiSeries {
        name,
        color: style.color,
        points,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw the mean line of a computed series.
pub fn draw_mean(plot_ui: &mut PlotUi, series: &CiSeries, width: f32) {
    let points: PlotPoints = series.points.iter().copied().collect();
    plot_ui.line(
        Line::new(points)
            .name(&series.name)
            .color(series.color)
            .width(width),
    );
}

/// Draw the shaded band of a computed series.
pub fn draw_band(plot_ui: &mut PlotUi, series: &CiSeries, opacity: f32) {
    let fill = band_color(series.color, opacity);
    for quad in series.band_polygons() {
        if quad.len() == 2 {
            let bar: PlotPoints = quad.into_iter().collect();
            plot_ui.line(Line::new(bar).name(&series.name).color(fill).width(4.0));
            continue;
        }
        let points: PlotPoints = quad.into_iter().collect();
        plot_ui.polygon(
            Polygon::new(points)
                .name(&series.name)
                .fill_color(fill)
                .stroke(Stroke::NONE),
        );
    }
}

/// Mean of `y` per value of `x` as a line with a translucent bootstrap
/// confidence band in the same colour. Returns the plotted series.
pub fn quick_ciplot(
    plot_ui: &mut PlotUi,
    x: &str,
    y: &str,
    table: &Table,
    style: &SeriesStyle,
) -> Result<CiSeries, StatsError> {
    let series = ci_series(x, y, table, style)?;
    draw_band(plot_ui, &series, style.band_opacity);
    draw_mean(plot_ui, &series, style.width);
    Ok(series)
}

/// Mean of `y` per value of `x` as a line only.
pub fn quick_mean(
    plot_ui: &mut PlotUi,
    x: &str,
    y: &str,
    table: &Table,
    style: &SeriesStyle,
) -> Result<(), StatsError> {
    let series = ci_series(x, y, table, style)?;
    draw_mean(plot_ui, &series, style.width);
    Ok(())
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the confidence-interval plot in the central panel.
pub fn trials_plot(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a folder of trial data  (File → Open folder…)");
        });
        return;
    }

    let (Some(x), Some(y)) = (state.x_column.as_deref(), state.y_column.as_deref()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Pick x and y columns");
        });
        return;
    };

    Plot::new("trials_plot")
        .legend(Legend::default())
        .x_axis_label(x)
        .y_axis_label(y)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.series {
                if state.show_band {
                    draw_band(plot_ui, series, state.style.band_opacity);
                }
                draw_mean(plot_ui, series, state.style.width);
            }
        });
}

/// Label for a series value in the legend.
pub fn series_label(column: &str, value: &Value) -> String {
    format!("{column}={value}")
}

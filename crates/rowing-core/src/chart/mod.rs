//! Power-over-time charts.
//!
//! Charting is split in two: [`ChartBuilder::plan`] does the arithmetic
//! (date serials, axis bounds, regression line) and [`ChartBuilder::render`]
//! hands the plan to plotters. Dates are plotted as day serials counted from
//! 1899-12-30, the same encoding spreadsheets use.

mod backend;
pub mod regression;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use plotters::prelude::{
    BitMapBackend, Circle, Color, IntoDrawingArea, LineSeries, PathElement, RGBColor, ShapeStyle,
    WHITE,
};
use serde::Serialize;
use tracing::info;

use crate::error::ChartError;
use crate::record::{PowerRecord, DATE_FORMAT};
use backend::FontSafeBackend;
pub use regression::LinearFit;

pub const DEFAULT_WIDTH: u32 = 744;
pub const DEFAULT_HEIGHT: u32 = 400;
pub const DEFAULT_TITLE: &str = "Rowing Power Over Time for 2500 m Distance on Concept II";
pub const DEFAULT_X_LABEL: &str = "Date";
pub const DEFAULT_Y_LABEL: &str = "Power (Watt)";

/// `num_days_from_ce` of 1899-12-30, day zero of the serial encoding.
const SERIAL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

const DASH_COUNT: usize = 24;
const MARKER_COLOR: RGBColor = RGBColor(30, 144, 255);
const TREND_COLOR: RGBColor = RGBColor(200, 0, 100);

/// Day serial of a date (1899-12-30 is 0).
pub fn date_serial(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce() - SERIAL_EPOCH_DAYS_FROM_CE)
}

/// Nearest date for a day serial.
pub fn serial_date(serial: f64) -> Option<NaiveDate> {
    let days = serial.round();
    if !days.is_finite() || days.abs() > f64::from(i32::MAX / 2) {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(days as i32 + SERIAL_EPOCH_DAYS_FROM_CE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub power: u32,
}

impl From<&PowerRecord> for ChartPoint {
    fn from(record: &PowerRecord) -> Self {
        Self {
            date: record.date(),
            power: record.power(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartStyle {
    /// Markers joined by a line
    Connected,
    /// Markers only; used under a trend line
    Scatter,
}

/// Dashed fit line between the first and last plotted dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub fit: LinearFit,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Everything needed to draw a chart, in plot coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlan {
    pub style: ChartStyle,
    pub points: Vec<(f64, f64)>,
    pub trend: Option<TrendLine>,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl ChartPlan {
    /// Padded axis ranges covering every point and the trend line.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let mut xs: Vec<f64> = self.points.iter().map(|p| p.0).collect();
        let mut ys: Vec<f64> = self.points.iter().map(|p| p.1).collect();
        if let Some(trend) = &self.trend {
            xs.extend([trend.from.0, trend.to.0]);
            ys.extend([trend.from.1, trend.to.1]);
        }
        (padded(&xs, 1.0), padded(&ys, 10.0))
    }
}

fn padded(values: &[f64], min_pad: f64) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(min_pad);
    (lo - pad, hi + pad)
}

/// A rendered chart on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fit: Option<LinearFit>,
}

#[derive(Debug, Clone)]
pub struct ChartBuilder {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
        }
    }
}

impl ChartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out a chart of `points` in input order.
    ///
    /// With `with_regression`, points are drawn as bare markers under a
    /// dashed least-squares line and the title becomes the fit formula.
    ///
    /// # Errors
    ///
    /// Regression needs at least two points on two distinct dates.
    pub fn plan(&self, points: &[ChartPoint], with_regression: bool) -> Result<ChartPlan, ChartError> {
        let coords: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (date_serial(p.date), f64::from(p.power)))
            .collect();

        if !with_regression {
            return Ok(ChartPlan {
                style: ChartStyle::Connected,
                points: coords,
                trend: None,
                title: self.title.clone(),
                x_label: Some(self.x_label.clone()),
                y_label: Some(self.y_label.clone()),
            });
        }

        let xs: Vec<f64> = coords.iter().map(|c| c.0).collect();
        let ys: Vec<f64> = coords.iter().map(|c| c.1).collect();
        let fit = LinearFit::fit(&xs, &ys)?;
        let (first, last) = match (xs.first(), xs.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(ChartError::InsufficientData(xs.len())),
        };

        Ok(ChartPlan {
            style: ChartStyle::Scatter,
            points: coords,
            trend: Some(TrendLine {
                fit,
                from: (first, fit.value_at(first)),
                to: (last, fit.value_at(last)),
            }),
            title: fit.formula_with_r_squared(),
            x_label: None,
            y_label: None,
        })
    }

    /// Draw `plan` into a PNG at `path`, creating the parent directory.
    ///
    /// # Errors
    ///
    /// [`ChartError::Io`] when the directory cannot be created,
    /// [`ChartError::Render`] when plotting or encoding fails.
    pub fn render(&self, plan: &ChartPlan, path: &Path) -> Result<ChartArtifact, ChartError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ChartError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let root =
            FontSafeBackend::new(BitMapBackend::new(path, (self.width, self.height))).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let ((x_lo, x_hi), (y_lo, y_hi)) = plan.bounds();
        let mut chart = plotters::chart::ChartBuilder::on(&root)
            .caption(&plan.title, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(render_err)?;

        let date_label = |serial: &f64| {
            serial_date(*serial)
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        let watt_label = |watts: &f64| format!("{watts:.0}");
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(6)
            .x_label_formatter(&date_label)
            .y_label_formatter(&watt_label);
        if let Some(desc) = plan.x_label.as_deref() {
            mesh.x_desc(desc);
        }
        if let Some(desc) = plan.y_label.as_deref() {
            mesh.y_desc(desc);
        }
        mesh.draw().map_err(render_err)?;

        match plan.style {
            ChartStyle::Connected => {
                chart
                    .draw_series(LineSeries::new(
                        plan.points.iter().copied(),
                        ShapeStyle {
                            color: MARKER_COLOR.to_rgba(),
                            filled: false,
                            stroke_width: 2,
                        },
                    ))
                    .map_err(render_err)?;
                chart
                    .draw_series(
                        plan.points
                            .iter()
                            .map(|p| Circle::new(*p, 4, MARKER_COLOR.filled())),
                    )
                    .map_err(render_err)?;
            }
            ChartStyle::Scatter => {
                chart
                    .draw_series(
                        plan.points
                            .iter()
                            .map(|p| Circle::new(*p, 5, MARKER_COLOR.filled())),
                    )
                    .map_err(render_err)?;
            }
        }

        if let Some(trend) = &plan.trend {
            let style = ShapeStyle {
                color: TREND_COLOR.to_rgba(),
                filled: false,
                stroke_width: 2,
            };
            chart
                .draw_series(
                    dash_segments(trend.from, trend.to, DASH_COUNT)
                        .into_iter()
                        .map(|(a, b)| PathElement::new(vec![a, b], style)),
                )
                .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
        info!(path = %path.display(), points = plan.points.len(), "rendered chart");

        Ok(ChartArtifact {
            path: path.to_path_buf(),
            width: self.width,
            height: self.height,
            fit: plan.trend.map(|t| t.fit),
        })
    }

    /// Plan and render in one step.
    ///
    /// # Errors
    ///
    /// See [`ChartBuilder::plan`] and [`ChartBuilder::render`].
    pub fn build(
        &self,
        points: &[ChartPoint],
        with_regression: bool,
        path: &Path,
    ) -> Result<ChartArtifact, ChartError> {
        let plan = self.plan(points, with_regression)?;
        self.render(&plan, path)
    }
}

/// Split a line into `dashes` visible segments separated by equal gaps.
fn dash_segments(from: (f64, f64), to: (f64, f64), dashes: usize) -> Vec<((f64, f64), (f64, f64))> {
    let steps = (dashes * 2).saturating_sub(1).max(1);
    let at = |i: usize| {
        let t = i as f64 / steps as f64;
        (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
    };
    (0..steps)
        .step_by(2)
        .map(|i| (at(i), at(i + 1)))
        .collect()
}

fn render_err(err: impl Display) -> ChartError {
    ChartError::Render(err.to_string())
}

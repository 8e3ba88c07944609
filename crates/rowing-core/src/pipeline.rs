//! One processing run: read a log, parse it, derive power, write the four
//! lists and draw the chart.
//!
//! Every run builds its own [`RecordStore`], so running twice never
//! duplicates records. Output files are rewritten whole and are not atomic;
//! an interrupted run can leave a truncated list behind.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::{info, warn};

use crate::chart::{ChartArtifact, ChartBuilder, ChartPoint};
use crate::error::{CoreError, ParseError, Result};
use crate::parser::{failure_messages, parse_lines, ParseReport};
use crate::record::Unit;
use crate::store::{Partition, RecordStore};

/// Name of the data folder under the project directory.
pub const DATA_DIR_NAME: &str = "Data";
/// Name of the chart folder under the data folder.
pub const PLOTS_DIR_NAME: &str = "plots";

/// Which prepared input file to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetMode {
    /// 1: the complete log
    Full,
    /// 2: workouts of at least 2500 m
    MinDistance,
    /// 3: at least 2500 m, without 1993
    MinDistanceNo1993,
    /// 4: as 3, early period, with regression
    RegressionEarly,
    /// 5: as 3, late period, with regression
    RegressionLate,
}

impl DatasetMode {
    pub const ALL: [DatasetMode; 5] = [
        DatasetMode::Full,
        DatasetMode::MinDistance,
        DatasetMode::MinDistanceNo1993,
        DatasetMode::RegressionEarly,
        DatasetMode::RegressionLate,
    ];

    /// Menu selector, `1` to `5`.
    pub fn selector(self) -> u8 {
        match self {
            DatasetMode::Full => 1,
            DatasetMode::MinDistance => 2,
            DatasetMode::MinDistanceNo1993 => 3,
            DatasetMode::RegressionEarly => 4,
            DatasetMode::RegressionLate => 5,
        }
    }

    pub fn from_selector(selector: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.selector() == selector)
    }

    pub fn description(self) -> &'static str {
        match self {
            DatasetMode::Full => "original complete input",
            DatasetMode::MinDistance => "input but omit all lines with less than 2500 m",
            DatasetMode::MinDistanceNo1993 => {
                "input but omit all lines with less than 2500 m, and omit data from 1993"
            }
            DatasetMode::RegressionEarly => {
                "input but omit all lines with less than 2500 m, and omit data from 1993, regression early"
            }
            DatasetMode::RegressionLate => {
                "input but omit all lines with less than 2500 m, and omit data from 1993, regression late"
            }
        }
    }

    pub fn input_file_name(self) -> &'static str {
        match self {
            DatasetMode::Full => "input_test.txt",
            DatasetMode::MinDistance => "input_no_less_than_2500m.txt",
            DatasetMode::MinDistanceNo1993 => "input_no_less_than_2500m_wo_1993.txt",
            DatasetMode::RegressionEarly => "input_no_less_than_2500m_regression_early.txt",
            DatasetMode::RegressionLate => "input_no_less_than_2500m_regression_late.txt",
        }
    }

    /// Chart file stem, without the `.png` extension.
    pub fn chart_name(self) -> &'static str {
        match self {
            DatasetMode::Full => "power",
            DatasetMode::MinDistance => "power_no_less_than_2500m",
            DatasetMode::MinDistanceNo1993 => "power_no_less_than_2500m_no_1993",
            DatasetMode::RegressionEarly => "power_no_less_than_2500m_regression_early",
            DatasetMode::RegressionLate => "power_no_less_than_2500m_regression_late",
        }
    }

    pub fn with_regression(self) -> bool {
        matches!(self, DatasetMode::RegressionEarly | DatasetMode::RegressionLate)
    }
}

impl fmt::Display for DatasetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

impl FromStr for DatasetMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_selector)
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

/// File locations below one data folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_dir: PathBuf,
}

impl DataLayout {
    /// Layout for `<project_dir>/Data`.
    pub fn for_project(project_dir: impl AsRef<Path>) -> Self {
        Self::new(project_dir.as_ref().join(DATA_DIR_NAME))
    }

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn input_path(&self, mode: DatasetMode) -> PathBuf {
        self.data_dir.join(mode.input_file_name())
    }

    pub fn output_path(&self, partition: Partition) -> PathBuf {
        self.data_dir.join(partition.file_name())
    }

    pub fn plots_dir(&self) -> PathBuf {
        self.data_dir.join(PLOTS_DIR_NAME)
    }

    pub fn chart_path(&self, mode: DatasetMode) -> PathBuf {
        self.plots_dir().join(format!("{}.png", mode.chart_name()))
    }
}

/// What one run produced.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub mode: DatasetMode,
    pub input: PathBuf,
    #[serde(skip)]
    pub store: RecordStore,
    #[serde(serialize_with = "failure_messages")]
    pub failures: Vec<ParseError>,
    pub outputs: Vec<PathBuf>,
    pub chart: ChartArtifact,
}

impl RunSummary {
    pub fn count(&self, partition: Partition) -> usize {
        self.store.len(partition)
    }
}

pub struct Pipeline {
    layout: DataLayout,
    charts: ChartBuilder,
}

impl Pipeline {
    pub fn new(layout: DataLayout, charts: ChartBuilder) -> Self {
        Self { layout, charts }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Process the input file selected by `mode`.
    ///
    /// Malformed lines are logged and skipped. Reading, writing and charting
    /// failures abort the run.
    ///
    /// # Errors
    ///
    /// [`CoreError::Io`] for file problems, [`CoreError::Chart`] when the
    /// chart cannot be built.
    pub fn run(&self, mode: DatasetMode) -> Result<RunSummary> {
        let input = self.layout.input_path(mode);
        info!(mode = %mode, input = %input.display(), "starting run");

        let report = read_log(&input)?;
        let store = RecordStore::build(report.records);

        let outputs = write_lists(&self.layout, &store)?;

        let points: Vec<ChartPoint> = store
            .power(Unit::Distance)
            .iter()
            .map(ChartPoint::from)
            .collect();
        let chart = self
            .charts
            .build(&points, mode.with_regression(), &self.layout.chart_path(mode))?;

        info!(
            distance = store.len(Partition::DistanceRaw),
            duration = store.len(Partition::DurationRaw),
            rejected = report.failures.len(),
            "run complete"
        );

        Ok(RunSummary {
            mode,
            input,
            store,
            failures: report.failures,
            outputs,
            chart,
        })
    }
}

/// Read and parse a log file.
///
/// A leading byte-order mark is dropped. Bytes that are not UTF-8 are
/// replaced, so such a line fails on its own instead of failing the file.
///
/// # Errors
///
/// [`CoreError::Io`] when the file cannot be read.
pub fn read_log(path: &Path) -> Result<ParseReport> {
    let bytes = std::fs::read(path).map_err(|e| CoreError::io(path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let report = parse_lines(content.lines());
    if !report.is_clean() {
        warn!(
            path = %path.display(),
            rejected = report.failures.len(),
            "some log lines were skipped"
        );
    }
    Ok(report)
}

/// Write all four partitions below the layout's data folder.
///
/// # Errors
///
/// [`CoreError::Io`] when the folder or a file cannot be written.
pub fn write_lists(layout: &DataLayout, store: &RecordStore) -> Result<Vec<PathBuf>> {
    let dir = layout.data_dir();
    std::fs::create_dir_all(dir).map_err(|e| CoreError::io(dir, e))?;

    let mut written = Vec::with_capacity(Partition::ALL.len());
    for partition in Partition::ALL {
        let path = layout.output_path(partition);
        let mut content = store.serialize(partition).join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(&path, content).map_err(|e| CoreError::io(&path, e))?;
        info!(path = %path.display(), records = store.len(partition), "wrote list");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_round_trip() {
        for mode in DatasetMode::ALL {
            assert_eq!(DatasetMode::from_selector(mode.selector()), Some(mode));
            assert_eq!(mode.to_string().parse::<DatasetMode>().unwrap(), mode);
        }
        assert_eq!(DatasetMode::from_selector(0), None);
        assert!(matches!(
            "x".parse::<DatasetMode>(),
            Err(CoreError::UnknownMode(_))
        ));
    }

    #[test]
    fn only_late_modes_regress() {
        let regressing: Vec<_> = DatasetMode::ALL
            .into_iter()
            .filter(|m| m.with_regression())
            .map(DatasetMode::selector)
            .collect();
        assert_eq!(regressing, vec![4, 5]);
    }

    #[test]
    fn read_log_isolates_invalid_utf8_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(
            &path,
            b"25.01.2020,2:12.6,2500 m\n# \xDCbung\n26.01.2020,2:15.0,2500 m\n",
        )
        .unwrap();

        let report = read_log(&path).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0],
            crate::ParseError::PatternMismatch { .. }
        ));
    }

    #[test]
    fn read_log_drops_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(
            &path,
            "\u{feff}25.01.2020,2:12.6,2500 m\n26.01.2020,2:15.0,2500 m\n",
        )
        .unwrap();

        let report = read_log(&path).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.records.len(), 2);
        assert_eq!(
            report.records[0].date(),
            chrono::NaiveDate::from_ymd_opt(2020, 1, 25).unwrap()
        );
    }

    #[test]
    fn layout_places_files_under_data() {
        let layout = DataLayout::for_project("/home/rower");
        assert_eq!(
            layout.input_path(DatasetMode::MinDistance),
            PathBuf::from("/home/rower/Data/input_no_less_than_2500m.txt")
        );
        assert_eq!(
            layout.output_path(Partition::DurationPower),
            PathBuf::from("/home/rower/Data/durationPowerList.txt")
        );
        assert_eq!(
            layout.chart_path(DatasetMode::RegressionLate),
            PathBuf::from("/home/rower/Data/plots/power_no_less_than_2500m_regression_late.png")
        );
    }
}

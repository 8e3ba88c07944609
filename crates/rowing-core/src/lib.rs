//! # Rowing History Core Library
//!
//! Turns a free-text log of rowing-machine workouts into structured records,
//! derives power from pace, writes the derived lists and charts power over
//! time. The `rowing-cli` binary is a thin shell over this library.
//!
//! ## Architecture
//!
//! - **Parser**: one log line in, one [`RawRecord`] or [`ParseError`] out
//! - **Pace codec**: `M:SS.T` to and from [`std::time::Duration`]
//! - **Power**: the Concept2 pace-to-watts formula
//! - **Store**: records partitioned by unit, plus their power records
//! - **Chart**: date/power plots with an optional least-squares trend line
//! - **Pipeline**: one run over one prepared input file
//!
//! ## Key Components
//!
//! - [`parse_line`]: Log line parser
//! - [`RecordStore`]: Partitioned record collections
//! - [`ChartBuilder`]: Chart layout and rendering
//! - [`Pipeline`]: Run orchestration
//! - [`Config`]: Application configuration management

pub mod chart;
pub mod config;
pub mod error;
pub mod pace;
pub mod parser;
pub mod pipeline;
pub mod power;
pub mod record;
pub mod store;

pub use chart::{ChartArtifact, ChartBuilder, ChartPlan, ChartPoint, LinearFit};
pub use config::Config;
pub use error::{
    ChartError, ConfigError, CoreError, PaceFormatError, ParseError, PowerError, SemanticCause,
};
pub use parser::{parse_line, parse_lines, ParseReport};
pub use pipeline::{DataLayout, DatasetMode, Pipeline, RunSummary};
pub use power::power;
pub use record::{PowerRecord, RawRecord, Unit};
pub use store::{Partition, RecordStore};

pub mod config;
pub mod parse;
pub mod run;

use rowing_core::{Config, DataLayout, Pipeline};

use crate::Location;

/// Pipeline for the configured project, with command-line overrides applied.
pub fn pipeline(config: &Config, location: &Location) -> Pipeline {
    let layout = match (&location.data_dir, &location.project_dir) {
        (Some(data_dir), _) => DataLayout::new(data_dir),
        (None, Some(project_dir)) => DataLayout::for_project(project_dir),
        (None, None) => DataLayout::for_project(&config.paths.project_dir),
    };
    Pipeline::new(layout, config.chart_builder())
}

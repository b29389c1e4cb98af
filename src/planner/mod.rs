use std::path::PathBuf;

use thiserror::Error;

pub mod config;
pub mod path;
pub mod storage;
pub mod transform;

pub use config::InspectionParameters;
pub use path::generate;
pub use storage::WaypointStorage;
pub use transform::{ReferenceFrame, Waypoint};

#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("invalid inspection parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("waypoint folder {} does not exist", .0.display())]
    MissingFolder(PathBuf),

    #[error("could not read or write the waypoint file")]
    Csv(#[from] csv::Error),

    #[error("could not access the waypoint file")]
    Io(#[from] std::io::Error),
}

use std::path::PathBuf;

use serde::Deserialize;

use crate::planner::InspectionParameters;

fn default_file_name() -> String {
    "inspection_wp.csv".to_owned()
}

fn default_start_altitude() -> f64 {
    10.0
}

fn default_rpc_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissionConfig {
    /// Directory the planned waypoint file is written to
    pub waypoint_folder: PathBuf,

    /// Waypoint file name inside the folder
    #[serde(default = "default_file_name")]
    pub waypoint_file: String,

    /// Altitude of the synthetic depart/return waypoint, meters AMSL
    #[serde(default = "default_start_altitude")]
    pub start_altitude: f64,

    /// Upper bound on every flight-controller call
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Inspection geometry used when a start request does not override it
    pub inspection: InspectionParameters,
}

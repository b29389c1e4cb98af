use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

#[derive(Subcommand, Debug, Clone)]
pub enum MissionRequest {
    /// plan an inspection around the riser and start flying it
    Start {
        /// take the reference fix from the RTK feed instead of the primary
        /// GNSS
        #[clap(long)]
        use_rtk: bool,

        /// riser diameter in meters
        #[clap(long)]
        diameter: Option<f64>,

        /// distance kept from the riser surface in meters
        #[clap(long)]
        standoff_distance: Option<f64>,

        /// number of angular rings around the riser
        #[clap(long)]
        horizontal_count: Option<u32>,

        /// angular increment between rings in degrees
        #[clap(long)]
        angular_step: Option<f64>,

        /// number of vertical samples per ring
        #[clap(long)]
        vertical_count: Option<u32>,

        /// vertical increment between samples in meters
        #[clap(long)]
        vertical_step: Option<f64>,
    },

    /// negotiate activation and control authority without flying
    Authority,

    /// change where the planned waypoint file is written
    Output {
        /// directory for the waypoint file; must already exist
        #[clap(long)]
        file_path: PathBuf,

        /// waypoint file name inside the directory
        #[clap(long)]
        file_name: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub enum MissionResponse {
    Started { waypoints: usize, file: PathBuf },
    AuthorityGranted,
    OutputChanged { file: PathBuf },
}

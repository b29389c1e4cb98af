pub mod command;
pub mod config;
pub mod error;
pub mod session;
pub mod task;
pub mod waypoint;

pub use command::{MissionRequest, MissionResponse};
pub use config::MissionConfig;
pub use error::MissionError;
pub use session::{MissionPhase, MissionSession};
pub use task::{create_task, MissionTask};

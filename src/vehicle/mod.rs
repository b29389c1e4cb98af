pub mod config;
pub mod event;
pub mod interface;
pub mod rpc;
pub mod task;

pub use config::VehicleConfig;
pub use event::VehicleEvent;
pub use rpc::*;
pub use task::{create_task, VehicleTask};

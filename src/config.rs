use std::path::Path;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::mission::MissionConfig;
use crate::vehicle::VehicleConfig;

#[derive(Debug, Deserialize)]
pub struct RiserSystemConfig {
    pub vehicle: Option<VehicleConfig>,
    pub mission: MissionConfig,
}

impl RiserSystemConfig {
    pub fn read_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut c = Config::new();

        c.merge(File::from(path))?;

        c.try_into()
    }
}

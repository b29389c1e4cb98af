use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::*;

use super::transform::Waypoint;
use super::PlanningError;

/// Row layout shared with the ground-station tooling; column order is part
/// of the schema.
#[derive(Debug, Serialize, Deserialize)]
struct WaypointRecord {
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "AltitudeAMSL")]
    altitude: f64,
    #[serde(rename = "Speed")]
    speed: f64,
    #[serde(rename = "Picture")]
    picture: u8,
    #[serde(rename = "WP")]
    index: u32,
    #[serde(rename = "CameraTilt")]
    camera_tilt: f64,
    #[serde(rename = "UavYaw")]
    uav_yaw: f64,
}

/// Where the planned waypoint sequence is persisted between the planning
/// and upload phases.
#[derive(Debug, Clone)]
pub struct WaypointStorage {
    folder: PathBuf,
    file_name: String,
}

impl WaypointStorage {
    pub fn new(folder: PathBuf, file_name: String) -> Self {
        WaypointStorage { folder, file_name }
    }

    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.file_name)
    }

    pub fn set_file_name(&mut self, file_name: String) {
        debug!("changing waypoint file name to {file_name}");
        self.file_name = file_name;
    }

    /// Points the storage at a different directory; the directory must
    /// already exist.
    pub fn set_folder(&mut self, folder: &Path) -> Result<(), PlanningError> {
        if !folder.is_dir() {
            return Err(PlanningError::MissingFolder(folder.to_owned()));
        }

        debug!("changing waypoint folder to {}", folder.display());
        self.folder = folder.to_owned();
        Ok(())
    }

    /// Writes the planned sequence, replacing any previous file. `speed` is
    /// the cruise speed recorded per row.
    pub fn write(&self, waypoints: &[Waypoint], speed: f64) -> Result<(), PlanningError> {
        let mut writer = csv::Writer::from_path(self.path())?;

        for wp in waypoints {
            writer.serialize(WaypointRecord {
                latitude: wp.latitude,
                longitude: wp.longitude,
                altitude: wp.altitude,
                speed,
                picture: 1,
                index: wp.index,
                camera_tilt: wp.pitch,
                uav_yaw: wp.heading,
            })?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Reads a previously persisted sequence back, in file order.
    pub fn read(&self) -> Result<Vec<Waypoint>, PlanningError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(self.path())?;

        let mut waypoints = Vec::new();
        for record in reader.deserialize() {
            let record: WaypointRecord = record?;
            waypoints.push(Waypoint {
                index: record.index,
                latitude: record.latitude,
                longitude: record.longitude,
                altitude: record.altitude,
                heading: record.uav_yaw,
                pitch: record.camera_tilt,
            });
        }

        Ok(waypoints)
    }
}

/// Removes a stale waypoint file if one exists; planning failures must not
/// leave partial output behind.
pub fn discard(storage: &WaypointStorage) -> Result<(), PlanningError> {
    match fs::remove_file(storage.path()) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(name: &str) -> WaypointStorage {
        let folder = std::env::temp_dir().join("riser-system-storage-tests");
        fs::create_dir_all(&folder).unwrap();
        WaypointStorage::new(folder, format!("{name}.csv"))
    }

    fn waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint {
                index: 0,
                latitude: -22.912345678901,
                longitude: -43.210987654321,
                altitude: 10.0,
                heading: -160.25,
                pitch: -3.5,
            },
            Waypoint {
                index: 1,
                latitude: -22.912345999999,
                longitude: -43.210987000001,
                altitude: 15.0,
                heading: 160.75,
                pitch: 0.0,
            },
        ]
    }

    #[test]
    fn round_trips_geodetic_fields() {
        let storage = storage("round-trip");
        let original = waypoints();

        storage.write(&original, 0.2).unwrap();
        let restored = storage.read().unwrap();

        assert_eq!(restored.len(), original.len());
        for (a, b) in original.iter().zip(&restored) {
            assert_eq!(a.index, b.index);
            assert!((a.latitude - b.latitude).abs() < 1e-9);
            assert!((a.longitude - b.longitude).abs() < 1e-9);
            assert!((a.altitude - b.altitude).abs() < 1e-9);
            assert!((a.heading - b.heading).abs() < 1e-9);
            assert!((a.pitch - b.pitch).abs() < 1e-9);
        }
    }

    #[test]
    fn writes_the_shared_header_schema() {
        let storage = storage("header");
        storage.write(&waypoints(), 0.2).unwrap();

        let contents = fs::read_to_string(storage.path()).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "Latitude,Longitude,AltitudeAMSL,Speed,Picture,WP,CameraTilt,UavYaw"
        );
    }

    #[test]
    fn rewrites_replace_previous_output() {
        let storage = storage("rewrite");
        storage.write(&waypoints(), 0.2).unwrap();
        storage.write(&waypoints()[..1], 0.2).unwrap();

        assert_eq!(storage.read().unwrap().len(), 1);
    }

    #[test]
    fn rejects_a_missing_folder() {
        let mut storage = storage("missing-folder");
        let missing = std::env::temp_dir().join("riser-system-does-not-exist");

        assert!(matches!(
            storage.set_folder(&missing),
            Err(PlanningError::MissingFolder(_))
        ));
    }

    #[test]
    fn discard_tolerates_an_absent_file() {
        let storage = storage("discard-absent");
        let _ = fs::remove_file(storage.path());

        discard(&storage).unwrap();

        storage.write(&waypoints(), 0.2).unwrap();
        discard(&storage).unwrap();
        assert!(!storage.path().exists());
    }
}

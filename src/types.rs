use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point3D {
    /// Longitude/latitude in degrees, (x, y)
    pub point: geo::Point<f64>,

    /// Altitude in meters above mean sea level
    pub altitude: f64,
}

impl Point3D {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Point3D {
            point: geo::Point::new(longitude, latitude),
            altitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    pub fn longitude(&self) -> f64 {
        self.point.x()
    }
}

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Euler {
    /// Roll in degrees
    pub roll: f64,

    /// Pitch in degrees
    pub pitch: f64,

    /// Yaw in degrees
    pub yaw: f64,
}

impl Euler {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Euler { roll, pitch, yaw }
    }
}

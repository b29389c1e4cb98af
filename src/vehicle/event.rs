use crate::types::{Euler, Point3D};

#[derive(Debug, Clone)]
pub enum VehicleEvent {
    /// Primary GNSS fix
    Gps { position: Point3D },

    /// RTK-corrected fix
    Rtk { position: Point3D },

    Orientation { attitude: Euler },
}

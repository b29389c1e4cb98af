use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Approximate Earth radius, meters.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Geodetic origin and initial yaw captured once per mission; immutable
/// while the mission runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    /// Latitude of the origin, degrees
    pub lat0: f64,

    /// Longitude of the origin, degrees
    pub lon0: f64,

    /// Altitude of the origin, meters AMSL
    pub alt0: f64,

    /// Vehicle yaw at capture time, degrees
    pub heading0: f64,
}

/// One planned camera position in geodetic form. The index is the
/// planner's emission order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub index: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,

    /// Vehicle heading at the point, degrees in [-180, 180]
    pub heading: f64,

    /// Camera tilt at the point, degrees in [-90, 90]
    pub pitch: f64,
}

/// Heading of a look direction before trajectory normalization, degrees.
pub fn raw_heading(look: &Vector3<f64>) -> f64 {
    look.y.atan2(look.x).to_degrees() - 180.0 - 90.0
}

/// Wraps a heading into [-180, 180]. A single correction is enough for the
/// bounded deviations the planner produces.
pub fn wrap_heading(heading: f64) -> f64 {
    if heading > 180.0 {
        heading - 360.0
    } else if heading < -180.0 {
        heading + 360.0
    } else {
        heading
    }
}

/// Converts a local offset and unit look direction into geodetic fields.
///
/// Flat-earth equirectangular approximation around the reference origin:
/// accurate for offsets that are small against [`EARTH_RADIUS`] (tens to
/// low hundreds of meters, which inspection standoffs stay well within).
/// `heading_offset` is the normalization captured from the trajectory's
/// first point; the caller owns it, this function has no state.
pub fn project(
    reference: &ReferenceFrame,
    index: u32,
    offset: &Vector3<f64>,
    look: &Vector3<f64>,
    heading_offset: f64,
) -> Waypoint {
    let lat0 = reference.lat0.to_radians();
    let lon0 = reference.lon0.to_radians();

    // reference origin on the flat-earth plane
    let x0 = EARTH_RADIUS * lon0 * lon0.cos();
    let y0 = EARTH_RADIUS * lat0;

    let x = offset.x + x0;
    let y = offset.y + y0;

    let longitude = (x / (EARTH_RADIUS * lon0.cos())).to_degrees();
    let latitude = (y / EARTH_RADIUS).to_degrees();
    let altitude = offset.z + reference.alt0;

    let heading = wrap_heading(raw_heading(look) - heading_offset + reference.heading0);
    let pitch = look.z.asin().to_degrees();

    Waypoint {
        index,
        latitude,
        longitude,
        altitude,
        heading,
        pitch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceFrame {
        ReferenceFrame {
            lat0: 0.0,
            lon0: 0.0,
            alt0: 10.0,
            heading0: 0.0,
        }
    }

    #[test]
    fn wraps_heading_once_in_each_direction() {
        assert_eq!(wrap_heading(200.0), -160.0);
        assert_eq!(wrap_heading(-200.0), 160.0);
        assert_eq!(wrap_heading(179.0), 179.0);
        assert_eq!(wrap_heading(-180.0), -180.0);
    }

    #[test]
    fn altitude_is_additive_over_the_reference() {
        let wp = project(
            &reference(),
            0,
            &Vector3::new(0.0, 0.0, 5.0),
            &Vector3::new(1.0, 0.0, 0.0),
            0.0,
        );
        assert!((wp.altitude - 15.0).abs() < 1e-12);
    }

    #[test]
    fn northward_offset_raises_latitude_only() {
        let wp = project(
            &reference(),
            0,
            &Vector3::new(0.0, 100.0, 0.0),
            &Vector3::new(1.0, 0.0, 0.0),
            0.0,
        );

        let expected_lat = (100.0 / EARTH_RADIUS).to_degrees();
        assert!((wp.latitude - expected_lat).abs() < 1e-12);
        assert!(wp.longitude.abs() < 1e-12);
    }

    #[test]
    fn first_point_heading_collapses_to_the_initial_yaw() {
        let look = Vector3::new(1.0, 0.0, 0.0);
        let offset = raw_heading(&look);

        let mut reference = reference();
        reference.heading0 = 37.5;

        let wp = project(&reference, 0, &Vector3::new(4.0, 0.0, 0.0), &look, offset);
        assert!((wp.heading - 37.5).abs() < 1e-12);
    }

    #[test]
    fn pitch_comes_from_the_vertical_look_component() {
        let down = Vector3::new(0.0, 0.0, -1.0);
        let wp = project(&reference(), 0, &Vector3::new(4.0, 0.0, 0.0), &down, 0.0);
        assert!((wp.pitch + 90.0).abs() < 1e-9);

        let level = Vector3::new(-1.0, 0.0, 0.0);
        let wp = project(&reference(), 0, &Vector3::new(4.0, 0.0, 0.0), &level, 0.0);
        assert!(wp.pitch.abs() < 1e-9);
    }
}

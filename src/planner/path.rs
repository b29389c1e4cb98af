use nalgebra::{Rotation3, Vector3};

use super::config::InspectionParameters;
use super::transform::{self, ReferenceFrame, Waypoint};
use super::PlanningError;

/// Fixed rotation aligning the planner's ring frame with the reference
/// frame convention: the scan starts on the far side of the riser from the
/// vehicle's departure point.
fn frame_rotation() -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::PI)
}

/// Position on the inspection ring at angle `alpha` (radians) and height `z`.
fn ring_position(radius: f64, alpha: f64, z: f64) -> Vector3<f64> {
    Vector3::new(radius * alpha.cos(), radius * alpha.sin(), z)
}

/// Enumerates the boustrophedon ring scan around the riser and converts
/// each point to geodetic form. Deterministic and pure; emits exactly
/// `horizontal_count * vertical_count` waypoints in ring-major order.
pub fn generate(
    reference: &ReferenceFrame,
    params: &InspectionParameters,
) -> Result<Vec<Waypoint>, PlanningError> {
    params.validate()?;

    let rotation = frame_rotation();
    let radius = params.ring_radius();

    // total height change covered by one vertical sweep
    let span = (params.vertical_count - 1) as f64 * params.vertical_step;

    let mut waypoints = Vec::with_capacity(params.point_count());
    let mut heading_offset = 0.0;
    let mut upward = true;
    let mut index = 0u32;

    for ring in 0..params.horizontal_count {
        let alpha = (ring as f64 * params.angular_step).to_radians();

        // alternate the sweep direction per ring to minimize repositioning
        let (start, step) = if upward {
            (0.0, params.vertical_step)
        } else {
            (span, -params.vertical_step)
        };

        for sample in 0..params.vertical_count {
            let z = sample as f64 * step + start;

            let position = ring_position(radius, alpha, z);

            // look at the riser axis at the same height
            let target = Vector3::new(0.0, 0.0, z);
            let look = (target - position).normalize();

            let position = rotation * position;
            let look = rotation * look;

            if index == 0 {
                heading_offset = transform::raw_heading(&look);
            }

            waypoints.push(transform::project(
                reference,
                index,
                &position,
                &look,
                heading_offset,
            ));
            index += 1;
        }

        upward = !upward;
    }

    Ok(waypoints)
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

    fn params() -> InspectionParameters {
        InspectionParameters {
            diameter: 2.0,
            standoff_distance: 3.0,
            horizontal_count: 4,
            angular_step: 90.0,
            vertical_count: 2,
            vertical_step: 5.0,
        }
    }

    #[test]
    fn emits_one_waypoint_per_ring_sample() {
        let waypoints = generate(&reference(), &params()).unwrap();
        assert_eq!(waypoints.len(), 8);

        for (i, wp) in waypoints.iter().enumerate() {
            assert_eq!(wp.index, i as u32);
            assert!(wp.heading.abs() <= 180.0);
            assert!(wp.pitch.abs() <= 90.0);
        }
    }

    #[test]
    fn first_ring_point_sits_on_the_positive_x_axis() {
        let p = ring_position(params().ring_radius(), 0.0, 0.0);
        assert!((p - Vector3::new(4.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate(&reference(), &params()).unwrap();
        let b = generate(&reference(), &params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_point_parameters_degenerate_cleanly() {
        let mut p = params();
        p.horizontal_count = 1;
        p.vertical_count = 1;

        let waypoints = generate(&reference(), &p).unwrap();
        assert_eq!(waypoints.len(), 1);

        // one ring, one sample: the scan stays at height zero
        assert!((waypoints[0].altitude - reference().alt0).abs() < 1e-12);
    }

    #[test]
    fn vertical_sweep_alternates_between_rings() {
        let waypoints = generate(&reference(), &params()).unwrap();

        // ring 0 climbs, ring 1 descends
        assert!(waypoints[0].altitude < waypoints[1].altitude);
        assert!(waypoints[2].altitude > waypoints[3].altitude);

        // no repositioning jump between consecutive rings
        assert!((waypoints[1].altitude - waypoints[2].altitude).abs() < 1e-12);
    }

    #[test]
    fn first_waypoint_heading_matches_the_reference_yaw() {
        let mut r = reference();
        r.heading0 = 42.0;

        let waypoints = generate(&r, &params()).unwrap();
        assert!((waypoints[0].heading - 42.0).abs() < 1e-9);
    }

    #[test]
    fn angular_steps_past_a_full_turn_resample_the_ring() {
        let mut p = params();
        p.horizontal_count = 5;
        p.angular_step = 180.0;

        // rings 0, 2 and 4 land on the same angle
        let waypoints = generate(&reference(), &p).unwrap();
        let first = &waypoints[0];
        let third = &waypoints[2 * p.vertical_count as usize];

        assert!((first.latitude - third.latitude).abs() < 1e-12);
        assert!((first.longitude - third.longitude).abs() < 1e-12);
    }
}

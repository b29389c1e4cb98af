use serde::Deserialize;

use super::PlanningError;

/// Geometry of one ring-pattern inspection.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct InspectionParameters {
    /// Riser diameter, meters
    pub diameter: f64,

    /// Distance kept between the camera and the riser surface, meters
    pub standoff_distance: f64,

    /// Number of angular rings around the riser
    pub horizontal_count: u32,

    /// Angular increment between rings, degrees. Values that accumulate
    /// past 360 are allowed and simply re-sample earlier ring positions.
    pub angular_step: f64,

    /// Number of vertical samples per ring
    pub vertical_count: u32,

    /// Vertical increment between samples, meters
    pub vertical_step: f64,
}

impl InspectionParameters {
    pub fn ring_radius(&self) -> f64 {
        self.diameter / 2.0 + self.standoff_distance
    }

    pub fn point_count(&self) -> usize {
        self.horizontal_count as usize * self.vertical_count as usize
    }

    pub fn validate(&self) -> Result<(), PlanningError> {
        if !(self.diameter > 0.0) {
            return Err(PlanningError::InvalidParameters("diameter must be positive"));
        }
        if !(self.standoff_distance > 0.0) {
            return Err(PlanningError::InvalidParameters(
                "standoff distance must be positive",
            ));
        }
        if self.horizontal_count < 1 {
            return Err(PlanningError::InvalidParameters(
                "at least one ring is required",
            ));
        }
        if !(self.angular_step > 0.0) {
            return Err(PlanningError::InvalidParameters(
                "angular step must be positive",
            ));
        }
        if self.vertical_count < 1 {
            return Err(PlanningError::InvalidParameters(
                "at least one vertical sample is required",
            ));
        }
        if !(self.vertical_step > 0.0) {
            return Err(PlanningError::InvalidParameters(
                "vertical step must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn ring_radius_adds_standoff_to_the_surface() {
        assert_eq!(params().ring_radius(), 4.0);
    }

    #[test]
    fn rejects_non_positive_values() {
        let mut p = params();
        p.diameter = 0.0;
        assert!(p.validate().is_err());

        let mut p = params();
        p.vertical_step = -1.0;
        assert!(p.validate().is_err());

        let mut p = params();
        p.horizontal_count = 0;
        assert!(p.validate().is_err());

        assert!(params().validate().is_ok());
    }
}

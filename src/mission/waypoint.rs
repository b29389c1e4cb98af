use serde::{Deserialize, Serialize};

use crate::planner::{ReferenceFrame, Waypoint};

use super::error::MissionError;

/// Maximum joystick speed during the mission, m/s.
pub const VELOCITY_RANGE: f64 = 2.0;

/// Cruise speed without joystick input, m/s.
pub const IDLE_VELOCITY: f64 = 0.2;

/// Hover time at each waypoint before the photo is taken, ms.
pub const STAY_MILLIS: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishAction {
    NoAction,
    ReturnHome,
    AutoLand,
    ReturnFirstWaypoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YawMode {
    Auto,
    Lock,
    Rc,
    Waypoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    Point,
    Coordinated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RcLostAction {
    /// keep flying the uploaded route
    Free,
    GoHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GimbalPitchMode {
    Free,
    Auto,
}

/// Action executed on arrival at a waypoint, in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointActionCommand {
    /// hover in place for the given milliseconds
    Stay { millis: u32 },
    /// trigger a single still photo
    TakePhoto,
}

/// Per-point settings uploaded to the flight controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointSettings {
    pub index: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub damping: f64,
    /// degrees
    pub yaw: f64,
    /// degrees
    pub gimbal_pitch: f64,
    pub turn_mode: u8,
    pub action_time_limit: u32,
    pub action_repeat: u8,
    pub actions: Vec<WaypointActionCommand>,
}

impl Default for WaypointSettings {
    fn default() -> Self {
        WaypointSettings {
            index: 0,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            damping: 0.0,
            yaw: 0.0,
            gimbal_pitch: 0.0,
            turn_mode: 0,
            action_time_limit: 100,
            action_repeat: 1,
            actions: vec![
                WaypointActionCommand::Stay {
                    millis: STAY_MILLIS,
                },
                WaypointActionCommand::TakePhoto,
            ],
        }
    }
}

impl WaypointSettings {
    pub fn at(
        index: u32,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        yaw: f64,
        gimbal_pitch: f64,
    ) -> Self {
        WaypointSettings {
            index,
            latitude,
            longitude,
            altitude,
            yaw,
            gimbal_pitch,
            ..Default::default()
        }
    }
}

/// The ordered mission handed to the flight controller in one upload.
/// Created fresh per mission and dropped once uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointTask {
    pub velocity_range: f64,
    pub idle_velocity: f64,
    pub action_on_finish: FinishAction,
    pub mission_exec_times: u32,
    pub yaw_mode: YawMode,
    pub trace_mode: TraceMode,
    pub action_on_rc_lost: RcLostAction,
    pub gimbal_pitch_mode: GimbalPitchMode,
    waypoints: Vec<WaypointSettings>,
}

impl Default for WaypointTask {
    fn default() -> Self {
        WaypointTask {
            velocity_range: VELOCITY_RANGE,
            idle_velocity: IDLE_VELOCITY,
            action_on_finish: FinishAction::NoAction,
            mission_exec_times: 1,
            yaw_mode: YawMode::Waypoint,
            trace_mode: TraceMode::Point,
            action_on_rc_lost: RcLostAction::Free,
            gimbal_pitch_mode: GimbalPitchMode::Free,
            waypoints: Vec::new(),
        }
    }
}

impl WaypointTask {
    /// Appends a waypoint; indices must be unique within the mission.
    pub fn push(&mut self, waypoint: WaypointSettings) -> Result<(), MissionError> {
        if self.waypoints.iter().any(|wp| wp.index == waypoint.index) {
            return Err(MissionError::DuplicateWaypoint(waypoint.index));
        }

        self.waypoints.push(waypoint);
        Ok(())
    }

    pub fn waypoints(&self) -> &[WaypointSettings] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Builds the upload task from the persisted sequence: a synthetic depart
/// waypoint at the reference, the planned points re-indexed 1..=n in file
/// order, and a return waypoint identical to depart at n+1.
pub fn assemble(
    reference: &ReferenceFrame,
    waypoints: &[Waypoint],
) -> Result<WaypointTask, MissionError> {
    let mut task = WaypointTask::default();

    let depart = WaypointSettings::at(
        0,
        reference.lat0,
        reference.lon0,
        reference.alt0,
        reference.heading0,
        0.0,
    );
    task.push(depart.clone())?;

    for (n, wp) in waypoints.iter().enumerate() {
        task.push(WaypointSettings::at(
            n as u32 + 1,
            wp.latitude,
            wp.longitude,
            wp.altitude,
            wp.heading,
            wp.pitch,
        ))?;
    }

    let mut finish = depart;
    finish.index = waypoints.len() as u32 + 1;
    task.push(finish)?;

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceFrame {
        ReferenceFrame {
            lat0: -22.9,
            lon0: -43.2,
            alt0: 10.0,
            heading0: 15.0,
        }
    }

    fn planned(index: u32) -> Waypoint {
        Waypoint {
            index,
            latitude: -22.91,
            longitude: -43.21,
            altitude: 12.0,
            heading: -20.0,
            pitch: -2.0,
        }
    }

    #[test]
    fn task_defaults_match_the_upload_contract() {
        let task = WaypointTask::default();

        assert_eq!(task.velocity_range, 2.0);
        assert_eq!(task.idle_velocity, 0.2);
        assert_eq!(task.action_on_finish, FinishAction::NoAction);
        assert_eq!(task.mission_exec_times, 1);
        assert_eq!(task.yaw_mode, YawMode::Waypoint);
        assert_eq!(task.trace_mode, TraceMode::Point);
        assert_eq!(task.action_on_rc_lost, RcLostAction::Free);
        assert_eq!(task.gimbal_pitch_mode, GimbalPitchMode::Free);
    }

    #[test]
    fn waypoint_defaults_hover_then_shoot() {
        let wp = WaypointSettings::default();

        assert_eq!(wp.action_time_limit, 100);
        assert_eq!(wp.action_repeat, 1);
        assert_eq!(
            wp.actions,
            vec![
                WaypointActionCommand::Stay { millis: 5000 },
                WaypointActionCommand::TakePhoto,
            ]
        );
    }

    #[test]
    fn assemble_wraps_the_route_in_depart_and_return() {
        let task = assemble(&reference(), &[planned(0)]).unwrap();

        assert_eq!(task.len(), 3);

        let wps = task.waypoints();
        assert_eq!(wps[0].index, 0);
        assert_eq!(wps[1].index, 1);
        assert_eq!(wps[2].index, 2);

        // depart and return are the captured reference
        for end in [&wps[0], &wps[2]] {
            assert_eq!(end.latitude, reference().lat0);
            assert_eq!(end.longitude, reference().lon0);
            assert_eq!(end.altitude, reference().alt0);
            assert_eq!(end.yaw, reference().heading0);
        }
    }

    #[test]
    fn assemble_reindexes_the_persisted_sequence() {
        // persisted indices are ignored in favor of strictly increasing ones
        let task = assemble(&reference(), &[planned(7), planned(7), planned(9)]).unwrap();

        let indices: Vec<u32> = task.waypoints().iter().map(|wp| wp.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn duplicate_indices_are_rejected() {
        let mut task = WaypointTask::default();
        task.push(WaypointSettings::at(3, 0.0, 0.0, 0.0, 0.0, 0.0))
            .unwrap();

        let err = task
            .push(WaypointSettings::at(3, 1.0, 1.0, 1.0, 0.0, 0.0))
            .unwrap_err();

        assert!(matches!(err, MissionError::DuplicateWaypoint(3)));
    }
}

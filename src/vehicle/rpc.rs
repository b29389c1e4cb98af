use serde::{Deserialize, Serialize};

use crate::mission::waypoint::WaypointTask;

/// Vendor acknowledgment pair returned by every flight-controller call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServiceAck {
    pub result: bool,
    pub cmd_set: u8,
    pub cmd_id: u8,
    pub ack_data: u32,
}

impl ServiceAck {
    /// The controller already has an authority request in flight; the
    /// request should be sent once more.
    pub fn authority_in_progress(&self) -> bool {
        self.ack_data == 3 && self.cmd_set == 1 && self.cmd_id == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MissionType {
    Waypoint = 0,
    Hotpoint = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MissionAction {
    Start = 0,
    Stop = 1,
    Pause = 2,
    Resume = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CameraAction {
    TakePhoto = 0,
    StartVideo = 1,
    StopVideo = 2,
}

#[derive(Debug, Clone)]
pub enum VehicleRequest {
    Activate,

    ControlAuthority {
        enable: bool,
    },

    UploadMission(WaypointTask),

    MissionAction {
        mission_type: MissionType,
        action: MissionAction,
    },

    CameraAction {
        action: CameraAction,
    },
}

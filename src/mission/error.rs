use thiserror::Error;

use crate::planner::PlanningError;
use crate::vehicle::{MissionType, ServiceAck};

#[derive(Error, Debug)]
pub enum MissionError {
    #[error("no position fix has been received yet")]
    ReferenceUnavailable,

    #[error("could not plan the inspection")]
    Planning(#[from] PlanningError),

    #[error(
        "vehicle activation rejected (set = {}, id = {}, ack = {})",
        .0.cmd_set, .0.cmd_id, .0.ack_data
    )]
    ActivationFailed(ServiceAck),

    #[error(
        "control authority denied (set = {}, id = {}, ack = {})",
        .0.cmd_set, .0.cmd_id, .0.ack_data
    )]
    AuthorityDenied(ServiceAck),

    #[error(
        "waypoint upload rejected (set = {}, id = {}, ack = {})",
        .0.cmd_set, .0.cmd_id, .0.ack_data
    )]
    UploadRejected(ServiceAck),

    #[error(
        "mission start rejected (set = {}, id = {}, ack = {})",
        .0.cmd_set, .0.cmd_id, .0.ack_data
    )]
    StartRejected(ServiceAck),

    #[error(
        "photo capture rejected (set = {}, id = {}, ack = {})",
        .0.cmd_set, .0.cmd_id, .0.ack_data
    )]
    PhotoCaptureFailed(ServiceAck),

    #[error("duplicate waypoint index {0}")]
    DuplicateWaypoint(u32),

    #[error("mission type {0:?} is not supported")]
    UnsupportedMissionType(MissionType),

    #[error("vehicle did not answer the {0} request in time")]
    VehicleTimeout(&'static str),

    #[error("vehicle request failed: {0}")]
    Vehicle(#[source] anyhow::Error),
}

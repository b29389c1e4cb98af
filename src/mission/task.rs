use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::select;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::client::{ChannelCommandSink, ChannelCommandSource, Task};
use crate::planner::{self, InspectionParameters, ReferenceFrame, WaypointStorage};
use crate::telemetry::Telemetry;
use crate::vehicle::{CameraAction, MissionAction, MissionType, ServiceAck, VehicleRequest};

use super::command::{MissionRequest, MissionResponse};
use super::config::MissionConfig;
use super::error::MissionError;
use super::session::{MissionPhase, MissionSession};
use super::waypoint;

/// Altitude change that triggers an in-flight photo, meters.
const CAPTURE_ALTITUDE_DELTA: f64 = 0.2;

pub fn create_task(
    config: MissionConfig,
    telem_rx: watch::Receiver<Telemetry>,
    vehicle_tx: ChannelCommandSink<VehicleRequest, ServiceAck>,
) -> anyhow::Result<MissionTask> {
    let (cmd_tx, cmd_rx) = flume::bounded(256);

    Ok(MissionTask {
        config,
        cmd_tx,
        cmd_rx,
        telem_rx,
        vehicle_tx,
    })
}

pub struct MissionTask {
    config: MissionConfig,
    cmd_tx: ChannelCommandSink<MissionRequest, MissionResponse>,
    cmd_rx: ChannelCommandSource<MissionRequest, MissionResponse>,
    telem_rx: watch::Receiver<Telemetry>,
    vehicle_tx: ChannelCommandSink<VehicleRequest, ServiceAck>,
}

impl MissionTask {
    pub fn cmd(&self) -> ChannelCommandSink<MissionRequest, MissionResponse> {
        self.cmd_tx.clone()
    }
}

/// Issues one flight-controller request and waits for its ack, bounded by
/// the configured timeout.
async fn call(
    vehicle: &ChannelCommandSink<VehicleRequest, ServiceAck>,
    request: VehicleRequest,
    timeout: Duration,
    what: &'static str,
) -> Result<ServiceAck, MissionError> {
    let (tx, rx) = oneshot::channel();

    vehicle
        .send_async((request, tx))
        .await
        .map_err(|_| MissionError::Vehicle(anyhow!("vehicle task is not running")))?;

    match tokio::time::timeout(timeout, rx).await {
        Err(_) => Err(MissionError::VehicleTimeout(what)),
        Ok(Err(_)) => Err(MissionError::Vehicle(anyhow!(
            "vehicle task dropped the request"
        ))),
        Ok(Ok(Err(err))) => Err(MissionError::Vehicle(err)),
        Ok(Ok(Ok(ack))) => Ok(ack),
    }
}

/// Activation followed by the authority request. An ack that reports the
/// request as already in progress is sent once more; any other rejection is
/// terminal.
async fn ask_control_authority(
    vehicle: &ChannelCommandSink<VehicleRequest, ServiceAck>,
    timeout: Duration,
) -> Result<(), MissionError> {
    let ack = call(vehicle, VehicleRequest::Activate, timeout, "activation").await?;
    if !ack.result {
        return Err(MissionError::ActivationFailed(ack));
    }
    info!("activated successfully");

    let request = VehicleRequest::ControlAuthority { enable: true };
    let ack = call(vehicle, request.clone(), timeout, "control authority").await?;
    if ack.result {
        info!("obtained control authority");
        return Ok(());
    }

    if ack.authority_in_progress() {
        info!("authority request in progress, sending the command again");
        let ack = call(vehicle, request, timeout, "control authority").await?;
        if ack.result {
            info!("obtained control authority");
            return Ok(());
        }
        return Err(MissionError::AuthorityDenied(ack));
    }

    Err(MissionError::AuthorityDenied(ack))
}

/// Starts an uploaded mission. Only waypoint missions exist on this
/// vehicle; anything else is rejected instead of silently ignored.
async fn mission_action(
    vehicle: &ChannelCommandSink<VehicleRequest, ServiceAck>,
    timeout: Duration,
    mission_type: MissionType,
    action: MissionAction,
) -> Result<ServiceAck, MissionError> {
    match mission_type {
        MissionType::Waypoint => {
            call(
                vehicle,
                VehicleRequest::MissionAction {
                    mission_type,
                    action,
                },
                timeout,
                "mission action",
            )
            .await
        }
        other => Err(MissionError::UnsupportedMissionType(other)),
    }
}

async fn take_picture(
    vehicle: &ChannelCommandSink<VehicleRequest, ServiceAck>,
    timeout: Duration,
) -> Result<(), MissionError> {
    let ack = call(
        vehicle,
        VehicleRequest::CameraAction {
            action: CameraAction::TakePhoto,
        },
        timeout,
        "camera action",
    )
    .await?;

    if ack.result {
        Ok(())
    } else {
        Err(MissionError::PhotoCaptureFailed(ack))
    }
}

fn should_capture(last_altitude: f64, altitude: f64) -> bool {
    (altitude - last_altitude).abs() > CAPTURE_ALTITUDE_DELTA
}

/// Snapshot the latest fix and yaw into the mission's reference frame.
fn capture_reference(
    telemetry: &Telemetry,
    use_rtk: bool,
    start_altitude: f64,
) -> Result<ReferenceFrame, MissionError> {
    let fix = if use_rtk {
        telemetry.rtk
    } else {
        telemetry.position
    };
    let (position, _) = fix.ok_or(MissionError::ReferenceUnavailable)?;

    let heading0 = match telemetry.attitude {
        Some((attitude, _)) => attitude.yaw,
        None => {
            warn!("no attitude received yet, assuming zero initial yaw");
            0.0
        }
    };

    Ok(ReferenceFrame {
        lat0: position.latitude(),
        lon0: position.longitude(),
        alt0: start_altitude,
        heading0,
    })
}

fn apply_overrides(
    mut params: InspectionParameters,
    diameter: Option<f64>,
    standoff_distance: Option<f64>,
    horizontal_count: Option<u32>,
    angular_step: Option<f64>,
    vertical_count: Option<u32>,
    vertical_step: Option<f64>,
) -> InspectionParameters {
    if let Some(diameter) = diameter {
        params.diameter = diameter;
    }
    if let Some(standoff_distance) = standoff_distance {
        params.standoff_distance = standoff_distance;
    }
    if let Some(horizontal_count) = horizontal_count {
        params.horizontal_count = horizontal_count;
    }
    if let Some(angular_step) = angular_step {
        params.angular_step = angular_step;
    }
    if let Some(vertical_count) = vertical_count {
        params.vertical_count = vertical_count;
    }
    if let Some(vertical_step) = vertical_step {
        params.vertical_step = vertical_step;
    }
    params
}

/// The whole mission-start sequence: reference capture, planning,
/// persistence, authority negotiation, upload, start. Any failure aborts
/// the request; already-issued calls are not rolled back.
async fn run_mission(
    config: &MissionConfig,
    storage: &WaypointStorage,
    telem_rx: &watch::Receiver<Telemetry>,
    vehicle: &ChannelCommandSink<VehicleRequest, ServiceAck>,
    session: &mut MissionSession,
    use_rtk: bool,
    params: InspectionParameters,
) -> Result<MissionResponse, MissionError> {
    let timeout = Duration::from_secs(config.rpc_timeout_secs);

    // a new request supersedes whatever mission came before it
    if let Some(previous) = session.reference.take() {
        debug!(
            "superseding mission referenced at ({:.6}, {:.6})",
            previous.lat0, previous.lon0
        );
    }
    *session = MissionSession::idle();

    session.phase = MissionPhase::CapturingReference;
    let reference = capture_reference(&telem_rx.borrow(), use_rtk, config.start_altitude)?;
    debug!(
        "reference captured at ({:.6}, {:.6}), heading {:.1}",
        reference.lat0, reference.lon0, reference.heading0
    );

    session.phase = MissionPhase::Planning;
    let waypoints = match planner::generate(&reference, &params) {
        Ok(waypoints) => waypoints,
        Err(err) => {
            // no partial output survives a failed plan
            let _ = planner::storage::discard(storage);
            return Err(err.into());
        }
    };

    session.phase = MissionPhase::PersistingMission;
    storage.write(&waypoints, waypoint::IDLE_VELOCITY)?;
    info!("waypoints created at {}", storage.path().display());

    session.phase = MissionPhase::AcquiringAuthority;
    ask_control_authority(vehicle, timeout).await?;

    session.phase = MissionPhase::UploadingMission;
    let persisted = storage.read()?;
    let task = waypoint::assemble(&reference, &persisted)?;
    let total = task.len();

    let ack = call(
        vehicle,
        VehicleRequest::UploadMission(task),
        timeout,
        "mission upload",
    )
    .await?;
    if !ack.result {
        return Err(MissionError::UploadRejected(ack));
    }
    info!("waypoint upload command sent successfully");

    let ack = mission_action(vehicle, timeout, MissionType::Waypoint, MissionAction::Start).await?;
    if !ack.result {
        return Err(MissionError::StartRejected(ack));
    }
    info!("mission start command sent successfully");

    session.last_captured_altitude = match telem_rx.borrow().position {
        Some((position, _)) => position.altitude,
        None => reference.alt0,
    };
    session.reference = Some(reference);
    session.phase = MissionPhase::Executing;

    Ok(MissionResponse::Started {
        waypoints: total,
        file: storage.path(),
    })
}

fn set_output(
    storage: &mut WaypointStorage,
    file_path: std::path::PathBuf,
    file_name: Option<String>,
) -> Result<MissionResponse, MissionError> {
    if let Some(file_name) = file_name {
        storage.set_file_name(file_name);
    }

    storage.set_folder(&file_path)?;

    Ok(MissionResponse::OutputChanged {
        file: storage.path(),
    })
}

#[async_trait]
impl Task for MissionTask {
    fn name(&self) -> &'static str {
        "mission/control"
    }

    async fn run(self: Box<Self>, cancel: CancellationToken) -> anyhow::Result<()> {
        let Self {
            config,
            cmd_rx,
            mut telem_rx,
            vehicle_tx,
            ..
        } = *self;

        let mut storage = WaypointStorage::new(
            config.waypoint_folder.clone(),
            config.waypoint_file.clone(),
        );
        let mut session = MissionSession::idle();

        loop {
            select! {
                _ = cancel.cancelled() => break,

                cmd = cmd_rx.recv_async() => {
                    match cmd {
                        Ok((request, ret)) => {
                            let result = match request {
                                MissionRequest::Start {
                                    use_rtk,
                                    diameter,
                                    standoff_distance,
                                    horizontal_count,
                                    angular_step,
                                    vertical_count,
                                    vertical_step,
                                } => {
                                    let params = apply_overrides(
                                        config.inspection,
                                        diameter,
                                        standoff_distance,
                                        horizontal_count,
                                        angular_step,
                                        vertical_count,
                                        vertical_step,
                                    );

                                    let result = run_mission(
                                        &config,
                                        &storage,
                                        &telem_rx,
                                        &vehicle_tx,
                                        &mut session,
                                        use_rtk,
                                        params,
                                    )
                                    .await;

                                    if result.is_err() {
                                        session.phase = MissionPhase::Failed;
                                    }

                                    result
                                }

                                MissionRequest::Authority => {
                                    let timeout = Duration::from_secs(config.rpc_timeout_secs);
                                    ask_control_authority(&vehicle_tx, timeout)
                                        .await
                                        .map(|()| MissionResponse::AuthorityGranted)
                                }

                                MissionRequest::Output {
                                    file_path,
                                    file_name,
                                } => set_output(&mut storage, file_path, file_name),
                            };

                            if let Err(err) = &result {
                                warn!("mission request failed: {err}");
                            }

                            let _ = ret.send(result.map_err(anyhow::Error::new));
                        }
                        Err(_) => break,
                    }
                }

                res = telem_rx.changed(), if session.is_executing() => {
                    res?;

                    let fix = telem_rx.borrow_and_update().position;
                    if let Some((position, _)) = fix {
                        if should_capture(session.last_captured_altitude, position.altitude) {
                            let timeout = Duration::from_secs(config.rpc_timeout_secs);
                            match take_picture(&vehicle_tx, timeout).await {
                                Ok(()) => {
                                    info!("took picture at {:.1} m", position.altitude);
                                    session.last_captured_altitude = position.altitude;
                                }
                                // photo failures never abort the mission
                                Err(err) => warn!("unable to take picture: {err}"),
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

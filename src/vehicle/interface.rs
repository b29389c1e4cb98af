use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::net::ToSocketAddrs;
use tracing::*;

use crate::mission::waypoint::WaypointTask;

use super::rpc::VehicleRequest;

/// Inbound message from the vehicle bridge. One JSON document per datagram.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeMessage {
    Gps {
        latitude: f64,
        longitude: f64,
        altitude: f64,
    },
    Rtk {
        latitude: f64,
        longitude: f64,
        altitude: f64,
    },
    /// Attitude quaternion in (w, x, y, z) order
    Attitude {
        w: f64,
        x: f64,
        y: f64,
        z: f64,
    },
    Ack {
        seq: u32,
        result: bool,
        cmd_set: u8,
        cmd_id: u8,
        ack_data: u32,
    },
}

/// Outbound command to the vehicle bridge; `seq` correlates the eventual ack.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeCommand {
    Activate {
        seq: u32,
    },
    ControlAuthority {
        seq: u32,
        enable: bool,
    },
    MissionUpload {
        seq: u32,
        task: WaypointTask,
    },
    MissionAction {
        seq: u32,
        mission_type: u8,
        action: u8,
    },
    CameraAction {
        seq: u32,
        action: u8,
    },
}

impl BridgeCommand {
    pub fn from_request(request: VehicleRequest, seq: u32) -> Self {
        match request {
            VehicleRequest::Activate => BridgeCommand::Activate { seq },
            VehicleRequest::ControlAuthority { enable } => {
                BridgeCommand::ControlAuthority { seq, enable }
            }
            VehicleRequest::UploadMission(task) => BridgeCommand::MissionUpload { seq, task },
            VehicleRequest::MissionAction {
                mission_type,
                action,
            } => BridgeCommand::MissionAction {
                seq,
                mission_type: mission_type as u8,
                action: action as u8,
            },
            VehicleRequest::CameraAction { action } => BridgeCommand::CameraAction {
                seq,
                action: action as u8,
            },
        }
    }
}

pub struct VehicleInterface {
    sock: tokio::net::UdpSocket,
}

impl VehicleInterface {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let sock = tokio::net::UdpSocket::bind(addr)
            .await
            .context("failed to bind vehicle bridge socket")?;

        debug!("waiting for packet from vehicle bridge");

        let (_, remote_addr) =
            tokio::time::timeout(Duration::from_secs(60), sock.recv_from(&mut []))
                .await
                .context("timed out while waiting for packet from vehicle bridge")?
                .context("error retrieving packet from vehicle bridge")?;

        info!(
            "received packet from {:?}, locking to this address",
            remote_addr
        );

        sock.connect(remote_addr)
            .await
            .context("failed to lock to address")?;

        Ok(VehicleInterface { sock })
    }

    /// Sends a command to the bridge.
    pub async fn send(&self, command: &BridgeCommand) -> anyhow::Result<()> {
        trace!("sending command: {:?}", command);

        let buf = serde_json::to_vec(command).context("failed to encode bridge command")?;
        self.sock.send(&buf).await?;

        Ok(())
    }

    /// Waits for the next message from the bridge. Malformed datagrams are
    /// logged and skipped.
    pub async fn recv(&self) -> anyhow::Result<BridgeMessage> {
        let mut chunk = vec![0; 65536];

        loop {
            let n = self.sock.recv(&mut chunk[..]).await?;

            match serde_json::from_slice(&chunk[..n]) {
                Ok(message) => {
                    trace!("received message: {:?}", message);
                    return Ok(message);
                }
                Err(err) => {
                    warn!("could not parse bridge datagram ({n} bytes): {err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gps_message() {
        let raw = r#"{"type":"gps","latitude":-22.9,"longitude":-43.2,"altitude":12.5}"#;
        let msg: BridgeMessage = serde_json::from_str(raw).unwrap();

        match msg {
            BridgeMessage::Gps {
                latitude,
                longitude,
                altitude,
            } => {
                assert_eq!(latitude, -22.9);
                assert_eq!(longitude, -43.2);
                assert_eq!(altitude, 12.5);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn encodes_mission_action_codes() {
        let cmd = BridgeCommand::from_request(
            VehicleRequest::MissionAction {
                mission_type: crate::vehicle::rpc::MissionType::Waypoint,
                action: crate::vehicle::rpc::MissionAction::Start,
            },
            7,
        );

        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "mission_action");
        assert_eq!(json["seq"], 7);
        assert_eq!(json["mission_type"], 0);
        assert_eq!(json["action"], 0);
    }
}

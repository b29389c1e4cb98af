use std::collections::HashMap;
use std::net::SocketAddr;

use async_trait::async_trait;
use nalgebra::{Quaternion, UnitQuaternion};
use tokio::select;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::client::{ChannelCommandSink, ChannelCommandSource, Task};
use crate::types::{Euler, Point3D};

use super::event::VehicleEvent;
use super::interface::{BridgeCommand, BridgeMessage, VehicleInterface};
use super::rpc::{ServiceAck, VehicleRequest};
use super::VehicleConfig;

pub fn create_task(config: VehicleConfig) -> anyhow::Result<VehicleTask> {
    let (evt_tx, evt_rx) = flume::bounded(256);
    let (cmd_tx, cmd_rx) = flume::bounded(256);

    Ok(VehicleTask {
        address: config.address,
        evt_tx,
        evt_rx,
        cmd_tx,
        cmd_rx,
    })
}

pub struct VehicleTask {
    address: SocketAddr,
    evt_tx: flume::Sender<VehicleEvent>,
    evt_rx: flume::Receiver<VehicleEvent>,
    cmd_tx: ChannelCommandSink<VehicleRequest, ServiceAck>,
    cmd_rx: ChannelCommandSource<VehicleRequest, ServiceAck>,
}

impl VehicleTask {
    pub fn events(&self) -> flume::Receiver<VehicleEvent> {
        self.evt_rx.clone()
    }

    pub fn cmd(&self) -> ChannelCommandSink<VehicleRequest, ServiceAck> {
        self.cmd_tx.clone()
    }
}

fn event_from_message(message: BridgeMessage) -> Option<VehicleEvent> {
    match message {
        BridgeMessage::Gps {
            latitude,
            longitude,
            altitude,
        } => Some(VehicleEvent::Gps {
            position: Point3D::new(latitude, longitude, altitude),
        }),
        BridgeMessage::Rtk {
            latitude,
            longitude,
            altitude,
        } => Some(VehicleEvent::Rtk {
            position: Point3D::new(latitude, longitude, altitude),
        }),
        BridgeMessage::Attitude { w, x, y, z } => {
            let q = UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z));
            let (roll, pitch, yaw) = q.euler_angles();
            Some(VehicleEvent::Orientation {
                attitude: Euler::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees()),
            })
        }
        BridgeMessage::Ack { .. } => None,
    }
}

#[async_trait]
impl Task for VehicleTask {
    fn name(&self) -> &'static str {
        "vehicle/bridge"
    }

    async fn run(self: Box<Self>, cancel: CancellationToken) -> anyhow::Result<()> {
        let Self {
            address,
            evt_tx,
            cmd_rx,
            ..
        } = *self;

        let loop_fut = async move {
            let interface = VehicleInterface::connect(address).await?;

            // acks are matched back to callers by sequence number
            let mut pending = HashMap::<u32, oneshot::Sender<anyhow::Result<ServiceAck>>>::new();
            let mut sequence = 0u32;

            loop {
                select! {
                    cmd = cmd_rx.recv_async() => {
                        match cmd {
                            Ok((request, ret)) => {
                                sequence = sequence.wrapping_add(1);

                                match interface.send(&BridgeCommand::from_request(request, sequence)).await {
                                    Ok(()) => {
                                        pending.insert(sequence, ret);
                                    }
                                    Err(err) => {
                                        let _ = ret.send(Err(err));
                                    }
                                }
                            }
                            Err(_) => break,
                        }
                    }

                    message = interface.recv() => {
                        match message? {
                            BridgeMessage::Ack { seq, result, cmd_set, cmd_id, ack_data } => {
                                let ack = ServiceAck { result, cmd_set, cmd_id, ack_data };

                                match pending.remove(&seq) {
                                    Some(ret) => {
                                        let _ = ret.send(Ok(ack));
                                    }
                                    None => {
                                        warn!("ack for unknown sequence {seq}: {ack:?}");
                                    }
                                }
                            }
                            message => {
                                if let Some(event) = event_from_message(message) {
                                    let _ = evt_tx.send(event);
                                }
                            }
                        }
                    }
                }
            }

            Ok::<_, anyhow::Error>(())
        };

        select! {
          _ = cancel.cancelled() => {}
          res = loop_fut => { res? }
        }

        Ok(())
    }
}

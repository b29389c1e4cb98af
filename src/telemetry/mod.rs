use async_trait::async_trait;
use chrono::prelude::*;
use tokio::{select, sync::watch};
use tokio_util::sync::CancellationToken;

use crate::client::Task;
use crate::types::{Euler, Point3D};
use crate::vehicle::VehicleEvent;

/// Latest fix from each source; reference capture and the in-flight
/// altitude trigger both read this snapshot and tolerate staleness up to
/// one delivery interval.
#[derive(Default, Clone)]
pub struct Telemetry {
    pub position: Option<(Point3D, DateTime<Local>)>,
    pub rtk: Option<(Point3D, DateTime<Local>)>,
    pub attitude: Option<(Euler, DateTime<Local>)>,
}

pub struct TelemetryTask {
    vehicle_evt_rx: Option<flume::Receiver<VehicleEvent>>,
    telem_rx: watch::Receiver<Telemetry>,
    telem_tx: watch::Sender<Telemetry>,
}

pub fn create_task(
    vehicle_evt_rx: Option<flume::Receiver<VehicleEvent>>,
) -> anyhow::Result<TelemetryTask> {
    let (telem_tx, telem_rx) = watch::channel(Telemetry::default());

    Ok(TelemetryTask {
        vehicle_evt_rx,
        telem_rx,
        telem_tx,
    })
}

impl TelemetryTask {
    pub fn telemetry(&self) -> watch::Receiver<Telemetry> {
        self.telem_rx.clone()
    }
}

#[async_trait]
impl Task for TelemetryTask {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    async fn run(self: Box<Self>, cancel: CancellationToken) -> anyhow::Result<()> {
        let Self {
            vehicle_evt_rx,
            telem_tx,
            ..
        } = *self;

        let evt_rx = match vehicle_evt_rx {
            Some(evt_rx) => evt_rx,
            None => {
                // no vehicle configured, nothing will ever be published
                cancel.cancelled().await;
                return Ok(());
            }
        };

        let loop_fut = async move {
            while let Ok(event) = evt_rx.recv_async().await {
                let now = Local::now();

                let _ = telem_tx.send_modify(|t| match event {
                    VehicleEvent::Gps { position } => t.position = Some((position, now)),
                    VehicleEvent::Rtk { position } => t.rtk = Some((position, now)),
                    VehicleEvent::Orientation { attitude } => t.attitude = Some((attitude, now)),
                });
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

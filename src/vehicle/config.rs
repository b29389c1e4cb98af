use std::net::SocketAddr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleConfig {
    /// Local address the bridge socket binds to; the task locks onto the
    /// first peer that sends a datagram.
    pub address: SocketAddr,
}

use crate::planner::ReferenceFrame;

/// Progress of the active mission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionPhase {
    Idle,
    CapturingReference,
    Planning,
    PersistingMission,
    AcquiringAuthority,
    UploadingMission,
    /// Upload and start both acknowledged; the autopilot is flying the
    /// route and altitude changes trigger photo capture. Route completion
    /// is not observable from here.
    Executing,
    Failed,
}

/// State for one mission-start request. Owned by the mission task and
/// replaced on the next request, never held as ambient process state.
#[derive(Debug, Clone)]
pub struct MissionSession {
    pub phase: MissionPhase,
    pub reference: Option<ReferenceFrame>,
    pub last_captured_altitude: f64,
}

impl MissionSession {
    pub fn idle() -> Self {
        MissionSession {
            phase: MissionPhase::Idle,
            reference: None,
            last_captured_altitude: 0.0,
        }
    }

    pub fn is_executing(&self) -> bool {
        self.phase == MissionPhase::Executing
    }
}

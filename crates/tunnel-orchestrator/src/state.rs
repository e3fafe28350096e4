/// The tunnel lifecycle state machine:
/// `Stopped -> Starting -> Running -> Stopping -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl TunnelState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

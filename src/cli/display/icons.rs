//! Status icons for CLI output

pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    pub const PENDING: &'static str = "⏳";

    pub const UNKNOWN: &'static str = "?";

    /// Icon for a pod phase
    pub fn pod_phase_icon(phase: &str) -> &'static str {
        match phase {
            "Running" | "Succeeded" => Self::SUCCESS,
            "Pending" => Self::PENDING,
            "Failed" => Self::ERROR,
            _ => Self::UNKNOWN,
        }
    }

    /// Icon for ready/total containers
    pub fn get_ready_icon(ready: usize, total: usize) -> &'static str {
        if total == 0 {
            Self::UNKNOWN
        } else if ready == total {
            Self::SUCCESS
        } else if ready > 0 {
            Self::WARNING
        } else {
            Self::ERROR
        }
    }

    pub fn event_icon(event_type: &str) -> &'static str {
        match event_type {
            "Normal" => Self::SUCCESS,
            "Warning" => Self::WARNING,
            _ => Self::UNKNOWN,
        }
    }
}

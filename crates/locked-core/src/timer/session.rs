use serde::{Deserialize, Serialize};

use super::mode::{Mode, RunState};

/// Configured duration per mode, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub work_secs: u64,
    pub rest_secs: u64,
}

impl Durations {
    pub fn get(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Work => self.work_secs,
            Mode::Rest => self.rest_secs,
        }
    }

    pub fn set(&mut self, mode: Mode, secs: u64) {
        match mode {
            Mode::Work => self.work_secs = secs,
            Mode::Rest => self.rest_secs = secs,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work_secs: 60 * 60,
            rest_secs: 15 * 60,
        }
    }
}

/// In-memory state of the current countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub mode: Mode,
    pub run_state: RunState,
    /// Seconds remaining on the countdown.
    pub time_left_secs: u64,
    /// Duration the current run started with. Equal to the configured
    /// duration of `mode` whenever the session is idle.
    pub run_duration_secs: u64,
    /// Epoch ms the elapsed-time basis is measured from. Kept while paused.
    pub started_at_ms: Option<i64>,
    /// Whole minutes of this segment already credited to history.
    pub last_logged_minute: u64,
}

impl Session {
    pub fn idle(mode: Mode, duration_secs: u64) -> Self {
        Self {
            mode,
            run_state: RunState::Idle,
            time_left_secs: duration_secs,
            run_duration_secs: duration_secs,
            started_at_ms: None,
            last_logged_minute: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Seconds counted down so far in this run.
    pub fn elapsed_countdown_secs(&self) -> u64 {
        self.run_duration_secs.saturating_sub(self.time_left_secs)
    }

    /// 0.0 .. 100.0 progress through the run.
    pub fn progress_pct(&self) -> f64 {
        if self.run_duration_secs == 0 {
            return 0.0;
        }
        self.elapsed_countdown_secs() as f64 / self.run_duration_secs as f64 * 100.0
    }
}

//! Tick subscriptions.
//!
//! Each running segment arms a fresh subscription. Countdown and flush
//! deliveries carry the id they were scheduled under; once the segment ends
//! the id is dead and late deliveries fall on the floor.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// One elapsed second of countdown.
    Countdown,
    /// Periodic progress flush.
    Flush,
}

#[derive(Debug, Default)]
pub(crate) struct Subscriptions {
    next: u64,
    active: Option<SubscriptionId>,
}

impl Subscriptions {
    pub(crate) fn arm(&mut self) -> SubscriptionId {
        self.next += 1;
        let id = SubscriptionId(self.next);
        self.active = Some(id);
        id
    }

    pub(crate) fn cancel(&mut self) {
        self.active = None;
    }

    pub(crate) fn active(&self) -> Option<SubscriptionId> {
        self.active
    }

    pub(crate) fn is_active(&self, id: SubscriptionId) -> bool {
        self.active == Some(id)
    }
}

use std::fmt;

use crate::ret::{RclError, Result};

pub const DEFAULT_HISTORY_DEPTH: usize = 10;
pub const SENSOR_DATA_HISTORY_DEPTH: usize = 5;

#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub enum QosReliability {
    #[default]
    Reliable,
    BestEffort,
}

#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub enum QosDurability {
    TransientLocal,
    #[default]
    Volatile,
}

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum QosHistory {
    KeepLast(usize),
    KeepAll,
}

impl Default for QosHistory {
    fn default() -> Self {
        Self::KeepLast(DEFAULT_HISTORY_DEPTH)
    }
}

#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub enum QosLiveliness {
    #[default]
    Automatic,
    ManualByNode,
    ManualByTopic,
}

/// Seconds plus nanoseconds; the default is "infinite".
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct QosDuration {
    pub sec: u64,
    pub nsec: u64,
}

impl QosDuration {
    pub const INFINITE: QosDuration = QosDuration {
        sec: 9223372036,
        nsec: 854775807,
    };
}

impl Default for QosDuration {
    fn default() -> Self {
        Self::INFINITE
    }
}

impl fmt::Display for QosDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INFINITE {
            write!(f, "infinite")
        } else {
            write!(f, "{}s{}ns", self.sec, self.nsec)
        }
    }
}

#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub struct QosProfile {
    pub reliability: QosReliability,
    pub durability: QosDurability,
    pub history: QosHistory,
    pub deadline: QosDuration,
    pub lifespan: QosDuration,
    pub liveliness: QosLiveliness,
    pub liveliness_lease_duration: QosDuration,
}

impl QosProfile {
    /// Default profile with reliability relaxed to best effort.
    pub fn best_effort() -> Self {
        Self {
            reliability: QosReliability::BestEffort,
            ..Default::default()
        }
    }

    /// Best effort with a shallow queue, for high-rate sensor streams.
    pub fn sensor_data() -> Self {
        Self {
            reliability: QosReliability::BestEffort,
            history: QosHistory::KeepLast(SENSOR_DATA_HISTORY_DEPTH),
            ..Default::default()
        }
    }

    pub fn with_reliability(mut self, reliability: QosReliability) -> Self {
        self.reliability = reliability;
        self
    }

    pub fn with_history(mut self, history: QosHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_durability(mut self, durability: QosDurability) -> Self {
        self.durability = durability;
        self
    }

    /// Reject settings the middleware adapter cannot honor.
    pub fn check_supported(&self) -> Result<()> {
        if self.durability == QosDurability::TransientLocal {
            return Err(RclError::unsupported("transient local durability"));
        }
        if self.history == QosHistory::KeepLast(0) {
            return Err(RclError::invalid_argument("keep last history needs a depth"));
        }
        Ok(())
    }

    /// Key-expression friendly encoding, compatible with rmw_zenoh:
    /// `<reliability>:<durability>:<history>,<depth>:<deadline>:<lifespan>:<liveliness>`.
    /// Fields equal to the default profile are left empty.
    pub fn encode(&self) -> String {
        let default = Self::default();
        let reliability = match self.reliability {
            r if r == default.reliability => "",
            QosReliability::Reliable => "1",
            QosReliability::BestEffort => "2",
        };
        let durability = match self.durability {
            d if d == default.durability => "",
            QosDurability::TransientLocal => "1",
            QosDurability::Volatile => "2",
        };
        let history = match self.history {
            h if h == default.history => format!(",{DEFAULT_HISTORY_DEPTH}"),
            QosHistory::KeepLast(depth) => format!("1,{depth}"),
            QosHistory::KeepAll => "2,".to_string(),
        };
        let duration = |d: QosDuration| {
            if d == QosDuration::INFINITE {
                ",".to_string()
            } else {
                format!("{},{}", d.sec, d.nsec)
            }
        };
        let liveliness = if self.liveliness == default.liveliness
            && self.liveliness_lease_duration == default.liveliness_lease_duration
        {
            ",,".to_string()
        } else {
            let kind = match self.liveliness {
                QosLiveliness::Automatic => 1,
                QosLiveliness::ManualByNode => 2,
                QosLiveliness::ManualByTopic => 3,
            };
            format!(
                "{kind},{},{}",
                self.liveliness_lease_duration.sec, self.liveliness_lease_duration.nsec
            )
        };
        format!(
            "{reliability}:{durability}:{history}:{}:{}:{liveliness}",
            duration(self.deadline),
            duration(self.lifespan)
        )
    }
}

impl fmt::Display for QosProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QoS({:?}, {:?}, {:?}, deadline={}, lifespan={})",
            self.reliability, self.durability, self.history, self.deadline, self.lifespan
        )
    }
}

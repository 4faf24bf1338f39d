use crate::rcl::qos::{
    QosDuration, QosDurability, QosHistory, QosLiveliness, QosProfile, QosReliability,
};
use crate::ret::{RclError, Result};

/// QoS profile as seen by C callers.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CQosProfile {
    /// 0 = Reliable, 1 = BestEffort
    pub reliability: i32,
    /// 0 = Volatile, 1 = TransientLocal
    pub durability: i32,
    /// 0 = KeepLast, 1 = KeepAll
    pub history: i32,
    /// Ignored for KeepAll. Must not be negative.
    pub history_depth: i32,
    pub deadline_sec: u64,
    pub deadline_nsec: u64,
    pub lifespan_sec: u64,
    pub lifespan_nsec: u64,
    /// 0 = Automatic, 1 = ManualByNode, 2 = ManualByTopic
    pub liveliness: i32,
    pub liveliness_lease_sec: u64,
    pub liveliness_lease_nsec: u64,
}

impl TryFrom<&CQosProfile> for QosProfile {
    type Error = RclError;

    fn try_from(c: &CQosProfile) -> Result<Self> {
        let reliability = match c.reliability {
            0 => QosReliability::Reliable,
            1 => QosReliability::BestEffort,
            other => return Err(out_of_range("reliability", other)),
        };
        let durability = match c.durability {
            0 => QosDurability::Volatile,
            1 => QosDurability::TransientLocal,
            other => return Err(out_of_range("durability", other)),
        };
        let history = match c.history {
            0 => QosHistory::KeepLast(usize::try_from(c.history_depth).map_err(|_| {
                RclError::invalid_argument(format!("history depth {} is negative", c.history_depth))
            })?),
            1 => QosHistory::KeepAll,
            other => return Err(out_of_range("history", other)),
        };
        let liveliness = match c.liveliness {
            0 => QosLiveliness::Automatic,
            1 => QosLiveliness::ManualByNode,
            2 => QosLiveliness::ManualByTopic,
            other => return Err(out_of_range("liveliness", other)),
        };
        Ok(QosProfile {
            reliability,
            durability,
            history,
            deadline: QosDuration {
                sec: c.deadline_sec,
                nsec: c.deadline_nsec,
            },
            lifespan: QosDuration {
                sec: c.lifespan_sec,
                nsec: c.lifespan_nsec,
            },
            liveliness,
            liveliness_lease_duration: QosDuration {
                sec: c.liveliness_lease_sec,
                nsec: c.liveliness_lease_nsec,
            },
        })
    }
}

fn out_of_range(field: &str, value: i32) -> RclError {
    RclError::invalid_argument(format!("unknown {field} policy {value}"))
}

impl From<&QosProfile> for CQosProfile {
    fn from(q: &QosProfile) -> Self {
        let (history, history_depth) = match q.history {
            QosHistory::KeepLast(depth) => (0, i32::try_from(depth).unwrap_or(i32::MAX)),
            QosHistory::KeepAll => (1, 0),
        };
        CQosProfile {
            reliability: match q.reliability {
                QosReliability::Reliable => 0,
                QosReliability::BestEffort => 1,
            },
            durability: match q.durability {
                QosDurability::Volatile => 0,
                QosDurability::TransientLocal => 1,
            },
            history,
            history_depth,
            deadline_sec: q.deadline.sec,
            deadline_nsec: q.deadline.nsec,
            lifespan_sec: q.lifespan.sec,
            lifespan_nsec: q.lifespan.nsec,
            liveliness: match q.liveliness {
                QosLiveliness::Automatic => 0,
                QosLiveliness::ManualByNode => 1,
                QosLiveliness::ManualByTopic => 2,
            },
            liveliness_lease_sec: q.liveliness_lease_duration.sec,
            liveliness_lease_nsec: q.liveliness_lease_duration.nsec,
        }
    }
}

/// Which facade constructor an entry point forwards to.
pub(crate) enum Profile {
    Default,
    BestEffort,
    Custom(QosProfile),
}

#[unsafe(no_mangle)]
pub extern "C" fn rclc_qos_profile_default() -> CQosProfile {
    (&QosProfile::default()).into()
}

#[unsafe(no_mangle)]
pub extern "C" fn rclc_qos_profile_sensor_data() -> CQosProfile {
    (&QosProfile::sensor_data()).into()
}

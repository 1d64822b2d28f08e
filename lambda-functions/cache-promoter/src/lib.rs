//! Detects regional DNS failover for a watched Route 53 name and promotes
//! the local region's ElastiCache replica to primary when the local region
//! becomes active while the global data store's primary is elsewhere.

pub mod aws;
pub mod config;
pub mod dns;
pub mod error;
pub mod records;
pub mod service;
pub mod topology;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use config::Config;
pub use dns::{DnsResolver, SystemDnsResolver};
pub use error::{Error, Result};
pub use records::{
    extract_region, AliasTarget, FailoverRecord, FailoverRecordSet, ZoneRecord, ZoneRecordSource,
};
pub use service::{Outcome, PromotionService};
pub use topology::{GlobalGroup, ReplicationControlPlane, ReplicationMember, TopologyCache};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub status: String,
    pub message: String,
    pub region: Option<String>,
    pub timestamp: String,
}

impl Response {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let (status, message, region) = match outcome {
            Outcome::NoMatchingRecord => (
                "no-op",
                "resolved addresses match no known regional record".to_string(),
                None,
            ),
            Outcome::NotActiveRegion { active_region } => (
                "no-op",
                format!("region {active_region} is active for the watched dns name"),
                Some(active_region.clone()),
            ),
            Outcome::AlreadyPrimary => (
                "no-op",
                "current primary already belongs to this region".to_string(),
                None,
            ),
            Outcome::GroupNotFound => ("no-op", "global data store not found".to_string(), None),
            Outcome::GroupNotAvailable { status } => (
                "no-op",
                format!("global data store is {status}; promotion skipped"),
                None,
            ),
            Outcome::Promoted {
                region,
                replication_group_id,
            } => (
                "promoted",
                format!("member {replication_group_id} promoted to primary in region {region}"),
                Some(region.clone()),
            ),
        };

        Self {
            status: status.to_string(),
            message,
            region,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

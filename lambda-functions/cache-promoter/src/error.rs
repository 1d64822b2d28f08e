//! Error types for the cache promoter.

use thiserror::Error;

/// Result type alias for promoter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the cache promoter
///
/// "Not found" outcomes are deliberately absent here: an unresolvable host or
/// a missing replication group is reported by the collaborator traits as
/// `Ok(None)` and handled at the call site, not raised as an error.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid process configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// DNS resolution failed for a reason other than "name not found"
    #[error("dns resolution error for {host}: {message}")]
    Resolve { host: String, message: String },

    /// Hosted zone record listing failed
    #[error("record listing error for zone {zone_id}: {message}")]
    ZoneList { zone_id: String, message: String },

    /// Replication group control-plane call failed
    #[error("control plane error: {0}")]
    ControlPlane(String),

    /// Replication group membership is unusable (group absent, or a
    /// primary/secondary role is missing)
    #[error("replication topology error: {0}")]
    Topology(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a DNS resolution error
    pub fn resolve(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolve {
            host: host.into(),
            message: message.into(),
        }
    }

    /// Create a record listing error
    pub fn zone_list(zone_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ZoneList {
            zone_id: zone_id.into(),
            message: message.into(),
        }
    }

    /// Create a control-plane error
    pub fn control_plane(msg: impl Into<String>) -> Self {
        Self::ControlPlane(msg.into())
    }

    /// Create a topology error
    pub fn topology(msg: impl Into<String>) -> Self {
        Self::Topology(msg.into())
    }
}

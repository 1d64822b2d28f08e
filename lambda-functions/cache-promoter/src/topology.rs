//! Last-known replication group membership.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::error::{Error, Result};

pub const ROLE_PRIMARY: &str = "PRIMARY";
pub const ROLE_SECONDARY: &str = "SECONDARY";
pub const STATUS_AVAILABLE: &str = "Available";

/// Identity of one replica participating in the global replication group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationMember {
    pub replication_group_id: String,
    pub region: String,
    pub role: String,
}

/// Replication group state as reported by the control plane. `members` is
/// empty unless member detail was requested.
#[derive(Debug, Clone)]
pub struct GlobalGroup {
    pub status: String,
    pub members: Vec<ReplicationMember>,
}

/// Control-plane operations on the global replication group.
///
/// `describe_group` returns `Ok(None)` when the group cannot be found;
/// transport failures are errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReplicationControlPlane: Send + Sync {
    async fn describe_group(&self, group_id: &str, with_members: bool)
        -> Result<Option<GlobalGroup>>;

    async fn promote_member(
        &self,
        group_id: &str,
        region: &str,
        replication_group_id: &str,
    ) -> Result<()>;
}

/// Last-known primary/secondary identity, spanning invocations within one
/// warm process. Absence is a first-class state: "unknown, must reload".
#[derive(Debug, Default)]
pub struct TopologyCache {
    current_primary: Option<ReplicationMember>,
    current_secondary: Option<ReplicationMember>,
}

impl TopologyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.current_primary.is_some() && self.current_secondary.is_some()
    }

    /// Both members, once loaded.
    pub fn members(&self) -> Option<(&ReplicationMember, &ReplicationMember)> {
        match (&self.current_primary, &self.current_secondary) {
            (Some(primary), Some(secondary)) => Some((primary, secondary)),
            _ => None,
        }
    }

    /// Clears both members, forcing a fresh load on next use.
    pub fn invalidate(&mut self) {
        self.current_primary = None;
        self.current_secondary = None;
    }

    /// Loads the member list unless both roles are already cached.
    ///
    /// A missing group, or a member list without both a primary and a
    /// secondary, is unrecoverable for this invocation.
    pub async fn ensure_loaded(
        &mut self,
        control: &dyn ReplicationControlPlane,
        group_id: &str,
    ) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }

        let group = control
            .describe_group(group_id, true)
            .await?
            .ok_or_else(|| {
                Error::topology(format!("could not find global data store with id {group_id}"))
            })?;

        self.invalidate();
        for member in group.members {
            debug!(
                "found replication group member {} {} {}",
                member.replication_group_id, member.region, member.role
            );
            if member.role.eq_ignore_ascii_case(ROLE_PRIMARY) {
                self.current_primary = Some(member);
            } else if member.role.eq_ignore_ascii_case(ROLE_SECONDARY) {
                self.current_secondary = Some(member);
            }
        }

        if !self.is_loaded() {
            self.invalidate();
            return Err(Error::topology(format!(
                "could not find primary or secondary member for replication group {group_id}"
            )));
        }
        Ok(())
    }
}

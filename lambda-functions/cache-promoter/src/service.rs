//! Per-invocation promotion decision procedure.

use aws_config::BehaviorVersion;
use tracing::{debug, info};

use crate::aws::{ElastiCacheControlPlane, Route53ZoneSource};
use crate::config::Config;
use crate::dns::{DnsResolver, SystemDnsResolver};
use crate::error::{Error, Result};
use crate::records::{FailoverRecordSet, ZoneRecordSource};
use crate::topology::{ReplicationControlPlane, TopologyCache, STATUS_AVAILABLE};

/// What a single invocation decided to do. Everything but `Promoted` is a
/// no-op for the external system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Resolved addresses matched no known record, even after a refresh.
    NoMatchingRecord,
    /// The matched record belongs to another region.
    NotActiveRegion { active_region: String },
    /// The cached primary already lives in the local region.
    AlreadyPrimary,
    /// The replication group was gone when promotion status was checked.
    GroupNotFound,
    /// The group is mid-change; promoting now would race it.
    GroupNotAvailable { status: String },
    /// The secondary was promoted to primary.
    Promoted {
        region: String,
        replication_group_id: String,
    },
}

/// Holds the watched-name record set and the replication topology cache
/// across invocations of a warm process, plus the collaborators that talk to
/// the outside world.
pub struct PromotionService {
    config: Config,
    local_region: String,
    resolver: Box<dyn DnsResolver>,
    zone: Box<dyn ZoneRecordSource>,
    control: Box<dyn ReplicationControlPlane>,
    record_set: FailoverRecordSet,
    topology: TopologyCache,
}

impl PromotionService {
    /// Builds a service over explicit collaborators. The record set and the
    /// topology cache start empty and are populated on first use, so a cold
    /// process behaves the same as a restarted one.
    pub fn new(
        config: Config,
        local_region: String,
        resolver: Box<dyn DnsResolver>,
        zone: Box<dyn ZoneRecordSource>,
        control: Box<dyn ReplicationControlPlane>,
    ) -> Self {
        Self {
            config,
            local_region,
            resolver,
            zone,
            control,
            record_set: FailoverRecordSet::default(),
            topology: TopologyCache::new(),
        }
    }

    /// Builds the production service: AWS clients from the default config
    /// chain, the system resolver, and the local region from `AWS_REGION`.
    pub async fn from_env(config: Config) -> Result<Self> {
        let local_region = std::env::var("AWS_REGION")
            .map_err(|_| Error::config("AWS_REGION is required"))?;

        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let resolver = SystemDnsResolver::from_system_conf()?;

        Ok(Self::new(
            config,
            local_region,
            Box::new(resolver),
            Box::new(Route53ZoneSource::new(&aws_config)),
            Box::new(ElastiCacheControlPlane::new(&aws_config)),
        ))
    }

    /// Handles one invocation end to end.
    pub async fn handle_event(&mut self) -> Result<Outcome> {
        let addresses = match self.resolver.resolve(&self.config.dns_name).await? {
            Some(addresses) => addresses,
            None => {
                debug!("host {} not found", self.config.dns_name);
                Vec::new()
            }
        };

        let matched = match self.record_set.find_record(&addresses) {
            Some(record) => Some(record.clone()),
            None => {
                // refresh once when the addresses don't match any record
                self.record_set = FailoverRecordSet::build(
                    self.zone.as_ref(),
                    self.resolver.as_ref(),
                    &self.config.hosted_zone_id,
                    &self.config.dns_name,
                )
                .await?;
                self.record_set.find_record(&addresses).cloned()
            }
        };

        let Some(record) = matched else {
            debug!(
                "could not find any matching record for {}, address list {:?}",
                self.config.dns_name, addresses
            );
            return Ok(Outcome::NoMatchingRecord);
        };

        debug!(
            "{} resolves to the record for region {}",
            self.config.dns_name, record.region
        );

        if !record.region.eq_ignore_ascii_case(&self.local_region) {
            debug!(
                "nothing to do; record for region {} does not belong to local region {}",
                record.region, self.local_region
            );
            // Clear cached members whenever another region is active, so a
            // later hand-off back to this region never reuses membership
            // from before a prior failover.
            self.topology.invalidate();
            return Ok(Outcome::NotActiveRegion {
                active_region: record.region,
            });
        }

        self.promote_if_needed().await
    }

    async fn promote_if_needed(&mut self) -> Result<Outcome> {
        self.topology
            .ensure_loaded(self.control.as_ref(), &self.config.global_datastore_id)
            .await?;

        let (primary, secondary) = match self.topology.members() {
            Some((primary, secondary)) => (primary.clone(), secondary.clone()),
            None => {
                return Err(Error::topology(
                    "replication group members missing after load",
                ))
            }
        };

        if primary.region.eq_ignore_ascii_case(&self.local_region) {
            debug!(
                "no action required, current primary {} matches local region {}",
                primary.replication_group_id, self.local_region
            );
            return Ok(Outcome::AlreadyPrimary);
        }

        info!(
            "promotion required; {} resolves to local region {}, but current primary {} is in {}",
            self.config.dns_name, self.local_region, primary.replication_group_id, primary.region
        );

        // make sure the group isn't still updating from a previous promotion
        let group = match self
            .control
            .describe_group(&self.config.global_datastore_id, false)
            .await?
        {
            Some(group) => group,
            None => {
                debug!(
                    "global data store {} not found while checking status for promotion",
                    self.config.global_datastore_id
                );
                return Ok(Outcome::GroupNotFound);
            }
        };

        if !group.status.eq_ignore_ascii_case(STATUS_AVAILABLE) {
            debug!(
                "global data store {} is {}; skipping promotion",
                self.config.global_datastore_id, group.status
            );
            return Ok(Outcome::GroupNotAvailable {
                status: group.status,
            });
        }

        // Member roles take 1-2 minutes to reflect a failover. Drop the
        // cached identities whether or not the request went through, so the
        // next invocation re-reads ground truth instead of trusting them.
        let result = self
            .control
            .promote_member(
                &self.config.global_datastore_id,
                &secondary.region,
                &secondary.replication_group_id,
            )
            .await;
        self.topology.invalidate();
        result?;

        info!(
            "member {} promoted to primary in region {}",
            secondary.replication_group_id, secondary.region
        );
        Ok(Outcome::Promoted {
            region: secondary.region,
            replication_group_id: secondary.replication_group_id,
        })
    }
}

//! AWS-backed implementations of the collaborator traits.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_elasticache::Client as ElastiCacheClient;
use aws_sdk_route53::Client as Route53Client;

use crate::error::{Error, Result};
use crate::records::{AliasTarget, ZoneRecord, ZoneRecordSource};
use crate::topology::{GlobalGroup, ReplicationControlPlane, ReplicationMember};

/// Route 53 hosted zone listing.
pub struct Route53ZoneSource {
    client: Route53Client,
}

impl Route53ZoneSource {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Route53Client::new(config),
        }
    }
}

#[async_trait]
impl ZoneRecordSource for Route53ZoneSource {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>> {
        let mut records = Vec::new();
        let mut start_record_name = None;
        let mut start_record_type = None;
        let mut start_record_identifier = None;

        loop {
            let output = self
                .client
                .list_resource_record_sets()
                .hosted_zone_id(zone_id)
                .set_start_record_name(start_record_name.take())
                .set_start_record_type(start_record_type.take())
                .set_start_record_identifier(start_record_identifier.take())
                .send()
                .await
                .map_err(|err| Error::zone_list(zone_id, err.to_string()))?;

            for item in output.resource_record_sets() {
                records.push(ZoneRecord {
                    name: item.name().to_string(),
                    alias_target: item.alias_target().map(|alias| AliasTarget {
                        dns_name: alias.dns_name().to_string(),
                        hosted_zone_id: alias.hosted_zone_id().to_string(),
                    }),
                });
            }

            if !output.is_truncated() {
                break;
            }
            start_record_name = output.next_record_name().map(str::to_string);
            start_record_type = output.next_record_type().cloned();
            start_record_identifier = output.next_record_identifier().map(str::to_string);
        }

        Ok(records)
    }
}

/// ElastiCache global replication group control plane.
pub struct ElastiCacheControlPlane {
    client: ElastiCacheClient,
}

impl ElastiCacheControlPlane {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: ElastiCacheClient::new(config),
        }
    }
}

#[async_trait]
impl ReplicationControlPlane for ElastiCacheControlPlane {
    async fn describe_group(
        &self,
        group_id: &str,
        with_members: bool,
    ) -> Result<Option<GlobalGroup>> {
        let output = match self
            .client
            .describe_global_replication_groups()
            .global_replication_group_id(group_id)
            .show_member_info(with_members)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_global_replication_group_not_found_fault() {
                    return Ok(None);
                }
                return Err(Error::control_plane(service_err.to_string()));
            }
        };

        let Some(group) = output.global_replication_groups().first() else {
            return Ok(None);
        };

        // members without a complete identity are unusable for promotion
        let members = group
            .members()
            .iter()
            .filter_map(|member| {
                Some(ReplicationMember {
                    replication_group_id: member.replication_group_id()?.to_string(),
                    region: member.replication_group_region()?.to_string(),
                    role: member.role()?.to_string(),
                })
            })
            .collect();

        Ok(Some(GlobalGroup {
            status: group.status().unwrap_or_default().to_string(),
            members,
        }))
    }

    async fn promote_member(
        &self,
        group_id: &str,
        region: &str,
        replication_group_id: &str,
    ) -> Result<()> {
        self.client
            .failover_global_replication_group()
            .global_replication_group_id(group_id)
            .primary_region(region)
            .primary_replication_group_id(replication_group_id)
            .send()
            .await
            .map_err(|err| Error::control_plane(err.into_service_error().to_string()))?;
        Ok(())
    }
}

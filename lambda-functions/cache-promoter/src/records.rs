//! Regional failover records under the watched DNS name.
//!
//! A hosted zone carries one alias record per region for the watched name.
//! The record set maps each region to the addresses its alias target
//! currently resolves to, so a plain address lookup can be matched back to
//! the region it belongs to.

use std::net::IpAddr;
use std::sync::OnceLock;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use regex::Regex;
use tracing::{debug, info};

use crate::dns::DnsResolver;
use crate::error::Result;

/// One record returned by a zone listing, reduced to the fields the record
/// set builder needs.
#[derive(Debug, Clone)]
pub struct ZoneRecord {
    pub name: String,
    pub alias_target: Option<AliasTarget>,
}

/// A record's indirection to another named resource.
#[derive(Debug, Clone)]
pub struct AliasTarget {
    pub dns_name: String,
    pub hosted_zone_id: String,
}

/// Paginated listing of every record in a hosted zone.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ZoneRecordSource: Send + Sync {
    async fn list_records(&self, zone_id: &str) -> Result<Vec<ZoneRecord>>;
}

/// One regional alias entry under the watched DNS name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailoverRecord {
    pub region: String,
    pub alias_target_name: String,
    pub alias_target_zone: String,
    /// Always sorted ascending, so address sets compare order-independently.
    pub sorted_addresses: Vec<IpAddr>,
}

/// All regional alias entries for the watched name. Rebuilt wholesale on
/// refresh; never updated incrementally.
#[derive(Debug, Clone, Default)]
pub struct FailoverRecordSet {
    pub records: Vec<FailoverRecord>,
}

fn region_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.([a-zA-Z0-9-]+)\.amazonaws\.com\.").expect("region pattern is valid")
    })
}

/// Extracts the region token from a regional alias hostname.
///
/// Contract: one capture group, the token immediately preceding
/// `.amazonaws.com.`. A hostname that does not match is not a regional
/// resource and yields `None`.
pub fn extract_region(alias_dns_name: &str) -> Option<&str> {
    region_pattern()
        .captures(alias_dns_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl FailoverRecordSet {
    /// Finds the record whose address set equals `addresses`, ignoring order.
    ///
    /// No match is not an error: it signals that the topology is unknown or
    /// stale, and the caller refreshes and retries once.
    pub fn find_record(&self, addresses: &[IpAddr]) -> Option<&FailoverRecord> {
        let mut sorted = addresses.to_vec();
        sorted.sort_unstable();
        self.records
            .iter()
            .find(|record| record.sorted_addresses == sorted)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuilds the record set from the hosted zone.
    ///
    /// Keeps only alias records whose dot-stripped name equals `dns_name`
    /// case-insensitively and whose alias hostname carries a region token.
    /// Alias targets that do not resolve yet are skipped until they do; an
    /// entry with zero addresses is never added.
    pub async fn build(
        zone: &dyn ZoneRecordSource,
        resolver: &dyn DnsResolver,
        zone_id: &str,
        dns_name: &str,
    ) -> Result<Self> {
        let mut records = Vec::new();

        for record in zone.list_records(zone_id).await? {
            let name = record.name.trim_end_matches('.');
            if !name.eq_ignore_ascii_case(dns_name) {
                continue;
            }
            let Some(alias) = record.alias_target else {
                continue;
            };
            let Some(region) = extract_region(&alias.dns_name) else {
                debug!(
                    "found record {} in zone {}, but it does not have a regional alias target",
                    record.name, zone_id
                );
                continue;
            };
            let region = region.to_string();
            debug!(
                "record {} in zone {} is in region {} aliased to {}",
                record.name, zone_id, region, alias.dns_name
            );

            let Some(mut addresses) = resolver.resolve(&alias.dns_name).await? else {
                // don't add the record until its target is resolvable
                debug!("alias target {} not found", alias.dns_name);
                continue;
            };
            if addresses.is_empty() {
                continue;
            }
            addresses.sort_unstable();

            info!(
                "added record for region {} aliased to {} with addresses {:?}",
                region, alias.dns_name, addresses
            );
            records.push(FailoverRecord {
                region,
                alias_target_name: alias.dns_name,
                alias_target_zone: alias.hosted_zone_id,
                sorted_addresses: addresses,
            });
        }

        Ok(Self { records })
    }
}

//! Address resolution against the system resolver.

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::error::{Error, Result};

/// Address lookup by hostname.
///
/// `Ok(None)` is the distinguished "name not found" outcome; callers decide
/// whether that means "skip this entry" or "empty address set". Any other
/// resolution failure is an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, host: &str) -> Result<Option<Vec<IpAddr>>>;
}

/// System-configured resolver backed by hickory.
pub struct SystemDnsResolver {
    resolver: TokioAsyncResolver,
}

impl SystemDnsResolver {
    pub fn from_system_conf() -> Result<Self> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(|err| {
            Error::config(format!("failed to read system resolver configuration: {err}"))
        })?;
        Ok(Self { resolver })
    }
}

#[async_trait]
impl DnsResolver for SystemDnsResolver {
    async fn resolve(&self, host: &str) -> Result<Option<Vec<IpAddr>>> {
        match self.resolver.lookup_ip(host).await {
            Ok(lookup) => Ok(Some(lookup.iter().collect())),
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => {
                    debug!("host {} not found", host);
                    Ok(None)
                }
                _ => Err(Error::resolve(host, err.to_string())),
            },
        }
    }
}

use clap::Parser;

/// Process configuration. All settings are required; a missing value aborts
/// the process before any event is handled.
///
/// Comparisons against the watched DNS name are case-insensitive everywhere,
/// so the name is stored as given (minus trailing dots) and never lowercased.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cache-promoter",
    about = "detects regional dns failover and promotes the secondary cache replica to primary"
)]
pub struct Config {
    /// Hosted zone id containing the watched record
    #[arg(long = "hz", env = "HOSTED_ZONE_ID")]
    pub hosted_zone_id: String,

    /// DNS name to watch for changes
    #[arg(long, short = 'd', env = "DNS_NAME")]
    pub dns_name: String,

    /// Id of the global data store whose members are promoted
    #[arg(long = "global-data-store-id", short = 'g', env = "GLOBAL_DATASTORE_ID")]
    pub global_datastore_id: String,
}

impl Config {
    /// Strips trailing dots from the DNS name so it compares against the
    /// dot-stripped names coming back from zone listings.
    pub fn normalized(mut self) -> Self {
        self.dns_name = self.dns_name.trim_end_matches('.').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_flags() {
        let config = Config::try_parse_from([
            "cache-promoter",
            "--hz",
            "Z0123456789",
            "--dns-name",
            "cache.example.com",
            "--global-data-store-id",
            "sgw-demo",
        ])
        .unwrap();

        assert_eq!(config.hosted_zone_id, "Z0123456789");
        assert_eq!(config.dns_name, "cache.example.com");
        assert_eq!(config.global_datastore_id, "sgw-demo");
    }

    #[test]
    fn test_parse_short_flags() {
        let config = Config::try_parse_from([
            "cache-promoter",
            "--hz",
            "Z0123456789",
            "-d",
            "cache.example.com",
            "-g",
            "sgw-demo",
        ])
        .unwrap();

        assert_eq!(config.dns_name, "cache.example.com");
        assert_eq!(config.global_datastore_id, "sgw-demo");
    }

    #[test]
    fn test_normalized_strips_trailing_dot() {
        let config = Config::try_parse_from([
            "cache-promoter",
            "--hz",
            "Z0123456789",
            "-d",
            "cache.example.com.",
            "-g",
            "sgw-demo",
        ])
        .unwrap()
        .normalized();

        assert_eq!(config.dns_name, "cache.example.com");
    }

    #[test]
    fn test_normalized_keeps_bare_name() {
        let config = Config {
            hosted_zone_id: "Z0123456789".to_string(),
            dns_name: "cache.example.com".to_string(),
            global_datastore_id: "sgw-demo".to_string(),
        }
        .normalized();

        assert_eq!(config.dns_name, "cache.example.com");
    }
}

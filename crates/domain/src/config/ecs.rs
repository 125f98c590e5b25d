use serde::{Deserialize, Serialize};

use crate::client_subnet::{SubnetPolicy, DEFAULT_IPV4_PREFIX, DEFAULT_IPV6_PREFIX};
use crate::ecs::{EcsInjector, OptionPolicy, DEFAULT_UDP_PAYLOAD_SIZE};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EcsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_ipv4_prefix")]
    pub ipv4_prefix: u8,

    #[serde(default = "default_ipv6_prefix")]
    pub ipv6_prefix: u8,

    /// Payload size advertised in OPT records the proxy creates.
    #[serde(default = "default_udp_payload_size")]
    pub udp_payload_size: u16,

    /// Request header holding the caller's address, as set by the edge.
    #[serde(default = "default_client_ip_header")]
    pub client_ip_header: String,

    #[serde(default)]
    pub reject_unknown_options: bool,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ipv4_prefix: default_ipv4_prefix(),
            ipv6_prefix: default_ipv6_prefix(),
            udp_payload_size: default_udp_payload_size(),
            client_ip_header: default_client_ip_header(),
            reject_unknown_options: false,
        }
    }
}

impl EcsConfig {
    pub fn subnet_policy(&self) -> SubnetPolicy {
        SubnetPolicy::new(self.ipv4_prefix, self.ipv6_prefix)
    }

    pub fn injector(&self) -> EcsInjector {
        let policy = if self.reject_unknown_options {
            OptionPolicy::RejectUnknown
        } else {
            OptionPolicy::PassThrough
        };
        EcsInjector::new(self.udp_payload_size, policy)
    }
}

fn default_true() -> bool {
    true
}

fn default_ipv4_prefix() -> u8 {
    DEFAULT_IPV4_PREFIX
}

fn default_ipv6_prefix() -> u8 {
    DEFAULT_IPV6_PREFIX
}

fn default_udp_payload_size() -> u16 {
    DEFAULT_UDP_PAYLOAD_SIZE
}

fn default_client_ip_header() -> String {
    "CF-Connecting-IP".to_string()
}

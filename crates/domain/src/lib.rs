//! DoH ECS proxy domain layer: DNS wire codec, EDNS client subnet handling
//! and configuration.
pub mod client_subnet;
pub mod config;
pub mod dns_message;
pub mod doh_request;
pub mod ecs;
pub mod edns;
pub mod encoding;
pub mod errors;

pub use client_subnet::{derive_subnet, AddressFamily, ClientSubnet, SubnetPolicy};
pub use config::{CliOverrides, Config, ConfigError};
pub use dns_message::{
    decode, encode, DnsHeader, DnsMessage, DomainName, Question, RecordType, ResourceRecord,
};
pub use doh_request::{DohMethod, DohRequest, JsonQuery};
pub use ecs::{apply_ecs, EcsInjector, OptionPolicy};
pub use edns::{EdnsOption, OptRecord};
pub use encoding::{decode_base64url, encode_base64url};
pub use errors::{CodecError, DomainError};

//! Inserts or replaces the client subnet option of a query.

use crate::client_subnet::ClientSubnet;
use crate::dns_message::DnsMessage;
use crate::edns::{option_code, parse_options, write_options, OptRecord};
use crate::errors::CodecError;

/// Conservative EDNS payload size advertised when the query had no OPT
/// record of its own (DNS Flag Day 2020).
pub const DEFAULT_UDP_PAYLOAD_SIZE: u16 = 1232;

/// What to do with EDNS options the proxy does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionPolicy {
    #[default]
    PassThrough,
    RejectUnknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcsInjector {
    pub udp_payload_size: u16,
    pub option_policy: OptionPolicy,
}

impl Default for EcsInjector {
    fn default() -> Self {
        Self {
            udp_payload_size: DEFAULT_UDP_PAYLOAD_SIZE,
            option_policy: OptionPolicy::PassThrough,
        }
    }
}

impl EcsInjector {
    pub fn new(udp_payload_size: u16, option_policy: OptionPolicy) -> Self {
        Self {
            udp_payload_size,
            option_policy,
        }
    }

    /// Returns a copy of `message` carrying `subnet` as its ECS option.
    ///
    /// An existing OPT record keeps its owner name, CLASS, TTL and every
    /// other option in place; only the first ECS option is rewritten and any
    /// further ECS options are dropped. Without an OPT record a fresh one is
    /// appended to the additional section. `None` returns the message
    /// unchanged.
    pub fn apply(
        &self,
        message: &DnsMessage,
        subnet: Option<&ClientSubnet>,
    ) -> Result<DnsMessage, CodecError> {
        let mut updated = message.clone();
        let Some(subnet) = subnet else {
            return Ok(updated);
        };
        // Scope is only meaningful in responses.
        let ecs = ClientSubnet::new(subnet.family(), subnet.source_prefix_len(), subnet.address())
            .to_option();

        match updated.opt_index() {
            Some(index) => {
                let record = &mut updated.additionals[index];
                let mut options = parse_options(&record.rdata)?;

                if self.option_policy == OptionPolicy::RejectUnknown {
                    if let Some(unknown) = options
                        .iter()
                        .find(|o| !option_code::is_registered(o.code))
                    {
                        return Err(CodecError::UnsupportedOption(unknown.code));
                    }
                }

                let mut replaced = false;
                options.retain_mut(|option| {
                    if option.code != option_code::CLIENT_SUBNET {
                        return true;
                    }
                    if replaced {
                        return false;
                    }
                    option.data = ecs.data.clone();
                    replaced = true;
                    true
                });
                if !replaced {
                    options.push(ecs);
                }

                record.rdata = write_options(&options)?;
            }
            None => {
                let mut opt = OptRecord::new(self.udp_payload_size);
                opt.options.push(ecs);
                updated.additionals.push(opt.to_record()?);
            }
        }

        Ok(updated)
    }
}

/// [`EcsInjector::apply`] with the default payload size and pass-through
/// option policy.
pub fn apply_ecs(
    message: &DnsMessage,
    subnet: Option<&ClientSubnet>,
) -> Result<DnsMessage, CodecError> {
    EcsInjector::default().apply(message, subnet)
}

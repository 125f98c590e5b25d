//! EDNS(0) OPT pseudo-record (RFC 6891 §6).

use crate::dns_message::reader::WireReader;
use crate::dns_message::{DomainName, RecordType, ResourceRecord};
use crate::errors::CodecError;

/// Registered EDNS0 option codes (IANA "DNS EDNS0 Option Codes").
pub mod option_code {
    pub const LLQ: u16 = 1;
    pub const UPDATE_LEASE: u16 = 2;
    pub const NSID: u16 = 3;
    pub const DAU: u16 = 5;
    pub const DHU: u16 = 6;
    pub const N3U: u16 = 7;
    pub const CLIENT_SUBNET: u16 = 8;
    pub const EXPIRE: u16 = 9;
    pub const COOKIE: u16 = 10;
    pub const TCP_KEEPALIVE: u16 = 11;
    pub const PADDING: u16 = 12;
    pub const CHAIN: u16 = 13;
    pub const KEY_TAG: u16 = 14;
    pub const EXTENDED_ERROR: u16 = 15;
    pub const CLIENT_TAG: u16 = 16;
    pub const SERVER_TAG: u16 = 17;
    pub const REPORT_CHANNEL: u16 = 18;
    pub const ZONEVERSION: u16 = 19;
    pub const UMBRELLA_IDENT: u16 = 20292;
    pub const DEVICE_ID: u16 = 26946;

    /// Code 4 is reserved; 65001-65534 are local/experimental.
    pub fn is_registered(code: u16) -> bool {
        matches!(
            code,
            LLQ..=NSID | DAU..=ZONEVERSION | UMBRELLA_IDENT | DEVICE_ID
        )
    }
}

const DO_BIT: u16 = 0x8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdnsOption {
    pub code: u16,
    pub data: Vec<u8>,
}

impl EdnsOption {
    pub fn new(code: u16, data: Vec<u8>) -> Self {
        Self { code, data }
    }
}

/// Decoded OPT record. The owner name is always the root and is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptRecord {
    /// Requester's UDP payload size, carried in the CLASS field.
    pub udp_payload_size: u16,
    pub extended_rcode: u8,
    pub version: u8,
    pub dnssec_ok: bool,
    /// The 15 Z bits following DO, preserved as received.
    pub z: u16,
    pub options: Vec<EdnsOption>,
}

impl OptRecord {
    /// Version 0, no flags, no options.
    pub fn new(udp_payload_size: u16) -> Self {
        Self {
            udp_payload_size,
            extended_rcode: 0,
            version: 0,
            dnssec_ok: false,
            z: 0,
            options: Vec::new(),
        }
    }

    pub fn from_record(record: &ResourceRecord) -> Result<Self, CodecError> {
        if !record.is_opt() {
            return Err(CodecError::malformed(format!(
                "expected OPT record, found {}",
                RecordType::name_of(record.rtype)
            )));
        }

        let flags = record.ttl as u16;
        Ok(Self {
            udp_payload_size: record.class,
            extended_rcode: (record.ttl >> 24) as u8,
            version: (record.ttl >> 16) as u8,
            dnssec_ok: flags & DO_BIT != 0,
            z: flags & !DO_BIT,
            options: parse_options(&record.rdata)?,
        })
    }

    pub fn to_record(&self) -> Result<ResourceRecord, CodecError> {
        Ok(ResourceRecord::new(
            DomainName::root(),
            RecordType::OPT.to_u16(),
            self.udp_payload_size,
            self.ttl(),
            write_options(&self.options)?,
        ))
    }

    /// The TTL field as laid out on the wire.
    pub fn ttl(&self) -> u32 {
        let flags = (if self.dnssec_ok { DO_BIT } else { 0 }) | (self.z & !DO_BIT);
        (u32::from(self.extended_rcode) << 24) | (u32::from(self.version) << 16) | u32::from(flags)
    }

    pub fn option(&self, code: u16) -> Option<&EdnsOption> {
        self.options.iter().find(|o| o.code == code)
    }
}

/// Splits OPT RDATA into its `{code, length, data}` entries.
pub fn parse_options(rdata: &[u8]) -> Result<Vec<EdnsOption>, CodecError> {
    let mut reader = WireReader::new(rdata);
    let mut options = Vec::new();

    while reader.remaining() > 0 {
        if reader.remaining() < 4 {
            return Err(CodecError::malformed(format!(
                "{} trailing bytes in OPT RDATA",
                reader.remaining()
            )));
        }
        let code = reader.read_u16()?;
        let len = reader.read_u16()? as usize;
        let data = reader.read_bytes(len).map_err(|_| {
            CodecError::malformed(format!(
                "EDNS option {} declares {} bytes but only {} remain",
                code,
                len,
                reader.remaining()
            ))
        })?;
        options.push(EdnsOption::new(code, data.to_vec()));
    }

    Ok(options)
}

pub fn write_options(options: &[EdnsOption]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(options.iter().map(|o| o.data.len() + 4).sum());
    for option in options {
        let len = u16::try_from(option.data.len()).map_err(|_| {
            CodecError::overflow(format!(
                "EDNS option {} carries {} bytes, over 65535",
                option.code,
                option.data.len()
            ))
        })?;
        out.extend_from_slice(&option.code.to_be_bytes());
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&option.data);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_packing() {
        let record = ResourceRecord::new(DomainName::root(), 41, 4096, 0x0100_8000, vec![]);
        let opt = OptRecord::from_record(&record).unwrap();

        assert_eq!(opt.udp_payload_size, 4096);
        assert_eq!(opt.extended_rcode, 1);
        assert_eq!(opt.version, 0);
        assert!(opt.dnssec_ok);
        assert_eq!(opt.z, 0);
        assert_eq!(opt.ttl(), 0x0100_8000);
    }

    #[test]
    fn test_z_bits_preserved() {
        let record = ResourceRecord::new(DomainName::root(), 41, 1232, 0x0000_0001, vec![]);
        let opt = OptRecord::from_record(&record).unwrap();

        assert!(!opt.dnssec_ok);
        assert_eq!(opt.ttl(), 1);
    }

    #[test]
    fn test_parse_options_in_order() {
        let rdata = [0, 10, 0, 2, 0xaa, 0xbb, 0, 12, 0, 0];
        let options = parse_options(&rdata).unwrap();

        assert_eq!(
            options,
            vec![
                EdnsOption::new(10, vec![0xaa, 0xbb]),
                EdnsOption::new(12, vec![]),
            ]
        );
        assert_eq!(write_options(&options).unwrap(), rdata);
    }

    #[test]
    fn test_truncated_option_rejected() {
        assert!(parse_options(&[0, 8, 0, 7, 0, 1]).is_err());
        assert!(parse_options(&[0, 8, 0]).is_err());
    }

    #[test]
    fn test_non_opt_record_rejected() {
        let record = ResourceRecord::new(DomainName::root(), 1, 1, 0, vec![]);
        assert!(OptRecord::from_record(&record).is_err());
    }

    #[test]
    fn test_registered_codes() {
        assert!(option_code::is_registered(option_code::CLIENT_SUBNET));
        assert!(option_code::is_registered(option_code::PADDING));
        assert!(option_code::is_registered(option_code::LLQ));
        assert!(option_code::is_registered(option_code::UPDATE_LEASE));
        assert!(option_code::is_registered(option_code::ZONEVERSION));
        assert!(option_code::is_registered(option_code::DEVICE_ID));
        assert!(!option_code::is_registered(0));
        assert!(!option_code::is_registered(4));
        assert!(!option_code::is_registered(20));
        assert!(!option_code::is_registered(65001));
    }
}

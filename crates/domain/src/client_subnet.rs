//! EDNS Client Subnet option (RFC 7871) and derivation of the subnet from a
//! caller's address.

use crate::edns::{option_code, EdnsOption};
use crate::errors::CodecError;
use ipnetwork::IpNetwork;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

pub const DEFAULT_IPV4_PREFIX: u8 = 24;
pub const DEFAULT_IPV6_PREFIX: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    pub fn to_u16(&self) -> u16 {
        match self {
            AddressFamily::Ipv4 => 1,
            AddressFamily::Ipv6 => 2,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1 => Some(AddressFamily::Ipv4),
            2 => Some(AddressFamily::Ipv6),
            _ => None,
        }
    }

    pub fn max_prefix_len(&self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }

    fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }
}

/// A client subnet in canonical form.
///
/// The address holds exactly `ceil(source_prefix_len / 8)` bytes and every
/// bit past the prefix is zero. Constructors enforce this, so a value can
/// be written into an OPT record as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientSubnet {
    family: AddressFamily,
    source_prefix_len: u8,
    scope_prefix_len: u8,
    address: Vec<u8>,
}

impl ClientSubnet {
    /// Canonicalizes the given address bytes. The prefix is clamped to the
    /// family maximum; missing bytes are treated as zero, extra bytes and
    /// host bits are dropped. Scope is 0, as required for queries.
    pub fn new(family: AddressFamily, source_prefix_len: u8, address: &[u8]) -> Self {
        let source_prefix_len = source_prefix_len.min(family.max_prefix_len());
        let mut canonical = vec![0u8; prefix_bytes(source_prefix_len)];
        let copied = canonical.len().min(address.len());
        canonical[..copied].copy_from_slice(&address[..copied]);
        apply_bit_mask(&mut canonical, source_prefix_len as usize);

        Self {
            family,
            source_prefix_len,
            scope_prefix_len: 0,
            address: canonical,
        }
    }

    pub fn from_ip(addr: IpAddr, source_prefix_len: u8) -> Self {
        match addr {
            IpAddr::V4(v4) => Self::new(AddressFamily::Ipv4, source_prefix_len, &v4.octets()),
            IpAddr::V6(v6) => Self::new(AddressFamily::Ipv6, source_prefix_len, &v6.octets()),
        }
    }

    /// Reads the option data of an ECS option.
    pub fn from_option(option: &EdnsOption) -> Result<Self, CodecError> {
        if option.code != option_code::CLIENT_SUBNET {
            return Err(CodecError::malformed(format!(
                "option {} is not a client subnet option",
                option.code
            )));
        }
        let data = &option.data;
        if data.len() < 4 {
            return Err(CodecError::malformed("client subnet option shorter than 4 bytes"));
        }

        let family_code = u16::from_be_bytes([data[0], data[1]]);
        let family = AddressFamily::from_u16(family_code).ok_or_else(|| {
            CodecError::malformed(format!("unknown client subnet family {}", family_code))
        })?;
        let source_prefix_len = data[2];
        let scope_prefix_len = data[3];
        let address = &data[4..];

        if source_prefix_len > family.max_prefix_len() {
            return Err(CodecError::malformed(format!(
                "source prefix {} too long for family {}",
                source_prefix_len, family_code
            )));
        }
        if address.len() != prefix_bytes(source_prefix_len) {
            return Err(CodecError::malformed(format!(
                "client subnet address is {} bytes, prefix /{} needs {}",
                address.len(),
                source_prefix_len,
                prefix_bytes(source_prefix_len)
            )));
        }

        let mut subnet = Self::new(family, source_prefix_len, address);
        subnet.scope_prefix_len = scope_prefix_len;
        Ok(subnet)
    }

    pub fn to_option(&self) -> EdnsOption {
        let mut data = Vec::with_capacity(4 + self.address.len());
        data.extend_from_slice(&self.family.to_u16().to_be_bytes());
        data.push(self.source_prefix_len);
        data.push(self.scope_prefix_len);
        data.extend_from_slice(&self.address);
        EdnsOption::new(option_code::CLIENT_SUBNET, data)
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn source_prefix_len(&self) -> u8 {
        self.source_prefix_len
    }

    pub fn scope_prefix_len(&self) -> u8 {
        self.scope_prefix_len
    }

    /// The truncated address as carried on the wire.
    pub fn address(&self) -> &[u8] {
        &self.address
    }

    /// The network address, zero-filled to full length.
    pub fn ip_addr(&self) -> IpAddr {
        match self.family {
            AddressFamily::Ipv4 => {
                let mut octets = [0u8; 4];
                octets[..self.address.len()].copy_from_slice(&self.address);
                IpAddr::V4(Ipv4Addr::from(octets))
            }
            AddressFamily::Ipv6 => {
                let mut octets = [0u8; 16];
                octets[..self.address.len()].copy_from_slice(&self.address);
                IpAddr::V6(Ipv6Addr::from(octets))
            }
        }
    }
}

impl fmt::Display for ClientSubnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip_addr(), self.source_prefix_len)
    }
}

/// Prefix lengths used when turning a caller address into a subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetPolicy {
    pub ipv4_prefix: u8,
    pub ipv6_prefix: u8,
}

impl Default for SubnetPolicy {
    fn default() -> Self {
        Self {
            ipv4_prefix: DEFAULT_IPV4_PREFIX,
            ipv6_prefix: DEFAULT_IPV6_PREFIX,
        }
    }
}

impl SubnetPolicy {
    pub fn new(ipv4_prefix: u8, ipv6_prefix: u8) -> Self {
        Self {
            ipv4_prefix,
            ipv6_prefix,
        }
    }

    /// Returns `None` for empty or unparseable input. Absence means "send
    /// no ECS"; it is never an error.
    pub fn derive(&self, ip: &str) -> Option<ClientSubnet> {
        let addr: IpAddr = ip.trim().parse().ok()?;
        self.derive_ip(addr)
    }

    pub fn derive_ip(&self, addr: IpAddr) -> Option<ClientSubnet> {
        let prefix = match AddressFamily::of(&addr) {
            AddressFamily::Ipv4 => self.ipv4_prefix,
            AddressFamily::Ipv6 => self.ipv6_prefix,
        };
        let network = IpNetwork::new(addr, prefix).ok()?;
        Some(ClientSubnet::from_ip(network.network(), network.prefix()))
    }
}

/// Derives a /24 (IPv4) or /64 (IPv6) subnet from a textual address.
pub fn derive_subnet(ip: &str) -> Option<ClientSubnet> {
    SubnetPolicy::default().derive(ip)
}

fn prefix_bytes(bits: u8) -> usize {
    (usize::from(bits) + 7) / 8
}

/// Keeps the left-most `mask` bits and zeros the rest.
fn apply_bit_mask(buf: &mut [u8], mask: usize) {
    let full = mask / 8;
    if full >= buf.len() {
        return;
    }
    let bits = mask % 8;
    let mut p = full;
    if bits != 0 {
        buf[p] &= 0xffu8 << (8 - bits);
        p += 1;
    }
    for byte in &mut buf[p..] {
        *byte = 0;
    }
}

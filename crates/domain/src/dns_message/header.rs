use super::reader::WireReader;
use crate::errors::CodecError;

pub const HEADER_LEN: usize = 12;

const FLAG_QR: u16 = 0x8000;
const FLAG_RD: u16 = 0x0100;

/// Fixed 12-byte message header.
///
/// `flags` is kept as the raw bit pattern so that QR, Opcode, AA, TC, RD,
/// RA, Z and RCODE survive a decode/encode cycle untouched. The counts are
/// whatever the sender declared; the encoder always rewrites them from the
/// actual section lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: u16,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl DnsHeader {
    pub fn new(id: u16, flags: u16) -> Self {
        Self {
            id,
            flags,
            ..Default::default()
        }
    }

    pub fn is_response(&self) -> bool {
        self.flags & FLAG_QR != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags >> 11) & 0x0F) as u8
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & FLAG_RD != 0
    }

    pub fn rcode(&self) -> u8 {
        (self.flags & 0x000F) as u8
    }

    pub(crate) fn parse(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        if reader.remaining() < HEADER_LEN {
            return Err(CodecError::malformed(format!(
                "message is {} bytes, shorter than the {}-byte header",
                reader.remaining(),
                HEADER_LEN
            )));
        }

        Ok(Self {
            id: reader.read_u16()?,
            flags: reader.read_u16()?,
            qdcount: reader.read_u16()?,
            ancount: reader.read_u16()?,
            nscount: reader.read_u16()?,
            arcount: reader.read_u16()?,
        })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags.to_be_bytes());
        out.extend_from_slice(&self.qdcount.to_be_bytes());
        out.extend_from_slice(&self.ancount.to_be_bytes());
        out.extend_from_slice(&self.nscount.to_be_bytes());
        out.extend_from_slice(&self.arcount.to_be_bytes());
    }
}

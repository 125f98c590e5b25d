use super::name::DomainName;
use super::reader::WireReader;
use super::record_type::RecordType;
use crate::errors::CodecError;

/// Smallest possible question: root name + QTYPE + QCLASS.
pub(crate) const MIN_QUESTION_LEN: usize = 1 + 4;
/// Smallest possible record: root name + TYPE + CLASS + TTL + RDLENGTH.
pub(crate) const MIN_RECORD_LEN: usize = 1 + 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DomainName,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: DomainName, qtype: u16, qclass: u16) -> Self {
        Self { name, qtype, qclass }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.qtype)
    }

    pub(crate) fn parse(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let name = DomainName::parse(reader)?;
        let qtype = reader.read_u16()?;
        let qclass = reader.read_u16()?;
        Ok(Self { name, qtype, qclass })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.name.write(out)?;
        out.extend_from_slice(&self.qtype.to_be_bytes());
        out.extend_from_slice(&self.qclass.to_be_bytes());
        Ok(())
    }
}

/// A resource record with uninterpreted RDATA.
///
/// Names inside RDATA are not decompressed: the bytes are kept exactly as
/// received. For the OPT pseudo-record `class` and `ttl` carry EDNS fields,
/// see [`crate::edns::OptRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DomainName,
    pub rtype: u16,
    pub class: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    pub fn new(name: DomainName, rtype: u16, class: u16, ttl: u32, rdata: Vec<u8>) -> Self {
        Self {
            name,
            rtype,
            class,
            ttl,
            rdata,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.rtype)
    }

    pub fn is_opt(&self) -> bool {
        self.rtype == RecordType::OPT.to_u16()
    }

    pub(crate) fn parse(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let name = DomainName::parse(reader)?;
        let rtype = reader.read_u16()?;
        let class = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()? as usize;
        if rdlength > reader.remaining() {
            return Err(CodecError::malformed(format!(
                "RDLENGTH {} of {} record exceeds the {} remaining bytes",
                rdlength,
                RecordType::name_of(rtype),
                reader.remaining()
            )));
        }
        let rdata = reader.read_bytes(rdlength)?.to_vec();

        Ok(Self {
            name,
            rtype,
            class,
            ttl,
            rdata,
        })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        let rdlength = u16::try_from(self.rdata.len()).map_err(|_| {
            CodecError::overflow(format!(
                "RDATA of {} bytes in {} record exceeds 65535",
                self.rdata.len(),
                RecordType::name_of(self.rtype)
            ))
        })?;

        self.name.write(out)?;
        out.extend_from_slice(&self.rtype.to_be_bytes());
        out.extend_from_slice(&self.class.to_be_bytes());
        out.extend_from_slice(&self.ttl.to_be_bytes());
        out.extend_from_slice(&rdlength.to_be_bytes());
        out.extend_from_slice(&self.rdata);
        Ok(())
    }
}

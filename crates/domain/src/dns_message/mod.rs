//! Wire-format DNS message codec (RFC 1035 §4).
//!
//! Decoding resolves compression pointers; encoding always emits full
//! names. Record data is kept opaque apart from the OPT pseudo-record.

pub mod header;
pub mod name;
pub(crate) mod reader;
pub mod record;
pub mod record_type;

pub use header::{DnsHeader, HEADER_LEN};
pub use name::{DomainName, MAX_LABEL_LEN, MAX_NAME_LEN};
pub use record::{Question, ResourceRecord};
pub use record_type::RecordType;

use crate::edns::OptRecord;
use crate::errors::CodecError;
use reader::WireReader;
use record::{MIN_QUESTION_LEN, MIN_RECORD_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl DnsMessage {
    /// Builds a single-question query with the given id and flags.
    pub fn query(id: u16, flags: u16, question: Question) -> Self {
        Self {
            header: DnsHeader::new(id, flags),
            questions: vec![question],
            ..Default::default()
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = WireReader::new(bytes);
        let header = DnsHeader::parse(&mut reader)?;

        let questions = parse_section(
            &mut reader,
            header.qdcount,
            "question",
            MIN_QUESTION_LEN,
            Question::parse,
        )?;
        let answers = parse_section(
            &mut reader,
            header.ancount,
            "answer",
            MIN_RECORD_LEN,
            ResourceRecord::parse,
        )?;
        let authorities = parse_section(
            &mut reader,
            header.nscount,
            "authority",
            MIN_RECORD_LEN,
            ResourceRecord::parse,
        )?;
        let additionals = parse_section(
            &mut reader,
            header.arcount,
            "additional",
            MIN_RECORD_LEN,
            ResourceRecord::parse,
        )?;

        let message = Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        };
        message.check_opt()?;
        Ok(message)
    }

    /// Serializes the message without name compression. Section counts
    /// in the output come from the section lengths, not from `header`.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let header = DnsHeader {
            qdcount: section_count(self.questions.len(), "question")?,
            ancount: section_count(self.answers.len(), "answer")?,
            nscount: section_count(self.authorities.len(), "authority")?,
            arcount: section_count(self.additionals.len(), "additional")?,
            ..self.header
        };

        let mut out = Vec::with_capacity(512);
        header.write(&mut out);
        for question in &self.questions {
            question.write(&mut out)?;
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.write(&mut out)?;
        }
        Ok(out)
    }

    /// Position of the OPT record in `additionals`, if any.
    pub fn opt_index(&self) -> Option<usize> {
        self.additionals.iter().position(ResourceRecord::is_opt)
    }

    /// Structured view of the OPT record, if any.
    pub fn opt(&self) -> Result<Option<OptRecord>, CodecError> {
        self.opt_index()
            .map(|i| OptRecord::from_record(&self.additionals[i]))
            .transpose()
    }

    fn check_opt(&self) -> Result<(), CodecError> {
        let mut opts = self.additionals.iter().filter(|r| r.is_opt());
        if let Some(opt) = opts.next() {
            if opts.next().is_some() {
                return Err(CodecError::malformed("more than one OPT record"));
            }
            OptRecord::from_record(opt)?;
        }
        Ok(())
    }
}

/// Shorthand for [`DnsMessage::decode`].
pub fn decode(bytes: &[u8]) -> Result<DnsMessage, CodecError> {
    DnsMessage::decode(bytes)
}

/// Shorthand for [`DnsMessage::encode`].
pub fn encode(message: &DnsMessage) -> Result<Vec<u8>, CodecError> {
    message.encode()
}

fn parse_section<'a, T>(
    reader: &mut WireReader<'a>,
    count: u16,
    section: &str,
    min_entry_len: usize,
    parse: fn(&mut WireReader<'a>) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    let count = count as usize;
    if count * min_entry_len > reader.remaining() {
        return Err(CodecError::malformed(format!(
            "{} section claims {} entries but only {} bytes remain",
            section,
            count,
            reader.remaining()
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(parse(reader)?);
    }
    Ok(entries)
}

fn section_count(len: usize, section: &str) -> Result<u16, CodecError> {
    u16::try_from(len).map_err(|_| {
        CodecError::overflow(format!("{} section has {} entries, over 65535", section, len))
    })
}

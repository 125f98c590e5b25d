use super::reader::WireReader;
use crate::errors::CodecError;
use std::fmt;
use std::str::FromStr;

pub const MAX_LABEL_LEN: usize = 63;
/// Maximum length of a name in wire format, including length octets and
/// the terminating root label.
pub const MAX_NAME_LEN: usize = 255;

const POINTER_MASK: u8 = 0xC0;

/// An uncompressed domain name held as raw labels, most specific first.
/// The root name has no labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DomainName {
    labels: Vec<Vec<u8>>,
}

impl DomainName {
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn from_labels(labels: Vec<Vec<u8>>) -> Result<Self, CodecError> {
        let name = Self { labels };
        name.check_limits()?;
        Ok(name)
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length of the name in uncompressed wire format.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Reads a possibly compressed name starting at the reader's position.
    ///
    /// Compression pointers are followed by offset only. Each jump must land
    /// strictly before both the pointer itself and the previous jump target,
    /// which rules out loops without tracking visited offsets. On return the
    /// reader sits just past the first pointer, or past the root label when
    /// the name was not compressed.
    pub(crate) fn parse(reader: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let buf = reader.buffer();
        let mut pos = reader.position();
        let mut resume_at: Option<usize> = None;
        let mut last_target = usize::MAX;
        let mut labels = Vec::new();
        let mut wire_len = 1;

        loop {
            let len_byte = *buf
                .get(pos)
                .ok_or_else(|| CodecError::malformed(format!("name runs past end at offset {}", pos)))?;

            match len_byte & POINTER_MASK {
                0x00 if len_byte == 0 => {
                    pos += 1;
                    break;
                }
                0x00 => {
                    let len = len_byte as usize;
                    let start = pos + 1;
                    let end = start + len;
                    if end > buf.len() {
                        return Err(CodecError::malformed(format!(
                            "label at offset {} runs past end of message",
                            pos
                        )));
                    }
                    wire_len += len + 1;
                    if wire_len > MAX_NAME_LEN {
                        return Err(CodecError::malformed(format!(
                            "name exceeds {} bytes",
                            MAX_NAME_LEN
                        )));
                    }
                    labels.push(buf[start..end].to_vec());
                    pos = end;
                }
                POINTER_MASK => {
                    let low = *buf.get(pos + 1).ok_or_else(|| {
                        CodecError::malformed(format!("truncated compression pointer at offset {}", pos))
                    })?;
                    let target = (((len_byte & !POINTER_MASK) as usize) << 8) | low as usize;
                    if target >= pos || target >= last_target {
                        return Err(CodecError::malformed(format!(
                            "compression pointer at offset {} to {} does not point backward",
                            pos, target
                        )));
                    }
                    if resume_at.is_none() {
                        resume_at = Some(pos + 2);
                    }
                    last_target = target;
                    pos = target;
                }
                _ => {
                    return Err(CodecError::malformed(format!(
                        "label length byte {:#04x} at offset {} exceeds {} or uses a reserved label type",
                        len_byte, pos, MAX_LABEL_LEN
                    )));
                }
            }
        }

        reader.seek(resume_at.unwrap_or(pos));
        Ok(Self { labels })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        self.check_limits()?;
        for label in &self.labels {
            out.push(label.len() as u8);
            out.extend_from_slice(label);
        }
        out.push(0);
        Ok(())
    }

    fn check_limits(&self) -> Result<(), CodecError> {
        for label in &self.labels {
            if label.is_empty() {
                return Err(CodecError::overflow("empty label inside a name"));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(CodecError::overflow(format!(
                    "label of {} bytes exceeds {}",
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
        }
        if self.wire_len() > MAX_NAME_LEN {
            return Err(CodecError::overflow(format!(
                "name of {} bytes exceeds {}",
                self.wire_len(),
                MAX_NAME_LEN
            )));
        }
        Ok(())
    }
}

impl FromStr for DomainName {
    type Err = CodecError;

    /// Parses a dotted name. A trailing dot is optional; `""` and `"."` both
    /// yield the root. Escapes are not interpreted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_suffix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let labels = trimmed.split('.').map(|l| l.as_bytes().to_vec()).collect();
        Self::from_labels(labels)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return write!(f, ".");
        }
        for label in &self.labels {
            for &b in label {
                match b {
                    b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                    0x21..=0x7E => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{:03}", b)?,
                }
            }
            write!(f, ".")?;
        }
        Ok(())
    }
}

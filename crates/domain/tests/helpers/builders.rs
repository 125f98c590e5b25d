#![allow(dead_code)]

/// Assembles raw wire-format messages byte by byte, so tests control
/// exactly what the decoder sees (including inconsistent counts).
pub struct WireBuilder {
    buf: Vec<u8>,
}

impl WireBuilder {
    /// Header with the given counts; everything else is appended by the
    /// caller.
    pub fn new(id: u16, flags: u16, counts: [u16; 4]) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(&id.to_be_bytes());
        buf.extend_from_slice(&flags.to_be_bytes());
        for count in counts {
            buf.extend_from_slice(&count.to_be_bytes());
        }
        Self { buf }
    }

    /// A standard recursive query header with one question and `arcount`
    /// additional records.
    pub fn query(arcount: u16) -> Self {
        Self::new(0x1234, 0x0100, [1, 0, 0, arcount])
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn name(mut self, name: &str) -> Self {
        for label in name.split('.').filter(|l| !l.is_empty()) {
            self.buf.push(label.len() as u8);
            self.buf.extend_from_slice(label.as_bytes());
        }
        self.buf.push(0);
        self
    }

    pub fn pointer(mut self, offset: u16) -> Self {
        self.buf.extend_from_slice(&(0xC000 | offset).to_be_bytes());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.buf.push(label.len() as u8);
        self.buf.extend_from_slice(label.as_bytes());
        self
    }

    pub fn u16(mut self, value: u16) -> Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn question(self, name: &str, qtype: u16) -> Self {
        self.name(name).u16(qtype).u16(1)
    }

    /// Fixed record fields after the owner name.
    pub fn record_tail(self, rtype: u16, ttl: u32, rdata: &[u8]) -> Self {
        self.u16(rtype)
            .u16(1)
            .u32(ttl)
            .u16(rdata.len() as u16)
            .bytes(rdata)
    }

    /// OPT record with the given `(code, data)` options.
    pub fn opt(self, payload_size: u16, ttl: u32, options: &[(u16, &[u8])]) -> Self {
        let mut rdata = Vec::new();
        for (code, data) in options {
            rdata.extend_from_slice(&code.to_be_bytes());
            rdata.extend_from_slice(&(data.len() as u16).to_be_bytes());
            rdata.extend_from_slice(data);
        }
        self.name("")
            .u16(41)
            .u16(payload_size)
            .u32(ttl)
            .u16(rdata.len() as u16)
            .bytes(&rdata)
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// `example.com A` query without EDNS.
pub fn plain_query() -> Vec<u8> {
    WireBuilder::query(0).question("example.com", 1).build()
}

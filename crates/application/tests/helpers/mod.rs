#![allow(dead_code)]

mod mock_upstream;

pub use mock_upstream::{MockUpstreamResolver, SentRequest};

/// A recursive A query for `example.com` with id 0x1234 and no EDNS.
pub fn example_query() -> Vec<u8> {
    let mut wire = vec![0x12, 0x34, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0];
    wire.extend_from_slice(b"\x07example\x03com\x00");
    wire.extend_from_slice(&[0, 1, 0, 1]);
    wire
}

use doh_ecs_domain::{decode, encode, CodecError, DnsMessage, DomainName, Question, RecordType};

mod helpers;
use helpers::builders::{plain_query, WireBuilder};

fn full_response() -> Vec<u8> {
    WireBuilder::new(0xabcd, 0x8180, [1, 2, 1, 2])
        .question("www.example.com", 1)
        .name("www.example.com")
        .record_tail(5, 300, b"\x03cdn\x07example\x03net\x00")
        .name("cdn.example.net")
        .record_tail(1, 60, &[192, 0, 2, 44])
        .name("example.net")
        .record_tail(6, 3600, &[0u8; 22])
        .name("ns1.example.net")
        .record_tail(28, 60, &[0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1])
        .opt(1232, 0, &[(10, &[1, 2, 3, 4, 5, 6, 7, 8])])
        .build()
}

#[test]
fn test_decode_plain_query() {
    let message = decode(&plain_query()).unwrap();

    assert_eq!(message.header.id, 0x1234);
    assert!(message.header.recursion_desired());
    assert!(!message.header.is_response());
    assert_eq!(message.questions.len(), 1);
    assert_eq!(message.questions[0].name.to_string(), "example.com.");
    assert_eq!(message.questions[0].record_type(), Some(RecordType::A));
    assert!(message.answers.is_empty());
    assert!(message.additionals.is_empty());
    assert!(message.opt().unwrap().is_none());
}

#[test]
fn test_round_trip_is_byte_identical_without_compression() {
    let bytes = full_response();
    let message = decode(&bytes).unwrap();

    assert_eq!(message.answers.len(), 2);
    assert_eq!(message.authorities.len(), 1);
    assert_eq!(message.additionals.len(), 2);
    assert_eq!(encode(&message).unwrap(), bytes);
}

#[test]
fn test_rdata_kept_verbatim() {
    let message = decode(&full_response()).unwrap();

    assert_eq!(message.answers[0].rtype, 5);
    assert_eq!(message.answers[0].rdata, b"\x03cdn\x07example\x03net\x00".to_vec());
    assert_eq!(message.answers[1].rdata, vec![192, 0, 2, 44]);
    assert_eq!(message.answers[1].ttl, 60);
}

#[test]
fn test_compressed_names_decode_to_same_content() {
    // answer owner is a pointer to the question name at offset 12
    let bytes = WireBuilder::new(7, 0x8180, [1, 1, 0, 0])
        .question("example.com", 1)
        .pointer(12)
        .record_tail(1, 120, &[203, 0, 113, 5])
        .build();

    let message = decode(&bytes).unwrap();
    assert_eq!(message.answers[0].name, message.questions[0].name);

    let reencoded = encode(&message).unwrap();
    assert_ne!(reencoded, bytes);
    assert_eq!(reencoded.len(), bytes.len() + 11);
    assert_eq!(decode(&reencoded).unwrap(), message);
}

#[test]
fn test_suffix_compression_with_prefix_labels() {
    let bytes = WireBuilder::new(7, 0x8180, [1, 1, 0, 0])
        .question("example.com", 1)
        .label("www")
        .pointer(12)
        .record_tail(1, 120, &[203, 0, 113, 5])
        .build();

    let message = decode(&bytes).unwrap();
    assert_eq!(message.answers[0].name.to_string(), "www.example.com.");
    assert_eq!(message.answers[0].rdata, vec![203, 0, 113, 5]);
}

#[test]
fn test_short_buffer_is_malformed() {
    let err = decode(&[0x12, 0x34, 0x01, 0x00]).unwrap_err();
    assert!(matches!(err, CodecError::MalformedMessage(_)));

    assert!(decode(&[]).is_err());
}

#[test]
fn test_inflated_count_is_malformed() {
    let bytes = WireBuilder::new(1, 0x0100, [40, 0, 0, 0])
        .question("example.com", 1)
        .build();

    assert!(matches!(decode(&bytes), Err(CodecError::MalformedMessage(_))));
}

#[test]
fn test_missing_record_is_malformed() {
    let bytes = WireBuilder::query(1).question("example.com", 1).build();
    assert!(matches!(decode(&bytes), Err(CodecError::MalformedMessage(_))));
}

#[test]
fn test_pointer_to_own_offset_rejected() {
    // question name at offset 12 is a pointer to 12
    let bytes = WireBuilder::new(1, 0x0100, [1, 0, 0, 0])
        .pointer(12)
        .u16(1)
        .u16(1)
        .build();

    assert!(matches!(decode(&bytes), Err(CodecError::MalformedMessage(_))));
}

#[test]
fn test_forward_pointer_rejected() {
    let bytes = WireBuilder::new(1, 0x0100, [1, 0, 0, 0])
        .pointer(18)
        .u16(1)
        .u16(1)
        .name("example.com")
        .build();

    assert!(matches!(decode(&bytes), Err(CodecError::MalformedMessage(_))));
}

#[test]
fn test_pointer_loop_rejected() {
    // label "a" at 12 followed by a pointer back to 12: every pass through
    // the pointer would land on the same label again
    let bytes = WireBuilder::new(1, 0x0100, [1, 0, 0, 0])
        .label("a")
        .pointer(12)
        .u16(1)
        .u16(1)
        .build();

    assert!(decode(&bytes).is_err());
}

#[test]
fn test_oversized_label_rejected() {
    let mut bytes = WireBuilder::new(1, 0x0100, [1, 0, 0, 0]).build();
    bytes.push(64);
    bytes.extend_from_slice(&[b'a'; 64]);
    bytes.extend_from_slice(&[0, 0, 1, 0, 1]);

    assert!(matches!(decode(&bytes), Err(CodecError::MalformedMessage(_))));
}

#[test]
fn test_rdlength_past_end_rejected() {
    let mut bytes = WireBuilder::new(1, 0x8180, [1, 1, 0, 0])
        .question("example.com", 1)
        .pointer(12)
        .u16(1)
        .u16(1)
        .u32(60)
        .u16(16)
        .build();
    bytes.extend_from_slice(&[1, 2, 3, 4]);

    assert!(matches!(decode(&bytes), Err(CodecError::MalformedMessage(_))));
}

#[test]
fn test_two_opt_records_rejected() {
    let bytes = WireBuilder::query(2)
        .question("example.com", 1)
        .opt(1232, 0, &[])
        .opt(4096, 0, &[])
        .build();

    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::MalformedMessage(ref m) if m.contains("OPT")));
}

#[test]
fn test_truncated_opt_rdata_rejected() {
    let bytes = WireBuilder::query(1)
        .question("example.com", 1)
        .name("")
        .record_tail(41, 0, &[0, 8, 0, 9, 0, 1])
        .build();

    assert!(matches!(decode(&bytes), Err(CodecError::MalformedMessage(_))));
}

#[test]
fn test_trailing_bytes_ignored() {
    let mut bytes = plain_query();
    bytes.extend_from_slice(&[0xde, 0xad]);

    let message = decode(&bytes).unwrap();
    assert_eq!(encode(&message).unwrap(), plain_query());
}

#[test]
fn test_encode_recomputes_counts() {
    let mut message = decode(&plain_query()).unwrap();
    message.header.qdcount = 9;
    message.header.arcount = 3;

    let bytes = encode(&message).unwrap();
    assert_eq!(&bytes[4..12], &[0, 1, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_encode_preserves_flags() {
    let bytes = WireBuilder::new(0x0042, 0x0130, [1, 0, 0, 0])
        .question("example.org", 28)
        .build();

    let reencoded = encode(&decode(&bytes).unwrap()).unwrap();
    assert_eq!(&reencoded[..4], &[0x00, 0x42, 0x01, 0x30]);
}

#[test]
fn test_encode_rejects_too_many_questions() {
    let question = Question::new(DomainName::root(), 1, 1);
    let message = DnsMessage {
        questions: vec![question; 65_536],
        ..Default::default()
    };

    assert!(matches!(encode(&message), Err(CodecError::EncodingOverflow(_))));
}

#[test]
fn test_encode_rejects_long_name() {
    let long: Vec<Vec<u8>> = (0..5).map(|_| vec![b'a'; 60]).collect();
    assert!(matches!(
        DomainName::from_labels(long),
        Err(CodecError::EncodingOverflow(_))
    ));
}

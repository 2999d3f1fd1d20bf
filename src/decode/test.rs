//! Decoding scenarios spanning several modules.
#![cfg(test)]

use std::io;
use crate::error::ErrorKind;
use crate::ident::Tag;
use crate::length::Length;
use crate::limits::Limits;
use crate::mode::Mode;
use crate::value::Value;
use super::*;

fn decode_err(data: &[u8], mode: Mode) -> ErrorKind {
    mode.decode(data).unwrap_err().kind()
}

fn nested_indefinite(levels: usize) -> Vec<u8> {
    let mut res = Vec::new();
    for _ in 0..levels {
        res.extend_from_slice(b"\x30\x80");
    }
    res.extend_from_slice(b"\x05\x00");
    for _ in 0..levels {
        res.extend_from_slice(b"\x00\x00");
    }
    res
}

#[test]
fn indefinite_sequence() {
    let data = b"\x30\x80\x02\x01\x05\x00\x00";
    let (value, len) = Mode::Ber.decode(data).unwrap();
    assert_eq!(len, 7);
    assert_eq!(value.tag(), Tag::SEQUENCE);
    assert_eq!(value.length(), Length::Indefinite);
    let children = value.children().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].tag(), Tag::INTEGER);
    assert_eq!(&children[0].primitive().unwrap()[..], b"\x05");

    assert_eq!(decode_err(data, Mode::Der), ErrorKind::DialectViolation);
}

#[test]
fn der_round_trip() {
    let tree = Value::sequence(vec![
        Value::primitive(Tag::INTEGER, &b"\x01\x00"[..]),
        Value::explicit(
            Tag::ctx(0),
            Value::set(vec![
                Value::primitive(Tag::OCTET_STRING, vec![0x5Au8; 1000]),
                Value::primitive(Tag::NULL, &b""[..]),
            ])
        ),
        Value::implicit(Tag::ctx(1), Value::sequence(Vec::new())),
        Value::primitive(Tag::private(0x1234_5678), &b"x"[..]),
        Value::constructed(Tag::application(31), vec![
            Value::primitive(Tag::UTF8_STRING, &b"abc"[..]),
        ]),
    ]);
    let encoded = Mode::Der.encode(&tree).unwrap();
    let decoded = Mode::Der.decode_all(&encoded).unwrap();

    // Tags applied to values come back as plain constructed or primitive
    // values with that tag. Those encode identically.
    let round = decoded.to_value();
    assert_eq!(Mode::Der.encode(&round).unwrap(), encoded);
    assert_eq!(
        round,
        Value::sequence(vec![
            Value::primitive(Tag::INTEGER, &b"\x01\x00"[..]),
            Value::constructed(Tag::ctx(0), vec![
                Value::set(vec![
                    Value::primitive(Tag::OCTET_STRING, vec![0x5Au8; 1000]),
                    Value::primitive(Tag::NULL, &b""[..]),
                ])
            ]),
            Value::constructed(Tag::ctx(1), Vec::new()),
            Value::primitive(Tag::private(0x1234_5678), &b"x"[..]),
            Value::constructed(Tag::application(31), vec![
                Value::primitive(Tag::UTF8_STRING, &b"abc"[..]),
            ]),
        ])
    );
}

#[test]
fn ber_round_trip() {
    let tree = Value::sequence(vec![
        Value::explicit_indefinite(
            Tag::ctx(0), Value::primitive(Tag::INTEGER, &b"\x02"[..])
        ),
        Value::sequence(vec![
            Value::sequence(Vec::new()).indefinite(),
        ]).indefinite(),
    ]);
    let encoded = Mode::Ber.encode(&tree).unwrap();
    assert_eq!(
        encoded,
        b"\x30\x0F\
          \xA0\x80\x02\x01\x02\x00\x00\
          \x30\x80\x30\x80\x00\x00\x00\x00"
    );
    let decoded = Mode::Ber.decode_all(&encoded).unwrap();
    assert_eq!(Mode::Ber.encode(&decoded.to_value()).unwrap(), encoded);
}

#[test]
fn truncated() {
    assert_eq!(
        decode_err(b"\x30\x03\x02\x01", Mode::Ber),
        ErrorKind::TruncatedContent
    );
    assert_eq!(decode_err(b"", Mode::Ber), ErrorKind::TruncatedContent);
    assert_eq!(
        decode_err(b"\x04\x05abc", Mode::Der), ErrorKind::TruncatedContent
    );

    // The child claims more than its parent has.
    assert_eq!(
        decode_err(b"\x30\x03\x02\x02\x01\x01", Mode::Ber),
        ErrorKind::TruncatedContent
    );

    // The header of the child crosses the end of its parent.
    assert_eq!(
        decode_err(b"\x30\x02\x04\x81\x01\x00", Mode::Ber),
        ErrorKind::TruncatedContent
    );
}

#[test]
fn trailing() {
    // A single octet left in the parent.
    assert_eq!(
        decode_err(b"\x30\x04\x02\x01\x01\x05", Mode::Ber),
        ErrorKind::TrailingContent
    );
    assert_eq!(
        Mode::Der.decode_all(b"\x05\x00\x00").unwrap_err().kind(),
        ErrorKind::TrailingContent
    );

    // decode ignores anything after the first value.
    let (_, len) = Mode::Der.decode(b"\x05\x00\x00").unwrap();
    assert_eq!(len, 2);
}

#[test]
fn unterminated() {
    assert_eq!(
        decode_err(b"\x30\x80\x02\x01\x05", Mode::Ber),
        ErrorKind::UnterminatedIndefiniteLength
    );
    assert_eq!(
        decode_err(b"\x30\x80", Mode::Ber),
        ErrorKind::UnterminatedIndefiniteLength
    );

    // Indefinite inside definite runs into the end of the parent.
    assert_eq!(
        decode_err(b"\x30\x05\x30\x80\x02\x01\x05\x00\x00", Mode::Ber),
        ErrorKind::UnterminatedIndefiniteLength
    );
}

#[test]
fn dialect() {
    // Non-minimal length octets.
    assert!(Mode::Ber.decode(b"\x04\x81\x01\xFF").is_ok());
    assert_eq!(
        decode_err(b"\x04\x81\x01\xFF", Mode::Der), ErrorKind::MalformedLength
    );

    // Long form tag for a small number.
    assert!(Mode::Ber.decode(b"\x9F\x05\x00").is_ok());
    assert_eq!(
        decode_err(b"\x9F\x05\x00", Mode::Der), ErrorKind::MalformedTag
    );

    // Reserved length.
    assert_eq!(
        decode_err(b"\x04\xFF", Mode::Ber), ErrorKind::MalformedLength
    );
}

#[test]
fn depth_limit() {
    let data = nested_indefinite(Limits::DEFAULT_MAX_DEPTH);
    assert!(Mode::Ber.decode_all(&data).is_ok());

    let data = nested_indefinite(Limits::DEFAULT_MAX_DEPTH + 1);
    assert_eq!(
        Mode::Ber.decode_all(&data).unwrap_err().kind(),
        ErrorKind::DepthLimitExceeded
    );

    let limits = Limits::default().with_max_depth(100);
    let mut decoder = Decoder::new(
        SliceSource::from(bytes::Bytes::from(data)), Mode::Ber
    ).with_limits(limits);
    assert!(decoder.take_value().is_ok());
    assert!(decoder.exhausted().is_ok());
}

#[test]
fn tag_number_limit() {
    let limits = Limits::default().with_max_tag_number(1000);
    let mut decoder = Decoder::new(
        SliceSource::from(&b"\xBF\x87\x69\x00"[..]), Mode::Der
    ).with_limits(limits);
    assert_eq!(
        decoder.take_value().unwrap_err().kind(),
        Some(ErrorKind::InvalidTagNumber)
    );
}

#[test]
fn reader_stream() {
    let data = b"\x02\x01\x01\x30\x80\x05\x00\x00\x00\xA0\x02\x05\x00";
    let mut decoder = Decoder::new(
        ReaderSource::new(&data[..]), Mode::Ber
    );
    let mut tags = Vec::new();
    while let Some(value) = decoder.next_value().unwrap() {
        tags.push(value.tag());
    }
    assert_eq!(tags, [Tag::INTEGER, Tag::SEQUENCE, Tag::ctx(0)]);
    assert_eq!(usize::from(decoder.pos()), data.len());
}

#[test]
fn reader_failure() {
    struct Broken;

    impl io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }
    }

    let mut decoder = Decoder::new(ReaderSource::new(Broken), Mode::Ber);
    let err = decoder.take_value().unwrap_err();
    assert_eq!(err.kind(), None);
    assert!(matches!(err, crate::DecodeError::Source(_)));
}

//! Tagging through the public API: encode, decode, and resolve tags.

use std::io;
use bertlv::{
    Class, EncodeError, ErrorKind, Framing, Limits, Mode, Tag, Tagged, Value,
};
use bertlv::decode::{Decoder, RawContent, SliceSource};
use bertlv::encode::{Encoder, IoTarget};

fn int(content: &'static [u8]) -> Value {
    Value::primitive(Tag::INTEGER, content)
}

#[test]
fn explicit_over_primitive() {
    let value = Value::explicit(Tag::ctx(0), int(b"\x02"));
    assert!(value.is_constructed());
    assert_eq!(Mode::Der.encode(&value).unwrap(), b"\xA0\x03\x02\x01\x02");
    assert_eq!(Mode::Ber.encode(&value).unwrap(), b"\xA0\x03\x02\x01\x02");
    assert_eq!(Mode::Der.encoded_len(&value).unwrap(), 5);

    let inner = Mode::Der.decode_all(b"\xA0\x03\x02\x01\x02").unwrap()
        .into_explicit().unwrap();
    assert_eq!(inner.tag(), Tag::INTEGER);
    assert_eq!(
        inner.content(), &RawContent::Primitive((&b"\x02"[..]).into())
    );
}

#[test]
fn explicit_indefinite() {
    let value = Value::explicit_indefinite(Tag::ctx(1), int(b"\x07"));
    assert_eq!(value.framing(), Framing::Indefinite);
    assert_eq!(
        Mode::Ber.encode(&value).unwrap(),
        b"\xA1\x80\x02\x01\x07\x00\x00"
    );
    assert_eq!(
        Mode::Der.encode(&value).unwrap_err().kind(),
        Some(ErrorKind::DialectViolation)
    );

    let inner = Mode::Ber.decode_all(b"\xA1\x80\x02\x01\x07\x00\x00")
        .unwrap().into_explicit().unwrap();
    assert_eq!(inner.tag(), Tag::INTEGER);
}

#[test]
fn implicit_over_primitive() {
    let value = Value::implicit(Tag::ctx(0), int(b"\x02"));
    assert!(!value.is_constructed());
    assert_eq!(Mode::Der.encode(&value).unwrap(), b"\x80\x01\x02");

    let decoded = Mode::Der.decode_all(b"\x80\x01\x02").unwrap();
    assert!(!decoded.is_constructed());
    let decoded = decoded.into_implicit(Tag::INTEGER);
    assert_eq!(decoded.to_value(), int(b"\x02"));

    let value = Value::Tagged(
        Tagged::implicit(Tag::ctx(0), int(b"\x02"))
            .with_framing(Framing::Indefinite)
    );
    assert_eq!(
        Mode::Ber.encode(&value).unwrap_err().kind(),
        Some(ErrorKind::UnsupportedDialectCombination)
    );
}

#[test]
fn implicit_over_constructed() {
    let value = Value::implicit(
        Tag::application(3),
        Value::sequence(vec![int(b"\x01"), int(b"\x02")])
    );
    assert!(value.is_constructed());
    assert_eq!(
        Mode::Der.encode(&value).unwrap(),
        b"\x63\x06\x02\x01\x01\x02\x01\x02"
    );

    let decoded = Mode::Der.decode_all(
        b"\x63\x06\x02\x01\x01\x02\x01\x02"
    ).unwrap();
    assert_eq!(decoded.tag().class(), Class::Application);
    let decoded = decoded.into_implicit(Tag::SEQUENCE);
    assert_eq!(
        decoded.to_value(),
        Value::sequence(vec![int(b"\x01"), int(b"\x02")])
    );
}

#[test]
fn empty_tagged() {
    let value: Value = Tagged::empty(Tag::ctx(5)).into();
    assert!(value.is_constructed());
    assert_eq!(Mode::Der.encode(&value).unwrap(), b"\xA5\x00");
    assert_eq!(
        Mode::Ber.encode(&value.indefinite()).unwrap(),
        b"\xA5\x80\x00\x00"
    );
}

#[test]
fn high_tag_numbers() {
    for number in [0, 1, 30, 31, 127, 128, 16383, 16384, u32::MAX] {
        let value = Value::explicit(Tag::private(number), int(b"\x00"));
        let encoded = Mode::Der.encode(&value).unwrap();
        let decoded = Mode::Der.decode_all(&encoded).unwrap();
        assert_eq!(decoded.tag(), Tag::private(number));
        assert_eq!(decoded.tag().number(), number);
    }

    let limits = Limits::default().with_max_tag_number(100);
    let value = Value::implicit(Tag::ctx(101), int(b"\x00"));
    assert_eq!(
        Encoder::new(Mode::Der).with_limits(limits).encode(&value)
            .unwrap_err().kind(),
        Some(ErrorKind::InvalidTagNumber)
    );
    let encoded = Mode::Der.encode(&value).unwrap();
    let mut decoder = Decoder::new(
        SliceSource::copy_from_slice(&encoded), Mode::Der
    ).with_limits(limits);
    assert_eq!(
        decoder.take_value().unwrap_err().kind(),
        Some(ErrorKind::InvalidTagNumber)
    );
}

#[test]
fn target_failure() {
    struct Full;

    impl io::Write for Full {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let value = Value::explicit(Tag::ctx(0), int(b"\x02"));
    let err = Mode::Der.write_encoded(
        &value, &mut IoTarget::new(Full)
    ).unwrap_err();
    assert!(matches!(err, EncodeError::Target(_)));
    assert_eq!(err.kind(), None);
}

#[test]
fn error_positions() {
    let err = Mode::Ber.decode(
        b"\x30\x06\x02\x01\x01\x04\x03\x01"
    ).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedContent);
    assert_eq!(usize::from(err.pos()), 5);
    assert_eq!(
        err.to_string(), "unexpected end of content at position 5"
    );
}

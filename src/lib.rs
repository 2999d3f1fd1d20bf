//! Encoding and decoding of tag-length-value data in BER and DER.
//!
//! This crate implements the structural layer of the Basic Encoding Rules
//! defined in ITU-T Recommendation X.690: identifier octets, length octets,
//! and the nesting of constructed values. It deliberately knows nothing about
//! the meaning of the content of primitive values. That is left to a schema
//! layer built atop.
//!
//! Two dialects are supported, selected at runtime through [`Mode`]:
//! [`Mode::Der`], the distinguished rules, which only allow definite length
//! values, and [`Mode::Ber`], the basic rules, which additionally allow
//! constructed values of indefinite length terminated by an end-of-contents
//! marker.
//!
//! Values to be encoded are built as a tree of [`Value`]s. Besides plain
//! primitive and constructed values, the tree can contain [`Tagged`] values
//! that either wrap an inner value in an additional constructed layer
//! (explicit tagging) or replace the inner value’s tag (implicit tagging).
//! Encoding happens in two passes: the first one determines and checks the
//! length of every value, the second one writes the octets to a
//! [`Target`][encode::Target].
//!
//! Decoding produces a tree of [`RawValue`][decode::RawValue]s that expose
//! tag, length form, and content of each value. Because implicit tagging
//! loses the original tag, whether a tag was applied explicitly or
//! implicitly has to be decided by whoever knows the schema.
//!
//! ```
//! use bertlv::{Mode, Tag, Value};
//!
//! let value = Value::explicit(
//!     Tag::ctx(0), Value::primitive(Tag::INTEGER, &b"\x02"[..])
//! );
//! let encoded = Mode::Der.encode(&value).unwrap();
//! assert_eq!(encoded, b"\xA0\x03\x02\x01\x02");
//!
//! let (decoded, len) = Mode::Der.decode(&encoded).unwrap();
//! assert_eq!(len, 5);
//! let inner = decoded.into_explicit().unwrap();
//! assert_eq!(inner.tag(), Tag::INTEGER);
//! ```

pub use self::error::{ContentError, DecodeError, EncodeError, ErrorKind};
pub use self::ident::{Class, Ident, Tag};
pub use self::length::Length;
pub use self::limits::Limits;
pub use self::mode::Mode;
pub use self::value::{Constructed, Framing, Primitive, Tagged, Value};

#[macro_use] pub mod debug;

pub mod decode;
pub mod encode;

mod error;
mod ident;
mod length;
mod limits;
mod mode;
mod value;

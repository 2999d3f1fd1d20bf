//! The encoding mode.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::{Decoder, RawValue, SliceSource};
use crate::encode::{Encoder, Target};
use crate::error::{ContentError, EncodeError};
use crate::value::Value;


//------------ Mode ----------------------------------------------------------

/// The encoding rules to follow.
///
/// The mode is picked at runtime and threaded through encoding and
/// decoding. It only makes a difference in a handful of places: whether
/// indefinite length values are allowed and how strictly the identifier and
/// length octets are checked.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules. Constructed values may use the
    /// indefinite length form and length octets may contain leading zeros.
    #[default]
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding of identifier and length octets.
    Der,
}

impl Mode {
    /// Returns whether the mode is the restricted DER mode.
    pub fn is_restricted(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Returns whether indefinite length constructed values are allowed.
    pub fn allows_indefinite(self) -> bool {
        matches!(self, Mode::Ber)
    }

    /// Decodes a single value from the beginning of `data`.
    ///
    /// Returns the value and the number of octets it occupied. Any data
    /// after the value is ignored. Default limits are applied.
    pub fn decode(
        self, data: &[u8]
    ) -> Result<(RawValue, usize), ContentError> {
        self.decode_bytes(Bytes::copy_from_slice(data))
    }

    /// Decodes a single value from the beginning of a bytes value.
    ///
    /// This is identical to [`decode`][Self::decode] but the content of
    /// primitive values will refer to `data` rather than be copied.
    pub fn decode_bytes(
        self, data: Bytes
    ) -> Result<(RawValue, usize), ContentError> {
        let mut decoder = Decoder::new(SliceSource::new(data), self);
        let value = decoder.take_value()?;
        Ok((value, decoder.pos().into()))
    }

    /// Decodes `data` which must contain exactly one value.
    ///
    /// If there is data left after the value, returns a
    /// [`TrailingContent`][crate::ErrorKind::TrailingContent] error.
    pub fn decode_all(self, data: &[u8]) -> Result<RawValue, ContentError> {
        let mut decoder = Decoder::new(
            SliceSource::new(Bytes::copy_from_slice(data)), self
        );
        let value = decoder.take_value()?;
        decoder.exhausted()?;
        Ok(value)
    }

    /// Encodes a value tree into a new vec.
    pub fn encode(self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        Encoder::new(self).encode(value)
    }

    /// Encodes a value tree into the given target.
    pub fn write_encoded<T: Target>(
        self, value: &Value, target: &mut T
    ) -> Result<(), EncodeError<T::Error>> {
        Encoder::new(self).write_encoded(value, target)
    }

    /// Returns the number of octets the encoded value tree will occupy.
    pub fn encoded_len(self, value: &Value) -> Result<usize, EncodeError> {
        Encoder::new(self).encoded_len(value)
    }
}


//============ Tests =========================================================

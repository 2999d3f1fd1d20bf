//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::mem;
use smallvec::SmallVec;
use crate::decode::Source;
use crate::encode::Target;
use crate::error::{DecodeError, ErrorKind};
use crate::mode::Mode;


//------------ Length --------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # Encoding
///
/// Which form is used is determined by the most significant bit of the
/// first octet. If it is not set, the length octets are one octet long and
/// the remaining bits of this first octet provide the definite length.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 0x80, the length is indefinite. Otherwise,
/// the following octets give the big-endian encoding of the definite
/// length. The first octet 0xFF is reserved.
///
/// Under DER, a definite length must be encoded in the minimum number of
/// octets. The encoder always does that.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    /// A definite length with the number of content octets.
    Definite(usize),

    /// An indefinite length.
    Indefinite,
}

impl Length {
    /// The largest number of octets following the first octet we accept.
    const MAX_OCTETS: usize = mem::size_of::<usize>();

    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns whether the length is indefinite.
    pub fn is_indefinite(self) -> bool {
        matches!(self, Length::Indefinite)
    }

    /// Returns whether the length is definite and zero.
    pub fn is_zero(self) -> bool {
        matches!(self, Length::Definite(0))
    }

    /// Takes the length octets from the beginning of a source.
    ///
    /// Returns a [`MalformedLength`][ErrorKind::MalformedLength] error if
    /// the source ends before the length octets are complete, if they use
    /// the reserved value, or if the length doesn’t fit into a `usize`. In
    /// DER mode, a length that isn’t encoded in the minimum number of
    /// octets is rejected, too.
    ///
    /// An indefinite length is returned in either mode. It is up to the
    /// caller to decide whether it is acceptable.
    pub fn take_from<S: Source>(
        source: &mut S, mode: Mode,
    ) -> Result<Self, DecodeError<S::Error>> {
        let start = source.pos();
        let first = source.take_u8(ErrorKind::MalformedLength)?;
        let count = match first {
            // Bit 8 clear: short form.
            n if (n & 0x80) == 0 => return Ok(Length::Definite(n.into())),

            // Zero octets to follow: indefinite.
            0x80 => return Ok(Length::Indefinite),

            // Reserved.
            0xFF => {
                xerr!(return Err(DecodeError::content(
                    ErrorKind::MalformedLength, start
                )))
            }

            n => usize::from(n & 0x7F),
        };
        if count > Self::MAX_OCTETS {
            xerr!(return Err(DecodeError::content(
                ErrorKind::MalformedLength, start
            )))
        }

        let mut res = 0usize;
        for i in 0..count {
            let octet = source.take_u8(ErrorKind::MalformedLength)?;
            if i == 0 && octet == 0 && mode.is_restricted() {
                // There is a shorter encoding without the leading zero.
                xerr!(return Err(DecodeError::content(
                    ErrorKind::MalformedLength, start
                )))
            }
            res = (res << 8) | usize::from(octet);
        }
        if mode.is_restricted() && res < 0x80 {
            // The short form should have been used.
            xerr!(return Err(DecodeError::content(
                ErrorKind::MalformedLength, start
            )))
        }
        Ok(Length::Definite(res))
    }

    /// Returns the encoded length octets.
    ///
    /// A definite length always uses the shortest possible form.
    pub fn to_octets(self) -> SmallVec<[u8; 9]> {
        let mut res = SmallVec::new();
        match self {
            Length::Indefinite => res.push(0x80),
            Length::Definite(len) if len < 0x80 => res.push(len as u8),
            Length::Definite(len) => {
                let octets = len.to_be_bytes();
                let skip = (len.leading_zeros() / 8) as usize;
                res.push(((octets.len() - skip) as u8) | 0x80);
                res.extend_from_slice(&octets[skip..]);
            }
        }
        res
    }

    /// Returns the number of length octets in encoded form.
    pub fn encoded_len(self) -> usize {
        match self {
            Length::Definite(len) if len >= 0x80 => {
                1 + Self::MAX_OCTETS - (len.leading_zeros() / 8) as usize
            }
            _ => 1
        }
    }

    /// Writes the encoded length octets to a target.
    pub fn write_encoded<T: Target>(
        self, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(&self.to_octets())
    }
}

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length::Definite(len)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::SliceSource;
    use super::*;

    fn take(data: &[u8], mode: Mode) -> Result<Length, ErrorKind> {
        let mut source = SliceSource::copy_from_slice(data);
        let res = Length::take_from(&mut source, mode).map_err(|err| {
            err.kind().unwrap()
        })?;
        if source.remaining().is_empty() {
            Ok(res)
        }
        else {
            Err(ErrorKind::TrailingContent)
        }
    }

    #[test]
    fn ber_take_from() {
        assert_eq!(take(b"\x00", Mode::Ber), Ok(Length::Definite(0)));
        assert_eq!(take(b"\x12", Mode::Ber), Ok(Length::Definite(0x12)));
        assert_eq!(take(b"\x7f", Mode::Ber), Ok(Length::Definite(0x7f)));
        assert_eq!(take(b"\x80", Mode::Ber), Ok(Length::Indefinite));
        assert_eq!(take(b"\x81\x00", Mode::Ber), Ok(Length::Definite(0)));
        assert_eq!(take(b"\x81\xF0", Mode::Ber), Ok(Length::Definite(0xF0)));
        assert_eq!(
            take(b"\x82\x00\x00", Mode::Ber), Ok(Length::Definite(0))
        );
        assert_eq!(
            take(b"\x82\xF0\x0E", Mode::Ber), Ok(Length::Definite(0xF00E))
        );
        assert_eq!(
            take(b"\x82\x00\x0E", Mode::Ber), Ok(Length::Definite(0x0E))
        );
        assert_eq!(take(b"\xFF", Mode::Ber), Err(ErrorKind::MalformedLength));
    }

    #[test]
    fn der_take_from() {
        assert_eq!(take(b"\x00", Mode::Der), Ok(Length::Definite(0)));
        assert_eq!(take(b"\x7f", Mode::Der), Ok(Length::Definite(0x7f)));
        assert_eq!(take(b"\x80", Mode::Der), Ok(Length::Indefinite));
        assert_eq!(
            take(b"\x81\x00", Mode::Der), Err(ErrorKind::MalformedLength)
        );
        assert_eq!(
            take(b"\x81\x7f", Mode::Der), Err(ErrorKind::MalformedLength)
        );
        assert_eq!(take(b"\x81\x80", Mode::Der), Ok(Length::Definite(0x80)));
        assert_eq!(
            take(b"\x82\x00\x0E", Mode::Der), Err(ErrorKind::MalformedLength)
        );
        assert_eq!(
            take(b"\x82\xF0\x0E", Mode::Der), Ok(Length::Definite(0xF00E))
        );
        assert_eq!(take(b"\xFF", Mode::Der), Err(ErrorKind::MalformedLength));
    }

    #[test]
    fn malformed() {
        // Truncated.
        assert_eq!(take(b"", Mode::Ber), Err(ErrorKind::MalformedLength));
        assert_eq!(
            take(b"\x82\x01", Mode::Ber), Err(ErrorKind::MalformedLength)
        );
        // Too many octets for a usize.
        let mut data = vec![0x80 | (Length::MAX_OCTETS as u8 + 1)];
        data.extend(std::iter::repeat(1).take(Length::MAX_OCTETS + 1));
        assert_eq!(take(&data, Mode::Ber), Err(ErrorKind::MalformedLength));
    }

    #[test]
    fn encode() {
        fn step(len: Length, expected: &[u8]) {
            assert_eq!(
                len.to_octets().as_slice(), expected,
                "encoding failed for {len:?}"
            );
            assert_eq!(len.encoded_len(), expected.len());
            let mut target = Vec::new();
            len.write_encoded(&mut target).unwrap();
            assert_eq!(target, expected);
        }

        step(Length::Indefinite, b"\x80");
        step(Length::Definite(0), b"\x00");
        step(Length::Definite(0x12), b"\x12");
        step(Length::Definite(0x7f), b"\x7f");
        step(Length::Definite(0x80), b"\x81\x80");
        step(Length::Definite(0xff), b"\x81\xff");
        step(Length::Definite(0x100), b"\x82\x01\x00");
        step(Length::Definite(0xdead), b"\x82\xde\xad");
        step(Length::Definite(0x10000), b"\x83\x01\x00\x00");
    }

    #[test]
    fn round_trip() {
        for len in [0, 127, 128, 255, 256, 65535, 65536, usize::MAX] {
            let octets = Length::Definite(len).to_octets();
            assert_eq!(take(&octets, Mode::Der), Ok(Length::Definite(len)));
            assert_eq!(take(&octets, Mode::Ber), Ok(Length::Definite(len)));
        }
        let octets = Length::Indefinite.to_octets();
        assert_eq!(take(&octets, Mode::Ber), Ok(Length::Indefinite));
    }
}

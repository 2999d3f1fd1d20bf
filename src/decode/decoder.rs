//! The recursive-descent decoder.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use log::{debug, trace, warn};
use crate::error::{DecodeError, ErrorKind};
use crate::ident::{Ident, Tag};
use crate::length::Length;
use crate::limits::Limits;
use crate::mode::Mode;
use super::raw::{RawContent, RawValue};
use super::source::{Pos, Source};


//------------ Decoder -------------------------------------------------------

/// Decodes values from a source.
///
/// The decoder reads complete values, including everything nested within
/// them, and returns them as [`RawValue`] trees. It can be used to read a
/// single value via [`take_value`][Self::take_value] or a sequence of
/// concatenated values via [`next_value`][Self::next_value].
///
/// All structural rules of the selected mode are checked. Whether the
/// content of primitive values makes sense is not.
///
/// The decoder applies [`Limits`] to protect against hostile input. The
/// nesting depth of constructed values is bounded, as is the amount of
/// data inside a single indefinite length value.
#[derive(Clone, Debug)]
pub struct Decoder<S> {
    source: S,
    mode: Mode,
    limits: Limits,
}

impl<S> Decoder<S> {
    /// Creates a new decoder atop a source using default limits.
    pub fn new(source: S, mode: Mode) -> Self {
        Decoder { source, mode, limits: Limits::default() }
    }

    /// Returns the decoder with different limits.
    pub fn with_limits(self, limits: Limits) -> Self {
        Decoder { limits, ..self }
    }

    /// Returns the mode of the decoder.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the limits of the decoder.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Converts the decoder into its source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: Source> Decoder<S> {
    /// Returns the current position in the source.
    pub fn pos(&self) -> Pos {
        self.source.pos()
    }

    /// Takes the next value from the source.
    ///
    /// Returns `Ok(None)` if the source has been exhausted before the first
    /// octet of the value. If it ends anywhere else, an error is returned.
    pub fn next_value(
        &mut self
    ) -> Result<Option<RawValue>, DecodeError<S::Error>> {
        if self.source.is_exhausted()? {
            return Ok(None)
        }
        self.take_value().map(Some)
    }

    /// Takes a single value from the source.
    ///
    /// If the source is exhausted, returns a
    /// [`TruncatedContent`][ErrorKind::TruncatedContent] error.
    pub fn take_value(&mut self) -> Result<RawValue, DecodeError<S::Error>> {
        let start = self.source.pos();
        match self.take_item(0, Bounds::default(), false)? {
            Some(value) => {
                debug!(
                    "decoded {} value of {} octets in {:?} mode",
                    value.tag(),
                    usize::from(self.source.pos()) - usize::from(start),
                    self.mode
                );
                Ok(value)
            }
            None => {
                xerr!(Err(DecodeError::content(
                    ErrorKind::MalformedTag, start
                )))
            }
        }
    }

    /// Checks that the source has been exhausted.
    ///
    /// Returns a [`TrailingContent`][ErrorKind::TrailingContent] error if
    /// there is more data.
    pub fn exhausted(&mut self) -> Result<(), DecodeError<S::Error>> {
        if self.source.is_exhausted()? {
            Ok(())
        }
        else {
            xerr!(Err(self.source.content_err(ErrorKind::TrailingContent)))
        }
    }

    /// Takes the next value or end-of-contents marker.
    ///
    /// The value lives at nesting level `depth` and must stay within
    /// `bounds`. If `in_indefinite` is true, the value is directly within
    /// an indefinite length value and may be an end-of-contents marker, in
    /// which case `Ok(None)` is returned.
    fn take_item(
        &mut self, depth: usize, bounds: Bounds, in_indefinite: bool,
    ) -> Result<Option<RawValue>, DecodeError<S::Error>> {
        let start = self.source.pos();
        let ident = Ident::take_from(
            &mut self.source, self.mode, &self.limits
        )?;
        let length = Length::take_from(&mut self.source, self.mode)?;
        let header_end = usize::from(self.source.pos());
        bounds.check(header_end, start)?;

        if ident.tag() == Tag::END_OF_CONTENTS {
            if !in_indefinite || ident.is_constructed() {
                xerr!(return Err(DecodeError::content(
                    ErrorKind::MalformedTag, start
                )))
            }
            if !length.is_zero() {
                xerr!(return Err(DecodeError::content(
                    ErrorKind::MalformedLength, start
                )))
            }
            return Ok(None)
        }

        let content = match length {
            Length::Definite(len) => {
                let content_end = match header_end.checked_add(len) {
                    Some(content_end) => content_end,
                    None => {
                        xerr!(return Err(DecodeError::content(
                            ErrorKind::MalformedLength, start
                        )))
                    }
                };
                bounds.check(content_end, start)?;
                if ident.is_constructed() {
                    self.check_depth(depth, start)?;
                    self.take_definite(depth, content_end, bounds)?
                }
                else {
                    RawContent::Primitive(self.source.take_bytes(len)?)
                }
            }
            Length::Indefinite => {
                if !self.mode.allows_indefinite() || !ident.is_constructed() {
                    xerr!(return Err(DecodeError::content(
                        ErrorKind::DialectViolation, start
                    )))
                }
                self.check_depth(depth, start)?;
                self.take_indefinite(ident.tag(), depth, start, bounds)?
            }
        };
        Ok(Some(RawValue::new(ident.tag(), length, start, content)))
    }

    /// Takes the content of a definite length constructed value.
    fn take_definite(
        &mut self, depth: usize, content_end: usize, bounds: Bounds,
    ) -> Result<RawContent, DecodeError<S::Error>> {
        let bounds = Bounds { end: Some(content_end), ..bounds };
        let mut children = Vec::new();
        loop {
            let pos = usize::from(self.source.pos());
            if pos >= content_end {
                break
            }
            if content_end - pos < 2 {
                // Not even room for identifier and length octets.
                xerr!(return Err(
                    self.source.content_err(ErrorKind::TrailingContent)
                ))
            }
            children.extend(self.take_item(depth + 1, bounds, false)?);
        }
        Ok(RawContent::Constructed(children))
    }

    /// Takes the content of an indefinite length value.
    ///
    /// This includes the end-of-contents marker. The children must end
    /// within `max_scan` octets of the start of the content so that the
    /// source is never read further than that. The end-of-contents marker
    /// may follow right after.
    fn take_indefinite(
        &mut self, tag: Tag, depth: usize, start: Pos, bounds: Bounds,
    ) -> Result<RawContent, DecodeError<S::Error>> {
        trace!("entering indefinite length {} at {}", tag, start);
        let content_start = usize::from(self.source.pos());
        let scan_end = content_start
            .saturating_add(self.limits.max_scan)
            .saturating_add(2);
        let bounds = Bounds {
            scan_end: Some(
                bounds.scan_end.map_or(scan_end, |outer| outer.min(scan_end))
            ),
            ..bounds
        };
        let mut children = Vec::new();
        loop {
            let pos = usize::from(self.source.pos());
            if bounds.end.map(|end| pos + 2 > end).unwrap_or(false) {
                xerr!(return Err(DecodeError::content(
                    ErrorKind::UnterminatedIndefiniteLength, start
                )))
            }
            bounds.check(pos + 2, pos.into())?;
            if self.source.is_exhausted()? {
                xerr!(return Err(DecodeError::content(
                    ErrorKind::UnterminatedIndefiniteLength, start
                )))
            }
            match self.take_item(depth + 1, bounds, true)? {
                Some(child) => children.push(child),
                None => break,
            }
        }
        trace!(
            "leaving indefinite length {} at {} after {} octets",
            tag, start, usize::from(self.source.pos()) - content_start
        );
        Ok(RawContent::Constructed(children))
    }

    fn check_depth(
        &self, depth: usize, start: Pos
    ) -> Result<(), DecodeError<S::Error>> {
        if depth >= self.limits.max_depth {
            warn!(
                "value at {} exceeds nesting depth limit of {}",
                start, self.limits.max_depth
            );
            xerr!(return Err(DecodeError::content(
                ErrorKind::DepthLimitExceeded, start
            )))
        }
        Ok(())
    }
}


//------------ Bounds --------------------------------------------------------

/// The positions a value being decoded must not cross.
#[derive(Clone, Copy, Debug, Default)]
struct Bounds {
    /// The end of the content of the closest enclosing definite value.
    end: Option<usize>,

    /// The end of the scan budget of the enclosing indefinite values.
    scan_end: Option<usize>,
}

impl Bounds {
    /// Checks that `pos` is within the bounds.
    ///
    /// The error is reported for the value starting at `start`.
    fn check<E: std::error::Error + 'static>(
        self, pos: usize, start: Pos
    ) -> Result<(), DecodeError<E>> {
        if self.end.map(|end| pos > end).unwrap_or(false) {
            xerr!(return Err(DecodeError::content(
                ErrorKind::TruncatedContent, start
            )))
        }
        if let Some(scan_end) = self.scan_end {
            if pos > scan_end {
                warn!(
                    "value at {} exceeds indefinite length scan limit",
                    start
                );
                xerr!(return Err(DecodeError::content(
                    ErrorKind::ScanLimitExceeded, start
                )))
            }
        }
        Ok(())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::io::{self, Read};
    use crate::decode::{ReaderSource, SliceSource};
    use super::*;

    fn decoder(data: &'static [u8], mode: Mode) -> Decoder<SliceSource> {
        Decoder::new(SliceSource::from(data), mode)
    }

    #[test]
    fn next_value() {
        let mut decoder = decoder(b"\x02\x01\x01\x05\x00", Mode::Der);
        let value = decoder.next_value().unwrap().unwrap();
        assert_eq!(value.tag(), Tag::INTEGER);
        assert_eq!(&value.primitive().unwrap()[..], b"\x01");
        let value = decoder.next_value().unwrap().unwrap();
        assert_eq!(value.tag(), Tag::NULL);
        assert_eq!(value.start(), Pos::from(3));
        assert!(decoder.next_value().unwrap().is_none());
        assert_eq!(
            decoder.take_value().unwrap_err().kind(),
            Some(ErrorKind::TruncatedContent)
        );
    }

    #[test]
    fn exhausted() {
        let mut decoder = decoder(b"\x05\x00\x05", Mode::Ber);
        decoder.take_value().unwrap();
        assert_eq!(
            decoder.exhausted().unwrap_err().kind(),
            Some(ErrorKind::TrailingContent)
        );
    }

    #[test]
    fn end_of_contents() {
        // Outside an indefinite length value.
        assert_eq!(
            decoder(b"\x00\x00", Mode::Ber).take_value().unwrap_err().kind(),
            Some(ErrorKind::MalformedTag)
        );
        assert_eq!(
            decoder(b"\x30\x02\x00\x00", Mode::Ber).take_value()
                .unwrap_err().kind(),
            Some(ErrorKind::MalformedTag)
        );
        // With content.
        assert_eq!(
            decoder(b"\x30\x80\x00\x01\x00\x00\x00", Mode::Ber).take_value()
                .unwrap_err().kind(),
            Some(ErrorKind::MalformedLength)
        );
        // Constructed.
        assert_eq!(
            decoder(b"\x30\x80\x20\x00", Mode::Ber).take_value()
                .unwrap_err().kind(),
            Some(ErrorKind::MalformedTag)
        );
    }

    #[test]
    fn indefinite_primitive() {
        assert_eq!(
            decoder(b"\x04\x80\x00\x00", Mode::Ber).take_value()
                .unwrap_err().kind(),
            Some(ErrorKind::DialectViolation)
        );
    }

    #[test]
    fn scan_limit() {
        let data = b"\x30\x80\x04\x02ab\x04\x02cd\x00\x00";
        let limits = Limits::default().with_max_scan(4);
        assert_eq!(
            decoder(data, Mode::Ber).with_limits(limits).take_value()
                .unwrap_err().kind(),
            Some(ErrorKind::ScanLimitExceeded)
        );
        let limits = Limits::default().with_max_scan(8);
        assert!(
            decoder(data, Mode::Ber).with_limits(limits).take_value().is_ok()
        );
    }

    #[test]
    fn scan_limit_bounds_reading() {
        struct Counting<'a> {
            data: &'a [u8],
            taken: usize,
        }

        impl io::Read for Counting<'_> {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let len = self.data.read(buf)?;
                self.taken += len;
                Ok(len)
            }
        }

        // A primitive of 4 MiB inside an indefinite length value.
        let mut data = b"\x30\x80\x04\x83\x40\x00\x00".to_vec();
        data.resize(data.len() + 0x40_0000, 0);
        data.extend_from_slice(b"\x00\x00");

        let mut reader = Counting { data: &data, taken: 0 };
        let err = Decoder::new(ReaderSource::new(&mut reader), Mode::Ber)
            .with_limits(Limits::default().with_max_scan(16))
            .take_value().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ScanLimitExceeded));
        assert!(reader.taken <= 16);

        // Nested indefinite values share the outer budget.
        let data = b"\x30\x80\x30\x80\x04\x04abcd\x00\x00\x00\x00";
        let limits = Limits::default().with_max_scan(6);
        assert_eq!(
            decoder(data, Mode::Ber).with_limits(limits).take_value()
                .unwrap_err().kind(),
            Some(ErrorKind::ScanLimitExceeded)
        );
        let limits = Limits::default().with_max_scan(10);
        assert!(
            decoder(data, Mode::Ber).with_limits(limits).take_value().is_ok()
        );
    }
}

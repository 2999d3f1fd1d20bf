//! Decoding encoded data.
//!
//! Data is read from a [`Source`]. Two implementations are provided:
//! [`SliceSource`] for data that is already in memory and [`ReaderSource`]
//! for reading from anything implementing `std::io::Read`.
//!
//! A [`Decoder`] reads complete values from a source and turns them into
//! trees of [`RawValue`]s. It checks the structure of the data according to
//! the selected [`Mode`][crate::Mode] and applies
//! [`Limits`][crate::Limits] against hostile input. Errors carry the
//! position in the source where the offending value started.
//!
//! For the common case of decoding a single value from a slice, use
//! [`Mode::decode`][crate::Mode::decode] or
//! [`Mode::decode_all`][crate::Mode::decode_all].

pub use self::decoder::Decoder;
pub use self::raw::{RawContent, RawValue};
pub use self::source::{Pos, ReaderSource, SliceSource, Source};

mod decoder;
mod raw;
mod source;
mod test;

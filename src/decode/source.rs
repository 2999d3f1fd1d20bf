//! The source for decoding.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use std::{error, fmt, io, ops};
use std::convert::Infallible;
use std::io::Read;
use bytes::{Buf, Bytes};
use crate::error::{DecodeError, ErrorKind};


//------------ Source --------------------------------------------------------

/// A view into a sequence of octets.
///
/// Sources form the foundation of decoding. They provide the raw octets to
/// decoders. A source is a cursor: it has a current position and can make
/// a number of octets after that position available through
/// [`request`][Self::request] and then be advanced over some or all of
/// them.
pub trait Source {
    /// The error produced when the source fails to read more data.
    type Error: error::Error + 'static;

    /// Returns the current logical position within the source.
    fn pos(&self) -> Pos;

    /// Requests at least `len` octets to be available.
    ///
    /// Returns the number of octets that are available now. This is less
    /// than `len` only if the source has come to its end.
    fn request(&mut self, len: usize) -> Result<usize, Self::Error>;

    /// Returns the octets currently available.
    fn slice(&self) -> &[u8];

    /// Returns a bytes value with a range of the available octets.
    ///
    /// The range is given relative to the current position and must be
    /// within what has been made available by the last request.
    fn bytes(&self, start: usize, end: usize) -> Bytes;

    /// Advances the source by `len` octets.
    ///
    /// # Panics
    ///
    /// The method may panic if `len` is more than what was made available
    /// by the last request.
    fn advance(&mut self, len: usize);


    //--- Provided methods

    /// Returns whether there is no more data in the source.
    fn is_exhausted(&mut self) -> Result<bool, DecodeError<Self::Error>> {
        Ok(self.request(1).map_err(DecodeError::from_source)? == 0)
    }

    /// Takes a single octet from the source.
    ///
    /// If there aren’t any more octets available, returns a content error
    /// of the given kind.
    fn take_u8(
        &mut self, kind: ErrorKind
    ) -> Result<u8, DecodeError<Self::Error>> {
        if self.request(1).map_err(DecodeError::from_source)? < 1 {
            xerr!(return Err(self.content_err(kind)))
        }
        let res = self.slice()[0];
        self.advance(1);
        Ok(res)
    }

    /// Takes the next `len` octets from the source.
    ///
    /// If less octets are available, returns a
    /// [`TruncatedContent`][ErrorKind::TruncatedContent] error.
    fn take_bytes(
        &mut self, len: usize
    ) -> Result<Bytes, DecodeError<Self::Error>> {
        if self.request(len).map_err(DecodeError::from_source)? < len {
            xerr!(return Err(self.content_err(ErrorKind::TruncatedContent)))
        }
        let res = self.bytes(0, len);
        self.advance(len);
        Ok(res)
    }

    /// Returns a content error at the current position of the source.
    fn content_err(&self, kind: ErrorKind) -> DecodeError<Self::Error> {
        DecodeError::content(kind, self.pos())
    }
}

impl<S: Source + ?Sized> Source for &'_ mut S {
    type Error = S::Error;

    fn pos(&self) -> Pos {
        (**self).pos()
    }

    fn request(&mut self, len: usize) -> Result<usize, Self::Error> {
        (**self).request(len)
    }

    fn slice(&self) -> &[u8] {
        (**self).slice()
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        (**self).bytes(start, end)
    }

    fn advance(&mut self, len: usize) {
        (**self).advance(len)
    }
}


//------------ SliceSource ---------------------------------------------------

/// A source atop data that is already in memory.
///
/// The data is kept as a [`Bytes`] value, so the content of decoded
/// primitive values shares the underlying memory rather than being copied.
#[derive(Clone, Debug)]
pub struct SliceSource {
    data: Bytes,
    pos: usize,
}

impl SliceSource {
    /// Creates a new source from a bytes value.
    pub fn new(data: Bytes) -> Self {
        SliceSource { data, pos: 0 }
    }

    /// Creates a new source from a copy of a slice.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Returns the data not yet advanced over.
    pub fn remaining(&self) -> &[u8] {
        self.data.as_ref()
    }
}

impl From<Bytes> for SliceSource {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<&'static [u8]> for SliceSource {
    fn from(data: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(data))
    }
}

impl Source for SliceSource {
    type Error = Infallible;

    fn pos(&self) -> Pos {
        self.pos.into()
    }

    fn request(&mut self, _len: usize) -> Result<usize, Self::Error> {
        Ok(self.data.len())
    }

    fn slice(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        self.data.slice(start..end)
    }

    fn advance(&mut self, len: usize) {
        self.data.advance(len);
        self.pos += len;
    }
}


//------------ ReaderSource --------------------------------------------------

/// A source reading from an [`io::Read`] value.
///
/// The source only reads as much data as is requested, so values can be
/// decoded one after another from a stream. It never allocates memory for
/// data the reader hasn’t actually delivered. A length announced by the
/// encoded data therefore can’t be used to exhaust memory.
pub struct ReaderSource<R> {
    reader: R,
    buf: Vec<u8>,
    pos: usize,
}

impl<R> ReaderSource<R> {
    /// Creates a new source from a reader.
    pub fn new(reader: R) -> Self {
        ReaderSource { reader, buf: Vec::new(), pos: 0 }
    }

    /// Converts the source back into the reader.
    ///
    /// Any data already read from the reader but not yet advanced over is
    /// lost.
    pub fn into_reader(self) -> R {
        self.reader
    }
}

impl<R: io::Read> Source for ReaderSource<R> {
    type Error = io::Error;

    fn pos(&self) -> Pos {
        self.pos.into()
    }

    fn request(&mut self, len: usize) -> Result<usize, Self::Error> {
        let cur_len = self.buf.len();
        if cur_len < len {
            let missing = (len - cur_len) as u64;
            (&mut self.reader).take(missing).read_to_end(&mut self.buf)?;
        }
        Ok(self.buf.len())
    }

    fn slice(&self) -> &[u8] {
        &self.buf
    }

    fn bytes(&self, start: usize, end: usize) -> Bytes {
        Bytes::copy_from_slice(&self.buf[start..end])
    }

    fn advance(&mut self, len: usize) {
        self.buf.drain(..len);
        self.pos += len;
    }
}

impl<R> fmt::Debug for ReaderSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ReaderSource")
            .field("buffered", &self.buf.len())
            .field("pos", &self.pos)
            .finish()
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// This is the number of octets the source has been advanced over since it
/// was created. It is mostly used to tell where in the data an error was
/// encountered.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl From<Pos> for usize {
    fn from(pos: Pos) -> usize {
        pos.0
    }
}

impl ops::Add for Pos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Pos(self.0 + rhs.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================

//! Decoded values.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.

use bytes::Bytes;
use crate::error::{ContentError, ErrorKind};
use crate::ident::Tag;
use crate::length::Length;
use crate::value::{Constructed, Framing, Value};
use super::source::Pos;


//------------ RawValue ------------------------------------------------------

/// A decoded value.
///
/// A raw value is what the decoder can tell from the encoded data alone:
/// the tag, whether the value is primitive or constructed, the length form
/// used, and the content. For a constructed value, the content has been
/// decoded into a sequence of raw values.
///
/// In particular, the encoded data doesn’t reveal whether a context
/// specific tag was applied explicitly or implicitly. A constructed value
/// `A0 03 02 01 02` could be an explicitly tagged INTEGER or an implicitly
/// tagged SEQUENCE containing one. The schema layer, which knows which of
/// the two to expect, resolves this via [`into_explicit`][Self::into_explicit]
/// or [`into_implicit`][Self::into_implicit].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawValue {
    tag: Tag,
    length: Length,
    start: Pos,
    content: RawContent,
}

/// The content of a decoded value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RawContent {
    /// The content octets of a primitive value.
    Primitive(Bytes),

    /// The values contained in a constructed value.
    Constructed(Vec<RawValue>),
}

impl RawValue {
    pub(super) fn new(
        tag: Tag, length: Length, start: Pos, content: RawContent
    ) -> Self {
        RawValue { tag, length, start, content }
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the value is constructed.
    pub fn is_constructed(&self) -> bool {
        matches!(self.content, RawContent::Constructed(_))
    }

    /// Returns the length octets as they appeared in the data.
    pub fn length(&self) -> Length {
        self.length
    }

    /// Returns the position of the first identifier octet.
    pub fn start(&self) -> Pos {
        self.start
    }

    /// Returns the content.
    pub fn content(&self) -> &RawContent {
        &self.content
    }

    /// Converts the value into its content.
    pub fn into_content(self) -> RawContent {
        self.content
    }

    /// Returns the content octets if this is a primitive value.
    pub fn primitive(&self) -> Option<&Bytes> {
        match self.content {
            RawContent::Primitive(ref content) => Some(content),
            RawContent::Constructed(_) => None,
        }
    }

    /// Returns the contained values if this is a constructed value.
    pub fn children(&self) -> Option<&[RawValue]> {
        match self.content {
            RawContent::Primitive(_) => None,
            RawContent::Constructed(ref children) => Some(children),
        }
    }

    /// Interprets the value as explicitly tagged and returns the inner value.
    ///
    /// An explicitly tagged value is constructed and contains exactly one
    /// value. If the value is primitive, a
    /// [`MalformedTag`][ErrorKind::MalformedTag] error is returned. If it is
    /// empty, the error is [`TruncatedContent`][ErrorKind::TruncatedContent],
    /// if it contains more than one value it is
    /// [`TrailingContent`][ErrorKind::TrailingContent].
    pub fn into_explicit(self) -> Result<RawValue, ContentError> {
        let mut children = match self.content {
            RawContent::Constructed(children) => children.into_iter(),
            RawContent::Primitive(_) => {
                xerr!(return Err(ContentError::new(
                    ErrorKind::MalformedTag, self.start
                )))
            }
        };
        let inner = match children.next() {
            Some(inner) => inner,
            None => {
                xerr!(return Err(ContentError::new(
                    ErrorKind::TruncatedContent, self.start
                )))
            }
        };
        if let Some(next) = children.next() {
            xerr!(return Err(ContentError::new(
                ErrorKind::TrailingContent, next.start
            )))
        }
        Ok(inner)
    }

    /// Interprets the value as implicitly tagged.
    ///
    /// Returns the value with its tag replaced by `tag` which should be the
    /// tag the value had before it was implicitly tagged.
    pub fn into_implicit(self, tag: Tag) -> RawValue {
        RawValue { tag, ..self }
    }

    /// Converts the value into a value tree for encoding.
    ///
    /// The length forms of constructed values are kept, so encoding the
    /// returned tree produces the data the value was decoded from provided
    /// that data used minimal length octets.
    pub fn to_value(&self) -> Value {
        match self.content {
            RawContent::Primitive(ref content) => {
                Value::primitive(self.tag, content.clone())
            }
            RawContent::Constructed(ref children) => {
                let framing = if self.length.is_indefinite() {
                    Framing::Indefinite
                }
                else {
                    Framing::Definite
                };
                Constructed::new(
                    self.tag,
                    children.iter().map(RawValue::to_value).collect()
                ).with_framing(framing).into()
            }
        }
    }
}


//============ Tests =========================================================

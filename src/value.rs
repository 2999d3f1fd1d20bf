//! Value trees for encoding.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::ident::Tag;


//------------ Value ---------------------------------------------------------

/// A value to be encoded.
///
/// Values form a tree. Leafs are [`Primitive`] values that contain opaque
/// content octets. Inner nodes are either [`Constructed`] values that
/// contain an ordered sequence of child values, or [`Tagged`] values that
/// apply a different tag to exactly one inner value.
///
/// A value tree is built by the schema layer and then handed to the
/// encoder, usually via [`Mode::encode`][crate::Mode::encode]. The encoder
/// only ever borrows the tree, so it cannot change while being encoded.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    /// A primitive value.
    Primitive(Primitive),

    /// A constructed value with a sequence of child values.
    Constructed(Constructed),

    /// A value with an explicit or implicit tag.
    Tagged(Tagged),
}

impl Value {
    /// Creates a primitive value.
    pub fn primitive(tag: Tag, content: impl Into<Bytes>) -> Self {
        Value::Primitive(Primitive::new(tag, content))
    }

    /// Creates a definite length constructed value.
    pub fn constructed(tag: Tag, children: Vec<Value>) -> Self {
        Value::Constructed(Constructed::new(tag, children))
    }

    /// Creates a definite length SEQUENCE.
    pub fn sequence(children: Vec<Value>) -> Self {
        Self::constructed(Tag::SEQUENCE, children)
    }

    /// Creates a definite length SET.
    ///
    /// The children are encoded in the order given. Sorting them as
    /// required by DER is left to the caller.
    pub fn set(children: Vec<Value>) -> Self {
        Self::constructed(Tag::SET, children)
    }

    /// Wraps a value into an explicit tag.
    pub fn explicit(tag: Tag, inner: Value) -> Self {
        Value::Tagged(Tagged::explicit(tag, inner))
    }

    /// Wraps a value into an explicit tag using the indefinite length form.
    ///
    /// This is how the basic rules commonly encode explicit tags. The
    /// resulting value can only be encoded in BER mode.
    pub fn explicit_indefinite(tag: Tag, inner: Value) -> Self {
        Value::Tagged(
            Tagged::explicit(tag, inner).with_framing(Framing::Indefinite)
        )
    }

    /// Replaces the tag of a value.
    pub fn implicit(tag: Tag, inner: Value) -> Self {
        Value::Tagged(Tagged::implicit(tag, inner))
    }

    /// Returns the value with a different framing.
    ///
    /// This has no effect on primitive values which always use the
    /// definite length form.
    pub fn with_framing(self, framing: Framing) -> Self {
        match self {
            Value::Primitive(inner) => Value::Primitive(inner),
            Value::Constructed(inner) => {
                Value::Constructed(inner.with_framing(framing))
            }
            Value::Tagged(inner) => Value::Tagged(inner.with_framing(framing))
        }
    }

    /// Returns the value using the indefinite length form.
    ///
    /// This is a shortcut for `self.with_framing(Framing::Indefinite)`.
    pub fn indefinite(self) -> Self {
        self.with_framing(Framing::Indefinite)
    }

    /// Returns the tag the value will be encoded with.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Primitive(inner) => inner.tag(),
            Value::Constructed(inner) => inner.tag(),
            Value::Tagged(inner) => inner.tag(),
        }
    }

    /// Returns whether the value will be encoded as a constructed value.
    pub fn is_constructed(&self) -> bool {
        match self {
            Value::Primitive(_) => false,
            Value::Constructed(_) => true,
            Value::Tagged(inner) => inner.is_constructed(),
        }
    }

    /// Returns the length form the value asks to be encoded with.
    pub fn framing(&self) -> Framing {
        match self {
            Value::Primitive(_) => Framing::Definite,
            Value::Constructed(inner) => inner.framing(),
            Value::Tagged(inner) => inner.framing(),
        }
    }
}

impl From<Primitive> for Value {
    fn from(src: Primitive) -> Self {
        Value::Primitive(src)
    }
}

impl From<Constructed> for Value {
    fn from(src: Constructed) -> Self {
        Value::Constructed(src)
    }
}

impl From<Tagged> for Value {
    fn from(src: Tagged) -> Self {
        Value::Tagged(src)
    }
}


//------------ Framing -------------------------------------------------------

/// The length form used for a constructed value.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Framing {
    /// The length octets contain the length of the content.
    #[default]
    Definite,

    /// The length is indefinite and the content ends with end-of-contents.
    ///
    /// This is only allowed in BER.
    Indefinite,
}


//------------ Primitive -----------------------------------------------------

/// A primitive value.
///
/// The content octets are opaque to the encoder. Interpreting them is the
/// business of the schema layer.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Primitive {
    tag: Tag,
    content: Bytes,
}

impl Primitive {
    /// Creates a new primitive value from tag and content.
    pub fn new(tag: Tag, content: impl Into<Bytes>) -> Self {
        Primitive { tag, content: content.into() }
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the content octets.
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}


//------------ Constructed ---------------------------------------------------

/// A constructed value.
///
/// The content of the value is the encoding of each of its children in
/// order. The value exclusively owns its children.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Constructed {
    tag: Tag,
    framing: Framing,
    children: Vec<Value>,
}

impl Constructed {
    /// Creates a new definite length constructed value.
    pub fn new(tag: Tag, children: Vec<Value>) -> Self {
        Constructed { tag, framing: Framing::Definite, children }
    }

    /// Returns the value with a different framing.
    pub fn with_framing(self, framing: Framing) -> Self {
        Constructed { framing, ..self }
    }

    /// Appends a child value.
    pub fn push(&mut self, child: impl Into<Value>) {
        self.children.push(child.into())
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the framing of the value.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Returns the children of the value.
    pub fn children(&self) -> &[Value] {
        &self.children
    }

    /// Converts the value into its children.
    pub fn into_children(self) -> Vec<Value> {
        self.children
    }
}


//------------ Tagged --------------------------------------------------------

/// A value with a context-dependent tag.
///
/// There are two ways of tagging a value. With explicit tagging, the inner
/// value is encoded in full and becomes the sole content of an additional
/// constructed value with the new tag. The outer value is constructed no
/// matter what the inner value is. With implicit tagging, the identifier
/// octets of the inner value are replaced. The content stays as is and so
/// the outer value is constructed only if the inner value is.
///
/// Because implicit tagging loses the original tag, a decoder can only
/// reverse it if it knows what to expect.
///
/// The framing of a tagged value determines the length form of the outer
/// value. For an explicit tag, it defaults to the definite form. For an
/// implicit tag, it defaults to whatever the inner value asked for, since
/// the outer value takes the inner value’s place.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tagged {
    tag: Tag,
    explicit: bool,
    framing: Framing,
    inner: Box<Value>,
}

impl Tagged {
    /// Creates a new tagged value.
    pub fn new(tag: Tag, explicit: bool, inner: impl Into<Value>) -> Self {
        let inner = inner.into();
        let framing = if explicit {
            Framing::Definite
        }
        else {
            inner.framing()
        };
        Tagged { tag, explicit, framing, inner: Box::new(inner) }
    }

    /// Creates an explicitly tagged value.
    pub fn explicit(tag: Tag, inner: impl Into<Value>) -> Self {
        Self::new(tag, true, inner)
    }

    /// Creates an implicitly tagged value.
    pub fn implicit(tag: Tag, inner: impl Into<Value>) -> Self {
        Self::new(tag, false, inner)
    }

    /// Creates an implicitly tagged empty SEQUENCE.
    ///
    /// This encodes as an empty constructed value with the given tag.
    pub fn empty(tag: Tag) -> Self {
        Self::implicit(tag, Constructed::new(Tag::SEQUENCE, Vec::new()))
    }

    /// Returns the value with a different framing.
    ///
    /// An implicitly tagged primitive value cannot use the indefinite form.
    /// Encoding such a value fails with an
    /// [`UnsupportedDialectCombination`][crate::ErrorKind::UnsupportedDialectCombination]
    /// error.
    pub fn with_framing(self, framing: Framing) -> Self {
        Tagged { framing, ..self }
    }

    /// Returns the tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the tag is explicit.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Returns the framing of the outer value.
    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Returns whether the value will be encoded as constructed.
    pub fn is_constructed(&self) -> bool {
        self.explicit || self.inner.is_constructed()
    }

    /// Returns the inner value.
    pub fn inner(&self) -> &Value {
        &self.inner
    }

    /// Converts the tagged value into its inner value.
    pub fn into_inner(self) -> Value {
        *self.inner
    }
}


//============ Tests =========================================================

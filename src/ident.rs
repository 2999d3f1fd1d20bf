//! The identifier octets of an encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::fmt;
use crate::decode::Source;
use crate::encode::Target;
use crate::error::{DecodeError, ErrorKind};
use crate::limits::Limits;
use crate::mode::Mode;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// Tags consist of one of four classes, represented by the [`Class`] enum,
/// and a number within this class. In the encoded form, the tag becomes part
/// of the identifier octets where it is combined with a bit signalling
/// whether the value is primitive or constructed. That combination is
/// represented by [`Ident`].
///
/// # Limitations
///
/// Only tag numbers that fit into a `u32` are supported.
//
//  Internally, the tag is kept as the identifier octets of a primitive value
//  with the same tag.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Tag(Ident);

impl Tag {
    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Self(Ident::new(class, false, number))
    }

    /// Creates a tag checking the number against a maximum.
    ///
    /// Returns an [`InvalidTagNumber`][ErrorKind::InvalidTagNumber] error if
    /// `number` is larger than `max`.
    pub fn checked(
        class: Class, number: u32, max: u32
    ) -> Result<Self, ErrorKind> {
        if number > max {
            xerr!(Err(ErrorKind::InvalidTagNumber))
        }
        else {
            Ok(Self::new(class, number))
        }
    }

    /// Creates a tag in the universal class.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a tag in the application class.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a tag in the context-specific class.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a tag in the private class.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.0.class()
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.0.number()
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690. Only the tags commonly found
/// in certificate and key data are listed here. Others can be created via
/// [`Tag::universal`].
impl Tag {
    /// The tag of the end-of-contents marker, UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::universal(10);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::universal(23);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::universal(24);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::END_OF_CONTENTS => write!(f, "END-OF-CONTENTS"),
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({} - {:?})", self, self.0.as_slice())
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// The identifier octets combine the tag with the flag that tells whether
/// the value is constructed. The first octet carries the class in bits 8
/// and 7, the constructed flag in bit 6, and a tag number below 31 in bits
/// 5 to 1. Larger tag numbers set bits 5 to 1 of the first octet and follow
/// it with the number in base 128, most significant digit first, with bit 8
/// set in all but the last octet.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ident(I);

/// The octets of the identifier, sized by the number of octets.
///
/// A `u32` tag number needs at most five continuation octets.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
enum I {
    L1([u8; 1]),
    L2([u8; 2]),
    L3([u8; 3]),
    L4([u8; 4]),
    L5([u8; 5]),
    L6([u8; 6]),
}

impl Ident {
    /// The identifier of the end-of-contents marker.
    pub const END_OF_CONTENTS: Self = Self::new(Class::Universal, false, 0);

    /// The bit marking a constructed value in the first octet.
    const CONSTRUCTED: u8 = 0x20;

    /// The value of bits 5 to 1 of the first octet for the long form.
    const LONG_FORM: u8 = 0x1f;

    /// Creates the identifier octets for class, constructed flag and number.
    const fn new(class: Class, constructed: bool, number: u32) -> Self {
        let first = if constructed {
            class.into_u8() | Self::CONSTRUCTED
        }
        else {
            class.into_u8()
        };

        if number < Self::LONG_FORM as u32 {
            return Self(I::L1([first | number as u8]))
        }

        let first = first | Self::LONG_FORM;

        // Peel off seven bits at a time, starting at the least significant
        // end. Every octet but the last one gets its top bit set.
        let n0 = (number & 0x7F) as u8;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L2([first, n0]))
        }

        let n1 = (number as u8) | 0x80;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L3([first, n1, n0]))
        }

        let n2 = (number as u8) | 0x80;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L4([first, n2, n1, n0]))
        }

        let n3 = (number as u8) | 0x80;
        let number = number >> 7;
        if number == 0 {
            return Self(I::L5([first, n3, n2, n1, n0]))
        }

        let n4 = (number as u8) | 0x80;
        Self(I::L6([first, n4, n3, n2, n1, n0]))
    }

    /// Creates identifier octets from a tag and the constructed flag.
    pub const fn from_tag(tag: Tag, constructed: bool) -> Self {
        if constructed {
            tag.0.with_first(tag.0.first() | Self::CONSTRUCTED)
        }
        else {
            tag.0
        }
    }

    /// Returns the tag of the identifier octets.
    pub const fn tag(self) -> Tag {
        Tag(self.with_first(self.first() & !Self::CONSTRUCTED))
    }

    /// Returns the class of the identifier octets.
    pub const fn class(self) -> Class {
        Class::from_u8(self.first())
    }

    /// Returns whether the identifier octets signal a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.first() & Self::CONSTRUCTED != 0
    }

    /// Returns the tag number.
    pub const fn number(self) -> u32 {
        match self.0 {
            I::L1([x]) => (x & Self::LONG_FORM) as u32,
            I::L2([_, x0]) => x0 as u32,
            I::L3([_, x1, x0]) => {
                  ((x1 & 0x7f) as u32) << 7
                | (x0 as u32)
            }
            I::L4([_, x2, x1, x0]) => {
                  ((x2 & 0x7f) as u32) << 14
                | ((x1 & 0x7f) as u32) << 7
                | (x0 as u32)
            }
            I::L5([_, x3, x2, x1, x0]) => {
                  ((x3 & 0x7f) as u32) << 21
                | ((x2 & 0x7f) as u32) << 14
                | ((x1 & 0x7f) as u32) << 7
                | (x0 as u32)
            }
            I::L6([_, x4, x3, x2, x1, x0]) => {
                  ((x4 & 0x0f) as u32) << 28
                | ((x3 & 0x7f) as u32) << 21
                | ((x2 & 0x7f) as u32) << 14
                | ((x1 & 0x7f) as u32) << 7
                | (x0 as u32)
            }
        }
    }

    /// Returns the encoded identifier octets.
    pub const fn as_slice(&self) -> &[u8] {
        match &self.0 {
            I::L1(arr) => arr.as_slice(),
            I::L2(arr) => arr.as_slice(),
            I::L3(arr) => arr.as_slice(),
            I::L4(arr) => arr.as_slice(),
            I::L5(arr) => arr.as_slice(),
            I::L6(arr) => arr.as_slice(),
        }
    }

    /// Returns the number of identifier octets.
    pub const fn encoded_len(self) -> usize {
        self.as_slice().len()
    }

    /// Returns the first octet.
    const fn first(self) -> u8 {
        match self.0 {
            I::L1([x]) => x,
            I::L2([x, ..]) => x,
            I::L3([x, ..]) => x,
            I::L4([x, ..]) => x,
            I::L5([x, ..]) => x,
            I::L6([x, ..]) => x,
        }
    }

    /// Returns a copy of the identifier with a different first octet.
    const fn with_first(self, first: u8) -> Self {
        Self(match self.0 {
            I::L1([_]) => I::L1([first]),
            I::L2([_, x0]) => I::L2([first, x0]),
            I::L3([_, x1, x0]) => I::L3([first, x1, x0]),
            I::L4([_, x2, x1, x0]) => I::L4([first, x2, x1, x0]),
            I::L5([_, x3, x2, x1, x0]) => I::L5([first, x3, x2, x1, x0]),
            I::L6([_, x4, x3, x2, x1, x0]) => {
                I::L6([first, x4, x3, x2, x1, x0])
            }
        })
    }

    /// Takes the identifier octets from the beginning of a source.
    ///
    /// If the source is already exhausted, returns a
    /// [`TruncatedContent`][ErrorKind::TruncatedContent] error. If it ends
    /// in the middle of the identifier or the identifier is not correctly
    /// encoded, returns a [`MalformedTag`][ErrorKind::MalformedTag] error.
    /// If the tag number is larger than permitted by `limits`, returns an
    /// [`InvalidTagNumber`][ErrorKind::InvalidTagNumber] error.
    pub fn take_from<S: Source>(
        source: &mut S, mode: Mode, limits: &Limits,
    ) -> Result<Self, DecodeError<S::Error>> {
        let start = source.pos();
        let res = Self::take_octets(source)?;
        if mode.is_restricted() {
            // DER wants the short form whenever it fits.
            if !matches!(res.0, I::L1(_))
                && res.number() < Self::LONG_FORM as u32
            {
                xerr!(return Err(DecodeError::content(
                    ErrorKind::MalformedTag, start
                )))
            }
        }
        if res.number() > limits.max_tag_number {
            xerr!(return Err(DecodeError::content(
                ErrorKind::InvalidTagNumber, start
            )))
        }
        Ok(res)
    }

    /// Takes the identifier octets without checking mode and limits.
    fn take_octets<S: Source>(
        source: &mut S
    ) -> Result<Self, DecodeError<S::Error>> {
        let start = source.pos();
        let first = source.take_u8(ErrorKind::TruncatedContent)?;

        if (first & Self::LONG_FORM) != Self::LONG_FORM {
            return Ok(Self(I::L1([first])))
        }

        let x0 = source.take_u8(ErrorKind::MalformedTag)?;
        if x0 & 0x7F == 0 {
            // Leading zero digit: the number isn’t encoded minimally.
            xerr!(return Err(DecodeError::content(
                ErrorKind::MalformedTag, start
            )))
        }
        if (x0 & 0x80) == 0 {
            return Ok(Self(I::L2([first, x0])))
        }

        let x1 = source.take_u8(ErrorKind::MalformedTag)?;
        if (x1 & 0x80) == 0 {
            return Ok(Self(I::L3([first, x0, x1])))
        }

        let x2 = source.take_u8(ErrorKind::MalformedTag)?;
        if (x2 & 0x80) == 0 {
            return Ok(Self(I::L4([first, x0, x1, x2])))
        }

        let x3 = source.take_u8(ErrorKind::MalformedTag)?;
        if (x3 & 0x80) == 0 {
            return Ok(Self(I::L5([first, x0, x1, x2, x3])))
        }

        let x4 = source.take_u8(ErrorKind::MalformedTag)?;
        if (x4 & 0x80) == 0 {
            // Five digits carry 35 bits. For a u32, the top three of them
            // must be zero.
            if x0 & 0x70 != 0 {
                xerr!(return Err(DecodeError::content(
                    ErrorKind::InvalidTagNumber, start
                )))
            }
            return Ok(Self(I::L6([first, x0, x1, x2, x3, x4])))
        }

        xerr!(Err(DecodeError::content(ErrorKind::MalformedTag, start)))
    }

    /// Writes the identifier octets to a target.
    pub fn write_encoded<T: Target>(
        self, target: &mut T
    ) -> Result<(), T::Error> {
        target.write_all(self.as_slice())
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Ident({:?})", self.as_slice())
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// The universal class for types defined by X.680.
    Universal,

    /// The application class.
    Application,

    /// The context-specific class used for tagging within a type.
    Context,

    /// The private class.
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================

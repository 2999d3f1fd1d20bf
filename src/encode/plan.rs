//! Measuring a value tree before encoding it.
//!
//! This is a private module. It provides the first pass for the parent.

use log::warn;
use crate::error::{EncodeError, ErrorKind};
use crate::ident::{Ident, Tag};
use crate::length::Length;
use crate::limits::Limits;
use crate::mode::Mode;
use crate::value::{Constructed, Framing, Tagged, Value};


//------------ Measured ------------------------------------------------------

/// The header information of a single value, resolved for encoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Measured {
    /// The identifier octets to write.
    pub ident: Ident,

    /// The number of content octets, excluding any end-of-contents.
    pub content_len: usize,

    /// The length form to write.
    pub framing: Framing,
}

impl Measured {
    /// Used for the slot of a value while its children are measured.
    const PENDING: Self = Measured {
        ident: Ident::END_OF_CONTENTS,
        content_len: 0,
        framing: Framing::Definite,
    };

    /// Returns the length octets to write.
    pub fn length(&self) -> Length {
        match self.framing {
            Framing::Definite => Length::Definite(self.content_len),
            Framing::Indefinite => Length::Indefinite,
        }
    }

    /// Returns the number of octets of the complete encoded value.
    ///
    /// Returns `None` if that doesn’t fit into a `usize`.
    pub fn total_len(&self) -> Option<usize> {
        let tail = match self.framing {
            Framing::Definite => 0,
            Framing::Indefinite => 2,
        };
        (self.ident.encoded_len() + self.length().encoded_len())
            .checked_add(self.content_len)?
            .checked_add(tail)
    }
}


//------------ Plan ----------------------------------------------------------

/// The result of the first encoding pass over a value tree.
///
/// The plan holds a [`Measured`] for every value of the tree, indexed by
/// the position of the value in a depth-first, pre-order walk. The inner
/// value of a tagged value has a slot, too, even if it is implicitly tagged
/// and its own header is never written.
///
/// All checks for whether the tree can be encoded in the given mode happen
/// while building the plan. Writing the tree according to a plan can only
/// fail if the target fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    nodes: Vec<Measured>,
    total_len: usize,
}

impl Plan {
    /// Measures a value tree.
    pub fn new(
        value: &Value, mode: Mode, limits: &Limits
    ) -> Result<Self, EncodeError> {
        let mut planner = Planner { mode, limits, nodes: Vec::new() };
        let total_len = planner.measure(value, 0, false)?;
        Ok(Plan { nodes: planner.nodes, total_len })
    }

    /// Returns the measurements for the value at the given index.
    pub fn node(&self, index: usize) -> Measured {
        self.nodes[index]
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the length of the encoded tree.
    pub fn total_len(&self) -> usize {
        self.total_len
    }
}


//------------ Planner -------------------------------------------------------

/// The state of the first pass.
struct Planner<'a> {
    mode: Mode,
    limits: &'a Limits,
    nodes: Vec<Measured>,
}

impl Planner<'_> {
    /// Measures a value and everything below it.
    ///
    /// The value is at the given nesting `depth`. If `renamed` is true, the
    /// value is the inner value of an implicit tag and only its content will
    /// be written. Returns the total encoded length of the value.
    fn measure(
        &mut self, value: &Value, depth: usize, renamed: bool,
    ) -> Result<usize, EncodeError> {
        let index = self.nodes.len();
        self.nodes.push(Measured::PENDING);
        self.check_tag(value.tag(), index)?;
        if !renamed {
            self.check_framing(value.framing(), index)?;
        }
        let measured = match value {
            Value::Primitive(inner) => {
                Measured {
                    ident: Ident::from_tag(inner.tag(), false),
                    content_len: inner.content().len(),
                    framing: Framing::Definite,
                }
            }
            Value::Constructed(inner) => {
                self.constructed(inner, depth, index)?
            }
            Value::Tagged(inner) if inner.is_explicit() => {
                self.explicit(inner, depth, index)?
            }
            Value::Tagged(inner) => {
                self.implicit(inner, depth, index)?
            }
        };
        let total_len = match measured.total_len() {
            Some(len) => len,
            None => {
                xerr!(return Err(EncodeError::content(
                    ErrorKind::MalformedLength, index
                )))
            }
        };
        self.nodes[index] = measured;
        Ok(total_len)
    }

    fn constructed(
        &mut self, value: &Constructed, depth: usize, index: usize,
    ) -> Result<Measured, EncodeError> {
        self.check_depth(depth, index)?;
        let mut content_len = 0usize;
        for child in value.children() {
            let child_len = self.measure(child, depth + 1, false)?;
            content_len = match content_len.checked_add(child_len) {
                Some(len) => len,
                None => {
                    xerr!(return Err(EncodeError::content(
                        ErrorKind::MalformedLength, index
                    )))
                }
            };
        }
        Ok(Measured {
            ident: Ident::from_tag(value.tag(), true),
            content_len,
            framing: value.framing(),
        })
    }

    /// Measures an explicitly tagged value.
    ///
    /// The complete inner value becomes the content.
    fn explicit(
        &mut self, value: &Tagged, depth: usize, index: usize,
    ) -> Result<Measured, EncodeError> {
        self.check_depth(depth, index)?;
        let content_len = self.measure(value.inner(), depth + 1, false)?;
        Ok(Measured {
            ident: Ident::from_tag(value.tag(), true),
            content_len,
            framing: value.framing(),
        })
    }

    /// Measures an implicitly tagged value.
    ///
    /// The content of the inner value becomes the content and the tag
    /// replaces the inner value’s tag. This happens on the same level of
    /// nesting since there is only one value on the wire.
    fn implicit(
        &mut self, value: &Tagged, depth: usize, index: usize,
    ) -> Result<Measured, EncodeError> {
        let constructed = value.inner().is_constructed();
        if value.framing() == Framing::Indefinite && !constructed {
            xerr!(return Err(EncodeError::content(
                ErrorKind::UnsupportedDialectCombination, index
            )))
        }
        let inner_index = self.nodes.len();
        self.measure(value.inner(), depth, true)?;
        Ok(Measured {
            ident: Ident::from_tag(value.tag(), constructed),
            content_len: self.nodes[inner_index].content_len,
            framing: value.framing(),
        })
    }

    fn check_tag(&self, tag: Tag, index: usize) -> Result<(), EncodeError> {
        if tag.number() > self.limits.max_tag_number {
            xerr!(return Err(EncodeError::content(
                ErrorKind::InvalidTagNumber, index
            )))
        }
        Ok(())
    }

    fn check_framing(
        &self, framing: Framing, index: usize
    ) -> Result<(), EncodeError> {
        if framing == Framing::Indefinite && !self.mode.allows_indefinite() {
            xerr!(return Err(EncodeError::content(
                ErrorKind::DialectViolation, index
            )))
        }
        Ok(())
    }

    fn check_depth(
        &self, depth: usize, index: usize
    ) -> Result<(), EncodeError> {
        if depth >= self.limits.max_depth {
            warn!(
                "value {} exceeds nesting depth limit of {}",
                index, self.limits.max_depth
            );
            xerr!(return Err(EncodeError::content(
                ErrorKind::DepthLimitExceeded, index
            )))
        }
        Ok(())
    }
}


//============ Tests =========================================================

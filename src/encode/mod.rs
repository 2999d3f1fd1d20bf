//! Encoding value trees.
//!
//! A [`Value`] tree is encoded in two passes. The first pass walks the tree
//! and determines identifier, length and framing of every value, checking
//! along the way that the tree can actually be encoded under the selected
//! [`Mode`]. Only if that succeeds does the second pass walk the tree again
//! and write the octets to a [`Target`]. Nothing is written for a tree that
//! fails the first pass.
//!
//! Most of the time, the methods on [`Mode`] are all you need. The
//! [`Encoder`] type allows changing the [`Limits`] applied while encoding.

pub use self::target::{IoTarget, Target, infallible};

use log::debug;
use crate::error::EncodeError;
use crate::ident::Ident;
use crate::length::Length;
use crate::limits::Limits;
use crate::mode::Mode;
use crate::value::{Framing, Value};
use self::plan::Plan;

mod plan;
mod target;


//------------ Encoder -------------------------------------------------------

/// Encodes value trees under a given mode and limits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Encoder {
    mode: Mode,
    limits: Limits,
}

impl Encoder {
    /// Creates a new encoder for the given mode using default limits.
    pub fn new(mode: Mode) -> Self {
        Encoder { mode, limits: Limits::default() }
    }

    /// Returns the encoder with different limits.
    pub fn with_limits(self, limits: Limits) -> Self {
        Encoder { limits, ..self }
    }

    /// Returns the mode of the encoder.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the limits of the encoder.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the number of octets the encoded tree will occupy.
    pub fn encoded_len(&self, value: &Value) -> Result<usize, EncodeError> {
        Ok(Plan::new(value, self.mode, &self.limits)?.total_len())
    }

    /// Encodes a value tree into a new vec.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let plan = Plan::new(value, self.mode, &self.limits)?;
        let mut target = Vec::with_capacity(plan.total_len());
        infallible(Writer::new(&plan, &mut target).write_value(value));
        debug!(
            "encoded {} values into {} octets in {:?} mode",
            plan.len(), target.len(), self.mode
        );
        Ok(target)
    }

    /// Encodes a value tree into a target.
    ///
    /// The tree is checked completely before the first octet is written.
    /// If the tree can’t be encoded, nothing is written at all. If the
    /// target fails, it may have received part of the encoding.
    pub fn write_encoded<T: Target>(
        &self, value: &Value, target: &mut T,
    ) -> Result<(), EncodeError<T::Error>> {
        let plan = Plan::new(
            value, self.mode, &self.limits
        ).map_err(EncodeError::into_target)?;
        Writer::new(&plan, target).write_value(value).map_err(
            EncodeError::Target
        )?;
        debug!(
            "encoded {} values into {} octets in {:?} mode",
            plan.len(), plan.total_len(), self.mode
        );
        Ok(())
    }
}


//------------ Writer --------------------------------------------------------

/// The state of the second pass.
///
/// The writer walks the tree in the same order as the plan was built and
/// keeps track of the index of the next value’s slot.
struct Writer<'a, T> {
    plan: &'a Plan,
    target: &'a mut T,
    next: usize,
}

impl<'a, T: Target> Writer<'a, T> {
    fn new(plan: &'a Plan, target: &'a mut T) -> Self {
        Writer { plan, target, next: 0 }
    }

    /// Writes a complete value including its header.
    fn write_value(&mut self, value: &Value) -> Result<(), T::Error> {
        let measured = self.plan.node(self.next);
        self.next += 1;
        measured.ident.write_encoded(&mut *self.target)?;
        measured.length().write_encoded(&mut *self.target)?;
        self.write_content(value)?;
        if measured.framing == Framing::Indefinite {
            Ident::END_OF_CONTENTS.write_encoded(&mut *self.target)?;
            Length::Definite(0).write_encoded(&mut *self.target)?;
        }
        Ok(())
    }

    /// Writes the content of a value.
    fn write_content(&mut self, value: &Value) -> Result<(), T::Error> {
        match value {
            Value::Primitive(inner) => {
                self.target.write_all(inner.content())
            }
            Value::Constructed(inner) => {
                for child in inner.children() {
                    self.write_value(child)?;
                }
                Ok(())
            }
            Value::Tagged(inner) if inner.is_explicit() => {
                self.write_value(inner.inner())
            }
            Value::Tagged(inner) => {
                // The inner value’s header is replaced by ours, so skip its
                // slot.
                self.next += 1;
                self.write_content(inner.inner())
            }
        }
    }
}


//============ Tests =========================================================

//! Macros for last-resort debugging.
//!
//! Error reporting of the codec is deliberately terse: an error kind and a
//! position. Debugging code that produces such errors can therefore be
//! tedious. To help with that, this module contains a macro `xerr!()` that
//! logs the source location at trace level if the `extra-debug` feature is
//! enabled before resolving into whatever the expression it encloses
//! resolves to otherwise. Use it whenever you initially produce an error,
//! i.e.:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(Err(source.content_err(ErrorKind::MalformedTag)))
//! }
//! ```
//!
//! or, with an early return:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(return Err(source.content_err(ErrorKind::MalformedTag)));
//! }
//! ```

#[cfg(feature = "extra-debug")]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => {{
        log::trace!(
            target: "bertlv::xerr",
            "error produced at {}:{}", file!(), line!()
        );
        $test
    }}
}

#[cfg(not(feature = "extra-debug"))]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => { $test };
}


//============ Tests =========================================================

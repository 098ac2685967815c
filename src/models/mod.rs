//! Ready-made population models
//!
//! Each model is a function building a [`Model`](crate::model::Model) from a
//! parameter struct, plus a factory suitable for
//! [`Scan::time_course`](crate::scan::Scan::time_course).
//!
//! # Available Models
//!
//! ## [`coculture`]: two competing populations
//!
//! An exponentially growing population `E` with constant death, and a
//! logistically growing population `C` that competes with `E` for its niche
//! and grows on `E`'s necromass while dying at its own rate.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod coculture;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use coculture::CocultureParameters;

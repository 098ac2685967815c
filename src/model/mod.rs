//! Reaction-network models
//!
//! This module defines WHAT gets integrated:
//! - `OdeModel`: the trait solvers integrate against
//! - `ModelBuilder`: fluent declaration of variables, parameters and reactions
//! - `Model`: the compiled, immutable network implementing `OdeModel`
//!
//! # Reactions
//!
//! A reaction is a rate function of named arguments together with a
//! stoichiometry. Each time the right-hand side is evaluated every reaction
//! rate is computed once, in dependency order, and each variable receives
//! `coefficient × rate` from every reaction that touches it:
//!
//! ```text
//! dx_j/dt = Σ_r  S[r, j] · v_r(x, p, t)
//! ```
//!
//! Reactions may read other reactions' outputs. Reactions with an empty
//! stoichiometry contribute nothing to the derivative; they exist to be read
//! by other reactions and to show up as flux columns in results.
//!
//! # Evaluation order
//!
//! The order is a topological sort of the reaction dependency graph,
//! computed once in [`ModelBuilder::build`]. Cycles are rejected there, so a
//! built [`Model`] always evaluates in a single pass.

mod builder;
mod network;
mod ordering;
mod reaction;
mod traits;

pub use builder::ModelBuilder;
pub use network::Model;
pub use reaction::{RateFn, Reaction, TIME};
pub use traits::OdeModel;

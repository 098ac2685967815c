//! Fluent model construction
//!
//! Every builder operation consumes the builder and hands it back on
//! success, so definitions chain with `?`:
//!
//! ```rust
//! use coculture::model::ModelBuilder;
//!
//! # fn main() -> Result<(), coculture::ModelError> {
//! let model = ModelBuilder::new("decay")
//!     .add_variable("x", 1.0)?
//!     .add_parameter("k", 0.5)?
//!     .add_reaction("v_decay", |a: &[f64]| a[0] * a[1], &["k", "x"], &[("x", -1.0)])?
//!     .build()?;
//!
//! assert_eq!(model.variable_names(), vec!["x"]);
//! # Ok(())
//! # }
//! ```
//!
//! Names share a single namespace across variables, parameters and
//! reactions. `add_reaction` only accepts arguments that are already
//! declared, so a chain of `add_*` calls can never form a cycle; cycles can
//! only be introduced through [`ModelBuilder::update_reaction`] and are
//! reported by [`ModelBuilder::build`].

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::ModelError;
use crate::model::network::Model;
use crate::model::ordering::evaluation_order;
use crate::model::reaction::{ArgSource, CompiledReaction, Reaction, TIME};

/// Kind of a declared name, used for lookups and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Variable(usize),
    Parameter(usize),
    Reaction(usize),
}

impl Symbol {
    fn kind(&self) -> &'static str {
        match self {
            Symbol::Variable(_) => "variable",
            Symbol::Parameter(_) => "parameter",
            Symbol::Reaction(_) => "reaction",
        }
    }
}

/// Mutable model definition; [`build`](ModelBuilder::build) freezes it
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    symbols: IndexMap<String, Symbol>,
    variables: IndexMap<String, f64>,
    parameters: IndexMap<String, f64>,
    reactions: Vec<Reaction>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: IndexMap::new(),
            variables: IndexMap::new(),
            parameters: IndexMap::new(),
            reactions: Vec::new(),
        }
    }

    /// Declare a state variable with its initial value
    pub fn add_variable(mut self, name: &str, initial_value: f64) -> Result<Self, ModelError> {
        self.claim(name, Symbol::Variable(self.variables.len()))?;
        self.variables.insert(name.to_string(), initial_value);
        Ok(self)
    }

    /// Declare several variables in order
    pub fn add_variables(mut self, variables: &[(&str, f64)]) -> Result<Self, ModelError> {
        for (name, value) in variables {
            self = self.add_variable(name, *value)?;
        }
        Ok(self)
    }

    /// Declare a parameter with its default value
    pub fn add_parameter(mut self, name: &str, value: f64) -> Result<Self, ModelError> {
        self.claim(name, Symbol::Parameter(self.parameters.len()))?;
        self.parameters.insert(name.to_string(), value);
        Ok(self)
    }

    /// Declare several parameters in order
    pub fn add_parameters(mut self, parameters: &[(&str, f64)]) -> Result<Self, ModelError> {
        for (name, value) in parameters {
            self = self.add_parameter(name, *value)?;
        }
        Ok(self)
    }

    /// Declare a reaction
    ///
    /// `args` may name variables, parameters, reactions declared earlier, or
    /// [`TIME`]. `stoichiometry` keys must be variables. An empty
    /// stoichiometry declares a derived quantity.
    ///
    /// # Errors
    ///
    /// - [`ModelError::DuplicateName`] if `name` is taken
    /// - [`ModelError::UnknownReference`] if an argument or stoichiometry key
    ///   does not resolve
    pub fn add_reaction<F>(
        mut self,
        name: &str,
        rate: F,
        args: &[&str],
        stoichiometry: &[(&str, f64)],
    ) -> Result<Self, ModelError>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        if let Some(existing) = self.symbols.get(name) {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
                existing: existing.kind(),
            });
        }
        if name == TIME {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
                existing: "reserved name",
            });
        }
        self.check_references(name, args, stoichiometry)?;

        self.symbols
            .insert(name.to_string(), Symbol::Reaction(self.reactions.len()));
        self.reactions
            .push(Reaction::new(name, Arc::new(rate), args, stoichiometry));
        Ok(self)
    }

    /// Declare a derived quantity: a reaction that changes no variable
    pub fn add_derived<F>(self, name: &str, rate: F, args: &[&str]) -> Result<Self, ModelError>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.add_reaction(name, rate, args, &[])
    }

    /// Replace the definition of an existing reaction, keeping its position
    ///
    /// Unlike [`add_reaction`](Self::add_reaction), arguments may name any
    /// declared reaction, including ones declared later or the reaction
    /// itself. Resulting cycles are reported by [`build`](Self::build).
    pub fn update_reaction<F>(
        mut self,
        name: &str,
        rate: F,
        args: &[&str],
        stoichiometry: &[(&str, f64)],
    ) -> Result<Self, ModelError>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        let index = match self.symbols.get(name) {
            Some(Symbol::Reaction(index)) => *index,
            _ => {
                return Err(ModelError::UnknownReference {
                    reaction: name.to_string(),
                    name: name.to_string(),
                    expected: "reaction",
                });
            }
        };
        self.check_references(name, args, stoichiometry)?;
        self.reactions[index] = Reaction::new(name, Arc::new(rate), args, stoichiometry);
        Ok(self)
    }

    /// Resolve every reference and compute the evaluation order
    ///
    /// # Errors
    ///
    /// [`ModelError::CyclicDependency`] if reaction outputs feed each other
    /// in a loop.
    pub fn build(self) -> Result<Model, ModelError> {
        let ModelBuilder {
            name,
            symbols,
            variables,
            parameters,
            reactions,
        } = self;

        let mut compiled = Vec::with_capacity(reactions.len());
        for reaction in reactions {
            let sources = reaction
                .args
                .iter()
                .map(|arg| resolve_arg(&symbols, &reaction.name, arg))
                .collect::<Result<Vec<_>, _>>()?;
            let effects = reaction
                .stoichiometry
                .iter()
                .map(|(key, coefficient)| match variables.get_index_of(key) {
                    Some(index) => Ok((index, *coefficient)),
                    None => Err(ModelError::UnknownReference {
                        reaction: reaction.name.clone(),
                        name: key.clone(),
                        expected: "variable",
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            compiled.push(CompiledReaction {
                reaction,
                sources,
                effects,
            });
        }

        let dependencies: Vec<Vec<usize>> = compiled
            .iter()
            .map(CompiledReaction::reaction_dependencies)
            .collect();
        let order = evaluation_order(&dependencies).map_err(|stuck| {
            ModelError::CyclicDependency {
                reactions: stuck
                    .iter()
                    .map(|&i| compiled[i].reaction.name.clone())
                    .collect(),
            }
        })?;

        Ok(Model::from_parts(name, variables, parameters, compiled, order))
    }

    // ====== Internal helpers ======

    fn claim(&mut self, name: &str, symbol: Symbol) -> Result<(), ModelError> {
        if name == TIME {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
                existing: "reserved name",
            });
        }
        if let Some(existing) = self.symbols.get(name) {
            return Err(ModelError::DuplicateName {
                name: name.to_string(),
                existing: existing.kind(),
            });
        }
        self.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    fn check_references(
        &self,
        reaction: &str,
        args: &[&str],
        stoichiometry: &[(&str, f64)],
    ) -> Result<(), ModelError> {
        for arg in args {
            if *arg != TIME && !self.symbols.contains_key(*arg) {
                return Err(ModelError::UnknownReference {
                    reaction: reaction.to_string(),
                    name: arg.to_string(),
                    expected: "name",
                });
            }
        }
        for (i, (key, _)) in stoichiometry.iter().enumerate() {
            if !matches!(self.symbols.get(*key), Some(Symbol::Variable(_))) {
                return Err(ModelError::UnknownReference {
                    reaction: reaction.to_string(),
                    name: key.to_string(),
                    expected: "variable",
                });
            }
            if stoichiometry[..i].iter().any(|(seen, _)| seen == key) {
                return Err(ModelError::DuplicateStoichiometry {
                    reaction: reaction.to_string(),
                    variable: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn resolve_arg(
    symbols: &IndexMap<String, Symbol>,
    reaction: &str,
    arg: &str,
) -> Result<ArgSource, ModelError> {
    if arg == TIME {
        return Ok(ArgSource::Time);
    }
    match symbols.get(arg) {
        Some(Symbol::Variable(i)) => Ok(ArgSource::Variable(*i)),
        Some(Symbol::Parameter(i)) => Ok(ArgSource::Parameter(*i)),
        Some(Symbol::Reaction(i)) => Ok(ArgSource::Reaction(*i)),
        None => Err(ModelError::UnknownReference {
            reaction: reaction.to_string(),
            name: arg.to_string(),
            expected: "name",
        }),
    }
}

// =================================================================================================
// Tests
// =================================================================================================

//! Reaction definitions
//!
//! A reaction is a named rate function over named arguments plus a
//! stoichiometry. Arguments are resolved to [`ArgSource`]s once, when the
//! model is built, so the per-step evaluation only indexes slices.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Rate function shared between model instances.
///
/// Receives its arguments in the order they were declared.
pub type RateFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// Reserved argument name resolving to the integration time.
pub const TIME: &str = "time";

/// A reaction as declared on the builder.
#[derive(Clone)]
pub struct Reaction {
    pub(crate) name: String,
    pub(crate) rate: RateFn,
    pub(crate) args: Vec<String>,
    pub(crate) stoichiometry: IndexMap<String, f64>,
}

impl Reaction {
    pub(crate) fn new(
        name: &str,
        rate: RateFn,
        args: &[&str],
        stoichiometry: &[(&str, f64)],
    ) -> Self {
        Self {
            name: name.to_string(),
            rate,
            args: args.iter().map(|a| a.to_string()).collect(),
            stoichiometry: stoichiometry
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn stoichiometry(&self) -> &IndexMap<String, f64> {
        &self.stoichiometry
    }

    /// Derived quantities change no variable.
    pub fn is_derived(&self) -> bool {
        self.stoichiometry.is_empty()
    }
}

impl fmt::Debug for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reaction")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("stoichiometry", &self.stoichiometry)
            .finish_non_exhaustive()
    }
}

/// Where a reaction argument is read from during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgSource {
    Variable(usize),
    Parameter(usize),
    /// Output of another reaction, by declaration index
    Reaction(usize),
    Time,
}

/// A reaction with its arguments and effects resolved to indices.
#[derive(Clone)]
pub(crate) struct CompiledReaction {
    pub(crate) reaction: Reaction,
    pub(crate) sources: Vec<ArgSource>,
    /// `(variable index, coefficient)`
    pub(crate) effects: Vec<(usize, f64)>,
}

impl CompiledReaction {
    /// Reaction outputs this reaction consumes.
    pub(crate) fn reaction_dependencies(&self) -> Vec<usize> {
        self.sources
            .iter()
            .filter_map(|source| match source {
                ArgSource::Reaction(index) => Some(*index),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_without_stoichiometry_is_derived() {
        let reaction = Reaction::new("capacity", Arc::new(|a: &[f64]| 1.0 - a[0]), &["x"], &[]);
        assert!(reaction.is_derived());
        assert_eq!(reaction.args(), &["x".to_string()]);
    }

    #[test]
    fn test_debug_skips_rate_closure() {
        let reaction = Reaction::new("v", Arc::new(|_: &[f64]| 0.0), &[], &[("x", 1.0)]);
        let text = format!("{:?}", reaction);
        assert!(text.contains("\"v\""));
        assert!(text.contains(".."));
    }

    #[test]
    fn test_dependencies_only_list_reactions() {
        let compiled = CompiledReaction {
            reaction: Reaction::new("v", Arc::new(|_: &[f64]| 0.0), &[], &[]),
            sources: vec![
                ArgSource::Variable(0),
                ArgSource::Reaction(2),
                ArgSource::Time,
                ArgSource::Reaction(0),
            ],
            effects: Vec::new(),
        };
        assert_eq!(compiled.reaction_dependencies(), vec![2, 0]);
    }
}

//! Compiled reaction network
//!
//! [`Model`] is the frozen form of a [`ModelBuilder`](crate::model::ModelBuilder):
//! names resolved to indices and the reaction evaluation order fixed. It is
//! cheap to clone (rate functions are shared) and never mutated in place;
//! parameter overlays produce a new value.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use nalgebra::DVector;

use crate::error::SimulationError;
use crate::model::reaction::{ArgSource, CompiledReaction, Reaction};
use crate::model::traits::OdeModel;

#[derive(Clone)]
pub struct Model {
    name: String,
    variables: IndexMap<String, f64>,
    parameters: IndexMap<String, f64>,
    reactions: Vec<CompiledReaction>,
    order: Vec<usize>,
    max_arity: usize,
}

impl Model {
    pub(crate) fn from_parts(
        name: String,
        variables: IndexMap<String, f64>,
        parameters: IndexMap<String, f64>,
        reactions: Vec<CompiledReaction>,
        order: Vec<usize>,
    ) -> Self {
        let max_arity = reactions
            .iter()
            .map(|r| r.sources.len())
            .max()
            .unwrap_or(0);
        Self {
            name,
            variables,
            parameters,
            reactions,
            order,
            max_arity,
        }
    }

    // =============================================================================================
    // Introspection
    // =============================================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }

    /// Reaction names in declaration order
    pub fn reaction_names(&self) -> Vec<&str> {
        self.reactions
            .iter()
            .map(|r| r.reaction.name.as_str())
            .collect()
    }

    /// Reaction names in the order they are evaluated each step
    pub fn evaluation_order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&i| self.reactions[i].reaction.name.as_str())
            .collect()
    }

    pub fn reaction(&self, name: &str) -> Option<&Reaction> {
        self.reactions
            .iter()
            .map(|r| &r.reaction)
            .find(|r| r.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    pub fn parameters(&self) -> &IndexMap<String, f64> {
        &self.parameters
    }

    pub fn initial_values(&self) -> &IndexMap<String, f64> {
        &self.variables
    }

    // =============================================================================================
    // Parameter overlay
    // =============================================================================================

    /// Copy of this model with some parameter values replaced
    ///
    /// # Errors
    ///
    /// [`SimulationError::UnknownParameter`] for a key that is not a declared
    /// parameter. No partial overlay is returned.
    pub fn with_parameters<I, K>(&self, overrides: I) -> Result<Model, SimulationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut model = self.clone();
        for (key, value) in overrides {
            let key = key.as_ref();
            match model.parameters.get_mut(key) {
                Some(slot) => *slot = value,
                None => return Err(SimulationError::UnknownParameter(key.to_string())),
            }
        }
        Ok(model)
    }

    // =============================================================================================
    // Evaluation
    // =============================================================================================

    /// Rates of every reaction at `(t, state)`, in declaration order
    pub fn fluxes(&self, t: f64, state: &DVector<f64>) -> DVector<f64> {
        let mut rates = DVector::zeros(self.reactions.len());
        self.evaluate_rates(t, state.as_slice(), rates.as_mut_slice());
        rates
    }

    fn evaluate_rates(&self, t: f64, state: &[f64], rates: &mut [f64]) {
        let parameters: Vec<f64> = self.parameters.values().copied().collect();
        let mut args = Vec::with_capacity(self.max_arity);

        for &index in &self.order {
            let compiled = &self.reactions[index];
            args.clear();
            args.extend(compiled.sources.iter().map(|source| match source {
                ArgSource::Variable(i) => state[*i],
                ArgSource::Parameter(i) => parameters[*i],
                ArgSource::Reaction(i) => rates[*i],
                ArgSource::Time => t,
            }));
            rates[index] = (compiled.reaction.rate)(args.as_slice());
        }
    }

    /// Feed the structural definition and effective parameter values to a hasher
    ///
    /// Rate closures cannot be hashed; two models with identical names,
    /// arguments and stoichiometry but different rate bodies hash equal.
    pub fn hash_definition<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        for (name, value) in &self.variables {
            name.hash(state);
            value.to_bits().hash(state);
        }
        for (name, value) in &self.parameters {
            name.hash(state);
            value.to_bits().hash(state);
        }
        for compiled in &self.reactions {
            let reaction = &compiled.reaction;
            reaction.name.hash(state);
            reaction.args.hash(state);
            for (key, coefficient) in &reaction.stoichiometry {
                key.hash(state);
                coefficient.to_bits().hash(state);
            }
        }
    }
}

impl OdeModel for Model {
    fn dimension(&self) -> usize {
        self.variables.len()
    }

    fn initial_state(&self) -> DVector<f64> {
        DVector::from_iterator(self.variables.len(), self.variables.values().copied())
    }

    /// `dx_j/dt = Σ_r stoichiometry[r][j] · rate_r(t, x)`
    fn right_hand_side(&self, t: f64, state: &DVector<f64>) -> DVector<f64> {
        let mut rates = vec![0.0; self.reactions.len()];
        self.evaluate_rates(t, state.as_slice(), &mut rates);

        let mut derivative = DVector::zeros(self.variables.len());
        for (compiled, rate) in self.reactions.iter().zip(&rates) {
            for &(variable, coefficient) in &compiled.effects {
                derivative[variable] += coefficient * rate;
            }
        }
        derivative
    }

    fn variable_name(&self, index: usize) -> &str {
        self.variables
            .get_index(index)
            .map(|(name, _)| name.as_str())
            .unwrap_or("?")
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("variables", &self.variables)
            .field("parameters", &self.parameters)
            .field("reactions", &self.evaluation_order())
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

//! Two-population co-culture model
//!
//! `E` grows exponentially and dies at a constant rate. `C` grows logistically
//! in a niche of capacity `1/theta` that `E` competes for with weight `a_e`,
//! feeds on the necromass released by `E`'s death with yield `a_c`, and dies
//! at its own rate `delta_c`.
//!
//! ```text
//! v_growth_e      = mu_e · E                                   E  +1
//! v_death_e       = delta_e · E                                E  -1
//! c_free_capacity = 1 - theta · C                              (derived)
//! v_growth_c      = mu_c · C · (c_free_capacity - a_e·theta·E) C  +1
//! v_necromass_c   = a_c · v_death_e · c_free_capacity          C  +1
//! v_death_c       = delta_c · C                                C  -1
//! ```
//!
//! Both gains of `C` vanish when `C` reaches `1/theta`, so `C` never
//! crosses the capacity from below.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::model::{Model, ModelBuilder};

pub const MODEL_NAME: &str = "coculture";

// Variables
pub const E: &str = "E";
pub const C: &str = "C";

// Parameters
pub const MU_E: &str = "mu_e";
pub const A_E: &str = "a_e";
pub const DELTA_E: &str = "delta_e";
pub const MU_C: &str = "mu_c";
pub const A_C: &str = "a_c";
pub const DELTA_C: &str = "delta_c";
pub const THETA: &str = "theta";

// Reactions
pub const V_GROWTH_E: &str = "v_growth_e";
pub const V_DEATH_E: &str = "v_death_e";
pub const C_FREE_CAPACITY: &str = "c_free_capacity";
pub const V_GROWTH_C: &str = "v_growth_c";
pub const V_NECROMASS_C: &str = "v_necromass_c";
pub const V_DEATH_C: &str = "v_death_c";

/// Initial values and default parameter values
///
/// Missing fields in a deserialized table fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CocultureParameters {
    /// Initial `E`
    pub e0: f64,
    /// Initial `C`
    pub c0: f64,
    /// Growth rate of `E`
    pub mu_e: f64,
    /// Competitive weight of `E` in the niche of `C`
    pub a_e: f64,
    /// Death rate of `E`
    pub delta_e: f64,
    /// Growth rate of `C`
    pub mu_c: f64,
    /// Yield of `C` on necromass
    pub a_c: f64,
    /// Death rate of `C`
    pub delta_c: f64,
    /// Inverse carrying capacity of `C`
    pub theta: f64,
}

impl Default for CocultureParameters {
    fn default() -> Self {
        Self {
            e0: 5.0,
            c0: 5.0,
            mu_e: 0.4,
            a_e: 0.1,
            delta_e: 0.1,
            mu_c: 0.3,
            a_c: 0.1,
            delta_c: 0.22,
            theta: 0.001,
        }
    }
}

/// Build the co-culture network with `params` as initial and default values
pub fn build_model(params: &CocultureParameters) -> Result<Model, ModelError> {
    ModelBuilder::new(MODEL_NAME)
        .add_variables(&[(E, params.e0), (C, params.c0)])?
        .add_parameters(&[
            (MU_E, params.mu_e),
            (A_E, params.a_e),
            (DELTA_E, params.delta_e),
            (MU_C, params.mu_c),
            (A_C, params.a_c),
            (DELTA_C, params.delta_c),
            (THETA, params.theta),
        ])?
        .add_reaction(V_GROWTH_E, |a| a[0] * a[1], &[MU_E, E], &[(E, 1.0)])?
        .add_reaction(V_DEATH_E, |a| a[0] * a[1], &[DELTA_E, E], &[(E, -1.0)])?
        .add_derived(C_FREE_CAPACITY, |a| 1.0 - a[0] * a[1], &[THETA, C])?
        .add_reaction(
            V_GROWTH_C,
            |a| {
                let (mu_c, c, free, a_e, theta, e) = (a[0], a[1], a[2], a[3], a[4], a[5]);
                mu_c * c * (free - a_e * theta * e)
            },
            &[MU_C, C, C_FREE_CAPACITY, A_E, THETA, E],
            &[(C, 1.0)],
        )?
        .add_reaction(
            V_NECROMASS_C,
            |a| a[0] * a[1] * a[2],
            &[A_C, V_DEATH_E, C_FREE_CAPACITY],
            &[(C, 1.0)],
        )?
        .add_reaction(V_DEATH_C, |a| a[0] * a[1], &[DELTA_C, C], &[(C, -1.0)])?
        .build()
}

/// Model factory for scans
pub fn factory(params: CocultureParameters) -> impl Fn() -> Result<Model, ModelError> + Sync + Send {
    move || build_model(&params)
}

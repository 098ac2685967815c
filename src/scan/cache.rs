//! Result cache keyed by run fingerprint
//!
//! A [`Fingerprint`] hashes everything that determines a run: model
//! structure, initial values, effective parameter values, time points and the
//! solver configuration (minus the wall-clock budget, which never changes a
//! successful result).
//!
//! [`MemoryCache`] computes each fingerprint at most once. Concurrent
//! requests for the same key wait on that key's gate; requests for a key
//! that is already filled read it without touching the gate. Failures are
//! not stored, so a later request retries.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use crate::error::SimulationError;
use crate::model::Model;
use crate::simulator::SimulationResult;
use crate::solver::{SolverConfiguration, SolverMethod};

// =================================================================================================
// Fingerprint
// =================================================================================================

/// Deterministic key of one simulation run
///
/// Stable within one build of the crate. Rate closures are not part of the
/// hash, see [`Model::hash_definition`]; models whose closures differ under
/// the same names need distinct revisions ([`Fingerprint::with_revision`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn of(model: &Model, time_points: &[f64], config: &SolverConfiguration) -> Self {
        let mut hasher = DefaultHasher::new();

        model.hash_definition(&mut hasher);

        time_points.len().hash(&mut hasher);
        for t in time_points {
            t.to_bits().hash(&mut hasher);
        }

        match config.method {
            SolverMethod::DormandPrince => 0u8.hash(&mut hasher),
            SolverMethod::RungeKutta4 { substeps } => {
                1u8.hash(&mut hasher);
                substeps.hash(&mut hasher);
            }
        }
        config.rtol.to_bits().hash(&mut hasher);
        config.atol.to_bits().hash(&mut hasher);
        config.initial_step.map(f64::to_bits).hash(&mut hasher);
        config.min_step.to_bits().hash(&mut hasher);
        config.max_step.to_bits().hash(&mut hasher);
        config.max_steps.hash(&mut hasher);

        Self(hasher.finish())
    }

    /// Mix a caller-chosen model revision into the key; revision 0 keeps it
    pub fn with_revision(self, revision: u64) -> Self {
        if revision == 0 {
            return self;
        }
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        revision.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// =================================================================================================
// Cache trait
// =================================================================================================

/// Store of finished runs, shared by all rows of a scan
pub trait ResultCache: Send + Sync {
    fn get(&self, key: Fingerprint) -> Option<Arc<SimulationResult>>;

    /// Cached result for `key`, or the result of `compute`, stored on success
    fn get_or_compute(
        &self,
        key: Fingerprint,
        compute: &mut dyn FnMut() -> Result<SimulationResult, SimulationError>,
    ) -> Result<Arc<SimulationResult>, SimulationError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =================================================================================================
// In-memory cache
// =================================================================================================

#[derive(Default)]
struct Slot {
    value: OnceLock<Arc<SimulationResult>>,
    gate: Mutex<()>,
}

/// Process-local [`ResultCache`]
#[derive(Default)]
pub struct MemoryCache {
    slots: RwLock<HashMap<Fingerprint, Arc<Slot>>>,
    computations: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful computations performed through this cache
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::SeqCst)
    }

    fn slot(&self, key: Fingerprint) -> Arc<Slot> {
        let existing = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        match existing {
            Some(slot) => slot,
            None => self
                .slots
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key)
                .or_default()
                .clone(),
        }
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, key: Fingerprint) -> Option<Arc<SimulationResult>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&key).and_then(|slot| slot.value.get().cloned())
    }

    fn get_or_compute(
        &self,
        key: Fingerprint,
        compute: &mut dyn FnMut() -> Result<SimulationResult, SimulationError>,
    ) -> Result<Arc<SimulationResult>, SimulationError> {
        let slot = self.slot(key);
        if let Some(hit) = slot.value.get() {
            return Ok(Arc::clone(hit));
        }

        let _gate = slot.gate.lock().unwrap_or_else(PoisonError::into_inner);

        // Filled while we waited on the gate
        if let Some(hit) = slot.value.get() {
            return Ok(Arc::clone(hit));
        }

        let result = Arc::new(compute()?);
        self.computations.fetch_add(1, Ordering::SeqCst);
        let _ = slot.value.set(Arc::clone(&result));
        Ok(result)
    }

    fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.value.get().is_some())
            .count()
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .field("computations", &self.computations())
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

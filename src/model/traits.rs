//! The integrator-facing model seam
//!
//! Solvers never see reactions or names: they only need a state dimension,
//! an initial state and a right-hand side. Anything implementing
//! [`OdeModel`] can be integrated, which keeps hand-written test systems and
//! compiled reaction networks interchangeable.

use nalgebra::DVector;

// =================================================================================================
// OdeModel trait
// =================================================================================================

/// A system of ordinary differential equations `dy/dt = f(t, y)`
///
/// # Contract
///
/// - `initial_state().len() == dimension()`
/// - `right_hand_side` returns a vector of length `dimension()`
/// - `right_hand_side` is a pure function of `(t, state)`
///
/// # Example
///
/// ```rust
/// use coculture::model::OdeModel;
/// use nalgebra::DVector;
///
/// struct Decay { k: f64 }
///
/// impl OdeModel for Decay {
///     fn dimension(&self) -> usize { 1 }
///     fn initial_state(&self) -> DVector<f64> { DVector::from_element(1, 1.0) }
///     fn right_hand_side(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> { y * -self.k }
///     fn variable_name(&self, _index: usize) -> &str { "y" }
///     fn name(&self) -> &str { "Decay" }
/// }
///
/// let decay = Decay { k: 0.5 };
/// assert_eq!(decay.right_hand_side(0.0, &decay.initial_state())[0], -0.5);
/// ```
pub trait OdeModel: Send + Sync {
    /// Number of state variables
    fn dimension(&self) -> usize;

    /// State at the first output time point
    fn initial_state(&self) -> DVector<f64>;

    /// Time derivative of the state
    fn right_hand_side(&self, t: f64, state: &DVector<f64>) -> DVector<f64>;

    /// Name of the state component at `index`, used in diagnostics
    fn variable_name(&self, index: usize) -> &str;

    /// Model name, used in logs and result metadata
    fn name(&self) -> &str;
}

//! Initial value problems over `ode_solvers`, with a per-step state guard.
//!
//! A model implements [`IVP`] to expose its right-hand side. [`integrate_guarded`]
//! integrates it segment by segment with a fresh Dormand-Prince 5(4) solver per
//! segment, checking the [`StepGuard`] after every accepted step. When a step
//! violates the guard the solver is stopped at that step, the state is corrected
//! and integration restarts from the corrected state at the same time.

use crate::errors::{CfcError, CfcResult};
use crate::timeseries::{FloatValue, Time};
use crate::trajectory::Trajectory;
use nalgebra::SVector;
use ode_solvers::{Dopri5, System};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// State vector of an `N` component model.
pub type State<const N: usize> = SVector<FloatValue, N>;

/// Right-hand side of an ordinary differential equation
pub trait IVP<T, S> {
    fn calculate_dy_dt(&self, t: T, y: &S, dy_dt: &mut S);
}

/// Check applied to the state after every accepted solver step.
pub trait StepGuard<const N: usize> {
    fn violated(&self, y: &State<N>) -> bool;

    /// Correct `y` in place, returning true if anything changed.
    fn apply(&self, y: &mut State<N>) -> bool;
}

/// Clamps negative state components to zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonNegativityGuard;

impl<const N: usize> StepGuard<N> for NonNegativityGuard {
    fn violated(&self, y: &State<N>) -> bool {
        y.iter().any(|v| *v < 0.0)
    }

    fn apply(&self, y: &mut State<N>) -> bool {
        let mut changed = false;
        for v in y.iter_mut() {
            if *v < 0.0 {
                *v = 0.0;
                changed = true;
            }
        }
        changed
    }
}

/// Options for the adaptive solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Relative error target per step
    pub rtol: FloatValue,
    /// Absolute error target per step, in state units
    pub atol: FloatValue,
    /// Length of the interval handed to a single solver instance
    /// unit: yr
    pub segment_length: FloatValue,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-16,
            atol: 1e-16,
            segment_length: 1.0,
        }
    }
}

impl SolverOptions {
    fn validate(&self) -> CfcResult<()> {
        if !(self.rtol > 0.0 && self.atol > 0.0) {
            return Err(CfcError::Config(format!(
                "solver tolerances must be positive (rtol={}, atol={})",
                self.rtol, self.atol
            )));
        }
        if !(self.segment_length > 0.0 && self.segment_length.is_finite()) {
            return Err(CfcError::Config(format!(
                "segment_length must be positive, got {}",
                self.segment_length
            )));
        }
        Ok(())
    }
}

/// Accepted steps collected while a solver runs.
#[derive(Debug, Clone)]
struct StepLog<const N: usize> {
    times: Vec<Time>,
    states: Vec<State<N>>,
    violated: bool,
    non_finite: bool,
}

impl<const N: usize> StepLog<N> {
    fn new(t0: Time, y0: State<N>) -> Self {
        Self {
            times: vec![t0],
            states: vec![y0],
            violated: false,
            non_finite: false,
        }
    }

    fn push(&mut self, t: Time, y: State<N>) {
        // The solver may report the initial point again
        if t > self.last_time() {
            self.times.push(t);
            self.states.push(y);
        }
    }

    fn last_time(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    fn last_state(&self) -> State<N> {
        self.states[self.states.len() - 1]
    }

    fn replace_last(&mut self, t: Time, y: State<N>) {
        let n = self.times.len();
        self.times[n - 1] = t;
        self.states[n - 1] = y;
    }
}

/// Bridges an [`IVP`] to `ode_solvers`, recording accepted steps and stopping
/// the solver at the first step that violates the guard.
struct GuardedSystem<'a, C, G, const N: usize> {
    model: &'a C,
    guard: &'a G,
    log: &'a mut StepLog<N>,
}

impl<C, G, const N: usize> System<Time, State<N>> for GuardedSystem<'_, C, G, N>
where
    C: IVP<Time, State<N>>,
    G: StepGuard<N>,
{
    fn system(&self, t: Time, y: &State<N>, dy: &mut State<N>) {
        self.model.calculate_dy_dt(t, y, dy)
    }

    fn solout(&mut self, t: Time, y: &State<N>, _dy: &State<N>) -> bool {
        self.log.push(t, *y);
        if y.iter().any(|v| !v.is_finite()) {
            self.log.non_finite = true;
            return true;
        }
        if self.guard.violated(y) {
            self.log.violated = true;
            return true;
        }
        false
    }
}

/// Integrate `model` from `t0` to `t1` starting at `y0`, applying `guard` after every
/// accepted step.
///
/// The returned trajectory holds every accepted step (after correction) and
/// the derivative at each, for dense output.
pub fn integrate_guarded<C, G, const N: usize>(
    model: &C,
    guard: &G,
    t0: Time,
    t1: Time,
    y0: State<N>,
    options: &SolverOptions,
) -> CfcResult<Trajectory<N>>
where
    C: IVP<Time, State<N>>,
    G: StepGuard<N>,
{
    options.validate()?;
    if !(t0.is_finite() && t1.is_finite() && t1 > t0) {
        return Err(CfcError::Integration {
            time: t0,
            reason: format!("invalid time span [{t0}, {t1}]"),
        });
    }
    if y0.iter().any(|v| !v.is_finite()) {
        return Err(CfcError::Integration {
            time: t0,
            reason: "non-finite initial state".to_string(),
        });
    }

    let mut y = y0;
    let mut corrections = 0;
    if guard.apply(&mut y) {
        corrections += 1;
        warn!(time = t0, "initial state corrected by step guard");
    }

    let mut log = StepLog::new(t0, y);
    let mut t = t0;
    let mut segments = 0usize;

    while t < t1 {
        let t_end = (t + options.segment_length).min(t1);
        let steps_before = log.times.len();
        log.violated = false;

        let solver_end = {
            let system = GuardedSystem {
                model,
                guard,
                log: &mut log,
            };
            let mut solver =
                Dopri5::new(system, t, t_end, t_end - t, y, options.rtol, options.atol);
            solver
                .integrate()
                .map_err(|e| CfcError::Integration {
                    time: t,
                    reason: format!("{e:?}"),
                })?;
            let (times, states) = solver.results().get();
            times.last().copied().zip(states.last().copied())
        };

        if log.non_finite {
            return Err(CfcError::Integration {
                time: log.last_time(),
                reason: "state became non-finite".to_string(),
            });
        }

        if log.violated {
            let mut corrected = log.last_state();
            guard.apply(&mut corrected);
            corrections += 1;
            warn!(
                time = log.last_time(),
                "state corrected by step guard, restarting solver"
            );
            log.replace_last(log.last_time(), corrected);
        } else if let Some((t_solver, y_solver)) = solver_end {
            log.push(t_solver, y_solver);
        }

        // Land exactly on the segment boundary
        if (log.last_time() - t_end).abs() <= 1e-9 * t_end.abs().max(1.0) {
            log.replace_last(t_end, log.last_state());
        }

        if log.last_time() <= t {
            return Err(CfcError::Integration {
                time: t,
                reason: "solver made no progress".to_string(),
            });
        }

        segments += 1;
        debug!(
            segment = segments,
            start = t,
            end = log.last_time(),
            steps = log.times.len() - steps_before,
            "integrated segment"
        );

        t = log.last_time();
        y = log.last_state();
    }

    let derivatives = log
        .times
        .iter()
        .zip(log.states.iter())
        .map(|(t, y)| {
            let mut dy = State::<N>::zeros();
            model.calculate_dy_dt(*t, y, &mut dy);
            dy
        })
        .collect();

    Trajectory::new(log.times, log.states, derivatives, corrections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Decay {
        rate: FloatValue,
    }

    impl IVP<Time, State<1>> for Decay {
        fn calculate_dy_dt(&self, _t: Time, y: &State<1>, dy_dt: &mut State<1>) {
            dy_dt[0] = -self.rate * y[0];
        }
    }

    struct ConstantDrain;

    impl IVP<Time, State<2>> for ConstantDrain {
        fn calculate_dy_dt(&self, _t: Time, _y: &State<2>, dy_dt: &mut State<2>) {
            dy_dt[0] = -1.0;
            dy_dt[1] = 0.5;
        }
    }

    fn loose() -> SolverOptions {
        SolverOptions {
            rtol: 1e-10,
            atol: 1e-12,
            segment_length: 0.5,
        }
    }

    #[test]
    fn test_exponential_decay() {
        let model = Decay { rate: 0.7 };
        let trajectory = integrate_guarded(
            &model,
            &NonNegativityGuard,
            0.0,
            3.0,
            State::<1>::new(2.0),
            &loose(),
        )
        .unwrap();

        let (start, end) = trajectory.span();
        assert_eq!(start, 0.0);
        assert_eq!(end, 3.0);
        assert_relative_eq!(
            trajectory.final_state()[0],
            2.0 * (-0.7_f64 * 3.0).exp(),
            max_relative = 1e-7
        );
        assert_relative_eq!(
            trajectory.at(1.234).unwrap()[0],
            2.0 * (-0.7_f64 * 1.234).exp(),
            max_relative = 1e-5
        );
        assert_eq!(trajectory.corrections(), 0);
    }

    #[test]
    fn test_default_tolerances() {
        let options = SolverOptions::default();
        assert_eq!(options.rtol, 1e-16);
        assert_eq!(options.atol, 1e-16);
        assert_eq!(options.segment_length, 1.0);
    }

    #[test]
    fn test_guard_clamps_negative_excursions() {
        let trajectory = integrate_guarded(
            &ConstantDrain,
            &NonNegativityGuard,
            0.0,
            1.5,
            State::<2>::new(1.0, 0.0),
            &loose(),
        )
        .unwrap();

        assert!(trajectory.corrections() > 0);
        for state in trajectory.states() {
            assert!(state[0] >= 0.0, "negative state {state:?}");
        }
        assert_eq!(trajectory.final_state()[0], 0.0);
        assert_relative_eq!(trajectory.final_state()[1], 0.75, max_relative = 1e-6);
    }

    #[test]
    fn test_negative_initial_state_is_clamped() {
        let model = Decay { rate: 1.0 };
        let trajectory = integrate_guarded(
            &model,
            &NonNegativityGuard,
            0.0,
            1.0,
            State::<1>::new(-1.0),
            &loose(),
        )
        .unwrap();
        assert_eq!(trajectory.states()[0][0], 0.0);
        assert_eq!(trajectory.final_state()[0], 0.0);
        assert_eq!(trajectory.corrections(), 1);
    }

    #[test]
    fn test_invalid_span_and_options() {
        let model = Decay { rate: 1.0 };
        let y0 = State::<1>::new(1.0);
        assert!(matches!(
            integrate_guarded(&model, &NonNegativityGuard, 1.0, 1.0, y0, &loose()),
            Err(CfcError::Integration { .. })
        ));
        let bad = SolverOptions {
            segment_length: 0.0,
            ..loose()
        };
        assert!(matches!(
            integrate_guarded(&model, &NonNegativityGuard, 0.0, 1.0, y0, &bad),
            Err(CfcError::Config(_))
        ));
    }

    #[test]
    fn test_solver_options_serde_defaults() {
        let options: SolverOptions = serde_json::from_str(r#"{"segment_length": 2.0}"#).unwrap();
        assert_eq!(options.segment_length, 2.0);
        assert_eq!(options.rtol, 1e-16);
    }
}

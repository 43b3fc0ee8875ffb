//! Queryable solution of a guarded integration.

use crate::errors::{CfcError, CfcResult};
use crate::ivp::State;
use crate::timeseries::{FloatValue, Time};
use ndarray::Array2;

/// Accepted solver steps with the state derivative at each, giving dense
/// output anywhere inside the integrated span.
///
/// `ode_solvers` does not expose the Dopri5 continuous extension, so this
/// stands in for it: between steps the state is the cubic Hermite
/// interpolant of the two neighbouring steps. A component whose interpolant dips below zero while
/// both neighbouring values are non-negative falls back to linear
/// interpolation, so a non-negative trajectory stays non-negative when queried.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<const N: usize> {
    times: Vec<Time>,
    states: Vec<State<N>>,
    derivatives: Vec<State<N>>,
    corrections: usize,
}

impl<const N: usize> Trajectory<N> {
    pub fn new(
        times: Vec<Time>,
        states: Vec<State<N>>,
        derivatives: Vec<State<N>>,
        corrections: usize,
    ) -> CfcResult<Self> {
        if times.is_empty() || times.len() != states.len() || times.len() != derivatives.len() {
            return Err(CfcError::Error(format!(
                "trajectory needs matching non-empty vectors, \
                 got {} times, {} states, {} derivatives",
                times.len(),
                states.len(),
                derivatives.len()
            )));
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CfcError::Error(
                "trajectory times must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            times,
            states,
            derivatives,
            corrections,
        })
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    pub fn states(&self) -> &[State<N>] {
        &self.states
    }

    pub fn derivatives(&self) -> &[State<N>] {
        &self.derivatives
    }

    /// Number of times the step guard corrected the state.
    pub fn corrections(&self) -> usize {
        self.corrections
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn span(&self) -> (Time, Time) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    pub fn final_state(&self) -> State<N> {
        self.states[self.states.len() - 1]
    }

    /// State at time `t`.
    pub fn at(&self, t: Time) -> CfcResult<State<N>> {
        let (start, end) = self.span();
        if t.is_nan() {
            return Err(CfcError::Error("cannot query a trajectory at NaN".to_string()));
        }
        if t < start {
            return Err(CfcError::ExtrapolationNotAllowed(
                t,
                "start".to_string(),
                start,
            ));
        }
        if t > end {
            return Err(CfcError::ExtrapolationNotAllowed(t, "end".to_string(), end));
        }

        let idx = self.times.partition_point(|x| *x <= t);
        if self.times[idx - 1] == t {
            return Ok(self.states[idx - 1]);
        }

        let (t0, t1) = (self.times[idx - 1], self.times[idx]);
        let (y0, y1) = (&self.states[idx - 1], &self.states[idx]);
        let (dy0, dy1) = (&self.derivatives[idx - 1], &self.derivatives[idx]);

        let h = t1 - t0;
        let s = (t - t0) / h;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        let mut y = y0 * h00 + dy0 * (h10 * h) + y1 * h01 + dy1 * (h11 * h);
        for i in 0..N {
            if y[i] < 0.0 && y0[i] >= 0.0 && y1[i] >= 0.0 {
                y[i] = y0[i] + (y1[i] - y0[i]) * s;
            }
        }
        Ok(y)
    }

    /// Single state component at time `t`.
    pub fn component_at(&self, component: usize, t: Time) -> CfcResult<FloatValue> {
        if component >= N {
            return Err(CfcError::Error(format!(
                "component {component} out of range for a {N} component state"
            )));
        }
        Ok(self.at(t)?[component])
    }

    /// States at the requested times, one row per time.
    pub fn sample(&self, times: &[Time]) -> CfcResult<Array2<FloatValue>> {
        let mut out = Array2::zeros((times.len(), N));
        for (row, t) in times.iter().enumerate() {
            let y = self.at(*t)?;
            for (col, v) in y.iter().enumerate() {
                out[[row, col]] = *v;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn cubic() -> Trajectory<1> {
        // y = t^3 sampled at integer times, exact derivatives
        let times = vec![0.0, 1.0, 2.0, 3.0];
        let states = times.iter().map(|t: &f64| State::<1>::new(t.powi(3))).collect();
        let derivatives = times
            .iter()
            .map(|t: &f64| State::<1>::new(3.0 * t.powi(2)))
            .collect();
        Trajectory::new(times, states, derivatives, 0).unwrap()
    }

    #[test]
    fn test_reproduces_knots() {
        let trajectory = cubic();
        for (t, y) in trajectory.times().iter().zip(trajectory.states()) {
            assert_eq!(trajectory.at(*t).unwrap(), *y);
        }
    }

    #[test]
    fn test_hermite_is_exact_for_cubics() {
        let trajectory = cubic();
        for t in [0.25, 1.5, 2.75] {
            let expected: f64 = t * t * t;
            assert!(is_close!(trajectory.at(t).unwrap()[0], expected));
        }
    }

    #[test]
    fn test_rejects_extrapolation() {
        let trajectory = cubic();
        assert!(matches!(
            trajectory.at(-0.1),
            Err(CfcError::ExtrapolationNotAllowed(..))
        ));
        assert!(matches!(
            trajectory.at(3.5),
            Err(CfcError::ExtrapolationNotAllowed(..))
        ));
        assert!(trajectory.component_at(1, 1.0).is_err());
    }

    #[test]
    fn test_interpolant_kept_non_negative() {
        // Steep decay to zero overshoots with Hermite
        let trajectory = Trajectory::new(
            vec![0.0, 1.0],
            vec![State::<1>::new(1.0), State::<1>::new(0.0)],
            vec![State::<1>::new(-10.0), State::<1>::new(0.0)],
            1,
        )
        .unwrap();
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            assert!(trajectory.at(t).unwrap()[0] >= 0.0);
        }
    }

    #[test]
    fn test_sample_shape() {
        let trajectory = cubic();
        let sampled = trajectory.sample(&[0.0, 1.0, 2.0, 3.0, 0.5]).unwrap();
        assert_eq!(sampled.shape(), &[5, 1]);
        assert_eq!(sampled[[3, 0]], 27.0);
        assert!(is_close!(sampled[[4, 0]], 0.125));
    }

    #[test]
    fn test_invalid_construction() {
        assert!(Trajectory::<1>::new(vec![], vec![], vec![], 0).is_err());
        assert!(Trajectory::new(
            vec![0.0, 0.0],
            vec![State::<1>::zeros(); 2],
            vec![State::<1>::zeros(); 2],
            0
        )
        .is_err());
    }
}

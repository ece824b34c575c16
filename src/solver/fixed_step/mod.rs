//! Fixed step explicit integrators with no error control, explicit
//! Euler, Heun's predictor corrector and the midpoint (RK2) rule.
//!
//! All three check for a spike after the proposed step: when the new
//! voltage crosses the cutoff, the record for the current instant is
//! retroactively clipped to the peak value and the recorded next state
//! is the after spike reset pair.

use super::{StepKind, Trajectory};
use crate::model::{InputCurrent, IzhikevichParameters, NeuronState};


/// Step size configuration for methods without error control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepConfig {
    /// Step size (ms)
    pub step_size: f64,
    /// Total simulation time (ms)
    pub total_time: f64,
}

impl Default for FixedStepConfig {
    fn default() -> Self {
        FixedStepConfig {
            step_size: 1., // step size (ms)
            total_time: 1000., // simulation horizon (ms)
        }
    }
}

/// A scheme that advances the state by one fixed step
pub trait FixedStepScheme {
    /// Advances the state from time `t` to `t + h`
    fn step(
        params: &IzhikevichParameters,
        input: &InputCurrent,
        state: NeuronState,
        t: f64,
        h: f64,
    ) -> NeuronState;
}

/// Explicit Euler, `y_{n+1} = y_n + h f(t_n, y_n)`
pub struct ExplicitEuler;

impl FixedStepScheme for ExplicitEuler {
    fn step(
        params: &IzhikevichParameters,
        input: &InputCurrent,
        state: NeuronState,
        t: f64,
        h: f64,
    ) -> NeuronState {
        let (dv, dw) = params.derivatives(state, input.at(t));

        NeuronState {
            v: state.v + h * dv,
            w: state.w + h * dw,
        }
    }
}

/// Heun's predictor corrector, an Euler predictor evaluated at `t_n`
/// averaged with a corrector slope evaluated at `t_{n+1}`
pub struct Heun;

impl FixedStepScheme for Heun {
    fn step(
        params: &IzhikevichParameters,
        input: &InputCurrent,
        state: NeuronState,
        t: f64,
        h: f64,
    ) -> NeuronState {
        let (dv1, dw1) = params.derivatives(state, input.at(t));
        let predicted = NeuronState {
            v: state.v + h * dv1,
            w: state.w + h * dw1,
        };
        let (dv2, dw2) = params.derivatives(predicted, input.at(t + h));

        NeuronState {
            v: state.v + (h / 2.) * (dv1 + dv2),
            w: state.w + (h / 2.) * (dw1 + dw2),
        }
    }
}

/// Midpoint rule (RK2), a half step to the interval midpoint whose slope
/// carries the full step. The input current is sampled once at the end
/// of the step and held constant across both stages, so a switching
/// input takes effect one step earlier than under explicit Euler
pub struct Midpoint;

impl FixedStepScheme for Midpoint {
    fn step(
        params: &IzhikevichParameters,
        input: &InputCurrent,
        state: NeuronState,
        t: f64,
        h: f64,
    ) -> NeuronState {
        let current = input.at(t + h);

        let (k1_v, k1_w) = params.derivatives(state, current);
        let mid = NeuronState {
            v: state.v + (h / 2.) * k1_v,
            w: state.w + (h / 2.) * k1_w,
        };
        let (k2_v, k2_w) = params.derivatives(mid, current);

        NeuronState {
            v: state.v + h * k2_v,
            w: state.w + h * k2_w,
        }
    }
}

/// Integrates the model with the given fixed step scheme, returns the
/// full trajectory with one record per step plus the initial condition
pub fn integrate<S: FixedStepScheme>(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    config: &FixedStepConfig,
) -> Trajectory {
    let steps = (config.total_time / config.step_size).round() as usize;
    let h = config.step_size;

    let mut trajectory = Trajectory::with_capacity(steps + 1);
    trajectory.push(0., initial, h, StepKind::Initial);

    let mut state = initial;

    for i in 0..steps {
        let t = i as f64 * h;
        let mut next = S::step(params, input, state, t, h);

        // on a spike the record for this instant is clipped to the peak
        let spiked = params.handle_spiking(&mut trajectory.voltages[i], &mut next);
        let kind = if spiked { StepKind::SpikeReset } else { StepKind::Fixed };

        trajectory.push(t + h, next, h, kind);
        state = next;
    }

    trajectory
}

/// Integrates with explicit Euler
pub fn euler(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    config: &FixedStepConfig,
) -> Trajectory {
    integrate::<ExplicitEuler>(params, input, initial, config)
}

/// Integrates with Heun's predictor corrector
pub fn heun(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    config: &FixedStepConfig,
) -> Trajectory {
    integrate::<Heun>(params, input, initial, config)
}

/// Integrates with the midpoint (RK2) rule
pub fn midpoint(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    config: &FixedStepConfig,
) -> Trajectory {
    integrate::<Midpoint>(params, input, initial, config)
}

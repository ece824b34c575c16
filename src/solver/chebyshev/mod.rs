//! Runge-Kutta-Chebyshev, an explicit multistage method whose damped
//! Chebyshev recurrence buys an extended stability region at larger
//! step sizes, paid for with `s` derivative evaluations per step.
//!
//! The spike check happens before the step, as in the implicit method.

use std::f64::consts::PI;
use super::{StepKind, Trajectory};
use crate::model::{InputCurrent, IzhikevichParameters, NeuronState};


/// Stage and damping configuration for the Chebyshev recurrence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChebyshevSettings {
    /// Number of stages per step
    pub stages: usize,
    /// Damping parameter
    pub damping: f64,
}

impl Default for ChebyshevSettings {
    fn default() -> Self {
        ChebyshevSettings {
            stages: 4, // derivative evaluations per step
            damping: 1.0, // damping parameter
        }
    }
}

/// Advances one step through the s-stage recurrence, the first stage is
/// an Euler sub-step of size `h/s` and later stages blend the previous
/// two stage states with a fresh derivative evaluation
fn chebyshev_step(
    params: &IzhikevichParameters,
    state: NeuronState,
    current: f64,
    h: f64,
    settings: &ChebyshevSettings,
) -> NeuronState {
    let s = settings.stages;
    let tau = 1. / (settings.damping * settings.damping);

    let (dv, dw) = params.derivatives(state, current);
    let mut previous = state;
    let mut latest = NeuronState {
        v: state.v + (h / s as f64) * dv,
        w: state.w + (h / s as f64) * dw,
    };

    let theta = PI / (2. * s as f64);
    let omega_0 = 1.0 + theta.sin().powi(2) / 3.0;

    for j in 2..=s {
        let theta_j = (j - 1) as f64 * theta;
        let omega_j = 1.0 + theta_j.sin().powi(2) / 3.0;

        let beta = if j == 2 {
            (2. * omega_j) / omega_0
        } else {
            (4. * omega_j) / omega_0
        };
        let alpha = beta / tau;

        let (f_v, f_w) = params.derivatives(latest, current);

        let blended = NeuronState {
            v: (1. - alpha) * previous.v + alpha * latest.v + beta * (h / s as f64) * f_v,
            w: (1. - alpha) * previous.w + alpha * latest.w + beta * (h / s as f64) * f_w,
        };

        previous = latest;
        latest = blended;
    }

    latest
}

/// Integrates the model with the Runge-Kutta-Chebyshev recurrence at a
/// fixed step size, recording the stage count per step
pub fn integrate(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    step_size: f64,
    total_time: f64,
    settings: &ChebyshevSettings,
) -> Trajectory {
    let steps = (total_time / step_size).round() as usize;
    let h = step_size;

    let mut trajectory = Trajectory::with_capacity(steps + 1);
    trajectory.push(0., initial, h, StepKind::Initial);

    let mut state = initial;

    for i in 0..steps {
        let t = i as f64 * h;

        let mut reset = state;
        if params.handle_spiking(&mut trajectory.voltages[i], &mut reset) {
            trajectory.push(t + h, reset, h, StepKind::SpikeReset);
            state = reset;
            continue;
        }

        let next = chebyshev_step(params, state, input.at(t), h, settings);

        trajectory.push(t + h, next, h, StepKind::ChebyshevStages { stages: settings.stages });
        state = next;
    }

    trajectory
}

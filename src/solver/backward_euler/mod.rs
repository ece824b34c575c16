//! Backward Euler with Newton iteration, an implicit method that solves
//! `y_{n+1} = y_n + h f(t_{n+1}, y_{n+1})` each step via a 2x2 Newton
//! solve with the model's analytic Jacobian.
//!
//! The spike check happens before the solve: a state already at or above
//! the cutoff is clipped in place, the reset pair is recorded for the
//! next instant and no Newton solve occurs for that step.

use super::{StepKind, Trajectory};
use crate::model::{InputCurrent, IzhikevichParameters, NeuronState};


/// Convergence settings for the per step Newton iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSettings {
    /// Both component updates must fall below this absolute value
    pub tolerance: f64,
    /// Iteration cap, the reached state is accepted when exceeded
    pub max_iterations: usize,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        NewtonSettings {
            tolerance: 1e-6, // absolute update tolerance
            max_iterations: 100, // iteration cap
        }
    }
}

/// Solves one implicit step for the state at `t + h`, returns the solved
/// state and the number of Newton iterations used, a singular Jacobian
/// aborts the iteration and the current guess is accepted
fn newton_step(
    params: &IzhikevichParameters,
    state: NeuronState,
    current: f64,
    h: f64,
    settings: &NewtonSettings,
) -> (NeuronState, usize) {
    // initial guess from one explicit Euler step
    let (dv, dw) = params.derivatives(state, current);
    let mut next = NeuronState {
        v: state.v + h * dv,
        w: state.w + h * dw,
    };

    let mut iterations = 0;

    for _ in 0..settings.max_iterations {
        iterations += 1;

        let (f_v, f_w) = params.derivatives(next, current);
        let residual_v = next.v - state.v - h * f_v;
        let residual_w = next.w - state.w - h * f_w;

        // Jacobian of the residual, identity minus h times the model Jacobian
        let jacobian = params.jacobian(next.v);
        let j11 = 1. - h * jacobian[0][0];
        let j12 = -h * jacobian[0][1];
        let j21 = -h * jacobian[1][0];
        let j22 = 1. - h * jacobian[1][1];

        let det = j11 * j22 - j12 * j21;
        if det == 0. {
            break;
        }

        // Cramer's rule for the Newton update
        let delta_v = (residual_w * j12 - residual_v * j22) / det;
        let delta_w = (residual_v * j21 - residual_w * j11) / det;

        next.v += delta_v;
        next.w += delta_w;

        if delta_v.abs() < settings.tolerance && delta_w.abs() < settings.tolerance {
            break;
        }
    }

    (next, iterations)
}

/// Integrates the model with Backward Euler at a fixed step size,
/// recording the Newton iteration count used for every step, `0` for
/// spike reset steps
pub fn integrate(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    step_size: f64,
    total_time: f64,
    settings: &NewtonSettings,
) -> Trajectory {
    let steps = (total_time / step_size).round() as usize;
    let h = step_size;

    let mut trajectory = Trajectory::with_capacity(steps + 1);
    trajectory.push(0., initial, h, StepKind::Initial);

    let mut state = initial;

    for i in 0..steps {
        let t = i as f64 * h;

        // spike check on the current state, skips the solve entirely
        let mut reset = state;
        if params.handle_spiking(&mut trajectory.voltages[i], &mut reset) {
            trajectory.push(t + h, reset, h, StepKind::SpikeReset);
            state = reset;
            continue;
        }

        let current = input.at(t + h);
        let (next, iterations) = newton_step(params, state, current, h, settings);

        trajectory.push(t + h, next, h, StepKind::NewtonSolve { iterations });
        state = next;
    }

    trajectory
}

//! Adaptive step integrators with embedded error estimation, the
//! classical Runge-Kutta-Fehlberg 4(5) pair and a first order
//! exponential Rosenbrock-Euler scheme with Richardson extrapolation.
//!
//! Both bound the number of consecutive rejections per step and fail
//! with [`IntegrationError::NonConvergentStep`] when the local error
//! cannot be driven below tolerance.

use super::{StepKind, Trajectory};
use crate::error::IntegrationError;
use crate::model::{InputCurrent, IzhikevichParameters, NeuronState};

// Fehlberg tableau, stage times
const C2: f64 = 1.0 / 4.0;
const C3: f64 = 3.0 / 8.0;
const C4: f64 = 12.0 / 13.0;
const C5: f64 = 1.0;
const C6: f64 = 1.0 / 2.0;

const A21: f64 = 1.0 / 4.0;
const A31: f64 = 3.0 / 32.0;
const A32: f64 = 9.0 / 32.0;
const A41: f64 = 1932.0 / 2197.0;
const A42: f64 = -7200.0 / 2197.0;
const A43: f64 = 7296.0 / 2197.0;
const A51: f64 = 439.0 / 216.0;
const A52: f64 = -8.0;
const A53: f64 = 3680.0 / 513.0;
const A54: f64 = -845.0 / 4104.0;
const A61: f64 = -8.0 / 27.0;
const A62: f64 = 2.0;
const A63: f64 = -3544.0 / 2565.0;
const A64: f64 = 1859.0 / 4104.0;
const A65: f64 = -11.0 / 40.0;

// 4th order weights
const B4_1: f64 = 25.0 / 216.0;
const B4_3: f64 = 1408.0 / 2565.0;
const B4_4: f64 = 2197.0 / 4104.0;
const B4_5: f64 = -1.0 / 5.0;

// 5th order weights
const B5_1: f64 = 16.0 / 135.0;
const B5_3: f64 = 6656.0 / 12825.0;
const B5_4: f64 = 28561.0 / 56430.0;
const B5_5: f64 = -9.0 / 50.0;
const B5_6: f64 = 2.0 / 55.0;

/// Step size policy for the Runge-Kutta-Fehlberg integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rkf45Settings {
    /// Step size to start from (ms)
    pub initial_step: f64,
    /// Local error tolerance
    pub tolerance: f64,
    /// Step size floor (ms), a floor clamped step is always accepted
    pub min_step: f64,
    /// Step size ceiling (ms)
    pub max_step: f64,
    /// Safety factor on the step size controller
    pub safety: f64,
    /// Consecutive rejections allowed before the step is declared
    /// non-convergent
    pub max_rejections: usize,
}

impl Default for Rkf45Settings {
    fn default() -> Self {
        Rkf45Settings {
            initial_step: 0.25, // starting step size (ms)
            tolerance: 1e-5, // error tolerance
            min_step: 1e-4, // step size floor (ms)
            max_step: 2.0, // step size ceiling (ms)
            safety: 0.98, // safety factor
            max_rejections: 100, // rejection cap per step
        }
    }
}

/// Step size policy for the exponential Rosenbrock-Euler integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosenbrockSettings {
    /// Step size to start from (ms)
    pub initial_step: f64,
    /// Local error tolerance
    pub tolerance: f64,
    /// Lower clamp on the error ratio growth factor
    pub factor_min: f64,
    /// Upper clamp on the error ratio growth factor
    pub factor_max: f64,
    /// Step size floor (ms)
    pub min_step: f64,
    /// Step size ceiling (ms)
    pub max_step: f64,
    /// Consecutive rejections allowed before the step is declared
    /// non-convergent
    pub max_rejections: usize,
}

impl Default for RosenbrockSettings {
    fn default() -> Self {
        RosenbrockSettings {
            initial_step: 0.25, // starting step size (ms)
            tolerance: 0.5, // error tolerance
            factor_min: 0.1, // growth factor floor
            factor_max: 5.0, // growth factor ceiling
            min_step: 0.01, // step size floor (ms)
            max_step: 2.0, // step size ceiling (ms)
            max_rejections: 100, // rejection cap per step
        }
    }
}

/// One six stage Fehlberg evaluation, returns the 5th order state and
/// the Euclidean norm of the embedded 4th/5th order difference
fn rkf45_step(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    state: NeuronState,
    t: f64,
    h: f64,
) -> (NeuronState, f64) {
    let eval = |v: f64, w: f64, stage_t: f64| {
        params.derivatives(NeuronState { v, w }, input.at(stage_t))
    };

    let k1 = eval(state.v, state.w, t);
    let k2 = eval(
        state.v + h * A21 * k1.0,
        state.w + h * A21 * k1.1,
        t + C2 * h,
    );
    let k3 = eval(
        state.v + h * (A31 * k1.0 + A32 * k2.0),
        state.w + h * (A31 * k1.1 + A32 * k2.1),
        t + C3 * h,
    );
    let k4 = eval(
        state.v + h * (A41 * k1.0 + A42 * k2.0 + A43 * k3.0),
        state.w + h * (A41 * k1.1 + A42 * k2.1 + A43 * k3.1),
        t + C4 * h,
    );
    let k5 = eval(
        state.v + h * (A51 * k1.0 + A52 * k2.0 + A53 * k3.0 + A54 * k4.0),
        state.w + h * (A51 * k1.1 + A52 * k2.1 + A53 * k3.1 + A54 * k4.1),
        t + C5 * h,
    );
    let k6 = eval(
        state.v + h * (A61 * k1.0 + A62 * k2.0 + A63 * k3.0 + A64 * k4.0 + A65 * k5.0),
        state.w + h * (A61 * k1.1 + A62 * k2.1 + A63 * k3.1 + A64 * k4.1 + A65 * k5.1),
        t + C6 * h,
    );

    let v4 = state.v + h * (B4_1 * k1.0 + B4_3 * k3.0 + B4_4 * k4.0 + B4_5 * k5.0);
    let w4 = state.w + h * (B4_1 * k1.1 + B4_3 * k3.1 + B4_4 * k4.1 + B4_5 * k5.1);

    let v5 = state.v + h * (B5_1 * k1.0 + B5_3 * k3.0 + B5_4 * k4.0 + B5_5 * k5.0 + B5_6 * k6.0);
    let w5 = state.w + h * (B5_1 * k1.1 + B5_3 * k3.1 + B5_4 * k4.1 + B5_5 * k5.1 + B5_6 * k6.1);

    let error = ((v5 - v4).powi(2) + (w5 - w4).powi(2)).sqrt();

    (NeuronState { v: v5, w: w5 }, error)
}

/// Integrates the model with the adaptive Runge-Kutta-Fehlberg pair,
/// the accepted state is always the higher order estimate.
///
/// A spike on the previously accepted state produces two records at the
/// same time coordinate, the clipped peak and then the reset state.
pub fn rkf45(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    total_time: f64,
    settings: &Rkf45Settings,
) -> Result<Trajectory, IntegrationError> {
    let mut trajectory = Trajectory::new();

    let mut t = 0.0;
    let mut state = initial;
    let mut h = settings.initial_step;
    let mut rejections = 0;

    trajectory.push(t, state, h, StepKind::Initial);

    while t < total_time {
        // spike check on the previous accepted state
        let peak_record = NeuronState { v: params.v_peak, w: state.w };
        let mut peak = state.v;
        if params.handle_spiking(&mut peak, &mut state) {
            trajectory.push(t, peak_record, h, StepKind::ClippedPeak);
            trajectory.push(t, state, h, StepKind::SpikeReset);
        }

        // never overshoot the end of the simulation
        if t + h > total_time {
            h = total_time - t;
        }

        let (next, error) = rkf45_step(params, input, state, t, h);

        if error <= settings.tolerance || h <= settings.min_step {
            t += h;
            state = next;
            trajectory.push(t, state, h, StepKind::Accepted { error_estimate: error, rejections });
            rejections = 0;
        } else {
            rejections += 1;
            if rejections > settings.max_rejections {
                return Err(IntegrationError::NonConvergentStep { time: t, rejections });
            }
        }

        // controller runs after every attempt, accepted or not, with a
        // guard against numerically zero error estimates
        let h_new = if error > 1e-15 {
            settings.safety * h * (settings.tolerance / error).powf(0.2)
        } else {
            h * 2.0
        };
        h = h_new.clamp(settings.min_step, settings.max_step);
    }

    Ok(trajectory)
}

fn norm(dv: f64, dw: f64) -> f64 {
    (dv * dv + dw * dw).sqrt()
}

/// Inverse of `I - h J` for a 2x2 Jacobian, `None` when singular
fn phi_matrix(jacobian: [[f64; 2]; 2], h: f64) -> Option<[[f64; 2]; 2]> {
    let m11 = 1. - h * jacobian[0][0];
    let m12 = -h * jacobian[0][1];
    let m21 = -h * jacobian[1][0];
    let m22 = 1. - h * jacobian[1][1];

    let det = m11 * m22 - m12 * m21;
    if det == 0. {
        return None;
    }

    Some([
        [m22 / det, -m12 / det],
        [-m21 / det, m11 / det],
    ])
}

fn mat_vec(m: [[f64; 2]; 2], v: (f64, f64)) -> (f64, f64) {
    (
        m[0][0] * v.0 + m[0][1] * v.1,
        m[1][0] * v.0 + m[1][1] * v.1,
    )
}

/// Integrates the model with the adaptive exponential Rosenbrock-Euler
/// scheme, estimating the local error by Richardson extrapolation of a
/// full step against two half steps and taking the half step result on
/// acceptance.
///
/// Rejected attempts shrink the step and retry from the same state with
/// no time advance and no trajectory record. A spike detected on an
/// accepted state records only the reset state, never the clipped peak.
pub fn exponential_rosenbrock(
    params: &IzhikevichParameters,
    input: &InputCurrent,
    initial: NeuronState,
    total_time: f64,
    settings: &RosenbrockSettings,
) -> Result<Trajectory, IntegrationError> {
    let mut trajectory = Trajectory::new();

    let mut t = 0.0;
    let mut state = initial;
    let mut h = settings.initial_step;
    let mut rejections = 0;

    trajectory.push(t, state, h, StepKind::Initial);

    while t < total_time {
        let current = input.at(t);
        let f = params.derivatives(state, current);
        let jacobian = params.jacobian(state.v);

        // a singular matrix counts as a rejection, halve and retry
        let (phi, phi_half) = match (phi_matrix(jacobian, h), phi_matrix(jacobian, h / 2.)) {
            (Some(phi), Some(phi_half)) => (phi, phi_half),
            _ => {
                rejections += 1;
                if rejections > settings.max_rejections {
                    return Err(IntegrationError::NonConvergentStep { time: t, rejections });
                }
                h = (h * 0.5).max(settings.min_step);
                continue;
            },
        };

        // full step
        let update = mat_vec(phi, f);
        let full = NeuronState {
            v: state.v + h * update.0,
            w: state.w + h * update.1,
        };

        // two half steps with the matrix re-formed at the half step size
        let h_half = h / 2.;
        let half_update = mat_vec(phi_half, f);
        let halfway = NeuronState {
            v: state.v + h_half * half_update.0,
            w: state.w + h_half * half_update.1,
        };
        let f_half = params.derivatives(halfway, current);
        let second_update = mat_vec(phi_half, f_half);
        let doubled = NeuronState {
            v: halfway.v + h_half * second_update.0,
            w: halfway.w + h_half * second_update.1,
        };

        let error = norm(full.v - doubled.v, full.w - doubled.w).max(1e-10);

        if error < settings.tolerance {
            t += h;
            state = doubled;

            let mut peak = state.v;
            params.handle_spiking(&mut peak, &mut state);

            trajectory.push(t, state, h, StepKind::Accepted { error_estimate: error, rejections });
            rejections = 0;

            let factor = (settings.tolerance / error)
                .powf(0.5)
                .clamp(settings.factor_min, settings.factor_max);
            h = (h * factor).clamp(settings.min_step, settings.max_step);
        } else {
            rejections += 1;
            if rejections > settings.max_rejections {
                return Err(IntegrationError::NonConvergentStep { time: t, rejections });
            }

            let factor = (settings.tolerance / error).powf(0.5).max(settings.factor_min);
            h = (h * factor).max(settings.min_step);
        }
    }

    Ok(trajectory)
}

//! The Izhikevich simplified neuron model, its parameter set, external
//! input currents, and the spike detection and reset rule shared by
//! every integration method.

use rand_distr::{Normal, Distribution};


/// The two state variables of the neuron model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeuronState {
    /// Membrane potential (mV)
    pub v: f64,
    /// Recovery variable (pA)
    pub w: f64,
}

impl NeuronState {
    /// Returns a new state from a voltage and recovery pair
    pub fn new(v: f64, w: f64) -> Self {
        NeuronState { v, w }
    }
}

/// External input current fed into the voltage equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCurrent {
    /// Fixed current for the whole simulation (pA)
    Constant(f64),
    /// Zero before the onset time, a fixed amplitude at and after it
    Step {
        /// Time the current switches on (ms)
        onset: f64,
        /// Current after the onset (pA)
        amplitude: f64,
    },
    /// A fixed amplitude inside a closed time window, zero outside of it
    Pulse {
        /// Time the current switches on (ms)
        on: f64,
        /// Time the current switches off (ms)
        off: f64,
        /// Current inside the window (pA)
        amplitude: f64,
    },
}

impl InputCurrent {
    /// Evaluates the input current at the given time (ms)
    pub fn at(&self, t: f64) -> f64 {
        match *self {
            InputCurrent::Constant(amplitude) => amplitude,
            InputCurrent::Step { onset, amplitude } => {
                if t >= onset {
                    amplitude
                } else {
                    0.
                }
            },
            InputCurrent::Pulse { on, off, amplitude } => {
                if on <= t && t <= off {
                    amplitude
                } else {
                    0.
                }
            },
        }
    }
}

/// Parameters of the Izhikevich simplified model, fixed for the duration
/// of one simulation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IzhikevichParameters {
    /// Membrane capacitance (pF)
    pub c_m: f64,
    /// Gain on the quadratic voltage term
    pub k: f64,
    /// Resting potential (mV)
    pub v_rest: f64,
    /// Threshold potential (mV)
    pub v_threshold: f64,
    /// Recovery timescale
    pub a: f64,
    /// Sensitivity of recovery to subthreshold fluctuations
    pub b: f64,
    /// After spike reset value for voltage (mV)
    pub c: f64,
    /// After spike increment for the recovery variable (pA)
    pub d: f64,
    /// Spike cutoff value (mV)
    pub v_peak: f64,
}

impl Default for IzhikevichParameters {
    fn default() -> Self {
        IzhikevichParameters {
            c_m: 100., // capacitance (pF)
            k: 0.7, // gain parameter
            v_rest: -60., // resting potential (mV)
            v_threshold: -40., // threshold potential (mV)
            a: 0.03, // recovery time scale
            b: -2., // recovery sensitivity
            c: -50., // after spike reset value for v (mV)
            d: 100., // after spike increment for w (pA)
            v_peak: 35., // spike cutoff value (mV)
        }
    }
}

impl IzhikevichParameters {
    /// Calculates the right hand side of the model at the given state and
    /// input current, returns the voltage and recovery derivatives, may be
    /// evaluated at intermediate stage states off the recorded trajectory
    pub fn derivatives(&self, state: NeuronState, i: f64) -> (f64, f64) {
        let dv = (self.k * (state.v - self.v_rest) * (state.v - self.v_threshold) - state.w + i) / self.c_m;
        let dw = self.a * (self.b * (state.v - self.v_rest) - state.w);

        (dv, dw)
    }

    /// Calculates the analytic Jacobian of the right hand side at the given
    /// voltage, row major, the recovery column does not depend on the state
    pub fn jacobian(&self, v: f64) -> [[f64; 2]; 2] {
        [
            [self.k * (2. * v - self.v_rest - self.v_threshold) / self.c_m, -1. / self.c_m],
            [self.a * self.b, -self.a],
        ]
    }

    /// The starting state used by the reference simulations, resting
    /// potential with no recovery current
    pub fn resting_state(&self) -> NeuronState {
        NeuronState { v: self.v_rest, w: 0. }
    }

    /// Determines whether the proposed state has crossed the spike cutoff
    /// and resets it if so, writing the clipped peak voltage into `peak`
    /// and overwriting `next` with the after spike pair `(c, w + d)`,
    /// applied at most once per spike by every integration method
    pub fn handle_spiking(&self, peak: &mut f64, next: &mut NeuronState) -> bool {
        let mut is_spiking = false;

        if next.v >= self.v_peak {
            is_spiking = !is_spiking;
            *peak = self.v_peak;
            next.v = self.c;
            next.w += self.d;
        }

        is_spiking
    }
}

/// Parameters used in generating input noise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianParameters {
    /// Mean of distribution
    pub mean: f64,
    /// Standard deviation of distribution
    pub std: f64,
    /// Maximum cutoff value
    pub max: f64,
    /// Minimum cutoff value
    pub min: f64,
}

impl Default for GaussianParameters {
    fn default() -> Self {
        GaussianParameters {
            mean: 1.0, // center of norm distr
            std: 0.0, // std of norm distr
            max: 2.0, // maximum cutoff for norm distr
            min: 0.0, // minimum cutoff for norm distr
        }
    }
}

impl GaussianParameters {
    /// Generates a normally distributed random number clamped between
    /// a minimum and a maximum, if standard deviation is `0.` the mean
    /// is always returned
    pub fn get_random_number(&self) -> f64 {
        if self.std == 0.0 {
            return self.mean;
        }

        let normal = Normal::new(self.mean, self.std).unwrap();
        let output: f64 = normal.sample(&mut rand::thread_rng());

        output.max(self.min).min(self.max)
    }
}

//! Time integration methods for the Izhikevich model along with the
//! trajectory container shared by all of them.
//!
//! Fixed step explicit methods live in [`fixed_step`], the implicit
//! Newton based method in [`backward_euler`], the stabilized multistage
//! method in [`chebyshev`] and the embedded pair and Richardson based
//! adaptive methods in [`adaptive`].

use ndarray::Array1;
use crate::model::{GaussianParameters, IzhikevichParameters, NeuronState};

pub mod fixed_step;
pub mod backward_euler;
pub mod chebyshev;
pub mod adaptive;


/// Method specific metadata attached to each trajectory record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepKind {
    /// Initial condition, no step taken
    Initial,
    /// Fixed step with no error control
    Fixed,
    /// Implicit step solved with the given number of Newton iterations
    NewtonSolve {
        /// Newton iterations used for this step
        iterations: usize,
    },
    /// Stabilized step built from the given number of Chebyshev stages
    ChebyshevStages {
        /// Derivative evaluations blended into this step
        stages: usize,
    },
    /// Adaptive step accepted with the given local error estimate
    Accepted {
        /// Euclidean norm of the embedded error estimate
        error_estimate: f64,
        /// Consecutive rejections before this step was accepted
        rejections: usize,
    },
    /// Voltage clipped to the spike cutoff at the spike instant
    ClippedPeak,
    /// After spike state, voltage forced to the reset value and the
    /// recovery variable incremented
    SpikeReset,
}

/// An ordered, append only record of one simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Time coordinate of each record (ms)
    pub times: Vec<f64>,
    /// Membrane potential at each record (mV)
    pub voltages: Vec<f64>,
    /// Recovery variable at each record (pA)
    pub recovery: Vec<f64>,
    /// Step size in effect when each record was produced (ms)
    pub step_sizes: Vec<f64>,
    /// Method specific metadata per record
    pub steps: Vec<StepKind>,
}

impl Trajectory {
    /// Creates an empty trajectory for methods whose step count is not
    /// known in advance
    pub fn new() -> Self {
        Trajectory {
            times: Vec::new(),
            voltages: Vec::new(),
            recovery: Vec::new(),
            step_sizes: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Creates a trajectory pre-sized for a known number of records
    pub fn with_capacity(records: usize) -> Self {
        Trajectory {
            times: Vec::with_capacity(records),
            voltages: Vec::with_capacity(records),
            recovery: Vec::with_capacity(records),
            step_sizes: Vec::with_capacity(records),
            steps: Vec::with_capacity(records),
        }
    }

    /// Appends one record
    pub fn push(&mut self, t: f64, state: NeuronState, h: f64, kind: StepKind) {
        self.times.push(t);
        self.voltages.push(state.v);
        self.recovery.push(state.w);
        self.step_sizes.push(h);
        self.steps.push(kind);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the trajectory holds no records
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// State stored at the given record index
    pub fn state_at(&self, index: usize) -> NeuronState {
        NeuronState {
            v: self.voltages[index],
            w: self.recovery[index],
        }
    }

    /// Final recorded state
    pub fn last_state(&self) -> Option<NeuronState> {
        if self.is_empty() {
            None
        } else {
            Some(self.state_at(self.len() - 1))
        }
    }

    /// Reports the Newton iteration count for every record, `0` for spike
    /// reset steps since no solve occurs then
    pub fn newton_iterations(&self) -> Vec<usize> {
        self.steps
            .iter()
            .map(|kind| match kind {
                StepKind::NewtonSolve { iterations } => *iterations,
                _ => 0,
            })
            .collect()
    }

    /// Voltage series as an array for spectral and error analysis
    pub fn voltage_array(&self) -> Array1<f64> {
        Array1::from(self.voltages.clone())
    }

    /// Recovery series as an array
    pub fn recovery_array(&self) -> Array1<f64> {
        Array1::from(self.recovery.clone())
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Trajectory::new()
    }
}

/// Takes in a static current as an input and iterates the model with
/// explicit Euler steps for a given duration, set `gaussian` to true to
/// add normally distributed noise to the input as it iterates, returns
/// the voltages from the neuron over time
pub fn run_static_input(
    params: &IzhikevichParameters,
    initial: NeuronState,
    input: f64,
    gaussian: bool,
    noise: &GaussianParameters,
    h: f64,
    iterations: usize,
) -> Vec<f64> {
    let mut voltages: Vec<f64> = Vec::with_capacity(iterations + 1);
    let mut state = initial;
    voltages.push(state.v);

    for _ in 0..iterations {
        let current = if gaussian {
            noise.get_random_number() * input
        } else {
            input
        };

        let (dv, dw) = params.derivatives(state, current);
        let mut next = NeuronState {
            v: state.v + h * dv,
            w: state.w + h * dw,
        };

        let last = voltages.len() - 1;
        params.handle_spiking(&mut voltages[last], &mut next);

        voltages.push(next.v);
        state = next;
    }

    voltages
}

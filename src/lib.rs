//! # Izhikevich Solvers
//!
//! `izhikevich_solvers` is a package of time integration methods for the
//! Izhikevich simplified spiking neuron model. The same two variable
//! system can be advanced with fixed step explicit schemes (explicit
//! Euler, Heun, midpoint), an implicit Backward Euler method solved by
//! Newton iteration, a stabilized Runge-Kutta-Chebyshev recurrence, and
//! two adaptive methods with embedded error control (Runge-Kutta-Fehlberg
//! 4(5) and an exponential Rosenbrock-Euler scheme). Every method shares
//! one spike detection and reset rule and produces a [`solver::Trajectory`]
//! of time, state, step size and per step diagnostics that downstream
//! consumers can tabulate, plot or export.
//!
//! ### Simulating a spiking run with explicit Euler
//!
//! ```rust
//! use izhikevich_solvers::model::{InputCurrent, IzhikevichParameters};
//! use izhikevich_solvers::solver::fixed_step::{self, FixedStepConfig};
//!
//! // canonical parameters, current steps from 0 to 70 pA at t = 101 ms
//! let params = IzhikevichParameters::default();
//! let input = InputCurrent::Step { onset: 101., amplitude: 70. };
//!
//! let trajectory = fixed_step::euler(
//!     &params,
//!     &input,
//!     params.resting_state(),
//!     &FixedStepConfig { step_size: 1., total_time: 1000. },
//! );
//!
//! // the current step up drives the neuron past the spike cutoff
//! assert!(trajectory.voltages.iter().any(|&v| v == params.v_peak));
//! ```
//!
//! ### Checking the implicit method against bundled reference values
//!
//! ```rust
//! use izhikevich_solvers::analysis::ReferenceCheckpoints;
//! use izhikevich_solvers::model::{InputCurrent, IzhikevichParameters};
//! use izhikevich_solvers::solver::backward_euler;
//!
//! let params = IzhikevichParameters::default();
//! let trajectory = backward_euler::integrate(
//!     &params,
//!     &InputCurrent::Constant(100.),
//!     params.resting_state(),
//!     0.25,
//!     1000.,
//!     &Default::default(),
//! );
//!
//! for comparison in ReferenceCheckpoints::default().compare(&trajectory, 0.25) {
//!     assert!(!comparison.is_out_of_range());
//! }
//! ```

pub mod analysis;
pub mod error;
pub mod model;
pub mod solver;

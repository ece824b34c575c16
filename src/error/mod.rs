use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for potential integration errors
pub enum IntegrationError {
    /// Adaptive step was rejected more times in a row than the configured cap,
    /// the local error estimate cannot be driven below tolerance
    NonConvergentStep {
        /// Simulation time at which the step stalled (ms)
        time: f64,
        /// Number of consecutive rejections before giving up
        rejections: usize,
    },
}

impl Display for IntegrationError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            IntegrationError::NonConvergentStep { time, rejections } => write!(
                f,
                "Non-convergent step at t = {} ms after {} rejections",
                time, rejections,
            ),
        }
    }
}

impl Debug for IntegrationError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential analysis errors
pub enum AnalysisError {
    /// Reference checkpoint series must all have the same length
    CheckpointLengthMismatch,
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            AnalysisError::CheckpointLengthMismatch => "Checkpoint series must have the same length",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for AnalysisError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
pub enum IzhikevichSolverError {
    /// Errors related to time integration
    IntegrationRelatedError(IntegrationError),
    /// Errors related to trajectory analysis
    AnalysisRelatedError(AnalysisError),
}

impl Display for IzhikevichSolverError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            IzhikevichSolverError::IntegrationRelatedError(err) => write!(f, "{}", err),
            IzhikevichSolverError::AnalysisRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for IzhikevichSolverError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<IntegrationError> for IzhikevichSolverError {
    fn from(err: IntegrationError) -> IzhikevichSolverError {
        IzhikevichSolverError::IntegrationRelatedError(err)
    }
}

impl From<AnalysisError> for IzhikevichSolverError {
    fn from(err: AnalysisError) -> IzhikevichSolverError {
        IzhikevichSolverError::AnalysisRelatedError(err)
    }
}

use std::fmt::{self, Display};
use std::io;

use crate::run::State;

/// A continuation of a [Run](crate::run::Run) that the caller tried to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Advance,
    Deliver,
    Patch,
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Start => write!(f, "start"),
            Operation::Advance => write!(f, "advance"),
            Operation::Deliver => write!(f, "deliver"),
            Operation::Patch => write!(f, "patch"),
        }
    }
}

/// Error type returned by the operations of a [Run](crate::run::Run).
///
/// Malformed programs never produce an error. Only failing hooks and continuations invoked at
/// the wrong time do.
#[derive(Debug)]
pub enum RunError {
    /// A read or write hook failed. The run has been aborted.
    Hook(io::Error),

    /// A continuation was invoked while the run was in a state that does not accept it.
    /// Nothing was executed.
    InvalidState {
        operation: Operation,
        state: State,
    },
}

impl Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::Hook(err) => write!(f, "hook failed: {}", err),
            RunError::InvalidState { operation, state } => {
                write!(f, "cannot {} a run that is {}", operation, state)
            },
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Hook(err) => Some(err),
            RunError::InvalidState { .. } => None,
        }
    }
}

impl From<io::Error> for RunError {
    fn from(err: io::Error) -> RunError {
        RunError::Hook(err)
    }
}

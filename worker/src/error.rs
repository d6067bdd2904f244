use std::{fmt, process::ExitCode};

use error_stack::{Context, Result, ResultExt};

/// Worker error.
///
/// `WorkerError::Temporary` is the default for anything that can succeed on a
/// later cycle. `WorkerError::Configuration` is for startup and option errors.
/// `WorkerError::Fatal` is for programming errors that retrying cannot fix.
#[derive(Debug)]
pub enum WorkerError {
    /// Configuration error. Should not retry.
    Configuration,
    /// Temporary error. Should retry.
    Temporary,
    /// Fatal error. Should not retry.
    Fatal,
}

pub trait ReportExt {
    fn to_exit_code(&self) -> ExitCode;
}

impl error_stack::Context for WorkerError {}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::Configuration => f.write_str("worker configuration error"),
            WorkerError::Temporary => f.write_str("temporary worker error"),
            WorkerError::Fatal => f.write_str("fatal worker error"),
        }
    }
}

impl<T> ReportExt for Result<T, WorkerError> {
    fn to_exit_code(&self) -> ExitCode {
        match self {
            Ok(_) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{:?}", err);
                // Exit codes based on sysexits.h
                match err.downcast_ref::<WorkerError>() {
                    Some(WorkerError::Configuration) => ExitCode::from(78),
                    Some(WorkerError::Temporary) => ExitCode::from(75),
                    Some(WorkerError::Fatal) => ExitCode::FAILURE,
                    None => ExitCode::FAILURE,
                }
            }
        }
    }
}

pub trait WorkerErrorResultExt {
    type Ok;
    fn configuration(self, reason: &str) -> Result<Self::Ok, WorkerError>;
    fn temporary(self, reason: &str) -> Result<Self::Ok, WorkerError>;
    fn fatal(self, reason: &str) -> Result<Self::Ok, WorkerError>;
}

impl<T, C> WorkerErrorResultExt for core::result::Result<T, C>
where
    C: Context,
{
    type Ok = T;

    fn configuration(self, reason: &str) -> Result<T, WorkerError> {
        self.change_context(WorkerError::Configuration)
            .attach_printable(reason.to_string())
    }

    fn temporary(self, reason: &str) -> Result<T, WorkerError> {
        self.change_context(WorkerError::Temporary)
            .attach_printable(reason.to_string())
    }

    fn fatal(self, reason: &str) -> Result<T, WorkerError> {
        self.change_context(WorkerError::Fatal)
            .attach_printable(reason.to_string())
    }
}

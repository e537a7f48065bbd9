use std::fmt::Display;

use crate::{Checkable, Response, Status};

/// Runs a check and turns its error, if any, into a response. Without a custom handler an error
/// results in [Status::Unknown] with the error text as message.
pub struct Runner<E> {
    on_error: Option<Box<dyn FnOnce(&E) -> (Status, String)>>,
}

impl<E: Display> Runner<E> {
    pub fn new() -> Self {
        Self { on_error: None }
    }

    /// Sets the handler which decides about status and message if the check fails.
    pub fn on_error(mut self, f: impl FnOnce(&E) -> (Status, String) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn safe_run(self, f: impl FnOnce() -> Result<Response, E>) -> RunnerResult<E> {
        match f() {
            Ok(response) => RunnerResult::Ok(response),
            Err(err) => {
                tracing::warn!(error = %err, "check failed");

                let (status, msg) = match self.on_error {
                    Some(on_error) => on_error(&err),
                    None => (Status::Unknown, err.to_string()),
                };

                RunnerResult::Err(status, msg, err)
            }
        }
    }

    /// Runs [Checkable::check] of the given check.
    pub fn run<C>(self, check: &mut C) -> RunnerResult<E>
    where
        C: Checkable<Error = E>,
    {
        self.safe_run(|| check.check())
    }
}

impl<E: Display> Default for Runner<E> {
    fn default() -> Self {
        Self::new()
    }
}

pub enum RunnerResult<E> {
    Ok(Response),
    Err(Status, String, E),
}

impl<E> RunnerResult<E> {
    /// Returns the response to report: the one of the check, or one built from the error.
    pub fn into_response(self) -> Response {
        match self {
            RunnerResult::Ok(response) => response,
            RunnerResult::Err(status, msg, _) => Response::new(status, msg),
        }
    }

    pub fn print_and_exit(self) -> ! {
        self.into_response().exit()
    }
}

/// Shorthand for a [Runner] which reports every error with the given status.
pub fn safe_run<E: Display>(
    f: impl FnOnce() -> Result<Response, E>,
    error_status: Status,
) -> RunnerResult<E> {
    match Runner::new().safe_run(f) {
        RunnerResult::Err(_, msg, err) => RunnerResult::Err(error_status, msg, err),
        ok => ok,
    }
}

use std::fmt;
use std::io::{self, Write};
use std::process;

use crate::{PerfData, PerfDataError, PerfValue, Range, Status, Unit};

/// A Response is the complete output of a check: a status, a message and the collected
/// performance data.
///
/// ```rust
/// # use icingaplugin::{Response, Status};
/// let mut response = Response::new(Status::Ok, "27 users logged in");
/// response.set_perf_data("users", 27, None, None, None, Some(0.into()), None)?;
/// assert_eq!(&response.render(), "OK: 27 users logged in|users=27;;;0;");
///
/// // Prints the line above and exits with an exit code of 0
/// // response.exit();
/// # Ok::<(), icingaplugin::PerfDataError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: Status,
    message: String,
    perf_data: Vec<PerfData>,
}

impl Response {
    pub fn new(status: Status, message: impl Into<String>) -> Response {
        Response {
            status,
            message: message.into(),
            perf_data: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Appends text to the current message, separated by a single space.
    pub fn append_message(&mut self, message: &str) {
        if !self.message.is_empty() && !message.is_empty() {
            self.message.push(' ');
        }
        self.message.push_str(message);
    }

    /// Returns the performance data in the order it will be rendered.
    pub fn perf_data(&self) -> &[PerfData] {
        &self.perf_data
    }

    /// Adds performance data. If there already is an entry with the same label it gets replaced
    /// in place, so the output order stays the order in which labels were first added.
    pub fn push_perf_data(&mut self, perf_data: PerfData) {
        match self
            .perf_data
            .iter_mut()
            .find(|p| p.label() == perf_data.label())
        {
            Some(existing) => *existing = perf_data,
            None => self.perf_data.push(perf_data),
        }
    }

    /// Constructs a [PerfData] from the given parts and adds it via [Response::push_perf_data].
    #[allow(clippy::too_many_arguments)]
    pub fn set_perf_data(
        &mut self,
        label: &str,
        value: impl Into<PerfValue>,
        uom: Option<Unit>,
        warn: Option<Range>,
        crit: Option<Range>,
        minval: Option<PerfValue>,
        maxval: Option<PerfValue>,
    ) -> Result<(), PerfDataError> {
        let mut perf_data = PerfData::new(label, value)?;
        if let Some(uom) = uom {
            perf_data = perf_data.with_unit(uom);
        }
        if let Some(warn) = warn {
            perf_data = perf_data.with_warning(warn);
        }
        if let Some(crit) = crit {
            perf_data = perf_data.with_critical(crit);
        }
        if let Some(minval) = minval {
            perf_data = perf_data.with_min(minval)?;
        }
        if let Some(maxval) = maxval {
            perf_data = perf_data.with_max(maxval)?;
        }

        self.push_perf_data(perf_data);
        Ok(())
    }

    /// Returns the line a monitoring system expects on stdout:
    /// `STATUS: message|perf data...`
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    /// Writes the rendered line followed by a newline and returns the exit code to terminate
    /// with.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<i32> {
        writeln!(out, "{}", self)?;
        out.flush()?;
        Ok(self.exit_code())
    }

    /// Prints [Response::render] to stdout and exits with the exit code of the status.
    pub fn exit(&self) -> ! {
        let code = match self.write_to(&mut io::stdout().lock()) {
            Ok(code) => code,
            Err(err) => {
                tracing::error!(error = %err, "failed to write plugin output");
                Status::Unknown.exit_code()
            }
        };
        process::exit(code);
    }
}

impl Default for Response {
    fn default() -> Self {
        Response::new(Status::Ok, "")
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.status.label())?;

        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }

        for (i, perf_data) in self.perf_data.iter().enumerate() {
            f.write_str(if i == 0 { "|" } else { " " })?;
            write!(f, "{}", perf_data)?;
        }

        Ok(())
    }
}

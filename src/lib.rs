//! The icingaplugin crate provides some basic utilities to make it easier to write icinga and
//! nagios checks: threshold ranges, performance data and the one line output format together
//! with the matching exit codes.
//!
//! ```rust,no_run
//! use icingaplugin::{Plugin, PluginConfig, Response, Runner};
//!
//! fn main() {
//!     Runner::new()
//!         .safe_run(|| -> Result<Response, Box<dyn std::error::Error>> {
//!             let plugin = Plugin::new(PluginConfig::new("check_users"))?;
//!             let users = 27;
//!
//!             let mut response = plugin.response_for_value(users, Some("27 users logged in"));
//!             response.set_perf_data("users", users, None, None, None, Some(0.into()), None)?;
//!             Ok(response)
//!         })
//!         .print_and_exit()
//! }
//! ```

#[macro_use]
mod macros;

pub mod config_generator;
mod perf_data;
mod plugin;
mod range;
mod response;
mod runner;
mod status;

pub use crate::perf_data::{PerfData, PerfDataError, PerfValue, Unit, UnitError, UnitString};
pub use crate::plugin::{
    evaluate_thresholds, Checkable, OptionKind, OptionSpec, OptionValue, Options, Plugin,
    PluginConfig, PluginError, CRITICAL, HOSTNAME, TIMEOUT, VERBOSITY, WARNING,
};
pub use crate::range::{Range, RangeParseError};
pub use crate::response::Response;
pub use crate::runner::{safe_run, Runner, RunnerResult};
pub use crate::status::Status;

use std::collections::BTreeMap;
use std::ffi::OsString;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::config_generator::{CommandDescription, ToIcingaCommandError};
use crate::{PerfValue, Range, Response, Status};

pub const HOSTNAME: &str = "hostname";
pub const WARNING: &str = "warning";
pub const CRITICAL: &str = "critical";
pub const TIMEOUT: &str = "timeout";
pub const VERBOSITY: &str = "verbosity";

const ARGS: &str = "args";

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error(transparent)]
    Arguments(#[from] clap::Error),
    #[error("option {0:?} is declared more than once")]
    DuplicateOption(String),
    #[error("check is not implemented for this plugin")]
    CheckNotImplemented,
}

/// Anything that can run a check and produce a [Response].
pub trait Checkable {
    type Error;

    fn check(&mut self) -> Result<Response, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text.
    Text,
    Integer,
    Float,
    /// A threshold range, see [Range].
    Range,
    /// A switch without value.
    Flag,
    /// A switch which may be given multiple times, like `-vvv`.
    Count,
}

/// Declares a single command line option of a plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    name: String,
    short: Option<char>,
    long: String,
    kind: OptionKind,
    default: Option<String>,
    help: Option<String>,
}

impl OptionSpec {
    /// The long flag defaults to the name with `_` replaced by `-`.
    pub fn new(name: &str, kind: OptionKind) -> Self {
        OptionSpec {
            name: name.to_owned(),
            short: None,
            long: name.replace('_', "-"),
            kind,
            default: None,
            help: None,
        }
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn with_long(mut self, long: &str) -> Self {
        self.long = long.to_owned();
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_owned());
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_owned());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name.clone()).long(self.long.clone());

        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(ref help) = self.help {
            arg = arg.help(help.clone());
        }

        arg = match self.kind {
            OptionKind::Text => arg.action(ArgAction::Set).value_parser(value_parser!(String)),
            OptionKind::Integer => arg.action(ArgAction::Set).value_parser(value_parser!(i64)),
            OptionKind::Float => arg
                .action(ArgAction::Set)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64)),
            OptionKind::Range => arg
                .action(ArgAction::Set)
                .allow_hyphen_values(true)
                .value_parser(Range::parse),
            OptionKind::Flag => arg.action(ArgAction::SetTrue),
            OptionKind::Count => arg.action(ArgAction::Count),
        };

        match self.default {
            Some(ref default) => arg.default_value(default.clone()),
            None => arg,
        }
    }

    fn value_from(&self, matches: &ArgMatches) -> Option<OptionValue> {
        let name = self.name.as_str();
        match self.kind {
            OptionKind::Text => matches.get_one::<String>(name).cloned().map(OptionValue::Text),
            OptionKind::Integer => matches.get_one::<i64>(name).copied().map(OptionValue::Integer),
            OptionKind::Float => matches.get_one::<f64>(name).copied().map(OptionValue::Float),
            OptionKind::Range => matches.get_one::<Range>(name).copied().map(OptionValue::Range),
            OptionKind::Flag => Some(OptionValue::Flag(matches.get_flag(name))),
            OptionKind::Count => Some(OptionValue::Count(matches.get_count(name))),
        }
    }
}

/// The options every plugin understands.
fn standard_options() -> Vec<OptionSpec> {
    vec![
        OptionSpec::new(HOSTNAME, OptionKind::Text)
            .with_short('H')
            .with_help("Host name or address to check"),
        OptionSpec::new(WARNING, OptionKind::Range)
            .with_short('w')
            .with_help("Range which results in a warning state"),
        OptionSpec::new(CRITICAL, OptionKind::Range)
            .with_short('c')
            .with_help("Range which results in a critical state"),
        OptionSpec::new(TIMEOUT, OptionKind::Integer)
            .with_short('t')
            .with_default("0")
            .with_help("Seconds before the check times out"),
        OptionSpec::new(VERBOSITY, OptionKind::Count)
            .with_short('v')
            .with_help("Increase verbosity, may be given multiple times"),
    ]
}

/// Describes the command line of a plugin: its name and the options it declares on top of the
/// standard ones.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    name: String,
    about: Option<String>,
    options: Vec<OptionSpec>,
}

impl PluginConfig {
    pub fn new(name: &str) -> Self {
        PluginConfig {
            name: name.to_owned(),
            about: None,
            options: Vec::new(),
        }
    }

    pub fn with_about(mut self, about: &str) -> Self {
        self.about = Some(about.to_owned());
        self
    }

    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    fn all_options(&self) -> Result<Vec<OptionSpec>, PluginError> {
        let mut names = vec![ARGS.to_owned()];
        let mut longs = vec!["help".to_owned()];
        let mut shorts = vec!['h'];
        let mut all = Vec::new();

        for option in standard_options().into_iter().chain(self.options.iter().cloned()) {
            let duplicate = names.contains(&option.name)
                || longs.contains(&option.long)
                || option.short.is_some_and(|s| shorts.contains(&s));
            if duplicate {
                return Err(PluginError::DuplicateOption(option.name));
            }

            names.push(option.name.clone());
            longs.push(option.long.clone());
            shorts.extend(option.short);
            all.push(option);
        }

        Ok(all)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Range(Range),
    Flag(bool),
    Count(u8),
}

/// The parsed option values of a plugin, keyed by option name. Options which were neither given
/// nor have a default are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

impl Options {
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(OptionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(OptionValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(OptionValue::Float(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn range(&self, name: &str) -> Option<&Range> {
        match self.get(name) {
            Some(OptionValue::Range(r)) => Some(r),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(OptionValue::Flag(true)))
    }

    pub fn count(&self, name: &str) -> u8 {
        match self.get(name) {
            Some(OptionValue::Count(c)) => *c,
            _ => 0,
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        self.text(HOSTNAME)
    }

    pub fn warning(&self) -> Option<&Range> {
        self.range(WARNING)
    }

    pub fn critical(&self) -> Option<&Range> {
        self.range(CRITICAL)
    }

    pub fn timeout(&self) -> i64 {
        self.integer(TIMEOUT).unwrap_or_default()
    }

    pub fn verbosity(&self) -> u8 {
        self.count(VERBOSITY)
    }
}

/// Determines the status of a value: critical is checked first, then warning. Without any
/// configured range the status is [Status::Ok].
pub fn evaluate_thresholds(warning: Option<&Range>, critical: Option<&Range>, value: f64) -> Status {
    let status = if critical.is_some_and(|c| c.is_match(value)) {
        Status::Critical
    } else if warning.is_some_and(|w| w.is_match(value)) {
        Status::Warning
    } else {
        Status::Ok
    };

    tracing::debug!(
        value,
        warning = ?warning.map(Range::to_string),
        critical = ?critical.map(Range::to_string),
        %status,
        "evaluated thresholds"
    );

    status
}

/// The entry point of a check program. It parses the standard options `-H`, `-w`, `-c`, `-t`
/// and `-v` together with the options declared in its [PluginConfig].
///
/// ```rust
/// # use icingaplugin::{Plugin, PluginConfig, Status};
/// let plugin = Plugin::from_args(PluginConfig::new("check_users"), ["-w", "10:20", "-c", "0:40"])?;
/// assert_eq!(plugin.response_for_value(15, None).status(), Status::Ok);
/// assert_eq!(plugin.response_for_value(27, None).status(), Status::Warning);
/// assert_eq!(plugin.response_for_value(50, Some("50 users")).render(), "CRIT: 50 users");
/// # Ok::<(), icingaplugin::PluginError>(())
/// ```
#[derive(Debug)]
pub struct Plugin {
    options: Options,
    args: Vec<String>,
    responses: Vec<Response>,
    command: Command,
}

impl Plugin {
    /// Parses the arguments the process was started with.
    pub fn new(config: PluginConfig) -> Result<Self, PluginError> {
        Plugin::from_args(config, std::env::args_os().skip(1))
    }

    /// Parses the given arguments. The program name must not be part of them.
    pub fn from_args<I, T>(config: PluginConfig, args: I) -> Result<Self, PluginError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let specs = config.all_options()?;

        let mut command = Command::new(config.name.clone());
        if let Some(ref about) = config.about {
            command = command.about(about.clone());
        }
        command = command.args(specs.iter().map(OptionSpec::to_arg)).arg(
            Arg::new(ARGS)
                .action(ArgAction::Append)
                .num_args(1..)
                .value_parser(value_parser!(String)),
        );

        let argv = std::iter::once(OsString::from(&config.name))
            .chain(args.into_iter().map(Into::into));
        let matches = command.clone().try_get_matches_from(argv)?;

        let values = specs
            .iter()
            .filter_map(|spec| spec.value_from(&matches).map(|v| (spec.name.clone(), v)))
            .collect();
        let options = Options { values };
        let args: Vec<String> = matches
            .get_many::<String>(ARGS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        tracing::debug!(?options, ?args, "parsed plugin arguments");

        Ok(Plugin {
            options,
            args,
            responses: Vec::new(),
            command,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Positional arguments which are not part of any option.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The command line definition the arguments were parsed with.
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Builds a response whose status is determined by the `-w` and `-c` ranges.
    pub fn response_for_value(&self, value: impl Into<PerfValue>, message: Option<&str>) -> Response {
        let status = evaluate_thresholds(
            self.options.warning(),
            self.options.critical(),
            value.into().as_f64(),
        );

        Response::new(status, message.unwrap_or_default())
    }

    /// Collects a response to be combined by [Plugin::all_responses].
    pub fn add_response(&mut self, response: Response) {
        self.responses.push(response)
    }

    /// Combines all added responses into one with the worst status. The messages get grouped
    /// by status, worst first, like `"a, b WARN: c OK: d"`.
    ///
    /// Returns `default`, or an OK response if none is given, when nothing was added.
    pub fn all_responses(&self, default: Option<Response>) -> Response {
        let mut responses: Vec<&Response> = self.responses.iter().collect();
        responses.sort_by(|a, b| b.status().cmp(&a.status()));

        let Some((worst, rest)) = responses.split_first() else {
            return default.unwrap_or_default();
        };

        let mut message = worst.message().to_owned();
        let mut last_status = worst.status();
        for response in rest {
            if response.status() != last_status {
                message.push_str(&format!(" {}: {}", response.status(), response.message()));
                last_status = response.status();
            } else {
                message.push_str(&format!(", {}", response.message()));
            }
        }

        Response::new(worst.status(), message)
    }

    /// Renders an Icinga 2 `CheckCommand` definition for this plugin.
    pub fn icinga_command(&self, name: &str) -> Result<String, ToIcingaCommandError> {
        CommandDescription::try_from(&self.command)?.to_icinga_command(name)
    }
}

impl Checkable for Plugin {
    type Error = PluginError;

    /// A bare plugin has nothing to check, concrete checks implement [Checkable] themselves.
    fn check(&mut self) -> Result<Response, Self::Error> {
        Err(PluginError::CheckNotImplemented)
    }
}

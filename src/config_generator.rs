//! Generates Icinga 2 `CheckCommand` definitions from the command line of a plugin.

pub struct CommandDescription {
    arguments: Vec<ArgumentDescription>,
}

pub struct ArgumentDescription {
    name: String,
    value: String,
    description: Option<String>,
    is_flag: bool,
    default_value: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToIcingaCommandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid executable path")]
    InvalidExecutablePath,
    #[error("error converting to command description: {0}")]
    CommandDescriptionFromError(#[from] CommandDescriptionFromError),
}

impl CommandDescription {
    /// Renders the definition with the currently running executable as command.
    pub fn to_icinga_command(&self, name: &str) -> Result<String, ToIcingaCommandError> {
        let current_exe = std::env::current_exe()?
            .to_str()
            .ok_or(ToIcingaCommandError::InvalidExecutablePath)?
            .to_owned();

        Ok(self.render(name, &current_exe))
    }

    fn render(&self, name: &str, executable: &str) -> String {
        let mut out = format!("object CheckCommand \"{name}\" {{\n");
        out.push_str(&format!("  command = [ \"{}\" ]\n", escape_string(executable)));
        out.push_str("  arguments = {\n");
        for arg in &self.arguments {
            out.push_str(&format!("    \"--{}\" = {{\n", arg.name));

            if arg.is_flag {
                out.push_str(&format!("      set_if = \"${}$\"\n", arg.value));
            } else {
                out.push_str(&format!("      value = \"${}$\"\n", arg.value));
            }

            if let Some(description) = &arg.description {
                out.push_str(&format!(
                    "      description = \"{}\"\n",
                    escape_string(description)
                ));
            }

            out.push_str("    }\n");
        }
        out.push_str("  }\n");

        let defaults: Vec<_> = self
            .arguments
            .iter()
            .filter_map(|arg| arg.default_value.as_ref().map(|d| (&arg.value, d)))
            .collect();
        if !defaults.is_empty() {
            out.push('\n');
        }
        for (value, default_value) in defaults {
            out.push_str(&format!(
                "  vars.{} = \"{}\"\n",
                value,
                escape_string(default_value)
            ));
        }

        out.push_str("}\n");
        out
    }
}

fn escape_string(s: &str) -> String {
    ["\\", "\"", "$"]
        .iter()
        .fold(s.to_string(), |acc, c| acc.replace(c, &format!("\\{}", c)))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandDescriptionFromError {
    #[error("missing long argument")]
    MissingLongArgument,
}

impl TryFrom<&clap::Command> for CommandDescription {
    type Error = CommandDescriptionFromError;

    fn try_from(cmd: &clap::Command) -> Result<Self, Self::Error> {
        let mut arguments = Vec::new();

        for arg in cmd.get_arguments().filter(|arg| !arg.is_positional()) {
            let name = arg
                .get_long()
                .ok_or(CommandDescriptionFromError::MissingLongArgument)?
                .to_owned();

            let value = name.replace('-', "_");
            let description = arg.get_help().map(|s| s.to_string());

            let is_flag = matches!(
                arg.get_action(),
                clap::ArgAction::SetTrue | clap::ArgAction::SetFalse | clap::ArgAction::Count
            );

            let default_value = arg
                .get_default_values()
                .first()
                .and_then(|v| v.to_str())
                .map(|s| s.to_string());

            arguments.push(ArgumentDescription {
                name,
                value,
                description,
                is_flag,
                default_value,
            });
        }

        Ok(CommandDescription { arguments })
    }
}

/// Prints the Icinga command configuration of the plugin if the `GENERATE_ICINGA_COMMAND`
/// environment variable is set and exits the process.
pub fn print_icinga_command_config_if_env_and_exit(
    name: &str,
    cmd: &clap::Command,
) -> Result<(), ToIcingaCommandError> {
    if std::env::var_os("GENERATE_ICINGA_COMMAND").is_none() {
        return Ok(());
    }

    let description = CommandDescription::try_from(cmd)?;
    let out = description.to_icinga_command(name)?;

    println!("{}", out.trim());
    std::process::exit(0);
}

use icingaplugin::config_generator::print_icinga_command_config_if_env_and_exit;
use icingaplugin::{OptionKind, OptionSpec, Plugin, PluginConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PluginConfig::new("example")
        .with_option(OptionSpec::new("arg1", OptionKind::Text))
        .with_option(
            OptionSpec::new("arg2", OptionKind::Text)
                .with_default("my-default-value")
                .with_help("The description for \"arg2\""),
        )
        .with_option(OptionSpec::new("my_flag", OptionKind::Flag));
    let plugin = Plugin::new(config)?;

    // The env var GENERATE_ICINGA_COMMAND has to be set to generate the Icinga command configuration
    print_icinga_command_config_if_env_and_exit("example", plugin.command())?;

    println!("Set the environment variable GENERATE_ICINGA_COMMAND to generate the Icinga command configuration.");

    Ok(())
}

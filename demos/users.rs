use std::error::Error;

use icingaplugin::{Checkable, OptionKind, OptionSpec, Plugin, PluginConfig, Response, Runner, Unit};

// Usage: cargo run --example users -- -w 0:20 -c 0:40 -v 27

struct UsersCheck {
    plugin: Plugin,
}

impl Checkable for UsersCheck {
    type Error = Box<dyn Error>;

    fn check(&mut self) -> Result<Response, Self::Error> {
        // Stands in for whatever the real check would measure
        let users: u32 = match self.plugin.args().first() {
            Some(arg) => arg.parse()?,
            None => return Err("provide the number of users as argument".into()),
        };
        let max = self.plugin.options().integer("max_users");

        let mut response = self
            .plugin
            .response_for_value(users, Some(&format!("{users} users logged in")));
        response.set_perf_data(
            "users",
            users,
            Some(Unit::Counter),
            self.plugin.options().warning().copied(),
            self.plugin.options().critical().copied(),
            Some(0.into()),
            max.map(Into::into),
        )?;

        Ok(response)
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn main() {
    let config = PluginConfig::new("check_users")
        .with_about("Checks the number of logged in users")
        .with_option(
            OptionSpec::new("max_users", OptionKind::Integer).with_help("Maximum number of users"),
        );

    let plugin = match Plugin::new(config) {
        Ok(plugin) => plugin,
        Err(icingaplugin::PluginError::Arguments(err)) => err.exit(),
        Err(err) => Response::new(icingaplugin::Status::Unknown, err.to_string()).exit(),
    };
    init_logging(plugin.options().verbosity());

    Runner::new().run(&mut UsersCheck { plugin }).print_and_exit()
}

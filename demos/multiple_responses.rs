use icingaplugin::{Plugin, PluginConfig, PluginError, Response, Status};

// Usage: cargo run --example multiple_responses -- -w 0:80 -c 0:95 12 85 97

fn main() -> Result<(), PluginError> {
    let mut plugin = Plugin::new(PluginConfig::new("check_disks"))?;

    // Every positional argument is the usage of one disk in percent
    let responses: Vec<Response> = plugin
        .args()
        .iter()
        .enumerate()
        .map(|(i, arg)| match arg.parse::<f64>() {
            Ok(usage) => plugin.response_for_value(usage, Some(&format!("disk{i} at {usage}%"))),
            Err(_) => Response::new(Status::Unknown, format!("disk{i} has no usage")),
        })
        .collect();

    for response in responses {
        plugin.add_response(response);
    }

    plugin
        .all_responses(Some(Response::new(Status::Unknown, "no disks given")))
        .exit()
}

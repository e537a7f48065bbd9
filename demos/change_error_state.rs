use anyhow::anyhow;

use icingaplugin::{Response, Runner, Status};

fn main() {
    // Instead of exiting with an unknown status, we exit with a critical one on error.
    Runner::new()
        .on_error(|e: &anyhow::Error| (Status::Critical, format!("check failed: {e}")))
        .safe_run(do_check)
        .print_and_exit()
}

// This example uses anyhow
fn do_check() -> Result<Response, anyhow::Error> {
    // Do something which returns an error.
    Err(anyhow!("something really bad happened"))
}

//! Dashgrid - host simulator for the dashboard widget grid.
//!
//! Runs layout, drag and resize commands against the configured grid.
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = dashgrid_lib::cli::run() {
        eprintln!("dashgrid: {err}");
        std::process::exit(1);
    }
}

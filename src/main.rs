use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    match dcf_valuation::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Log to stderr so stdout stays clean for reports and `--json`.
///
/// The TUI owns the terminal, so it logs nothing unless `RUST_LOG` asks for it.
fn init_tracing() {
    let args: Vec<String> = std::env::args().collect();
    let default_filter = if dcf_valuation::app::is_tui_invocation(&args) {
        "off"
    } else {
        "dcf_valuation=warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

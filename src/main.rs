//! `advisor` binary entrypoint.

mod cli_app;

use std::process::ExitCode;

use clap::Parser;

use cli_app::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests are successes; everything else is a usage error.
            let code = u8::from(err.use_stderr());
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    cli_app::init_tracing(&cli);

    match cli_app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("advisor: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

use std::process::ExitCode;

fn main() -> ExitCode {
    xfinds_cli::run()
}

use std::process::ExitCode;

fn main() -> ExitCode {
    match discord_purge::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

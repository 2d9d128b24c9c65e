use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match voctext::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(voctext::VoctextError::ValidationFailed { .. }) => {
            // The report has already been printed.
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

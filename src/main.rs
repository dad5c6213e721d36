use btech_buddy::commands::Cli;
use btech_buddy::msg_error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    match Cli::menu().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Messages built with msg_error_anyhow! already carry the marker.
            let text = format!("{:#}", e);
            match text.strip_prefix("❌ ") {
                Some(stripped) => msg_error!(stripped),
                None => msg_error!(text),
            }
            ExitCode::FAILURE
        }
    }
}

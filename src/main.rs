use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match thermal_ingest_lib::run().await {
        Ok(code) => code,
        Err(err) => {
            log::error!("thermal-ingest failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

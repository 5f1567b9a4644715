pub mod accessibility;
pub mod config;
pub mod error;
pub mod hotkey;
pub mod logger;
pub mod probe;

use config::ProbeConfig;
use error::AppError;
use probe::ProbeOutcome;

/// Run one probe on the current platform, writing to stdout.
pub fn run_platform_probe(config: ProbeConfig) -> Result<ProbeOutcome, AppError> {
    let ax = accessibility::create_platform()?;
    let mut monitor = hotkey::create_monitor()?;
    probe::run_probe(&ax, monitor.as_mut(), &config, &mut std::io::stdout())
}

/// Entry point for the binary. Returns the process exit code.
pub fn run() -> i32 {
    logger::init_file_logger();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            crate::app_log!("[main] failed to start runtime: {e}");
            return 1;
        }
    };

    let code = runtime.block_on(async {
        // The probe blocks inside the OS event loop, so it gets its own thread.
        let probe = tokio::task::spawn_blocking(|| run_platform_probe(ProbeConfig::default()));

        tokio::select! {
            joined = probe => match joined {
                Ok(Ok(outcome)) => {
                    let label = match &outcome {
                        ProbeOutcome::NotTrusted => "not trusted",
                        ProbeOutcome::NotTextInput { .. } => "not a text input",
                        ProbeOutcome::Completed(_) => "completed",
                    };
                    crate::app_log!("[main] probe finished: {label}");
                    0
                }
                Ok(Err(e)) => {
                    eprintln!("Error: {e}");
                    crate::app_log!("[main] probe failed: {e}");
                    1
                }
                Err(e) => {
                    crate::app_log!("[main] probe task panicked: {e}");
                    1
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\nCancelled.");
                crate::app_log!("[main] interrupted");
                1
            }
        }
    });

    // A cancelled probe is still parked in the event loop; don't wait for it.
    runtime.shutdown_background();
    code
}

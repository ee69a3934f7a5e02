use anyhow::Result;
use chronometer::prelude::*;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .init();

    // 2. Load configuration from the environment.
    let config = ChronoConfig::load(None)?;
    info!("Loaded configuration: {:?}", config);

    // 3. Create the registry that owns every timed task.
    let mut tasks: TaskRegistry<&str> = TaskRegistry::with_defaults(config.tasks);

    // 4. Drive a task through laps and a pause.
    run_pipeline(&mut tasks)?;

    // 5. Show what the registry rejects.
    if let Err(e) = tasks.create_task("pipeline") {
        info!("[REJECTED] {}", e);
    }
    if let Err(e) = tasks.read_task(&"missing") {
        info!("[REJECTED] {}", e);
    }

    for (key, chrono) in tasks.iter() {
        info!(
            "[SUMMARY] {} => {} ({:?})",
            key,
            chrono.read_total_time_string(),
            chrono.state()
        );
    }
    Ok(())
}

/// `RUST_LOG` when set, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Times a fake three-stage pipeline with one lap per stage.
fn run_pipeline(tasks: &mut TaskRegistry<&'static str>) -> Result<()> {
    let chrono = tasks.create_task("pipeline")?;
    let _ = chrono.start();
    info!("[START] pipeline at {}", chrono.now());

    for (stage, millis) in [("fetch", 30), ("parse", 20), ("render", 40)] {
        thread::sleep(Duration::from_millis(millis));
        if let Some(lap) = tasks.add_lap_time(&"pipeline", stage)? {
            info!("[LAP] {} took {}", stage, lap.read_time_string());
        }
    }

    let paused = tasks.pause_task(&"pipeline")?;
    info!("[PAUSE] pipeline paused at {:.6}s", paused);
    thread::sleep(Duration::from_millis(50));

    let _ = tasks.resume_task(&"pipeline")?;
    thread::sleep(Duration::from_millis(10));
    let total = tasks.stop_task(&"pipeline")?;
    info!("[STOP] pipeline finished in {:.6}s", total);

    let chrono = tasks.get_task(&"pipeline")?;
    for (label, lap) in chrono.entries(SortOrder::Descending) {
        info!("[LAPS] {:<8} {:.6}s", label, lap.read());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_info() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter().to_string(), "info");
    }
}

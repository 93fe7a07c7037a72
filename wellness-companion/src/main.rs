// WellNest entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (copying defaults/ into config/ on first run)
// 3. Open the SQLite database
// 4. Build the backend HTTP client
// 5. Create mpsc channels
// 6. Create the application state, restore any stored score
// 7. Spawn the app logic task
// 8. Run the TUI event loop (blocks until the user quits)
// 9. Cleanup on exit

use wellness_companion::app;
use wellness_companion::config;
use wellness_companion::db;
use wellness_companion::service;
use wellness_companion::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("WellNest starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!("Config loaded: backend at {}", config.backend.base_url);

    // 3. Open database
    let db_path = resolve_db_path(&config).context("failed to resolve the database location")?;
    let db = db::Database::open(&db_path).context("failed to open database")?;
    info!("Database opened at {}", db_path);

    // 4. Build the backend client
    let client = service::WellnessClient::from_config(&config);

    // 5. Create mpsc channels (before AppState so svc_tx can be passed in)
    let (svc_tx, svc_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 6. Create the application state
    let mut app_state = app::AppState::new(config, db, client, svc_tx);

    // The stored score is display-only, so a failed read should not block
    // startup.
    if let Err(e) = app::recover_last_score(&mut app_state) {
        warn!("Could not restore the stored score: {}", e);
    }

    // 7. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(svc_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 8. Run the TUI event loop (blocking until user quits)
    // The TUI consumes ui_rx and sends commands through cmd_tx.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 9. Cleanup: the TUI dropped its command sender, so the app loop sees
    // a closed channel and exits; wait for it (with timeout).
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("WellNest shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("wellnest.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wellness_companion=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// Pick the SQLite file location: the configured path when set, otherwise
/// a file in the per-user application data directory.
fn resolve_db_path(config: &config::Config) -> anyhow::Result<String> {
    if let Some(path) = &config.database.path {
        return Ok(path.clone());
    }

    let dirs = directories::ProjectDirs::from("", "", "wellnest")
        .context("no home directory available for the default database location")?;
    std::fs::create_dir_all(dirs.data_dir())
        .context("failed to create the application data directory")?;
    dirs.data_dir()
        .join("wellnest.db")
        .to_str()
        .map(str::to_owned)
        .context("database path contains non-UTF-8 characters")
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use floatdict_capture::TesseractEngine;
use floatdict_config::Config;
use floatdict_core::state::AppState;
use floatdict_translator::TranslationService;
use floatdict_types::{AppEvent, HotkeyAction};
use floatdict_ui::UiBridge;

mod commands;
mod context;
mod controller;
mod events;
mod logging;
mod platform;
mod profile;
mod status;

#[cfg(test)]
mod tests;

use self::controller::{AppController, Services};

/// Point at text, press a hotkey, read the translation
#[derive(Debug, Parser)]
#[command(name = "floatdict", version)]
struct Args {
    /// Profile name under the FloatingDictionary profiles folder
    #[arg(long, default_value = profile::DEFAULT_PROFILE)]
    profile: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,

    /// Print recent lookups, optionally only those containing FILTER, and exit
    #[arg(long, value_name = "FILTER", num_args = 0..=1, default_missing_value = "")]
    history: Option<String>,

    /// Forget past lookups and cached translations, then exit
    #[arg(long)]
    clear_history: bool,
}

/// Finds Tesseract and refuses to start when it cannot run
fn ocr_engine(config: &Config) -> anyhow::Result<TesseractEngine> {
    let engine = TesseractEngine::locate(
        config.ocr.tesseract_path.as_deref(),
        config.ocr.tessdata_dir.as_deref(),
        &config.translator.source_lang,
    )
    .context("Failed to locate the OCR engine")?;
    let version = engine
        .version()
        .context("The OCR engine was found but does not run")?;
    tracing::info!("OCR engine: {version} ({})", engine.language());
    Ok(engine)
}

/// Writes the cache and history to their configured files
fn save_lookups(translator: &TranslationService, config: &Config) {
    if let Some(path) = &config.cache.path {
        match translator.save_cache(path) {
            Ok(()) => tracing::info!("Saved translation cache to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save translation cache: {e}"),
        }
    }
    if let Some(path) = &config.history.path {
        match translator.save_history(path) {
            Ok(()) => tracing::debug!("Saved lookup history to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save lookup history: {e}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = profile::load_or_create(&args.profile)
        .with_context(|| format!("Failed to load profile '{}'", args.profile))?;
    config.apply_env();
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    logging::init(&config.log_level, args.log_json);
    if config.history.path.is_none() {
        config.history.path = profile::history_file().ok();
    }

    let translator = Arc::new(
        TranslationService::from_config(&config.translator, &config.cache, &config.history)
            .context("Failed to set up translation sources")?,
    );

    if args.clear_history {
        translator.clear_history();
        save_lookups(&translator, &config);
        return Ok(());
    }
    if let Some(filter) = &args.history {
        commands::print_history(&translator, Some(filter));
        return Ok(());
    }
    tracing::info!("FloatingDictionary starting with profile '{}'", args.profile);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let engine = ocr_engine(&config)?;

    let state = Arc::new(AppState::new(config.clone()));
    let controller = AppController::new(state);
    let (bridge, handle) = UiBridge::new();

    let services = Services {
        capturer: platform::capturer(),
        recognizer: Arc::new(engine),
        cursor: platform::cursor(),
        translator: translator.clone(),
    };

    let mut tasks = {
        let _guard = runtime.enter();
        controller.spawn_tasks(services, Arc::new(bridge))
    };

    let quit_tx = controller.backend_sender();
    let cancel = controller.cancel_token();
    runtime.spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::warn!("Failed to listen for Ctrl+C: {e}");
                    return;
                }
                tracing::info!("Shutdown requested");
                let _ = quit_tx.send(AppEvent::Hotkey(HotkeyAction::Quit)).await;
            }
        }
    });

    // Slint and the hotkey manager need the main thread
    let ui_result = floatdict_ui::run_ui(&config, handle);
    if let Err(e) = &ui_result {
        tracing::error!("UI failed: {e:#}");
    }

    controller.shutdown();
    runtime.block_on(async {
        let drain = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::debug!("Task ended: {e:#}"),
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => tracing::error!("Task panicked: {e}"),
                }
            }
        };
        if tokio::time::timeout(Duration::from_secs(2), drain).await.is_err() {
            tracing::warn!("Tasks still running after shutdown, aborting");
        }
        tasks.shutdown().await;
    });

    save_lookups(&translator, &config);

    runtime.shutdown_timeout(Duration::from_secs(1));
    ui_result.context("UI exited with an error")
}

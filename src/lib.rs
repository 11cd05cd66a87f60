//! Multi-table No-Limit and Fixed-Limit Texas Hold'em poker server.
//!
//! - [`cards`] / [`eval`] — encoded cards and the 7-card hand evaluator.
//! - [`game`] — the engine: player/pot/betting state and the per-table
//!   phase orchestrator.
//! - [`wire`] — the JSON wire protocol bridging internal events to clients.
//! - [`bots`] / [`dispatch`] — bot decision policies and the action
//!   scheduling that drives both human and bot turns.
//! - [`broadcast`] — the personalized, redacting connection fan-out.
//! - [`hosting`] — the multi-table lobby and HTTP/WebSocket server.
pub mod bots;
pub mod broadcast;
pub mod cards;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod eval;
pub mod game;
#[cfg(feature = "server")]
pub mod hosting;
pub mod wire;

/// Initializes process-wide state that must exist before any table runs:
/// the evaluator's lookup tables and the combined terminal+file logger.
/// Logging is set up once at process start, never per-request, and the
/// evaluator's tables are built here rather than lazily on first use inside
/// a hand.
pub fn init() {
    eval::init();
    #[cfg(feature = "server")]
    init_logging();
}

#[cfg(feature = "server")]
fn init_logging() {
    use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
    use std::fs::{create_dir_all, File};

    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let _ = create_dir_all("logs");
    let file = File::create(format!("logs/{}.log", std::process::id()));

    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Ok(file) = file {
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    let _ = CombinedLogger::init(loggers);
}

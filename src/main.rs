//! Headless streaming host - walks an observer across a procedural map.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>     Streaming config JSON (default: built-in defaults)
//!   --ticks <N>         Number of ticks to run (default: 600)
//!   --speed <UNITS>     Observer speed in world units per tick (default: 1.5)
//!   --tick-ms <MS>      Sleep between ticks (default: 16 with --debug, else 0)
//!   --debug             Serve the debug protocol on procmap_debug::DEFAULT_PORT

use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};

use glam::Vec3;

use procmap::debug::{SharedDebugState, StreamingDebugHandler};
use procmap::streaming::{StreamingConfig, StreamingController};
use procmap::terrain::TerrainGenerator;

/// Ticks spent on each leg of the walk
const LEG_TICKS: u64 = 120;

fn main() {
    procmap::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let ticks = parse_u64_arg(&args, "--ticks").unwrap_or(600);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(1.5);
    let debug = args.iter().any(|a| a == "--debug");
    let tick_ms = parse_u64_arg(&args, "--tick-ms").unwrap_or(if debug { 16 } else { 0 });

    let config = match parse_str_arg(&args, "--config") {
        Some(path) => match StreamingConfig::load(&PathBuf::from(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => StreamingConfig::default(),
    };

    let window = match config.view_window() {
        Ok(window) => window,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let generator = TerrainGenerator::new(config.terrain.clone(), config.chunk_size);
    let mut controller = StreamingController::new(window, generator);
    controller.initialize();

    let debug_state = Arc::new(StdMutex::new(SharedDebugState::default()));
    if debug {
        start_debug_server(debug_state.clone());
    }

    let start = Instant::now();
    let mut observer = Vec3::ZERO;

    for tick in 0..ticks {
        let override_pos = debug_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take_observer_override();

        observer = match override_pos {
            Some(pos) => {
                log::info!("Observer moved to {} by debug command", pos);
                pos
            }
            None => observer + walk_direction(tick) * speed,
        };

        controller.step(observer);

        if debug {
            debug_state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .publish(&controller, observer);
        }

        if tick_ms > 0 {
            std::thread::sleep(Duration::from_millis(tick_ms));
        }
    }

    let stats = controller.stats();
    log::info!(
        "Ran {} steps in {:.2?}: {} chunks created, {} active, observer at {}",
        stats.steps,
        start.elapsed(),
        stats.total_chunks,
        stats.active_chunks,
        controller.observer_coord(observer).unwrap_or(controller.spawn_cursor())
    );
}

/// Walk east, north-east, west, then south, repeating
fn walk_direction(tick: u64) -> Vec3 {
    match (tick / LEG_TICKS) % 4 {
        0 => Vec3::X,
        1 => Vec3::new(1.0, 0.0, 1.0).normalize(),
        2 => Vec3::NEG_X,
        _ => Vec3::NEG_Z,
    }
}

/// Run the debug server on a background thread with its own tokio runtime
fn start_debug_server(state: Arc<StdMutex<SharedDebugState>>) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create tokio runtime for debug server: {}", e);
                return;
            }
        };
        rt.block_on(async {
            let handler = Arc::new(tokio::sync::Mutex::new(StreamingDebugHandler::new(state)));
            let _server = procmap_debug::DebugServer::start(handler, procmap_debug::DEFAULT_PORT);
            log::info!("Debug server started on port {}", procmap_debug::DEFAULT_PORT);
            // Keep runtime alive until the host loop exits
            loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        });
    });
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

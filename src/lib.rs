pub mod agent_engine;
pub mod config;
pub mod errors;
pub mod executor;
pub mod perception;
pub mod strongbox;

use std::sync::Arc;

pub use agent_engine::engine::{FrameOutcome, HelperEngine};
pub use agent_engine::event_bus::HelperEvent;
pub use agent_engine::state::{CycleOutcome, CyclePhase, CycleReport, RejectReason};
pub use config::{ConfigHandle, HelperConfig};
pub use errors::{HelperError, HelperResult};
pub use executor::input::{EnigoPointer, PointerDevice};
pub use perception::traits::{GroundLabel, HostUi};
pub use perception::types::{CursorPos, EntityHandle, NodeRef, Point, Rect, UiNode};
pub use strongbox::kinds::{ActionKind, ContainerType};

/// Installs the global `tracing` subscriber. `RUST_LOG` (also read from a
/// `.env` file) overrides the default `info` filter. Safe to call twice.
pub fn init_tracing() {
    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Builds an engine the way a host plugin normally wants it: logging on,
/// config from disk (defaults if there is none), the desktop pointer.
pub fn start(host: Arc<dyn HostUi>, runtime: tokio::runtime::Handle) -> HelperEngine {
    init_tracing();

    let config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config; using defaults");
            HelperConfig::default()
        }
    };

    tracing::info!(
        enable = config.general.enable,
        max_distance = config.general.max_distance,
        "strongbox helper ready"
    );
    HelperEngine::new(
        host,
        Arc::new(EnigoPointer::new()),
        ConfigHandle::new(config),
        runtime,
    )
}

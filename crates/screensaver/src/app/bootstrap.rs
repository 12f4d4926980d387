use engine::LoopConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOGO_PNG: &[u8] = include_bytes!("../../../../assets/dvd-logo.png");

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) logo_png: &'static [u8],
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== DVD Logo Bouncer Startup ===");

    AppWiring {
        config: LoopConfig::default(),
        logo_png: LOGO_PNG,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

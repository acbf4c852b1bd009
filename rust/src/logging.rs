use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset, blank, or does not parse.
const DEFAULT_LOG_FILTER: &str = "announce_core=debug,info";
const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Install the global subscriber. Safe to call more than once; later calls
/// keep the first subscriber.
///
/// Every platform shares one `EnvFilter`, then adds its own sink: os_log plus
/// `<data_dir>/announce.log` on iOS, logcat on Android, stderr elsewhere.
pub fn init_logging(data_dir: &str) {
    let registry = tracing_subscriber::registry().with(log_filter());

    #[cfg(target_os = "ios")]
    let installed = registry
        .with(tracing_oslog::OsLogger::new("com.coordinator.announce", "default"))
        .with(open_log_file(data_dir).map(|file| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
        }))
        .try_init();

    #[cfg(target_os = "android")]
    let installed = {
        let _ = data_dir;
        registry.with(paranoid_android::layer("announce")).try_init()
    };

    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    let installed = {
        let _ = data_dir;
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = installed {
        tracing::debug!("logging already initialised: {e}");
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::new(filter_directives(std::env::var(LOG_FILTER_ENV).ok()))
}

fn filter_directives(env_value: Option<String>) -> String {
    match env_value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() && EnvFilter::try_new(v).is_ok() => v.to_string(),
        _ => DEFAULT_LOG_FILTER.to_string(),
    }
}

#[cfg(target_os = "ios")]
fn open_log_file(data_dir: &str) -> Option<std::fs::File> {
    let _ = std::fs::create_dir_all(data_dir);
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::path::Path::new(data_dir).join("announce.log"))
        .ok()
}

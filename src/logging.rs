use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
/// Returns `false` when a subscriber was already installed.
pub fn init(log_file: &Path) -> bool {
    if let Some(parent) = log_file.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let path: PathBuf = log_file.to_path_buf();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_writer(move || -> Box<dyn io::Write> {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        })
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("logs").join("kalosdex.log");
        init(&log);
        assert!(!init(&log));
        tracing::info!("hello");
        assert!(log.parent().unwrap().exists());
    }
}

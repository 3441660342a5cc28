use std::path::PathBuf;

use clap::Parser;
use tui_dispatch_debug::DebugCliArgs;

use crate::api::DEFAULT_API_BASE;
use crate::guidance::{DEFAULT_MODEL, DEFAULT_PROXY_URL};

#[derive(Parser, Debug)]
#[command(name = "kalosdex")]
#[command(about = "Team, collection and journal companion for Pokemon Legends: Z-A")]
pub struct Args {
    #[command(flatten)]
    pub debug: DebugCliArgs,
    /// Where team, collections, journal and the navigator cache are stored.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
    #[arg(long, env = "KALOSDEX_PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    pub proxy_url: String,
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Skip the on-disk PokeAPI response cache.
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub api_base: String,
    pub proxy_url: String,
    pub model: String,
    pub log_file: PathBuf,
    pub cache_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    pub fn from_args(args: &Args) -> Self {
        let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
        let log_file = args
            .log_file
            .clone()
            .unwrap_or_else(|| data_dir.join("kalosdex.log"));
        let cache_dir = (!args.no_cache).then(|| {
            dirs_next::cache_dir()
                .map(|dir| dir.join("kalosdex"))
                .unwrap_or_else(|| data_dir.join("cache"))
        });
        Self {
            data_dir,
            api_base: args.api_base.clone(),
            proxy_url: args.proxy_url.clone(),
            model: args.model.clone(),
            log_file,
            cache_dir,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .map(|dir| dir.join("kalosdex"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_hang_off_the_data_dir() {
        let args = Args::parse_from(["kalosdex", "--data-dir", "/tmp/kdx", "--no-cache"]);
        let config = RuntimeConfig::from_args(&args);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/kdx"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/kdx/kalosdex.log"));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.cache_dir, None);
    }

    #[test]
    fn explicit_flags_win() {
        let args = Args::parse_from([
            "kalosdex",
            "--proxy-url",
            "http://proxy.test/gemini",
            "--model",
            "gemini-2.5-pro",
            "--log-file",
            "/tmp/k.log",
        ]);
        let config = RuntimeConfig::from_args(&args);
        assert_eq!(config.proxy_url, "http://proxy.test/gemini");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.log_file, PathBuf::from("/tmp/k.log"));
    }
}

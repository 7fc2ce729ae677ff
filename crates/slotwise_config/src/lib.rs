use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
pub mod models;
use dotenv;
pub use models::*;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "SLOTWISE".to_string());

    let config_dir = locate_config_dir();
    let default_path = config_dir.join("default").display().to_string();
    let env_path = config_dir.join(&run_env).display().to_string();

    tracing::debug!(
        "loading config: default={}, overlay={}, env prefix={}",
        default_path,
        env_path,
        prefix
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path).required(false))
        .add_source(File::with_name(&env_path).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(raw_config)
}

/// Walks up from the crate (or current) directory until a `config/`
/// directory is found, so every workspace member resolves the same files.
/// `SLOTWISE_CONFIG_DIR` overrides the search entirely.
fn locate_config_dir() -> PathBuf {
    if let Ok(dir) = env::var("SLOTWISE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    let start = env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .ok()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    start
        .ancestors()
        .find(|p| p.join("config").is_dir())
        .map(|p| p.join("config"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// This function checks if the dotenv file has already been loaded using a
/// `OnceCell`. If not, it loads the file named by `DOTENV_OVERRIDE`, or
/// `.env` when unset. Missing files are ignored.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

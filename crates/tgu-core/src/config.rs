use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub temp_dir: PathBuf,
    pub health_port: u16,

    // Telegraph
    pub telegraph_domain: String,
    pub telegraph_api_url: String,
    pub telegraph_upload_url: String,
    pub telegraph_short_name: String,
    pub author_url_base: String,

    // Runtime constants
    pub progress_interval: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let cfg = Self::from_lookup(|key| env::var(key).ok())?;

        // Ensure the scratch root exists before the first photo arrives.
        fs::create_dir_all(&cfg.temp_dir)?;

        Ok(cfg)
    }

    /// Build the config from an arbitrary variable source (the process
    /// environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        // Required: the Bot API token. `BOT_TOKEN` is accepted for older deployments.
        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let temp_dir = get("TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/tmp/telegraph-uploader"));

        let health_port = match get("HEALTH_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("HEALTH_PORT must be a port number: {e}")))?,
            None => 8080,
        };

        let telegraph_domain = trim_slash(
            get("TELEGRAPH_DOMAIN").unwrap_or_else(|| "https://telegra.ph".to_string()),
        );
        let telegraph_api_url = trim_slash(
            get("TELEGRAPH_API_URL").unwrap_or_else(|| "https://api.telegra.ph".to_string()),
        );
        let telegraph_upload_url =
            get("TELEGRAPH_UPLOAD_URL").unwrap_or_else(|| format!("{telegraph_domain}/upload"));
        let telegraph_short_name =
            get("TELEGRAPH_SHORT_NAME").unwrap_or_else(|| "Telegraph Uploader".to_string());
        let author_url_base = trim_slash(
            get("AUTHOR_URL_BASE").unwrap_or_else(|| "https://telegram.dog".to_string()),
        );

        let progress_interval =
            Duration::from_millis(parse_u64(get("PROGRESS_INTERVAL_MS")).unwrap_or(3000));
        let http_timeout = Duration::from_secs(parse_u64(get("HTTP_TIMEOUT_SECS")).unwrap_or(30));

        Ok(Self {
            telegram_bot_token,
            temp_dir,
            health_port,
            telegraph_domain,
            telegraph_api_url,
            telegraph_upload_url,
            telegraph_short_name,
            author_url_base,
            progress_interval,
            http_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn trim_slash(s: String) -> String {
    s.trim_end_matches('/').to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

use std::{env, fmt, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_SECS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
const TELEGRAM_TOKEN: &str = "TOKEN";
const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Typed configuration, built once at startup.
///
/// Secrets stay optional here: their absence is checked on every cycle by
/// [`Config::credentials`] and only disables polling for that cycle.
#[derive(Clone)]
pub struct Config {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    pub endpoint: String,
    pub retry_interval: Duration,
    pub request_timeout: Duration,
}

/// The three secrets a cycle needs, validated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: ChatId,
}

impl Config {
    /// Load from `.env` (if present) and the process environment.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = |key: &str| lookup(key).and_then(non_empty);

        let endpoint = secret("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(Error::Config(format!(
                "PRACTICUM_ENDPOINT must be an http(s) URL, got {endpoint:?}"
            )));
        }

        let retry_interval =
            Duration::from_secs(parse_u64(&lookup, "RETRY_TIME")?.unwrap_or(DEFAULT_RETRY_SECS));
        if retry_interval.is_zero() {
            return Err(Error::Config("RETRY_TIME must be positive".to_string()));
        }
        let request_timeout = Duration::from_secs(
            parse_u64(&lookup, "REQUEST_TIMEOUT")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );

        Ok(Self {
            practicum_token: secret(PRACTICUM_TOKEN),
            telegram_token: secret(TELEGRAM_TOKEN),
            telegram_chat_id: secret(TELEGRAM_CHAT_ID),
            endpoint,
            retry_interval,
            request_timeout,
        })
    }

    /// Check that all three secrets are present and usable.
    pub fn credentials(&self) -> Result<Credentials> {
        let mut missing = Vec::new();
        if self.practicum_token.is_none() {
            missing.push(PRACTICUM_TOKEN);
        }
        if self.telegram_token.is_none() {
            missing.push(TELEGRAM_TOKEN);
        }
        if self.telegram_chat_id.is_none() {
            missing.push(TELEGRAM_CHAT_ID);
        }

        let (Some(practicum_token), Some(telegram_token), Some(chat_id)) = (
            &self.practicum_token,
            &self.telegram_token,
            &self.telegram_chat_id,
        ) else {
            return Err(Error::MissingCredentials(missing));
        };

        let chat_id = chat_id.trim().parse::<i64>().map_err(|_| {
            Error::Config(format!("{TELEGRAM_CHAT_ID} must be a numeric chat id"))
        })?;

        Ok(Credentials {
            practicum_token: practicum_token.clone(),
            telegram_token: telegram_token.clone(),
            chat_id: ChatId(chat_id),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &self.practicum_token.as_ref().map(|_| "***"))
            .field("telegram_token", &self.telegram_token.as_ref().map(|_| "***"))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("retry_interval", &self.retry_interval)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| {
            Error::Config(format!("{key} must be a whole number of seconds, got {raw:?}"))
        })
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
        let line = line.strip_prefix("export ").unwrap_or(line);

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

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

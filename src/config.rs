//! Runtime settings read from the environment

use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = "PUCITshell:- ";
pub const DEFAULT_HISTORY_SIZE: usize = 10;
pub const DEFAULT_MAX_JOBS: usize = 10;

const HISTORY_FILE: &str = ".pucsh_history";
const RC_FILE: &str = ".pucshrc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prompt template, see `PUCSH_PROMPT`
    pub prompt: String,
    pub history_size: usize,
    pub max_jobs: usize,
    pub history_file: Option<PathBuf>,
    pub rc_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            history_size: DEFAULT_HISTORY_SIZE,
            max_jobs: DEFAULT_MAX_JOBS,
            history_file: None,
            rc_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(prompt) = lookup("PUCSH_PROMPT") {
            config.prompt = prompt;
        }
        if let Some(size) = parse_size(&lookup, "PUCSH_HISTSIZE") {
            config.history_size = size;
        }
        if let Some(jobs) = parse_size(&lookup, "PUCSH_MAX_JOBS") {
            config.max_jobs = jobs;
        }

        if let Some(home) = lookup("HOME").filter(|h| !h.is_empty()) {
            let home = PathBuf::from(home);
            config.history_file = Some(home.join(HISTORY_FILE));
            config.rc_file = Some(home.join(RC_FILE));
        }

        config
    }
}

fn parse_size<F>(lookup: &F, key: &str) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a non-negative integer", key, raw);
            None
        }
    }
}

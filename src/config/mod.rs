use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::LogSource;

const DEFAULT_SOURCES: &str = "Scalping=trade_log_scalping.csv,Swing=trade_log_swing.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Trade logs, in merge order
    pub sources: Vec<LogSource>,

    // Report
    pub cache_ttl: Duration,
    pub records_limit: usize,

    // Bearer token for /api routes (unset = auth disabled)
    pub api_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let sources_raw =
            env::var("TRADE_LOG_SOURCES").unwrap_or_else(|_| DEFAULT_SOURCES.into());

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            sources: parse_sources(&sources_raw)?,

            cache_ttl: Duration::from_secs(
                env::var("REPORT_CACHE_TTL_SECS")
                    .unwrap_or_else(|_| "60".into())
                    .parse()
                    .unwrap_or(60),
            ),
            records_limit: env::var("RECORDS_LIMIT")
                .unwrap_or_else(|_| "200".into())
                .parse()
                .unwrap_or(200),

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }

    /// Config pointing at an explicit set of sources, everything else default.
    pub fn with_sources(sources: Vec<LogSource>) -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            sources,
            cache_ttl: Duration::from_secs(60),
            records_limit: 200,
            api_token: None,
        }
    }
}

/// Parse `label=path,label=path`. A bare path is labelled with its file stem.
pub fn parse_sources(raw: &str) -> anyhow::Result<Vec<LogSource>> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (label, path) = match entry.split_once('=') {
            Some((label, path)) => (label.trim().to_string(), PathBuf::from(path.trim())),
            None => {
                let path = PathBuf::from(entry);
                (stem_label(&path), path)
            }
        };

        if label.is_empty() || path.as_os_str().is_empty() {
            anyhow::bail!("invalid TRADE_LOG_SOURCES entry: {entry:?}");
        }
        if !seen.insert(label.clone()) {
            anyhow::bail!("duplicate trade log label: {label}");
        }

        sources.push(LogSource::new(label, path));
    }

    if sources.is_empty() {
        anyhow::bail!("TRADE_LOG_SOURCES must name at least one trade log");
    }

    Ok(sources)
}

fn stem_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_sources() {
        let sources = parse_sources(DEFAULT_SOURCES).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].label, "Scalping");
        assert_eq!(sources[0].path, PathBuf::from("trade_log_scalping.csv"));
        assert_eq!(sources[1].label, "Swing");
    }

    #[test]
    fn test_bare_path_uses_file_stem() {
        let sources = parse_sources("logs/gold_bot.csv").unwrap();
        assert_eq!(sources[0].label, "gold_bot");
        assert_eq!(sources[0].path, PathBuf::from("logs/gold_bot.csv"));
    }

    #[test]
    fn test_whitespace_and_empty_entries_ignored() {
        let sources = parse_sources(" A = a.csv , , B=b.csv ").unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].label, "A");
        assert_eq!(sources[0].path, PathBuf::from("a.csv"));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        assert!(parse_sources("A=a.csv,A=b.csv").is_err());
    }

    #[test]
    fn test_empty_label_rejected() {
        assert!(parse_sources("=a.csv").is_err());
        assert!(parse_sources("A=").is_err());
    }

    #[test]
    fn test_no_sources_rejected() {
        assert!(parse_sources(" , ").is_err());
    }
}

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub elasticsearch_url: String,
    pub elasticsearch_index: String,
    pub github_client_id: String,
    pub github_client_secret: String,
    pub jwt_secret: String,
    pub admin_subjects: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            elasticsearch_url: env::var("ELASTICSEARCH_URL")
                .unwrap_or_else(|_| "http://elasticsearch:9200".to_string()),
            elasticsearch_index: env::var("ELASTICSEARCH_INDEX")
                .unwrap_or_else(|_| "item".to_string()),
            github_client_id: env::var("GITHUB_CLIENT_ID")
                .context("GITHUB_CLIENT_ID must be set")?,
            github_client_secret: env::var("GITHUB_CLIENT_SECRET")
                .context("GITHUB_CLIENT_SECRET must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            admin_subjects: env::var("ADMIN_SUBJECTS")
                .map(|raw| parse_admin_subjects(&raw))
                .unwrap_or_default(),
        })
    }
}

/// Split a comma-separated allow-list, dropping blanks.
fn parse_admin_subjects(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|subject| !subject.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_subjects() {
        assert_eq!(
            parse_admin_subjects("7690509, 42 ,1138"),
            vec!["7690509", "42", "1138"]
        );
    }

    #[test]
    fn drops_empty_segments() {
        assert_eq!(parse_admin_subjects(",42,,"), vec!["42"]);
        assert!(parse_admin_subjects("").is_empty());
    }
}

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_atlas::config::load_config;
///
/// let config = load_config(Path::new("atlas.toml")).unwrap();
/// println!("Workers: {}", config.crawler.max_workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Stored with every crawl run so results can be traced back to the
/// configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-workers = 4
max-pages-per-site = 50
max-crawl-depth = 2
min-html-length = 200
max-retries = 2
backoff-base-ms = 10

[user-agent]
name = "AtlasTest/1.0"

[output]
database-path = "./test.db"
summary-dir = "./out"

[rules]
social-domains = ["facebook.com", "*.mastodon.social"]
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_workers, 4);
        assert_eq!(config.crawler.max_pages_per_site, 50);
        assert_eq!(config.crawler.max_crawl_depth, 2);
        assert_eq!(config.crawler.request_timeout_secs, defaults::REQUEST_TIMEOUT_SECS);
        assert_eq!(config.user_agent.name, "AtlasTest/1.0");
        assert_eq!(config.rules.social_domains.len(), 2);
        // Lists not mentioned keep their defaults
        assert_eq!(
            config.rules.excluded_extensions.len(),
            defaults::EXCLUDED_EXTENSIONS.len()
        );
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("[crawler]\n").unwrap();

        assert_eq!(config.crawler.max_workers, defaults::MAX_WORKERS);
        assert_eq!(config.crawler.max_pages_per_site, defaults::MAX_PAGES_PER_SITE);
        assert_eq!(config.crawler.max_crawl_depth, defaults::MAX_CRAWL_DEPTH);
        assert_eq!(config.crawler.deadline_secs, 0);
        assert_eq!(config.user_agent.name, defaults::USER_AGENT);
        assert_eq!(config.output.database_path, defaults::DATABASE_PATH);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/atlas.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-workers = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("[crawler]\n");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("[crawler]\nmax-workers = 1\n");
        let file2 = create_temp_config("[crawler]\nmax-workers = 2\n");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[crawler]\nmax-crawl-depth = 3\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.crawler.max_crawl_depth, 3);
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}

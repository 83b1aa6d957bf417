use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use engine_logging::engine_info;
use serde::Deserialize;
use taskstream_core::{JobField, PollSettings, TableFormat};
use taskstream_engine::{ClientSettings, DownloadStyle, DEFAULT_BASE_URL};

/// Environment variable consulted when the config carries no token.
pub const TOKEN_ENV: &str = "TASKSTREAM_TOKEN";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub default_site: Option<String>,
    pub browser_dir: PathBuf,
    /// Language of the kernel drags are injected into; `None` means no kernel.
    pub kernel_language: Option<String>,
    pub reload_interval_ms: u64,
    pub reload_check_interval_ms: u64,
    pub items_per_page: usize,
    pub request_timeout_ms: Option<u64>,
    pub download_style: DownloadStyle,
    pub columns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let poll = PollSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            default_site: None,
            browser_dir: PathBuf::from("."),
            kernel_language: Some("python".to_string()),
            reload_interval_ms: poll.reload_interval_ms,
            reload_check_interval_ms: poll.check_interval_ms,
            items_per_page: poll.items_per_page,
            request_timeout_ms: None,
            download_style: DownloadStyle::default(),
            columns: TableFormat::default()
                .columns
                .iter()
                .map(|field| field.name().to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    /// Reads the config file when given, then fills the token from the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                let config = Self::from_ron(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?;
                engine_info!("Loaded config from {}", path.display());
                config
            }
            None => Self::default(),
        };
        if config.token.is_none() {
            config.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        }
        Ok(config)
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.items_per_page == 0 {
            return Err(anyhow!("items_per_page must be at least 1"));
        }
        if self.reload_check_interval_ms == 0 {
            return Err(anyhow!("reload_check_interval_ms must be at least 1"));
        }
        if self.reload_check_interval_ms >= self.reload_interval_ms {
            return Err(anyhow!(
                "reload_check_interval_ms ({}) must be shorter than reload_interval_ms ({})",
                self.reload_check_interval_ms,
                self.reload_interval_ms
            ));
        }
        self.table_format().map(|_| ())
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            reload_interval_ms: self.reload_interval_ms,
            check_interval_ms: self.reload_check_interval_ms,
            items_per_page: self.items_per_page,
        }
    }

    pub fn table_format(&self) -> anyhow::Result<TableFormat> {
        let columns = self
            .columns
            .iter()
            .map(|name| JobField::from_name(name).ok_or_else(|| anyhow!("unknown column {name:?}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(TableFormat {
            columns,
            ..TableFormat::default()
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            ..ClientSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::from_ron("()").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.poll_settings(), PollSettings::default());
        assert_eq!(config.table_format().unwrap(), TableFormat::default());
        assert_eq!(config.download_style, DownloadStyle::Stream);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_ron(
            r#"(
                base_url: "https://lab.example/tvbextunicore",
                token: Some("abc"),
                default_site: Some("JUDAC"),
                reload_interval_ms: 30000,
                request_timeout_ms: Some(5000),
                download_style: server,
                columns: ["id", "status"],
            )"#,
        )
        .unwrap();

        assert_eq!(config.default_site.as_deref(), Some("JUDAC"));
        assert_eq!(config.poll_settings().reload_interval_ms, 30_000);
        assert_eq!(config.download_style, DownloadStyle::Server);
        assert_eq!(
            config.table_format().unwrap().columns,
            vec![JobField::Id, JobField::Status]
        );
        let client = config.client_settings();
        assert_eq!(client.token.as_deref(), Some("abc"));
        assert_eq!(client.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_unknown_columns_and_fields() {
        assert!(AppConfig::from_ron(r#"(columns: ["id", "colour"])"#).is_err());
        assert!(AppConfig::from_ron("(reload: 5)").is_err());
        assert!(AppConfig::from_ron("(items_per_page: 0)").is_err());
    }

    #[test]
    fn check_interval_must_be_shorter_than_reload_interval() {
        let err = AppConfig::from_ron("(reload_interval_ms: 5000)").unwrap_err();
        assert!(format!("{err:#}").contains("must be shorter than reload_interval_ms"));
        assert!(AppConfig::from_ron(
            "(reload_interval_ms: 5000, reload_check_interval_ms: 5000)"
        )
        .is_err());

        let config = AppConfig::from_ron(
            "(reload_interval_ms: 5000, reload_check_interval_ms: 1000)",
        )
        .unwrap();
        assert_eq!(config.poll_settings().check_interval_ms, 1_000);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"(token: Some("from-file"), browser_dir: "/tmp/work")"#).unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.token.as_deref(), Some("from-file"));
        assert_eq!(config.browser_dir, PathBuf::from("/tmp/work"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/taskstream.ron"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}

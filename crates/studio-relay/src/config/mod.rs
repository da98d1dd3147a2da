use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, StudioError};

/// Main configuration structure for the relay
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Completion API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Studio identity and prompt template
    #[serde(default)]
    pub studio: StudioConfig,
    /// Outbound stream rewriting
    #[serde(default)]
    pub redaction: RedactionConfig,
    /// Contact-form mail delivery
    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from an explicit path or the default search paths
    ///
    /// Falls back to built-in defaults when no file is found.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        let default_paths = [
            dirs::home_dir().map(|h| h.join(".studio-relay").join("config.toml")),
            dirs::config_dir().map(|c| c.join("studio-relay").join("config.toml")),
            Some(PathBuf::from("config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StudioError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| StudioError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply process-environment overrides (currently the listening port)
    ///
    /// `lookup` is usually `|key| std::env::var(key).ok()`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(&self.server.port_env) {
            let port = raw.trim().parse::<u16>().map_err(|e| {
                StudioError::Config(format!(
                    "{} must be a port number, got '{raw}': {e}",
                    self.server.port_env
                ))
            })?;
            self.server.port = port;
        }
        Ok(())
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Environment variable that overrides `port` when set
    #[serde(default = "default_port_env")]
    pub port_env: String,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            port_env: default_port_env(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_port_env() -> String {
    "CHAT_PORT".to_string()
}

/// Completion API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable holding the bearer credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Model used for the streamed chat
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used for subject lines and message review
    #[serde(default = "default_assist_model")]
    pub assist_model: String,
    /// Response cap for the streamed chat
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Number of most recent caller messages forwarded upstream
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_subject_max_tokens")]
    pub subject_max_tokens: u32,
    #[serde(default = "default_review_max_tokens")]
    pub review_max_tokens: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for the non-streaming assist calls
    #[serde(default = "default_assist_timeout_secs")]
    pub assist_timeout_secs: u64,
}

impl UpstreamConfig {
    /// Resolve the API credential from the environment
    ///
    /// A missing or blank credential is a configuration error; the service
    /// must not start without it.
    pub fn resolve_api_key<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(&self.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(StudioError::Config(format!(
                "{} is missing. Add it to .env",
                self.api_key_env
            ))),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key_env: default_api_key_env(),
            chat_model: default_chat_model(),
            assist_model: default_assist_model(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            history_limit: default_history_limit(),
            subject_max_tokens: default_subject_max_tokens(),
            review_max_tokens: default_review_max_tokens(),
            connect_timeout_secs: default_connect_timeout_secs(),
            assist_timeout_secs: default_assist_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_chat_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_assist_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_output_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    1.0
}

fn default_history_limit() -> usize {
    20
}

fn default_subject_max_tokens() -> u32 {
    40
}

fn default_review_max_tokens() -> u32 {
    200
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_assist_timeout_secs() -> u64 {
    20
}

/// Studio identity used by the prompt and outbound mail
#[derive(Debug, Clone, Deserialize)]
pub struct StudioConfig {
    /// Display name used in acknowledgement mail
    #[serde(default = "default_studio_name")]
    pub name: String,
    /// Optional file replacing the built-in company-context template
    #[serde(default)]
    pub template_path: Option<PathBuf>,
    /// Text rendered for missing live-stat fields
    #[serde(default = "default_stats_placeholder")]
    pub stats_placeholder: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            name: default_studio_name(),
            template_path: None,
            stats_placeholder: default_stats_placeholder(),
        }
    }
}

fn default_studio_name() -> String {
    "Luminary Ventures".to_string()
}

fn default_stats_placeholder() -> String {
    "N/A".to_string()
}

/// Ordered find/replace rules applied to the outbound chat stream
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RedactionConfig {
    #[serde(default)]
    pub rules: Vec<RedactionRuleConfig>,
}

/// One case-insensitive literal pattern and its replacement
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RedactionRuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

/// Outbound mail configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Base URL of the mail API
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,
    /// Environment variable holding the mail API credential
    #[serde(default = "default_mail_api_key_env")]
    pub api_key_env: String,
    /// Sending address; the display name is the submitter's name
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Fixed recipient for contact submissions
    #[serde(default = "default_studio_address")]
    pub studio_address: String,
    /// Send a confirmation to the submitter after the studio copy succeeds
    #[serde(default = "default_send_acknowledgement")]
    pub send_acknowledgement: bool,
    #[serde(default = "default_mail_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: default_mail_api_url(),
            api_key_env: default_mail_api_key_env(),
            from_address: default_from_address(),
            studio_address: default_studio_address(),
            send_acknowledgement: default_send_acknowledgement(),
            timeout_secs: default_mail_timeout_secs(),
        }
    }
}

fn default_mail_api_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_mail_api_key_env() -> String {
    "MAIL_API_KEY".to_string()
}

fn default_from_address() -> String {
    "noreply@luminaryventures.com".to_string()
}

fn default_studio_address() -> String {
    "hello@luminaryventures.com".to_string()
}

fn default_send_acknowledgement() -> bool {
    true
}

fn default_mail_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.listen_addr(), "0.0.0.0:3001");
        assert_eq!(config.upstream.api_url, "https://api.openai.com/v1");
        assert_eq!(config.upstream.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.upstream.chat_model, "gpt-5-mini");
        assert_eq!(config.upstream.max_output_tokens, 512);
        assert_eq!(config.upstream.history_limit, 20);
        assert_eq!(config.studio.stats_placeholder, "N/A");
        assert!(config.studio.template_path.is_none());
        assert!(config.redaction.rules.is_empty());
        assert!(config.mail.send_acknowledgement);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
[server]
host = "127.0.0.1"
port = 8080

[upstream]
api_url = "https://llm.example.com/v1"
chat_model = "gpt-4o"
history_limit = 10

[studio]
name = "Shimmer Studio"
template_path = "/etc/studio/prompt.txt"

[[redaction.rules]]
pattern = "OpenAI"
replacement = "Luminary"

[[redaction.rules]]
pattern = "ChatGPT"
replacement = "Luminary AI"

[mail]
studio_address = "projects@example.com"
send_acknowledgement = false
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to parse TOML");

        assert_eq!(config.server.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.upstream.api_url, "https://llm.example.com/v1");
        assert_eq!(config.upstream.chat_model, "gpt-4o");
        assert_eq!(config.upstream.history_limit, 10);
        assert_eq!(config.upstream.assist_model, "gpt-4o-mini");
        assert_eq!(config.studio.name, "Shimmer Studio");
        assert_eq!(
            config.studio.template_path,
            Some(PathBuf::from("/etc/studio/prompt.txt"))
        );
        assert_eq!(config.redaction.rules.len(), 2);
        assert_eq!(config.redaction.rules[0].pattern, "OpenAI");
        assert_eq!(config.redaction.rules[1].replacement, "Luminary AI");
        assert_eq!(config.mail.studio_address, "projects@example.com");
        assert!(!config.mail.send_acknowledgement);
    }

    #[test]
    fn test_redaction_rule_replacement_defaults_to_empty() {
        let toml_str = r#"
[[redaction.rules]]
pattern = "secret"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.redaction.rules[0].replacement, "");
    }

    #[test]
    fn test_env_override_port() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| (key == "CHAT_PORT").then(|| "4100".to_string()))
            .unwrap();
        assert_eq!(config.server.port, 4100);
    }

    #[test]
    fn test_env_override_rejects_bad_port() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|_| Some("not-a-port".to_string()));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("CHAT_PORT"));
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let config = UpstreamConfig::default();
        let err = config.resolve_api_key(|_| None).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let err = config.resolve_api_key(|_| Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[test]
    fn test_resolve_api_key_present() {
        let config = UpstreamConfig::default();
        let key = config
            .resolve_api_key(|key| (key == "OPENAI_API_KEY").then(|| "sk-test".to_string()))
            .unwrap();
        assert_eq!(key, "sk-test");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 9000").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}

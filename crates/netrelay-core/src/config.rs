use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

// Wire constants — must match the browser client exactly
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const MAX_PAYLOAD_BYTES: usize = 256 * 1024; // 256 KB hard cap per frame
pub const OUTBOUND_QUEUE_DEPTH: usize = 64; // per-connection outbound buffer

/// Top-level config (netrelay.toml + NETRELAY_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub ingress: IngressConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            ai: AiConfig::default(),
            ingress: IngressConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Provider API key (NETRELAY_AI_KEY). Empty key fails `validate()` —
    /// the gateway must not start without a usable credential.
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Provider base URL (NETRELAY_AI_ENDPOINT). Single-token field name:
    /// `Env::split("_")` cannot address multi-word keys.
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            model: default_model(),
            endpoint: default_ai_endpoint(),
        }
    }
}

/// Webhook ingress settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressConfig {
    /// Sender-identity suffix treated as the bot's own automated identity
    /// (NETRELAY_INGRESS_DOMAIN). Events from this identity are never
    /// re-ingested (loop prevention).
    #[serde(default = "default_bot_domain")]
    pub domain: String,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            domain: default_bot_domain(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_bot_domain() -> String {
    "@webex.bot".to_string()
}

impl RelayConfig {
    /// Load config from a TOML file with NETRELAY_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. NETRELAY_CONFIG env var
    ///   3. ~/.netrelay/netrelay.toml
    ///
    /// A missing file is fine — defaults plus env vars apply.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var("NETRELAY_CONFIG").ok())
            .unwrap_or_else(default_config_path);

        let config: RelayConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("NETRELAY_").split("_"))
            .extract()
            .map_err(|e| crate::error::RelayError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Structural validation — the only unrecoverable configuration fault
    /// is a missing AI credential.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.ai.key.trim().is_empty() {
            return Err(crate::error::RelayError::Config(
                "ai.key is not set (NETRELAY_AI_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.netrelay/netrelay.toml", home)
}

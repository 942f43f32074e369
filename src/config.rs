use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Without a key every completion falls back to canned data.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub regenerate_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub regenerate_temperature: f32,
    pub regenerate_max_tokens: u32,
    pub document_max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-8b-8192".to_string(),
            regenerate_model: "llama-3.1-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            regenerate_temperature: 0.3,
            regenerate_max_tokens: 2048,
            document_max_tokens: 4000,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
            background: "#F8FAFC".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub render: RenderConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            render: RenderConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerConfigFile {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmConfigFile {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    regenerate_model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    regenerate_temperature: Option<f32>,
    regenerate_max_tokens: Option<u32>,
    document_max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    server: Option<ServerConfigFile>,
    llm: Option<LlmConfigFile>,
    render: Option<RenderConfigFile>,
    log_level: Option<String>,
}

/// Defaults, then the optional JSON file, then the process environment.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    if let Some(path) = path {
        let contents = std::fs::read_to_string(path)?;
        let parsed: ConfigFile = serde_json::from_str(&contents)?;
        apply_file(&mut config, parsed);
    }
    apply_env(&mut config, |name| std::env::var(name).ok())?;
    Ok(config)
}

fn apply_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(server) = parsed.server {
        if let Some(v) = server.host {
            config.server.host = v;
        }
        if let Some(v) = server.port {
            config.server.port = v;
        }
    }

    if let Some(llm) = parsed.llm {
        if let Some(v) = llm.api_key {
            config.llm.api_key = Some(v);
        }
        if let Some(v) = llm.base_url {
            config.llm.base_url = v;
        }
        if let Some(v) = llm.model {
            config.llm.model = v;
        }
        if let Some(v) = llm.regenerate_model {
            config.llm.regenerate_model = v;
        }
        if let Some(v) = llm.temperature {
            config.llm.temperature = v;
        }
        if let Some(v) = llm.max_tokens {
            config.llm.max_tokens = v;
        }
        if let Some(v) = llm.regenerate_temperature {
            config.llm.regenerate_temperature = v;
        }
        if let Some(v) = llm.regenerate_max_tokens {
            config.llm.regenerate_max_tokens = v;
        }
        if let Some(v) = llm.document_max_tokens {
            config.llm.document_max_tokens = v;
        }
        if let Some(v) = llm.timeout_secs {
            config.llm.timeout_secs = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    if let Some(v) = parsed.log_level {
        config.log_level = v;
    }
}

fn apply_env(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
    let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(v) = var("GROQ_API_KEY") {
        config.llm.api_key = Some(v);
    }
    if let Some(v) = var("GROQ_BASE_URL") {
        config.llm.base_url = v;
    }
    if let Some(v) = var("GROQ_MODEL") {
        config.llm.model = v;
    }
    if let Some(v) = var("HOST") {
        config.server.host = v;
    }
    if let Some(v) = var("PORT") {
        config.server.port = v
            .trim()
            .parse()
            .map_err(|err| anyhow::anyhow!("invalid PORT `{v}`: {err}"))?;
    }
    if let Some(v) = var("RUST_LOG") {
        config.log_level = v;
    }
    Ok(())
}

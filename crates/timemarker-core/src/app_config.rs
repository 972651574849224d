use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Server-held inference credential. Never serialized, never
    /// logged, never part of a response.
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub model: String,
    pub geocode_base_url: String,
    pub geocode_user_agent: String,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("groq_api_key", &"[redacted]")
            .field("groq_base_url", &self.groq_base_url)
            .field("model", &self.model)
            .field("geocode_base_url", &self.geocode_base_url)
            .field("geocode_user_agent", &self.geocode_user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

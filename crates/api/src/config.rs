//! Process configuration, loaded from the environment once at startup.
//! No hot-reload.

/// Runtime mode. Affects error verbosity and log format only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the external database backend.
    pub backend_url: Option<String>,
    /// Privileged key for the backend. Backend-only; never reaches clients.
    pub service_key: Option<String>,
    /// Frontend origin allowed by CORS. Absent means permissive.
    pub frontend_url: Option<String>,
    pub port: u16,
    pub env: AppEnv,
    /// Force the in-memory backend even when a URL is configured.
    pub force_in_memory: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let backend_url = std::env::var("BACKEND_URL").ok().filter(|v| !v.is_empty());
        let service_key = std::env::var("SERVICE_ROLE_KEY").ok().filter(|v| !v.is_empty());
        let frontend_url = std::env::var("FRONTEND_URL").ok().filter(|v| !v.is_empty());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3001);

        let env = match std::env::var("APP_ENV").as_deref() {
            Ok("production") => AppEnv::Production,
            _ => AppEnv::Development,
        };

        let force_in_memory = std::env::var("USE_IN_MEMORY_BACKEND")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            backend_url,
            service_key,
            frontend_url,
            port,
            env,
            force_in_memory,
        }
    }

    pub fn is_development(&self) -> bool {
        self.env == AppEnv::Development
    }

    pub fn env_name(&self) -> &'static str {
        match self.env {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
        }
    }

    /// Whether to run against the in-memory backend instead of the REST
    /// adapters. Chosen at startup, like the rest of the wiring.
    pub fn use_in_memory(&self) -> bool {
        self.force_in_memory || self.backend_url.is_none() || self.service_key.is_none()
    }
}

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use common_crypto::SecretKey;

pub const DEFAULT_SANDBOX_URL: &str = "https://sandbox.jazzcash.com.pk";
pub const DEFAULT_LIVE_URL: &str = "https://payments.jazzcash.com.pk";
pub const DEFAULT_API_VERSION: &str = "1.1";
pub const DEFAULT_CURRENCY: &str = "PKR";
pub const DEFAULT_LANGUAGE: &str = "EN";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Logical endpoint keys that accept a literal path override via `JAZZCASH_ENDPOINT_<KEY>`.
pub const ENDPOINT_KEYS: &[&str] = &[
    "AUTHORIZE",
    "CAPTURE",
    "VOID",
    "REFUND",
    "STATUS",
    "DIRECT_PAY",
    "MOBILE",
    "VOUCHER",
    "3DS_ENROLL",
    "PROCESS_ACS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Live,
}

impl Environment {
    /// Exactly `live` selects production; any other value falls back to the sandbox.
    pub fn parse(value: &str) -> Self {
        if value == "live" {
            Environment::Live
        } else {
            Environment::Sandbox
        }
    }
}

/// Merchant credentials and endpoint layout, resolved once and shared read-only.
///
/// Credentials are not validated here: a missing merchant id, password or hash key
/// surfaces as an authentication failure from the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub merchant_id: String,
    pub password: String,
    pub hash_key: SecretKey,
    pub environment: Environment,
    pub api_version: String,
    pub sandbox_url: String,
    pub live_url: String,
    pub endpoints: HashMap<String, String>,
    pub request_timeout: Duration,
    pub currency: String,
    pub language: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl GatewayConfig {
    /// Construct config with gateway defaults and the given credentials.
    pub fn new(
        merchant_id: impl Into<String>,
        password: impl Into<String>,
        hash_key: impl Into<SecretKey>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            password: password.into(),
            hash_key: hash_key.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a `.env` file when one exists, then read the process environment.
    pub fn from_dotenv() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        Self::from_env()
    }

    /// Load the given `.env` file into the process environment, then read it.
    /// Variables already set in the environment keep their values.
    pub fn from_dotenv_path(path: impl AsRef<Path>) -> Result<Self, dotenv::Error> {
        dotenv::from_path(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loaded .env file");
        Ok(Self::from_env())
    }

    /// Resolve every setting through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let endpoints = ENDPOINT_KEYS
            .iter()
            .filter_map(|key| {
                get(&format!("JAZZCASH_ENDPOINT_{key}")).map(|path| (key.to_string(), path))
            })
            .collect();
        let timeout_secs = get("JAZZCASH_HTTP_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            merchant_id: get("JAZZCASH_MERCHANT_ID").unwrap_or_default(),
            password: get("JAZZCASH_PASSWORD").unwrap_or_default(),
            hash_key: SecretKey::new(get("JAZZCASH_HASH_KEY").unwrap_or_default()),
            environment: get("JAZZCASH_ENVIRONMENT")
                .map(|value| Environment::parse(&value))
                .unwrap_or(Environment::Sandbox),
            api_version: get("JAZZCASH_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            sandbox_url: get("JAZZCASH_SANDBOX_URL")
                .unwrap_or_else(|| DEFAULT_SANDBOX_URL.to_string()),
            live_url: get("JAZZCASH_LIVE_URL").unwrap_or_else(|| DEFAULT_LIVE_URL.to_string()),
            endpoints,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            currency: get("JAZZCASH_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            language: get("JAZZCASH_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Point both environments at the same host (handy for mock servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.sandbox_url = url.clone();
        self.live_url = url;
        self
    }

    pub fn with_endpoint_override(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.endpoints.insert(key.into(), path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        match self.environment {
            Environment::Live => &self.live_url,
            Environment::Sandbox => &self.sandbox_url,
        }
    }
}

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};

const API_ROOT: &str = "/ApplicationAPI/API";

/// Address-space layout the gateway exposes for a given API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiLayout {
    /// `1.0` routes live directly under the API root.
    Legacy,
    /// Later versions nest routes under `/<version>`.
    Versioned,
}

fn layout_for(version: &str) -> Option<ApiLayout> {
    match version {
        "1.0" => Some(ApiLayout::Legacy),
        "1.1" | "2.0" => Some(ApiLayout::Versioned),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    config: Arc<GatewayConfig>,
}

impl EndpointBuilder {
    pub fn new(config: Arc<GatewayConfig>) -> Self {
        Self { config }
    }

    /// Absolute URL for an endpoint key or relative path.
    pub fn build(&self, key: &str) -> GatewayResult<String> {
        if key.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "endpoint key must be a non-empty string".into(),
            ));
        }
        let base = self.base_url()?;
        if let Some(path) = self.config.endpoints.get(key) {
            return Ok(format!("{base}{path}"));
        }

        let prefix = self.versioned_prefix()?;
        if key.starts_with('/') {
            Ok(format!("{base}{prefix}{key}"))
        } else {
            Ok(format!("{base}{prefix}/{key}"))
        }
    }

    /// Use the override configured for `endpoint_key`, else `default_path` under the API prefix.
    pub fn resolve(&self, endpoint_key: &str, default_path: &str) -> GatewayResult<String> {
        if let Some(path) = self.config.endpoints.get(endpoint_key) {
            return Ok(format!("{}{}", self.base_url()?, path));
        }
        self.build(default_path)
    }

    fn base_url(&self) -> GatewayResult<&str> {
        let base = self.config.base_url().trim_end_matches('/');
        if base.is_empty() {
            return Err(GatewayError::Configuration(format!(
                "base URL for {:?} environment is not set",
                self.config.environment
            )));
        }
        Ok(base)
    }

    fn versioned_prefix(&self) -> GatewayResult<String> {
        let version = self.config.api_version.trim();
        if version.is_empty() {
            return Err(GatewayError::Configuration("API version is not set".into()));
        }
        match layout_for(version) {
            Some(ApiLayout::Legacy) => Ok(API_ROOT.to_string()),
            Some(ApiLayout::Versioned) => Ok(format!("{API_ROOT}/{version}")),
            None => Err(GatewayError::Configuration(format!(
                "unsupported API version '{version}'"
            ))),
        }
    }
}

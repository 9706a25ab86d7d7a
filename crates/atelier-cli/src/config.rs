//! CLI configuration file handling.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use atelier_compile::{Language, ServiceEndpoint, ServiceMap};

use crate::error::{CliError, CliResult};

/// TOML configuration. Everything is optional; an absent file means the
/// shipped defaults.
///
/// ```toml
/// template-base = "templates"
///
/// [services."c:wasm"]
/// url = "http://localhost:9000/compile/c"
///
/// [services."rust:wasm"]
/// url = "http://localhost:9000/compile/rust"
/// protocol = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CliConfig {
    /// Base directory for template content fetched by `project open`.
    pub template_base: Option<String>,
    /// Service route overrides, keyed `source:target`.
    pub services: HashMap<String, ServiceOverride>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceOverride {
    pub url: String,
    /// `json` (default) or `form`.
    #[serde(default)]
    pub protocol: Option<String>,
}

impl CliConfig {
    /// Loads the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        debug!(path, overrides = config.services.len(), "configuration loaded");
        Ok(config)
    }

    /// The service table: shipped defaults with this config's overrides
    /// applied on top.
    pub fn service_map(&self) -> CliResult<ServiceMap> {
        let mut map = ServiceMap::with_defaults();
        for (route, service) in &self.services {
            let (source, target) = parse_route(route)?;
            let endpoint = match service.protocol.as_deref() {
                None | Some("json") => ServiceEndpoint::json(service.url.clone()),
                Some("form") => ServiceEndpoint::form(service.url.clone()),
                Some(other) => {
                    return Err(CliError::Config(format!(
                        "unknown protocol {other} for route {route}"
                    )))
                }
            };
            map.insert(source, target, endpoint);
        }
        Ok(map)
    }
}

fn parse_route(route: &str) -> CliResult<(Language, Language)> {
    let (source, target) = route.split_once(':').ok_or_else(|| {
        CliError::Config(format!("invalid service route {route}, expected source:target"))
    })?;
    Ok((source.parse()?, target.parse()?))
}

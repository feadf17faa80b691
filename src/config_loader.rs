use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5015,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DemoConfig {
    /// Seed the in-memory stores with sample records at startup
    pub seed_sample_data: bool,
    pub organization_id: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            organization_id: "org_demo".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ZenConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

pub fn load_config() -> Result<ZenConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(ZenConfig::default()))
        .merge(Toml::file("zenthera.toml"))
        .merge(Env::prefixed("ZENTHERA_").split("__"));

    let config: ZenConfig = figment.extract()?;

    if config.demo.organization_id.trim().is_empty() {
        return Err(figment::Error::from(
            "demo.organization_id must be set".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = ZenConfig::default();
        assert_eq!(cfg.server.port, 5015);
        assert!(cfg.demo.seed_sample_data);
        assert_eq!(cfg.demo.organization_id, "org_demo");
    }
}

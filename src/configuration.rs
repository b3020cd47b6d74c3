use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub scraper: ScraperSettings,
    pub store: StoreSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScraperSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub result_cap: usize,
    pub user_agent: String,
    pub accept_language: String,
}

impl ScraperSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Deserialize, Clone)]
pub struct StoreSettings {
    pub websites_file: PathBuf,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // APP_APPLICATION__PORT=8080 sets Settings.application.port
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

/// Scraper settings exactly as shipped in `configuration/base.yaml`.
#[cfg(test)]
pub fn base_scraper_settings() -> ScraperSettings {
    let base = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("configuration/base.yaml");
    config::Config::builder()
        .add_source(config::File::from(base))
        .build()
        .and_then(|c| c.get::<ScraperSettings>("scraper"))
        .expect("base.yaml carries a scraper section")
}

#[cfg(test)]
mod tests {
    use super::{base_scraper_settings, Environment};

    #[test]
    fn environment_parses_case_insensitively() {
        let env: Environment = "PRODUCTION".to_string().try_into().unwrap();
        assert_eq!(env.as_str(), "production");
    }

    #[test]
    fn environment_rejects_unknown_names() {
        let env: Result<Environment, String> = "staging".to_string().try_into();
        assert!(env.is_err());
    }

    #[test]
    fn base_config_keeps_fetch_limits() {
        let settings = base_scraper_settings();

        assert_eq!(settings.timeout_secs, 15);
        assert_eq!(settings.result_cap, 20);
        assert!(settings.user_agent.starts_with("Mozilla/5.0"));
    }
}

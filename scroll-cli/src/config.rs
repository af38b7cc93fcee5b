use anyhow::Result;
use clap::ArgMatches;
use clap::parser::ValueSource;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScrollConfig {
    /// Build configuration
    pub build: BuildConfig,
    /// Site configuration (from scroll-core)
    #[serde(flatten)]
    pub site: scroll_core::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Source directory containing the library and markdown pages
    pub source: String,
    /// Output directory for generated site
    pub output: String,
    /// Theme directory
    pub theme: String,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: "./src".to_string(),
            output: "./_site".to_string(),
            theme: "./theme".to_string(),
            config: "./scroll.toml".to_string(),
        }
    }
}

impl ScrollConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (SCROLL_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = args
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_else(|| BuildConfig::default().config);

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(ConfigBuilder::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            builder = builder.add_source(File::from(Path::new(&config_file)));
        } else {
            tracing::debug!(path = %config_file, "no config file, using defaults");
        }

        // 3. Add environment variables with SCROLL_ prefix
        builder = builder.add_source(
            Environment::with_prefix("SCROLL")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments that were given explicitly
        let mut cli_overrides = HashMap::new();
        for key in ["source", "output", "theme", "config"] {
            if let Some(value) = explicit_arg(args, key) {
                cli_overrides.insert(format!("build.{key}"), value.clone());
            }
        }

        if !cli_overrides.is_empty() {
            builder = builder.add_source(ConfigBuilder::try_from(&cli_overrides)?);
        }

        let config = builder.build()?;
        let scroll_config: ScrollConfig = config.try_deserialize()?;

        Ok(scroll_config)
    }

    /// Get just the site configuration for passing to scroll-core
    pub fn site_config(&self) -> &scroll_core::config::Config {
        &self.site
    }

    /// Get the build configuration
    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

/// A CLI value the user actually typed, ignoring clap defaults so that the
/// config file and environment can still win over them.
fn explicit_arg<'a>(args: &'a ArgMatches, key: &str) -> Option<&'a String> {
    let value = args.try_get_one::<String>(key).ok().flatten()?;
    matches!(args.value_source(key), Some(ValueSource::CommandLine)).then_some(value)
}

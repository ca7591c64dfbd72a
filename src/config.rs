use crate::error::AppError;
use crate::features::ScalingConfig;
use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_field_model_path")]
    pub field_model_path: PathBuf,
    /// When unset the field model also scores programs.
    #[serde(default)]
    pub program_model_path: Option<PathBuf>,
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    #[serde(default)]
    pub scaling: ScalingConfig,
}

fn default_port() -> u16 {
    8000
}

fn default_field_model_path() -> PathBuf {
    PathBuf::from("model/field_model.json")
}

fn default_top_k() -> usize {
    crate::ranking::DEFAULT_TOP_K
}

fn default_max_candidates() -> usize {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            field_model_path: default_field_model_path(),
            program_model_path: None,
            default_top_k: default_top_k(),
            max_candidates: default_max_candidates(),
            scaling: ScalingConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then `edumatch.toml` if present, then `EDUMATCH_*` variables
    /// (`EDUMATCH_SCALING__GRADE_STD` for nested keys).
    pub fn load() -> Result<Self, AppError> {
        let builder = ::config::Config::builder()
            .add_source(File::with_name("edumatch").required(false))
            .add_source(
                Environment::with_prefix("EDUMATCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.max_candidates == 0 {
            return Err(AppError::InvalidInput("max_candidates must be positive".into()));
        }
        if self.scaling.interest_std < 0.0 || self.scaling.grade_std < 0.0 {
            return Err(AppError::InvalidInput("scaling std must not be negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;

    fn from_toml(toml: &str) -> Result<Config, AppError> {
        Config::from_builder(
            ::config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn empty_sources_use_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.field_model_path, PathBuf::from("model/field_model.json"));
        assert!(config.program_model_path.is_none());
        assert_eq!(config.default_top_k, 3);
        assert_eq!(config.max_candidates, 5000);
        assert_eq!(config.scaling, ScalingConfig::default());
    }

    #[test]
    fn file_overrides_nested_scaling() {
        let config = from_toml(
            r#"
            port = 9100
            program_model_path = "model/program_model.json"

            [scaling]
            grade_std = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(
            config.program_model_path,
            Some(PathBuf::from("model/program_model.json"))
        );
        assert_eq!(config.scaling.grade_std, 2.0);
        assert_eq!(config.scaling.grade_mean, 2.5);
    }

    #[test]
    fn zero_max_candidates_is_rejected() {
        assert!(matches!(
            from_toml("max_candidates = 0"),
            Err(AppError::InvalidInput(_))
        ));
    }
}

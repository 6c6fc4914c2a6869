use strum::{Display, EnumString};

/// Deployment environment, selected by `APP_ENVIRONMENT`.
///
/// The environment name doubles as the configuration file stem
/// (`config/development.yaml`, `config/test.yaml`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    #[must_use]
    pub fn config_file(self) -> String {
        format!("config/{self}")
    }
}

use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// Environment variable holding the deployment profile selector.
pub const PROFILE_ENV_VAR: &str = "APP_ENV";

/// The closed set of deployment profiles. There is no default: a process
/// that cannot name its profile does not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Local,
    Dev,
    Test,
    Prod,
}

impl Profile {
    pub const ALL: [Profile; 4] = [Profile::Local, Profile::Dev, Profile::Test, Profile::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Local => "local",
            Profile::Dev => "dev",
            Profile::Test => "test",
            Profile::Prod => "prod",
        }
    }

    /// Name of the profile's configuration file inside the config directory.
    pub fn file_name(&self) -> String {
        format!("{}.toml", self.as_str())
    }

    /// Resolve a raw selector; `None` (variable unset) is as fatal as an
    /// unknown value.
    pub fn from_selector(selector: Option<&str>) -> Result<Self, ConfigError> {
        match selector {
            Some(raw) => raw.parse(),
            None => Err(ConfigError::MissingProfile(PROFILE_ENV_VAR)),
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Profile::Local),
            "dev" => Ok(Profile::Dev),
            "test" => Ok(Profile::Test),
            "prod" => Ok(Profile::Prod),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

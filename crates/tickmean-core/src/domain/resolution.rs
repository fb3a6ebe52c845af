use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Bar granularity requested from a price provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "5m")]
    FiveMinutes,
}

impl Resolution {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::FiveMinutes => "5m",
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1d" | "daily" => Ok(Self::Daily),
            "5m" | "5min" => Ok(Self::FiveMinutes),
            other => Err(ValidationError::InvalidResolution {
                value: other.to_owned(),
            }),
        }
    }
}

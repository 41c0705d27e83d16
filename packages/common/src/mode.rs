use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scoring variant of a virtual contest.
///
/// On the wire the default mode is `null` and lockout is the string
/// `"lockout"`, matching what the contest endpoints accept and return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VirtualContestMode {
    #[default]
    Default,
    /// The first contestant to solve a problem takes all of its points.
    Lockout,
}

impl VirtualContestMode {
    /// All selectable modes, in menu order.
    pub const ALL: &'static [VirtualContestMode] = &[Self::Default, Self::Lockout];

    /// Value sent to the API (`None` means default scoring).
    pub fn as_api(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Lockout => Some("lockout"),
        }
    }

    pub fn from_api(value: Option<&str>) -> Result<Self, ParseModeError> {
        match value {
            None => Ok(Self::Default),
            Some(s) => s.parse(),
        }
    }

    /// Human-readable label shown in the mode selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Default => "Normal",
            Self::Lockout => "Lockout",
        }
    }
}

impl fmt::Display for VirtualContestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error when parsing an invalid mode string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    invalid: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid mode '{}'. Valid values: normal, lockout", self.invalid)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for VirtualContestMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "default" => Ok(Self::Default),
            "lockout" => Ok(Self::Lockout),
            _ => Err(ParseModeError {
                invalid: s.to_string(),
            }),
        }
    }
}

impl Serialize for VirtualContestMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_api().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VirtualContestMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Self::from_api(value.as_deref()).map_err(serde::de::Error::custom)
    }
}

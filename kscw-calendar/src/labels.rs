use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// UI language used for generated titles and notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    #[must_use]
    pub fn training_title(self, team: &str) -> String {
        if team.is_empty() {
            "Training".to_string()
        } else {
            format!("Training {team}")
        }
    }

    #[must_use]
    pub fn closure_title(self, hall: &str) -> String {
        let label = match self {
            Self::De => "Halle gesperrt",
            Self::En => "Hall closed",
        };

        if hall.is_empty() {
            label.to_string()
        } else {
            format!("{label}: {hall}")
        }
    }

    #[must_use]
    pub fn cancelled(self) -> &'static str {
        match self {
            Self::De => "Abgesagt",
            Self::En => "Cancelled",
        }
    }

    #[must_use]
    pub fn result(self) -> &'static str {
        match self {
            Self::De => "Resultat",
            Self::En => "Result",
        }
    }

    #[must_use]
    pub fn calendar_name(self) -> &'static str {
        match self {
            Self::De => "KSCW Kalender",
            Self::En => "KSCW Calendar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language `{}` (expected `de` or `en`)", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

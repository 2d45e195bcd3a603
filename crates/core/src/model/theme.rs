use std::fmt;
use std::str::FromStr;

/// Light/dark display preference, persisted as a single string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// Returns the opposite preference.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a theme preference from its stored string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError(String);

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized theme preference {:?}", self.0)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for ThemePreference {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_roundtrips_through_string() {
        for theme in [ThemePreference::Light, ThemePreference::Dark] {
            let parsed: ThemePreference = theme.to_string().parse().unwrap();
            assert_eq!(parsed, theme);
        }
    }

    #[test]
    fn unknown_value_fails_to_parse() {
        assert!("solarized".parse::<ThemePreference>().is_err());
    }

    #[test]
    fn toggled_flips_between_light_and_dark() {
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
    }

    #[test]
    fn default_is_light() {
        assert_eq!(ThemePreference::default(), ThemePreference::Light);
    }
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which part of the catalog a round's glyphs come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceSelector {
    /// The unfiltered catalog.
    #[default]
    All,
    /// A single catalog category, e.g. `animals-and-nature`.
    Category(String),
    /// Several catalog groups, fetched and concatenated in this order.
    Groups(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    #[error("unknown source {0:?} (expected all, category:<name> or groups:<a>,<b>)")]
    UnknownKind(String),
    #[error("source name {0:?} is empty or contains '/' or whitespace")]
    InvalidName(String),
    #[error("groups: needs at least one group name")]
    NoGroups,
}

fn validate_name(raw: &str) -> Result<String, SelectorParseError> {
    let name = raw.trim();
    if name.is_empty() || name.contains('/') || name.chars().any(char::is_whitespace) {
        return Err(SelectorParseError::InvalidName(raw.to_string()));
    }
    Ok(name.to_string())
}

impl FromStr for SourceSelector {
    type Err = SelectorParseError;

    /// Accepts `all`, `category:<name>` and `groups:<a>,<b>,...`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let Some((kind, rest)) = s.split_once(':') else {
            return Err(SelectorParseError::UnknownKind(s.to_string()));
        };

        match kind.trim().to_ascii_lowercase().as_str() {
            "category" => validate_name(rest).map(Self::Category),
            "groups" | "group" => {
                let groups = rest
                    .split(',')
                    .filter(|part| !part.trim().is_empty())
                    .map(validate_name)
                    .collect::<Result<Vec<_>, _>>()?;
                if groups.is_empty() {
                    return Err(SelectorParseError::NoGroups);
                }
                Ok(Self::Groups(groups))
            }
            _ => Err(SelectorParseError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for SourceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSelector::All => write!(f, "all"),
            SourceSelector::Category(name) => write!(f, "category:{name}"),
            SourceSelector::Groups(groups) => write!(f, "groups:{}", groups.join(",")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectorParseError, SourceSelector};

    #[test]
    fn parses_all_forms() {
        assert_eq!("all".parse(), Ok(SourceSelector::All));
        assert_eq!(" ALL ".parse(), Ok(SourceSelector::All));
        assert_eq!(
            "category:animals-and-nature".parse(),
            Ok(SourceSelector::Category("animals-and-nature".to_string()))
        );
        assert_eq!(
            "groups: face-positive, face-negative ,".parse(),
            Ok(SourceSelector::Groups(vec![
                "face-positive".to_string(),
                "face-negative".to_string()
            ]))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        let selector = SourceSelector::Groups(vec!["animal-bird".into(), "animal-mammal".into()]);
        assert_eq!(selector.to_string(), "groups:animal-bird,animal-mammal");
        assert_eq!(selector.to_string().parse(), Ok(selector));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            "emoji".parse::<SourceSelector>(),
            Err(SelectorParseError::UnknownKind(_))
        ));
        assert!(matches!(
            "flavor:sweet".parse::<SourceSelector>(),
            Err(SelectorParseError::UnknownKind(_))
        ));
        assert!(matches!(
            "category:".parse::<SourceSelector>(),
            Err(SelectorParseError::InvalidName(_))
        ));
        assert!(matches!(
            "category:../admin".parse::<SourceSelector>(),
            Err(SelectorParseError::InvalidName(_))
        ));
        assert_eq!(
            "groups: , ".parse::<SourceSelector>(),
            Err(SelectorParseError::NoGroups)
        );
    }
}

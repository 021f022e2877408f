//! Team spec formats
//!
//! A team is an ordered list of template ids, one per slot. Two text forms
//! are accepted: packed (`"charmander|squirtle|bulbasaur"`) and a JSON array.

use std::collections::HashSet;

use crate::TeamError;

/// Ordered template ids making up one player's team
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamSpec {
    ids: Vec<String>,
}

impl TeamSpec {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Parse either packed or JSON form
    pub fn parse(text: &str) -> Result<Self, TeamError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TeamError::EmptyTeam);
        }

        let ids: Vec<String> = if text.starts_with('[') {
            serde_json::from_str(text)?
        } else {
            text.split('|')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };

        if ids.is_empty() {
            return Err(TeamError::EmptyTeam);
        }
        Ok(Self { ids })
    }

    /// Export in packed form
    pub fn to_packed(&self) -> String {
        self.ids.join("|")
    }

    /// Export as a JSON array
    pub fn to_json(&self) -> Result<String, TeamError> {
        Ok(serde_json::to_string(&self.ids)?)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check team size and that no template appears twice
    pub fn validate(&self, team_size: usize) -> Result<(), TeamError> {
        if self.ids.len() != team_size {
            return Err(TeamError::WrongSize {
                expected: team_size,
                found: self.ids.len(),
            });
        }

        let mut seen = HashSet::new();
        for id in &self.ids {
            if !seen.insert(id.as_str()) {
                return Err(TeamError::DuplicateMember(id.clone()));
            }
        }
        Ok(())
    }
}

impl From<Vec<String>> for TeamSpec {
    fn from(ids: Vec<String>) -> Self {
        Self::new(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_packed() {
        let spec = TeamSpec::parse(" Charmander | squirtle|bulbasaur ").unwrap();
        assert_eq!(spec.ids(), &["charmander", "squirtle", "bulbasaur"]);
        assert_eq!(spec.to_packed(), "charmander|squirtle|bulbasaur");
    }

    #[test]
    fn test_parse_json() {
        let spec = TeamSpec::parse(r#"["onix","geodude","vulpix"]"#).unwrap();
        assert_eq!(spec.len(), 3);
        assert_eq!(TeamSpec::parse(&spec.to_json().unwrap()).unwrap(), spec);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(TeamSpec::parse(""), Err(TeamError::EmptyTeam)));
        assert!(matches!(TeamSpec::parse("||"), Err(TeamError::EmptyTeam)));
    }

    #[test]
    fn test_validate() {
        let spec = TeamSpec::parse("a|b|c").unwrap();
        assert!(spec.validate(3).is_ok());
        assert!(matches!(
            spec.validate(2),
            Err(TeamError::WrongSize { expected: 2, found: 3 })
        ));

        let dup = TeamSpec::parse("a|b|a").unwrap();
        assert!(matches!(dup.validate(3), Err(TeamError::DuplicateMember(id)) if id == "a"));
    }
}

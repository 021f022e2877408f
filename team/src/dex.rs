//! Template catalog keyed by pokemon id

use std::collections::BTreeMap;

use crate::data::PokemonData;
use crate::format::TeamSpec;
use crate::TeamError;

const STARTERS: &str = include_str!("../data/starters.json");

/// All known Pokemon templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dex {
    pokemon: BTreeMap<String, PokemonData>,
}

impl Dex {
    /// Create an empty dex
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dex from a JSON array of Pokemon records.
    ///
    /// Every record is shape-checked; a later record with the same id
    /// replaces an earlier one.
    pub fn from_json(text: &str) -> Result<Self, TeamError> {
        let records: Vec<PokemonData> = serde_json::from_str(text)?;
        let mut dex = Self::new();
        for record in records {
            dex.insert(record)?;
        }
        Ok(dex)
    }

    /// The built-in starter dex
    pub fn starters() -> Result<Self, TeamError> {
        Self::from_json(STARTERS)
    }

    /// Export as a JSON array
    pub fn to_json(&self) -> Result<String, TeamError> {
        let records: Vec<&PokemonData> = self.pokemon.values().collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Add or replace a template
    pub fn insert(&mut self, pokemon: PokemonData) -> Result<(), TeamError> {
        pokemon.validate()?;
        self.pokemon.insert(pokemon.id.clone(), pokemon);
        Ok(())
    }

    /// Look up a template by id
    pub fn get(&self, id: &str) -> Option<&PokemonData> {
        self.pokemon.get(id)
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }

    /// Iterate over ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.pokemon.keys().map(String::as_str)
    }

    /// Resolve a team spec into templates, in slot order
    pub fn resolve(&self, spec: &TeamSpec, team_size: usize) -> Result<Vec<PokemonData>, TeamError> {
        spec.validate(team_size)?;
        spec.ids()
            .iter()
            .map(|id| {
                self.get(id)
                    .cloned()
                    .ok_or_else(|| TeamError::UnknownPokemon(id.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon(id: &str, ty: &str) -> String {
        format!(
            r#"{{"id":"{id}","name":"{id}","types":["{ty}"],"max_hp":100,
                "moves":[{{"id":"tackle","name":"Tackle","type":"normal","damage":20,"target":"one_enemy"}}]}}"#
        )
    }

    fn sample_dex() -> Dex {
        let text = format!(
            "[{},{},{},{}]",
            mon("charmander", "fire"),
            mon("squirtle", "water"),
            mon("bulbasaur", "grass"),
            mon("pikachu", "electric")
        );
        Dex::from_json(&text).unwrap()
    }

    #[test]
    fn test_from_json() {
        let dex = sample_dex();
        assert_eq!(dex.len(), 4);
        assert!(dex.get("pikachu").is_some());
        assert!(dex.get("mew").is_none());
        assert_eq!(dex.ids().next(), Some("bulbasaur"));
    }

    #[test]
    fn test_from_json_rejects_invalid_record() {
        let text = r#"[{"id":"missingno","name":"?","types":[],"max_hp":1,"moves":[]}]"#;
        assert!(matches!(
            Dex::from_json(text),
            Err(TeamError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_resolve_team() {
        let dex = sample_dex();
        let spec = TeamSpec::parse("squirtle|charmander|pikachu").unwrap();
        let team = dex.resolve(&spec, 3).unwrap();
        let ids: Vec<_> = team.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["squirtle", "charmander", "pikachu"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let dex = sample_dex();
        let spec = TeamSpec::parse("squirtle|charmander|mewtwo").unwrap();
        assert!(matches!(
            dex.resolve(&spec, 3),
            Err(TeamError::UnknownPokemon(id)) if id == "mewtwo"
        ));
    }

    #[test]
    fn test_starters_load() {
        let dex = Dex::starters().unwrap();
        assert_eq!(dex.len(), 8);
        let pikachu = dex.get("pikachu").unwrap();
        assert_eq!(pikachu.find_move("quick_attack").map(|m| m.priority), Some(1));
    }

    #[test]
    fn test_json_export_roundtrip() {
        let dex = sample_dex();
        let again = Dex::from_json(&dex.to_json().unwrap()).unwrap();
        assert_eq!(dex, again);
    }
}

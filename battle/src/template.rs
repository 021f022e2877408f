//! Conversion from dex records to engine templates

use pokearena_team::{EffectData, MoveData, PokemonData};
use thiserror::Error;

use crate::types::{
    EffectKind, EffectTemplate, Energy, EnergyCost, Move, MoveClass, PokemonTemplate, TargetRule,
    Type,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("{pokemon}: unknown type {name}")]
    UnknownType { pokemon: String, name: String },

    #[error("{pokemon}/{move_id}: unknown energy {name}")]
    UnknownEnergy {
        pokemon: String,
        move_id: String,
        name: String,
    },

    #[error("{pokemon}/{move_id}: unknown target rule {name}")]
    UnknownTarget {
        pokemon: String,
        move_id: String,
        name: String,
    },

    #[error("{pokemon}/{move_id}: unknown move class {name}")]
    UnknownClass {
        pokemon: String,
        move_id: String,
        name: String,
    },

    #[error("{pokemon}/{move_id}: unknown effect {name}")]
    UnknownEffect {
        pokemon: String,
        move_id: String,
        name: String,
    },

    #[error("{pokemon}: {reason}")]
    Invalid { pokemon: String, reason: String },
}

impl TryFrom<&PokemonData> for PokemonTemplate {
    type Error = TemplateError;

    fn try_from(data: &PokemonData) -> Result<Self, Self::Error> {
        data.validate().map_err(|e| TemplateError::Invalid {
            pokemon: data.id.clone(),
            reason: e.to_string(),
        })?;

        let types = data
            .types
            .iter()
            .map(|name| {
                Type::from_protocol(name).ok_or_else(|| TemplateError::UnknownType {
                    pokemon: data.id.clone(),
                    name: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let moves = data
            .moves
            .iter()
            .map(|mv| convert_move(&data.id, mv))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PokemonTemplate {
            id: data.id.clone(),
            name: data.name.clone(),
            types,
            max_hp: data.max_hp,
            moves,
        })
    }
}

/// Convert a resolved team, keeping slot order
pub fn convert_team(team: &[PokemonData]) -> Result<Vec<PokemonTemplate>, TemplateError> {
    team.iter().map(PokemonTemplate::try_from).collect()
}

fn convert_move(pokemon: &str, data: &MoveData) -> Result<Move, TemplateError> {
    let move_type = Type::from_protocol(&data.move_type).ok_or_else(|| TemplateError::UnknownType {
        pokemon: pokemon.to_string(),
        name: data.move_type.clone(),
    })?;

    let target =
        TargetRule::from_protocol(&data.target).ok_or_else(|| TemplateError::UnknownTarget {
            pokemon: pokemon.to_string(),
            move_id: data.id.clone(),
            name: data.target.clone(),
        })?;

    let mut cost = EnergyCost::new();
    for (name, amount) in &data.cost {
        let kind = Energy::from_protocol(name).ok_or_else(|| TemplateError::UnknownEnergy {
            pokemon: pokemon.to_string(),
            move_id: data.id.clone(),
            name: name.clone(),
        })?;
        cost.add(kind, *amount);
    }

    let classes = data
        .classes
        .iter()
        .map(|name| {
            MoveClass::from_protocol(name).ok_or_else(|| TemplateError::UnknownClass {
                pokemon: pokemon.to_string(),
                move_id: data.id.clone(),
                name: name.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let effects = data
        .effects
        .iter()
        .map(|e| convert_effect(pokemon, &data.id, e))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Move {
        id: data.id.clone(),
        name: data.name.clone(),
        move_type,
        cost,
        cooldown: data.cooldown,
        damage: data.damage,
        healing: data.healing,
        effects,
        target,
        classes,
        priority: data.priority,
    })
}

fn convert_effect(
    pokemon: &str,
    move_id: &str,
    data: &EffectData,
) -> Result<EffectTemplate, TemplateError> {
    let kind = EffectKind::from_protocol(&data.kind).ok_or_else(|| TemplateError::UnknownEffect {
        pokemon: pokemon.to_string(),
        move_id: move_id.to_string(),
        name: data.kind.clone(),
    })?;
    Ok(EffectTemplate::with_value(
        kind,
        data.duration,
        data.value.unwrap_or(0),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(text: &str) -> PokemonData {
        serde_json::from_str(text).unwrap()
    }

    fn vulpix() -> PokemonData {
        data(
            r#"{
                "id": "vulpix",
                "name": "Vulpix",
                "types": ["fire"],
                "max_hp": 90,
                "moves": [
                    {
                        "id": "ember",
                        "name": "Ember",
                        "type": "fire",
                        "cost": {"fire": 1, "colorless": 1},
                        "cooldown": 1,
                        "damage": 25,
                        "effects": [{"kind": "damage_over_time", "duration": 2, "value": 5}],
                        "target": "one_enemy",
                        "classes": ["special"],
                        "priority": 1
                    },
                    {
                        "id": "safeguard",
                        "name": "Safeguard",
                        "type": "normal",
                        "effects": [{"kind": "invulnerable", "duration": 1}],
                        "target": "self"
                    }
                ]
            }"#,
        )
    }

    #[test]
    fn test_convert_pokemon() {
        let template = PokemonTemplate::try_from(&vulpix()).unwrap();
        assert_eq!(template.types, vec![Type::Fire]);
        assert_eq!(template.max_hp, 90);

        let ember = template.find_move("ember").unwrap();
        assert_eq!(ember.move_type, Type::Fire);
        assert_eq!(ember.cost.get(Energy::Typed(Type::Fire)), 1);
        assert_eq!(ember.cost.get(Energy::Colorless), 1);
        assert_eq!(ember.target, TargetRule::OneEnemy);
        assert_eq!(ember.classes, vec![MoveClass::Special]);
        assert_eq!(ember.priority, 1);
        assert_eq!(
            ember.effects,
            vec![EffectTemplate::with_value(EffectKind::DamageOverTime, 2, 5)]
        );

        let guard = template.find_move("safeguard").unwrap();
        assert_eq!(guard.target, TargetRule::SelfOnly);
        assert_eq!(guard.effects[0].value, 0);
    }

    #[test]
    fn test_unknown_vocabulary_rejected() {
        let mut bad = vulpix();
        bad.types = vec!["shadow".into()];
        assert!(matches!(
            PokemonTemplate::try_from(&bad),
            Err(TemplateError::UnknownType { name, .. }) if name == "shadow"
        ));

        let mut bad = vulpix();
        bad.moves[0].target = "random_enemy".into();
        assert!(matches!(
            PokemonTemplate::try_from(&bad),
            Err(TemplateError::UnknownTarget { .. })
        ));

        let mut bad = vulpix();
        bad.moves[0].classes = vec!["contact".into()];
        assert!(matches!(
            PokemonTemplate::try_from(&bad),
            Err(TemplateError::UnknownClass { .. })
        ));

        let mut bad = vulpix();
        bad.moves[0].effects[0].kind = "confusion".into();
        assert!(matches!(
            PokemonTemplate::try_from(&bad),
            Err(TemplateError::UnknownEffect { .. })
        ));

        let mut bad = vulpix();
        bad.moves[0].cost.insert("plasma".into(), 1);
        assert!(matches!(
            PokemonTemplate::try_from(&bad),
            Err(TemplateError::UnknownEnergy { .. })
        ));
    }

    #[test]
    fn test_shape_errors_surface() {
        let mut bad = vulpix();
        bad.moves.clear();
        assert!(matches!(
            PokemonTemplate::try_from(&bad),
            Err(TemplateError::Invalid { .. })
        ));
    }

    #[test]
    fn test_convert_team_keeps_order() {
        let mut second = vulpix();
        second.id = "ninetales".into();
        let team = convert_team(&[vulpix(), second]).unwrap();
        let ids: Vec<_> = team.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["vulpix", "ninetales"]);
    }

    #[test]
    fn test_every_starter_converts() {
        let dex = pokearena_team::Dex::starters().unwrap();
        for id in dex.ids() {
            let data = dex.get(id).unwrap();
            let template = PokemonTemplate::try_from(data).unwrap();
            assert_eq!(template.moves.len(), data.moves.len(), "{id}");
        }
    }
}

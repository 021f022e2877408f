//! Pokemon templates and their live battle state

use std::collections::{BTreeMap, BTreeSet};

use super::effect::{Effect, EffectKind};
use super::moves::Move;
use super::pokemon_type::Type;

/// Immutable Pokemon definition a fighter is built from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PokemonTemplate {
    pub id: String,
    pub name: String,
    /// One or two types
    pub types: Vec<Type>,
    pub max_hp: u32,
    pub moves: Vec<Move>,
}

impl PokemonTemplate {
    pub fn new(id: impl Into<String>, types: Vec<Type>, max_hp: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            types,
            max_hp,
            moves: Vec::new(),
        }
    }

    pub fn with_move(mut self, mv: Move) -> Self {
        self.moves.push(mv);
        self
    }

    pub fn find_move(&self, move_id: &str) -> Option<&Move> {
        self.moves.iter().find(|m| m.id == move_id)
    }
}

/// One Pokemon's battle-local state
///
/// Created fresh for every battle. A fainted fighter stays in its roster
/// slot so it can still be addressed (and excluded from targeting).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fighter {
    // === Identity ===
    /// Roster slot (0-based)
    pub slot: usize,
    pub template_id: String,
    pub name: String,
    pub types: Vec<Type>,
    pub moves: Vec<Move>,

    // === HP ===
    pub current_hp: u32,
    pub max_hp: u32,

    /// Faint has been recorded in the log
    pub fainted: bool,

    // === Timed state ===
    pub effects: Vec<Effect>,

    /// Turns remaining per move id
    pub cooldowns: BTreeMap<String, u32>,

    /// Cooldowns started this turn
    #[cfg_attr(feature = "serde", serde(default))]
    pub(crate) fresh_cooldowns: BTreeSet<String>,
}

impl Fighter {
    /// Build a full-HP fighter for `slot` from a template
    pub fn from_template(slot: usize, template: &PokemonTemplate) -> Self {
        Self {
            slot,
            template_id: template.id.clone(),
            name: template.name.clone(),
            types: template.types.clone(),
            moves: template.moves.clone(),
            current_hp: template.max_hp,
            max_hp: template.max_hp,
            fainted: false,
            effects: Vec::new(),
            cooldowns: BTreeMap::new(),
            fresh_cooldowns: BTreeSet::new(),
        }
    }

    /// Alive means HP above zero
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Get HP as percentage (0-100)
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp == 0 {
            return 0;
        }
        self.current_hp * 100 / self.max_hp
    }

    pub fn find_move(&self, move_id: &str) -> Option<&Move> {
        self.moves.iter().find(|m| m.id == move_id)
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.types.contains(&t)
    }

    /// Check for an effect kind
    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn effect(&self, kind: EffectKind) -> Option<&Effect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Lose up to `amount` HP. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Regain up to `amount` HP, never above max. Returns the HP actually
    /// regained. Fainted fighters cannot be healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let gained = amount.min(self.max_hp - self.current_hp);
        self.current_hp += gained;
        gained
    }

    /// Record the faint. Clears timed state; returns false if it was
    /// already recorded.
    pub fn mark_fainted(&mut self) -> bool {
        if self.fainted {
            return false;
        }
        self.fainted = true;
        self.effects.clear();
        self.cooldowns.clear();
        self.fresh_cooldowns.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EffectTemplate, TargetRule};

    fn onix() -> PokemonTemplate {
        PokemonTemplate::new("onix", vec![Type::Rock, Type::Ground], 100)
            .with_move(Move::new("rock_throw", Type::Rock, TargetRule::OneEnemy).with_damage(30))
    }

    #[test]
    fn test_from_template() {
        let f = Fighter::from_template(2, &onix());
        assert_eq!(f.slot, 2);
        assert_eq!(f.current_hp, 100);
        assert!(f.is_alive());
        assert!(f.has_type(Type::Ground));
        assert!(f.find_move("rock_throw").is_some());
        assert!(f.find_move("tackle").is_none());
    }

    #[test]
    fn test_hp_is_clamped() {
        let mut f = Fighter::from_template(0, &onix());
        assert_eq!(f.take_damage(30), 30);
        assert_eq!(f.heal(50), 30);
        assert_eq!(f.current_hp, 100);
        assert_eq!(f.take_damage(250), 100);
        assert_eq!(f.current_hp, 0);
        assert!(!f.is_alive());
        assert_eq!(f.heal(10), 0);
    }

    #[test]
    fn test_mark_fainted_once() {
        let mut f = Fighter::from_template(0, &onix());
        f.effects.push(Effect::from_template(&EffectTemplate::new(EffectKind::Stun, 1)));
        f.cooldowns.insert("rock_throw".into(), 2);
        f.take_damage(100);

        assert!(f.mark_fainted());
        assert!(f.effects.is_empty());
        assert!(f.cooldowns.is_empty());
        assert!(!f.mark_fainted());
    }

    #[test]
    fn test_hp_percent() {
        let mut f = Fighter::from_template(0, &onix());
        f.take_damage(25);
        assert_eq!(f.hp_percent(), 75);
    }
}

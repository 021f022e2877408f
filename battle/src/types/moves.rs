//! Move definitions: targeting rules, classes and the move template

use super::effect::EffectTemplate;
use super::energy::EnergyCost;
use super::pokemon_type::Type;

/// Who a move may be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetRule {
    /// The actor only
    SelfOnly,
    OneEnemy,
    AllEnemies,
    /// One living fighter of the actor's team (the actor included)
    OneAlly,
    AllAllies,
    /// Every living fighter on both teams
    Everyone,
}

impl TargetRule {
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "self" | "self_only" | "user" => Some(TargetRule::SelfOnly),
            "one_enemy" | "enemy" | "single_enemy" => Some(TargetRule::OneEnemy),
            "all_enemies" | "enemies" => Some(TargetRule::AllEnemies),
            "one_ally" | "ally" | "single_ally" => Some(TargetRule::OneAlly),
            "all_allies" | "allies" | "team" => Some(TargetRule::AllAllies),
            "everyone" | "all" => Some(TargetRule::Everyone),
            _ => None,
        }
    }

    pub fn as_id(&self) -> &'static str {
        match self {
            TargetRule::SelfOnly => "self",
            TargetRule::OneEnemy => "one_enemy",
            TargetRule::AllEnemies => "all_enemies",
            TargetRule::OneAlly => "one_ally",
            TargetRule::AllAllies => "all_allies",
            TargetRule::Everyone => "everyone",
        }
    }

    /// Targets are resolved by the engine, whatever was declared
    pub fn is_area(&self) -> bool {
        matches!(
            self,
            TargetRule::AllEnemies | TargetRule::AllAllies | TargetRule::Everyone
        )
    }

    /// Whether the rule can reach the opposing team
    pub fn is_offensive(&self) -> bool {
        matches!(
            self,
            TargetRule::OneEnemy | TargetRule::AllEnemies | TargetRule::Everyone
        )
    }
}

/// Interaction tag on a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MoveClass {
    /// Blocked by snare
    Physical,
    /// Blocked by silence
    Special,
    /// Ignores invulnerability
    Piercing,
    /// Ignores damage reduction
    Affliction,
}

impl MoveClass {
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "physical" => Some(MoveClass::Physical),
            "special" | "energy" => Some(MoveClass::Special),
            "piercing" => Some(MoveClass::Piercing),
            "affliction" => Some(MoveClass::Affliction),
            _ => None,
        }
    }

    pub fn as_id(&self) -> &'static str {
        match self {
            MoveClass::Physical => "physical",
            MoveClass::Special => "special",
            MoveClass::Piercing => "piercing",
            MoveClass::Affliction => "affliction",
        }
    }
}

/// Static move template. Never mutated during a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub id: String,
    pub name: String,
    pub move_type: Type,
    pub cost: EnergyCost,
    /// Turns the move stays locked after use
    pub cooldown: u32,
    pub damage: u32,
    pub healing: u32,
    pub effects: Vec<EffectTemplate>,
    pub target: TargetRule,
    pub classes: Vec<MoveClass>,
    /// Higher goes first
    pub priority: i8,
}

impl Move {
    /// A free, cooldown-less move with no damage, healing or effects
    pub fn new(id: impl Into<String>, move_type: Type, target: TargetRule) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            move_type,
            cost: EnergyCost::new(),
            cooldown: 0,
            damage: 0,
            healing: 0,
            effects: Vec::new(),
            target,
            classes: Vec::new(),
            priority: 0,
        }
    }

    pub fn has_class(&self, class: MoveClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn is_piercing(&self) -> bool {
        self.has_class(MoveClass::Piercing)
    }

    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_healing(mut self, healing: u32) -> Self {
        self.healing = healing;
        self
    }

    pub fn with_cost(mut self, cost: EnergyCost) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_class(mut self, class: MoveClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }
}

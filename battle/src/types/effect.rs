//! Timed effects on fighters

/// Every effect kind the engine knows.
///
/// Kinds that carry a magnitude read it from [`Effect::value`]; the rest
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectKind {
    /// Cannot act at all
    Stun,
    /// Hostile non-piercing moves are blocked
    Invulnerable,
    /// Cannot use special moves
    Silence,
    /// Cannot use physical moves
    Snare,
    /// Loses `value` HP at end of turn
    DamageOverTime,
    /// Regains `value` HP at end of turn
    HealOverTime,
    /// Regains `value` HP at start of turn
    Regeneration,
    /// Outgoing move damage changes by `value` (may be negative)
    DamageBoost,
    /// Incoming move damage is reduced by `value`
    DamageReduction,
}

impl EffectKind {
    pub const ALL: [EffectKind; 9] = [
        EffectKind::Stun,
        EffectKind::Invulnerable,
        EffectKind::Silence,
        EffectKind::Snare,
        EffectKind::DamageOverTime,
        EffectKind::HealOverTime,
        EffectKind::Regeneration,
        EffectKind::DamageBoost,
        EffectKind::DamageReduction,
    ];

    /// Parse a data-file name. A few older spellings are accepted.
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "stun" => Some(EffectKind::Stun),
            "invulnerable" | "invulnerability" => Some(EffectKind::Invulnerable),
            "silence" => Some(EffectKind::Silence),
            "snare" => Some(EffectKind::Snare),
            "damage_over_time" | "dot" | "poison" | "burn" => Some(EffectKind::DamageOverTime),
            "heal_over_time" | "hot" => Some(EffectKind::HealOverTime),
            "regeneration" | "regen" => Some(EffectKind::Regeneration),
            "damage_boost" | "boost" => Some(EffectKind::DamageBoost),
            "damage_reduction" | "reduction" | "shield" => Some(EffectKind::DamageReduction),
            _ => None,
        }
    }

    pub fn as_id(&self) -> &'static str {
        match self {
            EffectKind::Stun => "stun",
            EffectKind::Invulnerable => "invulnerable",
            EffectKind::Silence => "silence",
            EffectKind::Snare => "snare",
            EffectKind::DamageOverTime => "damage_over_time",
            EffectKind::HealOverTime => "heal_over_time",
            EffectKind::Regeneration => "regeneration",
            EffectKind::DamageBoost => "damage_boost",
            EffectKind::DamageReduction => "damage_reduction",
        }
    }

    /// Whether this kind reads a magnitude
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            EffectKind::DamageOverTime
                | EffectKind::HealOverTime
                | EffectKind::Regeneration
                | EffectKind::DamageBoost
                | EffectKind::DamageReduction
        )
    }

    /// Re-applying adds to the existing instance instead of replacing it
    pub fn is_additive(&self) -> bool {
        matches!(self, EffectKind::DamageOverTime)
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_id())
    }
}

/// An effect a move applies to each target it hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub kind: EffectKind,
    pub duration: u32,
    pub value: i32,
}

impl EffectTemplate {
    pub fn new(kind: EffectKind, duration: u32) -> Self {
        Self {
            kind,
            duration,
            value: 0,
        }
    }

    pub fn with_value(kind: EffectKind, duration: u32, value: i32) -> Self {
        Self {
            kind,
            duration,
            value,
        }
    }
}

/// A live effect instance on a fighter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    /// End-of-turn sweeps remaining
    pub duration: u32,
    pub value: i32,
    /// Applied this turn; skipped by this turn's end-of-turn sweep
    #[cfg_attr(feature = "serde", serde(default))]
    pub fresh: bool,
    /// Part of `value` stacked onto a running instance this turn. It does not
    /// trigger until the next sweep.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fresh_value: i32,
}

impl Effect {
    pub fn from_template(template: &EffectTemplate) -> Self {
        Self {
            kind: template.kind,
            duration: template.duration,
            value: template.value,
            fresh: true,
            fresh_value: 0,
        }
    }

    /// Magnitude, if this kind uses one
    pub fn magnitude(&self) -> Option<i32> {
        self.kind.has_value().then_some(self.value)
    }
}

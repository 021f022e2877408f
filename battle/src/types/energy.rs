//! Energy kinds, per-player pools and move costs

use std::collections::BTreeMap;

use super::pokemon_type::Type;

/// One unit kind of energy: an elemental type or the colorless wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub enum Energy {
    Typed(Type),
    Colorless,
}

impl Energy {
    /// Parse an energy name ("fire", "colorless", ...). "random" and
    /// "wildcard" are accepted as older names for colorless.
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "colorless" | "random" | "wildcard" => Some(Energy::Colorless),
            other => Type::from_protocol(other).map(Energy::Typed),
        }
    }

    /// Lowercase id used on the wire
    pub fn as_id(&self) -> &'static str {
        match self {
            Energy::Typed(ty) => ty.as_id(),
            Energy::Colorless => "colorless",
        }
    }

    pub fn is_colorless(&self) -> bool {
        matches!(self, Energy::Colorless)
    }
}

impl From<Type> for Energy {
    fn from(ty: Type) -> Self {
        Energy::Typed(ty)
    }
}

impl From<Energy> for String {
    fn from(energy: Energy) -> Self {
        energy.as_id().to_string()
    }
}

impl TryFrom<String> for Energy {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Energy::from_protocol(&s).ok_or_else(|| format!("unknown energy: {s}"))
    }
}

impl std::fmt::Display for Energy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_id())
    }
}

/// Counts of energy by kind. Zero counts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyPool {
    counts: BTreeMap<Energy, u32>,
}

/// Energy a move requires. Same shape as a pool.
pub type EnergyCost = EnergyPool;

impl EnergyPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (kind, amount) pairs, summing repeats
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Energy, u32)>) -> Self {
        let mut pool = Self::new();
        for (kind, amount) in pairs {
            pool.add(kind, amount);
        }
        pool
    }

    pub fn get(&self, kind: Energy) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn add(&mut self, kind: Energy, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.counts.entry(kind).or_insert(0) += amount;
    }

    /// Add every count of another pool
    pub fn merge(&mut self, other: &EnergyPool) {
        for (kind, amount) in other.iter() {
            self.add(kind, amount);
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Energy, u32)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Work out exactly which units would pay `cost`.
    ///
    /// Typed requirements draw on matching typed energy first and fall back
    /// to colorless for the shortfall. Colorless requirements take colorless
    /// only. Returns `None` when the pool cannot cover the cost.
    pub fn payment_for(&self, cost: &EnergyCost) -> Option<EnergyPool> {
        let mut payment = EnergyPool::new();
        let mut colorless_needed = cost.get(Energy::Colorless);

        for (kind, required) in cost.iter() {
            if kind.is_colorless() {
                continue;
            }
            let typed = self.get(kind).min(required);
            payment.add(kind, typed);
            colorless_needed += required - typed;
        }

        if self.get(Energy::Colorless) < colorless_needed {
            return None;
        }
        payment.add(Energy::Colorless, colorless_needed);
        Some(payment)
    }

    pub fn can_afford(&self, cost: &EnergyCost) -> bool {
        self.payment_for(cost).is_some()
    }

    /// Pay `cost`, returning the units actually spent. The pool is left
    /// untouched when it cannot cover the cost.
    pub fn spend(&mut self, cost: &EnergyCost) -> Option<EnergyPool> {
        let payment = self.payment_for(cost)?;
        for (kind, amount) in payment.iter() {
            if let Some(count) = self.counts.get_mut(&kind) {
                *count -= amount;
                if *count == 0 {
                    self.counts.remove(&kind);
                }
            }
        }
        Some(payment)
    }

    /// Wire form keyed by energy id
    pub fn to_id_map(&self) -> BTreeMap<String, u32> {
        self.iter()
            .map(|(kind, amount)| (kind.as_id().to_string(), amount))
            .collect()
    }
}

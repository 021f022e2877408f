//! Player (one side of a battle)

use pokearena_protocol::Side;

use super::energy::EnergyPool;
use super::pokemon::{Fighter, PokemonTemplate};

/// One player's side: roster and energy pool
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    /// External player id
    pub id: String,
    pub side: Side,

    /// Fighters in slot order
    pub fighters: Vec<Fighter>,

    pub energy: EnergyPool,
}

impl Player {
    /// Create a player with fresh fighters built from `team`
    pub fn new(id: impl Into<String>, side: Side, team: &[PokemonTemplate]) -> Self {
        Self {
            id: id.into(),
            side,
            fighters: team
                .iter()
                .enumerate()
                .map(|(slot, template)| Fighter::from_template(slot, template))
                .collect(),
            energy: EnergyPool::new(),
        }
    }

    /// Get a fighter by slot
    pub fn fighter(&self, slot: usize) -> Option<&Fighter> {
        self.fighters.get(slot)
    }

    /// Get a fighter by slot mutably
    pub fn fighter_mut(&mut self, slot: usize) -> Option<&mut Fighter> {
        self.fighters.get_mut(slot)
    }

    /// Find a fighter's slot by template id
    pub fn find_fighter(&self, template_id: &str) -> Option<usize> {
        self.fighters.iter().position(|f| f.template_id == template_id)
    }

    /// Iterate over living fighters
    pub fn alive_fighters(&self) -> impl Iterator<Item = &Fighter> {
        self.fighters.iter().filter(|f| f.is_alive())
    }

    /// Slots of living fighters, ascending
    pub fn alive_slots(&self) -> Vec<usize> {
        self.alive_fighters().map(|f| f.slot).collect()
    }

    /// Count non-fainted fighters
    pub fn alive_count(&self) -> usize {
        self.alive_fighters().count()
    }

    /// Count fighters whose faint is recorded
    pub fn fainted_count(&self) -> usize {
        self.fighters.iter().filter(|f| f.fainted).count()
    }

    /// The whole team is down
    pub fn all_fainted(&self) -> bool {
        self.fighters.iter().all(|f| !f.is_alive())
    }
}

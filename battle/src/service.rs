//! Command dispatch: wire commands in, wire responses out

use pokearena_protocol::{
    parse_client_command, ActionRequest, ClientCommand, PlayerEntry, ServerResponse,
};
use pokearena_team::{Dex, TeamError, TeamSpec};

use crate::engine::resolver::ActionIntent;
use crate::error::ManagerError;
use crate::manager::BattleManager;
use crate::session::PlayerSetup;
use crate::state::BattleId;
use crate::template::convert_team;

/// Sent when a response cannot be encoded
const ENCODE_FAILURE: &str = r#"{"success":false,"message":"response could not be encoded"}"#;

/// Front door for callers speaking the JSON command protocol.
///
/// Resolves team ids against a [`Dex`], forwards to the [`BattleManager`]
/// and answers every command with a [`ServerResponse`]. Rejections carry a
/// message and leave the battle untouched.
pub struct BattleService {
    manager: BattleManager,
    dex: Dex,
}

impl BattleService {
    pub fn new(manager: BattleManager, dex: Dex) -> Self {
        Self { manager, dex }
    }

    /// Service over the built-in starter dex
    pub fn with_starters(manager: BattleManager) -> Result<Self, TeamError> {
        Ok(Self::new(manager, Dex::starters()?))
    }

    pub fn manager(&self) -> &BattleManager {
        &self.manager
    }

    pub fn dex(&self) -> &Dex {
        &self.dex
    }

    /// Handle a JSON command and encode the reply
    pub fn handle_json(&self, text: &str) -> String {
        let response = match parse_client_command(text) {
            Ok(command) => self.handle(command),
            Err(e) => {
                tracing::debug!(error = %e, "Unparseable command");
                ServerResponse::rejected(format!("{e:#}"))
            }
        };
        response.to_wire_format().unwrap_or_else(|e| {
            tracing::warn!(error = %e, message = %response.message, "Failed to encode response");
            ENCODE_FAILURE.to_string()
        })
    }

    pub fn handle(&self, command: ClientCommand) -> ServerResponse {
        match self.dispatch(command) {
            Ok(response) => response,
            Err(e) => ServerResponse::rejected(e.to_string()),
        }
    }

    fn dispatch(&self, command: ClientCommand) -> Result<ServerResponse, ManagerError> {
        match command {
            ClientCommand::CreateBattle {
                player1,
                player2,
                seed,
            } => {
                let p1 = self.setup(player1)?;
                let p2 = self.setup(player2)?;
                let id = self
                    .manager
                    .create_battle(p1, p2, seed.unwrap_or_else(rand::random))?;
                Ok(ServerResponse::ok(
                    format!("battle {id} created"),
                    self.manager.get_battle(id),
                ))
            }
            ClientCommand::SubmitAction {
                battle_id,
                player_id,
                actions,
            } => {
                let id = BattleId(battle_id);
                let intents = self.intents(id, &player_id, &actions)?;
                let receipt = self.manager.submit_action(id, &player_id, intents)?;
                let message = if receipt.resolved {
                    "turn resolved"
                } else {
                    "waiting for opponent"
                };
                Ok(ServerResponse::ok(message, Some(receipt.snapshot(self.tail()))))
            }
            ClientCommand::SkipTurn {
                battle_id,
                player_id,
            } => {
                let id = BattleId(battle_id);
                let receipt = self.manager.skip_turn(id, &player_id)?;
                let message = if receipt.resolved {
                    "turn resolved"
                } else {
                    "turn skipped"
                };
                Ok(ServerResponse::ok(message, Some(receipt.snapshot(self.tail()))))
            }
            ClientCommand::Surrender {
                battle_id,
                player_id,
            } => {
                let id = BattleId(battle_id);
                // a finished battle has nothing pending
                let state = self.manager.surrender(id, &player_id)?;
                Ok(ServerResponse::ok(
                    format!("{player_id} surrendered"),
                    Some(state.to_snapshot([false; 2], self.tail())),
                ))
            }
            ClientCommand::GetState { battle_id } => {
                let id = BattleId(battle_id);
                let snapshot = self
                    .manager
                    .get_battle(id)
                    .ok_or(ManagerError::BattleNotFound(id))?;
                Ok(ServerResponse::ok("ok", Some(snapshot)))
            }
        }
    }

    fn tail(&self) -> usize {
        self.manager.config().max_log_tail
    }

    fn setup(&self, entry: PlayerEntry) -> Result<PlayerSetup, ManagerError> {
        let spec = TeamSpec::new(entry.team);
        let data = self
            .dex
            .resolve(&spec, self.manager.config().team_size)
            .map_err(|e| ManagerError::InvalidTeam(e.to_string()))?;
        let team = convert_team(&data).map_err(|e| ManagerError::InvalidTeam(e.to_string()))?;
        Ok(PlayerSetup::new(entry.player_id, team))
    }

    /// Map wire requests to intents. A request naming its actor by template
    /// id is looked up on the player's own team.
    fn intents(
        &self,
        id: BattleId,
        player_id: &str,
        actions: &[ActionRequest],
    ) -> Result<Vec<ActionIntent>, ManagerError> {
        let state = self
            .manager
            .get_state(id)
            .ok_or(ManagerError::BattleNotFound(id))?;
        let side = state
            .side_of(player_id)
            .ok_or_else(|| ManagerError::NotAParticipant {
                battle: id,
                player_id: player_id.to_string(),
            })?;
        let player = state.player(side);

        actions
            .iter()
            .map(|request| {
                let slot = match (request.slot, &request.pokemon_id) {
                    (Some(slot), _) => slot,
                    (None, Some(pokemon)) => player
                        .find_fighter(pokemon)
                        .ok_or_else(|| ManagerError::UnknownFighter(pokemon.clone()))?,
                    (None, None) => {
                        return Err(ManagerError::UnknownFighter("<unnamed>".to_string()));
                    }
                };
                Ok(ActionIntent::new(
                    slot,
                    request.move_id.clone(),
                    request.target_ids.clone(),
                ))
            })
            .collect()
    }
}

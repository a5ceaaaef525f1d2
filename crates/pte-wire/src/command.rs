use pte_core::{Chips, PlayerId, SeatIndex};
use pte_table::ActionKind;
use serde::Deserialize;

/// The client→engine wire contract. `LIST_TABLES`, `CREATE_TABLE`,
/// `ATTACH`, `REATTACH` and `POST_BLIND` are accepted so the JSON schema
/// is complete, but they carry no reducer translation here — directory
/// and session concerns are a collaborator's, not this crate's.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientCommand {
    ListTables,
    CreateTable {
        name: String,
    },
    Attach {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Reattach {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    JoinTable {
        #[serde(rename = "tableId")]
        table_id: String,
    },
    Sit {
        #[serde(rename = "tableId")]
        table_id: String,
        seat: SeatIndex,
        #[serde(rename = "buyIn")]
        buy_in: Chips,
        #[serde(rename = "playerId")]
        player_id: Option<String>,
    },
    Leave,
    SitOut,
    SitIn,
    Action {
        action: String,
        amount: Option<Chips>,
        #[serde(rename = "playerId")]
        player_id: Option<String>,
    },
    Rebuy {
        amount: Chips,
    },
    PostBlind {
        #[serde(rename = "blindType")]
        blind_type: String,
    },
}

/// Every command arrives wrapped in an envelope carrying the client's
/// opaque correlation id: `{ "cmdId": "...", "type": "...", ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandEnvelope {
    #[serde(rename = "cmdId")]
    pub cmd_id: String,
    #[serde(flatten)]
    pub command: ClientCommand,
}

impl CommandEnvelope {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Parses the `ACTION` command's `action` field into the domain
/// [`ActionKind`] it names, by way of [`ActionKind`]'s own
/// `TryFrom<&str>`, over the wire's `action` field (`FOLD`, `CHECK`, `CALL`, `BET`, `RAISE`, `ALLIN`).
pub fn parse_action_kind(s: &str) -> Result<ActionKind, String> {
    ActionKind::try_from(s)
}

/// `playerId` strings arrive optional on some commands (multi-seat
/// sessions, spectator attach) but the engine always needs a concrete
/// [`PlayerId`] to build an [`pte_table::Event`]; callers resolve the
/// ambiguity (session-bound player vs explicit override) before this
/// point and just hand the chosen string in here.
pub fn resolve_player_id(explicit: Option<String>, session_player: &PlayerId) -> PlayerId {
    match explicit {
        Some(id) => PlayerId::from(id),
        None => session_player.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sit_command_parses_its_envelope() {
        let json = r#"{
            "cmdId": "abc-1",
            "type": "SIT",
            "tableId": "t1",
            "seat": 3,
            "buyIn": 500,
            "playerId": "p1"
        }"#;
        let envelope = CommandEnvelope::from_json(json).unwrap();
        assert_eq!(envelope.cmd_id, "abc-1");
        match envelope.command {
            ClientCommand::Sit {
                table_id,
                seat,
                buy_in,
                player_id,
            } => {
                assert_eq!(table_id, "t1");
                assert_eq!(seat, 3);
                assert_eq!(buy_in, 500);
                assert_eq!(player_id.as_deref(), Some("p1"));
            }
            other => panic!("expected Sit, got {other:?}"),
        }
    }

    #[test]
    fn action_command_carries_an_optional_amount() {
        let json = r#"{"cmdId":"c2","type":"ACTION","action":"RAISE","amount":40}"#;
        let envelope = CommandEnvelope::from_json(json).unwrap();
        match envelope.command {
            ClientCommand::Action { action, amount, .. } => {
                assert_eq!(action, "RAISE");
                assert_eq!(amount, Some(40));
            }
            other => panic!("expected Action, got {other:?}"),
        }
    }

    #[test]
    fn out_of_scope_commands_still_parse() {
        let json = r#"{"cmdId":"c3","type":"LIST_TABLES"}"#;
        let envelope = CommandEnvelope::from_json(json).unwrap();
        assert!(matches!(envelope.command, ClientCommand::ListTables));
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        let json = r#"{"cmdId":"c4","type":"TELEPORT"}"#;
        assert!(CommandEnvelope::from_json(json).is_err());
    }

    #[test]
    fn resolve_player_id_prefers_an_explicit_override() {
        let session = PlayerId::new("session-player");
        assert_eq!(
            resolve_player_id(Some("override".into()), &session),
            PlayerId::new("override")
        );
        assert_eq!(resolve_player_id(None, &session), session);
    }
}

use crate::error::ErrorCode;
use pte_core::{Chips, PlayerId, SeatIndex};
use serde::Serialize;

/// Server→client wire events, the mirror of [`crate::command::ClientCommand`].
/// Tagged the same externally-tagged way as the client commands: an
/// external `type` discriminant, fields in `camelCase`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    /// Connection/session confirmation; out-of-scope transport produces
    /// the session, this crate only shapes the payload.
    Session {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "playerId")]
        player_id: String,
    },
    TableSnapshot {
        #[serde(rename = "tableId")]
        table_id: String,
        snapshot: serde_json::Value,
    },
    TableList {
        tables: Vec<String>,
    },
    TableCreated {
        #[serde(rename = "tableId")]
        table_id: String,
    },
    PlayerJoined {
        seat: SeatIndex,
        #[serde(rename = "playerId")]
        player_id: String,
    },
    PlayerLeft {
        seat: SeatIndex,
    },
    PlayerDisconnected {
        seat: SeatIndex,
    },
    PlayerRejoined {
        seat: SeatIndex,
    },
    PlayerWaiting {
        seat: SeatIndex,
    },
    WaitingForNextHand,
    PlayerSatOut {
        seat: SeatIndex,
    },
    PlayerSatIn {
        seat: SeatIndex,
    },
    HandStart {
        hand: u64,
        dealer: SeatIndex,
        stacks: Vec<Chips>,
    },
    HandEnd {
        hand: u64,
        winners: Vec<WinnerShare>,
    },
    BlindsPosted {
        #[serde(rename = "smallBlindSeat")]
        small_blind_seat: SeatIndex,
        #[serde(rename = "bigBlindSeat")]
        big_blind_seat: SeatIndex,
    },
    DealFlop {
        codes: [u8; 3],
    },
    DealTurn {
        code: u8,
    },
    DealRiver {
        code: u8,
    },
    ActionPrompt {
        #[serde(rename = "actingIndex")]
        acting_index: SeatIndex,
        #[serde(rename = "betToCall")]
        bet_to_call: Chips,
        #[serde(rename = "minRaise")]
        min_raise: Chips,
        #[serde(rename = "timeLeftMs")]
        time_left_ms: u64,
    },
    PlayerActionApplied {
        seat: SeatIndex,
        action: String,
        amount: Option<Chips>,
    },
    RoundEnd {
        street: String,
    },
    Showdown {
        #[serde(rename = "revealOrder")]
        reveal_order: Vec<SeatIndex>,
    },
    WinnerAnnouncement {
        winners: Vec<WinnerShare>,
        #[serde(rename = "potAmount")]
        pot_amount: Chips,
    },
    DealerMessage {
        text: String,
    },
    TableReset,
    CountdownStart {
        #[serde(rename = "countdownType")]
        countdown_type: String,
        #[serde(rename = "startTime")]
        start_time: u64,
        duration: u64,
        metadata: Option<String>,
    },
    Error {
        code: ErrorCode,
        msg: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct WinnerShare {
    pub seat: SeatIndex,
    pub amount: Chips,
}

impl ServerEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server event")
    }

    pub fn error(code: ErrorCode, msg: impl Into<String>) -> Self {
        ServerEvent::Error {
            code,
            msg: msg.into(),
        }
    }

    pub fn player_joined(seat: SeatIndex, player: &PlayerId) -> Self {
        ServerEvent::PlayerJoined {
            seat,
            player_id: player.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_prompt_serializes_with_camel_case_fields() {
        let event = ServerEvent::ActionPrompt {
            acting_index: 2,
            bet_to_call: 40,
            min_raise: 80,
            time_left_ms: 15_000,
        };
        let json = event.to_json();
        assert!(json.contains("\"type\":\"ACTION_PROMPT\""));
        assert!(json.contains("\"actingIndex\":2"));
        assert!(json.contains("\"betToCall\":40"));
        assert!(json.contains("\"minRaise\":80"));
        assert!(json.contains("\"timeLeftMs\":15000"));
    }

    #[test]
    fn error_helper_builds_a_tagged_error_event() {
        let json = ServerEvent::error(ErrorCode::ActionFailed, "nope").to_json();
        assert!(json.contains("\"code\":\"ACTION_FAILED\""));
        assert!(json.contains("\"msg\":\"nope\""));
    }

    #[test]
    fn player_joined_helper_stringifies_the_player_id() {
        let event = ServerEvent::player_joined(4, &PlayerId::new("p9"));
        let json = event.to_json();
        assert!(json.contains("\"seat\":4"));
        assert!(json.contains("\"playerId\":\"p9\""));
    }
}

use crate::table::Street;
use pte_cards::Card;
use pte_core::{Chips, PlayerId, SeatIndex};
use std::time::Duration;

/// A betting decision. `Bet` and `Raise` are kept as distinct variants
/// rather than folded into one `Raise(Chips)` — the short-all-in
/// reopening rule depends on telling a fresh opening bet apart from a
/// raise over an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ActionKind::Fold => "FOLD",
                ActionKind::Check => "CHECK",
                ActionKind::Call => "CALL",
                ActionKind::Bet => "BET",
                ActionKind::Raise => "RAISE",
                ActionKind::AllIn => "ALLIN",
            }
        )
    }
}

/// Parses the wire spelling back into an [`ActionKind`], the inverse
/// of `Display`. Case-insensitive since `pte-wire` is the only caller and
/// clients are not guaranteed to send the exact casing back.
impl TryFrom<&str> for ActionKind {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_uppercase().as_str() {
            "FOLD" => Ok(ActionKind::Fold),
            "CHECK" => Ok(ActionKind::Check),
            "CALL" => Ok(ActionKind::Call),
            "BET" => Ok(ActionKind::Bet),
            "RAISE" => Ok(ActionKind::Raise),
            "ALLIN" => Ok(ActionKind::AllIn),
            _ => Err(format!("unrecognized action: {s}")),
        }
    }
}

/// A single winner distribution, folded into a `Payout` event by the
/// event loop after `EVALUATE_HANDS`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distribution {
    pub seat: SeatIndex,
    pub amount: Chips,
    pub pot_index: usize,
}

/// The immutable event sum. Events are appended to the per-table log
/// as they are processed; replaying the log from an empty `Table`
/// reproduces the final state bit-for-bit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    StartHand {
        timestamp: u64,
        /// Random suffix folded into the deck seed, generated by the
        /// caller so the reducer itself stays a pure function of its
        /// event — the randomness lives in the log, not in the reducer.
        random_suffix: String,
    },
    PostBlinds,
    DealHole,
    EnterStreet {
        street: Street,
        /// Pre-determined cards, used only for deterministic replay/tests;
        /// `None` means "deal fresh from the deck".
        cards: Option<Vec<Card>>,
        is_auto_dealt: bool,
    },
    Action {
        seat: SeatIndex,
        kind: ActionKind,
        amount: Option<Chips>,
    },
    TimeoutAutoFold {
        seat: SeatIndex,
    },
    CloseStreet,
    Showdown,
    Payout {
        distributions: Vec<Distribution>,
    },
    HandEnd,
    PlayerJoin {
        seat: SeatIndex,
        player: PlayerId,
        chips: Chips,
        nickname: Option<String>,
    },
    PlayerLeave {
        player: PlayerId,
    },
    PlayerSitOut {
        player: PlayerId,
        reason: SitOutReason,
        timestamp: u64,
    },
    PlayerSitIn {
        player: PlayerId,
    },
}

/// Why a player is sitting out, carried on the event so the
/// controller doesn't need to infer it after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SitOutReason {
    Voluntary,
    Timeout,
}

/// A countdown's purpose; only `action` drives real state — the
/// rest are client-rendered decorations the server merely timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CountdownKind {
    GameStart,
    Action,
    StreetDeal,
    NewHand,
    Reconnect,
}

impl CountdownKind {
    /// Display priority when several countdowns are live at once:
    /// lower number displays first.
    pub fn priority(&self) -> u8 {
        match self {
            CountdownKind::Action => 0,
            CountdownKind::Reconnect => 1,
            CountdownKind::GameStart => 2,
            CountdownKind::StreetDeal => 3,
            CountdownKind::NewHand => 4,
        }
    }
}

/// A tagged descriptor returned by a reducer and executed by the event
/// loop. The reducer never schedules anything itself — it only
/// describes what should happen.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    StartTimer {
        player: Option<PlayerId>,
        seat: SeatIndex,
        duration: Duration,
    },
    StopTimer {
        player: Option<PlayerId>,
    },
    ClearTimers,
    DispatchEvent {
        event: Event,
        delay: Option<Duration>,
    },
    EmitStateChange {
        reason: String,
    },
    CheckGameStart {
        delay: Option<Duration>,
    },
    EvaluateHands,
    StartCountdown {
        kind: CountdownKind,
        duration: Duration,
        metadata: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_round_trips_through_its_wire_spelling() {
        for kind in [
            ActionKind::Fold,
            ActionKind::Check,
            ActionKind::Call,
            ActionKind::Bet,
            ActionKind::Raise,
            ActionKind::AllIn,
        ] {
            let spelled = kind.to_string();
            assert_eq!(ActionKind::try_from(spelled.as_str()), Ok(kind));
            assert_eq!(ActionKind::try_from(spelled.to_ascii_lowercase().as_str()), Ok(kind));
        }
    }

    #[test]
    fn action_kind_rejects_unknown_spellings() {
        assert!(ActionKind::try_from("SHOVE").is_err());
    }

    #[test]
    fn countdown_priority_favours_action_over_everything_else() {
        assert!(CountdownKind::Action.priority() < CountdownKind::Reconnect.priority());
        assert!(CountdownKind::Reconnect.priority() < CountdownKind::GameStart.priority());
        assert!(CountdownKind::GameStart.priority() < CountdownKind::StreetDeal.priority());
        assert!(CountdownKind::StreetDeal.priority() < CountdownKind::NewHand.priority());
    }
}

use pte_core::SeatIndex;

/// Why an event was rejected before it ever touched the table. The event
/// loop turns this into an `ERROR` for the caller and leaves the table
/// unchanged — it is never a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    SeatOutOfRange(SeatIndex),
    SeatEmpty(SeatIndex),
    SeatNotActor(SeatIndex),
    WrongPhase,
    NotEnoughActiveSeats,
    IllegalAction { reason: String },
    InvalidAmount,
    SeatTaken(SeatIndex),
    PlayerAlreadySeated,
    InvalidBuyIn,
    UnknownPlayer,
    QueueOverflow,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ValidationError::SeatOutOfRange(i) => write!(f, "seat {i} out of range"),
            ValidationError::SeatEmpty(i) => write!(f, "seat {i} is empty"),
            ValidationError::SeatNotActor(i) => write!(f, "seat {i} is not the current actor"),
            ValidationError::WrongPhase => write!(f, "wrong phase for this event"),
            ValidationError::NotEnoughActiveSeats => write!(f, "not enough active seats"),
            ValidationError::IllegalAction { reason } => write!(f, "illegal action: {reason}"),
            ValidationError::InvalidAmount => write!(f, "invalid amount"),
            ValidationError::SeatTaken(i) => write!(f, "seat {i} is taken"),
            ValidationError::PlayerAlreadySeated => write!(f, "player already seated"),
            ValidationError::InvalidBuyIn => write!(f, "buy-in out of bounds"),
            ValidationError::UnknownPlayer => write!(f, "unknown player"),
            ValidationError::QueueOverflow => write!(f, "event queue overflow"),
        }
    }
}
impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_mention_the_offending_seat() {
        assert!(ValidationError::SeatOutOfRange(9).to_string().contains('9'));
        assert!(ValidationError::SeatNotActor(2).to_string().contains('2'));
    }

    #[test]
    fn illegal_action_carries_its_reason_through() {
        let err = ValidationError::IllegalAction {
            reason: "bet below minimum".into(),
        };
        assert_eq!(err.to_string(), "illegal action: bet below minimum");
    }
}

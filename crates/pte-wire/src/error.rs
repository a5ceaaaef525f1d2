use serde::Serialize;

/// Error codes surfaced to clients, carried on `ERROR` events and
/// returned by command validation before an event ever reaches a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidSeat,
    SeatTaken,
    InvalidBuyin,
    ActionFailed,
    SeatingFailed,
    RebuyFailed,
    UnknownCommand,
    BadJson,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ErrorCode {}

/// Default mapping used for `ACTION` command failures. `SIT`/`REBUY`
/// failures are reported as `SEATING_FAILED`/`REBUY_FAILED` by the caller
/// instead — the command that was being serviced, not the reducer error
/// variant, decides which of those two codes applies.
impl From<&pte_table::ValidationError> for ErrorCode {
    fn from(err: &pte_table::ValidationError) -> Self {
        use pte_table::ValidationError::*;
        match err {
            SeatOutOfRange(_) | SeatEmpty(_) | SeatNotActor(_) => ErrorCode::InvalidSeat,
            SeatTaken(_) | PlayerAlreadySeated => ErrorCode::SeatTaken,
            InvalidBuyIn => ErrorCode::InvalidBuyin,
            QueueOverflow => ErrorCode::ActionFailed,
            WrongPhase | NotEnoughActiveSeats | IllegalAction { .. } | InvalidAmount
            | UnknownPlayer => ErrorCode::ActionFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pte_table::ValidationError;

    #[test]
    fn seat_errors_map_to_invalid_seat() {
        assert_eq!(ErrorCode::from(&ValidationError::SeatEmpty(2)), ErrorCode::InvalidSeat);
        assert_eq!(ErrorCode::from(&ValidationError::SeatNotActor(2)), ErrorCode::InvalidSeat);
    }

    #[test]
    fn seating_conflicts_map_to_seat_taken() {
        assert_eq!(ErrorCode::from(&ValidationError::PlayerAlreadySeated), ErrorCode::SeatTaken);
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&ErrorCode::InvalidBuyin).unwrap(), "\"INVALID_BUYIN\"");
    }
}

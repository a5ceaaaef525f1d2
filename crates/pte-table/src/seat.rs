use pte_cards::Card;
use pte_core::{Chips, PlayerId};

/// A seat's occupancy and in-hand status. Sitting-out is **not** a
/// variant here — it is derived at snapshot time from the sit-out
/// controller; adding a `SittingOut` variant here would recreate a
/// double-source-of-truth bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeatStatus {
    Empty,
    Active,
    Folded,
    AllIn,
}

impl SeatStatus {
    /// "In hand" per the glossary: still contesting the pot.
    pub fn in_hand(&self) -> bool {
        matches!(self, SeatStatus::Active | SeatStatus::AllIn)
    }
    /// "Actionable" per the glossary: can still take a betting action.
    pub fn actionable(&self) -> bool {
        matches!(self, SeatStatus::Active)
    }
}

/// One of the table's fixed nine seat slots.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seat {
    id: usize,
    player: Option<PlayerId>,
    chips: Chips,
    committed: Chips,
    street_committed: Chips,
    status: SeatStatus,
    hand: Option<(Card, Card)>,
    nickname: Option<String>,
    last_action: Option<String>,
    /// Queued buy-in top-up from a `REBUY` command: applied at the next
    /// `StartHand` for this seat, never mid-hand.
    rebuy_pending: Option<Chips>,
}

impl Seat {
    pub fn empty(id: usize) -> Self {
        Self {
            id,
            player: None,
            chips: 0,
            committed: 0,
            street_committed: 0,
            status: SeatStatus::Empty,
            hand: None,
            nickname: None,
            last_action: None,
            rebuy_pending: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn player(&self) -> Option<&PlayerId> {
        self.player.as_ref()
    }
    pub fn chips(&self) -> Chips {
        self.chips
    }
    pub fn committed(&self) -> Chips {
        self.committed
    }
    pub fn street_committed(&self) -> Chips {
        self.street_committed
    }
    pub fn status(&self) -> SeatStatus {
        self.status
    }
    pub fn hand(&self) -> Option<(Card, Card)> {
        self.hand
    }
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }
    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }
    pub fn rebuy_pending(&self) -> Option<Chips> {
        self.rebuy_pending
    }

    pub fn is_empty(&self) -> bool {
        self.status == SeatStatus::Empty
    }
    pub fn in_hand(&self) -> bool {
        self.status.in_hand()
    }
    pub fn actionable(&self) -> bool {
        self.status.actionable() && self.player.is_some()
    }

    pub fn set_player(&mut self, player: PlayerId, chips: Chips, nickname: Option<String>) {
        self.player = Some(player);
        self.chips = chips;
        self.nickname = nickname;
        self.status = if chips > 0 {
            SeatStatus::Active
        } else {
            SeatStatus::Empty
        };
    }
    pub fn clear(&mut self) {
        *self = Seat::empty(self.id);
    }
    pub fn set_status(&mut self, status: SeatStatus) {
        self.status = status;
    }
    pub fn set_hand(&mut self, hand: Option<(Card, Card)>) {
        self.hand = hand;
    }
    pub fn set_last_action(&mut self, label: impl Into<String>) {
        self.last_action = Some(label.into());
    }
    pub fn clear_last_action(&mut self) {
        self.last_action = None;
    }
    pub fn reset_street_committed(&mut self) {
        self.street_committed = 0;
    }
    pub fn reset_hand_scoped(&mut self) {
        self.committed = 0;
        self.street_committed = 0;
        self.hand = None;
        self.last_action = None;
        if self.chips > 0 {
            self.status = SeatStatus::Active;
        } else {
            self.status = SeatStatus::Empty;
        }
    }
    pub fn queue_rebuy(&mut self, amount: Chips) {
        self.rebuy_pending = Some(self.rebuy_pending.unwrap_or(0) + amount);
    }
    pub fn apply_pending_rebuy(&mut self) {
        if let Some(amount) = self.rebuy_pending.take() {
            self.chips += amount;
        }
    }

    /// Commits `amount` chips (clamped to available chips), updating
    /// `chips`, `committed`, and `street_committed`. Returns the actual
    /// amount committed and whether the seat is now all-in.
    pub fn commit(&mut self, amount: Chips) -> (Chips, bool) {
        let delta = amount.min(self.chips).max(0);
        self.chips -= delta;
        self.committed += delta;
        self.street_committed += delta;
        let all_in = self.chips == 0 && delta > 0;
        if all_in {
            self.status = SeatStatus::AllIn;
        }
        (delta, all_in)
    }

    pub fn credit(&mut self, amount: Chips) {
        self.chips += amount;
    }

    /// Returns an uncalled portion of this seat's commitment: moves
    /// `amount` back from `committed` to `chips`, leaving `street_committed`
    /// alone since the refund only ever applies after the hand is settled.
    pub fn refund(&mut self, amount: Chips) {
        self.committed -= amount;
        self.chips += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_clamps_to_available_chips() {
        let mut seat = Seat::empty(0);
        seat.set_player(PlayerId::new("p1"), 100, None);
        seat.set_status(SeatStatus::Active);
        let (delta, all_in) = seat.commit(150);
        assert_eq!(delta, 100);
        assert!(all_in);
        assert_eq!(seat.status(), SeatStatus::AllIn);
        assert_eq!(seat.chips(), 0);
    }

    #[test]
    fn reset_hand_scoped_reactivates_funded_seats() {
        let mut seat = Seat::empty(0);
        seat.set_player(PlayerId::new("p1"), 100, None);
        seat.commit(50);
        seat.reset_hand_scoped();
        assert_eq!(seat.committed(), 0);
        assert_eq!(seat.street_committed(), 0);
        assert_eq!(seat.status(), SeatStatus::Active);
    }
}

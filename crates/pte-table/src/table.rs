use crate::audit::AuditRecord;
use crate::pot::Pot;
use crate::seat::Seat;
use pte_cards::{Card, Deck};
use pte_core::{Chips, HandNumber, SeatIndex, ID, MAX_SEATS};
use std::collections::BTreeSet;

/// Opaque marker for `ID<Table>` — tables are addressed by id, never by
/// object reference, to avoid a cyclic seat/table reference graph.
pub struct TableMarker;

/// The overall hand lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Waiting,
    Deal,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Payout,
    HandEnd,
}

impl Phase {
    pub fn street(&self) -> Option<Street> {
        match self {
            Phase::Preflop => Some(Street::Preflop),
            Phase::Flop => Some(Street::Flop),
            Phase::Turn => Some(Street::Turn),
            Phase::River => Some(Street::River),
            _ => None,
        }
    }
}

/// A betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// Number of community cards visible once this street is dealt.
    pub fn community_len(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }
    pub fn next(&self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }
}

/// Stakes fixed for the table's lifetime (could change between hands via
/// an out-of-scope lobby collaborator, but the engine treats them as
/// table-scoped, not hand-scoped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Option<Chips>,
}

/// The full per-table state. Exclusively owned by one event-loop task —
/// nothing here is ever shared or mutated concurrently.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    id: ID<TableMarker>,
    hand_number: HandNumber,
    hand_started_at: Option<u64>,
    seats: [Seat; MAX_SEATS],
    button: Option<SeatIndex>,
    stakes: Stakes,
    phase: Phase,
    current_bet: Chips,
    last_raise_size: Chips,
    last_aggressor: Option<SeatIndex>,
    actor: Option<SeatIndex>,
    community: Vec<Card>,
    burn_flop: Option<Card>,
    burn_turn: Option<Card>,
    burn_river: Option<Card>,
    deck: Option<Deck>,
    pots: Vec<Pot>,
    bb_seat: Option<SeatIndex>,
    bb_has_acted: bool,
    acted_this_round: BTreeSet<SeatIndex>,
    round_start_actor: Option<SeatIndex>,
    deck_commitment: Option<String>,
    /// Diagnostic trail of invariant checks and forced recoveries. Never
    /// replayed — purely an operator-visible audit trail, appended to by
    /// the event loop after each reducer call.
    audit: Vec<AuditRecord>,
}

impl Table {
    pub fn new(stakes: Stakes) -> Self {
        Self {
            id: ID::default(),
            hand_number: 0,
            hand_started_at: None,
            seats: std::array::from_fn(Seat::empty),
            button: None,
            stakes,
            phase: Phase::Waiting,
            current_bet: 0,
            last_raise_size: stakes.big_blind,
            last_aggressor: None,
            actor: None,
            community: Vec::new(),
            burn_flop: None,
            burn_turn: None,
            burn_river: None,
            deck: None,
            pots: Vec::new(),
            bb_seat: None,
            bb_has_acted: false,
            acted_this_round: BTreeSet::new(),
            round_start_actor: None,
            deck_commitment: None,
            audit: Vec::new(),
        }
    }

    // -- identity --
    pub fn id(&self) -> ID<TableMarker> {
        self.id
    }
    pub fn hand_number(&self) -> HandNumber {
        self.hand_number
    }
    pub fn hand_started_at(&self) -> Option<u64> {
        self.hand_started_at
    }

    // -- seating --
    pub fn seats(&self) -> &[Seat; MAX_SEATS] {
        &self.seats
    }
    pub fn seats_mut(&mut self) -> &mut [Seat; MAX_SEATS] {
        &mut self.seats
    }
    pub fn seat(&self, i: SeatIndex) -> Option<&Seat> {
        self.seats.get(i)
    }
    pub fn seat_mut(&mut self, i: SeatIndex) -> Option<&mut Seat> {
        self.seats.get_mut(i)
    }
    pub fn button(&self) -> Option<SeatIndex> {
        self.button
    }
    pub fn set_button(&mut self, i: SeatIndex) {
        self.button = Some(i);
    }

    // -- stakes --
    pub fn stakes(&self) -> Stakes {
        self.stakes
    }

    // -- phase / street --
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
    pub fn street(&self) -> Option<Street> {
        self.phase.street()
    }

    // -- betting --
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    pub fn set_current_bet(&mut self, bet: Chips) {
        self.current_bet = bet;
    }
    pub fn last_raise_size(&self) -> Chips {
        self.last_raise_size
    }
    pub fn set_last_raise_size(&mut self, size: Chips) {
        self.last_raise_size = size;
    }
    pub fn last_aggressor(&self) -> Option<SeatIndex> {
        self.last_aggressor
    }
    pub fn set_last_aggressor(&mut self, seat: Option<SeatIndex>) {
        self.last_aggressor = seat;
    }
    pub fn actor(&self) -> Option<SeatIndex> {
        self.actor
    }
    pub fn set_actor(&mut self, seat: Option<SeatIndex>) {
        self.actor = seat;
    }

    // -- community / burns --
    pub fn community(&self) -> &[Card] {
        &self.community
    }
    pub fn push_community(&mut self, cards: &[Card]) {
        self.community.extend_from_slice(cards);
    }
    pub fn burn(&self, street: Street) -> Option<Card> {
        match street {
            Street::Preflop => None,
            Street::Flop => self.burn_flop,
            Street::Turn => self.burn_turn,
            Street::River => self.burn_river,
        }
    }
    pub fn set_burn(&mut self, street: Street, card: Card) {
        match street {
            Street::Preflop => {}
            Street::Flop => self.burn_flop = Some(card),
            Street::Turn => self.burn_turn = Some(card),
            Street::River => self.burn_river = Some(card),
        }
    }

    // -- deck --
    pub fn deck(&self) -> Option<&Deck> {
        self.deck.as_ref()
    }
    pub fn deck_mut(&mut self) -> Option<&mut Deck> {
        self.deck.as_mut()
    }
    pub fn set_deck(&mut self, deck: Deck) {
        self.deck_commitment = Some(deck.commit());
        self.deck = Some(deck);
    }
    pub fn deck_commitment(&self) -> Option<&str> {
        self.deck_commitment.as_deref()
    }

    // -- pots --
    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }
    pub fn set_pots(&mut self, pots: Vec<Pot>) {
        self.pots = pots;
    }
    pub fn clear_pots(&mut self) {
        self.pots.clear();
    }

    // -- BB option tracking --
    pub fn bb_seat(&self) -> Option<SeatIndex> {
        self.bb_seat
    }
    pub fn set_bb_seat(&mut self, seat: Option<SeatIndex>) {
        self.bb_seat = seat;
    }
    pub fn bb_has_acted(&self) -> bool {
        self.bb_has_acted
    }
    pub fn set_bb_has_acted(&mut self, acted: bool) {
        self.bb_has_acted = acted;
    }

    // -- round tracking --
    pub fn acted_this_round(&self) -> &BTreeSet<SeatIndex> {
        &self.acted_this_round
    }
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.acted_this_round.insert(seat);
    }
    pub fn reset_acted(&mut self) {
        self.acted_this_round.clear();
    }
    pub fn round_start_actor(&self) -> Option<SeatIndex> {
        self.round_start_actor
    }
    pub fn set_round_start_actor(&mut self, seat: Option<SeatIndex>) {
        self.round_start_actor = seat;
    }

    // -- derived queries --
    /// Seats still contesting the pot ("in hand").
    pub fn in_hand_seats(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.in_hand())
            .map(|(i, _)| i)
            .collect()
    }
    /// Seats that can still take a betting action.
    pub fn actionable_seats(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.actionable())
            .map(|(i, _)| i)
            .collect()
    }
    pub fn next_hand_number(&mut self) -> HandNumber {
        self.hand_number += 1;
        self.hand_number
    }
    pub fn set_hand_started_at(&mut self, ts: u64) {
        self.hand_started_at = Some(ts);
    }

    // -- audit --
    pub fn audit_log(&self) -> &[AuditRecord] {
        &self.audit
    }
    pub fn push_audit(&mut self, record: AuditRecord) {
        self.audit.push(record);
    }

    /// Overwrites every hand-scoped field: called at the start of
    /// `StartHand`, before seats are reset by the caller.
    pub fn reset_hand_scoped(&mut self) {
        self.phase = Phase::Deal;
        self.current_bet = 0;
        self.last_raise_size = self.stakes.big_blind;
        self.last_aggressor = None;
        self.actor = None;
        self.community.clear();
        self.burn_flop = None;
        self.burn_turn = None;
        self.burn_river = None;
        self.deck = None;
        self.deck_commitment = None;
        self.pots.clear();
        self.bb_seat = None;
        self.bb_has_acted = false;
        self.acted_this_round.clear();
        self.round_start_actor = None;
    }
}

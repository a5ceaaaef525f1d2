use super::card::Card;
use sha2::{Digest, Sha256};

/// Deterministic, seed-reproducible deck: a `shuffle(seed)` turns an
/// opaque string into a 52-card ordering via an xmur3-style string mixer
/// feeding a Fisher-Yates shuffle. Equal seeds always yield equal decks,
/// which is what makes a hand replayable from its event log alone.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    cards: [Card; 52],
    /// Index of the next undealt card; invariant `0 <= index <= 52`.
    index: usize,
    seed: String,
}

/// Raised when a draw would run past the end of the deck. Should never
/// happen in a single hand (52 cards comfortably cover hole cards, burns,
/// and the board), but the bound is enforced rather than assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckExhausted {
    pub requested: usize,
    pub remaining: usize,
}

impl std::fmt::Display for DeckExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "deck exhausted: requested {} cards, {} remain",
            self.requested, self.remaining
        )
    }
}
impl std::error::Error for DeckExhausted {}

impl Deck {
    /// Shuffles a fresh 52-card deck, seeded deterministically from `seed`.
    pub fn shuffle(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let mut cards: [Card; 52] = std::array::from_fn(|i| Card::from(i as u8));
        let mut rng = Xmur3Rng::new(&seed);
        // Fisher-Yates, walking from the top down.
        for i in (1..cards.len()).rev() {
            let j = rng.next_bounded(i as u32 + 1) as usize;
            cards.swap(i, j);
        }
        Self {
            cards,
            index: 0,
            seed,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn cards(&self) -> &[Card; 52] {
        &self.cards
    }

    /// Draws the next `n` cards in deck order, advancing the index.
    pub fn draw_next(&mut self, n: usize) -> Result<Vec<Card>, DeckExhausted> {
        if self.index + n > self.cards.len() {
            return Err(DeckExhausted {
                requested: n,
                remaining: self.cards.len() - self.index,
            });
        }
        let drawn = self.cards[self.index..self.index + n].to_vec();
        self.index += n;
        Ok(drawn)
    }

    /// Two rounds of one card per seat, round-robin: the first `n_seats`
    /// cards are round one (one per seat in dealing order), the next
    /// `n_seats` are round two. Pairing cards back up with seats is the
    /// caller's job (the card ledger has no notion of seats).
    pub fn deal_hole(&mut self, n_seats: usize) -> Result<Vec<Card>, DeckExhausted> {
        self.draw_next(2 * n_seats)
    }

    /// Burns one card and draws three for the flop.
    pub fn deal_flop(&mut self) -> Result<(Card, [Card; 3]), DeckExhausted> {
        let burn = self.draw_next(1)?[0];
        let drawn = self.draw_next(3)?;
        Ok((burn, [drawn[0], drawn[1], drawn[2]]))
    }

    /// Burns one card and draws one, for the turn or river.
    pub fn deal_turn_or_river(&mut self) -> Result<(Card, Card), DeckExhausted> {
        let burn = self.draw_next(1)?[0];
        let drawn = self.draw_next(1)?[0];
        Ok((burn, drawn))
    }

    /// SHA-256 of the full 52-card post-shuffle order, recorded in the
    /// audit log at hand start so the deal can be proven fair afterwards.
    pub fn commit(&self) -> String {
        let mut hasher = Sha256::new();
        for card in &self.cards {
            hasher.update([card.code()]);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Mixes an arbitrary string into a 32-bit seed (xmur3), then expands that
/// seed into a stream of bounded integers (a small multiply-xorshift PRNG)
/// for the Fisher-Yates swap positions. Not cryptographic; chosen only for
/// byte-for-byte reproducibility across processes and languages.
struct Xmur3Rng {
    state: u32,
}

impl Xmur3Rng {
    fn new(seed: &str) -> Self {
        let mut h = 2_166_136_261u32;
        for byte in seed.bytes() {
            h ^= byte as u32;
            h = h.wrapping_mul(16_777_619);
        }
        // Final avalanche, xmur3-style.
        h ^= h >> 16;
        h = h.wrapping_mul(2_246_822_519);
        h ^= h >> 13;
        h = h.wrapping_mul(3_266_489_917);
        h ^= h >> 16;
        Self { state: h.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        // mulberry32
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    /// Uniform integer in `0..bound`.
    fn next_bounded(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_deck() {
        let a = Deck::shuffle("hand-1-100-abcdefghi");
        let b = Deck::shuffle("hand-1-100-abcdefghi");
        assert_eq!(a.cards, b.cards);
        assert_eq!(a.commit(), b.commit());
    }

    #[test]
    fn different_seed_different_deck() {
        let a = Deck::shuffle("seed-a");
        let b = Deck::shuffle("seed-b");
        assert_ne!(a.cards, b.cards);
    }

    #[test]
    fn shuffle_contains_every_code_once() {
        let deck = Deck::shuffle("completeness-check");
        let mut codes: Vec<u8> = deck.cards.iter().map(|c| c.code()).collect();
        codes.sort();
        assert_eq!(codes, (0u8..52).collect::<Vec<_>>());
    }

    #[test]
    fn draw_next_advances_index_and_bounds_checks() {
        let mut deck = Deck::shuffle("seed");
        let drawn = deck.draw_next(5).unwrap();
        assert_eq!(drawn.len(), 5);
        assert_eq!(deck.index(), 5);
        assert!(deck.draw_next(47).is_ok());
        assert_eq!(deck.index(), 52);
    }

    #[test]
    fn deal_hole_draws_two_per_seat() {
        let mut deck = Deck::shuffle("seed");
        let cards = deck.deal_hole(6).unwrap();
        assert_eq!(cards.len(), 12);
        assert_eq!(deck.index(), 12);
    }

    #[test]
    fn draw_next_rejects_overdraw() {
        let mut deck = Deck::shuffle("seed");
        deck.draw_next(50).unwrap();
        assert!(deck.draw_next(3).is_err());
    }

    #[test]
    fn commit_is_pure_function_of_seed() {
        let seed = "hand-7-12345-xyz";
        let c1 = Deck::shuffle(seed).commit();
        let c2 = Deck::shuffle(seed).commit();
        assert_eq!(c1, c2);
    }
}

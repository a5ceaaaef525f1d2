use super::card::Card;
use super::cardset::CardSet;
use super::kickers::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::score::Score;
use super::suit::Suit;

const ALL_RANKS: u16 = 0b1_1111_1111_1111;
const WHEEL: u16 = 0b1_0000_0000_1111;

/// Finds the best 5-card [`Ranking`] (and its tie-breaking [`Kickers`])
/// within a set of 2 to 7 cards, via bitwise rank/suit scans over the card
/// codes (`rank * 4 + suit`, so each rank is a contiguous 4-bit nibble).
///
/// This is the sole table-engine contract: `(codes) -> score`, total
/// and deterministic. The category label it also exposes is descriptive
/// only.
pub struct Evaluator(CardSet);

impl From<CardSet> for Evaluator {
    fn from(set: CardSet) -> Self {
        Self(set)
    }
}
impl From<&[Card]> for Evaluator {
    fn from(cards: &[Card]) -> Self {
        Self(CardSet::from(cards))
    }
}

/// Computes the [`Score`] of the best 5-card hand within `cards` (2..=7
/// cards: hole cards plus however much of the board is visible).
pub fn evaluate(cards: &[Card]) -> Score {
    let evaluator = Evaluator::from(cards);
    let ranking = evaluator.find_ranking();
    let kickers = evaluator.find_kickers(ranking);
    Score::from((ranking, kickers))
}

impl Evaluator {
    pub fn find_ranking(&self) -> Ranking {
        self.find_flush()
            .or_else(|| self.find_n_oak(4).map(Ranking::FourOfAKind))
            .or_else(|| self.find_full_house())
            .or_else(|| self.find_straight(self.0.rank_mask()).map(Ranking::Straight))
            .or_else(|| self.find_n_oak(3).map(Ranking::ThreeOfAKind))
            .or_else(|| self.find_two_pair())
            .or_else(|| self.find_n_oak(2).map(Ranking::OnePair))
            .or_else(|| self.find_n_oak(1).map(Ranking::HighCard))
            .expect("at least one card")
    }

    pub fn find_kickers(&self, ranking: Ranking) -> Kickers {
        let n = ranking.n_kickers();
        if n == 0 {
            return Kickers::from(0);
        }
        let available = !ranking.occupied_mask() & ALL_RANKS;
        let mut bits = available & self.0.rank_mask();
        while bits.count_ones() as usize > n {
            bits &= !(1 << bits.trailing_zeros());
        }
        Kickers::from(bits)
    }

    fn find_flush(&self) -> Option<Ranking> {
        let suit = self.flush_suit()?;
        let mask = self.0.suit_masks()[suit as usize];
        match self.find_straight(mask) {
            Some(high) => Some(Ranking::StraightFlush(high)),
            None => Some(Ranking::Flush(Rank::from(highest_set_bit(mask)))),
        }
    }

    fn flush_suit(&self) -> Option<Suit> {
        self.0
            .suit_counts()
            .iter()
            .position(|&n| n >= 5)
            .map(|i| Suit::from(i as u8))
    }

    fn find_straight(&self, rank_mask: u16) -> Option<Rank> {
        let mut bits = rank_mask;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits != 0 {
            Some(Rank::from(highest_set_bit(bits)))
        } else if rank_mask & WHEEL == WHEEL {
            Some(Rank::Five)
        } else {
            None
        }
    }

    fn find_full_house(&self) -> Option<Ranking> {
        let trips = self.find_n_oak(3)?;
        let pair = self.find_n_oak_under(2, Some(trips))?;
        Some(Ranking::FullHouse(trips, pair))
    }

    fn find_two_pair(&self) -> Option<Ranking> {
        let hi = self.find_n_oak(2)?;
        let lo = self.find_n_oak_under(2, Some(hi))?;
        Some(Ranking::TwoPair(hi, lo))
    }

    /// Highest rank with at least `n` cards of that rank, scanning from Ace
    /// down to Two.
    fn find_n_oak(&self, n: usize) -> Option<Rank> {
        self.find_n_oak_under(n, None)
    }
    /// Same scan, but restricted to ranks strictly below `below` (or all
    /// ranks, if `None`), so full houses and two pair can find a second
    /// distinct rank.
    fn find_n_oak_under(&self, n: usize, below: Option<Rank>) -> Option<Rank> {
        let ceiling = below.map(u8::from).unwrap_or(13) as u64;
        let floor_mask = (1u64 << (4 * ceiling)) - 1;
        let hand = self.0.bits() & floor_mask;
        let mut nibble = 0b1111u64 << (4 * ceiling) >> 4;
        while nibble > 0 {
            if (hand & nibble).count_ones() as usize >= n {
                let rank = (nibble.trailing_zeros() / 4) as u8;
                return Some(Rank::from(rank));
            }
            nibble >>= 4;
        }
        None
    }
}

fn highest_set_bit(mask: u16) -> u8 {
    15 - mask.leading_zeros() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn cards(notation: &str) -> Vec<Card> {
        Card::parse(notation).unwrap()
    }

    #[test]
    fn high_card() {
        let e = Evaluator::from(cards("As Kh Qd Jc 9s").as_slice());
        assert_eq!(e.find_ranking(), Ranking::HighCard(Rank::Ace));
    }

    #[test]
    fn one_pair() {
        let e = Evaluator::from(cards("As Ah Kd Qc Js").as_slice());
        assert_eq!(e.find_ranking(), Ranking::OnePair(Rank::Ace));
    }

    #[test]
    fn two_pair() {
        let e = Evaluator::from(cards("As Ah Kd Kc Qs").as_slice());
        assert_eq!(e.find_ranking(), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    fn three_of_a_kind() {
        let e = Evaluator::from(cards("As Ah Ad Kc Qs").as_slice());
        assert_eq!(e.find_ranking(), Ranking::ThreeOfAKind(Rank::Ace));
    }

    #[test]
    fn straight() {
        let e = Evaluator::from(cards("9s Th Jd Qc Ks").as_slice());
        assert_eq!(e.find_ranking(), Ranking::Straight(Rank::King));
    }

    #[test]
    fn wheel_straight_plays_five_high() {
        let e = Evaluator::from(cards("As 2h 3d 4c 5s").as_slice());
        assert_eq!(e.find_ranking(), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn flush() {
        let e = Evaluator::from(cards("2s 5s 9s Js Ks").as_slice());
        assert_eq!(e.find_ranking(), Ranking::Flush(Rank::King));
    }

    #[test]
    fn full_house() {
        let e = Evaluator::from(cards("As Ah Ad Kc Ks").as_slice());
        assert_eq!(e.find_ranking(), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn four_of_a_kind() {
        let e = Evaluator::from(cards("As Ah Ad Ac Ks").as_slice());
        assert_eq!(e.find_ranking(), Ranking::FourOfAKind(Rank::Ace));
    }

    #[test]
    fn straight_flush() {
        let e = Evaluator::from(cards("9s Ts Js Qs Ks").as_slice());
        assert_eq!(e.find_ranking(), Ranking::StraightFlush(Rank::King));
    }

    #[test]
    fn seven_cards_picks_best_five() {
        // board contributes a flush that beats the hole cards' trips.
        let e = Evaluator::from(cards("Ah Ad 2s 5s 9s Js Ks").as_slice());
        assert_eq!(e.find_ranking(), Ranking::Flush(Rank::King));
    }

    #[test]
    fn score_lower_for_better_hand() {
        let straight_flush = evaluate(&cards("9s Ts Js Qs Ks"));
        let high_card = evaluate(&cards("As Kh Qd Jc 9s"));
        assert!(straight_flush < high_card);
    }

    #[test]
    fn kickers_exclude_flush_suit_check() {
        // sanity: flush_suit() picks the suit, not an arbitrary one.
        let e = Evaluator::from(cards("2s 5s 9s Js Ks").as_slice());
        assert_eq!(e.flush_suit(), Some(Suit::Spades));
    }
}

use super::kickers::Kickers;
use super::ranking::Ranking;

const KICKER_BITS: u32 = 13;
const RANK_BITS: u32 = 4;
const CATEGORY_BITS: u32 = 4;
const TOTAL_BITS: u32 = CATEGORY_BITS + RANK_BITS + RANK_BITS + KICKER_BITS;
const MAX_RAW: u32 = (1 << TOTAL_BITS) - 1;

/// A hand's overall strength as a single integer, **lower is better**.
/// This is the only contract the table engine relies on; the [`Ranking`]
/// category label is a UI convenience layered on top.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Score(u32);

impl Score {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<(Ranking, Kickers)> for Score {
    fn from((ranking, kickers): (Ranking, Kickers)) -> Self {
        let (category, hi, lo) = category_and_ranks(ranking);
        let raw = (category << (RANK_BITS + RANK_BITS + KICKER_BITS))
            | (hi << (RANK_BITS + KICKER_BITS))
            | (lo << KICKER_BITS)
            | u16::from(kickers) as u32;
        Self(MAX_RAW - raw)
    }
}

/// Ordinal position in `Ranking`'s declaration order (0 = high card, worst;
/// 8 = straight flush, best), plus the variant's own embedded rank(s) as
/// 4-bit fields so ties within a category resolve correctly.
fn category_and_ranks(ranking: Ranking) -> (u32, u32, u32) {
    match ranking {
        Ranking::HighCard(r) => (0, u8::from(r) as u32, 0),
        Ranking::OnePair(r) => (1, u8::from(r) as u32, 0),
        Ranking::TwoPair(hi, lo) => (2, u8::from(hi) as u32, u8::from(lo) as u32),
        Ranking::ThreeOfAKind(r) => (3, u8::from(r) as u32, 0),
        Ranking::Straight(r) => (4, u8::from(r) as u32, 0),
        Ranking::Flush(r) => (5, u8::from(r) as u32, 0),
        Ranking::FullHouse(hi, lo) => (6, u8::from(hi) as u32, u8::from(lo) as u32),
        Ranking::FourOfAKind(r) => (7, u8::from(r) as u32, 0),
        Ranking::StraightFlush(r) => (8, u8::from(r) as u32, 0),
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank;

    #[test]
    fn lower_is_better() {
        let straight_flush = Score::from((Ranking::StraightFlush(Rank::Ace), Kickers::from(0)));
        let high_card = Score::from((Ranking::HighCard(Rank::Ace), Kickers::from(0)));
        assert!(straight_flush < high_card);
    }

    #[test]
    fn same_category_breaks_tie_by_rank() {
        let pair_of_aces = Score::from((Ranking::OnePair(Rank::Ace), Kickers::from(0)));
        let pair_of_twos = Score::from((Ranking::OnePair(Rank::Two), Kickers::from(0)));
        assert!(pair_of_aces < pair_of_twos);
    }

    #[test]
    fn kickers_break_ties_within_same_ranks() {
        let strong_kicker = Score::from((Ranking::HighCard(Rank::Ace), Kickers::from(0b1000)));
        let weak_kicker = Score::from((Ranking::HighCard(Rank::Ace), Kickers::from(0b0001)));
        assert!(strong_kicker < weak_kicker);
    }
}

use super::rank::Rank;
use super::suit::Suit;

/// A playing card encoded as a single byte: `rank * 4 + suit`, giving the
/// wire-visible range `0..52` with suit order `[c, d, h, s]` and rank order
/// `[2, 3, ..., A]`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card(u8);

impl Card {
    pub fn rank(&self) -> Rank {
        Rank::from(self.0 / 4)
    }
    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }
    /// The wire code, always in `0..52`.
    pub fn code(&self) -> u8 {
        self.0
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self(u8::from(r) * 4 + u8::from(s))
    }
}

impl From<u8> for Card {
    fn from(n: u8) -> Self {
        debug_assert!(n < 52, "card code out of range: {n}");
        Self(n)
    }
}
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let s = s.trim();
        if s.len() != 2 {
            return Err(format!("card notation must be 2 characters: {s}"));
        }
        let rank = Rank::try_from(&s[0..1])?;
        let suit = Suit::try_from(&s[1..2])?;
        Ok(Card::from((rank, suit)))
    }
}

impl Card {
    /// Parses a string of concatenated two-character card notations, e.g.
    /// `"As Kd"`. Whitespace is ignored.
    pub fn parse(s: &str) -> Result<Vec<Self>, String> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .map(|pair| Self::try_from(pair.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_rank_suit() {
        let card = Card::from(5u8);
        assert_eq!(card, Card::from((card.rank(), card.suit())));
    }

    #[test]
    fn parses_round_trips_display() {
        let cards = Card::parse("As Kd Tc").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].to_string(), "As");
        assert_eq!(cards[1].to_string(), "Kd");
        assert_eq!(cards[2].to_string(), "Tc");
    }

    #[test]
    fn code_encoding_follows_rank_times_four_plus_suit() {
        // rank * 4 + suit, suit order [c, d, h, s], rank order [2..A]
        let two_of_clubs = Card::try_from("2c").unwrap();
        assert_eq!(two_of_clubs.code(), 0);
        let ace_of_spades = Card::try_from("As").unwrap();
        assert_eq!(ace_of_spades.code(), 12 * 4 + 3);
    }
}

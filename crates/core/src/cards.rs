use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
    Stars,
}

impl Suit {
    pub const ALL: [Suit; 5] = [
        Suit::Spades,
        Suit::Hearts,
        Suit::Clubs,
        Suit::Diamonds,
        Suit::Stars,
    ];

    pub fn code(self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Stars => 'T',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            'T' => Some(Suit::Stars),
            _ => None,
        }
    }
}

/// Ranks in play order. The discriminant is the ordinal position used for
/// run arithmetic, so `Three` is 0 and `King` is 10.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 11] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    pub const LOWEST: Rank = Rank::Three;
    pub const HIGHEST: Rank = Rank::King;

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn succ(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn pred(self) -> Option<Self> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    /// Printed number for 3 through 10; face cards have none.
    pub fn pips(self) -> Option<u32> {
        if self.is_face() {
            None
        } else {
            Some(self.ordinal() as u32 + 3)
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|rank| rank.token().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A playing card. Jokers carry neither rank nor suit.
///
/// Equality and hashing are by value: the two copies of `7H` in a doubled
/// deck are interchangeable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Card {
    Standard { rank: Rank, suit: Suit },
    Joker,
}

pub const JOKER_TOKEN: &str = "JK";

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Standard { rank, suit }
    }

    pub const fn joker() -> Self {
        Card::Joker
    }

    /// Builds a card from a rank token ("3".."10", "J", "Q", "K") and a
    /// single-character suit code.
    pub fn from_tokens(rank: &str, suit: &str) -> Result<Self, CoreError> {
        let parsed_rank =
            Rank::from_token(rank).ok_or_else(|| CoreError::InvalidRank(rank.to_string()))?;
        let mut chars = suit.trim().chars();
        let parsed_suit = match (chars.next(), chars.next()) {
            (Some(code), None) => Suit::from_code(code),
            _ => None,
        }
        .ok_or_else(|| CoreError::InvalidSuit(suit.to_string()))?;
        Ok(Card::new(parsed_rank, parsed_suit))
    }

    pub fn rank(&self) -> Option<Rank> {
        match self {
            Card::Standard { rank, .. } => Some(*rank),
            Card::Joker => None,
        }
    }

    pub fn suit(&self) -> Option<Suit> {
        match self {
            Card::Standard { suit, .. } => Some(*suit),
            Card::Joker => None,
        }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self, Card::Joker)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Standard { rank, suit } => write!(f, "{rank}{suit}"),
            Card::Joker => f.write_str(JOKER_TOKEN),
        }
    }
}

/// Parses `7H`, `10T`, `qs`, and `JK` / `*` for a joker.
impl FromStr for Card {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token == "*"
            || token.eq_ignore_ascii_case(JOKER_TOKEN)
            || token.eq_ignore_ascii_case("joker")
        {
            return Ok(Card::Joker);
        }
        let split = match token.char_indices().last() {
            Some((idx, _)) if idx > 0 => idx,
            _ => return Err(CoreError::InvalidCard(s.to_string())),
        };
        let (rank, suit) = token.split_at(split);
        Card::from_tokens(rank, suit).map_err(|_| CoreError::InvalidCard(s.to_string()))
    }
}

pub fn parse_cards(text: &str) -> Result<Vec<Card>, CoreError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_ordinals_follow_play_order() {
        for (idx, rank) in Rank::ALL.iter().enumerate() {
            assert_eq!(rank.ordinal() as usize, idx);
            assert_eq!(Rank::from_ordinal(idx as u8), Some(*rank));
        }
        assert_eq!(Rank::from_ordinal(11), None);
        assert_eq!(Rank::King.succ(), None);
        assert_eq!(Rank::Three.pred(), None);
        assert_eq!(Rank::Ten.succ(), Some(Rank::Jack));
    }

    #[test]
    fn pips_only_for_number_cards() {
        assert_eq!(Rank::Three.pips(), Some(3));
        assert_eq!(Rank::Ten.pips(), Some(10));
        assert_eq!(Rank::Jack.pips(), None);
        assert_eq!(Rank::King.pips(), None);
    }

    #[test]
    fn parses_and_displays_tokens() {
        let card: Card = "10t".parse().unwrap();
        assert_eq!(card, Card::new(Rank::Ten, Suit::Stars));
        assert_eq!(card.to_string(), "10T");
        assert_eq!("JK".parse::<Card>().unwrap(), Card::joker());
        assert_eq!("*".parse::<Card>().unwrap(), Card::joker());
        assert_eq!("JS".parse::<Card>().unwrap(), Card::new(Rank::Jack, Suit::Spades));
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!("2H".parse::<Card>().is_err());
        assert!("7X".parse::<Card>().is_err());
        assert!("H".parse::<Card>().is_err());
        assert_eq!(
            Card::from_tokens("A", "H"),
            Err(CoreError::InvalidRank("A".to_string()))
        );
        assert_eq!(
            Card::from_tokens("7", "HH"),
            Err(CoreError::InvalidSuit("HH".to_string()))
        );
    }

    #[test]
    fn cards_compare_by_value() {
        let a = Card::from_tokens("7", "H").unwrap();
        let b: Card = "7h".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Card::new(Rank::Seven, Suit::Spades));
        assert_eq!(Card::joker().rank(), None);
        assert_eq!(Card::joker().suit(), None);
    }

    #[test]
    fn parse_cards_splits_on_whitespace_and_commas() {
        let cards = parse_cards("7H, 7S 7C,JK").unwrap();
        assert_eq!(cards.len(), 4);
        assert!(cards[3].is_joker());
    }
}

use crate::{is_wild, Card, PointRules, Rank};

pub fn card_points(card: &Card, wild: Rank, rules: &PointRules) -> u32 {
    match card {
        Card::Joker => rules.joker_points,
        Card::Standard { rank, .. } if *rank == wild => rules.wild_points,
        Card::Standard { rank, .. } => rank.pips().unwrap_or(rules.face_points),
    }
}

pub fn hand_value(cards: &[Card], wild: Rank, rules: &PointRules) -> u32 {
    cards.iter().map(|card| card_points(card, wild, rules)).sum()
}

/// Orders a hand by suit, then rank, with jokers at the end.
pub fn sort_hand(cards: &mut [Card]) {
    cards.sort_by_key(|card| match card {
        Card::Standard { rank, suit } => (0, Some(*suit), Some(*rank)),
        Card::Joker => (1, None, None),
    });
}

use crate::{Card, CoreError, Rank};

pub const FIRST_ROUND: u32 = 1;
pub const LAST_ROUND: u32 = 11;

/// Round 1 makes threes wild, round 11 makes kings wild.
pub fn wild_rank_for_round(round: u32) -> Result<Rank, CoreError> {
    if !(FIRST_ROUND..=LAST_ROUND).contains(&round) {
        return Err(CoreError::InvalidRound(round));
    }
    Rank::from_ordinal((round - FIRST_ROUND) as u8).ok_or(CoreError::InvalidRound(round))
}

/// Hand size dealt in a round: three cards in round 1 up to thirteen in round 11.
pub fn cards_per_round(round: u32) -> Result<usize, CoreError> {
    wild_rank_for_round(round)?;
    Ok(round as usize + 2)
}

/// Jokers are always wild; every card of the wild rank is wild whatever its suit.
pub fn is_wild(card: &Card, wild: Rank) -> bool {
    match card {
        Card::Joker => true,
        Card::Standard { rank, .. } => *rank == wild,
    }
}

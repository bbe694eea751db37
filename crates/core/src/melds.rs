use crate::{is_wild, Card, Rank};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_MELD_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MeldKind {
    Book,
    Run,
}

/// Why a group of cards is not a legal meld.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Error)]
pub enum MeldViolation {
    #[error("only {0} cards (need 3+)")]
    TooFewCards(usize),
    #[error("no natural card, a meld cannot be all wilds")]
    NoNaturalCards,
    #[error("duplicate suit in book")]
    DuplicateSuit,
    #[error("mixed ranks in book")]
    MixedRanks,
    #[error("mixed suits in run")]
    MixedSuits,
    #[error("duplicate rank in run")]
    DuplicateRank,
    #[error("run needs {needed} wilds to fill its gaps but has {available}")]
    GapsExceedWilds { needed: usize, available: usize },
    #[error("run would extend past the 3-K rank range")]
    CrossesBoundary,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("meld {index} is not a valid book or run: {violation}")]
pub struct MeldFailure {
    pub index: usize,
    pub violation: MeldViolation,
}

/// Outcome of checking a player's proposed melds. Only the first failure is kept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(MeldFailure),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn failure(&self) -> Option<&MeldFailure> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(failure) => Some(failure),
        }
    }

    pub fn failing_index(&self) -> Option<usize> {
        self.failure().map(|failure| failure.index)
    }

    pub fn reason(&self) -> Option<String> {
        self.failure().map(|failure| failure.violation.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoOutError {
    #[error("melds use {in_melds} cards but hand has {in_hand}")]
    CardCountMismatch { in_melds: usize, in_hand: usize },
    #[error("melds contain cards not in hand")]
    CardsNotInHand,
    #[error(transparent)]
    InvalidMeld(#[from] MeldFailure),
}

fn naturals<'a>(cards: &'a [Card], wild: Rank) -> Vec<&'a Card> {
    cards.iter().filter(|card| !is_wild(card, wild)).collect()
}

pub fn check_book(cards: &[Card], wild: Rank) -> Result<(), MeldViolation> {
    if cards.len() < MIN_MELD_SIZE {
        return Err(MeldViolation::TooFewCards(cards.len()));
    }
    let natural = naturals(cards, wild);
    let Some(first) = natural.first() else {
        return Err(MeldViolation::NoNaturalCards);
    };

    let mut suits: Vec<_> = natural.iter().filter_map(|card| card.suit()).collect();
    suits.sort_unstable();
    if suits.windows(2).any(|w| w[0] == w[1]) {
        return Err(MeldViolation::DuplicateSuit);
    }
    if natural.iter().any(|card| card.rank() != first.rank()) {
        return Err(MeldViolation::MixedRanks);
    }
    Ok(())
}

pub fn check_run(cards: &[Card], wild: Rank) -> Result<(), MeldViolation> {
    if cards.len() < MIN_MELD_SIZE {
        return Err(MeldViolation::TooFewCards(cards.len()));
    }
    let natural = naturals(cards, wild);
    let Some(first) = natural.first() else {
        return Err(MeldViolation::NoNaturalCards);
    };
    if natural.iter().any(|card| card.suit() != first.suit()) {
        return Err(MeldViolation::MixedSuits);
    }

    let mut ordinals: Vec<u8> = natural
        .iter()
        .filter_map(|card| card.rank())
        .map(Rank::ordinal)
        .collect();
    ordinals.sort_unstable();
    if ordinals.windows(2).any(|w| w[0] == w[1]) {
        return Err(MeldViolation::DuplicateRank);
    }

    let wilds = cards.len() - natural.len();
    let mut low = ordinals[0];
    let high = ordinals[ordinals.len() - 1];
    let span = usize::from(high - low) + 1;
    let gaps = span - ordinals.len();
    if gaps > wilds {
        return Err(MeldViolation::GapsExceedWilds {
            needed: gaps,
            available: wilds,
        });
    }

    // Wilds left after gap filling extend the ends. Once the natural
    // sequence touches 3 or K it admits no further extension at either end.
    let mut spare = wilds - gaps;
    let top = Rank::HIGHEST.ordinal();
    if spare > 0 && anchored_below(cards, wild, low) {
        spare -= 1;
        low = Rank::LOWEST.ordinal();
    }
    if spare > 0 {
        if low == Rank::LOWEST.ordinal() || high == top {
            return Err(MeldViolation::CrossesBoundary);
        }
        let room = usize::from(low) + usize::from(top - high);
        if spare > room {
            return Err(MeldViolation::CrossesBoundary);
        }
    }
    Ok(())
}

/// A wild of rank 3 directly under a natural 4 is read as the 3 itself.
fn anchored_below(cards: &[Card], wild: Rank, low: u8) -> bool {
    wild == Rank::LOWEST
        && low == Rank::LOWEST.ordinal() + 1
        && cards.iter().any(|card| card.rank() == Some(wild))
}

pub fn is_valid_book(cards: &[Card], wild: Rank) -> bool {
    check_book(cards, wild).is_ok()
}

pub fn is_valid_run(cards: &[Card], wild: Rank) -> bool {
    check_run(cards, wild).is_ok()
}

/// Classifies a group as a book or run. A group satisfying both (one natural
/// card plus wilds) is reported as a book. On failure the violation matching
/// the group's shape is returned: book reasons when the natural cards share a
/// rank, run reasons otherwise.
pub fn check_meld(cards: &[Card], wild: Rank) -> Result<MeldKind, MeldViolation> {
    let book = check_book(cards, wild);
    if book.is_ok() {
        return Ok(MeldKind::Book);
    }
    let run = check_run(cards, wild);
    if run.is_ok() {
        return Ok(MeldKind::Run);
    }
    let natural = naturals(cards, wild);
    let book_shaped = natural
        .first()
        .map(|first| natural.iter().all(|card| card.rank() == first.rank()))
        .unwrap_or(true);
    if book_shaped {
        book.map(|_| MeldKind::Book)
    } else {
        run.map(|_| MeldKind::Run)
    }
}

pub fn validate_all_melds<M: AsRef<[Card]>>(melds: &[M], wild: Rank) -> ValidationResult {
    for (index, meld) in melds.iter().enumerate() {
        if let Err(violation) = check_meld(meld.as_ref(), wild) {
            return ValidationResult::Invalid(MeldFailure { index, violation });
        }
    }
    ValidationResult::Valid
}

/// Checks that `melds` lay down exactly the cards of `hand` and that each is legal.
pub fn verify_go_out<M: AsRef<[Card]>>(
    hand: &[Card],
    melds: &[M],
    wild: Rank,
) -> Result<(), GoOutError> {
    let mut laid: Vec<Card> = melds
        .iter()
        .flat_map(|meld| meld.as_ref().iter().copied())
        .collect();
    if laid.len() != hand.len() {
        return Err(GoOutError::CardCountMismatch {
            in_melds: laid.len(),
            in_hand: hand.len(),
        });
    }
    let mut held = hand.to_vec();
    laid.sort_unstable();
    held.sort_unstable();
    if laid != held {
        return Err(GoOutError::CardsNotInHand);
    }
    match validate_all_melds(melds, wild) {
        ValidationResult::Valid => Ok(()),
        ValidationResult::Invalid(failure) => Err(failure.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_cards;

    fn cards(text: &str) -> Vec<Card> {
        parse_cards(text).unwrap()
    }

    #[test]
    fn book_checks_run_in_order() {
        assert_eq!(check_book(&cards("7H 7S"), Rank::Three), Err(MeldViolation::TooFewCards(2)));
        assert_eq!(check_book(&cards("JK JK 3H"), Rank::Three), Err(MeldViolation::NoNaturalCards));
        assert_eq!(check_book(&cards("7H 8H 7S"), Rank::Three), Err(MeldViolation::DuplicateSuit));
        assert_eq!(check_book(&cards("7H 8S 7C"), Rank::Three), Err(MeldViolation::MixedRanks));
        assert_eq!(check_book(&cards("7H 7S 7C"), Rank::Three), Ok(()));
    }

    #[test]
    fn run_reports_gap_shortfall() {
        assert_eq!(
            check_run(&cards("5H 3H 9H"), Rank::Three),
            Err(MeldViolation::GapsExceedWilds {
                needed: 3,
                available: 1
            })
        );
    }

    #[test]
    fn spare_wilds_must_fit_inside_range() {
        // 4-5 of hearts plus three jokers spans five ranks inside 3..K.
        assert!(is_valid_run(&cards("4H 5H JK JK JK"), Rank::Nine));
        assert!(is_valid_run(&cards("QH JK JK JK"), Rank::Three));
        assert!(!is_valid_run(&cards("KH JK JK"), Rank::Three));
        assert!(!is_valid_run(&cards("3H JK JK"), Rank::Nine));
        assert!(!is_valid_run(&cards("3H 4H JK"), Rank::Nine));
    }

    #[test]
    fn wild_three_next_to_four_closes_low_end() {
        assert_eq!(check_run(&cards("JK 3H 4H"), Rank::Three), Err(MeldViolation::CrossesBoundary));
        assert_eq!(check_run(&cards("4H 5H 3S JK"), Rank::Three), Err(MeldViolation::CrossesBoundary));
        assert!(is_valid_run(&cards("3H 4H 5H"), Rank::Three));
        assert!(is_valid_run(&cards("JK 3H 5H"), Rank::Three));
    }

    #[test]
    fn wild_kings_extend_below_a_queen() {
        assert_eq!(check_run(&cards("JK QH KS"), Rank::King), Ok(()));
        assert_eq!(check_run(&cards("JH QH JK KS"), Rank::King), Ok(()));
        assert!(is_valid_run(&cards("JH KS QH"), Rank::King));
        assert!(!is_valid_run(&cards("QH KH JK"), Rank::Three));
    }

    #[test]
    fn check_meld_picks_reason_by_shape() {
        assert_eq!(check_meld(&cards("5H 6S 7H"), Rank::Three), Err(MeldViolation::MixedSuits));
        assert_eq!(check_meld(&cards("8H 8H 8S"), Rank::Three), Err(MeldViolation::DuplicateSuit));
        assert_eq!(check_meld(&cards("8H JK"), Rank::Three), Err(MeldViolation::TooFewCards(2)));
        assert_eq!(check_meld(&cards("8H JK JK"), Rank::Three), Ok(MeldKind::Book));
        assert_eq!(check_meld(&cards("8H 9H JK"), Rank::Three), Ok(MeldKind::Run));
    }

    #[test]
    fn failure_message_names_index_and_reason() {
        let failure = MeldFailure {
            index: 1,
            violation: MeldViolation::MixedSuits,
        };
        assert_eq!(
            failure.to_string(),
            "meld 1 is not a valid book or run: mixed suits in run"
        );
    }
}

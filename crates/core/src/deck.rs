use crate::{cards_per_round, Card, CoreError, Rank, Suit};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

pub const DECK_COPIES: usize = 2;
pub const JOKER_COUNT: usize = 6;

/// Draw pile plus discard pile. The top of each pile is the end of its `Vec`.
#[derive(Debug, Default, Clone)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
}

impl Deck {
    /// Two copies of the 55-card five-suit deck plus six jokers: 116 cards, unshuffled.
    pub fn five_crowns() -> Self {
        let mut draw = Vec::with_capacity(DECK_COPIES * Suit::ALL.len() * Rank::ALL.len() + JOKER_COUNT);
        for _ in 0..DECK_COPIES {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    draw.push(Card::new(rank, suit));
                }
            }
        }
        draw.extend(std::iter::repeat(Card::joker()).take(JOKER_COUNT));
        Self {
            draw,
            discard: Vec::new(),
        }
    }

    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Self::five_crowns();
        deck.shuffle(&mut StdRng::seed_from_u64(seed));
        deck
    }

    pub fn shuffle(&mut self, rng: &mut StdRng) {
        self.draw.shuffle(rng);
    }

    pub fn remaining(&self) -> usize {
        self.draw.len()
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.draw.pop()
    }

    pub fn draw_cards(&mut self, count: usize) -> Result<Vec<Card>, CoreError> {
        if count > self.draw.len() {
            return Err(CoreError::NotEnoughCards {
                needed: count,
                remaining: self.draw.len(),
            });
        }
        let split = self.draw.len() - count;
        let mut cards = self.draw.split_off(split);
        cards.reverse();
        Ok(cards)
    }

    /// Deals the round's hand size to each player, one card at a time.
    pub fn deal_round(&mut self, round: u32, players: usize) -> Result<Vec<Vec<Card>>, CoreError> {
        let per_hand = cards_per_round(round)?;
        let needed = per_hand * players;
        if needed > self.draw.len() {
            return Err(CoreError::NotEnoughCards {
                needed,
                remaining: self.draw.len(),
            });
        }
        let mut hands = vec![Vec::with_capacity(per_hand); players];
        for _ in 0..per_hand {
            for hand in hands.iter_mut() {
                if let Some(card) = self.draw.pop() {
                    hand.push(card);
                }
            }
        }
        Ok(hands)
    }

    pub fn discard(&mut self, card: Card) {
        self.discard.push(card);
    }

    pub fn peek_discard(&self) -> Option<&Card> {
        self.discard.last()
    }

    pub fn take_discard(&mut self) -> Option<Card> {
        self.discard.pop()
    }

    /// Turns the discard pile, minus its top card, back into a shuffled draw pile.
    pub fn reshuffle_discard(&mut self, rng: &mut StdRng) {
        let Some(top) = self.discard.pop() else {
            return;
        };
        self.draw.append(&mut self.discard);
        self.draw.shuffle(rng);
        self.discard.push(top);
    }
}

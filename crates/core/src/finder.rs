//! Meld discovery and the leftover-minimising combination search.
//!
//! Candidates are produced lazily per grouping key (rank for books, suit for
//! runs) by pairing every subset of the group's natural cards with every
//! subset of the hand's wilds, then confirmed with the validator.
//!
//! The combination search is a greedy heuristic with bounded restarts, not an
//! exact set cover. It repeatedly takes the candidate covering the most points
//! from what is left of the hand, and when that path leaves cards behind it
//! retries from the second, third, ... best opening choice. Ties between
//! equally scoring candidates go to the smaller hand-position bitmask, which
//! is an implementation choice rather than a game rule.

use crate::{
    check_book, check_run, hand_value, is_wild, Card, MeldKind, Rank, RulesConfig, MIN_MELD_SIZE,
};
use itertools::Itertools;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub type Meld = Vec<Card>;

/// Hand positions are tracked in a `u64` bitmask.
pub const MAX_HAND_SIZE: usize = 64;

type HandMask = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeldCombination {
    pub melds: Vec<Meld>,
    pub leftover_points: u32,
}

impl MeldCombination {
    pub fn goes_out(&self) -> bool {
        self.leftover_points == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    index: usize,
    card: Card,
}

#[derive(Debug, Clone)]
struct Candidate {
    mask: HandMask,
    cards: Meld,
    points: u32,
}

impl Candidate {
    fn confirm(kind: MeldKind, slots: &[Slot], wild: Rank) -> Option<Self> {
        let mut cards: Meld = slots.iter().map(|slot| slot.card).collect();
        let legal = match kind {
            MeldKind::Book => check_book(&cards, wild),
            MeldKind::Run => check_run(&cards, wild),
        };
        legal.ok()?;
        cards.sort_unstable();
        let mask = slots.iter().fold(0, |mask, slot| mask | (1 << slot.index));
        Some(Self {
            mask,
            cards,
            points: 0,
        })
    }
}

fn slots(hand: &[Card], available: HandMask) -> Vec<Slot> {
    hand.iter()
        .enumerate()
        .filter(|&(index, _)| available & (1 << index) != 0)
        .map(|(index, card)| Slot { index, card: *card })
        .collect()
}

fn full_mask(len: usize) -> HandMask {
    if len >= MAX_HAND_SIZE {
        HandMask::MAX
    } else {
        (1 << len) - 1
    }
}

fn candidates(pool: &[Slot], wild: Rank, kind: MeldKind) -> impl Iterator<Item = Candidate> {
    let (wilds, naturals): (Vec<Slot>, Vec<Slot>) =
        pool.iter().partition(|slot| is_wild(&slot.card, wild));

    let mut groups: BTreeMap<u8, Vec<Slot>> = BTreeMap::new();
    for slot in naturals {
        let key = match (kind, slot.card) {
            (MeldKind::Book, Card::Standard { rank, .. }) => rank.ordinal(),
            (MeldKind::Run, Card::Standard { suit, .. }) => suit as u8,
            (_, Card::Joker) => continue,
        };
        groups.entry(key).or_default().push(slot);
    }

    groups.into_values().flat_map(move |group| {
        let wilds = wilds.clone();
        group
            .into_iter()
            .powerset()
            .filter(|natural| !natural.is_empty())
            .flat_map(move |natural| {
                wilds.clone().into_iter().powerset().filter_map(move |extra| {
                    if natural.len() + extra.len() < MIN_MELD_SIZE {
                        return None;
                    }
                    let chosen: Vec<Slot> = natural.iter().chain(extra.iter()).copied().collect();
                    Candidate::confirm(kind, &chosen, wild)
                })
            })
    })
}

/// Keeps the first candidate seen for each card multiset.
fn unique(found: impl Iterator<Item = Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<Meld> = HashSet::new();
    found
        .filter(|candidate| seen.insert(candidate.cards.clone()))
        .collect()
}

fn sized(hand: &[Card]) -> bool {
    if hand.len() > MAX_HAND_SIZE {
        warn!(
            "hand of {} cards exceeds the {} card search limit",
            hand.len(),
            MAX_HAND_SIZE
        );
        return false;
    }
    hand.len() >= MIN_MELD_SIZE
}

fn find_kind(hand: &[Card], wild: Rank, kind: MeldKind) -> Vec<Meld> {
    if !sized(hand) {
        return Vec::new();
    }
    let pool = slots(hand, full_mask(hand.len()));
    unique(candidates(&pool, wild, kind))
        .into_iter()
        .map(|candidate| candidate.cards)
        .collect()
}

pub fn find_all_books(hand: &[Card], wild: Rank) -> Vec<Meld> {
    find_kind(hand, wild, MeldKind::Book)
}

pub fn find_all_runs(hand: &[Card], wild: Rank) -> Vec<Meld> {
    find_kind(hand, wild, MeldKind::Run)
}

/// Books followed by runs; a group legal as both appears once.
pub fn find_all_melds(hand: &[Card], wild: Rank) -> Vec<Meld> {
    if !sized(hand) {
        return Vec::new();
    }
    let pool = slots(hand, full_mask(hand.len()));
    let found = candidates(&pool, wild, MeldKind::Book).chain(candidates(&pool, wild, MeldKind::Run));
    unique(found)
        .into_iter()
        .map(|candidate| candidate.cards)
        .collect()
}

/// Candidates over the still-available cards, best first.
fn ranked(hand: &[Card], available: HandMask, wild: Rank, rules: &RulesConfig) -> Vec<Candidate> {
    let pool = slots(hand, available);
    if pool.len() < MIN_MELD_SIZE {
        return Vec::new();
    }
    let found = candidates(&pool, wild, MeldKind::Book).chain(candidates(&pool, wild, MeldKind::Run));
    let mut ranked = unique(found);
    for candidate in ranked.iter_mut() {
        candidate.points = hand_value(&candidate.cards, wild, &rules.points);
    }
    ranked.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.mask.cmp(&b.mask)));
    ranked
}

fn greedy_from(
    hand: &[Card],
    wild: Rank,
    rules: &RulesConfig,
    opening: Candidate,
) -> (Vec<Candidate>, u32) {
    let mut used = opening.mask;
    let mut covered = opening.points;
    let mut path = vec![opening];
    loop {
        let available = full_mask(hand.len()) & !used;
        let Some(next) = ranked(hand, available, wild, rules).into_iter().next() else {
            break;
        };
        trace!("greedy step takes {:?} for {} points", next.cards, next.points);
        used |= next.mask;
        covered += next.points;
        path.push(next);
    }
    (path, covered)
}

pub fn find_best_meld_combination(hand: &[Card], wild: Rank) -> MeldCombination {
    find_best_meld_combination_with_rules(hand, wild, &RulesConfig::default())
}

pub fn find_best_meld_combination_with_rules(
    hand: &[Card],
    wild: Rank,
    rules: &RulesConfig,
) -> MeldCombination {
    let total = hand_value(hand, wild, &rules.points);
    let mut best = MeldCombination {
        melds: Vec::new(),
        leftover_points: total,
    };
    if !sized(hand) {
        return best;
    }

    let openings = ranked(hand, full_mask(hand.len()), wild, rules);
    debug!(
        "{} candidate melds for {} cards, wild {}",
        openings.len(),
        hand.len(),
        wild
    );
    for (attempt, opening) in openings
        .into_iter()
        .take(rules.search.restart_limit.max(1))
        .enumerate()
    {
        let (path, covered) = greedy_from(hand, wild, rules, opening);
        let leftover = total - covered;
        trace!("attempt {attempt} leaves {leftover} points");
        if leftover < best.leftover_points {
            best = MeldCombination {
                melds: path.into_iter().map(|candidate| candidate.cards).collect(),
                leftover_points: leftover,
            };
        }
        if best.goes_out() {
            break;
        }
    }
    debug!(
        "best combination lays {} melds, {} points left",
        best.melds.len(),
        best.leftover_points
    );
    best
}

pub fn can_go_out(hand: &[Card], wild: Rank) -> bool {
    can_go_out_with_rules(hand, wild, &RulesConfig::default())
}

pub fn can_go_out_with_rules(hand: &[Card], wild: Rank, rules: &RulesConfig) -> bool {
    find_best_meld_combination_with_rules(hand, wild, rules).goes_out()
}

/// Cards of `hand` not laid down in `combination`.
pub fn leftover_cards(hand: &[Card], combination: &MeldCombination) -> Vec<Card> {
    let mut left = hand.to_vec();
    for card in combination.melds.iter().flatten() {
        if let Some(pos) = left.iter().position(|held| held == card) {
            left.remove(pos);
        }
    }
    left
}

use crate::schema::{HandFile, LoadedHand, RulesConfig};
use anyhow::{bail, Context};
use crowns_core::{parse_cards, wild_rank_for_round, Card};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Separators accepted between meld groups on one line.
const GROUP_SEPARATORS: [char; 3] = ['|', ';', '\n'];

pub fn load_rules(path: &Path) -> anyhow::Result<RulesConfig> {
    load_json(path)
}

pub fn load_rules_or_default(path: Option<&Path>) -> anyhow::Result<RulesConfig> {
    match path {
        Some(path) => load_rules(path),
        None => Ok(RulesConfig::default()),
    }
}

pub fn parse_hand(text: &str) -> anyhow::Result<Vec<Card>> {
    parse_cards(text).with_context(|| format!("parse hand {text:?}"))
}

/// Splits `"7H 7S 7C | 4D 5D 6D"` into groups. Empty groups are dropped.
pub fn parse_melds(text: &str) -> anyhow::Result<Vec<Vec<Card>>> {
    text.split(GROUP_SEPARATORS)
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .enumerate()
        .map(|(idx, group)| {
            parse_cards(group).with_context(|| format!("parse meld {idx} {group:?}"))
        })
        .collect()
}

pub fn resolve_hand_file(file: HandFile) -> anyhow::Result<LoadedHand> {
    let wild = wild_rank_for_round(file.round)?;
    let hand = parse_hand(&file.hand.join(" "))?;
    let melds = file
        .melds
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            parse_cards(&group.join(" ")).with_context(|| format!("parse meld {idx}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if hand.is_empty() {
        bail!("hand file lists no cards");
    }
    Ok(LoadedHand {
        round: file.round,
        wild,
        hand,
        melds,
    })
}

pub fn load_hand_file(path: &Path) -> anyhow::Result<LoadedHand> {
    let file: HandFile = load_json(path)?;
    resolve_hand_file(file).with_context(|| format!("resolve {}", path.display()))
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

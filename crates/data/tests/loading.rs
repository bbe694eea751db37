use crowns_core::{Card, Rank, Suit};
use crowns_data::{
    load_hand_file, load_rules, load_rules_or_default, parse_hand, parse_melds,
    resolve_hand_file, HandFile, RulesConfig,
};
use std::fs;
use std::path::PathBuf;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("crowns-data-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write scratch file");
    path
}

#[test]
fn parses_hand_tokens() {
    let hand = parse_hand("7H, 10T qs JK").unwrap();
    assert_eq!(
        hand,
        vec![
            Card::new(Rank::Seven, Suit::Hearts),
            Card::new(Rank::Ten, Suit::Stars),
            Card::new(Rank::Queen, Suit::Spades),
            Card::joker(),
        ]
    );
}

#[test]
fn bad_token_error_names_input() {
    let err = parse_hand("7H 1Z").unwrap_err();
    assert!(format!("{err:#}").contains("1Z"));
}

#[test]
fn parses_meld_groups() {
    let melds = parse_melds("7H 7S 7C | 4D 5D 6D ; JK 8S 8C").unwrap();
    assert_eq!(melds.len(), 3);
    assert_eq!(melds[1].len(), 3);
    assert!(melds[2][0].is_joker());
    assert!(parse_melds(" | ").unwrap().is_empty());
}

#[test]
fn rules_fill_missing_fields_with_defaults() {
    let path = scratch_file("rules.json", r#"{ "points": { "joker_points": 50 } }"#);
    let rules = load_rules(&path).unwrap();
    assert_eq!(rules.points.joker_points, 50);
    assert_eq!(rules.points.wild_points, 20);
    assert_eq!(rules.search, RulesConfig::default().search);
}

#[test]
fn missing_rules_file_is_an_error_but_none_is_default() {
    let missing = std::env::temp_dir().join("crowns-data-no-such-rules.json");
    let err = load_rules(&missing).unwrap_err();
    assert!(err.to_string().contains("read"));
    assert_eq!(load_rules_or_default(None).unwrap(), RulesConfig::default());
}

#[test]
fn hand_file_resolves_round_to_wild_rank() {
    let path = scratch_file(
        "hand.json",
        r#"{ "round": 5, "hand": ["JH", "JS", "JC", "4D", "5D", "6D", "7D", "8D"],
             "melds": [["JH", "JS", "JC"], ["4D", "5D", "6D", "7D", "8D"]] }"#,
    );
    let loaded = load_hand_file(&path).unwrap();
    assert_eq!(loaded.round, 5);
    assert_eq!(loaded.wild, Rank::Seven);
    assert_eq!(loaded.hand.len(), 8);
    assert_eq!(loaded.melds.len(), 2);
}

#[test]
fn hand_file_rejects_bad_round() {
    let file = HandFile {
        round: 12,
        hand: vec!["7H".to_string()],
        melds: Vec::new(),
    };
    let err = resolve_hand_file(file).unwrap_err();
    assert!(err.to_string().contains("round must be 1-11"));
}

//! Street-line extraction and lookup-key normalization.
//!
//! Geocoders format addresses as `"6308 Mellow Twilight Court, Columbia, MD 21044, USA"`.
//! Everything before the first comma is the street line; the rest is ignored here.

use crate::model::StreetKey;
use crate::policy::NormalizationStrategy;

/// Road-type words removed by [`NormalizationStrategy::SuffixStripped`].
pub const ROAD_SUFFIXES: &[&str] = &[
    "RD", "ROAD", "ST", "STREET", "LN", "LANE", "DR", "DRIVE", "CT", "COURT", "CIR", "CIRCLE",
    "WAY", "AVE", "AVENUE",
];

/// Extract the street line: text before the first comma, trimmed, single-spaced, uppercased.
#[must_use]
pub fn street_line(raw_address: &str) -> String {
    raw_address
        .split(',')
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce a raw address to the key used for the store lookup.
///
/// Returns `None` when the address has no street line to work with, or when
/// the key would hold nothing but a house number.
#[must_use]
pub fn normalize(raw_address: &str, strategy: NormalizationStrategy) -> Option<StreetKey> {
    let line = street_line(raw_address);
    if line.is_empty() {
        return None;
    }

    let key = match strategy {
        NormalizationStrategy::FullLine => line,
        NormalizationStrategy::SuffixStripped => strip_road_suffixes(&line),
        NormalizationStrategy::TokenPair => token_pair(&line),
    };

    let tokens: Vec<&str> = key.split(' ').collect();
    if !has_street_name(&tokens) {
        return None;
    }

    Some(StreetKey(key))
}

fn is_road_suffix(token: &str) -> bool {
    ROAD_SUFFIXES.contains(&token.trim_end_matches('.'))
}

/// Whether the tokens still carry a street name once a leading house number is set aside.
fn has_street_name(tokens: &[&str]) -> bool {
    let name_tokens = match tokens.split_first() {
        Some((first, rest)) if first.starts_with(|ch: char| ch.is_ascii_digit()) => rest,
        _ => tokens,
    };
    name_tokens
        .iter()
        .any(|token| token.chars().any(char::is_alphabetic))
}

// Whole-token comparison keeps COURTNEY intact. Stripping stops before the
// street name itself would go, so the result is a fixed point.
fn strip_road_suffixes(line: &str) -> String {
    let mut tokens: Vec<&str> = line.split(' ').collect();

    while let Some((last, rest)) = tokens.split_last() {
        if !is_road_suffix(last) || !has_street_name(rest) {
            break;
        }
        tokens.pop();
    }

    tokens.join(" ")
}

// Separators such as `-` between the number and the name are skipped.
fn token_pair(line: &str) -> String {
    let mut tokens = line.split(' ');
    let house_number = tokens.next().unwrap_or_default();
    let street_token = tokens
        .map(|token| token.trim_end_matches(|ch: char| !ch.is_alphanumeric()))
        .find(|token| !token.is_empty());

    match street_token {
        Some(street_token) => format!("{house_number} {street_token}"),
        None => house_number.to_owned(),
    }
}

//! Matching policy: which stages run and how each one behaves.

use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Raised when a policy knob is given an unknown value.
pub enum ParsePolicyError {
    /// Unknown normalization strategy name.
    #[error("unknown normalization strategy `{0}` (expected full-line, suffix-stripped or token-pair)")]
    Strategy(String),
    /// Unknown match mode name.
    #[error("unknown match mode `{0}` (expected exact, prefix or contains)")]
    Mode(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// How the street line is reduced to a lookup key.
pub enum NormalizationStrategy {
    /// Keep the whole street line.
    FullLine,
    /// Drop trailing road-type words such as `RD` or `COURT`.
    #[default]
    SuffixStripped,
    /// Keep only the house number and the first street-name token.
    TokenPair,
}

impl fmt::Display for NormalizationStrategy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FullLine => "full-line",
            Self::SuffixStripped => "suffix-stripped",
            Self::TokenPair => "token-pair",
        };
        formatter.write_str(name)
    }
}

impl FromStr for NormalizationStrategy {
    type Err = ParsePolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "full-line" | "full" => Ok(Self::FullLine),
            "suffix-stripped" | "strip-suffix" => Ok(Self::SuffixStripped),
            "token-pair" | "pair" => Ok(Self::TokenPair),
            _ => Err(ParsePolicyError::Strategy(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// How the key is compared against the stored street field. Always case-insensitive.
pub enum MatchMode {
    /// Stored street equals the key.
    Exact,
    /// Stored street starts with the key. Tolerates `CT` vs `COURT` style mismatches.
    #[default]
    Prefix,
    /// Stored street contains the key anywhere.
    Contains,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::Contains => "contains",
        };
        formatter.write_str(name)
    }
}

impl FromStr for MatchMode {
    type Err = ParsePolicyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "exact" | "eq" => Ok(Self::Exact),
            "prefix" => Ok(Self::Prefix),
            "contains" | "substring" => Ok(Self::Contains),
            _ => Err(ParsePolicyError::Mode(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Allow-list of ZIP codes and state tokens that make up the service area.
pub struct ServiceAreaGate {
    /// Each ZIP entry tokenized, so `21044-1234` matches as a token run.
    zip_codes: Vec<Vec<String>>,
    /// Each state entry tokenized, so `NEW YORK` matches as a token run.
    state_tokens: Vec<Vec<String>>,
}

impl ServiceAreaGate {
    /// Build a gate from raw ZIP codes and state names. Blank entries are ignored.
    pub fn new<Z, S>(zip_codes: Z, state_tokens: S) -> Self
    where
        Z: IntoIterator,
        Z::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            zip_codes: phrases(zip_codes),
            state_tokens: phrases(state_tokens),
        }
    }

    /// True when neither ZIP codes nor states are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zip_codes.is_empty() && self.state_tokens.is_empty()
    }

    /// Whether the raw address mentions an allowed ZIP code or state as a whole token.
    ///
    /// An empty gate admits everything.
    #[must_use]
    pub fn admits(&self, raw_address: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let tokens = tokenize(raw_address);

        self.zip_codes
            .iter()
            .chain(&self.state_tokens)
            .any(|phrase| {
                tokens
                    .windows(phrase.len())
                    .any(|window| window == phrase.as_slice())
            })
    }
}

/// Stages applied by the matcher for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPolicy {
    /// Optional pre-filter run before any lookup.
    pub service_area: Option<ServiceAreaGate>,
    /// Street-line reduction.
    pub strategy: NormalizationStrategy,
    /// Comparison against the stored street field.
    pub mode: MatchMode,
    /// Ask the store for the region column and echo it back.
    pub include_region: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            service_area: None,
            strategy: NormalizationStrategy::default(),
            mode: MatchMode::default(),
            include_region: true,
        }
    }
}

impl MatchPolicy {
    /// Install a service-area gate. An empty gate disables the stage.
    #[must_use]
    pub fn with_service_area(mut self, gate: ServiceAreaGate) -> Self {
        self.service_area = (!gate.is_empty()).then_some(gate);
        self
    }
}

fn phrases<I>(entries: I) -> Vec<Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| tokenize(entry.as_ref()))
        .filter(|phrase| !phrase.is_empty())
        .collect()
}

fn tokenize(raw: &str) -> Vec<String> {
    raw.to_uppercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

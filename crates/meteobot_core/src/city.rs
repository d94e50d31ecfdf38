//! City alias table and best-effort resolution of free-form chat text.

use derive_getters::Getters;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Filler words removed when extracting a city candidate from free text.
const FILLER_WORDS: [&str; 8] = [
    "погода",
    "в",
    "weather",
    "in",
    "какая",
    "как",
    "дела",
    "температура",
];

/// Length bounds for an extracted city candidate.
const CANDIDATE_MIN_LEN: usize = 1;
const CANDIDATE_MAX_LEN: usize = 50;

/// A canonical city with its recognized alternate spellings.
///
/// The table is data, not code branches, so it can be extended or
/// externalized without touching the matching logic.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
pub struct CityAliases {
    /// Standardized name used for provider queries and cache keys
    canonical: String,
    /// Alternate spellings and abbreviations, Cyrillic and Latin
    aliases: Vec<String>,
}

impl CityAliases {
    /// Create an alias record.
    pub fn new(canonical: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            canonical: canonical.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Outcome of resolving chat text to a city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCity {
    /// An alias matched; the canonical name is the lookup target.
    Canonical(String),
    /// No alias matched; the trimmed input is passed through verbatim.
    /// A provider not-found on this variant gets the generic help reply
    /// rather than a city-specific error.
    Verbatim(String),
}

impl ResolvedCity {
    /// The city name to send to the weather provider.
    pub fn city(&self) -> &str {
        match self {
            ResolvedCity::Canonical(city) => city,
            ResolvedCity::Verbatim(city) => city,
        }
    }
}

/// Heuristic resolver mapping free-form chat text to a city name.
///
/// Matching is substring containment against an ordered alias table:
/// the first city any of whose aliases appears inside the lowercased
/// input wins, scanning in table definition order. A short alias that is
/// also a common word can therefore false-positive inside unrelated
/// text; that is accepted, documented behavior of the heuristic.
pub struct CityResolver {
    table: Vec<CityAliases>,
    filler: Regex,
    trailing_punct: Regex,
}

impl CityResolver {
    /// Create a resolver over an explicit alias table.
    pub fn new(table: Vec<CityAliases>) -> Self {
        let words = FILLER_WORDS.join("|");
        // Unicode word boundaries, so Cyrillic fillers strip cleanly.
        let filler = Regex::new(&format!(r"(?i)\b({})\b", words)).expect("valid filler regex");
        let trailing_punct = Regex::new(r"[?!.]+$").expect("valid punctuation regex");
        Self {
            table,
            filler,
            trailing_punct,
        }
    }

    /// Create a resolver over the built-in table of Russian cities.
    pub fn builtin() -> Self {
        Self::new(builtin_table())
    }

    /// Resolve chat text to a city name.
    ///
    /// Falls back to the trimmed text verbatim when no alias matches, so
    /// cities outside the table still reach the provider.
    pub fn resolve(&self, text: &str) -> ResolvedCity {
        let normalized = text.to_lowercase();

        for record in &self.table {
            for alias in &record.aliases {
                if normalized.contains(alias.as_str()) {
                    debug!(
                        canonical = %record.canonical,
                        alias = %alias,
                        "Alias matched"
                    );
                    return ResolvedCity::Canonical(record.canonical.clone());
                }
            }
        }

        ResolvedCity::Verbatim(text.trim().to_string())
    }

    /// Strip filler words and trailing punctuation to extract a city
    /// candidate from text that did not match the alias table.
    ///
    /// Returns `None` when the remainder falls outside the 1-50 char
    /// bound; the caller replies with usage help instead of a lookup.
    pub fn extract_candidate(&self, text: &str) -> Option<String> {
        let stripped = self.filler.replace_all(text, " ");
        let stripped = self.trailing_punct.replace(stripped.trim(), "");
        let candidate = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

        let len = candidate.chars().count();
        if (CANDIDATE_MIN_LEN..=CANDIDATE_MAX_LEN).contains(&len) {
            Some(candidate)
        } else {
            debug!(len, "City candidate out of bounds");
            None
        }
    }
}

impl Default for CityResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The built-in alias table. Iteration order is definition order; the
/// first match wins, not the best match.
fn builtin_table() -> Vec<CityAliases> {
    vec![
        CityAliases::new("москва", &["москва", "moscow", "мск"]),
        CityAliases::new(
            "санкт-петербург",
            &[
                "спб",
                "санкт-петербург",
                "петербург",
                "питер",
                "saint petersburg",
                "st petersburg",
            ],
        ),
        CityAliases::new("екатеринбург", &["екатеринбург", "екб", "yekaterinburg"]),
        CityAliases::new("новосибирск", &["новосибирск", "новосиб", "novosibirsk"]),
        CityAliases::new("казань", &["казань", "kazan"]),
        CityAliases::new(
            "нижний новгород",
            &["нижний новгород", "нижний", "nizhny novgorod"],
        ),
        CityAliases::new("челябинск", &["челябинск", "челяба", "chelyabinsk"]),
        CityAliases::new("самара", &["самара", "samara"]),
        CityAliases::new("омск", &["омск", "omsk"]),
        CityAliases::new("ростов-на-дону", &["ростов-на-дону", "ростов", "rostov"]),
        CityAliases::new("уфа", &["уфа", "ufa"]),
        CityAliases::new("красноярск", &["красноярск", "krasnoyarsk"]),
        CityAliases::new("воронеж", &["воронеж", "voronezh"]),
        CityAliases::new("пермь", &["пермь", "perm"]),
    ]
}

//! # Translation Lookup
//!
//! Maps canonical astronomical identifiers (aspects, planets, zodiac signs)
//! to their display-locale equivalents. Unknown terms pass through unchanged.
//!
//! The table is built once by whichever component composes the subsystem and
//! shared by reference; it is never mutated after construction.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::BatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Aspects,
    Planets,
    Signs,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Aspects, Self::Planets, Self::Signs];

    /// Canonical identifiers the scoring pipeline emits for this category
    pub fn canonical_terms(&self) -> &'static [&'static str] {
        match self {
            Self::Aspects => &[
                "Conjunction",
                "Opposition",
                "Square",
                "Trine",
                "Sextile",
                "Semisextile",
                "Semiquintile",
                "Semisquare",
                "Quintile",
                "Sesquiquintile",
                "Biquintile",
                "Quincunx",
            ],
            Self::Planets => &[
                "Sun",
                "Moon",
                "Mercury",
                "Venus",
                "Mars",
                "Jupiter",
                "Saturn",
                "Uranus",
                "Neptune",
                "Pluto",
                "North Node",
                "South Node",
                "Ascendant",
                "MC",
            ],
            Self::Signs => &[
                "ARIES",
                "TAURUS",
                "GEMINI",
                "CANCER",
                "LEO",
                "VIRGO",
                "LIBRA",
                "SCORPIO",
                "SAGITTARIUS",
                "CAPRICORN",
                "AQUARIUS",
                "PISCES",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aspects => write!(f, "aspects"),
            Self::Planets => write!(f, "planets"),
            Self::Signs => write!(f, "signs"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aspects" => Ok(Self::Aspects),
            "planets" => Ok(Self::Planets),
            "signs" => Ok(Self::Signs),
            _ => Err(BatchError::validation_error(format!(
                "Invalid translation category: {s}"
            ))),
        }
    }
}

// Sign names carry no accents so they match the pipeline's CSV headers.
const FRENCH_ASPECTS: &[(&str, &str)] = &[
    ("Conjunction", "Conjonction"),
    ("Opposition", "Opposition"),
    ("Square", "Carré"),
    ("Trine", "Trigone"),
    ("Sextile", "Sextile"),
    ("Semisextile", "Semi-sextile"),
    ("Semiquintile", "Semi-quintile"),
    ("Semisquare", "Semi-carré"),
    ("Quintile", "Quintile"),
    ("Sesquiquintile", "Sesqui-quintile"),
    ("Biquintile", "Bi-quintile"),
    ("Quincunx", "Quincunx"),
];

const FRENCH_PLANETS: &[(&str, &str)] = &[
    ("Sun", "Soleil"),
    ("Moon", "Lune"),
    ("Mercury", "Mercure"),
    ("Venus", "Vénus"),
    ("Mars", "Mars"),
    ("Jupiter", "Jupiter"),
    ("Saturn", "Saturne"),
    ("Uranus", "Uranus"),
    ("Neptune", "Neptune"),
    ("Pluto", "Pluton"),
    ("North Node", "Nœud Nord"),
    ("South Node", "Nœud Sud"),
    ("Ascendant", "Ascendant"),
    ("MC", "MC"),
];

const FRENCH_SIGNS: &[(&str, &str)] = &[
    ("ARIES", "Belier"),
    ("TAURUS", "Taureau"),
    ("GEMINI", "Gemeaux"),
    ("CANCER", "Cancer"),
    ("LEO", "Lion"),
    ("VIRGO", "Vierge"),
    ("LIBRA", "Balance"),
    ("SCORPIO", "Scorpion"),
    ("SAGITTARIUS", "Sagittaire"),
    ("CAPRICORN", "Capricorne"),
    ("AQUARIUS", "Verseau"),
    ("PISCES", "Poissons"),
];

/// Immutable category → (canonical → display) mapping
#[derive(Debug, Clone)]
pub struct TranslationTable {
    locale: String,
    entries: HashMap<Category, BTreeMap<String, String>>,
}

impl TranslationTable {
    /// Built-in French table
    pub fn french() -> Self {
        Self::from_pairs(
            "fr",
            [
                (Category::Aspects, FRENCH_ASPECTS),
                (Category::Planets, FRENCH_PLANETS),
                (Category::Signs, FRENCH_SIGNS),
            ],
        )
    }

    fn from_pairs<'a>(
        locale: &str,
        categories: impl IntoIterator<Item = (Category, &'a [(&'a str, &'a str)])>,
    ) -> Self {
        let entries = categories
            .into_iter()
            .map(|(category, pairs)| {
                let mapping = pairs
                    .iter()
                    .map(|(canonical, display)| (canonical.to_string(), display.to_string()))
                    .collect();
                (category, mapping)
            })
            .collect();

        Self {
            locale: locale.to_string(),
            entries,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Display term for `term`, or `term` itself when unmapped
    pub fn lookup<'a>(&'a self, category: Category, term: &'a str) -> &'a str {
        self.entries
            .get(&category)
            .and_then(|mapping| mapping.get(term))
            .map(String::as_str)
            .unwrap_or(term)
    }

    /// Owned copy of one category; changes to it never reach the table
    pub fn category_map(&self, category: Category) -> BTreeMap<String, String> {
        self.entries.get(&category).cloned().unwrap_or_default()
    }

    pub fn aspect<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup(Category::Aspects, name)
    }

    pub fn planet<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup(Category::Planets, name)
    }

    pub fn sign<'a>(&'a self, name: &'a str) -> &'a str {
        self.lookup(Category::Signs, name)
    }

    /// Canonical terms of `category` that have no mapping
    pub fn missing_terms(&self, category: Category) -> Vec<&'static str> {
        let mapping = self.entries.get(&category);
        category
            .canonical_terms()
            .iter()
            .copied()
            .filter(|term| mapping.map_or(true, |m| !m.contains_key(*term)))
            .collect()
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::french()
    }
}

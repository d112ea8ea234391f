//! Value Cleaner
//!
//! Normalizes every non-link cell of a sheet: trim, float-suffix repair,
//! junk-token replacement, case policy and brand canonicalization.

use std::collections::{BTreeMap, HashMap};

use mechbi_models::{Table, SENTINEL};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::DashboardResult;

/// Configurable cleaning vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    /// Whole-cell placeholders (case-insensitive) replaced by the sentinel.
    pub junk_tokens: Vec<String>,
    /// Header fragments that switch a column to uppercase.
    pub uppercase_markers: Vec<String>,
    /// Lowercased header names whose values are brand names.
    pub brand_headers: Vec<String>,
    /// Header fragment identifying columns left untouched.
    pub link_marker: String,
    /// Uppercase alias → canonical brand name.
    pub brand_aliases: BTreeMap<String, String>,
}

impl Default for CleaningRules {
    fn default() -> Self {
        let brand_aliases = [
            ("DFROBOT", "DFRobot"),
            ("DFR", "DFRobot"),
            ("ADAFRUIT", "Adafruit"),
            ("POLOLU", "Pololu"),
            ("SPARKFUN", "SparkFun"),
            ("ARDUINO", "Arduino"),
            ("ESPRESSIF", "Espressif"),
            ("SEEED", "Seeed Studio"),
        ]
        .into_iter()
        .map(|(alias, brand)| (alias.to_string(), brand.to_string()))
        .collect();

        Self {
            junk_tokens: ["nan", "none", "unknown", "undefined", "null", "nat", "0"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            uppercase_markers: ["no", "id", "code", "mfg"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            brand_headers: ["mfg", "manufacturer", "brand"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            link_marker: "link".to_string(),
            brand_aliases,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CasePolicy {
    Upper,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnPolicy {
    Passthrough,
    Clean { case: CasePolicy, brand: bool },
}

/// Removes surrounding whitespace and any trailing `.0` left behind by
/// numeric-to-text coercion ("2095.0" → "2095").
pub fn strip_float_suffix(value: &str) -> &str {
    let mut text = value.trim();
    while let Some(stripped) = text.strip_suffix(".0") {
        text = stripped.trim();
    }
    text
}

/// Join-key normalization shared by the Components sheet and the BOM linker.
pub fn normalize_join_key(value: &str) -> String {
    strip_float_suffix(value).to_uppercase()
}

/// Capitalizes the first cased letter of every word and lowercases the rest.
/// Any non-cased character (digit, space, punctuation) starts a new word,
/// except combining marks, which stay attached to the letter before them.
/// Letters whose case mapping expands to several characters are kept as
/// written, so a second pass changes nothing.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;

    for c in value.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased {
            let mapped = if in_word {
                single_char(c.to_lowercase())
            } else {
                single_char(c.to_uppercase())
            };
            out.push(mapped.unwrap_or(c));
            in_word = true;
        } else {
            out.push(c);
            in_word = in_word && is_combining_mark(c);
        }
    }

    out
}

fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

#[derive(Debug, Clone)]
pub struct ValueCleaner {
    rules: CleaningRules,
    junk: Regex,
    brands: HashMap<String, String>,
}

impl ValueCleaner {
    pub fn new(rules: CleaningRules) -> DashboardResult<Self> {
        let alternatives = rules
            .junk_tokens
            .iter()
            .map(|t| regex::escape(t.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let junk = RegexBuilder::new(&format!("^(?:{})$", alternatives))
            .case_insensitive(true)
            .build()?;

        let mut brands = HashMap::new();
        for (alias, brand) in &rules.brand_aliases {
            // Canonical names resolve to themselves so cleaned output is stable.
            brands
                .entry(brand.to_uppercase())
                .or_insert_with(|| brand.clone());
            brands.insert(alias.to_uppercase(), brand.clone());
        }

        Ok(Self {
            rules,
            junk,
            brands,
        })
    }

    pub fn rules(&self) -> &CleaningRules {
        &self.rules
    }

    /// Returns a cleaned copy of `table`. Empty tables come back unchanged.
    pub fn clean_table(&self, table: &Table) -> Table {
        let mut cleaned = table.clone();
        if table.is_empty() {
            return cleaned;
        }

        let policies: Vec<ColumnPolicy> = table
            .headers()
            .iter()
            .map(|h| self.column_policy(h))
            .collect();

        for row in cleaned.rows_mut() {
            for (cell, policy) in row.iter_mut().zip(&policies) {
                if let ColumnPolicy::Clean { case, brand } = *policy {
                    *cell = Some(self.clean_value(cell.as_deref(), case, brand));
                }
            }
        }

        tracing::debug!(
            rows = cleaned.len(),
            columns = cleaned.headers().len(),
            "Cleaned sheet values"
        );
        cleaned
    }

    /// True when `value` is a placeholder for an empty cell.
    pub fn is_junk(&self, value: &str) -> bool {
        value.is_empty() || self.junk.is_match(value)
    }

    /// Maps a brand alias (any case) to its canonical spelling.
    pub fn canonical_brand(&self, value: &str) -> Option<&str> {
        self.brands.get(&value.to_uppercase()).map(String::as_str)
    }

    fn column_policy(&self, header: &str) -> ColumnPolicy {
        let lower = header.to_lowercase();
        if lower.contains(&self.rules.link_marker.to_lowercase()) {
            return ColumnPolicy::Passthrough;
        }

        let case = if self
            .rules
            .uppercase_markers
            .iter()
            .any(|m| lower.contains(&m.to_lowercase()))
        {
            CasePolicy::Upper
        } else {
            CasePolicy::Title
        };
        let brand = self.rules.brand_headers.iter().any(|b| lower == b.to_lowercase());

        ColumnPolicy::Clean { case, brand }
    }

    fn clean_value(&self, value: Option<&str>, case: CasePolicy, brand: bool) -> String {
        let text = match value {
            Some(v) => strip_float_suffix(v),
            None => return SENTINEL.to_string(),
        };
        if self.is_junk(text) {
            return SENTINEL.to_string();
        }

        let cased = match case {
            CasePolicy::Upper => text.to_uppercase(),
            CasePolicy::Title => title_case(text),
        };

        if brand {
            if let Some(canonical) = self.canonical_brand(&cased) {
                return canonical.to_string();
            }
        }
        cased
    }
}

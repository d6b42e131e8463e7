//! Value normalization: trimming, case-insensitive deduplication, ordering
//!
//! A normalizer keeps exactly one entry per case-folded value. The first
//! occurrence decides the display casing. Output follows insertion order
//! unless sorting is enabled, in which case display values are collated.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Separator between qualifier and value in composite keys
pub const COMPOSITE_SEPARATOR: &str = " - ";

/// Normalization policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Keep surrounding whitespace as-is
    #[serde(default)]
    pub no_trim: bool,
    /// Collate output instead of keeping first-seen order
    #[serde(default)]
    pub sort: bool,
}

/// How album and track listings are shaped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumFormat {
    /// Separate columns per attribute
    #[default]
    Flat,
    /// One `"<qualifier> - <value>"` column
    Composite,
}

impl AlbumFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlbumFormat::Flat => "flat",
            AlbumFormat::Composite => "composite",
        }
    }
}

/// Case-folded lookup key
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Ordered set of display values keyed by their case-folded form
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    keys: HashSet<String>,
    values: Vec<String>,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            keys: HashSet::new(),
            values: Vec::new(),
        }
    }

    /// Store `value` unless it is blank or a case-insensitive duplicate
    ///
    /// Returns true when a new entry was stored.
    pub fn add(&mut self, value: &str) -> bool {
        let value = if self.config.no_trim {
            value
        } else {
            value.trim()
        };
        if value.trim().is_empty() {
            return false;
        }

        if self.keys.insert(fold(value)) {
            self.values.push(value.to_string());
            true
        } else {
            false
        }
    }

    /// Add every value; returns how many were new
    pub fn extend<I, S>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .filter(|v| self.add(v.as_ref()))
            .count()
    }

    /// Add the primary field, or the fallback field when the primary is blank
    pub fn add_with_fallback<R: Record>(
        &mut self,
        record: &R,
        primary: &str,
        fallback: Option<&str>,
    ) -> bool {
        let value = record.field(primary).unwrap_or_default();
        if !value.trim().is_empty() {
            return self.add(value);
        }
        match fallback.and_then(|f| record.field(f)) {
            Some(value) => self.add(value),
            None => false,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.keys.contains(&fold(value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Display values in output order
    pub fn values(&self) -> Vec<String> {
        let mut values = self.values.clone();
        if self.config.sort {
            values.sort_by(|a, b| collate(a, b));
        }
        values
    }
}

/// Pick `primary` per record, falling back to `fallback` when blank, and normalize
pub fn fallback_values<R: Record>(
    records: &[R],
    primary: &str,
    fallback: Option<&str>,
    config: NormalizerConfig,
) -> Vec<String> {
    let mut normalizer = Normalizer::new(config);
    for record in records {
        normalizer.add_with_fallback(record, primary, fallback);
    }
    normalizer.values()
}

/// `"<qualifier> - <value>"` when the qualifier is present, else the bare value
pub fn composite_key(qualifier: &str, value: &str) -> String {
    if qualifier.trim().is_empty() {
        value.to_string()
    } else {
        format!("{}{}{}", qualifier, COMPOSITE_SEPARATOR, value)
    }
}

/// Deduplicated multi-column rows
///
/// Rows are equal when every field matches case-insensitively. Rows whose
/// fields are all blank are rejected.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    config: NormalizerConfig,
    keys: HashSet<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl RowSet {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            keys: HashSet::new(),
            rows: Vec::new(),
        }
    }

    pub fn add<S: AsRef<str>>(&mut self, fields: &[S]) -> bool {
        let row: Vec<String> = fields
            .iter()
            .map(|f| {
                if self.config.no_trim {
                    f.as_ref().to_string()
                } else {
                    f.as_ref().trim().to_string()
                }
            })
            .collect();
        if row.iter().all(|f| f.trim().is_empty()) {
            return false;
        }

        let key = row.iter().map(|f| fold(f)).collect();
        if self.keys.insert(key) {
            self.rows.push(row);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in output order; sorting compares fields left to right
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut rows = self.rows.clone();
        if self.config.sort {
            rows.sort_by(|a, b| {
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| collate(x, y))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }
        rows
    }
}

/// Base letter for common accented Latin characters
fn base_letter(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Locale-style ordering of display values
///
/// Letters compare by base letter first, then by accent, then by case with
/// lowercase first. Exact string order breaks any remaining tie.
pub fn collate(a: &str, b: &str) -> Ordering {
    let fa = fold(a);
    let fb = fold(b);

    let primary = fa.chars().map(base_letter).cmp(fb.chars().map(base_letter));
    primary
        .then_with(|| fa.cmp(&fb))
        .then_with(|| {
            let case = |s: &str| s.chars().map(|c| c.is_uppercase()).collect::<Vec<_>>();
            case(a).cmp(&case(b))
        })
        .then_with(|| a.cmp(b))
}

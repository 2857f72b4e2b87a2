//! `Accept`, `Accept-Charset` and `Accept-Language` parsing.
//!
//! # Responsibilities
//! - Split a header into ranges and their q-values
//! - Order ranges by descending quality, keeping header order among equals
//! - Substitute the "accepts everything" default for absent/empty headers
//!
//! # Design Decisions
//! - Never fails: unusable ranges are dropped, bad q-values become `0`
//! - Parameters other than `q` are ignored

use crate::negotiation::media_type::{Dimension, Token};
use crate::negotiation::quality::Quality;

/// A single client preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceToken {
    pub dimension: Dimension,
    pub token: Token,
    pub quality: Quality,
}

/// Client preferences for one dimension, highest quality first.
///
/// Always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceList {
    dimension: Dimension,
    entries: Vec<PreferenceToken>,
}

impl PreferenceList {
    /// `*` (or `*/*`) at `q=1`.
    pub fn wildcard(dimension: Dimension) -> Self {
        Self {
            dimension,
            entries: vec![PreferenceToken {
                dimension,
                token: Token::wildcard(dimension),
                quality: Quality::MAX,
            }],
        }
    }

    /// Parse a raw header value, or the default when it is missing.
    pub fn parse(dimension: Dimension, header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::wildcard(dimension);
        };

        let mut entries: Vec<PreferenceToken> = header
            .split(',')
            .filter_map(|range| parse_range(dimension, range))
            .collect();

        if entries.is_empty() {
            return Self::wildcard(dimension);
        }

        // sort_by is stable, which keeps header order among equal qualities
        entries.sort_by(|a, b| b.quality.cmp(&a.quality));
        Self { dimension, entries }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreferenceToken> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[PreferenceToken] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_range(dimension: Dimension, range: &str) -> Option<PreferenceToken> {
    let mut parts = range.split(';');
    let token = Token::parse(dimension, parts.next()?)?;

    let quality = parts
        .find_map(|param| {
            let (name, value) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("q")
                .then(|| Quality::parse(value))
        })
        .unwrap_or(Quality::MAX);

    Some(PreferenceToken {
        dimension,
        token,
        quality,
    })
}

/// The three client preference lists of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPreferences {
    pub media_types: PreferenceList,
    pub charsets: PreferenceList,
    pub languages: PreferenceList,
}

impl ClientPreferences {
    /// Parse from the three raw header values.
    pub fn parse(
        accept: Option<&str>,
        accept_charset: Option<&str>,
        accept_language: Option<&str>,
    ) -> Self {
        Self {
            media_types: PreferenceList::parse(Dimension::MediaType, accept),
            charsets: PreferenceList::parse(Dimension::Charset, accept_charset),
            languages: PreferenceList::parse(Dimension::Language, accept_language),
        }
    }
}

impl Default for ClientPreferences {
    fn default() -> Self {
        Self::parse(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &PreferenceList) -> Vec<(String, u16)> {
        list.iter()
            .map(|p| (p.token.to_string(), p.quality.millis()))
            .collect()
    }

    #[test]
    fn test_absent_header_is_wildcard() {
        let list = PreferenceList::parse(Dimension::MediaType, None);
        assert_eq!(tokens(&list), vec![("*/*".to_string(), 1000)]);

        let list = PreferenceList::parse(Dimension::Charset, None);
        assert_eq!(tokens(&list), vec![("*".to_string(), 1000)]);
    }

    #[test]
    fn test_empty_or_garbage_header_is_wildcard() {
        let list = PreferenceList::parse(Dimension::MediaType, Some(" , ;q=0.5, text"));
        assert_eq!(list, PreferenceList::wildcard(Dimension::MediaType));
    }

    #[test]
    fn test_orders_by_quality_then_appearance() {
        let list = PreferenceList::parse(
            Dimension::MediaType,
            Some("text/html;q=0.5, application/json, application/xml;q=0.9, text/plain"),
        );
        assert_eq!(
            tokens(&list),
            vec![
                ("application/json".to_string(), 1000),
                ("text/plain".to_string(), 1000),
                ("application/xml".to_string(), 900),
                ("text/html".to_string(), 500),
            ]
        );
    }

    #[test]
    fn test_ignores_other_parameters() {
        let list = PreferenceList::parse(
            Dimension::MediaType,
            Some("text/html;level=1;Q=0.3;foo=bar"),
        );
        assert_eq!(tokens(&list), vec![("text/html".to_string(), 300)]);
    }

    #[test]
    fn test_malformed_quality_is_zero() {
        let list = PreferenceList::parse(Dimension::Language, Some("en;q=high, fr;q=0.2"));
        assert_eq!(
            tokens(&list),
            vec![("fr".to_string(), 200), ("en".to_string(), 0)]
        );
    }
}

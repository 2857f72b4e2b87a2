//! Negotiable tokens: media types, charsets and languages.
//!
//! # Responsibilities
//! - Represent a `type/subtype` pair or a flat charset/language token
//! - Decide whether a server-side token satisfies a client-side range
//! - Carry server metadata (advertised flag, wildcard alias)
//!
//! # Design Decisions
//! - Tokens are lowercased once at construction; comparisons are plain `==`
//! - `*` is legal in either half of a media type
//! - Language ranges match by prefix (`en` covers `en-au`)

use std::fmt;

use crate::negotiation::quality::Quality;

/// The negotiation dimension a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// `Accept` / `Content-Type`.
    MediaType,
    /// `Accept-Charset`.
    Charset,
    /// `Accept-Language` / `Content-Language`.
    Language,
}

impl Dimension {
    /// Name of the request header carrying client preferences.
    pub fn header_name(self) -> &'static str {
        match self {
            Dimension::MediaType => "accept",
            Dimension::Charset => "accept-charset",
            Dimension::Language => "accept-language",
        }
    }
}

/// A lowercase negotiation token.
///
/// Media types always have a `secondary` (subtype) part; charsets and
/// languages never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    primary: String,
    secondary: Option<String>,
}

impl Token {
    /// Universal wildcard for the given dimension.
    pub fn wildcard(dimension: Dimension) -> Self {
        match dimension {
            Dimension::MediaType => Self::media_type("*", "*"),
            Dimension::Charset | Dimension::Language => Self::flat("*"),
        }
    }

    /// Build a `type/subtype` token.
    pub fn media_type(primary: &str, secondary: &str) -> Self {
        Self {
            primary: primary.trim().to_ascii_lowercase(),
            secondary: Some(secondary.trim().to_ascii_lowercase()),
        }
    }

    /// Build a charset or language token.
    pub fn flat(value: &str) -> Self {
        Self {
            primary: value.trim().to_ascii_lowercase(),
            secondary: None,
        }
    }

    /// Parse a bare token (no parameters) for a dimension.
    ///
    /// Returns `None` for empty input or a media type without a `/`
    /// (a lone `*` is accepted as `*/*`).
    pub fn parse(dimension: Dimension, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match dimension {
            Dimension::MediaType => {
                if raw == "*" {
                    return Some(Self::wildcard(dimension));
                }
                let (primary, secondary) = raw.split_once('/')?;
                if primary.trim().is_empty() || secondary.trim().is_empty() {
                    return None;
                }
                Some(Self::media_type(primary, secondary))
            }
            Dimension::Charset | Dimension::Language => Some(Self::flat(raw)),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    /// True if any part of the token is `*`.
    pub fn is_wildcard(&self) -> bool {
        self.primary == "*" || self.secondary.as_deref() == Some("*")
    }

    /// Whether this (server) token satisfies a client `range`.
    pub fn matches(&self, range: &Token) -> bool {
        match (&self.secondary, &range.secondary) {
            (Some(sub), Some(range_sub)) => {
                part_matches(&self.primary, &range.primary)
                    && part_matches(sub, range_sub)
            }
            (None, None) => {
                part_matches(&self.primary, &range.primary)
                    || self
                        .primary
                        .strip_prefix(range.primary.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            _ => false,
        }
    }
}

fn part_matches(a: &str, b: &str) -> bool {
    a == "*" || b == "*" || a == b
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.secondary {
            Some(sub) => write!(f, "{}/{}", self.primary, sub),
            None => f.write_str(&self.primary),
        }
    }
}

/// A token a representer declares it can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedToken {
    /// The token itself.
    pub token: Token,
    /// Server-side quality (`qs`).
    pub quality: Quality,
    /// Listed in `406` alternatives when true.
    pub advertised: bool,
    /// Concrete token reported instead of a wildcard match.
    pub alias: Option<Token>,
}

impl SupportedToken {
    pub fn new(token: Token, quality: Quality) -> Self {
        Self {
            token,
            quality,
            advertised: false,
            alias: None,
        }
    }

    /// Mark this token as visible in negotiation-failure listings.
    pub fn advertised(mut self) -> Self {
        self.advertised = true;
        self
    }

    /// Report `alias` when this token matched through a wildcard.
    pub fn with_alias(mut self, alias: Token) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Concrete token to report after matching the client's `range`.
    ///
    /// A wildcard supported token resolves to its alias. Without one, a
    /// media type adopts the client range if that is concrete; charsets and
    /// languages stay wildcards.
    pub fn resolve(&self, range: &Token) -> Token {
        if !self.token.is_wildcard() {
            return self.token.clone();
        }
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        if self.token.secondary.is_some() && !range.is_wildcard() {
            return range.clone();
        }
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_matching() {
        let json = Token::media_type("application", "json");
        assert!(json.matches(&Token::media_type("application", "json")));
        assert!(json.matches(&Token::media_type("application", "*")));
        assert!(json.matches(&Token::wildcard(Dimension::MediaType)));
        assert!(!json.matches(&Token::media_type("text", "json")));

        let any = Token::wildcard(Dimension::MediaType);
        assert!(any.matches(&Token::media_type("text", "plain")));
    }

    #[test]
    fn test_language_prefix_matching() {
        let en_au = Token::flat("en-AU");
        assert!(en_au.matches(&Token::flat("en")));
        assert!(en_au.matches(&Token::flat("en-au")));
        assert!(!en_au.matches(&Token::flat("e")));
        assert!(!Token::flat("en").matches(&Token::flat("en-au")));
        assert!(Token::flat("fr").matches(&Token::flat("*")));
    }

    #[test]
    fn test_parse_rejects_bare_type() {
        assert!(Token::parse(Dimension::MediaType, "text").is_none());
        assert!(Token::parse(Dimension::MediaType, "text/").is_none());
        assert_eq!(
            Token::parse(Dimension::MediaType, "*"),
            Some(Token::wildcard(Dimension::MediaType))
        );
        assert_eq!(
            Token::parse(Dimension::MediaType, "Text/HTML").map(|t| t.to_string()),
            Some("text/html".to_string())
        );
    }

    #[test]
    fn test_resolve_prefers_alias() {
        let catch_all = SupportedToken::new(Token::wildcard(Dimension::MediaType), Quality::MAX)
            .with_alias(Token::media_type("application", "json"));
        let plain = Token::media_type("text", "plain");
        assert_eq!(catch_all.resolve(&plain).to_string(), "application/json");

        let bare = SupportedToken::new(Token::wildcard(Dimension::MediaType), Quality::MAX);
        assert_eq!(bare.resolve(&plain).to_string(), "text/plain");
        assert_eq!(
            bare.resolve(&Token::wildcard(Dimension::MediaType)).to_string(),
            "*/*"
        );

        let any_language = SupportedToken::new(Token::flat("*"), Quality::MAX);
        assert!(any_language.resolve(&Token::flat("fr")).is_wildcard());
    }
}

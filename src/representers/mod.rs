//! Built-in representers.
//!
//! # Registration Order
//! ```text
//! application-specific representers (registered first)
//!     → JsonRepresenter   maps, lists, objects
//!     → YamlRepresenter   every model
//!     → XmlRepresenter    every model
//! ```
//!
//! # Design Decisions
//! - Each declares a `*/*` entry at `q=0.001` aliased to its main type, so
//!   some representation is produced whenever any representer applies
//! - Output is always UTF-8; `utf-8` is the only charset offered
//! - Catch-all representers must be registered after specific ones

pub mod json;
pub mod xml;
pub mod yaml;

pub use json::JsonRepresenter;
pub use xml::XmlRepresenter;
pub use yaml::YamlRepresenter;

use crate::negotiation::{Quality, SupportedToken, Token};

/// The only charset the built-in encoders produce.
pub(crate) fn utf8() -> SupportedToken {
    SupportedToken::new(Token::flat("utf-8"), Quality::MAX)
}

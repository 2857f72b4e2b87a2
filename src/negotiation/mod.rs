//! Content negotiation subsystem.
//!
//! # Data Flow
//! ```text
//! Request headers (Accept, Accept-Charset, Accept-Language)
//!     → accept.rs (parse into quality-ordered preference lists)
//!     → representer.rs (per-representer best match per dimension)
//!     → manager.rs (score = product of weights, pick the highest)
//!     → Variant (media type, charset, language) → render
//!
//! No representer scores above zero:
//!     manager.rs → 406 with Vary / TCN / Alternates
//! ```
//!
//! # Design Decisions
//! - Qualities are fixed-point (per-mille), never floats
//! - Negotiation is pure: no I/O, no shared mutable state
//! - Registration order breaks every tie

pub mod accept;
pub mod manager;
pub mod media_type;
pub mod model;
pub mod quality;
pub mod representer;

pub use accept::{ClientPreferences, PreferenceList, PreferenceToken};
pub use manager::{RepresentationManager, Selection};
pub use media_type::{Dimension, SupportedToken, Token};
pub use model::{Model, ModelShape};
pub use quality::Quality;
pub use representer::{BestMatch, MatchResult, Representer, RepresenterDescriptor, Variant};

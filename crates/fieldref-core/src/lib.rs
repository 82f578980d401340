//! Backend-independent half of the locator resolution engine.
//!
//! Everything in this crate is pure string/data manipulation: parsing field
//! descriptors, looking up selector templates in pattern sets, substituting
//! runtime placeholders and composing container chains. Probing the live page
//! is the engine crate's job.

pub mod chain;
pub mod descriptor;
pub mod pattern;
pub mod substitute;

pub use chain::{Candidate, ResolvedLocator};
pub use descriptor::{FieldDescriptor, ParseError};
pub use pattern::{ConfigError, PatternSet, PatternSetRegistry};
pub use substitute::Bindings;

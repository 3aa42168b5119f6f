//! Declarative field validation
//!
//! A [`ValidationGroup`] maps request fields to rule descriptors. Groups are
//! compiled once into flat invocation lists, then evaluated per request to
//! produce a [`ResultSet`].
//!
//! # Example
//!
//! ```rust
//! use tideway_validator::{RuleLibrary, ValidationGroup, ruleset};
//! use tideway_validator::extract::StaticFields;
//! use tideway_validator::validation::{FieldSource, evaluate};
//!
//! # tokio_test::block_on(async {
//! let v = RuleLibrary::new();
//! let group = ValidationGroup::new()
//!     .query("q", ruleset![v.is_alpha(), [v.contains(), "abc"]])
//!     .compile()
//!     .unwrap();
//!
//! let mut fields = StaticFields::new().with(FieldSource::Query, "q", "abcdef");
//! let result = evaluate(&[group], &mut fields).await.unwrap();
//! assert!(!result.has_error());
//! # });
//! ```

mod aggregator;
mod descriptor;
mod executor;
mod group;
mod parser;
mod result;

pub use aggregator::evaluate;
pub use descriptor::{Message, MessageFactory, RuleDescriptor, message};
pub(crate) use descriptor::message_factory;
pub use executor::{FieldContext, FieldFailure, FieldOutcome, execute};
pub use group::{CompiledField, CompiledGroup, FieldSource, ValidationGroup};
pub use parser::{DescriptorError, RuleInvocation, parse};
pub use result::{FieldError, ResultSet};

//! Axum integration: the validation layer, its builder and the
//! [`ResultSet`](crate::ResultSet) extractor.
//!
//! Requests run through every declared group. If any field fails, the layer
//! answers `400 Bad Request` with the failure messages (one per line) and
//! the handler never runs. Otherwise the request continues with the result
//! stored in its extensions.

mod builder;
mod extractor;
mod layer;

pub use builder::{ValidationBuilder, validation};
pub use layer::{OnResult, ValidationLayer, ValidationService};

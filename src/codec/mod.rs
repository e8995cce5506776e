//! Conversion between payload bytes and typed field values.
//!
//! [`decode`] splits a payload along a [`crate::Layout`] and turns every present column into a
//! [`FieldValue`]; [`encode`] produces payloads in the same format. Both are pure functions of
//! the layout and their input, and may run concurrently on any number of threads.

mod decoder;
mod encoder;
mod value;

pub use decoder::{decode, decode_batch};
pub use encoder::encode;
pub use value::{DecodedField, FieldValue};

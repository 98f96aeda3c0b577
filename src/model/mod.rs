//! Person entity and its field rules
//!
//! A `Person` is the only resource served by this crate. The validator
//! here is pure; it never touches storage.

mod person;
mod validator;

pub use person::{Person, PERSON_ENTITY};
pub use validator::validate;

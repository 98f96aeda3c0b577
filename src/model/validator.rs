//! Field-presence rules for a person payload

use crate::errors::{ApiError, ApiResult};

use super::person::Person;

/// Check that `name` and `address` are both present.
///
/// Every missing field is reported, in declaration order.
pub fn validate(person: &Person) -> ApiResult<()> {
    let mut missing = Vec::new();

    if person.name.is_empty() {
        missing.push("name");
    }
    if person.address.is_empty() {
        missing.push("address");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::invalid_fields(missing))
    }
}

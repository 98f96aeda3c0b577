//! Sparse UPDATE builder
//!
//! Collects `(column, value)` pairs only for fields that carry a value.
//! The rendered SET clause and the bound values come from the same list,
//! so placeholder order and argument order cannot drift apart.

use crate::model::Person;

/// Builder for the SET clause of a sparse update
#[derive(Debug, Default)]
pub struct UpdateBuilder<'a> {
    assignments: Vec<(&'static str, &'a str)>,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    /// Builder holding the revisable fields of `person` (`name`, `address`)
    pub fn for_person(person: &'a Person) -> Self {
        let mut builder = Self::new();
        builder
            .set_if_present("name", &person.name)
            .set_if_present("address", &person.address);
        builder
    }

    /// Append `column = ?` unless `value` is empty
    pub fn set_if_present(&mut self, column: &'static str, value: &'a str) -> &mut Self {
        if !value.is_empty() {
            self.assignments.push((column, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    /// Rendered SET clause, e.g. `name = ?, address = ?`
    pub fn set_clause(&self) -> String {
        self.assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Values in placeholder order
    pub fn values(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.assignments.iter().map(|(_, value)| *value)
    }

    /// Full statement for `table`, keyed on `id`; the id binds last
    pub fn statement(&self, table: &str) -> String {
        format!("UPDATE {} SET {} WHERE id = ?", table, self.set_clause())
    }
}

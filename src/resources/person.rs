//! The `person` record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Field, FieldError, Record};

/// A stored person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub age: i64,
}

impl Person {
    pub fn new(id: u64, name: impl Into<String>, age: i64) -> Self {
        Self {
            id,
            name: name.into(),
            age,
        }
    }
}

/// Body of a create request. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    pub age: i64,
}

static FIELDS: [Field<Person>; 3] = [
    Field {
        name: "id",
        render: render_id,
        assign: None,
    },
    Field {
        name: "name",
        render: render_name,
        assign: Some(assign_name),
    },
    Field {
        name: "age",
        render: render_age,
        assign: Some(assign_age),
    },
];

fn render_id(p: &Person) -> String {
    p.id.to_string()
}

fn render_name(p: &Person) -> String {
    p.name.clone()
}

fn render_age(p: &Person) -> String {
    p.age.to_string()
}

fn assign_name(p: &mut Person, value: &Value) -> Result<(), FieldError> {
    let name = value.as_str().ok_or(FieldError {
        field: "name",
        expected: "a string",
    })?;
    p.name = name.to_string();
    Ok(())
}

fn assign_age(p: &mut Person, value: &Value) -> Result<(), FieldError> {
    p.age = value.as_i64().ok_or(FieldError {
        field: "age",
        expected: "an integer",
    })?;
    Ok(())
}

impl Record for Person {
    type Draft = PersonDraft;

    const NAME: &'static str = "person";

    fn fields() -> &'static [Field<Self>] {
        &FIELDS
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: PersonDraft) -> Self {
        Self {
            id,
            name: draft.name,
            age: draft.age,
        }
    }
}

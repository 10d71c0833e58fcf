//! Record shape description.
//!
//! A record type lists its fields once in a static table. Filtering,
//! business equality and partial updates are all driven from that table.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Name of the server-assigned identifier field.
pub const ID_FIELD: &str = "id";

/// One entry of a record's field table.
pub struct Field<R> {
    /// Field name as it appears in JSON and in query parameters.
    pub name: &'static str,
    /// Canonical string form used for filtering and equality.
    pub render: fn(&R) -> String,
    /// Writes a JSON value into the field. `None` marks the field immutable.
    pub assign: Option<fn(&mut R, &Value) -> Result<(), FieldError>>,
}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("mutable", &self.assign.is_some())
            .finish()
    }
}

/// A partial update carried a value of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` expects {expected}")]
pub struct FieldError {
    pub field: &'static str,
    pub expected: &'static str,
}

/// A typed record kept in a [`RecordStore`](crate::store::RecordStore) collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Client-supplied shape accepted on create (no identifier).
    type Draft: DeserializeOwned;

    /// Human readable name used in response messages.
    const NAME: &'static str;

    /// Static field table, identifier included.
    fn fields() -> &'static [Field<Self>];

    /// Server-assigned identifier.
    fn id(&self) -> u64;

    /// Build a stored record from a draft and its assigned identifier.
    fn from_draft(id: u64, draft: Self::Draft) -> Self;

    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Equality over every field except the identifier.
    fn business_eq(&self, other: &Self) -> bool {
        Self::fields()
            .iter()
            .filter(|f| f.name != ID_FIELD)
            .all(|f| (f.render)(self) == (f.render)(other))
    }

    /// Overwrite the fields present in `partial`.
    ///
    /// Immutable fields (the identifier) and unknown keys are skipped. On
    /// error the record is left as it was.
    fn merge(&mut self, partial: &Map<String, Value>) -> Result<(), FieldError> {
        let mut next = self.clone();
        for (name, value) in partial {
            if let Some(assign) = Self::field(name).and_then(|f| f.assign) {
                assign(&mut next, value)?;
            }
        }
        *self = next;
        Ok(())
    }
}

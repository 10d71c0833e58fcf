//! Equality filtering over record fields.
//!
//! # Design Decisions
//! - AND semantics across all parameters
//! - A parameter naming no field fails the match; there is no wildcard
//! - Empty parameters select everything

use std::collections::BTreeMap;

use crate::store::record::Record;

/// Field name → expected canonical string value.
pub type Params = BTreeMap<String, String>;

/// True when every parameter names a field rendering to exactly that value.
pub fn matches<R: Record>(record: &R, params: &Params) -> bool {
    params.iter().all(|(name, expected)| {
        R::field(name)
            .map(|field| (field.render)(record) == *expected)
            .unwrap_or(false)
    })
}

/// Keep the records matching `params`, preserving order.
pub fn filter<R: Record>(records: Vec<R>, params: &Params) -> Vec<R> {
    if params.is_empty() {
        return records;
    }
    records.into_iter().filter(|r| matches(r, params)).collect()
}

/// Positions of the records matching `params`.
pub fn positions<R: Record>(records: &[R], params: &Params) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(*r, params))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Person;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn people() -> Vec<Person> {
        vec![
            Person::new(1, "Kyle", 22),
            Person::new(2, "Lyle", 22),
            Person::new(3, "Kyle", 40),
        ]
    }

    #[test]
    fn test_empty_params_keep_everything() {
        assert_eq!(filter(people(), &Params::new()), people());
    }

    #[test]
    fn test_and_semantics() {
        let hits = filter(people(), &params(&[("name", "Kyle"), ("age", "40")]));
        assert_eq!(hits, vec![Person::new(3, "Kyle", 40)]);
    }

    #[test]
    fn test_identifier_rendering() {
        let hits = filter(people(), &params(&[("id", "2")]));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Lyle");
    }

    #[test]
    fn test_unknown_key_fails_match() {
        assert!(filter(people(), &params(&[("nickname", "K")])).is_empty());
        assert!(!matches(&people()[0], &params(&[("name", "Kyle"), ("x", "")])));
    }

    #[test]
    fn test_values_compare_exactly() {
        assert!(filter(people(), &params(&[("age", "022")])).is_empty());
        assert!(filter(people(), &params(&[("name", "kyle")])).is_empty());
    }

    #[test]
    fn test_positions() {
        assert_eq!(positions(&people(), &params(&[("age", "22")])), vec![0, 1]);
        assert!(positions(&people(), &params(&[("id", "9")])).is_empty());
    }
}

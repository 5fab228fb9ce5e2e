//! Server response envelope normalization.
//!
//! The backend wraps entity collections in one of several envelope shapes
//! depending on the serializer path it took. This module resolves the shape
//! by explicit pattern matching, in fixed priority order, and produces a
//! canonical ordered entity sequence. A payload that matches no shape
//! normalizes to an empty sequence; it is never an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// The wrapper shape detected around an entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// The payload itself is the sequence
    Bare,
    /// Counted-collection wrapper: `{"$values": [...]}`
    Values,
    /// Data wrapper: `{"data": [...]}`
    Data,
    /// Collection flattened into object keys, values are the entities
    KeyedMap,
    /// No strategy matched; the payload degraded to an empty sequence
    Unrecognized,
}

/// Outcome of normalizing one payload.
///
/// The engine performs no logging; callers inspect [`Normalized::shape`] and
/// [`Normalized::skipped`] and emit diagnostics at the I/O layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    /// Decoded entities, in payload order
    pub entities: Vec<T>,
    /// Which envelope strategy matched
    pub shape: EnvelopeShape,
    /// Items present in the envelope that failed to decode as `T`
    pub skipped: usize,
}

impl<T> Normalized<T> {
    /// Whether the payload shape matched none of the known envelopes.
    pub fn is_unrecognized(&self) -> bool {
        self.shape == EnvelopeShape::Unrecognized
    }
}

/// Normalize an arbitrary decoded payload into an entity sequence.
///
/// Strategies, in priority order:
/// 1. the payload is already an array;
/// 2. an object carrying a `$values` array;
/// 3. an object carrying a `data` array;
/// 4. an object whose property values each satisfy `looks_like` (at least
///    one value) — the flattened-object-map fallback;
/// 5. otherwise an empty sequence tagged [`EnvelopeShape::Unrecognized`].
///
/// Items that match the envelope but fail to decode as `T` are skipped and
/// counted, never raised.
pub fn normalize<T, F>(payload: Value, looks_like: F) -> Normalized<T>
where
    T: DeserializeOwned,
    F: Fn(&Value) -> bool,
{
    let (items, shape) = extract_items(payload, &looks_like);

    let mut entities = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match serde_json::from_value::<T>(item) {
            Ok(entity) => entities.push(entity),
            Err(_) => skipped += 1,
        }
    }

    Normalized {
        entities,
        shape,
        skipped,
    }
}

fn extract_items<F>(payload: Value, looks_like: &F) -> (Vec<Value>, EnvelopeShape)
where
    F: Fn(&Value) -> bool,
{
    match payload {
        Value::Array(items) => (items, EnvelopeShape::Bare),
        Value::Object(mut map) => {
            if let Some(items) = take_array(&mut map, "$values") {
                return (items, EnvelopeShape::Values);
            }
            if let Some(items) = take_array(&mut map, "data") {
                return (items, EnvelopeShape::Data);
            }
            if !map.is_empty() && map.values().all(looks_like) {
                let items = map.into_iter().map(|(_, value)| value).collect();
                return (items, EnvelopeShape::KeyedMap);
            }
            (Vec::new(), EnvelopeShape::Unrecognized)
        }
        _ => (Vec::new(), EnvelopeShape::Unrecognized),
    }
}

/// Remove `key` from the map only when its value is an array.
fn take_array(map: &mut serde_json::Map<String, Value>, key: &str) -> Option<Vec<Value>> {
    if !matches!(map.get(key), Some(Value::Array(_))) {
        return None;
    }
    match map.remove(key) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Group, Record};
    use serde_json::json;

    fn record_items() -> Value {
        json!([
            {"id": 1, "title": "Kind of Blue", "price": 19.99, "stock": 5},
            {"id": 2, "title": "A Love Supreme", "price": 21.50, "stock": 2},
        ])
    }

    #[test]
    fn bare_sequence() {
        let result = normalize::<Record, _>(record_items(), Record::looks_like);
        assert_eq!(result.shape, EnvelopeShape::Bare);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.entities[0].title, "Kind of Blue");
        assert_eq!(result.entities[1].id, 2);
    }

    #[test]
    fn values_wrapper() {
        let payload = json!({"$id": "1", "$values": record_items()});
        let result = normalize::<Record, _>(payload, Record::looks_like);
        assert_eq!(result.shape, EnvelopeShape::Values);
        assert_eq!(result.entities.len(), 2);
    }

    #[test]
    fn data_wrapper() {
        let payload = json!({"data": record_items(), "total": 2});
        let result = normalize::<Record, _>(payload, Record::looks_like);
        assert_eq!(result.shape, EnvelopeShape::Data);
        assert_eq!(result.entities.len(), 2);
    }

    #[test]
    fn equivalent_wrappings_normalize_identically() {
        let bare = normalize::<Record, _>(record_items(), Record::looks_like);
        let values =
            normalize::<Record, _>(json!({"$values": record_items()}), Record::looks_like);
        let data = normalize::<Record, _>(json!({"data": record_items()}), Record::looks_like);

        assert_eq!(bare.entities, values.entities);
        assert_eq!(bare.entities, data.entities);
    }

    #[test]
    fn values_takes_priority_over_data() {
        let payload = json!({
            "$values": record_items(),
            "data": [{"id": 9, "title": "decoy", "price": 1.0, "stock": 1}],
        });
        let result = normalize::<Record, _>(payload, Record::looks_like);
        assert_eq!(result.shape, EnvelopeShape::Values);
        assert_eq!(result.entities.len(), 2);
    }

    #[test]
    fn non_array_values_property_falls_through() {
        // `$values` holding a scalar does not match strategy 2
        let payload = json!({"$values": 42, "data": record_items()});
        let result = normalize::<Record, _>(payload, Record::looks_like);
        assert_eq!(result.shape, EnvelopeShape::Data);
        assert_eq!(result.entities.len(), 2);
    }

    #[test]
    fn keyed_map_fallback() {
        let payload = json!({
            "a": {"id": 1, "title": "Kind of Blue", "price": 19.99, "stock": 5},
            "b": {"id": 2, "title": "A Love Supreme", "price": 21.50, "stock": 2},
        });
        let result = normalize::<Record, _>(payload, Record::looks_like);
        assert_eq!(result.shape, EnvelopeShape::KeyedMap);
        assert_eq!(result.entities.len(), 2);
    }

    #[test]
    fn keyed_map_requires_every_value_entity_shaped() {
        let payload = json!({
            "a": {"id": 1, "title": "Kind of Blue", "price": 19.99, "stock": 5},
            "meta": {"count": 2},
        });
        let result = normalize::<Record, _>(payload, Record::looks_like);
        assert!(result.is_unrecognized());
        assert!(result.entities.is_empty());
    }

    #[test]
    fn malformed_payloads_degrade_to_empty() {
        for payload in [json!({}), json!(null), json!(42), json!("records")] {
            let result = normalize::<Record, _>(payload, Record::looks_like);
            assert!(result.is_unrecognized());
            assert!(result.entities.is_empty());
            assert_eq!(result.skipped, 0);
        }
    }

    #[test]
    fn undecodable_items_are_skipped_not_raised() {
        let payload = json!([
            {"id": 1, "title": "Kind of Blue", "price": 19.99, "stock": 5},
            {"id": "not-a-number", "title": 3},
        ]);
        let result = normalize::<Record, _>(payload, Record::looks_like);
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn groups_use_their_own_predicate() {
        let payload = json!({
            "g1": {"id": 1, "name": "Miles Davis"},
            "g2": {"id": 2, "name": "John Coltrane"},
        });
        let result = normalize::<Group, _>(payload, Group::looks_like);
        assert_eq!(result.shape, EnvelopeShape::KeyedMap);
        assert_eq!(result.entities.len(), 2);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_json() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                "[a-z$]{0,8}".prop_map(Value::from),
            ];
            leaf.prop_recursive(4, 64, 8, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
                    prop::collection::btree_map("[a-z$]{0,8}", inner, 0..6)
                        .prop_map(|m| Value::Object(m.into_iter().collect())),
                ]
            })
        }

        proptest! {
            #[test]
            fn prop_never_panics(payload in arb_json()) {
                let result = normalize::<Record, _>(payload, Record::looks_like);
                // Shape is always one of the closed set, entities decode or skip
                prop_assert!(result.entities.len() + result.skipped <= 64);
            }

            #[test]
            fn prop_wrappings_agree(ids in prop::collection::vec(1i64..1000, 0..10)) {
                let items: Vec<Value> = ids
                    .iter()
                    .map(|id| serde_json::json!({
                        "id": id, "title": format!("r{id}"), "price": 1.0, "stock": 1
                    }))
                    .collect();
                let arr = Value::Array(items);

                let bare = normalize::<Record, _>(arr.clone(), Record::looks_like);
                let values = normalize::<Record, _>(
                    serde_json::json!({"$values": arr.clone()}),
                    Record::looks_like,
                );
                let data = normalize::<Record, _>(
                    serde_json::json!({"data": arr}),
                    Record::looks_like,
                );

                prop_assert_eq!(&bare.entities, &values.entities);
                prop_assert_eq!(&bare.entities, &data.entities);
            }
        }
    }
}

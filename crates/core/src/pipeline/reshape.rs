//! Conversion between arrays of `{k, v}` pairs and mappings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A `{k, v}` pair as emitted by joins and key/value projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair<K, V> {
    /// Key.
    pub k: K,
    /// Value.
    pub v: V,
}

impl<K, V> Pair<K, V> {
    /// Creates a pair.
    pub const fn new(k: K, v: V) -> Self {
        Self { k, v }
    }
}

/// Collects pairs into a mapping. A repeated key keeps its last value.
pub fn pairs_to_map<K, V, I>(pairs: I) -> BTreeMap<K, V>
where
    K: Ord,
    I: IntoIterator<Item = Pair<K, V>>,
{
    pairs.into_iter().map(|pair| (pair.k, pair.v)).collect()
}

/// Spreads a mapping back into pairs, in key order.
pub fn map_to_pairs<K, V>(map: BTreeMap<K, V>) -> Vec<Pair<K, V>> {
    map.into_iter().map(|(k, v)| Pair::new(k, v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pairs_give_empty_map() {
        let map: BTreeMap<String, u32> = pairs_to_map(Vec::new());
        assert!(map.is_empty());
    }

    #[test]
    fn test_last_value_wins() {
        let map = pairs_to_map(vec![Pair::new("a", 1), Pair::new("b", 2), Pair::new("a", 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], 3);
        assert_eq!(map["b"], 2);
    }

    #[test]
    fn test_map_to_pairs_in_key_order() {
        let map = BTreeMap::from([("l2", "Done"), ("l1", "Todo")]);
        assert_eq!(
            map_to_pairs(map),
            vec![Pair::new("l1", "Todo"), Pair::new("l2", "Done")]
        );
    }

    #[test]
    fn test_pair_serde_shape() {
        let pair = Pair::new("s1".to_string(), 7);
        let value = serde_json::to_value(&pair).unwrap();
        assert_eq!(value, serde_json::json!({"k": "s1", "v": 7}));
    }
}

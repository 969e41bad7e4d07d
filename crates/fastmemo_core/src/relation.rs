//! Relation list codec.
//!
//! # Responsibility
//! - Convert between an ordered list of related memo ids and the single
//!   text column that stores it.
//!
//! # Invariants
//! - `decode(encode(ids)) == ids` for ids that are non-empty, already
//!   trimmed and comma-free. Order and duplicates are preserved.
//! - `encode(&[]) == ""` and `decode("")` is an empty list.
//! - Ids containing `,` cannot be represented; they split on decode.

const SEPARATOR: char = ',';

/// Joins related ids into their stored text form.
pub fn encode<S: AsRef<str>>(ids: &[S]) -> String {
    let mut encoded = String::new();
    for (index, id) in ids.iter().enumerate() {
        if index > 0 {
            encoded.push(SEPARATOR);
        }
        encoded.push_str(id.as_ref());
    }
    encoded
}

/// Splits stored text into related ids, trimming entries and dropping blanks.
pub fn decode(text: &str) -> Vec<String> {
    text.split(SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};

    #[test]
    fn empty_list_encodes_to_empty_string() {
        assert_eq!(encode::<String>(&[]), "");
        assert!(decode("").is_empty());
    }

    #[test]
    fn round_trip_preserves_order_and_duplicates() {
        let ids = vec!["b", "a", "b", "c9f1"];
        assert_eq!(encode(&ids), "b,a,b,c9f1");
        assert_eq!(decode(&encode(&ids)), ids);
    }

    #[test]
    fn decode_trims_and_drops_blank_entries() {
        assert_eq!(decode(" a ,, b,  ,c "), vec!["a", "b", "c"]);
        assert!(decode(" , ,").is_empty());
    }

    #[test]
    fn comma_inside_entry_splits_on_decode() {
        let encoded = encode(&["x,y"]);
        assert_eq!(decode(&encoded), vec!["x", "y"]);
    }
}

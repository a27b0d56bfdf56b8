use surrealdb::RecordId;

use crate::errors::{Error, Result};

/// Parses a `table:key` id as carried in JWT claims back into a record id.
pub fn get_record_id_from_string(val: &str) -> Result<RecordId> {
    let mut id_part = val.trim().splitn(2, ':');
    let table = id_part.next().ok_or(Error::InvalidToken)?;
    let key = id_part.next().ok_or(Error::InvalidToken)?;
    Ok(RecordId::from_table_key(table, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let rid = RecordId::from_table_key("users", "abc123");
        let parsed = get_record_id_from_string(&rid.to_string()).expect("Failed to parse");
        assert_eq!(parsed, rid);
    }

    #[test]
    fn test_missing_key_is_rejected() {
        assert!(get_record_id_from_string("garbage").is_err());
    }
}

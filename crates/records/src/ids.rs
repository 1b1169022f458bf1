use std::collections::HashSet;

use crate::error::{RecordError, Result};
use crate::record::RecordId;

/// Parse a list of record ids separated by whitespace and/or commas.
///
/// Duplicates are dropped keeping the first occurrence. Any token that is not
/// a plain non-negative integer fails the whole list.
pub fn parse_id_list(text: &str) -> Result<Vec<RecordId>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    let mut invalid = Vec::new();

    let tokens = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty());
    for token in tokens {
        let parsed = token
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then(|| token.parse::<RecordId>().ok())
            .flatten();
        match parsed {
            Some(id) => {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            None => invalid.push(token),
        }
    }

    if !invalid.is_empty() {
        return Err(RecordError::invalid_ids(invalid));
    }
    if ids.is_empty() {
        return Err(RecordError::NoIds);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_mixed_separators() {
        assert_eq!(parse_id_list("3000 3001,3002").unwrap(), vec![3000, 3001, 3002]);
        assert_eq!(parse_id_list(" 7 ,\n 8\t").unwrap(), vec![7, 8]);
    }

    #[test]
    fn drops_duplicates_keeping_first() {
        assert_eq!(parse_id_list("5, 3, 5, 3 1").unwrap(), vec![5, 3, 1]);
    }

    #[test]
    fn reports_every_bad_token() {
        let err = parse_id_list("1000 abc -4 1001 +2").unwrap_err();
        match err {
            RecordError::InvalidIds(tokens) => assert_eq!(tokens, vec!["abc", "-4", "+2"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_id_list(" , ,"), Err(RecordError::NoIds)));
        assert!(matches!(parse_id_list(""), Err(RecordError::NoIds)));
    }
}

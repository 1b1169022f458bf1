use quest_imgdir::Node;
use serde::Serialize;

use crate::record::RecordId;

/// One line of the record listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordEntry {
    pub id: RecordId,
    /// Display name from the definition document; empty when unset
    pub name: String,
}

/// Every top-level record directory with a numeric name, sorted by id.
///
/// Only canonical decimal names count: `"007"`, `"+7"` or `"-5"` are skipped
/// because id-based lookups would never reach them. When a name repeats, the
/// first directory wins, matching [`Node::find_child`].
pub fn list_records(root: &Node) -> Vec<RecordEntry> {
    let mut entries: Vec<RecordEntry> = root
        .children()
        .filter_map(|child| {
            let id = parse_record_id(child.name())?;
            Some(RecordEntry {
                id,
                name: child.string("name").unwrap_or_default().to_string(),
            })
        })
        .collect();
    entries.sort_by_key(|entry| entry.id);
    entries.dedup_by_key(|entry| entry.id);
    entries
}

fn parse_record_id(name: &str) -> Option<RecordId> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let id: RecordId = name.parse().ok()?;
    (id.to_string() == name).then_some(id)
}

/// Keep entries whose id or lowercased name contains the query.
///
/// The query is trimmed and lowercased first; an empty query keeps all.
pub fn filter_records<'a>(listing: &'a [RecordEntry], query: &str) -> Vec<&'a RecordEntry> {
    let query = query.trim().to_lowercase();
    listing
        .iter()
        .filter(|entry| {
            query.is_empty()
                || entry.id.to_string().contains(&query)
                || entry.name.to_lowercase().contains(&query)
        })
        .collect()
}

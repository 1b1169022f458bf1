use std::fmt;

use quest_imgdir::Node;
use serde::Serialize;

use crate::codec::{find_record, record_name};
use crate::error::{RecordError, Result};
use crate::record::RecordId;

/// What a clone did to the target id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloneOutcome {
    /// Target did not exist and now holds a copy of the source
    Created,
    /// Target existed and was replaced by a copy of the source
    Overwritten,
    /// Source and target are the same id; nothing changed
    EditedInPlace,
}

impl fmt::Display for CloneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Created => "created",
            Self::Overwritten => "overwritten",
            Self::EditedInPlace => "edited in place",
        };
        f.write_str(text)
    }
}

/// Duplicate the record directory `source` under the name `target`.
///
/// An existing `target` is replaced without asking; confirming that is the
/// caller's business. The copy is appended after the last top-level entry.
pub fn clone_record(root: &mut Node, source: RecordId, target: RecordId) -> Result<CloneOutcome> {
    let Some(original) = find_record(root, source) else {
        return Err(RecordError::SourceNotFound(source));
    };

    if source == target {
        log::debug!("Clone {source} -> {target}: same id, editing in place");
        return Ok(CloneOutcome::EditedInPlace);
    }

    let mut copy = original.clone();
    copy.set_name(record_name(target));

    let outcome = if root.remove_child(&record_name(target)).is_some() {
        CloneOutcome::Overwritten
    } else {
        CloneOutcome::Created
    };
    root.push_child(copy);

    log::debug!("Clone {source} -> {target}: {outcome}");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quest_imgdir::{Document, Leaf};

    fn root() -> Node {
        let mut root = Node::new("Check.img");
        let base = root.ensure_child("1000");
        base.push_leaf(Leaf::string("name", "Base"));
        base.ensure_child("0").push_leaf(Leaf::int("npc", 2100));
        root.ensure_child("2000").push_leaf(Leaf::string("name", "Old target"));
        root.ensure_child("3000");
        root
    }

    #[test]
    fn missing_source_is_an_error() {
        let mut root = root();
        let err = clone_record(&mut root, 42, 43).unwrap_err();
        assert!(matches!(err, RecordError::SourceNotFound(42)));
        assert!(root.find_child("43").is_none());
    }

    #[test]
    fn self_clone_changes_nothing() {
        let mut root = root();
        let before = Document::from_root(root.clone()).to_xml_string().unwrap();
        assert_eq!(clone_record(&mut root, 1000, 1000).unwrap(), CloneOutcome::EditedInPlace);
        let after = Document::from_root(root).to_xml_string().unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn clone_to_new_id_appends_renamed_copy() {
        let mut root = root();
        assert_eq!(clone_record(&mut root, 1000, 5000).unwrap(), CloneOutcome::Created);
        let names: Vec<_> = root.children().map(Node::name).collect();
        assert_eq!(names, vec!["1000", "2000", "3000", "5000"]);

        let copy = root.find_child("5000").unwrap();
        let original = root.find_child("1000").unwrap();
        assert_eq!(copy.entries(), original.entries());
    }

    #[test]
    fn clone_over_existing_id_replaces_it() {
        let mut root = root();
        assert_eq!(clone_record(&mut root, 1000, 2000).unwrap(), CloneOutcome::Overwritten);
        let targets: Vec<_> = root.children().filter(|c| c.name() == "2000").collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].string("name"), Some("Base"));
        assert_eq!(
            targets[0].find_child("0").and_then(|s| s.int("npc")),
            Some(2100)
        );
    }

    #[test]
    fn copies_are_independent() {
        let mut root = root();
        clone_record(&mut root, 1000, 5000).unwrap();
        root.find_child_mut("5000")
            .unwrap()
            .push_leaf(Leaf::int("order", 1));
        assert_eq!(root.find_child("1000").and_then(|q| q.int("order")), None);
    }
}

use std::fmt;

use quest_imgdir::Node;
use serde::Serialize;

use crate::codec::record_name;
use crate::record::RecordId;

/// Whether a delete found anything to remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    Removed,
    NotPresent,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Removed => "removed",
            Self::NotPresent => "not present",
        })
    }
}

/// Detach the top-level record directory named `id`, if there is one.
pub fn delete_record(root: &mut Node, id: RecordId) -> DeleteOutcome {
    match root.remove_child(&record_name(id)) {
        Some(_) => {
            log::debug!("Deleted record {id}");
            DeleteOutcome::Removed
        }
        None => DeleteOutcome::NotPresent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quest_imgdir::{Document, Leaf};

    fn root() -> Node {
        let mut root = Node::new("Act.img");
        root.ensure_child("1000").ensure_child("1").push_leaf(Leaf::int("exp", 10));
        root.ensure_child("1001");
        root
    }

    #[test]
    fn removes_present_record() {
        let mut root = root();
        assert_eq!(delete_record(&mut root, 1000), DeleteOutcome::Removed);
        let names: Vec<_> = root.children().map(Node::name).collect();
        assert_eq!(names, vec!["1001"]);
    }

    #[test]
    fn absent_record_leaves_document_untouched() {
        let mut root = root();
        let before = Document::from_root(root.clone()).to_xml_string().unwrap();
        assert_eq!(delete_record(&mut root, 9999), DeleteOutcome::NotPresent);
        let after = Document::from_root(root).to_xml_string().unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn only_top_level_directories_match() {
        let mut root = root();
        assert_eq!(delete_record(&mut root, 1), DeleteOutcome::NotPresent);
        assert!(root.find_child("1000").and_then(|q| q.find_child("1")).is_some());
    }
}

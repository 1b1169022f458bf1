use std::fmt;

use quest_imgdir::Node;
use serde::{Deserialize, Serialize};

use crate::pairs::PairKind;
use crate::record::{Pair, RecordId};

/// Stage directory holding start-of-quest data
pub const START_STAGE: &str = "0";
/// Stage directory holding completion data
pub const END_STAGE: &str = "1";

/// The three parallel documents a quest is split across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Definition,
    Requirements,
    Rewards,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [Self::Definition, Self::Requirements, Self::Rewards];

    /// Short label used in user-facing reports
    pub fn label(self) -> &'static str {
        match self {
            Self::Definition => "QuestInfo",
            Self::Requirements => "Check",
            Self::Rewards => "Act",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Definition => "QuestInfo.img.xml",
            Self::Requirements => "Check.img.xml",
            Self::Rewards => "Act.img.xml",
        }
    }

    /// Name given to the root directory of a freshly created document
    pub fn root_name(self) -> &'static str {
        match self {
            Self::Definition => "QuestInfo.img",
            Self::Requirements => "Check.img",
            Self::Rewards => "Act.img",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extraction and application of one record shape against a document root.
///
/// `extract` never fails: missing directories and malformed leaves produce
/// the record's defaults. `apply` creates the record directory if needed.
pub trait RecordCodec {
    type Record;

    const KIND: DocumentKind;

    fn extract(root: &Node, id: RecordId) -> Self::Record;

    fn apply(root: &mut Node, id: RecordId, record: &Self::Record);
}

pub(crate) fn record_name(id: RecordId) -> String {
    id.to_string()
}

pub(crate) fn find_record(root: &Node, id: RecordId) -> Option<&Node> {
    root.find_child(&record_name(id))
}

pub(crate) fn ensure_record(root: &mut Node, id: RecordId) -> &mut Node {
    root.ensure_child(&record_name(id))
}

/// Read the indexed slots (`0`, `1`, ...) of a list directory. Slots missing
/// either integer are skipped.
pub(crate) fn read_slots(list: &Node, kind: PairKind) -> Vec<Pair> {
    list.children()
        .filter_map(|slot| Some((slot.int("id")?, slot.int(kind.value_leaf())?)))
        .collect()
}

/// Build a list directory whose slots are named by zero-based position.
pub(crate) fn build_slots(
    name: &str,
    kind: PairKind,
    pairs: impl IntoIterator<Item = Pair>,
) -> Node {
    let mut list = Node::new(name);
    for (idx, (id, value)) in pairs.into_iter().enumerate() {
        let slot = list.ensure_child(&idx.to_string());
        slot.set_int("id", id);
        slot.set_int(kind.value_leaf(), value);
    }
    list
}

/// Detach every child directory called `name`; true if any was present.
pub(crate) fn remove_all_children(node: &mut Node, name: &str) -> bool {
    let mut removed = false;
    while node.remove_child(name).is_some() {
        removed = true;
    }
    removed
}

/// Tag of a directory element
pub const DIR_TAG: &str = "imgdir";

/// Typed leaf kinds understood by the record codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    String,
    Int,
}

impl LeafKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            _ => None,
        }
    }
}

/// Named terminal value.
///
/// The value is kept as the raw attribute text so that a malformed integer
/// survives a load/save cycle untouched; typed access goes through
/// [`Leaf::as_int`] and [`Leaf::as_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub name: String,
    pub value: String,
}

impl Leaf {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: LeafKind::String,
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Self {
            kind: LeafKind::Int,
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// Integer value, or `None` for string leaves and unparseable text
    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            LeafKind::Int => self.value.trim().parse().ok(),
            LeafKind::String => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.kind {
            LeafKind::String => Some(&self.value),
            LeafKind::Int => None,
        }
    }
}

/// Element the typed model does not interpret (`float`, `vector`, `canvas`,
/// leaves with unexpected attributes, ...). Kept for round-trips.
///
/// Text and CDATA content is kept as one unescaped string with surrounding
/// whitespace trimmed, written back ahead of the child elements; CDATA comes
/// back as escaped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<RawElement>,
}

impl RawElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One ordered slot inside a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Dir(Node),
    Leaf(Leaf),
    Raw(RawElement),
}

impl Entry {
    pub fn as_dir(&self) -> Option<&Node> {
        match self {
            Self::Dir(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    fn is_dir_named(&self, name: &str) -> bool {
        matches!(self, Self::Dir(node) if node.name == name)
    }
}

/// Named directory owning an ordered mix of leaves and child directories
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    name: String,
    entries: Vec<Entry>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entries(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct child directories in document order
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().filter_map(Entry::as_dir)
    }

    /// Direct typed leaves in document order
    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.entries.iter().filter_map(Entry::as_leaf)
    }

    /// Exact-name lookup among direct child directories (first match wins)
    pub fn find_child(&self, name: &str) -> Option<&Node> {
        self.children().find(|child| child.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Node> {
        let idx = self.child_index(name)?;
        Some(self.dir_at_mut(idx))
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.child_index(name).is_some()
    }

    /// Existing child directory with this name, or a freshly appended empty one
    pub fn ensure_child(&mut self, name: &str) -> &mut Node {
        let idx = match self.child_index(name) {
            Some(idx) => idx,
            None => {
                self.entries.push(Entry::Dir(Node::new(name)));
                self.entries.len() - 1
            }
        };
        self.dir_at_mut(idx)
    }

    pub fn push_child(&mut self, child: Node) -> &mut Node {
        self.entries.push(Entry::Dir(child));
        let idx = self.entries.len() - 1;
        self.dir_at_mut(idx)
    }

    /// Detach the first child directory with this name
    pub fn remove_child(&mut self, name: &str) -> Option<Node> {
        let idx = self.child_index(name)?;
        match self.entries.remove(idx) {
            Entry::Dir(node) => Some(node),
            _ => None,
        }
    }

    pub fn push_leaf(&mut self, leaf: Leaf) {
        self.entries.push(Entry::Leaf(leaf));
    }

    /// First leaf of the given kind and name
    pub fn leaf(&self, kind: LeafKind, name: &str) -> Option<&Leaf> {
        self.leaves()
            .find(|leaf| leaf.kind == kind && leaf.name == name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.leaf(LeafKind::String, name).and_then(Leaf::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.leaf(LeafKind::Int, name).and_then(Leaf::as_int)
    }

    /// Overwrite the first int leaf with this name in place, or append one
    pub fn set_int(&mut self, name: &str, value: i64) {
        let existing = self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Leaf(leaf) if leaf.kind == LeafKind::Int && leaf.name == name => Some(leaf),
            _ => None,
        });
        match existing {
            Some(leaf) => leaf.value = value.to_string(),
            None => self.push_leaf(Leaf::int(name, value)),
        }
    }

    /// Remove every leaf of the given kind and name; returns how many went
    pub fn remove_leaves(&mut self, kind: LeafKind, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            !matches!(entry, Entry::Leaf(leaf) if leaf.kind == kind && leaf.name == name)
        });
        before - self.entries.len()
    }

    /// Drop every non-directory entry, keeping child directories in order
    pub fn clear_leaves(&mut self) {
        self.entries.retain(|entry| matches!(entry, Entry::Dir(_)));
    }

    fn child_index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.is_dir_named(name))
    }

    fn dir_at_mut(&mut self, idx: usize) -> &mut Node {
        match &mut self.entries[idx] {
            Entry::Dir(node) => node,
            _ => unreachable!("entry {idx} is not a directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Node {
        let mut root = Node::new("Check.img");
        let quest = root.ensure_child("1000");
        quest.push_leaf(Leaf::string("name", "Tutorial"));
        quest.push_leaf(Leaf::int("area", 20));
        quest.ensure_child("0").push_leaf(Leaf::int("npc", 2000));
        root
    }

    #[test]
    fn ensure_child_reuses_existing_directory() {
        let mut root = sample();
        root.ensure_child("1000").push_leaf(Leaf::int("order", 3));
        assert_eq!(root.children().count(), 1);
        assert_eq!(root.find_child("1000").and_then(|q| q.int("order")), Some(3));
    }

    #[test]
    fn ensure_child_appends_missing_directory() {
        let mut root = sample();
        root.ensure_child("2000");
        let names: Vec<_> = root.children().map(Node::name).collect();
        assert_eq!(names, vec!["1000", "2000"]);
    }

    #[test]
    fn find_child_ignores_leaves_with_same_name() {
        let mut node = Node::new("q");
        node.push_leaf(Leaf::string("0", "log text"));
        assert!(node.find_child("0").is_none());
        node.ensure_child("0");
        assert!(node.find_child("0").is_some());
    }

    #[test]
    fn malformed_int_reads_as_absent() {
        let mut node = Node::new("q");
        node.push_leaf(Leaf {
            kind: LeafKind::Int,
            name: "area".to_string(),
            value: "abc".to_string(),
        });
        assert_eq!(node.int("area"), None);
        assert_eq!(node.leaf(LeafKind::Int, "area").map(|l| l.value.as_str()), Some("abc"));
    }

    #[test]
    fn set_int_overwrites_in_place() {
        let mut node = Node::new("0");
        node.push_leaf(Leaf::int("npc", 1));
        node.push_leaf(Leaf::int("lvmin", 10));
        node.set_int("npc", 9);
        node.set_int("lvmax", 50);
        let names: Vec<_> = node.leaves().map(|l| (l.name.as_str(), l.value.as_str())).collect();
        assert_eq!(names, vec![("npc", "9"), ("lvmin", "10"), ("lvmax", "50")]);
    }

    #[test]
    fn clear_leaves_keeps_directories() {
        let mut root = sample();
        let quest = root.find_child_mut("1000").unwrap();
        quest.entries.push(Entry::Raw(RawElement::new("float")));
        quest.clear_leaves();
        assert_eq!(quest.leaves().count(), 0);
        assert_eq!(quest.entries().len(), 1);
        assert!(quest.find_child("0").is_some());
    }

    #[test]
    fn remove_child_detaches_first_match() {
        let mut root = sample();
        let removed = root.remove_child("1000").expect("present");
        assert_eq!(removed.name(), "1000");
        assert!(root.remove_child("1000").is_none());
        assert!(root.is_empty());
    }
}

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::node::Node;
use crate::xml::{parse_document, write_document};

/// A loaded imgdir document. Owns its whole tree between load and save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Empty document whose root directory carries the given name
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root: Node::new(root_name),
        }
    }

    pub fn from_root(root: Node) -> Self {
        Self { root }
    }

    pub fn parse(text: &str) -> Result<Self> {
        parse_document(text).map(Self::from_root)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Load without failing: a missing or malformed file yields `None`.
    pub fn load(path: &Path) -> Option<Self> {
        if !path.is_file() {
            log::warn!("Document not found: {}", path.display());
            return None;
        }
        match Self::read(path) {
            Ok(doc) => {
                log::info!(
                    "Loaded {} ({} top-level entries)",
                    path.display(),
                    doc.root.entries().len()
                );
                Some(doc)
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}", path.display());
                None
            }
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn to_xml_string(&self) -> Result<String> {
        write_document(&self.root)
    }

    /// Serialize and overwrite `path` unconditionally.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_xml_string()?;
        fs::write(path, text)?;
        log::info!("Saved {}", path.display());
        Ok(())
    }
}

//! The three parallel documents of one editing session.

use std::fmt;
use std::path::{Path, PathBuf};

use quest_imgdir::{Document, Node};
use serde::Serialize;

use crate::clone::{clone_record, CloneOutcome};
use crate::codec::{DocumentKind, RecordCodec};
use crate::definition::DefinitionCodec;
use crate::delete::{delete_record, DeleteOutcome};
use crate::error::Result;
use crate::index::{list_records, RecordEntry};
use crate::record::{QuestRecord, RecordId};
use crate::requirements::RequirementsCodec;
use crate::rewards::RewardsCodec;

/// Where each of the three documents lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    pub definition: PathBuf,
    pub requirements: PathBuf,
    pub rewards: PathBuf,
}

impl DocumentPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            definition: dir.join(DocumentKind::Definition.default_file_name()),
            requirements: dir.join(DocumentKind::Requirements.default_file_name()),
            rewards: dir.join(DocumentKind::Rewards.default_file_name()),
        }
    }

    pub fn get(&self, kind: DocumentKind) -> &Path {
        match kind {
            DocumentKind::Definition => &self.definition,
            DocumentKind::Requirements => &self.requirements,
            DocumentKind::Rewards => &self.rewards,
        }
    }
}

/// One document handle; `document` is `None` when it failed to load
#[derive(Debug, Clone)]
pub struct DocumentSlot {
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub document: Option<Document>,
}

impl DocumentSlot {
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    fn root(&self) -> Option<&Node> {
        self.document.as_ref().map(Document::root)
    }

    fn root_mut(&mut self) -> Option<&mut Node> {
        self.document.as_mut().map(Document::root_mut)
    }
}

/// What happened in one document while saving or cloning one target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    Cloned(CloneOutcome),
    SourceMissing,
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveEntry {
    pub document: DocumentKind,
    /// `None` only for a document that was not loaded
    pub target: Option<RecordId>,
    pub status: SaveStatus,
}

/// Per-document outcome of a save or clone across several targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub base: RecordId,
    pub targets: Vec<RecordId>,
    pub entries: Vec<SaveEntry>,
}

impl SaveReport {
    /// True when the base record was missing from some loaded document
    pub fn source_missing(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.status == SaveStatus::SourceMissing)
    }

    fn line(&self, entry: &SaveEntry) -> String {
        let base = self.base;
        let document = entry.document;
        match (entry.status, entry.target) {
            (SaveStatus::NotLoaded, _) | (_, None) => format!("{document}: not loaded, skipping."),
            (SaveStatus::SourceMissing, Some(_)) => {
                format!("{document}: Base quest {base} not found.")
            }
            (SaveStatus::Cloned(CloneOutcome::Created), Some(target)) => {
                format!("{document}: Cloned {base} -> {target}.")
            }
            (SaveStatus::Cloned(CloneOutcome::Overwritten), Some(target)) => {
                format!("{document}: Cloned {base} -> {target} (overwritten).")
            }
            (SaveStatus::Cloned(CloneOutcome::EditedInPlace), Some(target)) => {
                format!("{document}: Editing quest {target} (no clone).")
            }
        }
    }
}

impl fmt::Display for SaveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.entries.iter().map(|entry| self.line(entry)).collect();
        f.write_str(&lines.join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteEntry {
    pub document: DocumentKind,
    /// `None` when the document was not loaded
    pub outcome: Option<DeleteOutcome>,
}

/// Per-document outcome of deleting one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub id: RecordId,
    pub entries: Vec<DeleteEntry>,
}

impl DeleteReport {
    pub fn removed_any(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.outcome == Some(DeleteOutcome::Removed))
    }
}

impl fmt::Display for DeleteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id;
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|entry| match entry.outcome {
                Some(DeleteOutcome::Removed) => format!("{}: removed quest {id}.", entry.document),
                Some(DeleteOutcome::NotPresent) => {
                    format!("{}: quest {id} not present.", entry.document)
                }
                None => format!("{}: not loaded, skipping.", entry.document),
            })
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Definition, requirements and rewards documents loaded side by side.
///
/// Every operation touches the loaded documents in the fixed order
/// definition, requirements, rewards, and skips the ones that failed to load.
#[derive(Debug, Clone)]
pub struct QuestDocuments {
    slots: [DocumentSlot; 3],
}

impl QuestDocuments {
    /// Load all three documents; a missing or unreadable file leaves its
    /// slot empty.
    pub fn load(paths: &DocumentPaths) -> Self {
        let slots = DocumentKind::ALL.map(|kind| {
            let path = paths.get(kind).to_path_buf();
            let document = Document::load(&path);
            DocumentSlot {
                kind,
                path,
                document,
            }
        });
        Self { slots }
    }

    /// Build from already parsed documents (all paths still required for saving)
    pub fn from_parts(
        paths: &DocumentPaths,
        definition: Option<Document>,
        requirements: Option<Document>,
        rewards: Option<Document>,
    ) -> Self {
        let mut documents = [definition, requirements, rewards].into_iter();
        let slots = DocumentKind::ALL.map(|kind| DocumentSlot {
            kind,
            path: paths.get(kind).to_path_buf(),
            document: documents.next().flatten(),
        });
        Self { slots }
    }

    pub fn slots(&self) -> &[DocumentSlot] {
        &self.slots
    }

    pub fn slot(&self, kind: DocumentKind) -> &DocumentSlot {
        &self.slots[Self::index(kind)]
    }

    fn index(kind: DocumentKind) -> usize {
        match kind {
            DocumentKind::Definition => 0,
            DocumentKind::Requirements => 1,
            DocumentKind::Rewards => 2,
        }
    }

    fn root(&self, kind: DocumentKind) -> Option<&Node> {
        self.slot(kind).root()
    }

    /// Listing from the definition document; empty when it is not loaded.
    pub fn list_records(&self) -> Vec<RecordEntry> {
        self.root(DocumentKind::Definition)
            .map(list_records)
            .unwrap_or_default()
    }

    /// The three record views of `id`; unloaded documents yield defaults.
    pub fn extract(&self, id: RecordId) -> QuestRecord {
        QuestRecord {
            definition: extract_or_default::<DefinitionCodec>(
                self.root(DocumentKind::Definition),
                id,
            ),
            requirements: extract_or_default::<RequirementsCodec>(
                self.root(DocumentKind::Requirements),
                id,
            ),
            rewards: extract_or_default::<RewardsCodec>(self.root(DocumentKind::Rewards), id),
        }
    }

    /// Whether `id` exists as a top-level record in any loaded document
    pub fn contains(&self, id: RecordId) -> bool {
        let name = id.to_string();
        self.slots
            .iter()
            .filter_map(DocumentSlot::root)
            .any(|root| root.has_child(&name))
    }

    /// Targets other than `base` that already exist in the definition
    /// document and would be overwritten.
    pub fn conflicting_targets(&self, base: RecordId, targets: &[RecordId]) -> Vec<RecordId> {
        let Some(root) = self.root(DocumentKind::Definition) else {
            return Vec::new();
        };
        targets
            .iter()
            .copied()
            .filter(|&target| target != base && root.has_child(&target.to_string()))
            .collect()
    }

    /// Copy `base` to every target in every loaded document.
    pub fn clone_records(&mut self, base: RecordId, targets: &[RecordId]) -> SaveReport {
        self.clone_and_apply(base, targets, None)
    }

    /// Copy `base` to every target, then write `record` over each copy.
    ///
    /// A base missing from one document is reported, and the record is still
    /// applied there.
    pub fn save_record(
        &mut self,
        base: RecordId,
        targets: &[RecordId],
        record: &QuestRecord,
    ) -> SaveReport {
        self.clone_and_apply(base, targets, Some(record))
    }

    fn clone_and_apply(
        &mut self,
        base: RecordId,
        targets: &[RecordId],
        record: Option<&QuestRecord>,
    ) -> SaveReport {
        let mut entries = Vec::new();
        for slot in &mut self.slots {
            let kind = slot.kind;
            let Some(root) = slot.root_mut() else {
                entries.push(SaveEntry {
                    document: kind,
                    target: None,
                    status: SaveStatus::NotLoaded,
                });
                continue;
            };

            for &target in targets {
                let status = match clone_record(root, base, target) {
                    Ok(outcome) => SaveStatus::Cloned(outcome),
                    Err(e) => {
                        log::warn!("{kind}: {e}");
                        SaveStatus::SourceMissing
                    }
                };
                if let Some(record) = record {
                    apply_to(kind, root, target, record);
                }
                entries.push(SaveEntry {
                    document: kind,
                    target: Some(target),
                    status,
                });
            }
        }
        SaveReport {
            base,
            targets: targets.to_vec(),
            entries,
        }
    }

    /// Remove `id` from every loaded document.
    pub fn delete(&mut self, id: RecordId) -> DeleteReport {
        let entries = self
            .slots
            .iter_mut()
            .map(|slot| DeleteEntry {
                document: slot.kind,
                outcome: slot.root_mut().map(|root| delete_record(root, id)),
            })
            .collect();
        DeleteReport { id, entries }
    }

    /// Write every loaded document back to its path, returning the paths
    /// written. Stops at the first failed write.
    pub fn save_all(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for slot in &self.slots {
            if let Some(document) = &slot.document {
                document.save(&slot.path)?;
                written.push(slot.path.clone());
            } else {
                log::debug!("{}: not loaded, skipping save", slot.kind);
            }
        }
        Ok(written)
    }
}

fn extract_or_default<C>(root: Option<&Node>, id: RecordId) -> C::Record
where
    C: RecordCodec,
    C::Record: Default,
{
    root.map(|root| C::extract(root, id)).unwrap_or_default()
}

fn apply_to(kind: DocumentKind, root: &mut Node, id: RecordId, record: &QuestRecord) {
    match kind {
        DocumentKind::Definition => DefinitionCodec::apply(root, id, &record.definition),
        DocumentKind::Requirements => RequirementsCodec::apply(root, id, &record.requirements),
        DocumentKind::Rewards => RewardsCodec::apply(root, id, &record.rewards),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quest_imgdir::Leaf;

    fn documents() -> QuestDocuments {
        let mut info = Document::new("QuestInfo.img");
        let quest = info.root_mut().ensure_child("1000");
        quest.push_leaf(Leaf::string("name", "Base"));
        info.root_mut().ensure_child("2000").push_leaf(Leaf::string("name", "Taken"));

        let mut check = Document::new("Check.img");
        check
            .root_mut()
            .ensure_child("1000")
            .ensure_child("0")
            .push_leaf(Leaf::int("npc", 2100));

        QuestDocuments::from_parts(&DocumentPaths::in_dir("unused"), Some(info), Some(check), None)
    }

    #[test]
    fn extract_uses_defaults_for_unloaded_documents() {
        let record = documents().extract(1000);
        assert_eq!(record.definition.name, "Base");
        assert_eq!(record.requirements.start_npc, Some(2100));
        assert_eq!(record.rewards, Default::default());
    }

    #[test]
    fn conflicts_ignore_base_and_unknown_ids() {
        let docs = documents();
        assert_eq!(docs.conflicting_targets(1000, &[1000, 2000, 3000]), vec![2000]);
    }

    #[test]
    fn save_record_clones_then_applies_per_document() {
        let mut docs = documents();
        let mut record = docs.extract(1000);
        record.definition.name = "Copy".to_string();
        let report = docs.save_record(1000, &[3000], &record);

        assert_eq!(
            report.entries,
            vec![
                SaveEntry {
                    document: DocumentKind::Definition,
                    target: Some(3000),
                    status: SaveStatus::Cloned(CloneOutcome::Created),
                },
                SaveEntry {
                    document: DocumentKind::Requirements,
                    target: Some(3000),
                    status: SaveStatus::Cloned(CloneOutcome::Created),
                },
                SaveEntry {
                    document: DocumentKind::Rewards,
                    target: None,
                    status: SaveStatus::NotLoaded,
                },
            ]
        );
        assert_eq!(docs.extract(3000).definition.name, "Copy");
        assert_eq!(docs.extract(1000).definition.name, "Base");
        assert_eq!(docs.extract(3000).requirements.start_npc, Some(2100));
        assert_eq!(
            report.to_string(),
            "QuestInfo: Cloned 1000 -> 3000.\nCheck: Cloned 1000 -> 3000.\n\
             Act: not loaded, skipping."
        );
    }

    #[test]
    fn missing_base_is_reported_and_record_still_applied() {
        let mut docs = documents();
        let record = QuestRecord::default();
        let report = docs.save_record(4242, &[5000], &record);
        assert!(report.source_missing());
        assert!(docs.contains(5000));
        assert!(report
            .to_string()
            .starts_with("QuestInfo: Base quest 4242 not found.\nCheck: Base quest 4242 not found."));
    }

    #[test]
    fn saving_over_base_edits_in_place() {
        let mut docs = documents();
        let record = docs.extract(1000);
        let report = docs.save_record(1000, &[1000, 2000], &record);
        assert_eq!(report.entries[0].status, SaveStatus::Cloned(CloneOutcome::EditedInPlace));
        assert_eq!(
            report.to_string().lines().take(2).collect::<Vec<_>>(),
            vec![
                "QuestInfo: Editing quest 1000 (no clone).",
                "QuestInfo: Cloned 1000 -> 2000 (overwritten).",
            ]
        );
    }

    #[test]
    fn delete_reports_every_document() {
        let mut docs = documents();
        let report = docs.delete(2000);
        assert!(report.removed_any());
        assert_eq!(
            report.to_string(),
            "QuestInfo: removed quest 2000.\nCheck: quest 2000 not present.\nAct: not loaded, skipping."
        );
        assert_eq!(
            docs.list_records().iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1000]
        );
    }
}

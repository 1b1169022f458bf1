//! # Quest Records
//!
//! Typed quest records over three parallel imgdir documents.
//!
//! ## Architecture
//!
//! ```text
//! QuestInfo.img ──> DefinitionCodec   ──┐
//! Check.img     ──> RequirementsCodec ──┼──> QuestRecord <──> QuestDraft (pair-list text)
//! Act.img       ──> RewardsCodec      ──┘
//!
//! clone_record / delete_record / list_records work on any document root;
//! QuestDocuments drives all three documents for one editing session.
//! ```
//!
//! Requirements and rewards are split into stage directories: `0` for quest
//! start, `1` for completion. Lists such as required items are stored as
//! indexed slot directories holding `id` plus `count` or `state`.
//!
//! ## Example
//!
//! ```rust
//! use quest_imgdir::Node;
//! use quest_records::{parse_pairs, RecordCodec, RewardRecord, RewardsCodec};
//!
//! let mut root = Node::new("Act.img");
//! let record = RewardRecord {
//!     exp: Some(1000),
//!     gained_items: parse_pairs("2000000 x10"),
//!     lost_items: parse_pairs("4030000 1"),
//! };
//! RewardsCodec::apply(&mut root, 1000, &record);
//! assert_eq!(RewardsCodec::extract(&root, 1000), record);
//! ```

mod clone;
mod codec;
mod definition;
mod delete;
mod documents;
mod draft;
mod error;
mod ids;
mod index;
mod pairs;
mod record;
mod requirements;
mod rewards;
mod validate;

pub use clone::{clone_record, CloneOutcome};
pub use codec::{DocumentKind, RecordCodec, END_STAGE, START_STAGE};
pub use definition::DefinitionCodec;
pub use delete::{delete_record, DeleteOutcome};
pub use documents::{
    DeleteEntry, DeleteReport, DocumentPaths, DocumentSlot, QuestDocuments, SaveEntry, SaveReport,
    SaveStatus,
};
pub use draft::{FieldIssue, QuestDraft, RequirementDraft, RewardDraft};
pub use error::{RecordError, Result};
pub use ids::parse_id_list;
pub use index::{filter_records, list_records, RecordEntry};
pub use pairs::{format_pairs, parse_pairs, parse_pairs_as, PairKind};
pub use record::{
    DefinitionRecord, Pair, QuestRecord, RecordId, RequirementRecord, RewardRecord,
};
pub use requirements::RequirementsCodec;
pub use rewards::RewardsCodec;
pub use validate::validate_pair_lines;

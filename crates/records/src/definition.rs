use quest_imgdir::{Leaf, Node};

use crate::codec::{ensure_record, find_record, DocumentKind, RecordCodec};
use crate::record::{DefinitionRecord, RecordId};

/// Codec for the flat definition document (`QuestInfo`).
///
/// Apply is a full rewrite of the record's leaves; child directories of the
/// record directory are left alone.
pub struct DefinitionCodec;

impl RecordCodec for DefinitionCodec {
    type Record = DefinitionRecord;

    const KIND: DocumentKind = DocumentKind::Definition;

    fn extract(root: &Node, id: RecordId) -> DefinitionRecord {
        let Some(node) = find_record(root, id) else {
            return DefinitionRecord::default();
        };

        let text = |name: &str| node.string(name).unwrap_or_default().to_string();
        let flag = |name: &str| node.int(name).map(|v| v != 0);

        let mut record = DefinitionRecord {
            name: text("name"),
            quest_type: text("type"),
            parent: text("parent"),
            area: node.int("area"),
            order: node.int("order"),
            auto_start: flag("autoStart"),
            auto_complete: flag("autoComplete"),
            summary: text("summary"),
            reward_summary: text("rewardSummary"),
            demand_summary: text("demandSummary"),
            log0: text("0"),
            log1: text("1"),
            log2: text("2"),
        };

        // Older files keep the summary only as log line 0.
        if record.summary.is_empty() && !record.log0.is_empty() {
            record.summary = record.log0.clone();
        }
        record
    }

    fn apply(root: &mut Node, id: RecordId, record: &DefinitionRecord) {
        let node = ensure_record(root, id);
        node.clear_leaves();

        let strings = [
            ("name", &record.name),
            ("summary", &record.summary),
            ("rewardSummary", &record.reward_summary),
            ("demandSummary", &record.demand_summary),
            ("0", &record.log0),
            ("1", &record.log1),
            ("2", &record.log2),
            ("type", &record.quest_type),
            ("parent", &record.parent),
        ];
        for (name, value) in strings {
            if !value.is_empty() {
                node.push_leaf(Leaf::string(name, value.as_str()));
            }
        }

        for (name, value) in [("area", record.area), ("order", record.order)] {
            if let Some(value) = value {
                node.push_leaf(Leaf::int(name, value));
            }
        }

        // Flags are always written, an unset flag as 0.
        for (name, flag) in [
            ("autoStart", record.auto_start),
            ("autoComplete", record.auto_complete),
        ] {
            node.push_leaf(Leaf::int(name, i64::from(flag.unwrap_or(false))));
        }

        log::debug!("Applied definition record {id}");
    }
}

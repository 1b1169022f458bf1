use quest_imgdir::{LeafKind, Node};

use crate::codec::{
    build_slots, ensure_record, find_record, read_slots, remove_all_children, DocumentKind,
    RecordCodec, END_STAGE, START_STAGE,
};
use crate::pairs::PairKind;
use crate::record::{Pair, RecordId, RequirementRecord};

const NPC: &str = "npc";
const MIN_LEVEL: &str = "lvmin";

/// One list category of the requirements document
#[derive(Debug, Clone, Copy)]
struct ListCategory {
    dir: &'static str,
    kind: PairKind,
    default_stage: &'static str,
}

const ITEMS: ListCategory = ListCategory {
    dir: "item",
    kind: PairKind::IdCount,
    default_stage: END_STAGE,
};
const MOBS: ListCategory = ListCategory {
    dir: "mob",
    kind: PairKind::IdCount,
    default_stage: END_STAGE,
};
const QUESTS: ListCategory = ListCategory {
    dir: "quest",
    kind: PairKind::IdState,
    default_stage: START_STAGE,
};

/// Codec for the staged requirements document (`Check`).
///
/// Stage `0` holds the start npc and minimum level, stage `1` the end npc.
/// Item, mob and prerequisite-quest lists may sit under either stage; apply
/// keeps each list on the stage that already hosts it.
pub struct RequirementsCodec;

impl RecordCodec for RequirementsCodec {
    type Record = RequirementRecord;

    const KIND: DocumentKind = DocumentKind::Requirements;

    fn extract(root: &Node, id: RecordId) -> RequirementRecord {
        let mut record = RequirementRecord::default();
        let Some(node) = find_record(root, id) else {
            return record;
        };

        for stage in node.children() {
            for leaf in stage.leaves().filter(|l| l.kind == LeafKind::Int) {
                let Some(value) = leaf.as_int() else {
                    continue;
                };
                match (leaf.name.as_str(), stage.name()) {
                    (NPC, START_STAGE) => record.start_npc = Some(value),
                    (NPC, END_STAGE) => record.end_npc = Some(value),
                    (MIN_LEVEL, _) => record.min_level = Some(value),
                    _ => {}
                }
            }

            for list in stage.children() {
                let (target, kind) = match list.name() {
                    name if name == ITEMS.dir => (&mut record.required_items, ITEMS.kind),
                    name if name == MOBS.dir => (&mut record.required_mobs, MOBS.kind),
                    name if name == QUESTS.dir => (&mut record.prerequisite_quests, QUESTS.kind),
                    _ => continue,
                };
                target.extend(read_slots(list, kind));
            }
        }
        record
    }

    fn apply(root: &mut Node, id: RecordId, record: &RequirementRecord) {
        let node = ensure_record(root, id);
        node.ensure_child(START_STAGE);
        node.ensure_child(END_STAGE);

        set_stage_int(node, START_STAGE, NPC, record.start_npc);
        set_stage_int(node, START_STAGE, MIN_LEVEL, record.min_level);
        set_stage_int(node, END_STAGE, NPC, record.end_npc);

        replace_list(node, ITEMS, &record.required_items);
        replace_list(node, MOBS, &record.required_mobs);
        replace_list(node, QUESTS, &record.prerequisite_quests);

        log::debug!("Applied requirements record {id}");
    }
}

/// Write (or remove, for `None`) a single int on `stage`, in place.
///
/// Copies of a start-stage-only field found on other stages are removed so
/// a later extraction cannot pick up a stale value.
fn set_stage_int(node: &mut Node, stage_name: &str, leaf: &str, value: Option<i64>) {
    if leaf == MIN_LEVEL {
        let stale: Vec<String> = node
            .children()
            .filter(|stage| stage.name() != stage_name)
            .map(|stage| stage.name().to_string())
            .collect();
        for name in stale {
            if let Some(stage) = node.find_child_mut(&name) {
                stage.remove_leaves(LeafKind::Int, leaf);
            }
        }
    }

    let stage = node.ensure_child(stage_name);
    match value {
        Some(value) => stage.set_int(leaf, value),
        None => {
            stage.remove_leaves(LeafKind::Int, leaf);
        }
    }
}

/// Replace one list category, keeping it on the stage that hosted it before.
fn replace_list(node: &mut Node, category: ListCategory, pairs: &[Pair]) {
    let host = node
        .children()
        .find(|stage| stage.has_child(category.dir))
        .map(|stage| stage.name().to_string());

    let stage_names: Vec<String> = node.children().map(|s| s.name().to_string()).collect();
    for name in &stage_names {
        if let Some(stage) = node.find_child_mut(name) {
            remove_all_children(stage, category.dir);
        }
    }

    if pairs.is_empty() {
        return;
    }
    let stage_name = host.as_deref().unwrap_or(category.default_stage);
    node.ensure_child(stage_name).push_child(build_slots(
        category.dir,
        category.kind,
        pairs.iter().copied(),
    ));
}

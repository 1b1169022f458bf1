use quest_imgdir::{LeafKind, Node};

use crate::codec::{
    build_slots, ensure_record, find_record, read_slots, remove_all_children, DocumentKind,
    RecordCodec, END_STAGE, START_STAGE,
};
use crate::pairs::PairKind;
use crate::record::{RecordId, RewardRecord};

const EXP: &str = "exp";
const ITEM: &str = "item";

/// Codec for the rewards document (`Act`).
///
/// All reward data lives on stage `1`. Gained and lost items share one
/// `item` list: a negative stored count marks a lost item. The sign is the
/// only marker, so a lost item with a count of 0 or less reads back as
/// gained, and a negative gained count reads back as lost;
/// [`crate::QuestDraft::validate`] flags both.
pub struct RewardsCodec;

impl RecordCodec for RewardsCodec {
    type Record = RewardRecord;

    const KIND: DocumentKind = DocumentKind::Rewards;

    fn extract(root: &Node, id: RecordId) -> RewardRecord {
        let mut record = RewardRecord::default();
        let Some(node) = find_record(root, id) else {
            return record;
        };

        for stage in node.children() {
            if record.exp.is_none() {
                record.exp = stage.int(EXP);
            }
            for list in stage.children().filter(|c| c.name() == ITEM) {
                for (item, count) in read_slots(list, PairKind::IdCount) {
                    if count >= 0 {
                        record.gained_items.push((item, count));
                    } else {
                        record.lost_items.push((item, count.saturating_neg()));
                    }
                }
            }
        }
        record
    }

    fn apply(root: &mut Node, id: RecordId, record: &RewardRecord) {
        let node = ensure_record(root, id);

        if let Some(start) = node.find_child_mut(START_STAGE) {
            strip_rewards(start);
        }
        let end = node.ensure_child(END_STAGE);
        strip_rewards(end);

        if let Some(exp) = record.exp.filter(|&exp| exp != 0) {
            end.set_int(EXP, exp);
        }

        if !record.gained_items.is_empty() || !record.lost_items.is_empty() {
            let lost = record
                .lost_items
                .iter()
                .map(|&(item, count)| (item, count.saturating_neg()));
            let slots = record.gained_items.iter().copied().chain(lost);
            end.push_child(build_slots(ITEM, PairKind::IdCount, slots));
        }

        log::debug!("Applied rewards record {id}");
    }
}

fn strip_rewards(stage: &mut Node) {
    stage.remove_leaves(LeafKind::Int, EXP);
    remove_all_children(stage, ITEM);
}

//! Text-form editing surface: list fields held as pair-list text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pairs::{format_pairs, parse_pairs_as, tokenize_line, LineToken, PairKind};
use crate::record::{DefinitionRecord, Pair, QuestRecord, RequirementRecord, RewardRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequirementDraft {
    pub start_npc: Option<i64>,
    pub end_npc: Option<i64>,
    pub min_level: Option<i64>,
    pub required_items: String,
    pub required_mobs: String,
    pub prerequisite_quests: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewardDraft {
    pub exp: Option<i64>,
    pub gained_items: String,
    pub lost_items: String,
}

/// A quest as an editor holds it before saving
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestDraft {
    pub definition: DefinitionRecord,
    pub requirements: RequirementDraft,
    pub rewards: RewardDraft,
}

/// Lines of one list field that would be lost or altered on save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub kind: PairKind,
    pub lines: Vec<usize>,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.lines.iter().map(ToString::to_string).collect();
        write!(f, "{}: invalid line(s) {}", self.field, lines.join(", "))
    }
}

/// Which parsed pairs a list field can store faithfully
type PairCheck = fn(Pair) -> bool;

fn any_pair(_: Pair) -> bool {
    true
}

/// Rewards share one item list; a negative count reads back as lost.
fn gained_count((_, count): Pair) -> bool {
    count >= 0
}

/// A lost count that is not positive would read back as gained.
fn lost_count((_, count): Pair) -> bool {
    count > 0
}

/// 1-based lines that are malformed or hold a pair `check` rejects
fn rejected_lines(text: &str, check: PairCheck) -> Vec<usize> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| match tokenize_line(line) {
            LineToken::Skip => false,
            LineToken::Pair(pair) => !check(pair),
            LineToken::Invalid => true,
        })
        .map(|(idx, _)| idx + 1)
        .collect()
}

impl QuestDraft {
    fn list_fields(&self) -> [(&'static str, &str, PairKind, PairCheck); 5] {
        [
            (
                "requiredItems",
                &self.requirements.required_items,
                PairKind::IdCount,
                any_pair,
            ),
            (
                "requiredMobs",
                &self.requirements.required_mobs,
                PairKind::IdCount,
                any_pair,
            ),
            (
                "prerequisiteQuests",
                &self.requirements.prerequisite_quests,
                PairKind::IdState,
                any_pair,
            ),
            (
                "gainedItems",
                &self.rewards.gained_items,
                PairKind::IdCount,
                gained_count,
            ),
            (
                "lostItems",
                &self.rewards.lost_items,
                PairKind::IdCount,
                lost_count,
            ),
        ]
    }

    /// Every list field with at least one line that would not survive a
    /// save and reload: malformed lines, negative gained counts and
    /// non-positive lost counts. Empty when the draft is safe to save.
    pub fn validate(&self) -> Vec<FieldIssue> {
        self.list_fields()
            .into_iter()
            .filter_map(|(field, text, kind, check)| {
                let lines = rejected_lines(text, check);
                (!lines.is_empty()).then_some(FieldIssue { field, kind, lines })
            })
            .collect()
    }

    /// Parse the list text into a record; malformed lines are dropped.
    pub fn into_record(self) -> QuestRecord {
        let QuestDraft {
            definition,
            requirements,
            rewards,
        } = self;
        QuestRecord {
            definition,
            requirements: RequirementRecord {
                start_npc: requirements.start_npc,
                end_npc: requirements.end_npc,
                min_level: requirements.min_level,
                required_items: parse_pairs_as(&requirements.required_items, PairKind::IdCount),
                required_mobs: parse_pairs_as(&requirements.required_mobs, PairKind::IdCount),
                prerequisite_quests: parse_pairs_as(
                    &requirements.prerequisite_quests,
                    PairKind::IdState,
                ),
            },
            rewards: RewardRecord {
                exp: rewards.exp,
                gained_items: parse_pairs_as(&rewards.gained_items, PairKind::IdCount),
                lost_items: parse_pairs_as(&rewards.lost_items, PairKind::IdCount),
            },
        }
    }
}

impl QuestRecord {
    /// Editable text form of this record
    pub fn to_draft(&self) -> QuestDraft {
        let requirements = &self.requirements;
        let rewards = &self.rewards;
        QuestDraft {
            definition: self.definition.clone(),
            requirements: RequirementDraft {
                start_npc: requirements.start_npc,
                end_npc: requirements.end_npc,
                min_level: requirements.min_level,
                required_items: format_pairs(&requirements.required_items),
                required_mobs: format_pairs(&requirements.required_mobs),
                prerequisite_quests: format_pairs(&requirements.prerequisite_quests),
            },
            rewards: RewardDraft {
                exp: rewards.exp,
                gained_items: format_pairs(&rewards.gained_items),
                lost_items: format_pairs(&rewards.lost_items),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> QuestRecord {
        QuestRecord {
            definition: DefinitionRecord {
                name: "Snail Hunt".to_string(),
                ..Default::default()
            },
            requirements: RequirementRecord {
                start_npc: Some(2100),
                required_mobs: vec![(100100, 10), (100101, 5)],
                prerequisite_quests: vec![(1000, 2)],
                ..Default::default()
            },
            rewards: RewardRecord {
                exp: Some(300),
                gained_items: vec![(2000000, 5)],
                lost_items: vec![(4000000, 10)],
            },
        }
    }

    #[test]
    fn draft_formats_lists_as_lines() {
        let draft = record().to_draft();
        assert_eq!(draft.requirements.required_mobs, "100100 10\n100101 5");
        assert_eq!(draft.requirements.required_items, "");
        assert_eq!(draft.rewards.lost_items, "4000000 10");
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn record_to_draft_and_back_is_lossless() {
        assert_eq!(record().to_draft().into_record(), record());
    }

    #[test]
    fn validate_reports_each_bad_field() {
        let mut draft = record().to_draft();
        draft.requirements.prerequisite_quests = "1000 2\n1001 one".to_string();
        draft.rewards.gained_items = "# comment\n2000000 x5\nbad\n\n2000001 1 1".to_string();

        let issues = draft.validate();
        assert_eq!(
            issues,
            vec![
                FieldIssue {
                    field: "prerequisiteQuests",
                    kind: PairKind::IdState,
                    lines: vec![2],
                },
                FieldIssue {
                    field: "gainedItems",
                    kind: PairKind::IdCount,
                    lines: vec![3, 5],
                },
            ]
        );
        assert_eq!(issues[1].to_string(), "gainedItems: invalid line(s) 3, 5");
    }

    #[test]
    fn into_record_drops_invalid_lines() {
        let mut draft = QuestDraft::default();
        draft.rewards.gained_items = "2000000 x5\nbad".to_string();
        draft.requirements.prerequisite_quests = "1000 state\n1001 0".to_string();
        let record = draft.into_record();
        assert_eq!(record.rewards.gained_items, vec![(2000000, 5)]);
        assert_eq!(record.requirements.prerequisite_quests, vec![(1001, 0)]);
    }

    #[test]
    fn prerequisites_accept_x_separator() {
        let mut draft = QuestDraft::default();
        draft.requirements.prerequisite_quests = "1000x1\n1001 X 2".to_string();
        assert!(draft.validate().is_empty());
        assert_eq!(
            draft.into_record().requirements.prerequisite_quests,
            vec![(1000, 1), (1001, 2)]
        );
    }

    #[test]
    fn reward_counts_that_would_switch_lists_are_flagged() {
        let mut draft = QuestDraft::default();
        draft.rewards.gained_items = "2000000 0\n2000001 -3".to_string();
        draft.rewards.lost_items = "4000000 0\n4000001 2\n4000002 -1".to_string();
        assert_eq!(
            draft.validate(),
            vec![
                FieldIssue {
                    field: "gainedItems",
                    kind: PairKind::IdCount,
                    lines: vec![2],
                },
                FieldIssue {
                    field: "lostItems",
                    kind: PairKind::IdCount,
                    lines: vec![1, 3],
                },
            ]
        );
    }

    #[test]
    fn draft_json_uses_camel_case_and_defaults() {
        let draft: QuestDraft = serde_json::from_str(
            r#"{"definition": {"name": "X", "autoStart": true},
                "rewards": {"exp": 10, "gainedItems": "1 2"}}"#,
        )
        .unwrap();
        assert_eq!(draft.definition.name, "X");
        assert_eq!(draft.definition.auto_start, Some(true));
        assert_eq!(draft.rewards.exp, Some(10));
        assert_eq!(draft.requirements, RequirementDraft::default());
    }
}

use serde::{Deserialize, Serialize};

/// Name of a top-level record directory, parsed as a number
pub type RecordId = u32;

/// `(id, count)` or `(id, state)` tuple of a pair list
pub type Pair = (i64, i64);

/// Flat quest description stored in the definition document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefinitionRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub quest_type: String,
    pub parent: String,
    pub area: Option<i64>,
    pub order: Option<i64>,
    pub auto_start: Option<bool>,
    pub auto_complete: Option<bool>,
    pub summary: String,
    pub reward_summary: String,
    pub demand_summary: String,
    pub log0: String,
    pub log1: String,
    pub log2: String,
}

/// Start/end conditions stored in the requirements document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequirementRecord {
    pub start_npc: Option<i64>,
    pub end_npc: Option<i64>,
    pub min_level: Option<i64>,
    pub required_items: Vec<Pair>,
    pub required_mobs: Vec<Pair>,
    pub prerequisite_quests: Vec<Pair>,
}

/// Completion rewards stored in the rewards document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewardRecord {
    pub exp: Option<i64>,
    pub gained_items: Vec<Pair>,
    pub lost_items: Vec<Pair>,
}

/// The three per-document views of one quest id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestRecord {
    pub definition: DefinitionRecord,
    pub requirements: RequirementRecord,
    pub rewards: RewardRecord,
}

use anyhow::{bail, Context as AnyhowContext, Result};
use quest_records::{
    filter_records, parse_id_list, validate_pair_lines, DocumentKind, DocumentPaths, PairKind,
    QuestDocuments, QuestDraft, RecordError, RecordId,
};
use serde_json::json;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::output::CommandResponse;

fn load_documents(paths: &DocumentPaths) -> Result<QuestDocuments> {
    let docs = QuestDocuments::load(paths);
    if !docs.slots().iter().any(|slot| slot.is_loaded()) {
        bail!(
            "No quest documents could be loaded ({}, {}, {})",
            paths.definition.display(),
            paths.requirements.display(),
            paths.rewards.display()
        );
    }
    Ok(docs)
}

fn require_loaded(docs: &QuestDocuments, kind: DocumentKind) -> Result<()> {
    let slot = docs.slot(kind);
    if !slot.is_loaded() {
        bail!("{kind} document not loaded: {}", slot.path.display());
    }
    Ok(())
}

fn join_ids(ids: &[RecordId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Save every loaded document and describe what was written.
fn save_documents(docs: &QuestDocuments) -> Result<(Vec<PathBuf>, String)> {
    let written = docs.save_all().context("Failed to save documents")?;
    let line = format!("Saved {} document(s).", written.len());
    Ok((written, line))
}

pub fn list(paths: &DocumentPaths, filter: Option<&str>) -> Result<CommandResponse> {
    let docs = load_documents(paths)?;
    require_loaded(&docs, DocumentKind::Definition)?;

    let listing = docs.list_records();
    let shown = filter_records(&listing, filter.unwrap_or_default());
    log::info!("{} of {} quest(s) shown", shown.len(), listing.len());

    let lines = shown
        .iter()
        .map(|entry| format!("{}\t{}", entry.id, entry.name))
        .collect::<Vec<_>>();
    Ok(CommandResponse::ok(format!("{} quest(s)", shown.len()), &shown)?.with_lines(lines))
}

pub fn show(paths: &DocumentPaths, id: RecordId) -> Result<CommandResponse> {
    let docs = load_documents(paths)?;
    if !docs.contains(id) {
        bail!("Quest {id} not found in any loaded document");
    }

    let draft = docs.extract(id).to_draft();
    let body = serde_json::to_string_pretty(&draft)?;
    Ok(CommandResponse::ok(format!("Quest {id}"), &draft)?.with_lines([body]))
}

pub struct SaveRequest<'a> {
    pub base: RecordId,
    pub targets: &'a str,
    pub draft: &'a Path,
    pub force: bool,
}

pub fn save(paths: &DocumentPaths, request: SaveRequest<'_>) -> Result<CommandResponse> {
    let targets = parse_id_list(request.targets)?;
    let text = read_input(request.draft)?;
    let draft: QuestDraft = serde_json::from_str(&text)
        .with_context(|| format!("Invalid draft JSON in {}", request.draft.display()))?;

    let issues = draft.validate();
    if !issues.is_empty() {
        let lines = issues.iter().map(ToString::to_string).collect::<Vec<_>>();
        return Ok(
            CommandResponse::rejected("Draft has invalid list lines; nothing saved", &issues)?
                .with_lines(lines),
        );
    }

    let mut docs = load_documents(paths)?;
    if let Some(rejected) = refuse_conflicts(&docs, request.base, &targets, request.force)? {
        return Ok(rejected);
    }

    let report = docs.save_record(request.base, &targets, &draft.into_record());
    let (written, saved) = save_documents(&docs)?;

    let mut lines: Vec<String> = report.to_string().lines().map(str::to_string).collect();
    lines.push(saved);
    let message = format!("Saved quest(s) {}", join_ids(&targets));
    Ok(
        CommandResponse::ok(message, json!({ "report": report, "written": written }))?
            .with_lines(lines),
    )
}

pub fn clone(
    paths: &DocumentPaths,
    source: RecordId,
    targets: &str,
    force: bool,
) -> Result<CommandResponse> {
    let targets = parse_id_list(targets)?;
    let mut docs = load_documents(paths)?;
    if !docs.contains(source) {
        return Err(RecordError::SourceNotFound(source).into());
    }
    if let Some(rejected) = refuse_conflicts(&docs, source, &targets, force)? {
        return Ok(rejected);
    }

    let report = docs.clone_records(source, &targets);
    let (written, saved) = save_documents(&docs)?;

    let mut lines: Vec<String> = report.to_string().lines().map(str::to_string).collect();
    lines.push(saved);
    let message = format!("Cloned {source} -> {}", join_ids(&targets));
    Ok(
        CommandResponse::ok(message, json!({ "report": report, "written": written }))?
            .with_lines(lines),
    )
}

fn refuse_conflicts(
    docs: &QuestDocuments,
    base: RecordId,
    targets: &[RecordId],
    force: bool,
) -> Result<Option<CommandResponse>> {
    let conflicts = docs.conflicting_targets(base, targets);
    if conflicts.is_empty() {
        return Ok(None);
    }
    if force {
        log::warn!("Overwriting existing quest(s) {}", join_ids(&conflicts));
        return Ok(None);
    }
    let message = format!(
        "Quest(s) {} already exist; pass --force to overwrite",
        join_ids(&conflicts)
    );
    Ok(Some(CommandResponse::rejected(
        message,
        json!({ "conflicts": conflicts }),
    )?))
}

pub fn delete(paths: &DocumentPaths, id: RecordId) -> Result<CommandResponse> {
    let mut docs = load_documents(paths)?;
    let report = docs.delete(id);

    let mut lines: Vec<String> = report.to_string().lines().map(str::to_string).collect();
    let message = if report.removed_any() {
        let (_, saved) = save_documents(&docs)?;
        lines.push(saved);
        format!("Deleted quest {id}")
    } else {
        format!("Quest {id} not present in any loaded document")
    };
    Ok(CommandResponse::ok(message, &report)?.with_lines(lines))
}

pub fn validate(path: &Path, kind: PairKind) -> Result<CommandResponse> {
    let text = read_input(path)?;
    let invalid = validate_pair_lines(&text, kind);
    let data = json!({ "kind": kind, "invalid_lines": invalid });
    if invalid.is_empty() {
        return CommandResponse::ok("All lines valid", data);
    }

    let all_lines: Vec<&str> = text.lines().collect();
    let lines = invalid
        .iter()
        .map(|&number| {
            let content = all_lines.get(number - 1).copied().unwrap_or_default();
            format!("line {number}: {}", content.trim())
        })
        .collect::<Vec<_>>();
    let message = format!(
        "{} invalid line(s): {}",
        invalid.len(),
        invalid
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(CommandResponse::rejected(message, data)?.with_lines(lines))
}

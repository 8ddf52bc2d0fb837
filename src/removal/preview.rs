use crate::error::Result;
use crate::store::{ConfigKind, DocumentSet};
use serde::Serialize;

/// What a removal will do, computed before anything is written
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalPreview {
    pub summary: Vec<String>,
    /// Relative to the project root
    pub directories_to_delete: Vec<String>,
    pub schema_changes: Vec<SchemaChange>,
}

/// Serialized content of one document before and after the removal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaChange {
    pub file: String,
    pub before: String,
    pub after: String,
}

impl SchemaChange {
    pub fn diff(&self) -> Vec<DiffLine<'_>> {
        diff_lines(&self.before, &self.after)
    }
}

/// Kinds of the documents whose stored text differs between the two sets.
pub(super) fn changed_documents(
    before: &DocumentSet,
    after: &DocumentSet,
) -> Result<Vec<(ConfigKind, SchemaChange)>> {
    let mut changes = Vec::new();
    for kind in ConfigKind::ALL {
        let old = before.render(*kind)?;
        let new = after.render(*kind)?;
        if old == new {
            continue;
        }
        changes.push((
            *kind,
            SchemaChange {
                file: kind.relative_path().to_string(),
                before: old.unwrap_or_default(),
                after: new.unwrap_or_default(),
            },
        ));
    }
    Ok(changes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    Same(&'a str),
    Removed(&'a str),
    Added(&'a str),
}

/// Line diff from the longest common subsequence of the two texts.
pub fn diff_lines<'a>(before: &'a str, after: &'a str) -> Vec<DiffLine<'a>> {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            out.push(DiffLine::Same(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(DiffLine::Removed(old[i]));
            i += 1;
        } else {
            out.push(DiffLine::Added(new[j]));
            j += 1;
        }
    }
    out.extend(old[i..].iter().map(|l| DiffLine::Removed(*l)));
    out.extend(new[j..].iter().map(|l| DiffLine::Added(*l)));
    out
}

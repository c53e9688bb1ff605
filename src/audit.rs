//! Completeness check of an fMRIPrep derivatives tree.
//!
//! For every (subject, session, task, run) found, checks that the
//! preprocessed BOLD image and its `desc-confounds_timeseries.tsv` exist.
//! Subjects without any BOLD file get a `task-rest` entry per session so
//! they show up as incomplete rather than being silently skipped.
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// BOLD files searched for, relative to the derivatives root.
pub const BOLD_PATTERN: &str = "sub-*/ses-*/func/*res-2_desc-preproc_bold.nii.gz";
/// Suffix used to build the expected BOLD name of subjects without one.
pub const EXPECTED_BOLD_SUFFIX: &str = "space-MNI152NLin2009cAsym_desc-preproc_bold.nii.gz";
pub const CONFOUNDS_SUFFIX: &str = "desc-confounds_timeseries.tsv";

/// BIDS entities identifying one acquisition. Empty string = entity absent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunKey {
    pub subject: String,
    pub session: String,
    pub task: String,
    pub run: String,
}

impl RunKey {
    fn entities(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.session, &self.task, &self.run]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for RunKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = self.entities().collect();
        f.write_str(&parts.join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditEntry {
    pub bold: Option<PathBuf>,
    pub confounds: Option<PathBuf>,
    /// `"bold"` and/or `"confounds"`.
    pub missing: Vec<&'static str>,
}

impl AuditEntry {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub entries: BTreeMap<RunKey, AuditEntry>,
}

impl AuditReport {
    pub fn n_complete(&self) -> usize {
        self.entries.values().filter(|e| e.is_complete()).count()
    }

    pub fn incomplete(&self) -> impl Iterator<Item = (&RunKey, &AuditEntry)> {
        self.entries.iter().filter(|(_, e)| !e.is_complete())
    }

    /// Human-readable report.
    pub fn render(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Preprocessing Check Results:");
        let _ = writeln!(s, "---------------------------");
        for (key, e) in &self.entries {
            if e.is_complete() {
                let _ = writeln!(s, "{key}: COMPLETE");
            } else {
                let _ = writeln!(s, "{key}: INCOMPLETE (Missing: {})", e.missing.join(", "));
            }
        }
        let n_incomplete = self.entries.len() - self.n_complete();
        let _ = writeln!(s, "\nSummary:");
        let _ = writeln!(s, "Total subject-session-task-run pairs: {}", self.entries.len());
        let _ = writeln!(s, "Complete: {}", self.n_complete());
        let _ = writeln!(s, "Incomplete: {n_incomplete}");
        if n_incomplete > 0 {
            let _ = writeln!(s, "Pairs with missing files:");
            for (key, e) in self.incomplete() {
                let _ = writeln!(s, "  {key}: {}", e.missing.join(", "));
            }
        }
        s
    }
}

/// Parse the BIDS entities out of a BOLD file path.
///
/// Returns `None` if the name has no `sub-` entity. A missing `ses-`
/// entity is recovered from a `ses-*` directory component.
pub fn parse_run_key(path: &Path) -> Option<RunKey> {
    let name = path.file_name()?.to_str()?;
    let parts: Vec<&str> = name.split('_').collect();
    let find = |prefix: &str| {
        parts.iter().find(|p| p.starts_with(prefix)).map(|p| p.to_string()).unwrap_or_default()
    };
    let subject = find("sub-");
    if subject.is_empty() {
        return None;
    }
    let mut session = find("ses-");
    if session.is_empty() {
        session = path
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .find(|c| c.starts_with("ses-"))
            .map(String::from)
            .unwrap_or_default();
    }
    Some(RunKey { subject, session, task: find("task-"), run: find("run-") })
}

/// Expected confounds file for a BOLD image: same directory, entities
/// `sub/ses/task/run` from the BOLD name + `desc-confounds_timeseries.tsv`.
pub fn confounds_path_for(bold: &Path) -> PathBuf {
    let name = bold.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let mut parts: Vec<&str> = name
        .split('_')
        .filter(|p| ["sub-", "ses-", "task-", "run-"].iter().any(|pre| p.starts_with(pre)))
        .collect();
    parts.push(CONFOUNDS_SUFFIX);
    bold.with_file_name(parts.join("_"))
}

fn glob_paths(pattern: &Path) -> Result<Vec<PathBuf>> {
    let pattern = pattern.to_string_lossy();
    let paths = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern {pattern}"))?
        .filter_map(|entry| entry.ok())
        .collect();
    Ok(paths)
}

/// Audit the derivatives tree rooted at `root`.
pub fn scan(root: &Path) -> Result<AuditReport> {
    anyhow::ensure!(root.is_dir(), "not a directory: {}", root.display());
    let escaped = PathBuf::from(glob::Pattern::escape(&root.to_string_lossy()));

    let mut entries: BTreeMap<RunKey, AuditEntry> = BTreeMap::new();

    for bold in glob_paths(&escaped.join(BOLD_PATTERN))? {
        if let Some(key) = parse_run_key(&bold) {
            entries.entry(key).or_default().bold = Some(bold);
        }
    }

    let subjects: Vec<PathBuf> = glob_paths(&escaped.join("sub-*"))?
        .into_iter()
        .filter(|p| p.is_dir())
        .collect();
    for subject_dir in subjects {
        let Some(subject) = subject_dir.file_name().and_then(|n| n.to_str()) else { continue };
        let escaped_subject = PathBuf::from(glob::Pattern::escape(&subject_dir.to_string_lossy()));
        let mut sessions: Vec<String> = glob_paths(&escaped_subject.join("ses-*"))?
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        if sessions.is_empty() {
            sessions.push(String::new());
        }
        for session in sessions {
            let key = RunKey {
                subject: subject.to_string(),
                session,
                task: "task-rest".into(),
                run: String::new(),
            };
            entries.entry(key).or_default();
        }
    }

    for (key, entry) in entries.iter_mut() {
        if entry.bold.is_none() {
            let mut name: Vec<&str> = key.entities().collect();
            name.push(EXPECTED_BOLD_SUFFIX);
            let expected = root
                .join(&key.subject)
                .join(&key.session)
                .join("func")
                .join(name.join("_"));
            if expected.exists() {
                entry.bold = Some(expected);
            } else {
                entry.missing.push("bold");
            }
        }
        if let Some(bold) = &entry.bold {
            let confounds = confounds_path_for(bold);
            if confounds.exists() {
                entry.confounds = Some(confounds);
            } else {
                entry.missing.push("confounds");
            }
        }
    }

    Ok(AuditReport { entries })
}

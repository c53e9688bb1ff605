use bold_denoise::audit::{scan, RunKey};
use std::fs;
use std::path::Path;

const SPACE: &str = "space-MNI152NLin2009cAsym_res-2_desc-preproc_bold.nii.gz";

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

fn key(sub: &str, ses: &str) -> RunKey {
    RunKey { subject: sub.into(), session: ses.into(), task: "task-rest".into(), run: String::new() }
}

#[test]
fn classifies_complete_missing_confounds_and_missing_bold() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();

    // sub-01: complete.
    let func = r.join("sub-01/ses-1/func");
    touch(&func.join(format!("sub-01_ses-1_task-rest_{SPACE}")));
    touch(&func.join("sub-01_ses-1_task-rest_desc-confounds_timeseries.tsv"));
    // sub-02: BOLD only.
    touch(&r.join(format!("sub-02/ses-1/func/sub-02_ses-1_task-rest_{SPACE}")));
    // sub-03: session directory but nothing in it.
    fs::create_dir_all(r.join("sub-03/ses-1")).unwrap();

    let report = scan(r).unwrap();
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.n_complete(), 1);

    assert!(report.entries[&key("sub-01", "ses-1")].is_complete());
    assert_eq!(report.entries[&key("sub-02", "ses-1")].missing, ["confounds"]);
    assert_eq!(report.entries[&key("sub-03", "ses-1")].missing, ["bold"]);

    let text = report.render();
    assert!(text.contains("sub-01 ses-1 task-rest: COMPLETE"), "{text}");
    assert!(text.contains("sub-02 ses-1 task-rest: INCOMPLETE (Missing: confounds)"), "{text}");
    assert!(text.contains("Incomplete: 2"), "{text}");
}

#[test]
fn runs_are_tracked_separately() {
    let root = tempfile::tempdir().unwrap();
    let func = root.path().join("sub-01/ses-1/func");
    for run in ["run-1", "run-2"] {
        touch(&func.join(format!("sub-01_ses-1_task-rest_{run}_{SPACE}")));
    }
    touch(&func.join("sub-01_ses-1_task-rest_run-1_desc-confounds_timeseries.tsv"));

    let report = scan(root.path()).unwrap();
    let incomplete: Vec<String> = report.incomplete().map(|(k, _)| k.to_string()).collect();
    // run-2 lacks confounds; the task-rest placeholder (no run) lacks a BOLD.
    assert!(incomplete.contains(&"sub-01 ses-1 task-rest run-2".to_string()), "{incomplete:?}");
    assert!(!incomplete.contains(&"sub-01 ses-1 task-rest run-1".to_string()));
}

#[test]
fn missing_root_is_an_error() {
    assert!(scan(Path::new("/nonexistent/derivatives")).is_err());
}

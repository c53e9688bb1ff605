//! Confound column selection.
//!
//! Priority order:
//! 1. explicit user list (replaces everything below);
//! 2. default motion + physiological columns present in the table;
//! 3. every `motion_outlier*` column, in table order (or, opt-in, synthetic
//!    `custom_spike_<i>` indicators when there are none);
//! 4. `global_signal` when GSR is enabled.
//!
//! Selection is a pure function of its inputs; names missing from the table
//! are dropped and listed in [`ConfoundSelection::missing`].
use std::borrow::Cow;

use super::table::{spike_column_name, ConfoundTable};
use crate::config::DenoiseConfig;

/// Six rigid-body motion parameters followed by the two physiological signals.
pub const DEFAULT_CONFOUNDS: [&str; 8] = [
    "trans_x", "trans_y", "trans_z",
    "rot_x", "rot_y", "rot_z",
    "white_matter", "csf",
];

/// Substring marking fMRIPrep's motion-outlier (spike) indicator columns.
pub const SPIKE_PATTERN: &str = "motion_outlier";

pub const GLOBAL_SIGNAL: &str = "global_signal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    Explicit,
    Defaults,
}

/// Ordered, deduplicated confound columns plus a record of how they were
/// chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfoundSelection {
    pub columns: Vec<String>,
    pub origin: SelectionOrigin,
    /// Number of `motion_outlier*` columns included.
    pub spike_columns: usize,
    /// Frames that received a synthetic spike regressor.
    pub synthesized_frames: Vec<usize>,
    pub gsr_included: bool,
    /// Requested (or default) names absent from the table.
    pub missing: Vec<String>,
}

impl ConfoundSelection {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Resolve the confound columns for `table`.
///
/// A non-empty `explicit_columns` yields exactly its entries present in the
/// table, in the given order; no default, spike or GSR logic runs.
pub fn select(table: &ConfoundTable, explicit_columns: &[String], use_gsr: bool) -> ConfoundSelection {
    if !explicit_columns.is_empty() {
        let mut b = Builder::new(table, SelectionOrigin::Explicit);
        for name in explicit_columns {
            b.push(name);
        }
        return b.finish();
    }

    let mut b = Builder::new(table, SelectionOrigin::Defaults);
    for name in DEFAULT_CONFOUNDS {
        b.push(name);
    }
    for name in spike_columns(table) {
        b.push(name);
        b.sel.spike_columns += 1;
    }
    if use_gsr {
        b.sel.gsr_included = b.push(GLOBAL_SIGNAL);
    }
    b.finish()
}

/// Run selection for a full [`DenoiseConfig`], applying the opt-in legacy
/// spike synthesis.
///
/// Returns the table the selection refers to: borrowed when unchanged, a new
/// table with `custom_spike_<i>` columns when spikes were synthesized.
pub fn select_for_config<'a>(
    table: &'a ConfoundTable,
    cfg: &DenoiseConfig,
) -> (Cow<'a, ConfoundTable>, ConfoundSelection) {
    let wants_synthesis = cfg.synthesize_spikes
        && cfg.explicit_columns.is_empty()
        && spike_columns(table).next().is_none();
    if !wants_synthesis {
        return (Cow::Borrowed(table), select(table, &cfg.explicit_columns, cfg.use_gsr));
    }

    let augmented = table.with_synthetic_spikes(&cfg.spike_frames);
    let mut b = Builder::new(&augmented, SelectionOrigin::Defaults);
    for name in DEFAULT_CONFOUNDS {
        b.push(name);
    }
    for &frame in &cfg.spike_frames {
        if b.push(&spike_column_name(frame)) {
            b.sel.synthesized_frames.push(frame);
        }
    }
    if cfg.use_gsr {
        b.sel.gsr_included = b.push(GLOBAL_SIGNAL);
    }
    let sel = b.finish();
    (Cow::Owned(augmented), sel)
}

/// Columns whose name contains [`SPIKE_PATTERN`], in table order.
pub fn spike_columns(table: &ConfoundTable) -> impl Iterator<Item = &str> {
    table
        .column_names()
        .iter()
        .map(String::as_str)
        .filter(|n| n.contains(SPIKE_PATTERN))
}

struct Builder<'t> {
    table: &'t ConfoundTable,
    sel: ConfoundSelection,
}

impl<'t> Builder<'t> {
    fn new(table: &'t ConfoundTable, origin: SelectionOrigin) -> Self {
        Self {
            table,
            sel: ConfoundSelection {
                columns: vec![],
                origin,
                spike_columns: 0,
                synthesized_frames: vec![],
                gsr_included: false,
                missing: vec![],
            },
        }
    }

    /// Append `name` if present and not yet selected. Returns whether the
    /// name is in the selection afterwards.
    fn push(&mut self, name: &str) -> bool {
        if !self.table.contains(name) {
            if !self.sel.missing.iter().any(|m| m == name) {
                self.sel.missing.push(name.to_string());
            }
            return false;
        }
        if !self.sel.columns.iter().any(|c| c == name) {
            self.sel.columns.push(name.to_string());
        }
        true
    }

    fn finish(self) -> ConfoundSelection {
        self.sel
    }
}

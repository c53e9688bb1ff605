//! Nuisance regressors: TSV loading and column selection.
//!
//! - [`table`]: [`ConfoundTable`] reader (missing cells → 0).
//! - [`select`]: default / explicit / spike / GSR column resolution.

pub mod select;
pub mod table;

pub use select::{
    select, select_for_config, spike_columns, ConfoundSelection, SelectionOrigin,
    DEFAULT_CONFOUNDS, GLOBAL_SIGNAL, SPIKE_PATTERN,
};
pub use table::{spike_column_name, ConfoundTable};

//! Error type of the NTv2 decoder.

use thiserror::Error;

/// Error decoding an NTv2 grid shift file.
#[derive(Debug, Error)]
pub enum Ntv2Error {
    /// The data does not start with a valid NTv2 overview header.
    #[error("not an NTv2 file: {0}")]
    Header(String),
    /// The data ends before all declared records are read.
    #[error("unexpected end of data while reading {0}")]
    Truncated(String),
    /// Number of nodes declared by a sub-grid does not match its extent.
    #[error("sub-grid '{sub_grid}' declares {declared} nodes, but its extent requires {expected}")]
    NodeCount {
        /// Sub-grid name.
        sub_grid: String,
        /// `GS_COUNT` value.
        declared: usize,
        /// Number of nodes computed from extent and spacing.
        expected: usize,
    },
    /// Sub-grid extent or spacing is not usable.
    #[error("invalid extent of sub-grid '{0}'")]
    Extent(String),
    /// Sub-grid references a parent that is not in the file.
    #[error("parent '{parent}' of sub-grid '{sub_grid}' not found")]
    UnknownParent {
        /// Sub-grid name.
        sub_grid: String,
        /// Name of the missing parent.
        parent: String,
    },
}

//! Error types for session edits and catalog access.

use thiserror::Error;

/// A rejected edit of the design session.
#[derive(Debug, Error, PartialEq)]
pub enum DesignError {
    /// A string must join at least two panels.
    #[error("a string needs at least 2 panels, got {count}")]
    TooFewPanels { count: usize },

    /// Panel identities must be unique within a session.
    #[error("panel \"{id}\" is already placed")]
    DuplicatePanel { id: String },

    /// Every rating and dimension of a panel must be positive.
    #[error("panel \"{id}\" needs positive watts, volts, amps, width and height")]
    InvalidPanel { id: String },
}

/// A failed catalog fetch at the boundary.
///
/// The sizing engine never sees this error: a failed listing is turned into
/// [`Listing::Unavailable`][crate::catalog::Listing::Unavailable].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog \"{path}\": {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog has no \"{0}\" listing")]
    MissingListing(&'static str),
}

//! Catalog listings and the fetch boundary.
//!
//! The catalog is read once per design session through a [`CatalogSource`].
//! Each listing is fetched independently; a failed fetch becomes
//! [`Listing::Unavailable`] instead of an error, so the sizing engine only
//! ever sees immutable snapshots.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use super::types::{Battery, Charger, Inverter, Mppt, Panel};
use crate::error::CatalogError;

/// A catalog record addressable by its store identity.
pub trait CatalogRecord {
    fn id(&self) -> &str;
}

macro_rules! impl_catalog_record {
    ($($ty:ty),*) => {
        $(
            impl CatalogRecord for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_catalog_record!(Panel, Mppt, Inverter, Battery, Charger);

/// One catalog listing: either the fetched records or the reason they are
/// missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Available(Vec<T>),
    Unavailable { reason: String },
}

impl<T> Listing<T> {
    fn from_fetch(kind: &'static str, fetched: Result<Vec<T>, CatalogError>) -> Self {
        match fetched {
            Ok(items) => Listing::Available(items),
            Err(e) => {
                warn!(listing = kind, error = %e, "catalog listing unavailable");
                Listing::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Returns `true` if the listing was fetched.
    pub fn is_available(&self) -> bool {
        matches!(self, Listing::Available(_))
    }

    /// Records in catalog order; empty when unavailable.
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Available(items) => items,
            Listing::Unavailable { .. } => &[],
        }
    }
}

impl<T: CatalogRecord> Listing<T> {
    /// Looks up a record by identity.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items().iter().find(|item| item.id() == id)
    }
}

/// Outcome of a catalog search.
///
/// `NoMatch` and `CatalogUnavailable` are normal results, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<T> {
    Found(T),
    NoMatch,
    CatalogUnavailable,
}

impl<T> MatchOutcome<T> {
    /// Returns the match, if any.
    pub fn found(self) -> Option<T> {
        match self {
            MatchOutcome::Found(t) => Some(t),
            MatchOutcome::NoMatch | MatchOutcome::CatalogUnavailable => None,
        }
    }

    pub fn as_ref(&self) -> MatchOutcome<&T> {
        match self {
            MatchOutcome::Found(t) => MatchOutcome::Found(t),
            MatchOutcome::NoMatch => MatchOutcome::NoMatch,
            MatchOutcome::CatalogUnavailable => MatchOutcome::CatalogUnavailable,
        }
    }
}

/// Boundary to wherever catalog records live.
///
/// Implementations own transport concerns (retry, timeouts); the sizing
/// engine never calls a source directly.
pub trait CatalogSource {
    fn panels(&self) -> Result<Vec<Panel>, CatalogError>;
    fn mppts(&self) -> Result<Vec<Mppt>, CatalogError>;
    fn inverters(&self) -> Result<Vec<Inverter>, CatalogError>;
    fn batteries(&self) -> Result<Vec<Battery>, CatalogError>;
    fn chargers(&self) -> Result<Vec<Charger>, CatalogError>;
}

/// A catalog stored as one JSON document with one array per listing.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    document: Map<String, Value>,
}

impl JsonCatalog {
    /// Parses a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the text is not a JSON object.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            document: serde_json::from_str(s)?,
        })
    }

    /// Reads and parses a catalog document from disk.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Read` if the file cannot be read, or
    /// `CatalogError::Parse` if it is not a JSON object.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw)
    }

    fn listing<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>, CatalogError> {
        let value = self
            .document
            .get(key)
            .ok_or(CatalogError::MissingListing(key))?;
        Ok(Vec::<T>::deserialize(value)?)
    }
}

impl CatalogSource for JsonCatalog {
    fn panels(&self) -> Result<Vec<Panel>, CatalogError> {
        self.listing("panels")
    }

    fn mppts(&self) -> Result<Vec<Mppt>, CatalogError> {
        self.listing("mppts")
    }

    fn inverters(&self) -> Result<Vec<Inverter>, CatalogError> {
        self.listing("inverters")
    }

    fn batteries(&self) -> Result<Vec<Battery>, CatalogError> {
        self.listing("batteries")
    }

    fn chargers(&self) -> Result<Vec<Charger>, CatalogError> {
        self.listing("chargers")
    }
}

/// Snapshot of every catalog listing for one design session.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub panels: Listing<Panel>,
    pub mppts: Listing<Mppt>,
    pub inverters: Listing<Inverter>,
    pub batteries: Listing<Battery>,
    pub chargers: Listing<Charger>,
}

impl Catalog {
    /// Fetches every listing from `source`, marking failed ones unavailable.
    pub fn fetch(source: &impl CatalogSource) -> Self {
        Self {
            panels: Listing::from_fetch("panels", source.panels()),
            mppts: Listing::from_fetch("mppts", source.mppts()),
            inverters: Listing::from_fetch("inverters", source.inverters()),
            batteries: Listing::from_fetch("batteries", source.batteries()),
            chargers: Listing::from_fetch("chargers", source.chargers()),
        }
    }

    /// A catalog whose listings are all unavailable for the same reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "catalog unavailable");
        Self {
            panels: Listing::Unavailable {
                reason: reason.clone(),
            },
            mppts: Listing::Unavailable {
                reason: reason.clone(),
            },
            inverters: Listing::Unavailable {
                reason: reason.clone(),
            },
            batteries: Listing::Unavailable {
                reason: reason.clone(),
            },
            chargers: Listing::Unavailable { reason },
        }
    }
}

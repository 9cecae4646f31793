//! Single-line tower layout strings for sharing a defence between runs.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use ghostlane_core::{CellCoord, TowerKind, TowerSnapshot, GRID_COLUMNS, GRID_ROWS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "lanes";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const SNAPSHOT_HEADER: &str = "lanes:v1";
const FIELD_DELIMITER: char = ':';

/// Towers placed on the battlefield together with the grid they were built on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TowerLayout {
    /// Number of lanes in the grid.
    pub rows: u32,
    /// Number of cells per lane.
    pub columns: u32,
    /// Towers in placement order.
    pub towers: Vec<LayoutTower>,
}

impl TowerLayout {
    /// Captures the towers currently standing on the battlefield.
    pub(crate) fn capture<'a>(towers: impl IntoIterator<Item = &'a TowerSnapshot>) -> Self {
        Self {
            rows: GRID_ROWS,
            columns: GRID_COLUMNS,
            towers: towers
                .into_iter()
                .map(|tower| LayoutTower {
                    kind: tower.kind,
                    cell: tower.cell,
                })
                .collect(),
        }
    }

    /// Encodes the layout into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = Payload {
            towers: self.towers.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.rows, self.columns
        ))
    }

    /// Decodes a layout from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (rows, columns) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: Payload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        Ok(Self {
            rows,
            columns,
            towers: decoded.towers,
        })
    }

    /// Ensures the layout fits the battlefield before any tower is placed.
    pub(crate) fn check_fits_grid(&self) -> Result<(), LayoutTransferError> {
        if self.rows != GRID_ROWS || self.columns != GRID_COLUMNS {
            return Err(LayoutTransferError::GridMismatch {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if let Some(tower) = self.towers.iter().find(|tower| !tower.cell.is_on_grid()) {
            return Err(LayoutTransferError::OffGrid(tower.cell));
        }
        Ok(())
    }
}

/// Tower entry captured in a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LayoutTower {
    /// Kind of tower to build.
    pub kind: TowerKind,
    /// Cell the tower occupies.
    pub cell: CellCoord,
}

#[derive(Serialize, Deserialize)]
struct Payload {
    towers: Vec<LayoutTower>,
}

/// Errors raised while encoding or decoding layout strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The grid dimensions were missing.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The prefix named another format.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version is unknown.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions segment could not be parsed.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The JSON payload could not be (de)serialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The layout was captured on a differently sized grid.
    #[error("layout was built for a {rows}x{columns} grid")]
    GridMismatch {
        /// Lanes recorded in the layout.
        rows: u32,
        /// Columns recorded in the layout.
        columns: u32,
    },
    /// A tower lies outside the battlefield.
    #[error("tower cell ({}, {}) lies outside the grid", .0.row(), .0.column())]
    OffGrid(CellCoord),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (rows, columns) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    if rows == 0 || columns == 0 {
        return Err(invalid());
    }
    Ok((rows, columns))
}

//! Volatility and asset (forward) grids.
//!
//! Both grids arrive as rows of loosely typed cells, the way they come out
//! of a spreadsheet range. Values are quoted in percent.
//!
//! A volatility grid has a header row naming the strike columns and one row
//! per swap tenor:
//!
//! | Swap Tenor | ATM - 50 | ATM | ATM + 50 |
//! |------------|----------|-----|----------|
//! | 1y         | 31.10    | 29.93 | 29.21  |
//!
//! Strike headers are `ATM`, `ATM ± bp` or an absolute strike in percent.
//!
//! An asset grid has a header row of swap tenors in years and one row per
//! option expiry. A legacy layout starts with an empty row, and some grids
//! carry a second "Swap Tenor" column of notes, which is dropped.

use ndarray::Array2;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use strata_math::interpolation::BilinearInterpolator;

use crate::error::{SabrError, SabrResult};
use crate::label::TermLabel;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridCell {
    /// Empty cell.
    Empty,
    /// Numeric cell.
    Number(f64),
    /// Text cell.
    Text(String),
}

impl GridCell {
    /// True for an empty cell or blank text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    /// Numeric value, parsing text if needed.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Empty => None,
        }
    }

    /// Reads the cell as an expiry or tenor label; numbers are years.
    pub fn as_label(&self) -> SabrResult<TermLabel> {
        match self {
            Self::Number(v) => TermLabel::from_years(*v),
            Self::Text(s) => TermLabel::parse(s),
            Self::Empty => Err(SabrError::invalid_label("")),
        }
    }
}

impl From<f64> for GridCell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for GridCell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Strike column of a volatility grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrikeColumn {
    /// At the forward.
    Atm,
    /// Offset from the forward in basis points.
    AtmOffset(Decimal),
    /// Absolute strike in decimal units.
    Absolute(f64),
}

impl StrikeColumn {
    /// Parses a header cell.
    pub fn parse(cell: &GridCell) -> SabrResult<Self> {
        if let GridCell::Text(text) = cell {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            if let Some(rest) = compact
                .strip_prefix("ATM")
                .or_else(|| compact.strip_prefix("atm"))
            {
                if rest.is_empty() {
                    return Ok(Self::Atm);
                }
                let bp = Decimal::from_str(rest.trim_start_matches('+')).map_err(|_| {
                    SabrError::invalid_grid(format!("unreadable strike header '{text}'"))
                })?;
                return Ok(if bp.is_zero() {
                    Self::Atm
                } else {
                    Self::AtmOffset(bp)
                });
            }
        }
        cell.as_number()
            .map(|pct| Self::Absolute(pct / 100.0))
            .ok_or_else(|| SabrError::invalid_grid(format!("unreadable strike header {cell:?}")))
    }

    /// Absolute strike for a forward level.
    #[must_use]
    pub fn strike(&self, forward: f64) -> f64 {
        match self {
            Self::Atm => forward,
            Self::AtmOffset(bp) => forward + bp.to_f64().unwrap_or_default() / 10_000.0,
            Self::Absolute(k) => *k,
        }
    }
}

/// Smile quoted for one swap tenor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRow {
    /// Swap tenor.
    pub tenor: TermLabel,
    /// Lognormal vols in decimal units, one per strike column.
    pub vols: Vec<f64>,
}

/// Smiles for one option expiry, one row per swap tenor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityGrid {
    columns: Vec<StrikeColumn>,
    rows: Vec<VolatilityRow>,
}

impl VolatilityGrid {
    /// Parses a grid whose first non-empty row is the strike header.
    ///
    /// Rows with a missing or non-positive vol are skipped.
    pub fn parse(cells: &[Vec<GridCell>]) -> SabrResult<Self> {
        let mut rows = cells.iter().filter(|r| !r.iter().all(GridCell::is_empty));
        let header = rows
            .next()
            .ok_or_else(|| SabrError::invalid_grid("volatility grid is empty"))?;
        let columns = header
            .iter()
            .skip(1)
            .filter(|c| !c.is_empty())
            .map(StrikeColumn::parse)
            .collect::<SabrResult<Vec<_>>>()?;
        if columns.is_empty() {
            return Err(SabrError::invalid_grid("volatility grid has no strike columns"));
        }

        let mut parsed = Vec::new();
        for row in rows {
            let tenor = row
                .first()
                .ok_or_else(|| SabrError::invalid_grid("empty volatility row"))?
                .as_label()?;
            let vols: Vec<Option<f64>> = (1..=columns.len())
                .map(|j| row.get(j).and_then(GridCell::as_number))
                .collect();
            if vols.iter().all(|v| v.is_some_and(|v| v > 0.0)) {
                parsed.push(VolatilityRow {
                    tenor,
                    vols: vols.into_iter().flatten().map(|v| v / 100.0).collect(),
                });
            } else {
                debug!("skipping volatility row {tenor}: missing or non-positive vols");
            }
        }
        if parsed.is_empty() {
            return Err(SabrError::invalid_grid("volatility grid has no usable rows"));
        }
        Ok(Self {
            columns,
            rows: parsed,
        })
    }

    /// Strike columns.
    #[must_use]
    pub fn columns(&self) -> &[StrikeColumn] {
        &self.columns
    }

    /// Usable rows.
    #[must_use]
    pub fn rows(&self) -> &[VolatilityRow] {
        &self.rows
    }

    /// Absolute strikes for a forward level.
    #[must_use]
    pub fn strikes(&self, forward: f64) -> Vec<f64> {
        self.columns.iter().map(|c| c.strike(forward)).collect()
    }
}

/// Forward levels by option expiry and swap tenor.
#[derive(Debug, Clone)]
pub struct AssetGrid {
    expiries: Vec<TermLabel>,
    tenors: Vec<f64>,
    levels: BilinearInterpolator,
}

impl AssetGrid {
    /// Parses a grid whose first non-empty row is the tenor header.
    pub fn parse(cells: &[Vec<GridCell>]) -> SabrResult<Self> {
        let mut rows = cells.iter().filter(|r| !r.iter().all(GridCell::is_empty));
        let header = rows
            .next()
            .ok_or_else(|| SabrError::invalid_grid("asset grid is empty"))?;

        let notes_column = header.get(1).is_some_and(|c| {
            c.is_empty()
                || matches!(c, GridCell::Text(s) if s.trim().eq_ignore_ascii_case("swap tenor"))
        });
        let first_value = if notes_column { 2 } else { 1 };

        let tenors = header
            .iter()
            .skip(first_value)
            .filter(|c| !c.is_empty())
            .map(|c| c.as_label().map(|l| l.year_fraction()))
            .collect::<SabrResult<Vec<_>>>()?;
        if tenors.is_empty() {
            return Err(SabrError::invalid_grid("asset grid has no tenor columns"));
        }

        let mut by_expiry: Vec<(TermLabel, Vec<f64>)> = Vec::new();
        for row in rows {
            let expiry = row
                .first()
                .ok_or_else(|| SabrError::invalid_grid("empty asset row"))?
                .as_label()?;
            let levels = (0..tenors.len())
                .map(|j| {
                    row.get(first_value + j)
                        .and_then(GridCell::as_number)
                        .map(|v| v / 100.0)
                        .ok_or_else(|| {
                            SabrError::invalid_grid(format!(
                                "asset grid row {expiry} is missing column {}",
                                j + 1
                            ))
                        })
                })
                .collect::<SabrResult<Vec<_>>>()?;
            by_expiry.push((expiry, levels));
        }
        by_expiry.sort_by(|a, b| a.0.year_fraction().total_cmp(&b.0.year_fraction()));
        if let Some(w) = by_expiry
            .windows(2)
            .find(|w| (w[0].0.year_fraction() - w[1].0.year_fraction()).abs() < 1e-12)
        {
            return Err(SabrError::invalid_grid(format!(
                "asset grid repeats expiry {} as {}",
                w[0].0, w[1].0
            )));
        }
        if by_expiry.is_empty() {
            return Err(SabrError::invalid_grid("asset grid has no expiry rows"));
        }

        let mut values = Array2::zeros((by_expiry.len(), tenors.len()));
        for (i, (_, levels)) in by_expiry.iter().enumerate() {
            for (j, level) in levels.iter().enumerate() {
                values[[i, j]] = *level;
            }
        }
        let expiries: Vec<TermLabel> = by_expiry.into_iter().map(|(e, _)| e).collect();
        let expiry_years = expiries.iter().map(TermLabel::year_fraction).collect();
        let levels = BilinearInterpolator::new(expiry_years, tenors.clone(), values)
            .map_err(|e| SabrError::invalid_grid(format!("asset grid axes: {e}")))?;

        Ok(Self {
            expiries,
            tenors,
            levels,
        })
    }

    /// Forward level in decimal units.
    ///
    /// Linear in tenor between quoted columns and linear in expiry between
    /// quoted rows; flat beyond the grid.
    pub fn forward(&self, expiry: TermLabel, tenor: TermLabel) -> SabrResult<f64> {
        Ok(self
            .levels
            .interpolate(expiry.year_fraction(), tenor.year_fraction())?)
    }

    /// Option expiries, shortest first.
    #[must_use]
    pub fn expiries(&self) -> &[TermLabel] {
        &self.expiries
    }

    /// Swap tenors in years.
    #[must_use]
    pub fn tenors(&self) -> &[f64] {
        &self.tenors
    }
}

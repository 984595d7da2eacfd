//! Generation requests: clamping, parsing and selection checks.
//!
//! Numeric values are clamped into range rather than rejected. Text input is
//! stricter: anything that is not a positive integer is an [`InputError`]
//! and nothing is clamped or generated.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::category::CategoryRegistry;
use crate::error::InputError;

pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 6000;
pub const MIN_PIXEL_SIZE: u32 = 8;
pub const MAX_PIXEL_SIZE: u32 = 512;

/// Clamps a per-category count into `[MIN_COUNT, MAX_COUNT]`.
pub fn clamp_count(requested: i64) -> u32 {
    requested.clamp(MIN_COUNT as i64, MAX_COUNT as i64) as u32
}

/// Clamps an icon edge length into `[MIN_PIXEL_SIZE, MAX_PIXEL_SIZE]`.
pub fn clamp_pixel_size(requested: i64) -> u32 {
    requested.clamp(MIN_PIXEL_SIZE as i64, MAX_PIXEL_SIZE as i64) as u32
}

/// Parses a strictly positive integer typed by a user.
pub fn parse_positive(field: &'static str, text: &str) -> Result<i64, InputError> {
    let value: i64 = text.trim().parse().map_err(|_| InputError::NotNumeric {
        field,
        value: text.to_string(),
    })?;
    if value <= 0 {
        return Err(InputError::NotPositive { field, value });
    }
    Ok(value)
}

/// Parses one category id.
pub fn parse_category_id(text: &str) -> Result<usize, InputError> {
    text.trim()
        .parse()
        .map_err(|_| InputError::InvalidCategoryId(text.to_string()))
}

/// Parses a comma separated list of category ids. Blank entries are skipped.
pub fn parse_category_ids(text: &str) -> Result<Vec<usize>, InputError> {
    text.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_category_id)
        .collect()
}

// ============================================================================
// GenerationRequest
// ============================================================================

/// A validated, clamped request for one batch run.
///
/// Category ids are kept sorted and unique, which is also the order the
/// pipeline processes them in.
///
/// # JSON Format
///
/// ```json
/// { "categoryIds": [0, 2], "countPerCategory": 100, "pixelSize": 64 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RequestFields")]
pub struct GenerationRequest {
    category_ids: Vec<usize>,
    count_per_category: u32,
    pixel_size: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestFields {
    category_ids: Vec<usize>,
    count_per_category: i64,
    pixel_size: i64,
}

impl TryFrom<RequestFields> for GenerationRequest {
    type Error = InputError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        Self::new(fields.category_ids, fields.count_per_category, fields.pixel_size)
    }
}

impl GenerationRequest {
    /// Builds a request, clamping `count` and `pixel_size`.
    ///
    /// Fails only on an empty selection.
    pub fn new(
        category_ids: impl IntoIterator<Item = usize>,
        count: i64,
        pixel_size: i64,
    ) -> Result<Self, InputError> {
        let ids: BTreeSet<usize> = category_ids.into_iter().collect();
        if ids.is_empty() {
            return Err(InputError::EmptySelection);
        }
        Ok(Self {
            category_ids: ids.into_iter().collect(),
            count_per_category: clamp_count(count),
            pixel_size: clamp_pixel_size(pixel_size),
        })
    }

    /// Builds a request from text fields.
    ///
    /// `categories` is a comma separated id list. `count` and `pixel_size`
    /// must be positive integers; they are clamped afterwards.
    pub fn parse(categories: &str, count: &str, pixel_size: &str) -> Result<Self, InputError> {
        let ids = parse_category_ids(categories)?;
        let count = parse_positive("count", count)?;
        let pixel_size = parse_positive("size", pixel_size)?;
        Self::new(ids, count, pixel_size)
    }

    /// Checks every selected id against the registry.
    pub fn validate(&self, registry: &CategoryRegistry) -> Result<(), InputError> {
        match self.category_ids.iter().find(|&&id| !registry.contains(id)) {
            Some(&id) => Err(InputError::UnknownCategory {
                id,
                len: registry.len(),
            }),
            None => Ok(()),
        }
    }

    pub fn category_ids(&self) -> &[usize] {
        &self.category_ids
    }

    pub fn is_selected(&self, id: usize) -> bool {
        self.category_ids.binary_search(&id).is_ok()
    }

    pub fn count_per_category(&self) -> u32 {
        self.count_per_category
    }

    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Icons the run will produce if it completes.
    pub fn total(&self) -> usize {
        self.category_ids.len() * self.count_per_category as usize
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

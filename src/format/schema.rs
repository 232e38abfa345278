//! Persisted landmark model schema.
//!
//! A model file separates *topology* from *geometry*:
//!
//! ```json
//! {
//!   "index": { "left_eye": [0, 1, 2], "nose": [3, 4] },
//!   "keys":  ["left_eye", "nose"],
//!   "pos":   [[10, 20], [20, 30], [30, 40], [50, 60], [55, 70]]
//! }
//! ```
//!
//! `keys` fixes the group order, `index` lists which entries of the flat
//! `pos` array belong to each group (in point order). The same topology can
//! be reused with a different `pos` array, e.g. landmarks detected on
//! another photograph.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::model::Point;

/// Topology plus geometry of a landmark model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Offsets into `pos` per group label.
    pub index: BTreeMap<String, Vec<usize>>,

    /// Group labels in creation order.
    pub keys: Vec<String>,

    /// Flat list of positions.
    pub pos: Vec<Point>,
}

impl ModelSchema {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema whose groups occupy consecutive runs of `pos`, in
    /// `groups` order.
    pub fn from_groups<I, L, P>(groups: I) -> Self
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: IntoIterator<Item = Point>,
    {
        let mut schema = Self::new();
        for (label, points) in groups {
            let label = label.into();
            let start = schema.pos.len();
            schema.pos.extend(points);
            schema
                .index
                .insert(label.clone(), (start..schema.pos.len()).collect());
            schema.keys.push(label);
        }
        schema
    }

    /// Parse a schema from JSON text. The result is not yet validated.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize with pretty printing for readability.
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that topology and geometry agree.
    ///
    /// `keys` must list exactly the labels of `index`, once each, and every
    /// position must be referenced by exactly one index entry.
    pub fn validate(&self) -> Result<(), FormatError> {
        let mut seen_keys = HashSet::with_capacity(self.keys.len());
        for key in &self.keys {
            if !seen_keys.insert(key.as_str()) {
                return Err(FormatError::DuplicateKey { key: key.clone() });
            }
            if !self.index.contains_key(key) {
                return Err(FormatError::MissingIndex { key: key.clone() });
            }
        }
        if let Some(key) = self.index.keys().find(|k| !seen_keys.contains(k.as_str())) {
            return Err(FormatError::UnlistedKey { key: key.clone() });
        }

        let len = self.pos.len();
        let mut owners: HashMap<usize, &str> = HashMap::with_capacity(len);
        for key in &self.keys {
            for &offset in &self.index[key] {
                if offset >= len {
                    return Err(FormatError::index_out_of_range(key.as_str(), offset, len));
                }
                if let Some(first) = owners.insert(offset, key.as_str()) {
                    return Err(FormatError::DuplicateIndex {
                        index: offset,
                        first: first.to_string(),
                        second: key.clone(),
                    });
                }
            }
        }

        let referenced = self.total_points();
        if referenced != len {
            return Err(FormatError::PositionCountMismatch { referenced, len });
        }
        Ok(())
    }

    /// Number of offsets across all groups.
    pub fn total_points(&self) -> usize {
        self.index.values().map(Vec::len).sum()
    }

    /// Points of one group, in point order. Out-of-range offsets are skipped;
    /// call [`validate`](Self::validate) first.
    pub fn group_points(&self, key: &str) -> Vec<Point> {
        self.index
            .get(key)
            .map(|offsets| {
                offsets
                    .iter()
                    .filter_map(|&i| self.pos.get(i).copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Same topology, every coordinate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        self.with_positions(self.pos.iter().map(|p| p.scaled(factor)).collect())
    }

    /// Same topology, different geometry.
    pub fn with_positions(&self, pos: Vec<Point>) -> Self {
        Self {
            index: self.index.clone(),
            keys: self.keys.clone(),
            pos,
        }
    }

    /// Whether two schemas share topology and agree on positions within
    /// `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.index == other.index
            && self.keys == other.keys
            && self.pos.len() == other.pos.len()
            && self
                .pos
                .iter()
                .zip(&other.pos)
                .all(|(a, b)| a.approx_eq(b, epsilon))
    }
}

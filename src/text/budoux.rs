use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::foundation::error::{OgError, OgResult};
use crate::text::segment::Segmenter;

/// Feature groups of a BudouX model, with the char window each one reads relative to the
/// candidate boundary `i` (the boundary sits between `i - 1` and `i`).
const FEATURES: [(&str, isize, isize); 13] = [
    ("UW1", -3, -2),
    ("UW2", -2, -1),
    ("UW3", -1, 0),
    ("UW4", 0, 1),
    ("UW5", 1, 2),
    ("UW6", 2, 3),
    ("BW1", -2, 0),
    ("BW2", -1, 1),
    ("BW3", 0, 2),
    ("TW1", -3, 0),
    ("TW2", -2, 1),
    ("TW3", -1, 2),
    ("TW4", 0, 3),
];

/// Weighted n-gram phrase-boundary model in the BudouX JSON format.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct BudouxModel {
    groups: HashMap<String, HashMap<String, i64>>,
}

impl BudouxModel {
    pub fn from_json_str(s: &str) -> OgResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| OgError::asset(format!("invalid segmentation model JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> OgResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read segmentation model '{}'", path.display()))
            .map_err(OgError::asset_from)?;
        Self::from_json_str(&s)
    }

    fn weight(&self, group: &str, key: &str) -> i64 {
        if key.is_empty() {
            return 0;
        }
        self.groups
            .get(group)
            .and_then(|g| g.get(key))
            .copied()
            .unwrap_or(0)
    }

    fn total_weight(&self) -> i64 {
        self.groups.values().flat_map(|g| g.values()).sum()
    }
}

/// [`Segmenter`] backed by a [`BudouxModel`].
#[derive(Clone, Debug)]
pub struct BudouxSegmenter {
    model: BudouxModel,
    // Scores are kept doubled so the `-sum / 2` bias stays integral.
    base_score_x2: i64,
}

impl BudouxSegmenter {
    pub fn new(model: BudouxModel) -> Self {
        let base_score_x2 = -model.total_weight();
        Self {
            model,
            base_score_x2,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> OgResult<Self> {
        Ok(Self::new(BudouxModel::from_path(path)?))
    }
}

/// Model windows index like `String.prototype.slice` in the reference BudouX parser: a
/// negative end counts back from the end of the sentence, an end past `len` stops at `len`, and
/// a window whose start does not precede its end is empty.
fn window(chars: &[char], start: isize, end: isize) -> String {
    let len = chars.len() as isize;
    let resolve = |at: isize| {
        if at < 0 {
            (len + at).max(0) as usize
        } else {
            at.min(len) as usize
        }
    };
    let (s, e) = (resolve(start), resolve(end));
    if s >= e {
        return String::new();
    }
    chars[s..e].iter().collect()
}

impl Segmenter for BudouxSegmenter {
    fn boundaries(&self, chars: &[char]) -> Vec<usize> {
        let mut out = Vec::new();
        for i in 1..chars.len() {
            let at = i as isize;
            let mut score_x2 = self.base_score_x2;
            for (group, from, to) in FEATURES {
                let key = window(chars, at + from, at + to);
                score_x2 += 2 * self.model.weight(group, &key);
            }
            if score_x2 > 0 {
                out.push(i);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/budoux.rs"]
mod tests;

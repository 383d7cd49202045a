//! Reference counting and asset scoring per framework

use super::bytecode::DisassemblyText;
use super::framework::FrameworkId;
use super::signatures::{signatures, ManifestEntry, Signature};
use crate::fs::FileSystem;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// The two independent signals gathered for one framework
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceVector {
    /// Pattern matches in the disassembly
    pub references: u64,
    /// Weighted share of the framework's manifest found on disk, 0..=100
    pub asset_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Evidence(BTreeMap<FrameworkId, EvidenceVector>);

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FrameworkId, vector: EvidenceVector) {
        self.0.insert(id, vector);
    }

    pub fn get(&self, id: FrameworkId) -> EvidenceVector {
        self.0.get(&id).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrameworkId, EvidenceVector)> + '_ {
        self.0.iter().map(|(id, vector)| (*id, *vector))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(FrameworkId, EvidenceVector)> for Evidence {
    fn from_iter<I: IntoIterator<Item = (FrameworkId, EvidenceVector)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Non-overlapping matches of `pattern` in `text`
pub fn count_references(pattern: &Regex, text: &str) -> u64 {
    pattern.find_iter(text).count() as u64
}

/// Percentage of manifest weight present under `root`
pub fn score_assets(fs: &dyn FileSystem, root: &Path, manifest: &[ManifestEntry]) -> f64 {
    let total: u32 = manifest.iter().map(|entry| entry.weight).sum();
    if total == 0 {
        return 0.0;
    }

    let present: u32 = manifest
        .iter()
        .filter(|entry| {
            let path = entry.resolve(root);
            let exists = fs.exists(&path);
            debug!(path = entry.path, exists, "Checked asset");
            exists
        })
        .map(|entry| entry.weight)
        .sum();

    f64::from(present) / f64::from(total) * 100.0
}

fn evidence_for(
    signature: &Signature,
    fs: &dyn FileSystem,
    text: &DisassemblyText,
    root: &Path,
) -> EvidenceVector {
    let references = signature
        .matcher()
        .map(|re| count_references(&re, text.as_str()))
        .unwrap_or(0);

    EvidenceVector {
        references,
        asset_score: score_assets(fs, root, signature.manifest),
    }
}

/// Collects both signals for every known framework
pub fn collect_evidence(fs: &dyn FileSystem, text: &DisassemblyText, root: &Path) -> Evidence {
    signatures()
        .iter()
        .map(|signature| {
            let vector = evidence_for(signature, fs, text, root);
            debug!(
                framework = %signature.id,
                references = vector.references,
                asset_score = vector.asset_score,
                "Collected evidence"
            );
            (signature.id, vector)
        })
        .collect()
}

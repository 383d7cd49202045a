//! Framework fingerprint table
//!
//! Each framework is described by a reference pattern, searched for in the
//! disassembled bytecode, and a weighted manifest of files it ships inside the
//! package. Supporting another framework means adding a row here.

use super::framework::FrameworkId;
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A file or directory a framework bundles, with its evidential weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the extraction root, `/`-separated
    pub path: &'static str,
    pub weight: u32,
}

impl ManifestEntry {
    pub const fn new(path: &'static str, weight: u32) -> Self {
        Self { path, weight }
    }

    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.path
            .split('/')
            .fold(root.to_path_buf(), |acc, part| acc.join(part))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub id: FrameworkId,
    /// Case-insensitive reference pattern
    pub pattern: &'static str,
    pub manifest: &'static [ManifestEntry],
}

impl Signature {
    /// Compiles the reference pattern; `None` if the pattern is malformed
    pub fn matcher(&self) -> Option<Regex> {
        match RegexBuilder::new(self.pattern).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(framework = %self.id, error = %e, "Invalid reference pattern");
                None
            }
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.manifest.iter().map(|entry| entry.weight).sum()
    }
}

const REACT_MANIFEST: &[ManifestEntry] = &[ManifestEntry::new(
    "lib/armeabi-v7a/libreactnativejni.so",
    10,
)];

const FLUTTER_MANIFEST: &[ManifestEntry] = &[
    ManifestEntry::new("assets/flutter_assets", 1),
    ManifestEntry::new("assets/flutter_shared", 1),
    ManifestEntry::new("lib/armeabi-v7a/libflutter.so", 10),
];

const CORDOVA_MANIFEST: &[ManifestEntry] = &[
    ManifestEntry::new("assets/www", 1),
    ManifestEntry::new("assets/www/cordova.js", 10),
    ManifestEntry::new("assets/www/cordova_plugins.js", 2),
];

static SIGNATURES: [Signature; 3] = [
    Signature {
        id: FrameworkId::React,
        pattern: r"com/facebook/react",
        manifest: REACT_MANIFEST,
    },
    Signature {
        id: FrameworkId::Flutter,
        pattern: r"\bflutter\b",
        manifest: FLUTTER_MANIFEST,
    },
    Signature {
        id: FrameworkId::Cordova,
        pattern: r"\b(?:ionic|cordova|phonegap)\b",
        manifest: CORDOVA_MANIFEST,
    },
];

/// All known framework signatures, in reporting order
pub fn signatures() -> &'static [Signature] {
    &SIGNATURES
}

//! Shared fixture scripts for stickfig test suites.
//!
//! Fixtures live under the repository-root `fixtures/` directory and are
//! indexed by `fixtures/manifest.json`; tests address them by name.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    figures: HashMap<String, String>,
    invalid: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a String> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Well-formed skeleton scripts.
pub mod figures {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.figures.keys().cloned().collect()
    }

    pub fn script(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.figures, "figure", name)?;
        read_to_string(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.figures, "figure", name)?;
        Ok(resolve_path(rel))
    }
}

/// Deliberately malformed scripts; every one of these must fail to parse.
pub mod invalid {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.invalid.keys().cloned().collect()
    }

    pub fn script(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.invalid, "invalid", name)?;
        read_to_string(rel)
    }
}

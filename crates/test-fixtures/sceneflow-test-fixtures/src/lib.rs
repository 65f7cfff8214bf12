//! Shared test fixtures: declarative flow programs stored as JSON under the
//! repository-level `fixtures/` directory, listed in its manifest. The DTOs
//! here use plain strings for object and element names so the crate stays
//! independent of the core id types; test harnesses resolve names to ids.

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
    flows: HashMap<String, String>,
}

/// Canvas override for a program; absent means the harness default.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CanvasFixture {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectFixture {
    pub name: String,
    /// Matches the serialized form of the core category enum.
    pub category: String,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub align_with: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepFixture {
    /// Read an element out of a container position and bind it to `name`.
    Read {
        name: String,
        object: String,
        index: u32,
        #[serde(default)]
        lane: u32,
        #[serde(default)]
        bit_offset: u32,
        #[serde(default = "default_bit_width")]
        bit_width: u32,
    },
    /// Register one action over previously bound element names.
    Act {
        #[serde(default)]
        consume: Vec<String>,
        #[serde(default)]
        produce: Vec<String>,
        #[serde(default)]
        write_into: Vec<String>,
        #[serde(default)]
        serialize_on: Option<String>,
    },
    /// Close the current section.
    EndSection {
        #[serde(default)]
        retain: Vec<String>,
        #[serde(default)]
        retain_positions: bool,
    },
}

fn default_bit_width() -> u32 {
    32
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowProgram {
    #[serde(default)]
    pub canvas: Option<CanvasFixture>,
    pub objects: Vec<ObjectFixture>,
    pub steps: Vec<StepFixture>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

/// Raw JSON text of a named flow program.
pub fn flow_json(name: &str) -> Result<String> {
    let rel = MANIFEST
        .flows
        .get(name)
        .ok_or_else(|| anyhow!("unknown flow fixture '{name}'"))?;
    read_to_string(rel)
}

/// Parsed flow program for a manifest name.
pub fn flow(name: &str) -> Result<FlowProgram> {
    let raw = flow_json(name)?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse flow fixture '{name}'"))
}

/// Every flow name the manifest lists, sorted for stable iteration.
pub fn flow_names() -> Vec<String> {
    let mut names: Vec<String> = MANIFEST.flows.keys().cloned().collect();
    names.sort();
    names
}

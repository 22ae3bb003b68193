//! Conversion of competitive programming problems into DOMjudge packages.
//!
//! Two pipelines live here:
//! - [`usaco`] scrapes problem pages and test archives from the USACO site;
//! - [`polygon`] converts Polygon problem and contest packages.
//!
//! Network, archive and template access are behind traits ([`fetch::Fetch`],
//! [`archive::Archive`], [`render::Render`]), so both pipelines can run offline.
pub mod archive;
pub mod color;
pub mod config;
pub mod fetch;
mod fs_util;
pub mod polygon;
pub mod render;
pub mod statement;
pub mod usaco;

pub use config::Config;

use anyhow::Context as _;
use std::path::Path;

/// Creates output directory, refusing to write into non-empty one unless `force`
pub fn prepare_out_dir(path: &Path, force: bool) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("create output directory {}", path.display()))?;
        return Ok(());
    }
    fs_util::check_dir(path, force)
}

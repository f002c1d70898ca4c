// src/export/mod.rs

//! Writing generated DAGs to disk.
//!
//! Layout under the destination directory:
//!
//! ```text
//! <dest>/<combination>/combination_log.toml
//! <dest>/<combination>/dag_0.json
//! <dest>/<combination>/dag_0.dot
//! ```

pub mod dot;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::combo::Combination;
use crate::config::model::DagFormats;
use crate::dag::TaskDag;
use crate::errors::Result;
use crate::generate::DagSink;

pub use dot::to_dot;
pub use json::{to_json_string, to_node_link};

pub const COMBINATION_LOG_FILE: &str = "combination_log.toml";

/// [`DagSink`] writing one directory per combination.
#[derive(Debug, Clone)]
pub struct DagExporter {
    dest_dir: PathBuf,
    formats: DagFormats,
}

impl DagExporter {
    pub fn new(dest_dir: impl Into<PathBuf>, formats: DagFormats) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            formats,
        }
    }

    pub fn combination_dir(&self, combination: &Combination) -> PathBuf {
        self.dest_dir.join(&combination.dir_name)
    }

    /// Write `dag` as `<dir>/<stem>.json` and/or `<dir>/<stem>.dot`.
    pub fn export(&self, dag: &TaskDag, dir: &Path, stem: &str) -> Result<()> {
        if self.formats.json {
            let path = dir.join(format!("{stem}.json"));
            fs::write(&path, to_json_string(dag)?)?;
            debug!(path = %path.display(), "wrote JSON");
        }
        if self.formats.dot {
            let path = dir.join(format!("{stem}.dot"));
            fs::write(&path, to_dot(dag))?;
            debug!(path = %path.display(), "wrote DOT");
        }
        Ok(())
    }
}

impl DagSink for DagExporter {
    fn begin_combination(&mut self, combination: &Combination, seed: u64) -> Result<()> {
        let dir = self.combination_dir(combination);
        fs::create_dir_all(&dir)?;
        let log = toml::to_string(&combination.log(seed))?;
        fs::write(dir.join(COMBINATION_LOG_FILE), log)?;
        Ok(())
    }

    fn write_dag(&mut self, combination: &Combination, index: usize, dag: &TaskDag) -> Result<()> {
        let dir = self.combination_dir(combination);
        self.export(dag, &dir, &format!("dag_{index}"))
    }
}

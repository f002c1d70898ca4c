// src/config/combo.rs

//! Enumeration of parameter combinations.
//!
//! Every `combination` parameter is an axis. The generator walks the
//! cartesian product of all axes (last declared axis varies fastest) and
//! yields one pinned [`GeneratorConfig`] per point, together with the name of
//! the directory its DAGs are written to.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::model::ConfigFile;
use crate::config::resolved::{ComboAxis, GeneratorConfig, Resolver};
use crate::errors::Result;
use crate::types::{CombinationNaming, Number};

/// One point of the combination product.
#[derive(Debug, Clone)]
pub struct Combination {
    /// Zero-based position in the enumeration.
    pub index: usize,
    pub dir_name: String,
    /// Axis values in declaration order.
    pub values: Vec<(String, Number)>,
    pub config: GeneratorConfig,
}

impl Combination {
    pub fn log(&self, seed: u64) -> CombinationLog {
        CombinationLog {
            index: self.index + 1,
            directory: self.dir_name.clone(),
            seed,
            parameters: self.values.iter().cloned().collect(),
        }
    }
}

/// Content of `combination_log.toml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationLog {
    pub index: usize,
    pub directory: String,
    pub seed: u64,
    pub parameters: BTreeMap<String, Number>,
}

#[derive(Debug, Clone)]
pub struct ComboGenerator<'a> {
    cfg: &'a ConfigFile,
    axes: Vec<ComboAxis>,
}

impl<'a> ComboGenerator<'a> {
    pub fn new(cfg: &'a ConfigFile) -> Result<Self> {
        let mut resolver = Resolver::collecting();
        resolver.resolve(cfg.raw())?;
        Ok(Self {
            cfg,
            axes: resolver.into_axes(),
        })
    }

    pub fn axes(&self) -> &[ComboAxis] {
        &self.axes
    }

    /// Number of combinations (1 when there are no axes).
    pub fn len(&self) -> usize {
        self.axes.iter().map(|a| a.values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Combination at `index`, with the config pinned to its axis values.
    pub fn get(&self, index: usize) -> Result<Combination> {
        let values = self.values_at(index);
        let assignment: BTreeMap<String, Number> = values.iter().cloned().collect();
        let config = Resolver::assigned(&assignment).resolve(self.cfg.raw())?;
        let dir_name = directory_name(
            self.cfg.output_formats().naming_of_combination_directory,
            index,
            &values,
        );
        Ok(Combination {
            index,
            dir_name,
            values,
            config,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Combination>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    fn values_at(&self, index: usize) -> Vec<(String, Number)> {
        let mut rest = index;
        let mut values: Vec<(String, Number)> = self
            .axes
            .iter()
            .rev()
            .map(|axis| {
                let n = axis.values.len();
                let v = axis.values[rest % n];
                rest /= n;
                (axis.name.clone(), v)
            })
            .collect();
        values.reverse();
        values
    }
}

/// Directory name for one combination.
///
/// - `Abbreviation`: `NN_10_CCR_0.5`
/// - `FullSpell`: `NumberOfNodes_10_Ccr_0.5`
/// - `Index`: `combination_1`
///
/// Without axes the name is `default` (or `combination_1` for `Index`).
pub fn directory_name(naming: CombinationNaming, index: usize, values: &[(String, Number)]) -> String {
    if naming == CombinationNaming::Index {
        return format!("combination_{}", index + 1);
    }
    if values.is_empty() {
        return "default".to_string();
    }

    values
        .iter()
        .map(|(name, value)| {
            let label = match naming {
                CombinationNaming::Abbreviation => abbreviation(name),
                _ => full_spell(name),
            };
            format!("{label}_{value}")
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Short label of a parameter; unknown names (extra properties) are kept.
pub fn abbreviation(name: &str) -> String {
    let abb = match name {
        "probability_of_edge" => "PE",
        "in_degree" => "ID",
        "out_degree" => "OD",
        "number_of_nodes" => "NN",
        "number_of_chains" => "NC",
        "main_sequence_length" => "MSL",
        "number_of_sub_sequences" => "NSS",
        "number_of_entry_nodes" => "NEN",
        "number_of_exit_nodes" => "NEX",
        "communication_time" => "CT",
        "execution_time" => "ET",
        "ccr" => "CCR",
        "ratio_of_deadline_to_critical_path" => "RDC",
        "offset" => "OS",
        "period" => "P",
        "entry_node_period" => "EP",
        "exit_node_period" => "XP",
        "total_utilization" => "TU",
        "maximum_utilization" => "MU",
        other => other,
    };
    abb.to_string()
}

/// `number_of_nodes` -> `NumberOfNodes`.
pub fn full_spell(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

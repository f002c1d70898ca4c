// src/generate.rs

//! Generation driver.
//!
//! Walks every parameter combination, builds `number_of_dags` DAGs for each,
//! annotates them and hands them to a [`DagSink`]. An infeasible combination
//! or a DAG that cannot be built is logged and skipped; only sink errors
//! (I/O) abort the run.

use rand::RngCore;
use tracing::{info, warn};

use crate::builder::{DagBuilder, create_builder};
use crate::config::combo::{Combination, ComboGenerator};
use crate::config::model::ConfigFile;
use crate::dag::TaskDag;
use crate::errors::Result;
use crate::property::PropertyPipeline;
use crate::sampling::{GenRng, seeded_rng, stream_rng};
use crate::types::SeedScope;

/// Receives finished DAGs.
pub trait DagSink {
    /// Called once per feasible combination, before its DAGs.
    fn begin_combination(&mut self, combination: &Combination, seed: u64) -> Result<()>;

    fn write_dag(&mut self, combination: &Combination, index: usize, dag: &TaskDag) -> Result<()>;
}

/// Outcome of one combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationReport {
    pub dir_name: String,
    pub generated: usize,
    pub failed: usize,
    /// Why the whole combination was skipped, if it was.
    pub skipped: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub combinations: Vec<CombinationReport>,
}

impl RunSummary {
    pub fn generated(&self) -> usize {
        self.combinations.iter().map(|c| c.generated).sum()
    }

    pub fn failed(&self) -> usize {
        self.combinations.iter().map(|c| c.failed).sum()
    }

    pub fn skipped(&self) -> usize {
        self.combinations.iter().filter(|c| c.skipped.is_some()).count()
    }
}

pub struct Generator<'a> {
    cfg: &'a ConfigFile,
    combos: ComboGenerator<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(cfg: &'a ConfigFile) -> Result<Self> {
        Ok(Self {
            cfg,
            combos: ComboGenerator::new(cfg)?,
        })
    }

    pub fn combinations(&self) -> &ComboGenerator<'a> {
        &self.combos
    }

    pub fn run(&self, sink: &mut dyn DagSink) -> Result<RunSummary> {
        let seed = self.cfg.seed();
        let scope = self.cfg.seed_scope();
        info!(
            seed,
            ?scope,
            combinations = self.combos.len(),
            "starting generation"
        );

        let mut run_rng = seeded_rng(seed);
        let mut summary = RunSummary::default();

        for combination in self.combos.iter() {
            let combination = combination?;
            let report = match scope {
                SeedScope::Run => self.run_combination(&combination, sink, |_| None, &mut run_rng)?,
                SeedScope::Combination => {
                    let mut rng = seeded_rng(seed);
                    self.run_combination(&combination, sink, |_| None, &mut rng)?
                }
                SeedScope::Dag => {
                    let combo_index = combination.index as u64;
                    self.run_combination(
                        &combination,
                        sink,
                        |dag_index| Some(stream_rng(seed, (combo_index << 32) | dag_index as u64)),
                        &mut run_rng,
                    )?
                }
            };
            summary.combinations.push(report);
        }

        info!(
            generated = summary.generated(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            "generation finished"
        );
        Ok(summary)
    }

    /// `dag_rng` overrides `rng` for a single DAG when it returns `Some`.
    fn run_combination(
        &self,
        combination: &Combination,
        sink: &mut dyn DagSink,
        dag_rng: impl Fn(usize) -> Option<GenRng>,
        rng: &mut dyn RngCore,
    ) -> Result<CombinationReport> {
        let mut report = CombinationReport {
            dir_name: combination.dir_name.clone(),
            generated: 0,
            failed: 0,
            skipped: None,
        };

        let prepared = create_builder(&combination.config).and_then(|builder| {
            PropertyPipeline::from_config(&combination.config.properties).map(|p| (builder, p))
        });
        let (builder, pipeline) = match prepared {
            Ok(v) => v,
            Err(e) => {
                warn!(combination = %combination.dir_name, error = %e, "skipping combination");
                report.skipped = Some(e.to_string());
                return Ok(report);
            }
        };

        sink.begin_combination(combination, self.cfg.seed())?;

        for index in 0..builder.number_of_dags() {
            let mut own_rng = dag_rng(index);
            let rng: &mut dyn RngCore = match own_rng.as_mut() {
                Some(r) => r,
                None => &mut *rng,
            };

            match build_annotated(builder.as_ref(), &pipeline, rng) {
                Ok(dag) => {
                    sink.write_dag(combination, index, &dag)?;
                    report.generated += 1;
                }
                Err(e) => {
                    warn!(combination = %combination.dir_name, dag = index, error = %e, "skipping DAG");
                    report.failed += 1;
                }
            }
        }

        info!(
            combination = %combination.dir_name,
            generated = report.generated,
            failed = report.failed,
            "combination done"
        );
        Ok(report)
    }
}

/// Build one DAG and run the property pipeline on it.
pub fn build_annotated(
    builder: &dyn DagBuilder,
    pipeline: &PropertyPipeline,
    rng: &mut dyn RngCore,
) -> Result<TaskDag> {
    let mut dag = builder.build_one(rng)?;
    pipeline.apply(&mut dag, rng)?;
    Ok(dag)
}

/// Collects DAGs in memory, grouped by combination directory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub combinations: Vec<(String, Vec<TaskDag>)>,
}

impl DagSink for MemorySink {
    fn begin_combination(&mut self, combination: &Combination, _seed: u64) -> Result<()> {
        self.combinations.push((combination.dir_name.clone(), Vec::new()));
        Ok(())
    }

    fn write_dag(&mut self, _combination: &Combination, _index: usize, dag: &TaskDag) -> Result<()> {
        if let Some((_, dags)) = self.combinations.last_mut() {
            dags.push(dag.clone());
        }
        Ok(())
    }
}

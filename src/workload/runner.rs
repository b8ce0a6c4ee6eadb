use crate::{
    common::{config::IndexConfig, record::Key},
    db_info, db_phase, db_scope,
    debugger::{Component, DebugLevel, begin_phase, end_phase, phase_millis},
    storage::{btree::BPlusTree, hash::ExtendibleHash, index::Index, stats::StatsMap},
    workload::{
        errors::WorkloadError,
        generator::{self, DEFAULT_SEED, GeneratorParams},
        op::Operation,
    },
};

#[derive(Debug, Clone, Default)]
pub struct PhaseResult {
    pub ops: usize,
    /// Operations that took effect: inserted, found or removed.
    pub hits: usize,
    pub millis: f64,
    pub stats: StatsMap,
}

/// Column names of one report row, shared by the console table and the
/// CSV export.
pub const REPORT_COLUMNS: [&str; 15] = [
    "experiment",
    "index",
    "num_fields",
    "page_size",
    "inserts",
    "searches",
    "deletes",
    "insert_ms",
    "search_ms",
    "delete_ms",
    "insert_writes",
    "insert_splits",
    "search_reads",
    "found",
    "removed",
];

#[derive(Debug, Clone)]
pub struct ExperimentResult {
    pub name: String,
    pub index: &'static str,
    /// Page geometry the engine was built from.
    pub config: IndexConfig,
    pub insert: PhaseResult,
    pub search: PhaseResult,
    pub delete: PhaseResult,
    /// Counters after the last phase, including structural gauges.
    pub final_stats: StatsMap,
}

impl ExperimentResult {
    pub fn report_header() -> String {
        REPORT_COLUMNS.join("\t")
    }

    pub fn table_row(&self) -> String {
        self.columns().join("\t")
    }

    /// Values in `REPORT_COLUMNS` order.
    pub fn columns(&self) -> Vec<String> {
        let stat = |phase: &PhaseResult, names: &[&str]| -> u64 {
            names.iter().filter_map(|n| phase.stats.get(*n)).sum()
        };

        vec![
            self.name.clone(),
            self.index.to_string(),
            self.config.num_fields().to_string(),
            self.config.page_size().to_string(),
            self.insert.ops.to_string(),
            self.search.ops.to_string(),
            self.delete.ops.to_string(),
            format!("{:.3}", self.insert.millis),
            format!("{:.3}", self.search.millis),
            format!("{:.3}", self.delete.millis),
            stat(&self.insert, &["page_writes", "bucket_writes"]).to_string(),
            stat(&self.insert, &["splits"]).to_string(),
            stat(&self.search, &["page_reads", "bucket_reads"]).to_string(),
            self.search.hits.to_string(),
            self.delete.hits.to_string(),
        ]
    }
}

/// Runs all insertions, then all searches, then all deletions against
/// `index`. Counters are reset before each phase and each phase is timed on
/// the phase timeline.
pub fn run_experiment(
    name: &str,
    config: IndexConfig,
    index: &mut dyn Index,
    ops: &[Operation],
) -> ExperimentResult {
    let inserts: Vec<Operation> = ops
        .iter()
        .filter(|o| matches!(o, Operation::Insert(_)))
        .cloned()
        .collect();
    let searches: Vec<Key> = ops
        .iter()
        .filter_map(|o| match o {
            Operation::Search(k) => Some(*k),
            _ => None,
        })
        .collect();
    let deletes: Vec<Key> = ops
        .iter()
        .filter_map(|o| match o {
            Operation::Delete(k) => Some(*k),
            _ => None,
        })
        .collect();

    let label = format!("{}/{}", name, index.name());
    begin_phase(label.clone());

    let insert = run_phase(&label, "insert", index, inserts.len(), |idx| {
        inserts
            .into_iter()
            .map(|op| op.apply(idx))
            .filter(|inserted| *inserted)
            .count()
    });
    let search = run_phase(&label, "search", index, searches.len(), |idx| {
        searches.iter().filter(|k| idx.search(**k).is_some()).count()
    });
    let delete = run_phase(&label, "delete", index, deletes.len(), |idx| {
        deletes.iter().filter(|k| idx.delete(**k).is_some()).count()
    });

    end_phase();

    db_info!(
        Component::WORKLOAD,
        "{}: {} inserted, {} found, {} removed",
        label,
        insert.hits,
        search.hits,
        delete.hits
    );

    ExperimentResult {
        name: name.to_string(),
        index: index.name(),
        config,
        insert,
        search,
        delete,
        final_stats: index.stats(),
    }
}

fn run_phase<F>(label: &str, phase: &str, index: &mut dyn Index, ops: usize, body: F) -> PhaseResult
where
    F: FnOnce(&mut dyn Index) -> usize,
{
    let phase_name = format!("{}/{}", label, phase);
    index.reset_stats();

    begin_phase(phase_name.clone());
    let hits = body(index);
    end_phase();

    PhaseResult {
        ops,
        hits,
        millis: phase_millis(&phase_name),
        stats: index.stats(),
    }
}

/// A named workload shape run against both engines.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub name: String,
    pub config: IndexConfig,
    pub insertions: usize,
    pub searches: usize,
    pub deletions: usize,
    pub seed: u64,
}

impl Experiment {
    pub fn new(
        name: impl Into<String>,
        page_size: usize,
        num_fields: usize,
        insertions: usize,
        searches: usize,
        deletions: usize,
    ) -> Result<Self, WorkloadError> {
        Ok(Self {
            name: name.into(),
            config: IndexConfig::new(page_size, num_fields)?,
            insertions,
            searches,
            deletions,
            seed: DEFAULT_SEED,
        })
    }

    /// Field-count, page-size and volume sweeps.
    pub fn suite() -> Result<Vec<Experiment>, WorkloadError> {
        Ok(vec![
            Experiment::new("fields_5", 512, 5, 1000, 500, 100)?,
            Experiment::new("fields_10", 512, 10, 1000, 500, 100)?,
            Experiment::new("fields_20", 512, 20, 1000, 500, 100)?,
            Experiment::new("page_256", 256, 10, 1000, 500, 100)?,
            Experiment::new("page_1024", 1024, 10, 1000, 500, 100)?,
            Experiment::new("page_2048", 2048, 10, 1000, 500, 100)?,
            Experiment::new("vol_small", 512, 10, 500, 200, 50)?,
            Experiment::new("vol_medium", 512, 10, 2000, 1000, 200)?,
            Experiment::new("vol_large", 512, 10, 5000, 2000, 500)?,
        ])
    }

    pub fn params(&self) -> GeneratorParams {
        GeneratorParams {
            attributes: self.config.num_fields(),
            insertions: self.insertions,
            deletions: self.deletions,
            searches: self.searches,
            seed: self.seed,
        }
    }

    /// Generates the workload once and replays it on a fresh tree and a fresh
    /// hash table built from the same page geometry.
    pub fn run(&self) -> Result<Vec<ExperimentResult>, WorkloadError> {
        let ops = db_phase!(format!("{}/generate", self.name), {
            generator::generate(self.params())
        })?;
        Ok(self.replay(&ops))
    }

    pub fn replay(&self, ops: &[Operation]) -> Vec<ExperimentResult> {
        let mut tree = BPlusTree::new(self.config);
        let mut hash = ExtendibleHash::new(self.config);

        db_scope!(DebugLevel::Info, Component::WORKLOAD, &self.name, {
            vec![
                run_experiment(&self.name, self.config, &mut tree, ops),
                run_experiment(&self.name, self.config, &mut hash, ops),
            ]
        })
    }
}

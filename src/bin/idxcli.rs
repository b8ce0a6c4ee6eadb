use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use anyhow::{Context, Result, anyhow, bail};
use rustyline::{DefaultEditor, error::ReadlineError};

use pagedex::{
    common::{IndexConfig, Key},
    db_error, db_info, db_warn,
    debugger::{self, Component, DebugLevel, set_debug_level},
    storage::{BPlusTree, ExtendibleHash, Index},
    workload::{
        Experiment, ExperimentResult, Operation,
        csv::{read_operations, write_results},
    },
};

const HELP: &str = "\
commands:
  insert <key> [fields...]        insert a record (key is the first field)
  search <key>                    equality lookup
  range <start> <end>             inclusive range scan (btree only)
  delete <key>                    remove a record
  stats | reset | info | validate
  load <file.csv>                 apply a generator CSV to the open index
  gen <ins> <srch> <del> [seed] [--out=file.csv]
                                  generate a workload and compare both engines
  suite [file.csv]                run the standard experiment suite
  help | quit";

enum Engine {
    Tree(BPlusTree),
    Hash(ExtendibleHash),
}

impl Engine {
    fn open(kind: &str, config: IndexConfig) -> Result<Self> {
        match kind {
            "btree" | "tree" => Ok(Engine::Tree(BPlusTree::new(config))),
            "hash" => Ok(Engine::Hash(ExtendibleHash::new(config))),
            other => bail!("unknown engine '{}', expected btree or hash", other),
        }
    }

    fn index(&mut self) -> &mut dyn Index {
        match self {
            Engine::Tree(t) => t,
            Engine::Hash(h) => h,
        }
    }

    fn describe(&self) -> String {
        match self {
            Engine::Tree(t) => t.to_string(),
            Engine::Hash(h) => h.to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Engine::Tree(t) => t.validate()?,
            Engine::Hash(h) => h.validate()?,
        }
        Ok(())
    }
}

struct Options {
    engine: String,
    config: IndexConfig,
}

fn parse_args() -> Result<Options> {
    let mut engine = "btree".to_string();
    let mut page_size = IndexConfig::default().page_size();
    let mut num_fields = IndexConfig::default().num_fields();

    for arg in std::env::args().skip(1) {
        let (flag, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("expected --flag=value, got '{}'", arg))?;

        match flag {
            "--engine" => engine = value.to_string(),
            "--page-size" => page_size = value.parse().context("--page-size")?,
            "--fields" => num_fields = value.parse().context("--fields")?,
            "--preset" => {
                let preset = IndexConfig::preset(value)
                    .ok_or_else(|| anyhow!("unknown preset '{}'", value))?;
                page_size = preset.page_size();
                num_fields = preset.num_fields();
            }
            "--debug" => set_debug_level(value.parse::<DebugLevel>().map_err(|e| anyhow!(e))?),
            other => bail!("unknown flag '{}'", other),
        }
    }

    Ok(Options {
        engine,
        config: IndexConfig::new(page_size, num_fields)?,
    })
}

fn parse_key(arg: Option<&str>) -> Result<Key> {
    let arg = arg.ok_or_else(|| anyhow!("missing key"))?;
    arg.parse().with_context(|| format!("invalid key '{}'", arg))
}

fn print_results(results: &[ExperimentResult]) {
    println!("{}", ExperimentResult::report_header());
    for r in results {
        println!("{}", r.table_row());
    }
}

fn save_results(path: Option<&str>, results: &[ExperimentResult]) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path).with_context(|| format!("creating {}", path))?;
    let mut w = BufWriter::new(file);
    write_results(&mut w, results)?;
    w.flush()?;

    println!("{} results written to {}", results.len(), path);
    Ok(())
}

fn run_command(line: &str, engine: &mut Engine, config: IndexConfig) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(true);
    };

    match cmd {
        "insert" => {
            let fields = parts
                .map(|p| p.parse::<i32>().with_context(|| format!("invalid field '{}'", p)))
                .collect::<Result<Vec<_>>>()?;
            let record = config.record(fields)?;
            if engine.index().insert(record.key(), record) {
                println!("inserted");
            } else {
                println!("duplicate key");
            }
        }

        "search" => {
            let key = parse_key(parts.next())?;
            match engine.index().search(key) {
                Some(r) => println!("{}", r),
                None => println!("not found"),
            }
        }

        "range" => {
            let start = parse_key(parts.next())?;
            let end = parse_key(parts.next())?;
            match engine {
                Engine::Tree(t) => {
                    let mut n = 0;
                    for r in t.range_search(start, end) {
                        println!("{}", r);
                        n += 1;
                    }
                    println!("({} records)", n);
                }
                Engine::Hash(_) => println!("range search is not supported by the hash index"),
            }
        }

        "delete" => {
            let key = parse_key(parts.next())?;
            match engine.index().delete(key) {
                Some(r) => println!("removed {}", r),
                None => println!("not found"),
            }
        }

        "stats" => {
            for (name, value) in engine.index().stats() {
                println!("{:>20}: {}", name, value);
            }
        }

        "reset" => engine.index().reset_stats(),

        "info" => println!("{}", engine.describe()),

        "validate" => {
            if let Err(e) = engine.validate() {
                db_error!(Component::CLI, "{}", e);
                return Err(e);
            }
            println!("ok");
        }

        "load" => {
            let path = parts.next().ok_or_else(|| anyhow!("missing file"))?;
            let file = File::open(path).with_context(|| format!("opening {}", path))?;
            let ops = read_operations(BufReader::new(file))?;

            let total = ops.len();
            let mut applied = 0;
            for op in ops {
                if let Operation::Insert(r) = &op {
                    config.record(r.fields().to_vec())?;
                }
                if op.apply(engine.index()) {
                    applied += 1;
                }
            }
            println!("{} operations, {} took effect", total, applied);
        }

        "gen" => {
            let mut out = None;
            let mut nums = Vec::new();
            for p in parts {
                match p.strip_prefix("--out=") {
                    Some(path) => out = Some(path),
                    None => nums.push(
                        p.parse::<u64>()
                            .with_context(|| format!("invalid count '{}'", p))?,
                    ),
                }
            }
            let [ins, srch, del, rest @ ..] = nums.as_slice() else {
                bail!("usage: gen <ins> <srch> <del> [seed] [--out=file.csv]");
            };

            let mut exp = Experiment::new(
                "cli",
                config.page_size(),
                config.num_fields(),
                *ins as usize,
                *srch as usize,
                *del as usize,
            )?;
            if let Some(seed) = rest.first() {
                exp.seed = *seed;
            }

            debugger::reset();
            let results = exp.run()?;
            print_results(&results);
            println!("{}", debugger::get_report());
            save_results(out, &results)?;
        }

        "suite" => {
            debugger::reset();
            let mut results = Vec::new();
            for exp in Experiment::suite()? {
                results.extend(exp.run()?);
            }
            print_results(&results);
            save_results(parts.next(), &results)?;
        }

        "help" => println!("{}", HELP),

        "quit" | "exit" => return Ok(false),

        other => bail!("unknown command '{}', try 'help'", other),
    }

    Ok(true)
}

fn main() -> Result<()> {
    let opts = parse_args()?;
    let mut engine = Engine::open(&opts.engine, opts.config)?;

    if opts.config.clamped() {
        db_warn!(
            Component::CLI,
            "order {} / bucket capacity {} are clamped minimums",
            opts.config.bplus_order(),
            opts.config.bucket_capacity()
        );
        println!(
            "note: {} byte pages hold fewer than 3 entries of {} fields, capacity raised to the minimum",
            opts.config.page_size(),
            opts.config.num_fields()
        );
    }

    db_info!(Component::CLI, "opened {}", engine.describe());

    println!("pagedex shell ({})", engine.describe());
    println!("Type 'help' for commands. Ctrl+D to exit");

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("pagedex> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match run_command(line, &mut engine, opts.config) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => println!("error: {:#}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

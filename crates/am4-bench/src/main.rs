use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{ArgAction, Parser};
use serde::Serialize;

use am4_encoder::Encoder;
use am4_lexer::Lexer;
use am4_parser::Parser as Am4Parser;
use am4_syntax::error::Result;
use am4_vm::{Vm, VmConfig, DEFAULT_STACK_CAPACITY};

#[derive(Parser, Debug)]
#[command(name = "am4-bench", about = "Run am4 benchmarks")]
struct Cli {
    /// Specific test(s) to run (by name, e.g. fibonacci). If omitted, runs all discovered scripts.
    #[arg(short = 't', long = "test", action = ArgAction::Append)]
    tests: Vec<String>,

    /// Iterations per test (measured)
    #[arg(short = 'n', long = "iterations", default_value_t = 10)]
    iterations: u32,

    /// Warmup iterations (not measured)
    #[arg(short = 'w', long = "warmup", default_value_t = 2)]
    warmup: u32,

    /// Output JSON file path; default: benchmark/results/<timestamp>.json
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Include demos/ directory in discovery
    #[arg(long = "include-demos", default_value_t = false)]
    include_demos: bool,

    /// Operand stack capacity for every run
    #[arg(long = "stack-size", default_value_t = DEFAULT_STACK_CAPACITY)]
    stack_size: usize,

    /// List discovered tests and exit
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

#[derive(Debug, Serialize)]
struct BenchResult {
    name: String,
    iterations: u32,
    result: i32,
    words: u32,
    avg_total_ms: f64,
    min_total_ms: f64,
    max_total_ms: f64,
    avg_lex_ms: f64,
    avg_parse_ms: f64,
    avg_encode_ms: f64,
    avg_exec_ms: f64,
}

#[derive(Debug, Serialize)]
struct OutputDoc {
    timestamp: String,
    am4_version: String,
    benchmarks: Vec<BenchResult>,
}

#[derive(Debug, Clone)]
struct ScriptCase {
    name: String,
    path: PathBuf,
}

#[derive(Debug, Default)]
struct Timings {
    totals: Vec<f64>,
    lexes: Vec<f64>,
    parses: Vec<f64>,
    encodes: Vec<f64>,
    execs: Vec<f64>,
    result: i32,
    words: u32,
}

fn workspace_root() -> PathBuf {
    // crates/am4-bench -> crates -> root
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or(manifest)
}

fn discover_scripts(include_demos: bool) -> Vec<ScriptCase> {
    let root = workspace_root();
    let mut out = Vec::new();

    let mut candidates = vec![root.join("benchmark/scripts")];
    if include_demos {
        candidates.push(root.join("demos"));
    }

    for dir in candidates {
        if !dir.exists() {
            continue;
        }
        if let Ok(entries) = fs::read_dir(&dir) {
            for e in entries.flatten() {
                let p = e.path();
                if p.extension().and_then(|s| s.to_str()) == Some("am4") {
                    let name = p.file_stem().and_then(|s| s.to_str()).unwrap_or("").to_string();
                    out.push(ScriptCase { name, path: p });
                }
            }
        }
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn measure_script(src: &str, iterations: u32, warmup: u32, config: VmConfig) -> Result<Timings> {
    for _ in 0..warmup {
        let tokens = Lexer::new(src).tokenize()?;
        let program = Am4Parser::new(tokens).parse_program()?;
        let binary = Encoder::new().encode(&program)?;
        Vm::with_output(config, io::sink()).run(&binary)?;
    }

    let mut timings = Timings::default();

    for _ in 0..iterations {
        let t0 = Instant::now();
        let mut t = Instant::now();

        let tokens = Lexer::new(src).tokenize()?;
        let t_lex = t.elapsed();

        t = Instant::now();
        let program = Am4Parser::new(tokens).parse_program()?;
        let t_parse = t.elapsed();

        t = Instant::now();
        let binary = Encoder::new().encode(&program)?;
        let t_encode = t.elapsed();

        t = Instant::now();
        // program output is discarded so printing does not skew exec time
        timings.result = Vm::with_output(config, io::sink()).run(&binary)?;
        let t_exec = t.elapsed();

        let total = t0.elapsed();
        timings.words = binary.total_size();

        timings.lexes.push(dur_ms(t_lex));
        timings.parses.push(dur_ms(t_parse));
        timings.encodes.push(dur_ms(t_encode));
        timings.execs.push(dur_ms(t_exec));
        timings.totals.push(dur_ms(total));
    }

    Ok(timings)
}

fn dur_ms(d: std::time::Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn stats(vals: &[f64]) -> (f64, f64, f64) {
    if vals.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = vals.iter().sum::<f64>() / (vals.len() as f64);
    (avg, min, max)
}

fn main() {
    let cli = Cli::parse();
    let config = VmConfig {
        stack_capacity: cli.stack_size,
        trace: false,
    };

    let mut scripts = discover_scripts(cli.include_demos);

    if cli.list {
        println!("Discovered tests:");
        for s in &scripts {
            println!("- {} ({})", s.name, s.path.display());
        }
        return;
    }

    if !cli.tests.is_empty() {
        let wanted: std::collections::HashSet<_> = cli.tests.iter().map(|s| s.to_lowercase()).collect();
        scripts.retain(|s| wanted.contains(&s.name.to_lowercase()));
        if scripts.is_empty() {
            eprintln!("No matching tests. Use --list to see available.");
            std::process::exit(2);
        }
    }

    if scripts.is_empty() {
        eprintln!("No .am4 scripts found in benchmark/scripts or demos.");
        std::process::exit(2);
    }

    let mut results = Vec::new();
    let mut failed = false;

    for case in &scripts {
        let src = match fs::read_to_string(&case.path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{:>12}: failed to read {}: {}", case.name, case.path.display(), e);
                failed = true;
                continue;
            }
        };
        let timings = match measure_script(&src, cli.iterations, cli.warmup, config) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("{:>12}: {}: {}", case.name, e.kind, e);
                failed = true;
                continue;
            }
        };
        let (avg_t, min_t, max_t) = stats(&timings.totals);
        let (avg_l, _, _) = stats(&timings.lexes);
        let (avg_p, _, _) = stats(&timings.parses);
        let (avg_c, _, _) = stats(&timings.encodes);
        let (avg_e, _, _) = stats(&timings.execs);

        println!(
            "{:>12}: total avg={:.3}ms min={:.3}ms max={:.3}ms | lex={:.3}ms parse={:.3}ms encode={:.3}ms exec={:.3}ms | result={}",
            case.name, avg_t, min_t, max_t, avg_l, avg_p, avg_c, avg_e, timings.result
        );

        results.push(BenchResult {
            name: case.name.clone(),
            iterations: cli.iterations,
            result: timings.result,
            words: timings.words,
            avg_total_ms: avg_t,
            min_total_ms: min_t,
            max_total_ms: max_t,
            avg_lex_ms: avg_l,
            avg_parse_ms: avg_p,
            avg_encode_ms: avg_c,
            avg_exec_ms: avg_e,
        });
    }

    let out_path = match cli.output.clone() {
        Some(p) => p,
        None => {
            let ts_file = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%SZ").to_string();
            workspace_root()
                .join("benchmark/results")
                .join(format!("{}.json", ts_file))
        }
    };

    let doc = OutputDoc {
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        am4_version: env!("CARGO_PKG_VERSION").to_string(),
        benchmarks: results,
    };

    if let Err(e) = write_report(&out_path, &doc) {
        eprintln!("Failed to write {}: {}", out_path.display(), e);
        std::process::exit(1);
    }
    println!("\nSaved results to {}", out_path.display());

    if failed {
        std::process::exit(1);
    }
}

fn write_report(path: &Path, doc: &OutputDoc) -> io::Result<()> {
    let json = serde_json::to_string_pretty(doc).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_samples() {
        assert_eq!(stats(&[]), (0.0, 0.0, 0.0));
        assert_eq!(stats(&[1.0, 3.0, 2.0]), (2.0, 1.0, 3.0));
    }

    #[test]
    fn measures_every_stage() {
        let t = measure_script("push 2\npush 3\nadd\n", 3, 1, VmConfig::default()).unwrap();
        assert_eq!(t.result, 5);
        assert_eq!(t.words, 3);
        assert_eq!(t.totals.len(), 3);
        assert_eq!(t.execs.len(), 3);
    }

    #[test]
    fn discovers_benchmark_scripts() {
        let scripts = discover_scripts(false);
        assert!(scripts.iter().any(|s| s.name == "fibonacci"));
        let with_demos = discover_scripts(true);
        assert!(with_demos.iter().any(|s| s.name == "factorial"));
    }
}

// solace-eval: run labeled crisis/benign texts through the crisis pipeline,
// report precision/recall/F1 on the intervention flag and level agreement.
//
// Usage:
//   cargo run --bin solace-eval -- --dataset schema/eval/
//   cargo run --bin solace-eval -- --config schema/solace.yaml --dataset schema/eval/ --json
//   cargo run --bin solace-eval -- --dataset schema/eval/crisis_cases.yaml --label crisis

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use solace::config::{self, ConfigSource, FileSource, StringSource};
use solace::engine;
use solace::eval;

#[derive(Parser)]
#[command(name = "solace-eval", about = "Solace crisis eval harness")]
struct Cli {
    /// Path to the solace config YAML (built-in defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Eval dataset: a YAML file or a directory of them
    #[arg(long)]
    dataset: PathBuf,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Filter to one label (crisis, benign)
    #[arg(long)]
    label: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load config
    let source: Box<dyn ConfigSource> = match &cli.config {
        Some(path) => Box::new(FileSource { path: path.clone() }),
        None => Box::new(StringSource::new("solace: v1\nenvironment: eval\n")),
    };
    let config = match config::load_config(source.as_ref()) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("failed to load config {}: {e}", source.describe());
            std::process::exit(1);
        }
    };

    // Load dataset
    let mut cases = match eval::load_dataset(&cli.dataset) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load dataset: {e}");
            std::process::exit(1);
        }
    };

    if let Some(ref label) = cli.label {
        cases.retain(|c| c.label == *label);
    }

    if cases.is_empty() {
        eprintln!("no eval cases found");
        std::process::exit(1);
    }

    eprintln!("running {} eval cases...", cases.len());

    let engine = engine::build_engine(config, None);
    let results = eval::run_eval(&cases, &engine).await;
    let mut report = eval::compute_metrics(&results);

    if cli.json {
        report.results = results;
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let m = &report.metrics;
        println!();
        println!("Solace Eval Report");
        println!("==================");
        println!();
        println!(
            "  TP={} FP={} FN={} TN={} (total={})",
            m.tp, m.fp, m.fn_count, m.tn, m.total
        );
        println!(
            "  Precision={:.1}%  Recall={:.1}%  F1={:.1}%",
            m.precision * 100.0,
            m.recall * 100.0,
            m.f1 * 100.0
        );
        println!(
            "  Level agreement={:.1}% ({}/{})  Failed analyses={}",
            report.level_agreement * 100.0,
            report.levels_agreed,
            report.levels_checked,
            report.failures
        );
        println!();

        let failures: Vec<&eval::EvalResult> = results.iter().filter(|r| !r.correct).collect();
        if failures.is_empty() {
            println!("All {} cases passed.", report.total_cases);
        } else {
            println!(
                "{}/{} cases passed, {} failures:",
                report.total_correct,
                report.total_cases,
                failures.len()
            );
            println!();
            for f in &failures {
                let expected = f
                    .expected_level
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  FAIL {}: [{}] expected_level={} actual={} flagged={} ({})",
                    f.case_id, f.label, expected, f.risk_level, f.flagged, f.detail
                );
            }
        }
        println!();
        println!(
            "Accuracy: {:.1}% ({}/{})",
            report.accuracy * 100.0,
            report.total_correct,
            report.total_cases
        );
    }

    if report.total_correct < report.total_cases {
        std::process::exit(1);
    }
}

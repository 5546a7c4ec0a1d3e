use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

use bankreview_preprocessing::{load_records, ReviewIngestor};
use orchestrator::{keyword_rows, output_rows, write_json, PipelineConfig, PipelineOrchestrator, ResultFormatter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON array of {review, rating, date, bank, source} records
    #[arg(long)]
    input: PathBuf,

    #[arg(long, default_value = "data/processed/sentiment_themes_analysis.json")]
    annotated_out: PathBuf,

    /// Insights report path; printed to stdout when omitted
    #[arg(long)]
    report_out: Option<PathBuf>,

    #[arg(long)]
    keywords_out: Option<PathBuf>,

    #[arg(long)]
    clusters_out: Option<PathBuf>,

    /// Transformer model config json
    #[arg(long, env = "BANKREVIEW_MODEL_CONFIG")]
    model_config: Option<PathBuf>,

    /// Theme taxonomy json replacing the built-in one
    #[arg(long, env = "BANKREVIEW_TAXONOMY")]
    taxonomy: Option<PathBuf>,

    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting bank review analytics pipeline");
    info!("Input: {:?}", args.input);

    let mut config = PipelineConfig::from_env_or_default()?;
    if args.model_config.is_some() {
        config.sentiment.model_config = args.model_config.clone();
    }
    if args.taxonomy.is_some() {
        config.themes.taxonomy_path = args.taxonomy.clone();
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }

    let file = File::open(&args.input).with_context(|| format!("Failed to open input {:?}", args.input))?;
    let records = load_records(BufReader::new(file))?;
    let (reviews, stats) = ReviewIngestor::new().prepare(records);

    let orchestrator = PipelineOrchestrator::new(&config)?;
    let formatter = ResultFormatter::new();
    formatter.display_pipeline_start(orchestrator.sentiment_strategy().as_str());
    formatter.display_ingest_stats(&stats);

    let output = orchestrator.run(reviews).await;
    let report = orchestrator.report(&output);

    write_json(Some(&args.annotated_out), &output_rows(&output.annotated))?;
    if let Some(path) = &args.keywords_out {
        write_json(Some(path), &keyword_rows(&output))?;
    }
    if let Some(path) = &args.clusters_out {
        write_json(Some(path), &orchestrator.aggregator().theme_clusters(&output.annotated))?;
    }
    write_json(args.report_out.as_deref(), &report)?;

    formatter.display_report(&report);
    formatter.display_pipeline_complete(output.annotated.len());

    info!("Pipeline completed successfully");
    Ok(())
}

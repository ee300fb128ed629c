use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use resume_matcher::{
    load_jobs, load_resumes, sample_dataset, Artifact, ArtifactBuilder, ArtifactStore, BuildConfig,
    FileArtifactStore, JobRecord, JobRef, RankingService, ResumeRecord,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Rank resumes against jobs (and back) by TF-IDF cosine similarity
#[derive(Parser, Debug)]
#[command(name = "resume-matcher", version, about)]
struct Cli {
    /// Persisted artifact file
    #[arg(long, global = true, env = "MATCHER_ARTIFACT", default_value = "matcher.cbor", value_name = "PATH")]
    artifact: PathBuf,

    #[command(flatten)]
    dataset: DatasetArgs,

    #[command(subcommand)]
    command: Command,
}

/// Where to build from when no artifact is available
#[derive(Args, Debug)]
struct DatasetArgs {
    /// JSON array of resume records
    #[arg(long, global = true, value_name = "PATH")]
    resumes: Option<PathBuf>,

    /// JSON array of job records
    #[arg(long, global = true, value_name = "PATH")]
    jobs: Option<PathBuf>,

    /// JSON build config
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the vocabulary bound
    #[arg(long, global = true, value_name = "N")]
    max_features: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an artifact from the datasets and persist it
    Build,
    /// Rank resumes for one job
    RankCandidates {
        #[arg(long, conflicts_with = "job_title", required_unless_present = "job_title")]
        job_id: Option<u64>,
        /// case-insensitive job title
        #[arg(long)]
        job_title: Option<String>,
        /// `0` or negative means no limit
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<i64>,
    },
    /// Rank jobs for one resume
    RankJobs {
        #[arg(long)]
        resume_id: u64,
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<i64>,
    },
    /// Corpus size, vocabulary size and average best score
    Analytics,
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let builder = ArtifactBuilder::new(build_config(&cli.dataset)?);
    let store = FileArtifactStore::new(&cli.artifact);

    match cli.command {
        Command::Build => {
            let (resumes, jobs) = read_datasets(&cli.dataset)?;
            let artifact = builder.build(&resumes, &jobs).context("failed to build artifact")?;
            store
                .save(&artifact)
                .with_context(|| format!("failed to write artifact to {}", cli.artifact.display()))?;
            println!(
                "built {} resumes x {} jobs, {} features -> {}",
                artifact.resume_count(),
                artifact.job_count(),
                artifact.vocabulary().dim(),
                cli.artifact.display()
            );
        }
        Command::RankCandidates { job_id, job_title, limit } => {
            let service = open_service(&builder, &store, &cli.dataset)?;
            let job = match (job_id, job_title) {
                (Some(id), _) => JobRef::Id(id),
                (None, Some(title)) => JobRef::Title(title),
                (None, None) => anyhow::bail!("either --job-id or --job-title is required"),
            };
            print!("{}", service.rank_candidates_for_job(&job, limit)?);
        }
        Command::RankJobs { resume_id, limit } => {
            let service = open_service(&builder, &store, &cli.dataset)?;
            print!("{}", service.rank_jobs_for_resume(resume_id, limit)?);
        }
        Command::Analytics => {
            let service = open_service(&builder, &store, &cli.dataset)?;
            let artifact = service.snapshot();
            println!("resumes\t{}", artifact.resume_count());
            println!("jobs\t{}", artifact.job_count());
            println!("features\t{}", artifact.vocabulary().dim());
            println!("average_match_score\t{:.6}", service.average_match_score()?);
        }
    }
    Ok(())
}

fn build_config(args: &DatasetArgs) -> Result<BuildConfig> {
    let config = match &args.config {
        Some(path) => BuildConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => BuildConfig::default(),
    };
    let mut config = config.with_env_overrides();
    if let Some(n) = args.max_features {
        config.max_features = n;
    }
    Ok(config)
}

fn open_service(builder: &ArtifactBuilder, store: &FileArtifactStore, args: &DatasetArgs) -> Result<RankingService> {
    let artifact: Artifact = builder
        .load_or_build(store, &store.path().to_path_buf(), || read_datasets(args))
        .with_context(|| format!("failed to open artifact {}", store.path().display()))?;
    Ok(RankingService::from_artifact(artifact))
}

/// Dataset files when both exist, otherwise the built-in sample data
fn read_datasets(args: &DatasetArgs) -> resume_matcher::Result<(Vec<ResumeRecord>, Vec<JobRecord>)> {
    match (existing(&args.resumes), existing(&args.jobs)) {
        (Some(resumes), Some(jobs)) => Ok((load_resumes(resumes)?, load_jobs(jobs)?)),
        _ => {
            warn!("dataset files not found; using the built-in sample dataset");
            let (resumes, jobs) = sample_dataset();
            info!(resumes = resumes.len(), jobs = jobs.len(), "sample dataset loaded");
            Ok((resumes, jobs))
        }
    }
}

fn existing(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| p.is_file())
}

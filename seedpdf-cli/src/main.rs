use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seedpdf::{
    generate_seeds, Corpus, DocumentGenerator, GeneratorConfig, HarvestOptions, HarvestPool,
    LopdfBackend, Manifest, TemplatePool,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "seedpdf",
    about = "Annotation-focused PDF seed corpus generator",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate varied multi-page documents
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "pdf_outputs_1")]
        output: PathBuf,

        /// Number of documents
        #[arg(short = 'n', long, default_value_t = 50)]
        count: usize,

        /// RNG seed (drawn from entropy when absent)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON generator configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// File name prefix
        #[arg(long, default_value = "generated_1")]
        prefix: String,
    },

    /// Generate single-page documents carrying a subset of all annotation kinds
    Subset {
        /// Output directory
        #[arg(short, long, default_value = "pdf_outputs_2")]
        output: PathBuf,

        /// Number of documents
        #[arg(short = 'n', long, default_value_t = 50)]
        count: usize,

        /// RNG seed (drawn from entropy when absent)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Build rebalanced seeds from annotations found in existing documents
    Harvest {
        /// Directory of source PDF files
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (cleared first)
        #[arg(short, long, default_value = "harvested_seeds")]
        output: PathBuf,

        /// Number of seeds
        #[arg(short = 'n', long, default_value_t = 100)]
        count: usize,

        /// Widgets plus other annotations kept in the pools
        #[arg(long, default_value_t = 400)]
        keep: usize,

        /// Maximum annotations per seed
        #[arg(long, default_value_t = 5)]
        max_annotations: usize,

        /// RNG seed (drawn from entropy when absent)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            info!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn report(manifest: &Manifest, output: &Path) {
    println!(
        "Wrote {} documents to {} ({} failed, {} over budget)",
        manifest.written,
        output.display(),
        manifest.failed,
        manifest.oversized
    );
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seedpdf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            count,
            seed,
            config,
            prefix,
        } => {
            let config = match config {
                Some(path) => GeneratorConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GeneratorConfig::varied(),
            };
            let generator = DocumentGenerator::new(config, TemplatePool::standard())?;
            let manifest = Corpus::new(generator, &output, prefix).run(count, &mut rng_from(seed))?;
            report(&manifest, &output);
        }

        Commands::Subset {
            output,
            count,
            seed,
        } => {
            let generator = DocumentGenerator::new(GeneratorConfig::kind_subset(), TemplatePool::standard())?;
            let manifest = Corpus::new(generator, &output, "generated_2").run(count, &mut rng_from(seed))?;
            report(&manifest, &output);
        }

        Commands::Harvest {
            input,
            output,
            count,
            keep,
            max_annotations,
            seed,
        } => {
            let options = HarvestOptions {
                keep,
                max_annotations,
                ..HarvestOptions::default()
            };
            let backend = LopdfBackend::default();
            let pool = HarvestPool::collect(&backend, &input, &options)
                .with_context(|| format!("reading {}", input.display()))?;

            if output.exists() {
                fs::remove_dir_all(&output)
                    .with_context(|| format!("clearing {}", output.display()))?;
            }

            let manifest = generate_seeds(&backend, &pool, &options, &output, count, &mut rng_from(seed))?;
            report(&manifest, &output);
        }
    }

    Ok(())
}

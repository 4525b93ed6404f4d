use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Catalog;
use engine::{HybridEngine, RecommendationService};
use fusion::{FusionConfig, RankedRecommendation, RecommendationSummary};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// ReelRecs - Hybrid Movie Recommender
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Recommends movies similar to a title by blending genre and rating similarity", long_about = None)]
struct Cli {
    /// Directory holding movies.csv + ratings.csv (or MovieLens movies.dat + ratings.dat)
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// JSON file with fusion settings (content_weight, collab_weight, neighbors_per_space, max_results)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies similar to a title
    Recommend {
        /// Movie title, matched case-insensitively (e.g. "Toy Story (1995)")
        #[arg(long)]
        title: String,

        /// Show the content and collaborative signals behind each score
        #[arg(long)]
        explain: bool,

        /// Print the ranked list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalog titles
    Titles {
        /// Only titles containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of titles to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // Load the catalog snapshot
    println!("Loading movie catalog from {}...", cli.data_dir.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_dir(&cli.data_dir)
        .with_context(|| format!("Failed to load catalog from {}", cli.data_dir.display()))?;
    println!("{} Loaded catalog in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            explain,
            json,
        } => handle_recommend(&catalog, config, &title, explain, json).await?,
        Commands::Titles { filter, limit } => handle_titles(&catalog, filter.as_deref(), limit),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&catalog, config, requests, concurrent).await?,
    }

    Ok(())
}

/// Fusion settings from a JSON file, or the defaults
fn load_config(path: Option<&Path>) -> Result<FusionConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => FusionConfig::default(),
    };
    config.validate().context("Invalid fusion settings")?;
    Ok(config)
}

/// Build both similarity spaces, timing the work
fn build_engine(catalog: &Catalog, config: FusionConfig) -> Result<HybridEngine> {
    let start = Instant::now();
    let engine = HybridEngine::build(catalog, config).context("Failed to build engine")?;
    println!("{} Built similarity spaces in {:?}", "✓".green(), start.elapsed());
    Ok(engine)
}

/// Handle the 'recommend' command
async fn handle_recommend(
    catalog: &Catalog,
    config: FusionConfig,
    title: &str,
    explain: bool,
    json: bool,
) -> Result<()> {
    let service = RecommendationService::new(build_engine(catalog, config)?);
    let recommendations = service.recommend(title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        if service.engine().contains(title) {
            println!(
                "{}",
                format!("No recommendations found for '{}': not enough data for this movie.", title)
                    .yellow()
            );
        } else {
            println!(
                "{}",
                format!("'{}' is not in the catalog. Try `reel-recs titles --filter <text>`.", title)
                    .yellow()
            );
        }
        return Ok(());
    }

    print_recommendations(title, &recommendations, explain);
    if let Some(summary) = RecommendationSummary::from_recommendations(&recommendations) {
        print_summary(&summary);
    }
    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(catalog: &Catalog, filter: Option<&str>, limit: usize) {
    let titles: Vec<&str> = match filter {
        Some(fragment) => catalog
            .search_titles(fragment)
            .into_iter()
            .map(|m| m.title.as_str())
            .collect(),
        None => catalog.titles(),
    };

    let heading = match filter {
        Some(fragment) => format!("Titles matching '{}' ({} found):", fragment, titles.len()),
        None => format!("Titles ({} total):", titles.len()),
    };
    println!("{}", heading.bold().blue());
    for title in titles.iter().take(limit) {
        println!("  {}", display_title(title));
    }
    if titles.len() > limit {
        println!("  ... and {} more", titles.len() - limit);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    catalog: &Catalog,
    config: FusionConfig,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let titles = catalog.titles();
    if titles.is_empty() {
        bail!("Catalog is empty, nothing to benchmark");
    }

    let service = RecommendationService::new(build_engine(catalog, config)?);

    // Random titles from the catalog
    let queries: Vec<String> = (0..requests)
        .map(|_| titles[rand::random::<u32>() as usize % titles.len()].to_string())
        .collect();

    // Run in waves of `concurrent` tasks
    let wall_clock = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for wave in queries.chunks(concurrent.max(1)) {
        let mut handles = Vec::with_capacity(wave.len());
        for title in wave {
            let service = service.clone();
            let title = title.clone();
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                service.recommend(&title).await?;
                Ok::<_, anyhow::Error>(start.elapsed())
            }));
        }
        for handle in handles {
            timings.push(handle.await??);
        }
    }
    let total_time = wall_clock.elapsed();
    info!("Benchmark finished {} requests", timings.len());

    timings.sort();
    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / timings.len() as u32;
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Title-case a canonical title for display: "toy story (1995)" -> "Toy Story (1995)"
fn display_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_in_word = false;
    for c in title.chars() {
        if prev_in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_in_word = c.is_alphanumeric() || c == '\'';
    }
    out
}

/// Fixed-width bar for a score in [0, 1]
fn score_bar(score: f32) -> String {
    const WIDTH: usize = 20;
    let filled = ((score.clamp(0.0, 1.0) * WIDTH as f32).round()) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled))
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, recommendations: &[RankedRecommendation], explain: bool) {
    println!(
        "{}",
        format!("Top recommendations for \"{}\":", display_title(title))
            .bold()
            .blue()
    );
    for rec in recommendations {
        println!(
            "{:>3}. {}",
            rec.rank.to_string().green(),
            display_title(&rec.title).bold()
        );
        println!(
            "     Match Score: {:>5.1}% {}",
            rec.score * 100.0,
            score_bar(rec.score)
        );
        if explain {
            let s = &rec.signals;
            println!(
                "     content {:.3} (scaled {:.3}) | collaborative {:.3} (scaled {:.3})",
                s.content_score, s.content_scaled, s.collab_score, s.collab_scaled
            );
        }
    }
}

fn print_summary(summary: &RecommendationSummary) {
    println!("{}", "Recommendation insights:".bold().blue());
    println!("{}Total recommendations: {}", "• ".cyan(), summary.count);
    println!(
        "{}Average match score: {:.2}%",
        "• ".cyan(),
        summary.average_score * 100.0
    );
    println!(
        "{}Best match score: {:.2}%",
        "• ".cyan(),
        summary.best_score * 100.0
    );
}

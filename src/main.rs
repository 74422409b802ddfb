use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use reelmate::{
	ingest, Catalog, CosineModel, CosineModelConfig, EngineError, PearsonCorrelation,
	Recommender, Strategy,
};

#[derive(Parser)]
#[command(name = "reelmate")]
#[command(about = "Movie recommendations: content-based, collaborative, or hybrid")]
#[command(version)]
struct Cli {
	/// Seed movie title (exact catalog title)
	title: String,

	/// Movie metadata CSV (id, original_title, release_year, cast,
	/// keywords, genres, director, tagline)
	#[arg(long)]
	movies: PathBuf,

	/// Rating CSV (userId, movieId, rating); omit to run content-only
	#[arg(long)]
	ratings: Option<PathBuf>,

	/// Id crosswalk CSV (movieId, tmdbId) joining ratings to the catalog
	#[arg(long)]
	links: Option<PathBuf>,

	/// Number of recommendations per group
	#[arg(short = 'k', long, default_value_t = 5)]
	count: usize,

	/// Strategy: content, collaborative, or hybrid
	#[arg(short, long, default_value = "hybrid")]
	strategy: Strategy,

	/// Use the item-item cosine model instead of Pearson correlation
	#[arg(long)]
	model: bool,

	/// Held-out fraction for the cosine model's train split
	#[arg(long, default_value_t = 0.1)]
	test_size: f64,

	/// Seed for the train split, for reproducible output
	#[arg(long, default_value_t = 42)]
	seed: u64,

	/// Emit the result as JSON instead of text
	#[arg(long)]
	json: bool,
}

fn run(cli: &Cli) -> Result<(), EngineError> {
	let movies = ingest::load_movies(&cli.movies)?;
	let mut catalog = Catalog::from_movies(movies);

	if let Some(ref ratings_path) = cli.ratings {
		let mut ratings = ingest::load_ratings(ratings_path)?;
		if let Some(ref links_path) = cli.links {
			let links = ingest::load_links(links_path)?;
			ratings = ingest::crosswalk(ratings, &links);
		}
		catalog.set_ratings(ratings);
	}

	let mut recommender = if cli.model {
		Recommender::with_item_similarity(
			catalog,
			Box::new(CosineModel::new(CosineModelConfig {
				test_size: cli.test_size,
				seed: Some(cli.seed),
			})),
		)
	} else {
		Recommender::with_item_similarity(catalog, Box::new(PearsonCorrelation))
	};
	recommender.build()?;

	let result = recommender.recommend(&cli.title, cli.count, cli.strategy)?;

	if cli.json {
		println!(
			"{}",
			serde_json::to_string_pretty(&result).expect("result serializes")
		);
		return Ok(());
	}

	if result.is_empty() {
		println!("No recommendations available for '{}'.", cli.title);
		return Ok(());
	}
	for group in &result.groups {
		println!("{}:", group.label);
		for (i, entry) in group.entries.iter().enumerate() {
			let year = entry
				.year
				.map(|y| format!(" ({y})"))
				.unwrap_or_default();
			println!("  {}. {}{}", i + 1, entry.title, year);
		}
	}
	Ok(())
}

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.init();

	let cli = Cli::parse();
	if let Err(e) = run(&cli) {
		tracing::error!("{}", e);
		return ExitCode::FAILURE;
	}
	ExitCode::SUCCESS
}

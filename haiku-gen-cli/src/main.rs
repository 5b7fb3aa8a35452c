use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use haiku_gen_core::model::generator::HaikuGenerator;
use haiku_gen_core::syllable::DictionaryCounter;

mod menu;

use menu::Menu;

/// Markov chain haiku generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Training corpus, whitespace separated words (a `.bin` cache is kept next to it)
	#[arg(default_value = "train.txt")]
	corpus: PathBuf,

	/// Syllable overrides file, one `word count` per line
	#[arg(long)]
	dictionary: Option<PathBuf>,

	/// Seed for reproducible haikus
	#[arg(long)]
	seed: Option<u64>,

	/// Failed draws allowed per line before giving up (0 = never give up)
	#[arg(long)]
	max_retries: Option<usize>,

	/// Start every generated haiku with this word
	#[arg(long)]
	first_word: Option<String>,

	/// Verbose/info output (default: quiet)
	#[arg(long, short = 'v')]
	verbose: bool,

	/// Debug output
	#[arg(long)]
	debug: bool,
}

fn main() {
	let args = Args::parse();

	let log_level = if args.debug {
		LevelFilter::Debug
	} else if args.verbose {
		LevelFilter::Info
	} else {
		LevelFilter::Error
	};
	env_logger::Builder::new()
		.filter_level(log_level)
		.parse_default_env()
		.init();

	if let Err(error) = run(args) {
		eprintln!("Haiku generator failed: {error:?}");
		std::process::exit(1);
	}
}

fn run(args: Args) -> Result<()> {
	let counter = match &args.dictionary {
		Some(path) => DictionaryCounter::load(path)
			.with_context(|| format!("failed to load syllable dictionary {}", path.display()))?,
		None => DictionaryCounter::default(),
	};
	info!("syllable overrides: {}", counter.len());

	let mut generator = HaikuGenerator::from_file(&args.corpus, counter)
		.with_context(|| format!("failed to load corpus {}", args.corpus.display()))?;
	info!("corpus: {} words", generator.model().corpus().len());

	if let Some(max_retries) = args.max_retries {
		generator.config_mut().max_retries = if max_retries == 0 { None } else { Some(max_retries) };
	}

	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_rng(&mut rand::rng()),
	};

	let stdin = io::stdin();
	Menu::new(&generator)
		.with_first_word(args.first_word)
		.run(&mut rng, stdin.lock(), io::stdout(), io::stderr())
}

use std::sync::Mutex;

use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use haiku_gen_core::error::HaikuError;
use haiku_gen_core::io::list_files;
use haiku_gen_core::model::generator::HaikuGenerator;
use haiku_gen_core::model::haiku_model::HaikuModel;
use haiku_gen_core::model::session::HaikuSession;
use haiku_gen_core::syllable::HeuristicCounter;

/// Folder holding the `.txt` corpora (and their `.bin` caches).
const DATA_FOLDER: &str = "./data";

/// Query parameters of the `/v1/haiku` endpoint
#[derive(Deserialize)]
struct HaikuParams {
	first_word: Option<String>,
}

/// Query parameters of the `/v1/regenerate` endpoint
#[derive(Deserialize)]
struct RegenerateParams {
	line: Option<usize>,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

struct SharedData {
	generator: HaikuGenerator<HeuristicCounter>,
	session: HaikuSession,
}

/// Maps a generation error to an HTTP response.
///
/// User mistakes are 4xx, a model that cannot generate is 503.
fn error_response(error: HaikuError) -> HttpResponse {
	match error {
		HaikuError::NoHaiku => HttpResponse::Conflict().body(error.to_string()),
		HaikuError::InvalidLine(_) | HaikuError::InvalidSeed { .. } => HttpResponse::BadRequest().body(error.to_string()),
		HaikuError::CorpusTooSmall { .. } => HttpResponse::ServiceUnavailable().body("No usable corpus loaded"),
		_ => HttpResponse::InternalServerError().body(error.to_string()),
	}
}

/// HTTP GET endpoint `/v1/haiku`
///
/// Generates a new haiku into the shared session and returns its three lines.
#[get("/v1/haiku")]
async fn get_haiku(data: web::Data<Mutex<SharedData>>, query: web::Query<HaikuParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let SharedData { generator, session } = &mut *shared_data;

	let mut rng = rand::rng();
	let result = match query.first_word.as_deref().map(str::trim) {
		Some(word) if !word.is_empty() => session.generate_from(generator, word, &mut rng),
		_ => session.generate(generator, &mut rng),
	};

	match result {
		Ok(haiku) => HttpResponse::Ok().body(haiku.to_string()),
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/regenerate?line=N`
///
/// Regenerates line 2 or 3 of the last haiku, keeping the lines before it.
#[put("/v1/regenerate")]
async fn put_regenerate(data: web::Data<Mutex<SharedData>>, query: web::Query<RegenerateParams>) -> impl Responder {
	let line = match query.line {
		Some(line) => line,
		None => return HttpResponse::BadRequest().body("Missing line number"),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let SharedData { generator, session } = &mut *shared_data;

	match session.regenerate(generator, line, &mut rand::rng()) {
		Ok(haiku) => HttpResponse::Ok().body(haiku.to_string()),
		Err(e) => error_response(e),
	}
}

/// One corpus name per line, each file name without its `.txt` extension.
fn corpus_listing(files: &[String]) -> String {
	files
		.iter()
		.map(|file| file.strip_suffix(".txt").unwrap_or(file))
		.collect::<Vec<_>>()
		.join("\n")
}

#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files(DATA_FOLDER, "txt") {
		Ok(files) => HttpResponse::Ok().body(corpus_listing(&files)),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.generator.get_corpus_names().join("\n"))
}

/// HTTP PUT endpoint `/v1/load_corpora?names=a,b`
///
/// Rebuilds the model from the named corpora and forgets the current haiku.
#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let mut model = HaikuModel::default();
	for name in corpus_names {
		let corpus_path = format!("{DATA_FOLDER}/{name}.txt");
		let partial_model = match HaikuModel::new(&corpus_path) {
			Ok(m) => m,
			Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
		};
		model.merge(&partial_model);
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.generator.set_model(model);
	shared_data.session.reset();
	log::info!("corpora loaded: {}", shared_data.generator.get_corpus_names().join(", "));

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Loads every corpus of the data folder, or starts empty if there is none.
fn initial_generator() -> HaikuGenerator<HeuristicCounter> {
	match HaikuGenerator::from_folder(DATA_FOLDER, HeuristicCounter) {
		Ok(generator) => {
			log::info!("corpora loaded: {}", generator.get_corpus_names().join(", "));
			generator
		}
		Err(e) => {
			log::warn!("starting without corpus: {e}");
			HaikuGenerator::new(HaikuModel::default(), HeuristicCounter)
		}
	}
}

/// Main entry point for the server.
///
/// Loads the corpora of `./data`, wraps the generator and the session in a
/// `Mutex`, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - A single session is shared by every client.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let shared_data = SharedData {
		generator: initial_generator(),
		session: HaikuSession::new(),
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.app_data(shared_model.clone())
			.service(get_haiku)
			.service(put_regenerate)
			.service(get_corpora)
			.service(put_corpora)
			.service(get_loaded_corpora)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}

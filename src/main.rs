use anyhow::{Context, Result};
use box_office_predictor::config::{AppConfig, CliConfig, FileConfig, ScalerFallback};
use box_office_predictor::features::{Genre, DISTRIBUTORS, FEATURE_COLUMNS, MPAA_RATINGS};
use box_office_predictor::request::{InputError, NumberOrText, PredictionRequest, RequestError};
use box_office_predictor::AppState;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::{
    get_styles, print_error, print_key_value, print_key_value_highlight, print_section_footer,
    print_section_header, print_success, print_warning, TableBuilder,
};

/// Exit code for a request that was handled but failed.
const REQUEST_FAILED: u8 = 2;

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles = get_styles(), version, about = "Predicts box office revenue from movie attributes.")]
struct CliArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ArtifactArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, global = true, value_parser = parse_path)]
    config: Option<PathBuf>,

    /// Path to the model artifact (JSON).
    #[clap(long, global = true, value_parser = parse_path)]
    model: Option<PathBuf>,

    /// Path to the scaler artifact (JSON). Defaults to scaler.json next to the model.
    #[clap(long, global = true, value_parser = parse_path)]
    scaler: Option<PathBuf>,

    /// What to do if the scaler cannot be loaded.
    #[clap(long, global = true, value_enum, default_value_t = ScalerFallback::Fail)]
    scaler_fallback: ScalerFallback,

    /// Reject opening theaters and release days that are not greater than 0.
    #[clap(long, global = true)]
    reject_non_positive: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predicts the revenue of a single movie.
    Predict(PredictArgs),

    /// Predicts every request of a JSON Lines file ("-" for stdin), one
    /// JSON response per line.
    Batch {
        #[clap(value_parser = parse_input_source)]
        input: InputSource,
    },

    /// Loads the artifacts and reports what was found, without predicting.
    Check,

    /// Lists the known MPAA ratings, distributors and genres.
    Options,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// JSON request file ("-" for stdin). Flags override its fields.
    #[clap(long, value_parser = parse_input_source)]
    input: Option<InputSource>,

    #[clap(long)]
    title: Option<String>,

    #[clap(long)]
    distributor: Option<String>,

    #[clap(long)]
    mpaa: Option<String>,

    /// Number of theaters on opening weekend, e.g. 4000 or 4,000.
    #[clap(long, allow_hyphen_values = true)]
    opening_theaters: Option<String>,

    /// Number of days in release.
    #[clap(long, allow_hyphen_values = true)]
    release_days: Option<String>,

    /// Genre tag, repeatable or comma separated.
    #[clap(long = "genre", value_delimiter = ',')]
    genres: Vec<String>,

    /// Print the JSON response instead of the report.
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Clone)]
enum InputSource {
    Stdin,
    File(PathBuf),
}

fn parse_input_source(s: &str) -> Result<InputSource> {
    if s == "-" {
        return Ok(InputSource::Stdin);
    }
    Ok(InputSource::File(parse_path(s)?))
}

impl InputSource {
    fn read(&self) -> Result<String> {
        match self {
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read stdin")?;
                Ok(buf)
            }
            InputSource::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {:?}", path)),
        }
    }
}

impl ArtifactArgs {
    fn resolve(&self) -> Result<AppConfig> {
        let file_config = match &self.config {
            Some(path) => {
                info!("Reading config from {:?}", path);
                Some(FileConfig::load(path)?)
            }
            None => None,
        };
        let cli = CliConfig {
            model_path: self.model.clone(),
            scaler_path: self.scaler.clone(),
            scaler_fallback: self.scaler_fallback,
            reject_non_positive: self.reject_non_positive,
        };
        AppConfig::resolve(&cli, file_config)
    }
}

impl PredictArgs {
    fn build_request(&self) -> Result<PredictionRequest, RequestError> {
        let mut request = match &self.input {
            Some(source) => {
                let content = source
                    .read()
                    .map_err(|e| InputError::Malformed(format!("{:#}", e)))?;
                serde_json::from_str(&content)
                    .map_err(|e| InputError::Malformed(e.to_string()))?
            }
            None => PredictionRequest::default(),
        };
        if let Some(title) = &self.title {
            request.title = Some(title.clone());
        }
        if let Some(distributor) = &self.distributor {
            request.distributor = Some(distributor.clone());
        }
        if let Some(mpaa) = &self.mpaa {
            request.mpaa = Some(mpaa.clone());
        }
        if let Some(theaters) = &self.opening_theaters {
            request.opening_theaters = Some(NumberOrText::Text(theaters.clone()));
        }
        if let Some(days) = &self.release_days {
            request.release_days = Some(NumberOrText::Text(days.clone()));
        }
        if !self.genres.is_empty() {
            request.genres = self.genres.clone();
        }
        Ok(request)
    }
}

fn run_predict(state: &AppState, args: &PredictArgs) -> Result<ExitCode> {
    let outcome = args
        .build_request()
        .and_then(|request| state.predict(&request));

    if let Err(err) = &outcome {
        error!("Prediction request failed: {}", err);
    }

    if args.json {
        let response = state.respond(&outcome);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        match &outcome {
            Ok(prediction) => {
                print_section_header("Box Office Prediction");
                for (i, (key, value)) in prediction.report_rows().iter().enumerate() {
                    if i == 1 {
                        print_key_value_highlight(key, value);
                    } else {
                        print_key_value(key, value);
                    }
                }
                print_section_footer();
                if state.degraded {
                    print_warning("The scaler could not be loaded, this prediction is unreliable.");
                }
            }
            Err(err) => print_error(&format!("An error occurred: {}", err)),
        }
    }

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(REQUEST_FAILED)
    })
}

fn run_batch(state: &AppState, input: &InputSource) -> Result<ExitCode> {
    let content = input.read()?;
    let lines: Vec<String> = content.lines().map(String::from).collect();
    let responses = state.handle_json_lines(&lines);

    let failed = responses.iter().filter(|r| !r.is_success()).count();
    for response in &responses {
        println!("{}", serde_json::to_string(response)?);
    }
    info!(
        "Handled {} requests, {} failed",
        responses.len(),
        failed
    );
    if state.degraded {
        warn!("Batch was predicted without the fitted scaler, responses are marked degraded");
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(REQUEST_FAILED)
    })
}

fn run_check(state: &AppState, config: &AppConfig) {
    print_section_header("Artifacts");
    print_key_value("Model", &config.model_path.to_string_lossy());
    print_key_value("Model kind", &state.service.model_description());
    print_key_value("Features", &state.service.n_features().to_string());
    print_key_value("Scaler", &config.scaler_path.to_string_lossy());
    let scaler_status = if state.degraded {
        "identity fallback"
    } else {
        "fitted"
    };
    print_key_value("Scaler status", scaler_status);
    print_key_value("Columns", &FEATURE_COLUMNS.join(", "));
    print_section_footer();
    if state.degraded {
        print_warning("Scaler missing, the identity fallback is active.");
    } else {
        print_success("Artifacts loaded, no issues found.");
    }
}

/// One `[index, label]` row per label, the index being the encoded value.
fn indexed_rows<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<Vec<String>> {
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| vec![i.to_string(), label.to_string()])
        .collect()
}

fn print_indexed_table(title: &str, column: &str, rows: Vec<Vec<String>>) {
    print_section_header(title);
    let mut table = TableBuilder::new(vec!["Index", column]);
    for row in rows {
        table.add_row(row);
    }
    table.print();
}

fn print_options() {
    print_indexed_table(
        "MPAA ratings",
        "Rating",
        indexed_rows(MPAA_RATINGS.labels().iter().copied()),
    );
    print_indexed_table(
        "Distributors",
        "Distributor",
        indexed_rows(DISTRIBUTORS.labels().iter().copied()),
    );
    print_indexed_table(
        "Genres",
        "Genre",
        indexed_rows(Genre::ALL.iter().map(|g| g.tag())),
    );
}

fn main() -> Result<ExitCode> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    if let Command::Options = cli_args.command {
        print_options();
        return Ok(ExitCode::SUCCESS);
    }

    let config = cli_args.artifacts.resolve()?;
    let state = AppState::load(&config)?;

    match &cli_args.command {
        Command::Predict(args) => run_predict(&state, args),
        Command::Batch { input } => run_batch(&state, input),
        Command::Check => {
            run_check(&state, &config);
            Ok(ExitCode::SUCCESS)
        }
        Command::Options => Ok(ExitCode::SUCCESS),
    }
}

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use plagai_scanner_lib::api::{self, AnalyzeOptions};
use plagai_scanner_lib::models::{InputSource, Language, ModelConfigOverrides, ModelVariant};
use plagai_scanner_lib::services::{render_report, LocaleLexicon};

#[derive(Parser)]
#[command(name = "plagai-scanner")]
#[command(about = "Check text for plagiarism and AI generation with web-grounded Gemini analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze text given as argument, from --file, or from stdin
    Analyze(AnalyzeArgs),
    /// Check an API key with a minimal request (uses the configured key when omitted)
    ValidateKey { key: Option<String> },
    /// Print the plain text extracted from a PDF, DOCX or ODT file
    Extract { path: PathBuf },
    /// Show or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Text to analyze
    text: Option<String>,
    /// Document to extract and analyze instead of TEXT
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Answer language: pt, en or es
    #[arg(short, long, env = "PLAGAI_LANGUAGE")]
    lang: Option<Language>,
    /// Model: flash or pro
    #[arg(short, long)]
    model: Option<ModelVariant>,
    #[arg(long)]
    persona: Option<String>,
    #[arg(long)]
    context: Option<String>,
    #[arg(long)]
    memory: Option<String>,
    #[arg(long)]
    temperature: Option<f64>,
    #[arg(long)]
    top_k: Option<u32>,
    #[arg(long)]
    top_p: Option<f64>,
    #[arg(long)]
    api_key: Option<String>,
    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
    /// Also write the output to this file
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    SetKey { key: String },
    DeleteKey,
    SetLanguage { language: Language },
    SetModel { model: ModelVariant },
    /// Gemini base URL; pass an empty string to reset
    SetUrl { url: String },
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

async fn analyze(args: AnalyzeArgs) -> Result<()> {
    let config = api::get_config().unwrap_or_default();
    let language = args.lang.unwrap_or(config.language);

    let (text, source) = match (&args.file, &args.text) {
        (Some(path), _) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read file failed: {}", path.display()))?;
            let name = file_name_of(path);
            let text = api::preprocess_file(name.clone(), bytes, language)
                .await
                .map_err(|e| anyhow!(e))?;
            (text, InputSource::File { name })
        }
        (None, Some(text)) => (text.clone(), InputSource::Manual),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin failed")?;
            (buf, InputSource::Manual)
        }
    };

    let options = AnalyzeOptions {
        language: Some(language),
        model: args.model,
        model_config: ModelConfigOverrides {
            persona: args.persona,
            context: args.context,
            memory: args.memory,
            temperature: args.temperature,
            top_k: args.top_k,
            top_p: args.top_p,
        },
        api_key: args.api_key,
    };

    let outcome = api::analyze_text(text.clone(), source, options)
        .await
        .map_err(|e| anyhow!(e))?;

    let output = if args.json {
        serde_json::to_string_pretty(&outcome)?
    } else {
        render_report(&outcome, LocaleLexicon::get(outcome.language), &text)
    };

    println!("{}", output);
    if let Some(out) = args.out {
        std::fs::write(&out, &output)
            .with_context(|| format!("write out failed: {}", out.display()))?;
        eprintln!("Wrote: {}", out.display());
    }
    Ok(())
}

fn config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut config = api::get_config().map_err(|e| anyhow!(e))?;
            for key in config.api_keys.values_mut() {
                *key = mask_key(key);
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!(
                "API key available: {}",
                if api::has_api_key() { "yes" } else { "no" }
            );
        }
        ConfigAction::SetKey { key } => {
            api::store_api_key(key).map_err(|e| anyhow!(e))?;
            println!("API key saved");
        }
        ConfigAction::DeleteKey => {
            api::delete_api_key().map_err(|e| anyhow!(e))?;
            println!("API key deleted");
        }
        ConfigAction::SetLanguage { language } => {
            api::set_language(language).map_err(|e| anyhow!(e))?;
            println!("Language set to {}", language);
        }
        ConfigAction::SetModel { model } => {
            api::set_model(model).map_err(|e| anyhow!(e))?;
            println!("Model set to {}", model);
        }
        ConfigAction::SetUrl { url } => {
            api::set_base_url(url).map_err(|e| anyhow!(e))?;
            println!("Base URL updated");
        }
    }
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[tokio::main]
async fn main() -> Result<()> {
    plagai_scanner_lib::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => analyze(args).await,
        Commands::ValidateKey { key } => {
            let Some(key) = key.or_else(plagai_scanner_lib::services::get_api_key) else {
                bail!("no API key given or configured");
            };
            if api::validate_key(key).await.map_err(|e| anyhow!(e))? {
                println!("valid");
                Ok(())
            } else {
                println!("invalid");
                std::process::exit(1);
            }
        }
        Commands::Extract { path } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read file failed: {}", path.display()))?;
            let language = api::get_config().unwrap_or_default().language;
            let text = api::preprocess_file(file_name_of(&path), bytes, language)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("{}", text);
            Ok(())
        }
        Commands::Config { action } => config(action),
    }
}

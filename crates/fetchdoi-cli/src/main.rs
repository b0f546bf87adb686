use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use fetchdoi_core::{AppConfig, CreatePublicationRequest, ExitCode};
use fetchdoi_science::http::HttpClient;
use fetchdoi_science::{
    FetchDoiService, LanguageResolver, PredicateResolver, PublicationChannelResolver, ScienceError,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "fetchdoi",
    about = "Resolve a DOI or landing page into a publication request",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting FETCHDOI_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of ~/.config/fetchdoi/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a DOI or a landing-page URL.
    Resolve {
        url: String,
        /// Owner stamped on the resulting request.
        #[arg(long)]
        owner: String,
        /// Customer (institution) URI of the owner.
        #[arg(long)]
        customer: Option<Url>,
        /// Skip contributor identity lookups.
        #[arg(long)]
        no_enrich: bool,
    },

    /// Look up a journal in the publication-channel registry.
    Channel {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        eissn: Option<String>,
        #[arg(long)]
        pissn: Option<String>,
        #[arg(long)]
        year: i32,
    },

    /// Normalize a language code to its Lexvo URI.
    Language { code: String },

    /// Show which ontology property a meta-tag name maps to.
    Predicate { name: String },
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    init_tracing();

    let json_output = cli.json || std::env::var("FETCHDOI_JSON").as_deref() == Ok("1");

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    debug!(path = ?cli.config, "config loaded");

    match cli.command {
        Commands::Resolve {
            url,
            owner,
            customer,
            no_enrich,
        } => {
            let mut config = config;
            if no_enrich {
                config.enrichment.enabled = false;
            }
            let service = FetchDoiService::from_config(&config)?;

            match service.resolve(&url, &owner, customer.as_ref()).await {
                Ok(request) => {
                    let dur = start.elapsed().as_millis();
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": request,
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else {
                        print_request(&request);
                    }
                }
                Err(err) => fail(json_output, &err),
            }
        }

        Commands::Channel {
            name,
            eissn,
            pissn,
            year,
        } => {
            let http = HttpClient::from_config(&config)?;
            let resolver =
                PublicationChannelResolver::new(http, &config.registries.channel_registry_url);
            let id = resolver
                .lookup_channel(name.as_deref(), eissn.as_deref(), pissn.as_deref(), year)
                .await;
            let dur = start.elapsed().as_millis();

            match id {
                Some(id) if json_output => print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "id": id, "year": year },
                    "meta": { "duration_ms": dur }
                }))?,
                Some(id) => println!("{id}"),
                None => {
                    not_found(json_output, "No matching publication channel")?;
                }
            }
        }

        Commands::Language { code } => {
            let uri = LanguageResolver::new().resolve(Some(&code));
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "input": code, "uri": uri },
                }))?;
            } else {
                println!("{uri}");
            }
        }

        Commands::Predicate { name } => match PredicateResolver::new().resolve(&name) {
            Some(property) if json_output => print_json(&serde_json::json!({
                "status": "ok",
                "data": { "input": name, "property": property.to_string(), "iri": property.iri() },
            }))?,
            Some(property) => println!("{property}  {}", property.iri()),
            None => not_found(json_output, &format!("No ontology property for {name}"))?,
        },
    }

    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FETCHDOI_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("fetchdoi=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn print_request(request: &CreatePublicationRequest) {
    let Some(ed) = &request.entity_description else {
        println!("(empty request)");
        return;
    };

    println!("Title:     {}", ed.main_title.as_deref().unwrap_or("—"));
    if let Some(date) = &ed.publication_date {
        println!("Year:      {}", date.year);
    }
    if let Some(reference) = &ed.reference {
        if let Some(doi) = &reference.doi {
            println!("DOI:       {doi}");
        }
        if let Some(journal) = &reference.journal {
            println!("Journal:   {journal}");
        }
        if let Some(channel) = &reference.channel_id {
            println!("Channel:   {channel}");
        }
    }
    if let Some(language) = &ed.language {
        println!("Language:  {language}");
    }
    for contributor in &ed.contributors {
        let id = contributor
            .identity
            .id
            .as_ref()
            .map(|id| format!("  <{id}>"))
            .unwrap_or_default();
        println!(
            "  {seq:>2}. {name} ({role}){id}",
            seq = contributor.sequence,
            name = contributor.identity.name,
            role = contributor.role,
        );
    }
}

fn exit_code(err: &ScienceError) -> ExitCode {
    match err {
        ScienceError::MetadataNotFound(_) => ExitCode::NotFound,
        ScienceError::InvalidDoi(_) | ScienceError::InvalidUrl(_) => ExitCode::InvalidArgs,
        err if err.is_unreachable() => ExitCode::NetworkError,
        _ => ExitCode::GeneralError,
    }
}

fn error_kind(code: &ExitCode) -> &'static str {
    match code {
        ExitCode::Success => "ok",
        ExitCode::NotFound => "not_found",
        ExitCode::InvalidArgs => "invalid_args",
        ExitCode::NetworkError => "network",
        ExitCode::GeneralError => "error",
    }
}

fn fail(json_output: bool, err: &ScienceError) -> ! {
    let code = exit_code(err);
    if json_output {
        let body = serde_json::json!({
            "status": "error",
            "error": error_kind(&code),
            "message": err.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
    }
    std::process::exit(code as i32);
}

fn not_found(json_output: bool, message: &str) -> Result<()> {
    if json_output {
        print_json(&serde_json::json!({
            "status": "error",
            "error": error_kind(&ExitCode::NotFound),
            "message": message,
        }))?;
    } else {
        eprintln!("{message}");
    }
    std::process::exit(ExitCode::NotFound as i32);
}

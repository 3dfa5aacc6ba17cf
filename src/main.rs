use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tower_lsp::{LspService, Server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pubspec_lsp::backend::PubspecBackend;
use pubspec_lsp::cache::{CachedRegistry, MemoryCache};
use pubspec_lsp::parsers::ManifestReader;
use pubspec_lsp::parsers::pubspec::PubspecParser;
use pubspec_lsp::registries::http_client::create_shared_client;
use pubspec_lsp::registries::pub_dev::{DEFAULT_BASE_URL, PubDevRegistry};
use pubspec_lsp::reports::{
    generate_json_report, generate_markdown_report, generate_summary_report,
};
use pubspec_lsp::scanner::{ScanFilter, scan};

#[derive(Parser)]
#[command(name = "pubspec-lsp")]
#[command(about = "Outdated dependency checker for pubspec.yaml", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Summary,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the LSP server (default behavior)
    Lsp,
    /// Check a pubspec.yaml for outdated dependencies
    Check {
        /// Path to the pubspec.yaml to check
        #[arg(short, long, default_value = "pubspec.yaml")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        output: OutputFormat,

        /// Registry API base URL
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        registry: String,

        /// Package name patterns to skip (`*` wildcards allowed)
        #[arg(long)]
        ignore: Vec<String>,

        /// Do not check dev_dependencies
        #[arg(long)]
        no_dev: bool,

        /// Exit with code 1 if outdated dependencies are found
        #[arg(long)]
        fail_on_outdated: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Some(Commands::Check {
            file,
            output,
            registry,
            ignore,
            no_dev,
            fail_on_outdated,
        }) => {
            let filter = ScanFilter {
                ignore,
                include_dev: !no_dev,
            };
            run_check(file, output, &registry, &filter, fail_on_outdated).await
        }
        Some(Commands::Lsp) | None => run_lsp().await.map(|()| ExitCode::SUCCESS),
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    })
}

async fn run_lsp() -> anyhow::Result<()> {
    tracing::info!("Starting pubspec-lsp server");

    let registry = CachedRegistry::new(PubDevRegistry::new()?, MemoryCache::new());

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| PubspecBackend::new(client, registry));
    Server::new(stdin, stdout, socket).serve(service).await;
    Ok(())
}

async fn run_check(
    file: PathBuf,
    output: OutputFormat,
    registry_url: &str,
    filter: &ScanFilter,
    fail_on_outdated: bool,
) -> anyhow::Result<ExitCode> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    let path = file.to_string_lossy();
    let parser = PubspecParser::new();
    if !parser.is_manifest_file(&path) {
        anyhow::bail!("not a pubspec.yaml: {}", file.display());
    }
    let registry = PubDevRegistry::with_base_url(create_shared_client()?, registry_url);

    let report = scan(&path, &content, &parser, &registry, filter).await;
    if report.checked == 0 {
        eprintln!("No dependencies to check in {}", file.display());
    }

    match output {
        OutputFormat::Json => println!("{}", generate_json_report(&path, &report)?),
        OutputFormat::Markdown => println!("{}", generate_markdown_report(&path, &report)),
        OutputFormat::Summary => println!("{}", generate_summary_report(&path, &report)),
    }

    if fail_on_outdated && !report.findings.is_empty() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixdiff::api;
use pixdiff::error;
use pixdiff::models::{AppConfig, ComparisonRequest};
use pixdiff::server;
use pixdiff::services::{diff_store, ComparisonService};

#[derive(Parser)]
#[command(name = "pixdiff")]
#[command(about = "pixdiff - visual difference service for pairs of PNG images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Compare two PNG files without starting a server
    Compare {
        /// First PNG image
        image1: PathBuf,

        /// Second PNG image
        image2: PathBuf,

        /// Write the diff image to this PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Matching threshold in [0, 1] (default from config)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Print the same JSON body the HTTP API returns
        #[arg(long)]
        json: bool,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pixdiff API",
        description = "Visual difference service for pairs of PNG images",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(api::handle_compare),
    components(schemas(
        api::CompareResponse,
        api::CompareForm,
        error::ErrorResponse,
        error::Dimensions,
    )),
    tags(
        (name = "Compare", description = "Image comparison")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Compare {
            image1,
            image2,
            output,
            threshold,
            json,
        }) => run_compare_command(&image1, &image2, output.as_ref(), threshold, json),
        Some(Commands::Init { force, list }) => run_init_command(force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Compare two local files with the same pipeline the server uses
fn run_compare_command(
    image1: &PathBuf,
    image2: &PathBuf,
    output: Option<&PathBuf>,
    threshold: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    use pixdiff::assets::AssetLoader;

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixdiff=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let config = AppConfig::load_from_assets(&AssetLoader::new(None, config_file));
    let comparator = ComparisonService::new(&config);

    let bytes_a = std::fs::read(image1)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", image1.display()))?;
    let bytes_b = std::fs::read(image2)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", image2.display()))?;
    let threshold = threshold.unwrap_or_else(|| config.default_threshold().value());

    let result = match comparator.compare(&ComparisonRequest::new(&bytes_a, &bytes_b, threshold)) {
        Ok(result) => result,
        Err(e) if json => {
            let body = error::ApiError::from(e).body();
            println!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(path) = output {
        std::fs::write(path, &result.diff_png)?;
    }

    if json {
        let body = api::CompareResponse {
            diff_image: diff_store::data_uri(&result.diff_png),
            difference: result.differing_pixels,
            total_pixels: result.total_pixels,
            percent_diff: result.percent_string(),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!(
            "{}x{}: {} of {} pixels differ ({}%)",
            result.width,
            result.height,
            result.differing_pixels,
            result.total_pixels,
            result.percent_string()
        );
        if let Some(path) = output {
            println!("Diff written to {} ({} bytes)", path.display(), result.diff_png.len());
        }
    }

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(force: bool, list: bool) -> anyhow::Result<()> {
    use pixdiff::assets::{AssetCategory, AssetLoader};

    if list {
        println!("Embedded assets:\n");
        println!("Page:");
        for f in AssetLoader::list_embedded(AssetCategory::Public) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Create asset loader with paths from env vars (or defaults)
    let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let loader = AssetLoader::new(static_dir, config_file);

    let report = loader.init(&[AssetCategory::Public, AssetCategory::Config], force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    use pixdiff::assets::{AssetCategory, AssetLoader};

    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let static_dir = std::env::var("STATIC_DIR").ok();

    println!("pixdiff v{VERSION}");
    println!("Visual difference service for pairs of PNG images\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  STATIC_DIR  = {}",
        static_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let loader = AssetLoader::new(
        static_dir.clone().map(PathBuf::from),
        config_file.clone().map(PathBuf::from),
    );

    let config_source = match config_file {
        Some(ref path) if PathBuf::from(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:  {config_source}");

    let embedded_count = AssetLoader::list_embedded(AssetCategory::Public).len();
    match static_dir {
        Some(ref path) if PathBuf::from(path).exists() => println!(
            "  Page:    {path} ({} files, {embedded_count} embedded)",
            loader.list_static().len()
        ),
        _ => println!("  Page:    embedded ({embedded_count} files)"),
    }

    let config = AppConfig::load_from_assets(&loader);
    println!("\nComparison:");
    println!("  default threshold = {}", config.default_threshold);
    println!("  max file size     = {} bytes", config.max_file_bytes);
    println!("  max pixels        = {}", config.max_pixels);
    println!("  delivery          = {:?}", config.delivery);

    println!("\nCommands:");
    println!("  pixdiff serve     Start the HTTP server");
    println!("  pixdiff compare   Compare two PNG files");
    println!("  pixdiff init      Extract embedded assets");
    println!("\nRun 'pixdiff --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    use pixdiff::assets::AssetLoader;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixdiff=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Create asset loader with optional external paths from env vars
    let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        page = ?static_dir.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        config = ?config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    let asset_loader = Arc::new(AssetLoader::new(static_dir, config_file));
    let state = server::create_app_state(asset_loader)?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "pixdiff server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

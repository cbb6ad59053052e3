mod handlers;
mod routes;
mod templates;

use std::net::SocketAddr;
use std::process;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use dz::api::{build_http_client, HttpRegionBackend, NominatimGeocoder};
use dz::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use dz::error::RegionError;
use dz::geometry::{dominant_ring, polygon_area};
use dz::models::{Action, AppState, Region};
use dz::services::{
    CameraCommand, CameraLog, RegionCreationFlow, RegionStore, SessionContext, SuggestionFeed,
};

async fn build_state_from_env(env_file: Option<&str>) -> Result<AppState, RegionError> {
    config::load_env_file(env_file);
    let client = build_http_client()?;
    let api_base_url = config::get_api_base_url();
    let geocoder_base_url = config::get_geocoder_base_url();
    let session = SessionContext::load(config::get_session_file()).await;

    Ok(AppState {
        geocoder: Arc::new(NominatimGeocoder::new(
            client.clone(),
            geocoder_base_url.clone(),
            config::get_geocoder_country_codes(),
        )),
        backend: Arc::new(HttpRegionBackend::new(
            client,
            api_base_url.clone(),
            config::get_api_token(),
        )),
        viewport: dz::services::ViewportController::from_env(),
        session: Arc::new(Mutex::new(session)),
        flash_store: Arc::new(Mutex::new(Vec::new())),
        api_base_url,
        geocoder_base_url,
    })
}

async fn start_server(state: AppState, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };
    let app = routes::build_router(state);
    tracing::info!(%addr, "Starting dz server");
    println!(
        "{} {}",
        yansi::Paint::new("Web server running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new(
                    "Please stop any process using this port, or start the server with a \
                     different --port value."
                )
                .yellow()
            );
            process::exit(1);
        }
    }
}

fn fail(e: RegionError) -> ! {
    tracing::debug!(error = ?e, "Command failed");
    eprintln!("{} {}", yansi::Paint::new("Error:").red().bold(), e.user_message());
    eprintln!("{}", yansi::Paint::new(e.to_string()).dim());
    process::exit(1);
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_regions(catalog_id: &str, regions: &[Region]) {
    if regions.is_empty() {
        println!("No delivery zones for catalog {}", yansi::Paint::new(catalog_id).cyan());
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Action", "Shape", "Point"]);
    for r in regions {
        let shape = match r.vertex_count() {
            0 => "point".to_string(),
            n => format!("area ({} vertices)", n),
        };
        table.add_row(vec![
            r.id.clone(),
            r.name.clone(),
            r.action().to_string(),
            shape,
            r.reference_point.to_string(),
        ]);
    }
    println!("\n{table}\n");
    let summary = format!("{} zones in catalog {}", regions.len(), catalog_id);
    println!("{}", yansi::Paint::new(summary).dim());
}

fn print_camera(camera: Option<&CameraCommand>) {
    match camera {
        Some(CameraCommand::Center { point, zoom }) => {
            println!("{} center on {} at zoom {}", yansi::Paint::new("Map:").bold(), point, zoom);
        }
        Some(CameraCommand::FitBounds { points }) => {
            match dz::geometry::bounding_box(points) {
                Some(bbox) => println!(
                    "{} fit {} points within [{}] .. [{}]",
                    yansi::Paint::new("Map:").bold(),
                    points.len(),
                    bbox.min,
                    bbox.max
                ),
                None => {
                    println!("{} fit {} points", yansi::Paint::new("Map:").bold(), points.len())
                }
            }
        }
        None => println!("{} nothing to focus on", yansi::Paint::new("Map:").bold()),
    }
}

#[derive(Parser)]
#[command(
    name = "dz",
    author,
    version,
    about = "Delivery zone manager for marketplace catalogs",
    long_about = r#"dz: search addresses, turn them into include/exclude delivery zones and keep
them in sync with the marketplace backend.

Configuration comes from environment variables or a `.env` file (`--env-file`):
API_BASE_URL, API_TOKEN, GEOCODER_BASE_URL, GEOCODER_COUNTRY_CODES, SESSION_FILE.

Examples:
  1) Pick a catalog and list its zones:
      dz catalog use 42
      dz regions list
  2) Add an area where deliveries are refused:
      dz regions add "Isla Maciel" --exclude
  3) Run the web UI:
      dz serve --port 8080
"#,
    after_help = "Use `dz <subcommand> --help` to get subcommand specific options and usage \
                  examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web UI
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Validate configuration (env vars / backend connectivity)
    #[command(
        about = "Validate configuration and ensure API connectivity.",
        long_about = "Check that the backend URL is configured and, when a catalog is selected, \
                      that its delivery zones can be listed."
    )]
    CheckConfig,
    /// Select or show the working catalog
    Catalog {
        #[command(subcommand)]
        sub: CatalogCommands,
    },
    /// Manage the delivery zones of a catalog
    #[command(
        about = "Manage delivery zones (list, add, delete, focus)",
        long_about = "These commands perform the same actions the web UI does. `--catalog` \
                      overrides the catalog stored in the session."
    )]
    Regions {
        #[command(subcommand)]
        sub: RegionCommands,
    },
    /// Geocode a query and show what a new zone would look like, without saving it
    Search { query: String },
    /// Read a query from stdin, one keystroke state per line, and print suggestions
    Suggest,
}

#[derive(Subcommand)]
enum CatalogCommands {
    #[command(
        about = "Select the catalog used by default",
        long_about = "Store the catalog id in the session file so later commands and the web UI \
                      use it."
    )]
    Use { catalog_id: String },
    #[command(about = "Show the selected catalog and last searched address")]
    Show,
}

#[derive(Subcommand)]
enum RegionCommands {
    #[command(about = "List delivery zones")]
    List {
        #[arg(long)]
        catalog: Option<String>,
    },
    #[command(
        about = "Add a delivery zone from an address search",
        long_about = "Geocode the query, keep the largest polygon ring of the first result (or \
                      just its point) and save it as an include zone, or an exclude zone with \
                      --exclude."
    )]
    Add {
        query: String,
        #[arg(long, default_value_t = false)]
        exclude: bool,
        #[arg(long)]
        catalog: Option<String>,
    },
    #[command(
        about = "Delete a delivery zone",
        long_about = "Delete a zone by id. Deleting a zone that is already gone is not an error."
    )]
    Delete {
        region_id: String,
        #[arg(long)]
        catalog: Option<String>,
    },
    #[command(about = "Show where the map would focus for one zone")]
    Focus {
        region_id: String,
        #[arg(long)]
        catalog: Option<String>,
    },
    #[command(about = "Show where the map would focus to fit every zone")]
    FocusAll {
        #[arg(long)]
        catalog: Option<String>,
    },
}

fn load_session(state: &AppState) -> SessionContext {
    state
        .session_snapshot()
        .unwrap_or_else(|| SessionContext::empty(config::get_session_file()))
}

fn resolve_catalog(session: &SessionContext, explicit: Option<&str>) -> String {
    session.resolve_catalog(explicit).unwrap_or_else(|e| fail(e))
}

async fn run_regions(state: &AppState, session: &mut SessionContext, sub: RegionCommands) {
    match sub {
        RegionCommands::List { catalog } => {
            let catalog_id = resolve_catalog(session, catalog.as_deref());
            let store = RegionStore::load(catalog_id, state.backend.as_ref())
                .await
                .unwrap_or_else(|e| fail(e));
            print_regions(store.catalog_id(), store.regions());
        }
        RegionCommands::Add { query, exclude, catalog } => {
            let catalog_id = resolve_catalog(session, catalog.as_deref());
            let action = if exclude { Action::Exclude } else { Action::Include };
            let mut store = RegionStore::new(catalog_id);
            let mut map = CameraLog::new();
            let mut flow = RegionCreationFlow::new(
                state.geocoder.as_ref(),
                state.backend.as_ref(),
                &state.viewport,
            );
            let committed = flow
                .submit(&mut store, &query, action, &mut map)
                .await
                .unwrap_or_else(|e| fail(e));

            session.set_last_address(&committed.pending.name, committed.pending.reference_point);
            if let Err(e) = session.persist().await {
                tracing::warn!(%e, "Failed to persist session");
            }

            println!(
                "{} {} zone: {}",
                yansi::Paint::new("Added").green(),
                action,
                yansi::Paint::new(&committed.pending.name).cyan()
            );
            if !committed.list_refreshed {
                let note = "Saved, but the zone list could not be re-read.";
                println!("{}", yansi::Paint::new(note).yellow());
            }
            print_regions(store.catalog_id(), store.regions());
            print_camera(committed.camera.as_ref());
        }
        RegionCommands::Delete { region_id, catalog } => {
            let catalog_id = resolve_catalog(session, catalog.as_deref());
            let mut store = RegionStore::new(catalog_id);
            store.remove(state.backend.as_ref(), &region_id).await.unwrap_or_else(|e| fail(e));
            println!("{} {}", yansi::Paint::new("Deleted zone").green(), region_id);
            print_regions(store.catalog_id(), store.regions());
        }
        RegionCommands::Focus { region_id, catalog } => {
            let catalog_id = resolve_catalog(session, catalog.as_deref());
            let store = RegionStore::load(catalog_id, state.backend.as_ref())
                .await
                .unwrap_or_else(|e| fail(e));
            let Some(region) = store.get(&region_id) else {
                eprintln!(
                    "{} '{}' {}",
                    yansi::Paint::new("Zone").red(),
                    region_id,
                    yansi::Paint::new("not found").red()
                );
                process::exit(1);
            };
            let mut map = CameraLog::new();
            let camera = state.viewport.fit_to_region(region, &mut map);
            print_camera(camera.as_ref());
        }
        RegionCommands::FocusAll { catalog } => {
            let catalog_id = resolve_catalog(session, catalog.as_deref());
            let store = RegionStore::load(catalog_id, state.backend.as_ref())
                .await
                .unwrap_or_else(|e| fail(e));
            let mut map = CameraLog::new();
            let camera = match state.viewport.fit_to_all(store.regions(), &mut map) {
                Some(c) => c,
                None => state.viewport.fit_to_all_or_default(store.regions(), &mut map),
            };
            print_camera(Some(&camera));
        }
    }
}

async fn run_search(state: &AppState, query: &str) {
    let places = state.geocoder.search(query).await.unwrap_or_else(|e| fail(e));
    let Some(place) = places.first() else {
        fail(RegionError::NotFound(query.to_string()));
    };
    println!("{} {}", yansi::Paint::new("Found:").green(), place.display_name);
    println!("  point: {}", place.point);
    match place.geometry.as_ref() {
        Some(geometry) => match dominant_ring(geometry) {
            Some(ring) => println!(
                "  {}: dominant ring of {} vertices, {:.6} deg²",
                geometry.kind(),
                ring.len(),
                polygon_area(&ring)
            ),
            None => println!("  {} without a usable ring (point-only zone)", geometry.kind()),
        },
        None => println!("  no area geometry (point-only zone)"),
    }
}

async fn run_suggest(state: &AppState) {
    let feed = SuggestionFeed::new(state.geocoder.clone(), config::get_suggest_debounce());
    let mut rx = feed.subscribe();
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().clone();
            if let Some(err) = &current.error {
                eprintln!("{} {}", yansi::Paint::new("!").red(), err);
                continue;
            }
            if current.query.is_empty() {
                continue;
            }
            println!("{} {}", yansi::Paint::new("?").cyan().bold(), current.query);
            for s in &current.suggestions {
                println!("  {} ({})", s.label, s.point);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = None;
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => last = Some(feed.trigger(&line)),
            Ok(None) => break,
            Err(e) => {
                tracing::error!(%e, "Failed to read stdin");
                break;
            }
        }
    }
    if let Some(handle) = last {
        let _ = handle.await;
    }
    // let the printer observe the final state
    tokio::task::yield_now().await;
    printer.abort();
    let sent = format!("{} requests sent", feed.issued_requests());
    println!("{}", yansi::Paint::new(sent).dim());
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }
    if cli.silent {
        dz::api::set_silent(true);
    }

    let state = build_state_from_env(cli.env_file.as_deref()).await.unwrap_or_else(|e| fail(e));

    // No command: serve the web UI on the defaults
    let Some(command) = cli.command else {
        start_server(state, DEFAULT_HOST, DEFAULT_PORT).await;
        return;
    };

    match command {
        Commands::Serve { host, port } => {
            start_server(state, &host, port).await;
        }
        Commands::CheckConfig => {
            let mut ok = true;
            if std::env::var("API_BASE_URL").map(|v| v.trim().is_empty()).unwrap_or(true) {
                eprintln!("{}", yansi::Paint::new("API_BASE_URL is not configured").red());
                ok = false;
            }
            if config::get_api_token().trim().is_empty() {
                let warning = "API_TOKEN is not set; requests will be anonymous";
                eprintln!("{}", yansi::Paint::new(warning).yellow());
            }
            println!("Backend:  {}", yansi::Paint::new(&state.api_base_url).cyan());
            println!("Geocoder: {}", yansi::Paint::new(&state.geocoder_base_url).cyan());
            if !ok {
                process::exit(1);
            }
            let session = load_session(&state);
            match session.selected_catalog() {
                Some(catalog_id) => match RegionStore::load(catalog_id, state.backend.as_ref())
                    .await
                {
                    Ok(store) => {
                        let msg = format!(
                            "Configuration looks valid ({} zones in catalog {})",
                            store.len(),
                            catalog_id
                        );
                        println!("{}", yansi::Paint::new(msg).green());
                    }
                    Err(e) => {
                        let label = yansi::Paint::new("Configuration appears invalid").red();
                        eprintln!("{}: {}", label, e);
                        process::exit(1);
                    }
                },
                None => {
                    let note = "No catalog selected; skipped backend check";
                    println!("{}", yansi::Paint::new(note).dim())
                }
            }
        }
        Commands::Catalog { sub } => {
            let mut session = load_session(&state);
            match sub {
                CatalogCommands::Use { catalog_id } => {
                    session.select_catalog(&catalog_id);
                    session.persist().await.unwrap_or_else(|e| fail(e));
                    println!(
                        "{} {}",
                        yansi::Paint::new("Selected catalog").green(),
                        yansi::Paint::new(catalog_id.trim()).cyan()
                    );
                }
                CatalogCommands::Show => {
                    match session.selected_catalog() {
                        Some(id) => println!("Catalog: {}", yansi::Paint::new(id).cyan()),
                        None => println!("Catalog: {}", yansi::Paint::new("(none)").dim()),
                    }
                    if let Some(addr) = session.last_address() {
                        println!("Last address: {} ({})", addr.label, addr.point);
                    }
                    if let Some(at) = session.updated_at() {
                        let stamp = format!("Updated {}", at.to_rfc3339());
                        println!("{}", yansi::Paint::new(stamp).dim());
                    }
                }
            }
        }
        Commands::Regions { sub } => {
            let mut session = load_session(&state);
            run_regions(&state, &mut session, sub).await;
        }
        Commands::Search { query } => run_search(&state, &query).await,
        Commands::Suggest => run_suggest(&state).await,
    }
}

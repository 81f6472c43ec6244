use std::net::{IpAddr, SocketAddr};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::{Parser, ValueEnum};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use transaction_summary::{
    AppState, DEFAULT_DB_PATH, DEFAULT_UPLOAD_LIMIT, InMemoryTableStore, SQLiteTableStore,
    TableStore, build_router, endpoints, graceful_shutdown,
};

/// Where the uploaded dataset is kept.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Backend {
    /// Keep the dataset in process memory, it is lost when the server stops.
    Memory,
    /// Load the dataset into a SQLite database file.
    Sqlite,
}

/// The REST API server for per-user transaction statistics.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Where to keep the uploaded dataset.
    #[arg(long, value_enum, default_value_t = Backend::Memory)]
    backend: Backend,

    /// File path to the SQLite database, only used by the `sqlite` backend.
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db_path: String,

    /// Delete the SQLite database on start up so that no dataset is loaded.
    #[arg(long)]
    fresh: bool,

    /// The address to serve the API from.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// The largest upload request accepted, in bytes.
    #[arg(long, default_value_t = DEFAULT_UPLOAD_LIMIT)]
    max_upload_bytes: usize,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::new(args.host, args.port);

    let router = match args.backend {
        Backend::Memory => {
            tracing::info!("Keeping uploaded datasets in memory");
            build_router(
                AppState::new(InMemoryTableStore::new()).with_upload_limit(args.max_upload_bytes),
            )
        }
        Backend::Sqlite => {
            let mut store = SQLiteTableStore::new(&args.db_path);

            if args.fresh {
                store
                    .clear()
                    .expect("Could not delete the existing database file");
            }

            tracing::info!(
                "Keeping uploaded datasets in the SQLite database {}",
                store.db_path().display()
            );
            build_router(AppState::new(store).with_upload_limit(args.max_upload_bytes))
        }
    };

    let router = add_tracing_layer(router);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!(
        "HTTP server listening on {} (routes: POST {}, GET {})",
        addr,
        endpoints::UPLOAD,
        endpoints::SUMMARY
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Could not start the server");
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}

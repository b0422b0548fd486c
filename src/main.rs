use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tinyserve::router::Router;
use tinyserve::server::Server;

/// A minimal async HTTP/1.1 static file server.
#[derive(Debug, Parser)]
#[command(name = "tinyserve", version, about)]
struct Args {
    /// Directory served under the /files/ routes.
    #[arg(long, default_value = ".")]
    directory: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:4221")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<(), tinyserve::ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = Args::parse();
    let server = Server::bind(&args.addr).await?;
    server.run(Router::new(args.directory)).await
}

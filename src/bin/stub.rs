//! userform-stub: in-memory users endpoint.
//!
//! Usage:
//!   userform-stub [--port 8080] [--prefix /sdb]
//!
//! Environment variables:
//!   USERFORM_STUB_PORT - Port to listen on (default: 8080)

use clap::Parser;
use userform::logging;
use userform::stub::{run, StubConfig};

#[derive(Parser, Debug)]
#[command(name = "userform-stub", about = "In-memory users endpoint")]
struct Args {
    #[arg(long, env = "USERFORM_STUB_PORT", default_value_t = 8080)]
    port: u16,

    /// Path prefix to mount the endpoint under
    #[arg(long, default_value = "")]
    prefix: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init("info");

    let args = Args::parse();
    let config = StubConfig {
        port: args.port,
        prefix: args.prefix,
    };

    if let Err(e) = run(config).await {
        eprintln!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

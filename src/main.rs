use anyhow::{anyhow, Result};
use clap::Parser;
use userform::cli::{self, Args, Context};
use userform::config::Config;
use userform::logging;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Err(errors) = cfg.validate() {
        for err in &errors {
            eprintln!("Config error: {}", err);
        }
        return Err(anyhow!("Invalid configuration"));
    }

    logging::init(args.log_level.as_deref().unwrap_or(&cfg.log_level));

    let ctx = Context::new(&args, &cfg)?;
    if args.submit {
        cli::run_once(ctx)
    } else {
        cli::run_repl(ctx)
    }
}

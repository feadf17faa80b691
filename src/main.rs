// ZenThera - main.rs
// CLI entry point: banner, logging init, config load, command dispatch

use clap::Parser;
use std::process::exit;

use zenthera::cli::{self, Cli};

fn main() {
    let banner = r#"
 ______         _______ _
|___  /        |__   __| |
   / / ___ _ __   | |  | |__   ___ _ __ __ _
  / / / _ \ '_ \  | |  | '_ \ / _ \ '__/ _` |
 / /_|  __/ | | | | |  | | | |  __/ | | (_| |
/_____\___|_| |_| |_|  |_| |_|\___|_|  \__,_|
AI Compliance Suite
"#;

    println!("{banner}");

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli::run(cli) {
        eprintln!("❌ {e}");
        exit(1);
    }
}

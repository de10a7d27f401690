#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod session_store;

use clap::Parser;
use services::{AppServices, Clock};
use ui::vm::Notice;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::session_store::SessionStore;

fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> commands::CommandResult {
    let config = AppConfig::load(cli.global.config.as_deref())?.with_overrides(&cli.global);
    init_logging(&config.log_level);
    log::debug!("using backend {}", config.backend_url);

    let clock = Clock::default_clock();
    let services = AppServices::rest(config.rest_config()?, clock);

    let store = SessionStore::new(config.session_file.clone());
    log::debug!("session file {}", store.path().display());
    if let Some(session) = store.load(clock)? {
        log::debug!("restored session for {}", session.user.id);
        services.auth().restore(session);
    }
    let _persist = store.track(services.session());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::execute(&services, cli.command, &mut out).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        let notice = Notice::from_error(&*err);
        eprintln!("{}", notice.text);
        std::process::exit(1);
    }
}

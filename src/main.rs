use anyhow::Context;
use clap::Parser;
use clinic_nav::auth::{MemorySession, SessionProvider};
use clinic_nav::browser::{Browser, Extent, MemoryBrowser};
use clinic_nav::config::Config;
use clinic_nav::message::Command;
use clinic_nav::store::{ContentStore, MemoryStore, PostFilter};
use clinic_nav::{logging, App};
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;

/// Height given to every home section in the simulated layout
const SECTION_HEIGHT: f64 = 800.0;

/// Replay a navigation script against an in-memory browser.
#[derive(Parser, Debug)]
#[command(name = "clinic-nav", version, about)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the site's base path, e.g. /clinic
    #[arg(long)]
    base: Option<String>,

    /// JSON seed for the content store
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Script to replay; reads stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Initial location
    #[arg(long, default_value = "/")]
    start: String,

    /// Start with an admin session
    #[arg(long)]
    signed_in: bool,
}

struct Session {
    app: App,
    browser: Rc<MemoryBrowser>,
    auth: Rc<MemorySession>,
    store: MemoryStore,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(base) = &cli.base {
        config.routing.base_path = base.clone();
    }
    logging::init(&config.logging.filter);

    let store = match &cli.seed {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read seed {}", path.display()))?;
            MemoryStore::from_json(&json)
                .with_context(|| format!("failed to load seed {}", path.display()))?
        }
        None => MemoryStore::new(),
    };

    let browser = Rc::new(MemoryBrowser::new(&cli.start));
    browser.set_layout(
        config
            .sections
            .order
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), Extent::new(idx as f64 * SECTION_HEIGHT, SECTION_HEIGHT)))
            .collect(),
    );
    let auth = Rc::new(MemorySession::new(cli.signed_in));
    let app = App::new(config, browser.clone(), auth.clone());
    tracing::info!(page = %app.page(), "started");

    let session = Session {
        app,
        browser,
        auth,
        store,
    };

    let lines: Vec<String> = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?
            .lines()
            .map(String::from)
            .collect(),
        None => io::stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    for (idx, line) in lines.iter().enumerate() {
        let command = Command::parse(line).with_context(|| format!("line {}", idx + 1))?;
        if let Some(command) = command {
            run(&session, command)?;
        }
    }

    Ok(())
}

fn run(session: &Session, command: Command) -> anyhow::Result<()> {
    tracing::debug!(?command, "run");
    let controller = session.app.controller();

    match command {
        Command::Open(href) => {
            session.browser.push_state(&href);
            session.browser.notify_location_changed();
        }
        Command::Go(path) => {
            let variant = controller.routes().resolve(&path);
            controller.navigate(variant);
        }
        Command::Back => {
            if !session.browser.back() {
                tracing::warn!("already at the first history entry");
            }
        }
        Command::Forward => {
            if !session.browser.forward() {
                tracing::warn!("already at the last history entry");
            }
        }
        Command::Scroll(top) => session.browser.user_scroll(top),
        Command::Wait(delay) => session.browser.advance(delay),
        Command::Category(id) => session.app.navigation().navigate_to_treatment_category(&id),
        Command::Section(section) => controller.navigate_to_section(&section),
        Command::Login => session.auth.sign_in(),
        Command::Logout => session.auth.sign_out(),
        Command::Intent(intent) => controller.handle_intent(intent),
        Command::Posts(status) => {
            let filter = PostFilter {
                status,
                published: None,
            };
            for post in session.store.list_posts(&filter) {
                println!("{}", serde_json::to_string(&post)?);
            }
        }
        Command::State => {
            let state = serde_json::json!({
                "location": session.browser.location().href(),
                "page": session.app.page(),
                "navigation": session.app.navigation_state(),
                "history": {
                    "index": session.browser.history_index(),
                    "len": session.browser.history_len(),
                },
            });
            println!("{}", serde_json::to_string(&state)?);
        }
    }
    Ok(())
}

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use swarp_client::builder::{ConfirmDialog, ConfirmOutcome};
use swarp_client::cache::LookupState;
use swarp_client::dispatch::{PrintDispatcher, SystemDispatcher, UrlDispatcher};
use swarp_client::{ApiClient, Session};

#[derive(Parser)]
#[command(
    name = "swarp",
    version,
    about = "Join a Roblox experience, optionally a specific server"
)]
struct Cli {
    /// SWarp server that resolves game details
    #[arg(long, env = "SWARP_SERVER", default_value = "http://localhost:5000")]
    server: String,

    /// Place ID to join; prompted for when omitted
    #[arg(long)]
    place_id: Option<String>,

    /// Server instance ID; blank or "N/A" joins any server
    #[arg(long)]
    instance_id: Option<String>,

    /// Launch without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Print the launch URL instead of opening it
    #[arg(long)]
    print_only: bool,

    /// Request timeout for game detail lookups, in seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// `None` on end of input.
    async fn ask(&mut self, label: &str) -> std::io::Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        self.lines.next_line().await
    }
}

fn render_lookup(state: &LookupState) {
    match state {
        LookupState::Resolved(game) => {
            println!("  {} {}", game.name, game.creator_label());
        },
        LookupState::Failed(e) => println!("  ({e})"),
        LookupState::Idle | LookupState::Pending => {},
    }
}

fn render_dialog(dialog: &ConfirmDialog) {
    println!();
    println!("Join {}?", dialog.title());
    match &dialog.game {
        Some(game) => {
            println!("  {}", game.creator_label());
            println!(
                "  Playing: {}   Visits: {}",
                game.concurrent_players, game.total_visits
            );
            if let Some(description) = &game.description {
                println!("  {description}");
            }
        },
        None => println!("  Could not load full game details"),
    }
    println!("  Place ID: {}", dialog.place_id);
    println!("  Server:   {}", dialog.server_label());
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let api = ApiClient::new(&cli.server, Duration::from_secs(cli.timeout_secs))?;
    let dispatcher: Box<dyn UrlDispatcher> = if cli.print_only {
        Box::new(PrintDispatcher)
    } else {
        Box::new(SystemDispatcher)
    };
    let mut session = Session::new(api, dispatcher);
    let mut prompt = Prompt::new();
    let interactive = cli.place_id.is_none();

    let dialog = loop {
        let place_id = match &cli.place_id {
            Some(id) => id.clone(),
            None => match prompt.ask("Place ID: ").await? {
                Some(line) => line,
                None => return Ok(()),
            },
        };
        session.edit_place_id(&place_id);

        let instance_id = match &cli.instance_id {
            Some(id) => id.clone(),
            None if interactive => prompt
                .ask("Instance ID (blank for any server): ")
                .await?
                .unwrap_or_default(),
            None => String::new(),
        };
        session.edit_instance_id(&instance_id);

        session.settle().await;
        render_lookup(session.lookups().state());

        match session.submit() {
            Ok(dialog) => break dialog,
            Err(e) if interactive => eprintln!("{e}"),
            Err(e) => return Err(e.into()),
        }
    };

    render_dialog(&dialog);

    let confirmed = cli.yes
        || matches!(
            prompt.ask("Launch? [y/N] ").await?.as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        );
    if !confirmed {
        session.cancel();
        println!("Cancelled.");
        return Ok(());
    }

    let outcome = session.confirm();
    for notification in session.take_notifications() {
        eprintln!("{notification}");
    }
    match outcome {
        ConfirmOutcome::DispatchFailed(e) => Err(e.into()),
        ConfirmOutcome::Launched(_) | ConfirmOutcome::NothingPending => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

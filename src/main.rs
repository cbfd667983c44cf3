//! marketmod console binary.
//!
//! Reads one command per line from stdin and redraws the active screen on
//! stdout. All state lives in the library; this binary only parses input,
//! maps commands to controller intents and renders.
//!
//! # Configuration layering
//!
//! 1. `--config <file>` or the default config file, if present
//! 2. `MARKETMOD_*` environment variables
//! 3. `--api-url` and `-o key=value` options

use clap::Parser;
use marketmod::api::{ApiClient, HttpTransport};
use marketmod::app::command::{Command, HELP};
use marketmod::app::detail::AdvertisementDetail;
use marketmod::app::{DecisionForm, ListingController, Notification, Screen, StatsDashboard, Tone};
use marketmod::infrastructure::{get_config_file, MemoryHistory};
use marketmod::ui::components::render_notification;
use marketmod::ui::helpers::CLEAR_SCREEN;
use marketmod::ui::{render_detail, render_listing, render_stats};
use marketmod::{Config, MarketmodError, Result, Theme};
use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Terminal moderation console for the marketplace API.
#[derive(Debug, Parser)]
#[command(name = "marketmod", version, about)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the API, e.g. `http://localhost:3001/api/v1`.
    #[arg(long)]
    api_url: Option<String>,

    /// Initial listing query string, e.g. `page=2&status=pending`.
    #[arg(long, default_value = "")]
    url: String,

    /// Terminal width used for layout.
    #[arg(long, default_value_t = 120)]
    width: usize,

    /// Configuration override as `key=value`; repeatable.
    #[arg(short = 'o', long = "option", value_parser = parse_key_value)]
    options: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(&cli);

    if let Some(path) = marketmod::observability::init_tracing(&config) {
        tracing::debug!(path = %path.display(), "trace export enabled");
    }

    match run(&cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "console stopped");
            eprintln!("marketmod: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Config {
    let file = cli
        .config
        .clone()
        .or_else(|| get_config_file().filter(|path| path.exists()));
    let config = file.map_or_else(Config::default, |path| {
        Config::from_file(&path).unwrap_or_else(|e| {
            eprintln!("marketmod: ignoring {}: {e}", path.display());
            Config::default()
        })
    });

    let mut overrides: BTreeMap<String, String> = cli.options.iter().cloned().collect();
    if let Some(url) = &cli.api_url {
        overrides.insert("api_base_url".to_string(), url.clone());
    }
    config.with_env_overrides().with_map(&overrides)
}

async fn run(cli: &Cli, config: Config) -> Result<()> {
    let (state, theme) = marketmod::initialize(&config);
    let client = Arc::new(config.http_client()?);
    let history = Arc::new(MemoryHistory::new(&cli.url));

    let listing = ListingController::spawn(client.clone(), history, state, &cli.url);
    let mut snapshots = listing.subscribe();
    let mut console = Console {
        stats: StatsDashboard::new(client.clone()),
        client,
        listing,
        detail: None,
        screen: Screen::Listing,
        theme,
        cols: cli.width,
        notice: None,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    console.draw()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Some(command)) => {
                        if !console.execute(command).await? {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => console.notice = Some(Notification::failure(&e, "Некорректная команда")),
                }
                console.draw()?;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Err(MarketmodError::Worker("listing actor stopped".to_string()));
                }
                if console.screen == Screen::Listing {
                    console.draw()?;
                }
            }
        }
    }

    console.listing.unmount().await;
    Ok(())
}

type Detail = AdvertisementDetail<HttpTransport>;

struct Console {
    client: Arc<ApiClient<HttpTransport>>,
    listing: ListingController,
    detail: Option<Detail>,
    stats: StatsDashboard<HttpTransport>,
    screen: Screen,
    theme: Theme,
    cols: usize,
    /// Shown once under the next redraw.
    notice: Option<Notification>,
}

impl Console {
    /// Applies one command; `false` means quit.
    async fn execute(&mut self, command: Command) -> Result<bool> {
        tracing::debug!(command = ?command, "executing command");

        let outcome = match command {
            Command::Search(text) => self.on_listing(|listing| listing.search_input(text)),
            Command::Filter(patch) => self.on_listing(|listing| listing.set_filter(patch)),
            Command::Page(page) => self.on_listing(|listing| listing.set_page(page)),
            Command::Limit(limit) => self.on_listing(|listing| listing.set_items_per_page(limit)),
            Command::Reset => self.on_listing(ListingController::reset_filters),
            Command::Refresh => self.on_listing(ListingController::refresh),
            Command::Show(id) => {
                self.open_detail(id).await;
                Ok(())
            }
            Command::Previous => self.step(Detail::previous_id).await,
            Command::Next => self.step(Detail::next_id).await,
            Command::Approve(id) => {
                let outcome = self.detail_for(id).await.approve().await;
                outcome.map(|note| self.notice = Some(note))
            }
            Command::Reject { id, reason, comment } => {
                let form = DecisionForm::new(Some(reason), comment);
                let outcome = self.detail_for(id).await.reject(&form).await;
                outcome.map(|note| self.notice = Some(note))
            }
            Command::RequestChanges { id, reason, comment } => {
                let form = DecisionForm::new(Some(reason), comment);
                let outcome = self.detail_for(id).await.request_changes(&form).await;
                outcome.map(|note| self.notice = Some(note))
            }
            Command::Create(form) => match form.submit(&*self.client, &CancellationToken::new()).await {
                Ok(note) => {
                    let created = note.tone == Tone::Positive;
                    self.notice = Some(note);
                    if created {
                        self.listing.refresh()
                    } else {
                        Ok(())
                    }
                }
                Err(e) => Err(e),
            },
            Command::Stats(period) => {
                self.screen = Screen::Stats;
                self.stats.load(period).await;
                Ok(())
            }
            Command::Back => {
                self.detail = None;
                self.screen = Screen::Listing;
                Ok(())
            }
            Command::Help => {
                self.notice = Some(Notification::new(Tone::Caution, "Команды", HELP));
                Ok(())
            }
            Command::Quit => return Ok(false),
        };

        match outcome {
            Ok(()) | Err(MarketmodError::Cancelled) => Ok(true),
            Err(e @ MarketmodError::Worker(_)) => Err(e),
            Err(e) => {
                self.notice = Some(Notification::failure(&e, "Команда не выполнена"));
                Ok(true)
            }
        }
    }

    /// Sends a listing intent and switches back to the listing screen.
    fn on_listing(&mut self, intent: impl FnOnce(&ListingController) -> Result<()>) -> Result<()> {
        self.detail = None;
        self.screen = Screen::Listing;
        intent(&self.listing)
    }

    /// Opens the neighbour of the current detail view.
    async fn step(&mut self, neighbour: fn(&Detail) -> u64) -> Result<()> {
        let id = self
            .detail
            .as_ref()
            .map(neighbour)
            .ok_or_else(|| MarketmodError::Validation("Сначала откройте объявление: show <id>".to_string()))?;
        self.open_detail(id).await;
        Ok(())
    }

    async fn open_detail(&mut self, id: u64) {
        let mut detail = AdvertisementDetail::new(self.client.clone(), id);
        detail.load().await;
        self.detail = Some(detail);
        self.screen = Screen::Detail(id);
    }

    /// The open detail view for `id`, loading it first if another one (or
    /// none) is open.
    async fn detail_for(&mut self, id: u64) -> &mut Detail {
        if self.detail.as_ref().map(|d| d.state().id) != Some(id) {
            self.open_detail(id).await;
        }
        self.screen = Screen::Detail(id);
        self.detail.get_or_insert_with(|| AdvertisementDetail::new(self.client.clone(), id))
    }

    fn draw(&mut self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if stdout.is_terminal() {
            write!(out, "{CLEAR_SCREEN}")?;
        }

        match (self.screen, self.detail.as_ref()) {
            (Screen::Detail(_), Some(detail)) => render_detail(&mut out, detail, &self.theme, self.cols)?,
            (Screen::Stats, _) => render_stats(&mut out, &self.stats, &self.theme, self.cols)?,
            _ => render_listing(&mut out, &self.listing.snapshot(), &self.theme, self.cols)?,
        }

        if let Some(note) = self.notice.take() {
            render_notification(&mut out, &note, &self.theme)?;
        }
        write!(out, "> ")?;
        out.flush()?;
        Ok(())
    }
}

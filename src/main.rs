use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use linkdeck::config::DeckConfig;
use linkdeck::controller::{AppController, DeckController};
use linkdeck::logging;
use linkdeck::model::Profile;
use linkdeck::view::AppView;
use linkdeck::widget::SimulatedEmbedFactory;

const DEMO_PROFILE: &str = "demos/profile.toml";
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal profile page with a dual-slot embedded player deck
#[derive(Parser, Debug)]
#[command(name = "linkdeck", version)]
struct Args {
    /// Profile file listing the tracks
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    generate_config: bool,

    /// Print the profile summary and player status as JSON and exit
    #[arg(long)]
    dump_status: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        print!("{}", DeckConfig::default().to_toml_string()?);
        return Ok(());
    }

    let config = DeckConfig::load(args.config.as_deref())?;

    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== linkdeck starting ===");

    let profile_path = resolve_profile_path(args.profile);
    let profile = Profile::load(&profile_path)
        .with_context(|| format!("loading profile {}", profile_path.display()))?;
    let tracks = profile.playable_tracks()?;
    tracing::info!(profile = %profile.title(), tracks = tracks.len(), "Profile loaded");

    let mut factory = SimulatedEmbedFactory::new(config.simulated_options());
    for track in &tracks {
        if let Some(secs) = track.duration_secs.filter(|s| s.is_finite() && *s > 0.0) {
            factory = factory.with_duration(&track.url, Duration::from_secs_f64(secs));
        }
    }

    let deck = DeckController::new(Arc::new(factory), config.timings.clone());
    let controller = AppController::new(deck, tracks, profile.title());

    if args.dump_status {
        println!("{}", controller.status_json().await?);
        return Ok(());
    }

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, controller.clone()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    controller.shutdown().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("linkdeck shutting down");
    Ok(())
}

/// `--profile`, then the user config directory, then the bundled demo
fn resolve_profile_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        let user = DeckConfig::default_profile_path();
        if user.exists() {
            user
        } else {
            PathBuf::from(DEMO_PROFILE)
        }
    })
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: AppController,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);

    loop {
        if controller.should_quit().await {
            break;
        }

        let snapshot = controller.snapshot().await;
        terminal.draw(|f| AppView::render(f, &snapshot))?;

        // Timers and widget listeners run while we wait here
        tokio::select! {
            _ = frames.tick() => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    // Coordinator errors are logged and swallowed inside
                    let _ = controller.handle_key_event(key).await;
                }
                Some(Ok(Event::Mouse(mouse))) => {
                    let (width, height) = terminal_size()?;
                    let _ = controller.handle_mouse_event(mouse, Rect::new(0, 0, width, height)).await;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

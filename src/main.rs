//! plotclient - render and browse plots served by a plotting backend.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use plotclient::app::{App, RenderFailure};
use plotclient::comm::{self, CommConnection, FrontendEvents};
use plotclient::config::ClientConfig;
use plotclient::plot::{
    PlotClient, PlotEvent, PlotLocation, PlotMetadata, PlotRenderSettings, PlotSize, PlotUnit,
    RenderFormat, RenderedPlot,
};
use plotclient::registry::PlotRegistry;
use plotclient::ui::{self, format_size};
use plotclient::PlotError;

#[derive(Parser, Debug)]
#[command(name = "plotclient", version)]
#[command(about = "Render and browse plots from a plotting backend", long_about = None)]
struct Args {
    /// Enable logging to specified file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one plot and print a summary
    Render {
        /// Id of the plot (and comm) to render
        #[arg(long)]
        plot_id: String,

        #[command(flatten)]
        render: RenderArgs,

        /// Code that produced the plot, recorded with its metadata
        #[arg(long)]
        code: Option<String>,

        /// Language of --code
        #[arg(long, requires = "code")]
        language: Option<String>,

        /// Write the decoded plot to this file
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Backend command line, after `--`
        #[arg(last = true, required = true)]
        backend: Vec<String>,
    },
    /// Browse plots shown by the backend in the terminal
    View {
        #[command(flatten)]
        render: RenderArgs,

        /// Backend command line, after `--`
        #[arg(last = true, required = true)]
        backend: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Session the plots belong to
    #[arg(long, default_value = "local")]
    session_id: String,

    /// Display location (view or editor)
    #[arg(long, default_value = "view")]
    location: PlotLocation,

    /// Render width
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Render height
    #[arg(long, requires = "width")]
    height: Option<f64>,

    /// Unit of width and height (pixels, inches, cm)
    #[arg(long, default_value = "pixels")]
    unit: PlotUnit,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Output format (png, jpeg, svg, pdf)
    #[arg(long)]
    format: Option<RenderFormat>,
}

impl RenderArgs {
    fn config(&self) -> ClientConfig {
        let mut render = PlotRenderSettings::default().with_pixel_ratio(self.pixel_ratio);
        if let (Some(width), Some(height)) = (self.width, self.height) {
            render = render.with_size(PlotSize {
                width,
                height,
                unit: self.unit,
            });
        }
        if let Some(format) = self.format {
            render = render.with_format(format);
        }
        ClientConfig::new(&self.session_id)
            .with_location(self.location)
            .with_render(render)
    }
}

/// A spawned backend and the connection to it.
struct BackendProcess {
    // Killed on drop.
    _child: Child,
    connection: CommConnection,
    events: FrontendEvents,
}

fn spawn_backend(command: &[String], stderr: Stdio) -> plotclient::Result<BackendProcess> {
    let Some((program, args)) = command.split_first() else {
        let err = io::Error::new(io::ErrorKind::InvalidInput, "empty backend command");
        return Err(PlotError::backend_spawn("", err));
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(stderr)
        .kill_on_drop(true)
        .spawn()
        .map_err(|err| PlotError::backend_spawn(program, err))?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("backend stdin is not piped"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("backend stdout is not piped"))?;
    tracing::info!(program, pid = ?child.id(), "backend started");

    let (connection, events) = comm::run(stdout, stdin);
    Ok(BackendProcess {
        _child: child,
        connection,
        events,
    })
}

fn init_logging(log_path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        init_logging(log_path)?;
        tracing::info!("Starting plotclient");
    }

    let res = match args.command {
        Commands::Render {
            plot_id,
            render,
            code,
            language,
            out,
            timeout_secs,
            backend,
        } => {
            let mut metadata = PlotMetadata::new(&plot_id, &render.session_id);
            if let Some(code) = code {
                metadata = metadata.with_code(code, language);
            }
            run_render(
                metadata,
                render.config(),
                out.as_deref(),
                Duration::from_secs(timeout_secs),
                &backend,
            )
            .await
        }
        Commands::View { render, backend } => run_view(render.config(), &backend).await,
    };

    if args.log.is_some() {
        tracing::info!("plotclient exited");
    }

    res
}

fn summary(plot: &RenderedPlot, id: &str, bytes: usize) -> String {
    let mut line = format!("{id} {} {bytes} bytes", plot.mime_type);
    if let Some(size) = &plot.intrinsic_size {
        line.push(' ');
        line.push_str(&format_size(&size.to_size()));
    }
    line
}

async fn run_render(
    metadata: PlotMetadata,
    config: ClientConfig,
    out: Option<&Path>,
    timeout: Duration,
    command: &[String],
) -> Result<()> {
    let plot_id = metadata.id.clone();
    tracing::info!(
        plot_id = %plot_id,
        code = %metadata.code,
        language = ?metadata.language,
        "rendering plot"
    );
    let backend = spawn_backend(command, Stdio::inherit())?;
    let client = PlotClient::new(
        metadata,
        config.location,
        Arc::new(backend.connection.channel(&plot_id)),
    );

    let pending = client.request_render(&config.render);
    let plot = tokio::time::timeout(timeout, pending)
        .await
        .map_err(|_| anyhow!("Timed out after {}s waiting for plot {plot_id}", timeout.as_secs()))?
        .map_err(PlotError::from)?;
    let bytes = plot.decode().map_err(PlotError::from)?;

    if let Some(out) = out {
        std::fs::write(out, &bytes)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        tracing::info!(path = %out.display(), "plot written");
    }
    println!("{}", summary(&plot, &plot_id, bytes.len()));

    client.close();
    Ok(())
}

async fn run_view(config: ClientConfig, command: &[String]) -> Result<()> {
    let backend = spawn_backend(command, Stdio::null())?;
    let (plot_tx, plot_rx) = mpsc::unbounded_channel();
    let (failure_tx, failure_rx) = mpsc::unbounded_channel();
    let registry =
        PlotRegistry::new(Arc::new(backend.connection.clone()), config).with_event_sink(plot_tx);
    let app = App::new(registry, failure_tx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, app, backend.events, plot_rx, failure_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut frontend: FrontendEvents,
    mut plots: mpsc::UnboundedReceiver<PlotEvent>,
    mut failures: mpsc::UnboundedReceiver<RenderFailure>,
) -> Result<()> {
    let mut keys = EventStream::new();

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            event = keys.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(&mut app, key) {
                        app.registry.clear();
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
            Some((comm_id, event)) = frontend.recv() => app.handle_frontend(&comm_id, event),
            Some(event) = plots.recv() => app.handle_plot_event(event),
            Some(failure) = failures.recv() => app.handle_failure(failure),
        }
    }
}

/// Apply a key press. Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match (key.modifiers, key.code) {
        // Quit
        (KeyModifiers::NONE, KeyCode::Char('q'))
        | (KeyModifiers::CONTROL, KeyCode::Char('c')) => return true,

        // Navigation
        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => app.select_prev(),
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => app.select_next(),

        // Plot actions
        (KeyModifiers::NONE, KeyCode::Char('r')) => app.render_selected(),
        (_, KeyCode::Char('+')) | (KeyModifiers::NONE, KeyCode::Char('=')) => app.zoom_in(),
        (KeyModifiers::NONE, KeyCode::Char('-')) => app.zoom_out(),
        (KeyModifiers::NONE, KeyCode::Char('f')) => app.zoom_to_fit(),
        (KeyModifiers::NONE, KeyCode::Char('x')) => app.close_selected(),

        (_, KeyCode::Char('T')) => app.cycle_theme(),
        _ => {}
    }
    false
}

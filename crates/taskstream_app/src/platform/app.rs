use std::io::{self, BufRead};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use taskstream_core::{update, AppState, ButtonSettings, Effect, Msg};
use taskstream_engine::{
    ApiClient, CancelJobAction, EngineConfig, EngineEvent, EngineHandle, FileBrowser,
    HostCapabilities, LocalDirBrowser, ReqwestApiClient, SiteDirectory,
};

use super::cli::Cli;
use super::config::AppConfig;
use super::effects::{now_ms, EffectRunner};
use super::host::{ConfiguredKernel, PromptBroker, TerminalDrag};
use super::ui::commands::{self, Command, HELP};
use super::ui::render::render;

/// How long the loop waits for input before polling the engine again.
const ENGINE_POLL: Duration = Duration::from_millis(20);
const SITES_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything that can wake the main loop.
pub enum AppInput {
    Msg(Msg),
    Line(String),
    /// A confirm dialog waiting for `yes` or `no`.
    Prompt { title: String, message: String },
    /// Code a drag dropped into the notebook.
    Injected(String),
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    engine_logging::initialize(cli.log_destination(), cli.log_level());

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(site) = cli.site.clone() {
        config.default_site = Some(site);
    }
    let table = config.table_format()?;

    let (input_tx, input_rx) = mpsc::channel();
    let browser = Arc::new(
        LocalDirBrowser::open(&config.browser_dir)
            .with_context(|| format!("opening {}", config.browser_dir.display()))?,
    );
    let api: Arc<dyn ApiClient> = Arc::new(ReqwestApiClient::new(config.client_settings())?);
    let broker = PromptBroker::new(input_tx.clone());
    let drag = Arc::new(TerminalDrag::new(browser.drop_zone(), input_tx.clone()));
    let engine = EngineHandle::new(EngineConfig {
        api: Arc::clone(&api),
        host: HostCapabilities {
            kernel: Arc::new(ConfiguredKernel::new(config.kernel_language.clone())),
            browser,
            dialogs: broker.clone(),
            drag: drag.clone(),
        },
        action: Arc::new(CancelJobAction::new(api)),
        download_style: config.download_style,
    })
    .context("starting engine runtime")?;

    let sites = load_sites(&engine)?;
    engine_info!("Mounting panel with {} site(s)", sites.sites.len());

    let runner = EffectRunner::new(engine, drag, input_tx.clone());
    spawn_stdin_reader(input_tx);

    let state = AppState::with_settings(config.poll_settings(), table, ButtonSettings::default());
    let mut app = App {
        state,
        runner,
        broker,
    };
    println!("Type 'help' for commands.");
    app.dispatch(Msg::Mounted {
        sites: sites.names(),
        default_site: config.default_site.clone(),
        message: sites.message,
        now_ms: now_ms(),
    });
    app.run(input_rx);
    app.dispatch(Msg::Unmounted);
    engine_info!("Panel unmounted");
    Ok(())
}

/// Host entry duty: the panel can only mount once the sites are known.
fn load_sites(engine: &EngineHandle) -> anyhow::Result<SiteDirectory> {
    engine.load_sites();
    loop {
        match engine.recv_timeout(SITES_TIMEOUT) {
            Some(EngineEvent::SitesLoaded(result)) => {
                return result.map_err(|err| anyhow!("could not load sites: {err}"));
            }
            Some(other) => engine_warn!("Unexpected event before mount: {:?}", other),
            None => bail!("timed out waiting for the sites listing"),
        }
    }
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if input_tx.send(AppInput::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("Reading stdin failed: {}", err);
                    break;
                }
            }
        }
        let _ = input_tx.send(AppInput::InputClosed);
    });
}

struct App {
    state: AppState,
    runner: EffectRunner,
    broker: Arc<PromptBroker>,
}

impl App {
    fn run(&mut self, input_rx: mpsc::Receiver<AppInput>) {
        loop {
            match input_rx.recv_timeout(ENGINE_POLL) {
                Ok(input) => {
                    if self.handle_input(input) == Flow::Quit {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            for msg in self.runner.poll_events() {
                self.dispatch(msg);
            }
        }
    }

    fn handle_input(&mut self, input: AppInput) -> Flow {
        match input {
            AppInput::Msg(msg) => self.dispatch(msg),
            AppInput::Line(line) => return self.handle_command(commands::parse(&line)),
            AppInput::Prompt { title, message } => {
                println!("?? {title}: {message} [yes/no]");
            }
            AppInput::Injected(code) => {
                println!(">>> injected into kernel:\n{code}");
            }
            AppInput::InputClosed => return Flow::Quit,
        }
        Flow::Continue
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        if self.broker.has_pending() && !matches!(command, Command::Answer(_)) {
            println!("A question is waiting: answer yes or no.");
        }
        match command {
            Command::Msg(msg) => self.dispatch(msg),
            Command::Drag { spot, msg } => {
                let effects = self.step(msg);
                if effects.iter().any(|e| matches!(e, Effect::StartDrag { .. })) {
                    self.runner.release_next_drag_at(spot);
                }
                self.runner.run(effects);
            }
            Command::Answer(accepted) => {
                if !self.broker.answer(accepted) {
                    println!("Nothing to answer.");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
            Command::Empty => println!("{}", render(&self.state.view())),
            Command::Invalid(message) => println!("{message} (type 'help')"),
        }
        Flow::Continue
    }

    fn dispatch(&mut self, msg: Msg) {
        let effects = self.step(msg);
        self.runner.run(effects);
    }

    /// Applies one message and redraws when the state changed.
    fn step(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            println!("\n{}", render(&state.view()));
        }
        self.state = state;
        effects
    }
}

use std::io;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tracing::{info, warn};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

use kalosdex::action::Action;
use kalosdex::api::{PokeApiClient, PokemonLookup};
use kalosdex::config::{Args, RuntimeConfig};
use kalosdex::detail::{DetailFetch, DetailRequest};
use kalosdex::effect::Effect;
use kalosdex::guidance::{CachedGuidance, GuidanceClient, ProxyClient};
use kalosdex::navigator::GuidanceRequest;
use kalosdex::persist::{FileStore, KeyValueStore, Persisted, Stores};
use kalosdex::reducer::reducer;
use kalosdex::state::AppState;
use kalosdex::{logging, ui};

/// Collaborators shared by every effect.
#[derive(Clone)]
struct Services {
    lookup: Arc<dyn PokemonLookup>,
    guidance: Arc<dyn GuidanceClient>,
    storage: Arc<dyn KeyValueStore>,
}

impl Services {
    fn new(config: &RuntimeConfig) -> Self {
        let storage = FileStore::new(&config.data_dir);
        Self {
            lookup: Arc::new(PokeApiClient::new(
                config.api_base.clone(),
                config.cache_dir.clone(),
            )),
            guidance: Arc::new(CachedGuidance::new(
                ProxyClient::new(config.proxy_url.clone(), config.model.clone()),
                storage.clone(),
            )),
            storage: Arc::new(storage),
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = RuntimeConfig::from_args(&args);
    logging::init(&config.log_file);
    info!(data_dir = %config.data_dir.display(), "starting kalosdex");

    let debug = DebugSession::new(args.debug);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let services = Services::new(&config);
    let state = debug
        .load_state_or_else_async(|| {
            let storage = services.storage.clone();
            async move { Ok::<AppState, io::Error>(AppState::new(Stores::load(storage.as_ref()))) }
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, services).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    info!("kalosdex stopped");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    services: Services,
) -> io::Result<DebugRunOutput<AppState>> {
    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            |frame, area, state, render_ctx: RenderContext| {
                ui::render(frame, area, state, render_ctx);
            },
            |event, state| -> EventOutcome<Action> { ui::handle_event(event, state) },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &services),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    match effect {
        Effect::LoadDetail(request) => load_detail(request, ctx, services.lookup.clone()),
        Effect::LoadSpeciesIndex => {
            let lookup = services.lookup.clone();
            ctx.tasks().spawn(TaskKey::new("species_index"), async move {
                match lookup.fetch_species_names().await {
                    Ok(names) => Action::SpeciesIndexDidLoad(names),
                    Err(err) => {
                        warn!(error = %err, "species index unavailable");
                        Action::SpeciesIndexDidError(err.to_string())
                    }
                }
            });
        }
        Effect::AskNavigator(request) => ask_navigator(request, ctx, services.guidance.clone()),
        // Snapshots are small; writing in place keeps saves of one key in order.
        Effect::SaveTeam(team) => team.save(services.storage.as_ref()),
        Effect::SaveCollections(collections) => collections.save(services.storage.as_ref()),
        Effect::SaveJournal(journal) => journal.save(services.storage.as_ref()),
    }
}

/// One detail fetch at a time; a newer request replaces the task of an older one.
fn load_detail(request: DetailRequest, ctx: &mut EffectContext<Action>, lookup: Arc<dyn PokemonLookup>) {
    let DetailRequest { generation, kind } = request;
    ctx.tasks().spawn(TaskKey::new("detail"), async move {
        match kind {
            DetailFetch::Pokemon(target) => match lookup.fetch_pokemon_details(&target).await {
                Ok(detail) => Action::DetailPokemonDidLoad { generation, detail },
                Err(err) => {
                    warn!(pokemon = %target, error = %err, "pokemon lookup failed");
                    Action::DetailPokemonDidError {
                        generation,
                        error: err.to_string(),
                    }
                }
            },
            DetailFetch::Ability(name) => match lookup.fetch_ability_details(&name).await {
                Ok(detail) => Action::DetailAbilityDidLoad { generation, detail },
                Err(err) => {
                    warn!(ability = %name, error = %err, "ability lookup failed");
                    Action::DetailAbilityDidError {
                        generation,
                        error: err.to_string(),
                    }
                }
            },
            DetailFetch::Move(name) => match lookup.fetch_move_details(&name).await {
                Ok(detail) => Action::DetailMoveDidLoad { generation, detail },
                Err(err) => {
                    warn!(move_name = %name, error = %err, "move lookup failed");
                    Action::DetailMoveDidError {
                        generation,
                        error: err.to_string(),
                    }
                }
            },
        }
    });
}

fn ask_navigator(
    request: GuidanceRequest,
    ctx: &mut EffectContext<Action>,
    guidance: Arc<dyn GuidanceClient>,
) {
    let GuidanceRequest { generation, prompt } = request;
    ctx.tasks().spawn(TaskKey::new("navigator"), async move {
        match guidance.ask(&prompt).await {
            Ok(text) => Action::NavigatorDidAnswer { generation, text },
            Err(err) => {
                warn!(error = %err, "navigator request failed");
                Action::NavigatorDidError {
                    generation,
                    error: err.to_string(),
                }
            }
        }
    });
}

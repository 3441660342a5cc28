use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{EventKind, EventOutcome, RenderContext};

use crate::action::Action;
use crate::api::api_slug;
use crate::detail::DetailView;
use crate::journal::{segments, Segment};
use crate::megas::{self, MEGA_EVOLUTIONS};
use crate::state::{ActiveView, AppState, CollectionRow, DetailRow, JournalField, PokedexMode};
use crate::team::TeamMember;

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const ACCENT_RED: Color = Color::Rgb(214, 96, 96);

const SIDEBAR_WIDTH: u16 = 18;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, _render_ctx: RenderContext) {
    draw(frame, area, state);
}

/// Draw the whole screen for `state`.
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    render_sidebar(frame, columns[0], state);

    if state.detail.is_open() {
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[1]);
        render_view(frame, main[0], state);
        render_detail(frame, main[1], state);
    } else {
        render_view(frame, columns[1], state);
    }

    render_footer(frame, rows[1], state);
}

fn panel_block(title: &str, is_focused: bool) -> Block<'_> {
    let border = if is_focused { ACCENT_TEAL } else { TEXT_DIM };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
}

fn highlight_style() -> Style {
    Style::default()
        .bg(BG_HIGHLIGHT)
        .fg(TEXT_MAIN)
        .add_modifier(Modifier::BOLD)
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let items: Vec<ListItem> = ActiveView::ALL
        .iter()
        .enumerate()
        .map(|(index, view)| ListItem::new(format!("{} {}", index + 1, view.label())))
        .collect();
    let selected = ActiveView::ALL
        .iter()
        .position(|view| *view == state.view);
    let mut list_state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .block(panel_block("Kalosdex", false))
        .highlight_style(highlight_style());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_view(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = !state.detail.is_open();
    match state.view {
        ActiveView::Team => render_team(frame, area, state, focused),
        ActiveView::Pokedex => render_pokedex(frame, area, state, focused),
        ActiveView::Journal => render_journal(frame, area, state, focused),
        ActiveView::Navigator => render_navigator(frame, area, state),
        ActiveView::Zones => render_zones(frame, area, state, focused),
    }
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem<'_>>,
    cursor: usize,
    focused: bool,
) {
    let selected = (!items.is_empty()).then(|| cursor.min(items.len() - 1));
    let mut list_state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .block(panel_block(title, focused))
        .highlight_style(highlight_style())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn member_line(member: &TeamMember) -> Line<'static> {
    let mut spans = vec![Span::styled(
        member.display_name().to_string(),
        Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
    )];
    if member.nickname.is_some() {
        spans.push(Span::styled(
            format!(" ({})", member.species),
            Style::default().fg(TEXT_DIM),
        ));
    }
    spans.push(Span::styled(
        format!(" Lv.{}", member.level),
        Style::default().fg(ACCENT_TEAL),
    ));
    if member.is_shiny {
        spans.push(Span::styled(" ✦", Style::default().fg(ACCENT_GOLD)));
    }
    spans.push(Span::styled(
        format!(" [{}]", member.types.join("/")),
        Style::default().fg(TEXT_DIM),
    ));
    let moves: Vec<&str> = member
        .moves
        .slots()
        .map(|slot| slot.unwrap_or("-"))
        .collect();
    spans.push(Span::styled(
        format!("  {}", moves.join(" · ")),
        Style::default().fg(TEXT_DIM),
    ));
    Line::from(spans)
}

fn render_team(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let title = format!("Team {}/{}", state.team.len(), crate::team::TEAM_CAPACITY);
    if state.team.is_empty() {
        let empty = Paragraph::new("No Pokémon yet. Open one and press a to add it.")
            .style(Style::default().fg(TEXT_DIM))
            .block(panel_block(&title, focused));
        frame.render_widget(empty, area);
        return;
    }
    let items = state
        .team
        .members()
        .iter()
        .map(|member| ListItem::new(member_line(member)))
        .collect();
    render_list(frame, area, &title, items, state.list_cursor, focused);
}

fn render_pokedex(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let suggestions = if state.editing {
        state.name_suggestions()
    } else {
        Vec::new()
    };
    let suggestion_height = if suggestions.is_empty() {
        0
    } else {
        suggestions.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(suggestion_height),
            Constraint::Min(3),
        ])
        .split(area);

    let query_style = if state.editing {
        Style::default().fg(ACCENT_GOLD)
    } else {
        Style::default().fg(TEXT_MAIN)
    };
    let query = Paragraph::new(input_line(&state.pokedex_query, state.editing))
        .style(query_style)
        .block(panel_block("Look up (name or number)", state.editing));
    frame.render_widget(query, chunks[0]);

    if !suggestions.is_empty() {
        let items: Vec<ListItem> = suggestions.iter().map(|name| ListItem::new(*name)).collect();
        let list = List::new(items).block(panel_block("Tab to complete", false));
        frame.render_widget(list, chunks[1]);
    }

    match state.pokedex_mode {
        PokedexMode::Collections => render_collections(frame, chunks[2], state, focused),
        PokedexMode::Megas => render_megas(frame, chunks[2], state, focused),
    }
}

fn render_collections(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let items = state
        .collection_rows()
        .into_iter()
        .map(|row| {
            let text = match row {
                CollectionRow::Liked(id) => {
                    let caught = if state.collections.is_caught(id) { " ●" } else { "" };
                    format!("♥ #{id}{caught}")
                }
                CollectionRow::Hunt {
                    area,
                    pokemon_id,
                    pokemon_name,
                } => format!("◎ {pokemon_name} (#{pokemon_id}) in {area}"),
            };
            ListItem::new(text)
        })
        .collect();
    let title = format!("Collections · {} caught", state.collections.caught_count());
    render_list(frame, area, &title, items, state.list_cursor, focused);
}

fn render_megas(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let items = MEGA_EVOLUTIONS
        .iter()
        .map(|mega| {
            let caught = if state.collections.is_caught(mega.id) { "●" } else { "○" };
            ListItem::new(format!("{caught} #{:<4} {}", mega.id, mega.form_name))
        })
        .collect();
    let title = format!(
        "Mega Evolutions {}/{}",
        state.list_cursor + 1,
        MEGA_EVOLUTIONS.len()
    );
    render_list(frame, area, &title, items, state.list_cursor, focused);
}

fn render_journal(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let items = state
        .journal
        .entries()
        .iter()
        .map(|entry| {
            let marker = if state.journal_selected.as_deref() == Some(entry.id.as_str()) {
                "• "
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{}", entry.title))
        })
        .collect();
    render_list(frame, chunks[0], "Notes", items, state.list_cursor, focused);

    let Some(entry) = state.selected_journal_entry() else {
        let hint = Paragraph::new("Press n for a new note, Enter to open one.")
            .style(Style::default().fg(TEXT_DIM))
            .block(panel_block("Note", false));
        frame.render_widget(hint, chunks[1]);
        return;
    };

    let editing_title = state.editing && state.journal_field == JournalField::Title;
    let editing_content = state.editing && state.journal_field == JournalField::Content;
    let mut lines = vec![
        Line::from(Span::styled(
            input_line(&entry.title, editing_title),
            Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    if editing_content {
        lines.extend(
            input_line(&entry.content, true)
                .lines()
                .map(|line| Line::from(line.to_string())),
        );
    } else {
        lines.extend(entry.content.lines().map(linked_line));
    }
    let note = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(panel_block("Note", state.editing));
    frame.render_widget(note, chunks[1]);
}

/// Pokémon links in notes are highlighted in place of their braces.
fn linked_line(line: &str) -> Line<'static> {
    let spans: Vec<Span> = segments(line)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => Span::raw(text.to_string()),
            Segment::PokemonLink(name) => Span::styled(
                name.to_string(),
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        })
        .collect();
    Line::from(spans)
}

fn render_navigator(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let input = Paragraph::new(input_line(&state.navigator_input, state.editing))
        .block(panel_block("Ask the Navigator", state.editing));
    frame.render_widget(input, chunks[0]);

    let navigator = &state.navigator;
    let body: Text = if navigator.loading {
        Text::styled("Thinking…", Style::default().fg(TEXT_DIM))
    } else if let Some(error) = &navigator.error {
        Text::styled(error.clone(), Style::default().fg(ACCENT_RED))
    } else if let Some(response) = &navigator.response {
        Text::from(response.lines().map(linked_line).collect::<Vec<_>>())
    } else {
        Text::styled(
            "Ask where to find a Pokémon, or which moves suit your team.",
            Style::default().fg(TEXT_DIM),
        )
    };
    let title = if navigator.prompt.is_empty() {
        "Answer".to_string()
    } else {
        format!("Answer · {}", navigator.prompt)
    };
    let answer = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(panel_block(&title, false));
    frame.render_widget(answer, chunks[1]);
}

fn render_zones(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let items = state
        .zone_rows()
        .into_iter()
        .map(|(zone, id, name)| {
            let caught = if state.collections.is_caught(id) { "●" } else { "○" };
            ListItem::new(format!("{caught} {zone:<12} #{id:<4} {name}"))
        })
        .collect();
    render_list(frame, area, "Wild Zones", items, state.list_cursor, focused);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let detail = &state.detail;
    let title = detail.title();
    let block = panel_block(&title, true);

    if detail.loading && detail_data_missing(state) {
        let loading = Paragraph::new("Loading…")
            .style(Style::default().fg(TEXT_DIM))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }
    if let Some(error) = &detail.error {
        let error = Paragraph::new(error.clone())
            .style(Style::default().fg(ACCENT_RED))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(error, area);
        return;
    }

    match &detail.view {
        DetailView::Closed => {}
        DetailView::Pokemon { .. } => render_pokemon_detail(frame, area, state, block),
        DetailView::Ability { .. } => {
            let Some(ability) = &detail.ability else {
                frame.render_widget(block, area);
                return;
            };
            let holders: Vec<String> = ability
                .pokemon
                .iter()
                .map(|link| {
                    if link.is_hidden {
                        format!("{} (hidden)", link.name)
                    } else {
                        link.name.clone()
                    }
                })
                .collect();
            let text = Text::from(vec![
                Line::from(Span::styled(
                    ability.short_effect.clone(),
                    Style::default().fg(ACCENT_GOLD),
                )),
                Line::default(),
                Line::from(ability.effect.clone()),
                Line::default(),
                Line::from(Span::styled(
                    ability.flavor_text.clone(),
                    Style::default().fg(TEXT_DIM),
                )),
                Line::default(),
                Line::from(format!("Found on: {}", holders.join(", "))),
            ]);
            let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
            frame.render_widget(paragraph, area);
        }
        DetailView::Move { .. } => {
            let Some(mv) = &detail.move_detail else {
                frame.render_widget(block, area);
                return;
            };
            let stat = |value: Option<u32>| value.map_or_else(|| "—".to_string(), |v| v.to_string());
            let text = Text::from(vec![
                Line::from(vec![
                    Span::styled(mv.move_type.clone(), Style::default().fg(ACCENT_TEAL)),
                    Span::raw(format!(" · {}", mv.damage_class)),
                ]),
                Line::from(format!(
                    "Power {}  Accuracy {}  PP {}",
                    stat(mv.power),
                    stat(mv.accuracy),
                    stat(mv.pp)
                )),
                Line::default(),
                Line::from(mv.effect.clone()),
                Line::default(),
                Line::from(Span::styled(
                    mv.flavor_text.clone(),
                    Style::default().fg(TEXT_DIM),
                )),
                Line::default(),
                Line::from(Span::styled(
                    "s: teach to this Pokémon  b: back",
                    Style::default().fg(TEXT_DIM),
                )),
            ]);
            let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
            frame.render_widget(paragraph, area);
        }
    }
}

fn detail_data_missing(state: &AppState) -> bool {
    let detail = &state.detail;
    match detail.view {
        DetailView::Closed => false,
        DetailView::Pokemon { .. } => detail.current_pokemon().is_none(),
        DetailView::Ability { .. } => detail.ability.is_none(),
        DetailView::Move { .. } => detail.move_detail.is_none(),
    }
}

fn render_pokemon_detail(frame: &mut Frame, area: Rect, state: &AppState, block: Block<'_>) {
    let Some(pokemon) = state.detail.current_pokemon() else {
        frame.render_widget(block, area);
        return;
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    let mut flags = Vec::new();
    if state.collections.is_caught(pokemon.id) {
        flags.push("caught");
    }
    if state.collections.is_liked(pokemon.id) {
        flags.push("liked");
    }
    if state.collections.is_hunted(pokemon.id) {
        flags.push("hunting");
    }
    let mut lines = vec![
        Line::from(vec![
            Span::styled(pokemon.types.join(" / "), Style::default().fg(ACCENT_TEAL)),
            Span::styled(format!("  {}", pokemon.genus), Style::default().fg(TEXT_DIM)),
        ]),
        Line::from(Span::styled(flags.join(" · "), Style::default().fg(ACCENT_GOLD))),
        Line::default(),
    ];
    for stat in &pokemon.base_stats {
        lines.push(Line::from(format!("{:<16}{:>4}", stat.name, stat.value)));
    }
    lines.push(Line::from(format!(
        "{:<16}{:>4}  {}",
        "Total",
        pokemon.base_stat_total(),
        "★".repeat(pokemon.strength_rating() as usize)
    )));
    let forms: Vec<&str> = megas::forms_for(pokemon.id).map(|mega| mega.form_name).collect();
    if !forms.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Mega: {}", forms.join(", ")),
            Style::default().fg(ACCENT_TEAL),
        )));
    }
    if let Some(pending) = &state.detail.pending {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Staged move: {}", pending.move_name),
            Style::default().fg(ACCENT_GOLD),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        pokemon.flavor_text.clone(),
        Style::default().fg(TEXT_DIM),
    )));
    let summary = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    frame.render_widget(summary, chunks[0]);

    let items: Vec<ListItem> = state
        .detail_rows()
        .into_iter()
        .map(|row| match row {
            DetailRow::Ability { display_name, .. } => {
                ListItem::new(Line::from(vec![
                    Span::styled("Ability ", Style::default().fg(TEXT_DIM)),
                    Span::raw(display_name),
                ]))
            }
            DetailRow::Evolution(target) => ListItem::new(Line::from(vec![
                Span::styled("Evolves ", Style::default().fg(TEXT_DIM)),
                Span::raw(target.to_string()),
            ])),
            DetailRow::Move { raw_name, display_name } => {
                let learned = pokemon
                    .moves
                    .iter()
                    .find(|mv| mv.raw_name == raw_name)
                    .map(|mv| {
                        if mv.level_learned_at > 0 {
                            format!("Lv.{}", mv.level_learned_at)
                        } else {
                            mv.learn_method.clone()
                        }
                    })
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled("Move    ", Style::default().fg(TEXT_DIM)),
                    Span::raw(display_name),
                    Span::styled(format!("  {learned}"), Style::default().fg(TEXT_DIM)),
                ]))
            }
        })
        .collect();
    let selected = (!items.is_empty()).then(|| state.detail_cursor.min(items.len() - 1));
    let mut list_state = ListState::default().with_selected(selected);
    let list = List::new(items)
        .highlight_style(highlight_style())
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints = status_hints(state);
    let mut spans = Vec::new();
    if let Some(message) = &state.message {
        spans.push(Span::styled(
            format!("{message}  "),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    spans.push(Span::styled(hints, Style::default().fg(TEXT_DIM)));
    let footer = Paragraph::new(Line::from(spans)).block(panel_block("Status", false));
    frame.render_widget(footer, area);
}

fn status_hints(state: &AppState) -> &'static str {
    if state.editing {
        return match state.view {
            ActiveView::Journal => "type to edit · Tab title/content · Esc done",
            ActiveView::Pokedex => "type · Tab complete · Enter look up · Esc cancel",
            _ => "type · Enter submit · Esc cancel",
        };
    }
    let browsing_megas = state.view == ActiveView::Pokedex && state.pokedex_mode == PokedexMode::Megas;
    if state.detail.is_open() {
        return match state.detail.view {
            DetailView::Pokemon { .. } if browsing_megas => {
                "[ ] prev/next mega · s stage move · a add to team · m leave megas · Esc close"
            }
            DetailView::Pokemon { .. } => {
                "Enter open · s stage move · a add to team · c caught · l like · h hunt · Esc close"
            }
            _ => "s stage move · b back · Esc close",
        };
    }
    match state.view {
        ActiveView::Team => "1-5 views · Enter open · +/- level · S shiny · x remove · q quit",
        ActiveView::Pokedex if browsing_megas => "[ ] prev/next · Enter open · m collections · q quit",
        ActiveView::Pokedex => "i search · m megas · Enter open · x drop hunt · q quit",
        ActiveView::Journal => "n new · Enter open · i edit · d delete · q quit",
        ActiveView::Navigator => "i ask · r reset · q quit",
        ActiveView::Zones => "Enter open · c caught · l like · h hunt · q quit",
    }
}

fn input_line(value: &str, editing: bool) -> String {
    if editing {
        format!("{value}▏")
    } else {
        value.to_string()
    }
}

pub fn handle_event(event: &EventKind, state: &AppState) -> EventOutcome<Action> {
    match event {
        EventKind::Resize(width, height) => {
            EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) => handle_key(*key, state),
        EventKind::Scroll { delta, .. } if *delta != 0 => {
            EventOutcome::action(Action::CursorMove((*delta).signum() as i16))
        }
        _ => EventOutcome::ignored(),
    }
}

fn handle_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    if key.kind == KeyEventKind::Release {
        return EventOutcome::ignored();
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return EventOutcome::action(Action::Quit);
    }
    if state.editing {
        return handle_editing_key(key, state);
    }

    match key.code {
        KeyCode::Esc => EventOutcome::action(Action::Escape),
        KeyCode::Char('q') => EventOutcome::action(Action::Quit),
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            EventOutcome::action(Action::ViewSet(ActiveView::ALL[index]))
        }
        KeyCode::Up | KeyCode::Char('k') => EventOutcome::action(Action::CursorMove(-1)),
        KeyCode::Down | KeyCode::Char('j') => EventOutcome::action(Action::CursorMove(1)),
        KeyCode::PageUp => EventOutcome::action(Action::CursorMove(-10)),
        KeyCode::PageDown => EventOutcome::action(Action::CursorMove(10)),
        KeyCode::Enter => EventOutcome::action(Action::CursorActivate),
        KeyCode::Char('i') => EventOutcome::action(Action::EditStart),
        KeyCode::Char('b') if state.detail.is_open() => EventOutcome::action(Action::DetailBack),
        KeyCode::Char('a') if state.detail.is_open() => {
            EventOutcome::action(Action::DetailAddToTeam)
        }
        KeyCode::Char('s') => stage_move(state),
        KeyCode::Char('c') => focused_pokemon(state)
            .map(|(id, _)| EventOutcome::action(Action::CollectionsCaughtToggle(id)))
            .unwrap_or_else(EventOutcome::ignored),
        KeyCode::Char('l') => focused_pokemon(state)
            .map(|(id, _)| EventOutcome::action(Action::CollectionsLikedToggle(id)))
            .unwrap_or_else(EventOutcome::ignored),
        KeyCode::Char('h') => match focused_pokemon(state) {
            Some((pokemon_id, pokemon_name)) => EventOutcome::action(Action::CollectionsHuntAdd {
                pokemon_id,
                area: state.hunt_area_for(pokemon_id),
                pokemon_name,
            }),
            None => EventOutcome::ignored(),
        },
        KeyCode::Char('n') => EventOutcome::action(Action::JournalAdd {
            now_ms: chrono::Utc::now().timestamp_millis(),
        }),
        KeyCode::Char('m') if state.view == ActiveView::Pokedex => {
            EventOutcome::action(Action::PokedexMegaToggle)
        }
        KeyCode::Char(step @ ('[' | ']')) if state.pokedex_mode == PokedexMode::Megas => {
            let delta = if step == ']' { 1 } else { -1 };
            EventOutcome::action(Action::PokedexMegaStep(delta))
        }
        _ if state.detail.is_open() => EventOutcome::ignored(),
        _ => handle_view_key(key, state),
    }
}

fn handle_view_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    match (state.view, key.code) {
        (ActiveView::Team, KeyCode::Char('x')) => state
            .selected_member()
            .map(|member| EventOutcome::action(Action::TeamRemove(member.id.clone())))
            .unwrap_or_else(EventOutcome::ignored),
        (ActiveView::Team, KeyCode::Char(sign @ ('+' | '-'))) => {
            let Some(member) = state.selected_member() else {
                return EventOutcome::ignored();
            };
            let level = if sign == '+' {
                member.level.saturating_add(1)
            } else {
                member.level.saturating_sub(1)
            };
            EventOutcome::action(Action::TeamLevelSet {
                id: member.id.clone(),
                level,
            })
        }
        (ActiveView::Team, KeyCode::Char('S')) => state
            .selected_member()
            .map(|member| EventOutcome::action(Action::TeamShinyToggle(member.id.clone())))
            .unwrap_or_else(EventOutcome::ignored),
        (ActiveView::Pokedex, KeyCode::Char('x')) if state.pokedex_mode == PokedexMode::Collections => {
            match state.collection_rows().into_iter().nth(state.list_cursor) {
                Some(CollectionRow::Hunt {
                    area, pokemon_id, ..
                }) => EventOutcome::action(Action::CollectionsHuntRemove { pokemon_id, area }),
                _ => EventOutcome::ignored(),
            }
        }
        (ActiveView::Journal, KeyCode::Char('d')) => state
            .journal
            .entries()
            .get(state.list_cursor)
            .map(|entry| EventOutcome::action(Action::JournalDelete(entry.id.clone())))
            .unwrap_or_else(EventOutcome::ignored),
        (ActiveView::Navigator, KeyCode::Char('r')) => EventOutcome::action(Action::NavigatorReset),
        _ => EventOutcome::ignored(),
    }
}

fn handle_editing_key(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    if key.code == KeyCode::Esc {
        return EventOutcome::action(Action::Escape);
    }
    match state.view {
        ActiveView::Navigator => match key.code {
            KeyCode::Enter => EventOutcome::action(Action::NavigatorSubmit),
            code => edited(&state.navigator_input, code)
                .map(|text| EventOutcome::action(Action::NavigatorInputChanged(text)))
                .unwrap_or_else(EventOutcome::ignored),
        },
        ActiveView::Pokedex => match key.code {
            KeyCode::Enter => EventOutcome::action(Action::PokedexQuerySubmit),
            KeyCode::Tab => EventOutcome::action(Action::PokedexSuggestionAccept),
            code => edited(&state.pokedex_query, code)
                .map(|text| EventOutcome::action(Action::PokedexQueryChanged(text)))
                .unwrap_or_else(EventOutcome::ignored),
        },
        ActiveView::Journal => handle_journal_edit(key, state),
        ActiveView::Team | ActiveView::Zones => EventOutcome::ignored(),
    }
}

fn handle_journal_edit(key: KeyEvent, state: &AppState) -> EventOutcome<Action> {
    let Some(entry) = state.selected_journal_entry() else {
        return EventOutcome::ignored();
    };
    if key.code == KeyCode::Tab {
        let next = match state.journal_field {
            JournalField::Title => JournalField::Content,
            JournalField::Content => JournalField::Title,
        };
        return EventOutcome::action(Action::JournalFieldSet(next));
    }

    let (mut title, mut content) = (entry.title.clone(), entry.content.clone());
    let changed = match (state.journal_field, key.code) {
        (JournalField::Title, KeyCode::Enter) => {
            return EventOutcome::action(Action::JournalFieldSet(JournalField::Content));
        }
        (JournalField::Content, KeyCode::Enter) => {
            content.push('\n');
            true
        }
        (JournalField::Title, code) => edited(&title, code).map(|text| title = text).is_some(),
        (JournalField::Content, code) => {
            edited(&content, code).map(|text| content = text).is_some()
        }
    };
    if !changed {
        return EventOutcome::ignored();
    }
    EventOutcome::action(Action::JournalUpdate {
        id: entry.id.clone(),
        title,
        content,
    })
}

/// The text after applying a typing key, or `None` for keys that do not edit.
fn edited(current: &str, code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(ch) => {
            let mut text = current.to_string();
            text.push(ch);
            Some(text)
        }
        KeyCode::Backspace => {
            let mut text = current.to_string();
            text.pop()?;
            Some(text)
        }
        _ => None,
    }
}

/// The Pokémon collection keys act on: the one in the detail panel, else the
/// highlighted Pokédex or zone row.
fn focused_pokemon(state: &AppState) -> Option<(u32, String)> {
    if state.detail.is_open() {
        if !matches!(state.detail.view, DetailView::Pokemon { .. }) {
            return None;
        }
        return state
            .detail
            .current_pokemon()
            .map(|pokemon| (pokemon.id, pokemon.display_name()));
    }
    match state.view {
        ActiveView::Zones => state
            .zone_rows()
            .get(state.list_cursor)
            .map(|(_, id, name)| (*id, name.to_string())),
        ActiveView::Pokedex if state.pokedex_mode == PokedexMode::Megas => state
            .selected_mega()
            .map(|mega| (mega.id, mega.name.to_string())),
        ActiveView::Pokedex => match state.collection_rows().into_iter().nth(state.list_cursor)? {
            CollectionRow::Liked(id) => Some((id, format!("#{id}"))),
            CollectionRow::Hunt {
                pokemon_id,
                pokemon_name,
                ..
            } => Some((pokemon_id, pokemon_name)),
        },
        _ => None,
    }
}

fn stage_move(state: &AppState) -> EventOutcome<Action> {
    let Some(pokemon) = state.detail.current_pokemon() else {
        return EventOutcome::ignored();
    };
    let move_name = match &state.detail.view {
        DetailView::Pokemon { .. } => match state.selected_detail_row() {
            Some(DetailRow::Move { display_name, .. }) => display_name,
            _ => return EventOutcome::ignored(),
        },
        // The panel keeps the previous move on screen while the next one loads.
        DetailView::Move { name, .. } => match &state.detail.move_detail {
            Some(mv) if !state.detail.loading && mv.raw_name == api_slug(name) => mv.name.clone(),
            _ => return EventOutcome::ignored(),
        },
        _ => return EventOutcome::ignored(),
    };
    EventOutcome::action(Action::DetailStageMove {
        pokemon_id: pokemon.id,
        move_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PokemonDetail, PokemonMove};
    use crate::detail::PokemonRef;

    fn press(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn only_action(outcome: EventOutcome<Action>) -> Option<Action> {
        let mut actions = outcome.actions.into_iter();
        let first = actions.next();
        assert!(actions.next().is_none());
        first
    }

    fn with_loaded_pokemon() -> AppState {
        let mut state = AppState::default();
        let request = state.detail.open_pokemon(PokemonRef::Id(280));
        state.detail.pokemon_loaded(
            request.generation,
            Ok(PokemonDetail {
                id: 280,
                name: "ralts".into(),
                sprite_url: None,
                shiny_sprite_url: None,
                genus: "Feeling Pokémon".into(),
                types: vec!["Psychic".into(), "Fairy".into()],
                abilities: vec![],
                base_stats: vec![],
                evolution: vec![],
                flavor_text: String::new(),
                moves: vec![PokemonMove {
                    raw_name: "confusion".into(),
                    name: "Confusion".into(),
                    level_learned_at: 6,
                    learn_method: "level-up".into(),
                }],
            }),
        );
        state
    }

    #[test]
    fn digits_switch_views() {
        let state = AppState::default();
        assert_eq!(
            only_action(handle_event(&press(KeyCode::Char('4')), &state)),
            Some(Action::ViewSet(ActiveView::Navigator))
        );
    }

    #[test]
    fn typing_extends_navigator_prompt() {
        let mut state = AppState::default();
        state.view = ActiveView::Navigator;
        state.editing = true;
        state.navigator_input = "Where is Ral".into();
        assert_eq!(
            only_action(handle_event(&press(KeyCode::Char('t')), &state)),
            Some(Action::NavigatorInputChanged("Where is Ralt".into()))
        );
        assert_eq!(
            only_action(handle_event(&press(KeyCode::Enter), &state)),
            Some(Action::NavigatorSubmit)
        );
        // Quit keys are text while editing.
        assert_eq!(
            only_action(handle_event(&press(KeyCode::Char('q')), &state)),
            Some(Action::NavigatorInputChanged("Where is Ralq".into()))
        );
    }

    #[test]
    fn stage_key_uses_highlighted_move() {
        let mut state = with_loaded_pokemon();
        state.detail_cursor = 0;
        assert_eq!(
            only_action(handle_event(&press(KeyCode::Char('s')), &state)),
            Some(Action::DetailStageMove {
                pokemon_id: 280,
                move_name: "Confusion".into(),
            })
        );
    }

    #[test]
    fn hunt_key_records_first_zone() {
        let state = with_loaded_pokemon();
        assert_eq!(
            only_action(handle_event(&press(KeyCode::Char('h')), &state)),
            Some(Action::CollectionsHuntAdd {
                pokemon_id: 280,
                pokemon_name: "Ralts".into(),
                area: state.hunt_area_for(280),
            })
        );
    }

    #[test]
    fn backspace_on_empty_input_is_ignored() {
        assert_eq!(edited("", KeyCode::Backspace), None);
        assert_eq!(edited("ab", KeyCode::Backspace), Some("a".into()));
        assert_eq!(edited("ab", KeyCode::Left), None);
    }
}

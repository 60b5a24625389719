use crate::app::{App, InputMode, Page, PlaylistPane};
use crate::audio::MediaEngine;
use crate::store;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph};
use std::path::PathBuf;
use std::time::Duration;

const APP_TITLE: &str = "Mixtape v0.1.0  ";

#[derive(Clone, Copy)]
struct Palette {
    bg: Color,
    panel_bg: Color,
    border: Color,
    focus_border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    selected_bg: Color,
}

fn palette() -> Palette {
    Palette {
        bg: Color::Rgb(12, 12, 14),
        panel_bg: Color::Rgb(22, 22, 26),
        border: Color::Rgb(58, 58, 66),
        focus_border: Color::Rgb(30, 185, 84),
        text: Color::Rgb(235, 235, 235),
        muted: Color::Rgb(150, 150, 160),
        accent: Color::Rgb(30, 185, 84),
        selected_bg: Color::Rgb(45, 45, 52),
    }
}

fn regions(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

// The seek bar's on-screen rect, used by the shell to translate mouse
// columns into a queue-position ratio.
pub fn progress_rect(area: Rect) -> Rect {
    let player = regions(area)[2];
    Rect {
        x: player.x.saturating_add(1),
        y: player.y.saturating_add(2),
        width: player.width.saturating_sub(2),
        height: 1,
    }
}

pub fn draw(frame: &mut Frame, app: &App, engine: &dyn MediaEngine) {
    let colors = palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg)),
        frame.area(),
    );

    let [header, body, player, footer] = regions(frame.area());

    draw_header(frame, app, &colors, header);
    match app.page {
        Page::Home => draw_home(frame, app, &colors, body),
        Page::Search => draw_search(frame, app, &colors, body),
        Page::Library => draw_library(frame, app, &colors, body),
        Page::Playlists => draw_playlists(frame, app, &colors, body),
    }
    draw_player(frame, app, engine, &colors, player);
    draw_footer(frame, app, &colors, footer);
}

fn draw_header(frame: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let mut spans = vec![Span::styled(
        APP_TITLE,
        Style::default()
            .fg(colors.accent)
            .add_modifier(Modifier::BOLD),
    )];

    for (idx, page) in [Page::Home, Page::Search, Page::Library, Page::Playlists]
        .into_iter()
        .enumerate()
    {
        if idx > 0 {
            spans.push(Span::styled(" -- ", Style::default().fg(colors.muted)));
        }
        let mut style = Style::default().fg(colors.text);
        if page == app.page {
            style = style
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!("{} {}", idx + 1, page.label()), style));
    }

    let tabs = Paragraph::new(Line::from(spans)).block(panel_block("Pages", colors, false));
    frame.render_widget(tabs, area);
}

fn draw_home(frame: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let playlist_items: Vec<ListItem> = app
        .store
        .playlist_names()
        .iter()
        .map(|name| {
            let count = app.store.playlist(name).map_or(0, <[PathBuf]>::len);
            ListItem::new(Span::styled(
                format!("{name}  ({count} tracks)"),
                Style::default().fg(colors.text),
            ))
        })
        .collect();
    let playlists = List::new(playlist_items).block(panel_block("Your Playlists", colors, false));
    frame.render_widget(playlists, halves[0]);

    let recent_items: Vec<ListItem> = app
        .store
        .tracks()
        .iter()
        .take(8)
        .map(|path| {
            ListItem::new(Span::styled(
                store::display_name(path),
                Style::default().fg(colors.text),
            ))
        })
        .collect();
    let recent = List::new(recent_items).block(panel_block("Recently Added", colors, false));
    frame.render_widget(recent, halves[1]);
}

fn draw_search(frame: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let editing = app.input_mode == InputMode::Search;
    let query_text = if app.search_query.is_empty() && !editing {
        Span::styled(
            "Press / to search for songs...",
            Style::default().fg(colors.muted),
        )
    } else {
        Span::styled(
            format!("{}{}", app.search_query, if editing { "_" } else { "" }),
            Style::default().fg(colors.text),
        )
    };
    let query = Paragraph::new(query_text).block(panel_block("Search", colors, editing));
    frame.render_widget(query, rows[0]);

    let results = app.search_results();
    let items: Vec<ListItem> = results
        .iter()
        .map(|path| {
            ListItem::new(Span::styled(
                store::display_name(path),
                Style::default().fg(colors.text),
            ))
        })
        .collect();
    render_selectable_list(
        frame,
        rows[1],
        items,
        app.search_selected,
        results.len(),
        panel_block("Results", colors, false),
        colors,
    );
}

fn draw_library(frame: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let items: Vec<ListItem> = app
        .store
        .tracks()
        .iter()
        .map(|path| {
            ListItem::new(Span::styled(
                store::display_name(path),
                Style::default().fg(colors.text),
            ))
        })
        .collect();
    render_selectable_list(
        frame,
        area,
        items,
        app.library_selected,
        app.store.tracks().len(),
        panel_block("Your Library", colors, false),
        colors,
    );
}

fn draw_playlists(frame: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let names = app.store.playlist_names();
    let name_items: Vec<ListItem> = names
        .iter()
        .map(|name| ListItem::new(Span::styled(*name, Style::default().fg(colors.text))))
        .collect();
    render_selectable_list(
        frame,
        halves[0],
        name_items,
        app.playlist_selected,
        names.len(),
        panel_block(
            "Playlists",
            colors,
            app.playlist_pane == PlaylistPane::Names,
        ),
        colors,
    );

    let songs: Vec<PathBuf> = app
        .selected_playlist_name()
        .and_then(|name| app.store.playlist(&name).map(<[PathBuf]>::to_vec))
        .unwrap_or_default();
    let song_items: Vec<ListItem> = songs
        .iter()
        .map(|path| {
            ListItem::new(Span::styled(
                store::display_name(path),
                Style::default().fg(colors.text),
            ))
        })
        .collect();
    render_selectable_list(
        frame,
        halves[1],
        song_items,
        app.playlist_song_selected,
        songs.len(),
        panel_block(
            "Songs in Playlist",
            colors,
            app.playlist_pane == PlaylistPane::Songs,
        ),
        colors,
    );
}

fn draw_player(frame: &mut Frame, app: &App, engine: &dyn MediaEngine, colors: &Palette, area: Rect) {
    let block = panel_block("Player", colors, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let now_playing = app
        .session
        .current_path()
        .map(store::display_name)
        .unwrap_or_else(|| String::from("-"));
    let queue_position = app
        .session
        .current_index()
        .map(|idx| format!("{}/{}", idx + 1, app.session.queue().len()))
        .unwrap_or_else(|| String::from("-/-"));
    let elapsed = engine.position().unwrap_or(Duration::ZERO);
    let total = engine.duration();

    let info = Line::from(vec![
        Span::styled("Now ", Style::default().fg(colors.muted)),
        Span::styled(
            now_playing,
            Style::default()
                .fg(colors.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {} / {}  Queue {}",
                format_duration(elapsed),
                total
                    .map(format_duration)
                    .unwrap_or_else(|| String::from("--:--")),
                queue_position
            ),
            Style::default().fg(colors.muted),
        ),
        Span::styled(
            format!(
                "  |  Vol {} {:>3}%  |  {}  {}",
                progress_bar(f64::from(engine.volume()), 10),
                (engine.volume() * 100.0).round() as u16,
                app.session.shuffle_label(),
                app.session.repeat_label()
            ),
            Style::default().fg(colors.accent),
        ),
    ]);
    frame.render_widget(Paragraph::new(info), rows[0]);

    let ratio = app
        .pending_seek
        .unwrap_or_else(|| app.session.progress())
        .clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors.accent).bg(colors.panel_bg))
        .ratio(ratio)
        .label("");
    frame.render_widget(gauge, rows[1]);
}

fn draw_footer(frame: &mut Frame, app: &App, colors: &Palette, area: Rect) {
    let line = if app.input_mode == InputMode::Command {
        Line::from(Span::styled(
            format!(":{}_", app.command_buffer),
            Style::default().fg(colors.text),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                "Keys: Enter play, Space pause, n next, b previous, s shuffle, r repeat, / search, : command, Ctrl+C quit",
                Style::default().fg(colors.muted),
            ),
            Span::styled("  |  ", Style::default().fg(colors.muted)),
            Span::styled(app.status.as_str(), Style::default().fg(colors.text)),
        ])
    };
    let footer = Paragraph::new(line).block(panel_block("Message", colors, false));
    frame.render_widget(footer, area);
}

fn render_selectable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected: usize,
    len: usize,
    block: Block,
    colors: &Palette,
) {
    let mut state = ListState::default();
    if len > 0 {
        state.select(Some(selected.min(len - 1)));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors.selected_bg)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("-> ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn panel_block<'a>(title: &'a str, colors: &Palette, focused: bool) -> Block<'a> {
    let border = if focused {
        colors.focus_border
    } else {
        colors.border
    };
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.text)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(colors.panel_bg))
}

fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let clamped = ratio.clamp(0.0, 1.0);
    let filled = (clamped * width as f64).round() as usize;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.push_str(&"#".repeat(filled));
    bar.push_str(&"-".repeat(width.saturating_sub(filled)));
    bar.push(']');
    bar
}

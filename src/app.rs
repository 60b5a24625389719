use crate::audio::{MediaEngine, NullEngine, RodioEngine};
use crate::config;
use crate::scan;
use crate::session::{Direction, PlaybackSession};
use crate::store::{self, MusicStore};
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Search,
    Library,
    Playlists,
}

impl Page {
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Search => "Search",
            Self::Library => "Library",
            Self::Playlists => "Playlists",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Home => Self::Search,
            Self::Search => Self::Library,
            Self::Library => Self::Playlists,
            Self::Playlists => Self::Home,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Home => Self::Playlists,
            Self::Search => Self::Home,
            Self::Library => Self::Search,
            Self::Playlists => Self::Library,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistPane {
    Names,
    Songs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    AddPath(PathBuf),
    PlaylistNew(String),
    PlaylistAddTo(String),
    PlaylistPlay(String),
    PlaylistDrop(String),
    PlayLibrary,
    Save,
}

pub struct App {
    pub store: MusicStore,
    pub session: PlaybackSession,
    pub page: Page,
    pub playlist_pane: PlaylistPane,
    pub input_mode: InputMode,
    pub search_query: String,
    pub command_buffer: String,
    pub library_selected: usize,
    pub search_selected: usize,
    pub playlist_selected: usize,
    pub playlist_song_selected: usize,
    pub pending_seek: Option<f64>,
    pub status: String,
    pub dirty: bool,
}

impl App {
    pub fn new(store: MusicStore) -> Self {
        Self {
            store,
            session: PlaybackSession::new(),
            page: Page::Home,
            playlist_pane: PlaylistPane::Names,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            command_buffer: String::new(),
            library_selected: 0,
            search_selected: 0,
            playlist_selected: 0,
            playlist_song_selected: 0,
            pending_seek: None,
            status: String::from("Ready"),
            dirty: true,
        }
    }

    pub fn search_results(&self) -> Vec<&Path> {
        self.store.filter_tracks(&self.search_query).collect()
    }

    pub fn selected_playlist_name(&self) -> Option<String> {
        self.store
            .playlist_names()
            .get(self.playlist_selected)
            .map(ToString::to_string)
    }

    pub fn selected_track(&self) -> Option<PathBuf> {
        match self.page {
            Page::Library => self.store.tracks().get(self.library_selected).cloned(),
            Page::Search => self
                .search_results()
                .get(self.search_selected)
                .map(|path| path.to_path_buf()),
            Page::Home | Page::Playlists => None,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.active_list_len();
        if len == 0 {
            return;
        }
        if let Some(slot) = self.active_selection_mut() {
            *slot = (*slot + 1).min(len - 1);
            self.dirty = true;
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(slot) = self.active_selection_mut() {
            *slot = slot.saturating_sub(1);
            self.dirty = true;
        }
    }

    fn active_list_len(&self) -> usize {
        match self.page {
            Page::Home => 0,
            Page::Search => self.search_results().len(),
            Page::Library => self.store.tracks().len(),
            Page::Playlists => match self.playlist_pane {
                PlaylistPane::Names => self.store.playlist_names().len(),
                PlaylistPane::Songs => self
                    .selected_playlist_name()
                    .and_then(|name| self.store.playlist(&name))
                    .map_or(0, <[PathBuf]>::len),
            },
        }
    }

    fn active_selection_mut(&mut self) -> Option<&mut usize> {
        match self.page {
            Page::Home => None,
            Page::Search => Some(&mut self.search_selected),
            Page::Library => Some(&mut self.library_selected),
            Page::Playlists => match self.playlist_pane {
                PlaylistPane::Names => Some(&mut self.playlist_selected),
                PlaylistPane::Songs => Some(&mut self.playlist_song_selected),
            },
        }
    }

    pub fn persist(&mut self) {
        if let Err(err) = config::save_store(&self.store) {
            self.status = format!("save error: {err:#}");
        }
        self.dirty = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.dirty = true;
    }
}

pub fn run() -> Result<()> {
    let store = config::load_store()?;
    let mut app = App::new(store);

    let mut engine: Box<dyn MediaEngine> = match RodioEngine::new() {
        Ok(engine) => Box::new(engine),
        Err(_) => Box::new(NullEngine::new()),
    };

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut last_tick = Instant::now();
    let mut progress_rect = ratatui::prelude::Rect::default();

    let result: Result<()> = loop {
        pump_engine_events(&mut app, &mut *engine);

        if app.dirty || last_tick.elapsed() > Duration::from_millis(250) {
            terminal.draw(|frame| {
                progress_rect = crate::ui::progress_rect(frame.area());
                crate::ui::draw(frame, &app, &*engine)
            })?;
            app.dirty = false;
            last_tick = Instant::now();
        }

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }

        let event = event::read()?;
        if let Event::Mouse(mouse) = event {
            handle_mouse(&mut app, &mut *engine, mouse, progress_rect);
            continue;
        }

        let Event::Key(key) = event else {
            continue;
        };

        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Command => handle_command_key(&mut app, &mut *engine, key.code),
            InputMode::Search => handle_search_key(&mut app, key.code),
            InputMode::Normal => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    break Ok(());
                }
                handle_normal_key(&mut app, &mut *engine, key.code);
            }
        }
    };

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

// The engine has no callback channel; each loop tick polls it and feeds
// the session the same position/duration/finished notifications the
// platform player would push.
fn pump_engine_events(app: &mut App, engine: &mut dyn MediaEngine) {
    let duration_ms = engine
        .duration()
        .map_or(0, |duration| duration.as_millis() as u64);
    if duration_ms != app.session.duration_ms() {
        app.session.on_duration_changed(duration_ms);
        app.dirty = true;
    }

    if let Some(position) = engine.position() {
        app.session.on_position_changed(position.as_millis() as u64);
    }

    if engine.is_finished() {
        if let Err(err) = app.session.on_media_finished(engine) {
            engine.stop();
            app.set_status(format!("playback error: {err:#}"));
        }
        app.dirty = true;
    }
}

fn handle_normal_key(app: &mut App, engine: &mut dyn MediaEngine, code: KeyCode) {
    match code {
        KeyCode::Tab => {
            app.page = app.page.next();
            app.dirty = true;
        }
        KeyCode::BackTab => {
            app.page = app.page.prev();
            app.dirty = true;
        }
        KeyCode::Char('1') => switch_page(app, Page::Home),
        KeyCode::Char('2') => switch_page(app, Page::Search),
        KeyCode::Char('3') => switch_page(app, Page::Library),
        KeyCode::Char('4') => switch_page(app, Page::Playlists),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Left if app.page == Page::Playlists => {
            app.playlist_pane = PlaylistPane::Names;
            app.dirty = true;
        }
        KeyCode::Right if app.page == Page::Playlists => {
            app.playlist_pane = PlaylistPane::Songs;
            app.playlist_song_selected = 0;
            app.dirty = true;
        }
        KeyCode::Enter => activate_selected(app, engine),
        KeyCode::Char(' ') => toggle_pause(app, engine),
        KeyCode::Char('n') => advance_and_report(app, engine, Direction::Next),
        KeyCode::Char('b') => advance_and_report(app, engine, Direction::Previous),
        KeyCode::Char('s') => {
            let enabled = !app.session.shuffle();
            app.session.set_shuffle(enabled);
            app.set_status(app.session.shuffle_label());
        }
        KeyCode::Char('r') => {
            let enabled = !app.session.repeat_one();
            app.session.set_repeat_one(enabled);
            app.set_status(app.session.repeat_label());
        }
        KeyCode::Char('+') | KeyCode::Char('=') => adjust_volume(app, engine, 0.05),
        KeyCode::Char('-') => adjust_volume(app, engine, -0.05),
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_buffer.clear();
            app.dirty = true;
        }
        KeyCode::Char('/') => {
            app.page = Page::Search;
            app.input_mode = InputMode::Search;
            app.dirty = true;
        }
        _ => {}
    }
}

fn handle_command_key(app: &mut App, engine: &mut dyn MediaEngine, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_buffer.clear();
            app.dirty = true;
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_buffer);
            app.input_mode = InputMode::Normal;
            run_command(app, engine, &input);
        }
        KeyCode::Backspace => {
            app.command_buffer.pop();
            app.dirty = true;
        }
        KeyCode::Char(ch) => {
            app.command_buffer.push(ch);
            app.dirty = true;
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.dirty = true;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.search_selected = 0;
            app.dirty = true;
        }
        KeyCode::Char(ch) => {
            app.search_query.push(ch);
            app.search_selected = 0;
            app.dirty = true;
        }
        _ => {}
    }
}

fn handle_mouse(
    app: &mut App,
    engine: &mut dyn MediaEngine,
    mouse: MouseEvent,
    progress_rect: ratatui::prelude::Rect,
) {
    let on_progress = point_in_rect(mouse.column, mouse.row, progress_rect);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if on_progress => {
            app.session.begin_seek();
            app.pending_seek = Some(ratio_at(mouse.column, progress_rect));
            app.dirty = true;
        }
        MouseEventKind::Drag(MouseButton::Left) if app.session.is_seeking() => {
            app.pending_seek = Some(ratio_at(mouse.column, progress_rect));
            app.dirty = true;
        }
        MouseEventKind::Up(MouseButton::Left) if app.session.is_seeking() => {
            if let Some(ratio) = app.pending_seek.take()
                && let Err(err) = app.session.seek_to(ratio, engine)
            {
                app.set_status(format!("playback error: {err:#}"));
            }
            app.session.end_seek();
            app.dirty = true;
        }
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_prev(),
        _ => {}
    }
}

fn switch_page(app: &mut App, page: Page) {
    app.page = page;
    app.dirty = true;
}

fn point_in_rect(x: u16, y: u16, rect: ratatui::prelude::Rect) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}

fn ratio_at(column: u16, rect: ratatui::prelude::Rect) -> f64 {
    if rect.width == 0 {
        return 0.0;
    }
    f64::from(column.saturating_sub(rect.x)) / f64::from(rect.width)
}

fn activate_selected(app: &mut App, engine: &mut dyn MediaEngine) {
    match app.page {
        Page::Home => {}
        Page::Search | Page::Library => {
            let Some(path) = app.selected_track() else {
                app.set_status("Nothing selected");
                return;
            };
            play_single(app, engine, path);
        }
        Page::Playlists => match app.playlist_pane {
            PlaylistPane::Names => {
                let Some(name) = app.selected_playlist_name() else {
                    app.set_status("No playlist selected");
                    return;
                };
                play_playlist(app, engine, &name);
            }
            PlaylistPane::Songs => {
                let selected = app.selected_playlist_name().and_then(|name| {
                    app.store
                        .playlist(&name)
                        .and_then(|tracks| tracks.get(app.playlist_song_selected).cloned())
                });
                let Some(path) = selected else {
                    app.set_status("Nothing selected");
                    return;
                };
                play_single(app, engine, path);
            }
        },
    }
}

fn toggle_pause(app: &mut App, engine: &mut dyn MediaEngine) {
    if engine.current_source().is_none() {
        app.set_status("Nothing loaded");
        return;
    }
    if engine.is_paused() {
        engine.play();
        app.set_status("Resumed");
    } else {
        engine.pause();
        app.set_status("Paused");
    }
}

fn adjust_volume(app: &mut App, engine: &mut dyn MediaEngine, delta: f32) {
    let next = (engine.volume() + delta).clamp(0.0, 1.0);
    engine.set_volume(next);
    app.set_status(format!("Volume: {}%", (next * 100.0).round() as u16));
}

fn advance_and_report(app: &mut App, engine: &mut dyn MediaEngine, direction: Direction) {
    if app.session.queue().is_empty() {
        app.set_status("Queue is empty");
        return;
    }
    if let Err(err) = app.session.advance(direction, engine) {
        engine.stop();
        app.set_status(format!("playback error: {err:#}"));
        return;
    }
    let label = app
        .session
        .current_path()
        .map(store::display_name)
        .unwrap_or_default();
    app.set_status(format!("Playing {label}"));
}

fn play_single(app: &mut App, engine: &mut dyn MediaEngine, path: PathBuf) {
    let label = store::display_name(&path);
    match app.session.load_queue(vec![path], 0, engine) {
        Ok(()) => app.set_status(format!("Playing {label}")),
        Err(err) => {
            engine.stop();
            app.set_status(format!("playback error: {err:#}"));
        }
    }
}

fn play_playlist(app: &mut App, engine: &mut dyn MediaEngine, name: &str) {
    let Some(tracks) = app.store.playlist(name).map(<[PathBuf]>::to_vec) else {
        app.set_status("Playlist not found");
        return;
    };
    if tracks.is_empty() {
        app.set_status("Playlist is empty");
        return;
    }
    match app.session.load_queue(tracks, 0, engine) {
        Ok(()) => app.set_status(format!("Playing playlist: {name}")),
        Err(err) => {
            engine.stop();
            app.set_status(format!("playback error: {err:#}"));
        }
    }
}

fn play_library(app: &mut App, engine: &mut dyn MediaEngine) {
    let tracks = app.store.tracks().to_vec();
    if tracks.is_empty() {
        app.set_status("Library is empty");
        return;
    }
    match app.session.load_queue(tracks, 0, engine) {
        Ok(()) => app.set_status("Playing library"),
        Err(err) => {
            engine.stop();
            app.set_status(format!("playback error: {err:#}"));
        }
    }
}

pub fn parse_command(raw: &str) -> Result<Command, String> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(String::from("No command"));
    }

    let mut split = input.splitn(2, char::is_whitespace);
    let command = split.next().unwrap_or_default();
    let rest = split.next().unwrap_or("").trim();

    match command {
        "help" => Ok(Command::Help),
        "library" => Ok(Command::PlayLibrary),
        "save" => Ok(Command::Save),
        "add" => {
            if rest.is_empty() {
                Err(String::from("Usage: add <path>"))
            } else {
                Ok(Command::AddPath(PathBuf::from(rest)))
            }
        }
        "playlist" => {
            let mut playlist_split = rest.splitn(2, char::is_whitespace);
            let action = playlist_split.next().unwrap_or_default();
            let name = playlist_split.next().unwrap_or("").trim();

            if action.is_empty() || name.is_empty() {
                return Err(String::from("Usage: playlist <new|add|play|drop> <name>"));
            }

            match action {
                "new" => Ok(Command::PlaylistNew(name.to_string())),
                "add" => Ok(Command::PlaylistAddTo(name.to_string())),
                "play" => Ok(Command::PlaylistPlay(name.to_string())),
                "drop" => Ok(Command::PlaylistDrop(name.to_string())),
                _ => Err(String::from("Usage: playlist <new|add|play|drop> <name>")),
            }
        }
        _ => Err(String::from("Unknown command. Use :help")),
    }
}

fn run_command(app: &mut App, engine: &mut dyn MediaEngine, input: &str) {
    match parse_command(input) {
        Err(message) => app.set_status(message),
        Ok(command) => dispatch_command(app, engine, command),
    }
}

fn dispatch_command(app: &mut App, engine: &mut dyn MediaEngine, command: Command) {
    match command {
        Command::Help => app.set_status(
            "Commands: add <path> | playlist new <name> | playlist add <name> | playlist play <name> | playlist drop <name> | library | save",
        ),
        Command::AddPath(path) => add_tracks_from_path(app, &path),
        Command::PlaylistNew(name) => {
            if app.store.create_playlist(&name) {
                app.persist();
                app.set_status(format!("Created playlist {name}"));
            } else {
                app.set_status("Playlist name is empty or already taken");
            }
        }
        Command::PlaylistAddTo(name) => add_selected_to_playlist(app, &name),
        Command::PlaylistPlay(name) => play_playlist(app, engine, &name),
        Command::PlaylistDrop(name) => {
            if app.store.remove_playlist(&name) {
                app.playlist_selected = 0;
                app.persist();
                app.set_status(format!("Removed playlist {name}"));
            } else {
                app.set_status("Playlist not found");
            }
        }
        Command::PlayLibrary => play_library(app, engine),
        Command::Save => {
            match config::save_store(&app.store) {
                Ok(()) => app.set_status("State saved"),
                Err(err) => app.set_status(format!("save error: {err:#}")),
            }
        }
    }
}

fn add_tracks_from_path(app: &mut App, path: &Path) {
    let candidates = if path.is_dir() {
        scan::audio_files_under(path)
    } else {
        vec![path.to_path_buf()]
    };

    if candidates.is_empty() {
        app.set_status("No audio files found");
        return;
    }

    let mut added = 0;
    for candidate in &candidates {
        if app.store.add_track(candidate) {
            added += 1;
        }
    }
    if added > 0 {
        app.persist();
    }
    app.set_status(format!("Added {added} of {} tracks", candidates.len()));
}

fn add_selected_to_playlist(app: &mut App, name: &str) {
    let Some(path) = app.selected_track() else {
        app.set_status("Select a track on the Library or Search page");
        return;
    };
    if app.store.add_track_to_playlist(name, &path) {
        app.persist();
        app.set_status(format!("Added {} to {name}", store::display_name(&path)));
    } else {
        app.set_status("Track not added (unknown playlist, or already present)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::time::Duration;

    #[derive(Default)]
    struct TestEngine {
        sources: Vec<PathBuf>,
        seeks: Vec<Duration>,
        current: Option<PathBuf>,
        playing: bool,
        finished: bool,
        stopped: bool,
        fail_set_source: bool,
        volume: f32,
    }

    impl MediaEngine for TestEngine {
        fn set_source(&mut self, path: &Path) -> Result<()> {
            if self.fail_set_source {
                return Err(anyhow!("cannot open {}", path.display()));
            }
            self.sources.push(path.to_path_buf());
            self.current = Some(path.to_path_buf());
            self.playing = false;
            self.finished = false;
            Ok(())
        }

        fn play(&mut self) {
            self.playing = true;
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn stop(&mut self) {
            self.stopped = true;
            self.current = None;
            self.playing = false;
            self.finished = false;
        }

        fn set_position(&mut self, position: Duration) -> Result<()> {
            if self.current.is_none() {
                return Err(anyhow!("no active track"));
            }
            self.seeks.push(position);
            self.finished = false;
            Ok(())
        }

        fn set_volume(&mut self, ratio: f32) {
            self.volume = ratio;
        }

        fn volume(&self) -> f32 {
            self.volume
        }

        fn is_paused(&self) -> bool {
            !self.playing
        }

        fn current_source(&self) -> Option<&Path> {
            self.current.as_deref()
        }

        fn position(&self) -> Option<Duration> {
            None
        }

        fn duration(&self) -> Option<Duration> {
            None
        }

        fn is_finished(&self) -> bool {
            self.finished
        }
    }

    fn app_with_mix_playlist() -> App {
        let mut store = MusicStore::default();
        store.add_track(Path::new("/a.mp3"));
        store.add_track(Path::new("/b.mp3"));
        store.add_track(Path::new("/c.mp3"));
        store.create_playlist("Mix");
        store.add_track_to_playlist("Mix", Path::new("/b.mp3"));
        App::new(store)
    }

    #[test]
    fn parse_recognizes_every_command() {
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("library"), Ok(Command::PlayLibrary));
        assert_eq!(parse_command("save"), Ok(Command::Save));
        assert_eq!(
            parse_command("add /music folder"),
            Ok(Command::AddPath(PathBuf::from("/music folder")))
        );
        assert_eq!(
            parse_command("playlist new road trip"),
            Ok(Command::PlaylistNew(String::from("road trip")))
        );
        assert_eq!(
            parse_command("playlist play Mix"),
            Ok(Command::PlaylistPlay(String::from("Mix")))
        );
        assert_eq!(
            parse_command("playlist drop Mix"),
            Ok(Command::PlaylistDrop(String::from("Mix")))
        );
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(parse_command("").is_err());
        assert!(parse_command("add").is_err());
        assert!(parse_command("playlist new").is_err());
        assert!(parse_command("playlist frobnicate Mix").is_err());
        assert!(parse_command("wat").is_err());
    }

    #[test]
    fn playing_a_playlist_queues_only_its_tracks() {
        let mut app = app_with_mix_playlist();
        let mut engine = TestEngine::default();

        play_playlist(&mut app, &mut engine, "Mix");

        assert_eq!(app.session.queue(), &[PathBuf::from("/b.mp3")]);
        assert_eq!(app.session.current_index(), Some(0));

        // Single-element queue wraps onto itself.
        app.session
            .advance(Direction::Next, &mut engine)
            .expect("next");
        assert_eq!(app.session.current_index(), Some(0));
    }

    #[test]
    fn auto_advance_plays_next_track_when_finished() {
        let mut app = app_with_mix_playlist();
        let mut engine = TestEngine::default();
        play_library(&mut app, &mut engine);
        engine.finished = true;

        pump_engine_events(&mut app, &mut engine);

        assert_eq!(app.session.current_index(), Some(1));
        assert_eq!(engine.sources.last(), Some(&PathBuf::from("/b.mp3")));
    }

    #[test]
    fn auto_advance_with_repeat_one_restarts_track() {
        let mut app = app_with_mix_playlist();
        let mut engine = TestEngine::default();
        play_library(&mut app, &mut engine);
        app.session.set_repeat_one(true);
        engine.finished = true;

        pump_engine_events(&mut app, &mut engine);

        assert_eq!(app.session.current_index(), Some(0));
        assert_eq!(engine.seeks, vec![Duration::ZERO]);
        assert_eq!(engine.sources.len(), 1);
    }

    #[test]
    fn engine_failure_leaves_playback_stopped() {
        let mut app = app_with_mix_playlist();
        let mut engine = TestEngine {
            fail_set_source: true,
            ..TestEngine::default()
        };

        play_playlist(&mut app, &mut engine, "Mix");

        assert!(engine.stopped);
        assert!(app.status.contains("playback error"), "got: {}", app.status);
    }

    #[test]
    fn unknown_playlist_is_reported_without_touching_queue() {
        let mut app = app_with_mix_playlist();
        let mut engine = TestEngine::default();

        play_playlist(&mut app, &mut engine, "nope");

        assert!(app.session.queue().is_empty());
        assert_eq!(app.status, "Playlist not found");
    }

    #[test]
    fn search_results_follow_query() {
        let mut app = app_with_mix_playlist();
        app.search_query = String::from("B.MP");
        let results = app.search_results();
        assert_eq!(results, vec![Path::new("/b.mp3")]);
    }

    #[test]
    fn seek_drag_blocks_position_updates_until_release() {
        let mut app = app_with_mix_playlist();
        let mut engine = TestEngine::default();
        play_library(&mut app, &mut engine);
        app.session.on_duration_changed(100_000);

        let rect = ratatui::prelude::Rect::new(0, 10, 50, 1);
        handle_mouse(
            &mut app,
            &mut engine,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 25,
                row: 10,
                modifiers: KeyModifiers::NONE,
            },
            rect,
        );
        assert!(app.session.is_seeking());
        assert_eq!(app.pending_seek, Some(0.5));

        app.session.on_position_changed(90_000);
        assert_eq!(app.session.progress(), 0.0, "drag suppresses updates");

        handle_mouse(
            &mut app,
            &mut engine,
            MouseEvent {
                kind: MouseEventKind::Up(MouseButton::Left),
                column: 25,
                row: 10,
                modifiers: KeyModifiers::NONE,
            },
            rect,
        );
        assert!(!app.session.is_seeking());
        assert_eq!(engine.seeks, vec![Duration::from_millis(50_000)]);
    }

    #[test]
    fn volume_keys_stay_within_range() {
        let mut app = app_with_mix_playlist();
        let mut engine = TestEngine {
            volume: 0.98,
            ..TestEngine::default()
        };

        adjust_volume(&mut app, &mut engine, 0.05);
        assert_eq!(engine.volume, 1.0);
        assert_eq!(app.status, "Volume: 100%");
    }
}

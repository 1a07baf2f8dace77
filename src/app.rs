//! App: terminal init, main loop, tick and key handling.

use crate::GameConfig;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, Pop, View};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};
use ratatui::DefaultTerminal;
use shiftrow::{CursorDir, PuzzleField, ShiftDir};
use std::time::{Duration, Instant};

/// Ticks run back to back after a stall before the clock is resynced.
const MAX_CATCH_UP_TICKS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    Restart,
    Exit,
}

impl QuitOption {
    pub const ALL: [QuitOption; 3] = [QuitOption::Resume, QuitOption::Restart, QuitOption::Exit];

    pub fn label(self) -> &'static str {
        match self {
            QuitOption::Resume => "Resume",
            QuitOption::Restart => "New board",
            QuitOption::Exit => "Exit",
        }
    }

    fn next(self) -> Self {
        match self {
            QuitOption::Resume => QuitOption::Restart,
            QuitOption::Restart => QuitOption::Exit,
            QuitOption::Exit => QuitOption::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            QuitOption::Resume => QuitOption::Exit,
            QuitOption::Restart => QuitOption::Resume,
            QuitOption::Exit => QuitOption::Restart,
        }
    }
}

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    field: PuzzleField,
    screen: Screen,
    paused: bool,
    quit_selected: QuitOption,
    last_tick: Instant,
    /// Fading cells from recent destroys.
    pops: Vec<Pop>,
    /// Last time pop effects were processed (for delta).
    pop_process_time: Option<Instant>,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Result<Self> {
        let field = new_board(&config)?;
        Ok(Self {
            config,
            theme,
            field,
            screen: Screen::Playing,
            paused: false,
            quit_selected: QuitOption::Resume,
            last_tick: Instant::now(),
            pops: Vec::new(),
            pop_process_time: None,
        })
    }

    fn reset_game(&mut self) -> Result<()> {
        self.field = new_board(&self.config)?;
        self.screen = Screen::Playing;
        self.paused = false;
        self.last_tick = Instant::now();
        self.pops.clear();
        self.pop_process_time = None;
        Ok(())
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.tick_rate)
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.config.frame_rate)
    }

    /// Advance the field once and start a fade for whatever it popped.
    fn tick(&mut self) {
        self.field.advance();
        if let Some(cell) = self.field.last_destroyed() {
            if !self.config.no_animation {
                self.pops.push(Pop::new(cell, &self.theme));
            }
        }
    }

    /// Run every tick that is due, resyncing the clock after a long stall.
    fn run_due_ticks(&mut self, now: Instant) {
        let interval = self.tick_interval();
        let mut ran = 0;
        while now.duration_since(self.last_tick) >= interval {
            self.tick();
            self.last_tick += interval;
            ran += 1;
            if ran >= MAX_CATCH_UP_TICKS {
                debug!("tick loop fell behind, resyncing");
                self.last_tick = now;
                break;
            }
        }
    }

    fn handle_action(&mut self, action: Action) -> Result<Flow> {
        match self.screen {
            Screen::Playing if self.paused => match action {
                Action::Pause => {
                    self.paused = false;
                    self.last_tick = Instant::now();
                }
                Action::Quit => self.open_quit_menu(),
                _ => {}
            },
            Screen::Playing => match action {
                Action::CursorUp => self.field.request_cursor_move(CursorDir::Up),
                Action::CursorDown => self.field.request_cursor_move(CursorDir::Down),
                Action::ShiftLeft => self.field.request_row_shift(ShiftDir::Left),
                Action::ShiftRight => self.field.request_row_shift(ShiftDir::Right),
                Action::Pause => self.paused = true,
                Action::Restart => self.reset_game()?,
                Action::Quit => self.open_quit_menu(),
                Action::Confirm | Action::None => {}
            },
            Screen::QuitMenu => match action {
                Action::CursorDown | Action::ShiftRight => {
                    self.quit_selected = self.quit_selected.next();
                }
                Action::CursorUp | Action::ShiftLeft => {
                    self.quit_selected = self.quit_selected.prev();
                }
                Action::Confirm => match self.quit_selected {
                    QuitOption::Resume => self.resume(),
                    QuitOption::Restart => self.reset_game()?,
                    QuitOption::Exit => return Ok(Flow::Exit),
                },
                Action::Pause | Action::Quit => self.resume(),
                Action::Restart | Action::None => {}
            },
        }
        Ok(Flow::Continue)
    }

    fn open_quit_menu(&mut self) {
        self.screen = Screen::QuitMenu;
        self.quit_selected = QuitOption::Resume;
    }

    fn resume(&mut self) {
        self.screen = Screen::Playing;
        self.last_tick = Instant::now();
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events are filtered out below, so this only needs to not fail loudly.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_interval = self.frame_interval();
        self.last_tick = Instant::now();
        loop {
            let now = Instant::now();
            let view = View {
                field: &self.field,
                theme: &self.theme,
                screen: self.screen,
                paused: self.paused,
                quit_selected: self.quit_selected,
            };
            let pops = &mut self.pops;
            let pop_process_time = &mut self.pop_process_time;
            terminal.draw(|f| ui::draw(f, &view, pops, pop_process_time, now))?;
            self.pops.retain(|p| !p.effect.done());

            let timeout = frame_interval.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let action = key_to_action(key);
                    if self.handle_action(action)? == Flow::Exit {
                        info!("exiting");
                        return Ok(());
                    }
                }
            }

            if self.screen == Screen::Playing && !self.paused {
                self.run_due_ticks(Instant::now());
            }
        }
    }
}

/// Fresh field from the configured seed, or a random one when none was given.
fn new_board(config: &GameConfig) -> Result<PuzzleField> {
    let seed = config.seed.unwrap_or_else(rand::random::<u64>);
    PuzzleField::initialize(config.field, seed).context("building board")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftrow::FieldConfig;

    fn app() -> App {
        let config = GameConfig {
            field: FieldConfig::default(),
            seed: Some(7),
            tick_rate: 60.0,
            frame_rate: 60.0,
            no_animation: true,
        };
        App::new(config, Theme::default()).unwrap()
    }

    #[test]
    fn test_fixed_seed_gives_same_board() {
        let a = app();
        let b = app();
        let va: Vec<_> = a.field.snapshot_blocks().collect();
        let vb: Vec<_> = b.field.snapshot_blocks().collect();
        assert_eq!(va, vb);
    }

    #[test]
    fn test_quit_menu_cycles_and_resumes() {
        let mut app = app();
        assert_eq!(app.handle_action(Action::Quit).unwrap(), Flow::Continue);
        assert_eq!(app.screen, Screen::QuitMenu);
        app.handle_action(Action::CursorUp).unwrap();
        assert_eq!(app.quit_selected, QuitOption::Exit);
        assert_eq!(app.handle_action(Action::Confirm).unwrap(), Flow::Exit);

        let mut app = self::app();
        app.handle_action(Action::Quit).unwrap();
        app.handle_action(Action::Confirm).unwrap();
        assert_eq!(app.screen, Screen::Playing);
    }

    #[test]
    fn test_paused_ignores_moves() {
        let mut app = app();
        let row = app.field.cursor_row();
        app.handle_action(Action::Pause).unwrap();
        app.handle_action(Action::CursorUp).unwrap();
        app.handle_action(Action::Pause).unwrap();
        app.tick();
        assert_eq!(app.field.cursor_row(), row);
    }

    #[test]
    fn test_cursor_key_moves_on_next_tick() {
        let mut app = app();
        let row = app.field.cursor_row();
        app.handle_action(Action::CursorUp).unwrap();
        assert_eq!(app.field.cursor_row(), row);
        app.tick();
        assert_eq!(app.field.cursor_row(), row - 1);
    }

    #[test]
    fn test_restart_keeps_fixed_seed() {
        let mut app = app();
        let before: Vec<_> = app.field.snapshot_blocks().collect();
        app.handle_action(Action::CursorUp).unwrap();
        app.tick();
        app.handle_action(Action::Restart).unwrap();
        let after: Vec<_> = app.field.snapshot_blocks().collect();
        assert_eq!(before, after);
        assert_eq!(app.field.seed(), Some(7));
    }
}

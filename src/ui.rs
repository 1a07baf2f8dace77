//! Layout and drawing: board, blocks at their animated positions, cursor, sidebar,
//! pause overlay, quit menu and the pop fade.

use crate::app::{QuitOption, Screen};
use crate::theme::{Theme, darken};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use shiftrow::{FieldGeometry, PuzzleField};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per field cell.
pub const CELL_COLS: u16 = 4;
/// Terminal rows per field cell. Each row holds two pixels via `▀`.
pub const CELL_ROWS: u16 = 2;
/// Pixels per cell on each axis.
const CELL_PX: i32 = 4;

const SIDEBAR_WIDTH: u16 = 26;

/// Pop fade duration in ms.
const POP_FADE_MS: u32 = 180;

/// A destroyed cell fading out.
pub struct Pop {
    pub cell: (usize, usize),
    pub effect: Effect,
}

impl Pop {
    pub fn new(cell: (usize, usize), theme: &Theme) -> Self {
        let effect = fx::fade_to(theme.bg, theme.bg, (POP_FADE_MS, Interpolation::Linear));
        Self { cell, effect }
    }
}

/// Everything `draw` reads besides the field.
pub struct View<'a> {
    pub field: &'a PuzzleField,
    pub theme: &'a Theme,
    pub screen: Screen,
    pub paused: bool,
    pub quit_selected: QuitOption,
}

/// Board size in terminal cells, border included.
/// Saturates for fields wider or taller than any terminal.
fn board_outer_size(g: &FieldGeometry) -> (u16, u16) {
    let span = |cells: usize, per_cell: u16| {
        u16::try_from(cells)
            .unwrap_or(u16::MAX)
            .saturating_mul(per_cell)
            .saturating_add(2)
    };
    (span(g.width, CELL_COLS), span(g.playable_rows(), CELL_ROWS))
}

/// Smallest terminal (cols, rows) that fits board and sidebar.
pub fn required_terminal_size(g: &FieldGeometry) -> (u16, u16) {
    let (w, h) = board_outer_size(g);
    (w.saturating_add(SIDEBAR_WIDTH), h.max(18))
}

/// Draw the current screen. Pops whose cells are on the board get their effect advanced.
pub fn draw(
    frame: &mut Frame,
    view: &View,
    pops: &mut [Pop],
    pop_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(view.theme.outer_bg))
        .render(area, frame.buffer_mut());

    let (need_w, need_h) = required_terminal_size(&view.field.field_geometry());
    if area.width < need_w || area.height < need_h {
        draw_too_small(frame, view.theme, area, need_w, need_h);
        return;
    }

    let board = draw_game(frame, view, area);

    let delta = pop_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    *pop_process_time = Some(now);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    draw_pops(frame, board, pops, TfxDuration::from_millis(delta_ms));
    draw_blocks(frame, view, board);

    match view.screen {
        Screen::Playing if view.paused => draw_pause_overlay(frame, view.theme, area),
        Screen::Playing => {}
        Screen::QuitMenu => draw_quit_menu(frame, view.theme, view.quit_selected),
    }
}

fn draw_too_small(frame: &mut Frame, theme: &Theme, area: Rect, need_w: u16, need_h: u16) {
    let lines = vec![
        Line::from(Span::styled(
            " Terminal too small ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(Span::styled(
            format!(" need {}x{}, have {}x{} ", need_w, need_h, area.width, area.height),
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, frame.buffer_mut());
}

/// Lay out board + sidebar centred in `area`; draws the frame pieces and returns the board's inner rect.
fn draw_game(frame: &mut Frame, view: &View, area: Rect) -> Rect {
    let geometry = view.field.field_geometry();
    let (bw, bh) = board_outer_size(&geometry);
    let total_w = bw.saturating_add(SIDEBAR_WIDTH);

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(bh.max(18)),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(bw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    let board_outer = Rect {
        height: bh,
        ..inner[0]
    };

    let board = draw_board_frame(frame, view, board_outer);
    draw_sidebar(frame, view, inner[1]);
    board
}

/// Border, background and cursor band. Returns the inner board rect.
fn draw_board_frame(frame: &mut Frame, view: &View, area: Rect) -> Rect {
    let theme = view.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .style(Style::default().bg(theme.bg))
        .title(Span::styled(" Shiftrow ", Style::default().fg(theme.title)));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let band_top = board.y + view.field.cursor_row() as u16 * CELL_ROWS;
    let buf = frame.buffer_mut();
    for y in band_top..(band_top + CELL_ROWS).min(board.bottom()) {
        for x in board.left()..board.right() {
            buf[(x, y)].set_style(Style::default().bg(cursor_band_bg(theme)));
        }
        let marker = Style::default().fg(theme.title).bg(theme.bg);
        buf[(area.left(), y)].set_symbol("▶").set_style(marker);
        buf[(area.right() - 1, y)].set_symbol("◀").set_style(marker);
    }
    board
}

fn cursor_band_bg(theme: &Theme) -> Color {
    match theme.bg {
        Color::Rgb(r, g, b) => Color::Rgb(
            r.saturating_add(18),
            g.saturating_add(18),
            b.saturating_add(18),
        ),
        other => other,
    }
}

/// Terminal rect of a field cell inside the board.
fn cell_rect(board: Rect, cell: (usize, usize)) -> Rect {
    Rect {
        x: board.x + cell.0 as u16 * CELL_COLS,
        y: board.y + cell.1 as u16 * CELL_ROWS,
        width: CELL_COLS,
        height: CELL_ROWS,
    }
    .intersection(board)
}

fn draw_pops(frame: &mut Frame, board: Rect, pops: &mut [Pop], delta: TfxDuration) {
    let flash = Style::default().fg(Color::White).bg(Color::White);
    for pop in pops {
        let rect = cell_rect(board, pop.cell);
        let buf = frame.buffer_mut();
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                buf[(x, y)].set_symbol("▀").set_style(flash);
            }
        }
        frame.render_effect(&mut pop.effect, rect, delta);
    }
}

/// Block pixels on the board: face colour on the rim, accent inside.
/// `None` pixels keep whatever is underneath (background, cursor band, pops).
fn paint_blocks(view: &View, board: Rect) -> Vec<Option<Color>> {
    let geometry = view.field.field_geometry();
    let px_w = board.width as i32;
    let px_h = board.height as i32 * 2;
    let mut canvas = vec![None; (px_w * px_h) as usize];

    for b in view.field.snapshot_blocks() {
        let (face, accent) = if b.matched {
            (Color::White, view.theme.block_color(b.color))
        } else {
            (view.theme.block_color(b.color), view.theme.block_accent(b.color))
        };
        let w = CELL_COLS as i32;
        let ox = (b.position.x * w).div_euclid(geometry.cell_size);
        let oy = (b.position.y * CELL_PX).div_euclid(geometry.cell_size);
        for dy in 0..CELL_PX {
            for dx in 0..w {
                let (x, y) = (ox + dx, oy + dy);
                if x < 0 || y < 0 || x >= px_w || y >= px_h {
                    continue;
                }
                let rim = dx == 0 || dy == 0 || dx == w - 1 || dy == CELL_PX - 1;
                canvas[(y * px_w + x) as usize] = Some(if rim { face } else { accent });
            }
        }
    }
    canvas
}

fn draw_blocks(frame: &mut Frame, view: &View, board: Rect) {
    let canvas = paint_blocks(view, board);
    let px_w = board.width as usize;
    let buf = frame.buffer_mut();
    for row in 0..board.height {
        for col in 0..board.width {
            let top = canvas[(row as usize * 2) * px_w + col as usize];
            let bottom = canvas[(row as usize * 2 + 1) * px_w + col as usize];
            if top.is_none() && bottom.is_none() {
                continue;
            }
            let cell = &mut buf[(board.x + col, board.y + row)];
            let under = cell.bg;
            cell.set_symbol("▀").set_style(
                Style::default()
                    .fg(top.unwrap_or(under))
                    .bg(bottom.unwrap_or(under)),
            );
        }
    }
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let field = view.field;
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let dim_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);
    let geometry = field.field_geometry();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Field
            Constraint::Length(4), // Colours
            Constraint::Length(8), // Controls
        ])
        .split(area);

    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let seed = field
        .seed()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let field_lines = vec![
        stat("Phase:  ", field.current_phase().label().to_string()),
        stat("Cursor: ", format!("row {}", field.cursor_row() + 1)),
        stat("Size:   ", format!("{}x{}", geometry.width, geometry.playable_rows())),
        stat("Seed:   ", seed),
    ];
    Paragraph::new(Text::from(field_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .style(Style::default().bg(theme.bg)),
        )
        .render(chunks[0], frame.buffer_mut());

    let colours_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(theme.bg))
        .title(Span::styled("Colours", title_style));
    let colours_inner = colours_block.inner(chunks[1]);
    colours_block.render(chunks[1], frame.buffer_mut());
    draw_colour_strip(frame, theme, geometry.color_count, colours_inner);

    let controls = [
        ("↑↓ w/s k/j", "cursor"),
        ("←→ a/d h/l", "shift"),
        ("p", "pause"),
        ("r", "new board"),
        ("q / Esc", "quit"),
    ];
    let control_lines: Vec<Line> = controls
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{keys:<11}"), fg_style),
                Span::styled(*what, dim_style),
            ])
        })
        .collect();
    Paragraph::new(Text::from(control_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .style(Style::default().bg(theme.bg))
                .title(Span::styled("Controls", title_style)),
        )
        .render(chunks[2], frame.buffer_mut());
}

/// One swatch per colour in play.
fn draw_colour_strip(frame: &mut Frame, theme: &Theme, colors: u8, area: Rect) {
    let swatch_w = (area.width / colors.max(1) as u16).clamp(1, 4);
    for i in 0..colors {
        let r = Rect {
            x: area.x + i as u16 * swatch_w,
            y: area.y,
            width: swatch_w.saturating_sub(1).max(1),
            height: area.height.min(2),
        }
        .intersection(area);
        let face = theme.block_color(i);
        Paragraph::new("▀")
            .style(Style::default().fg(face).bg(darken(face, 50)))
            .render(r, frame.buffer_mut());
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P: resume    Q: quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .render(popup, frame.buffer_mut());
}

fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let area = frame.area();
    let qw = 24.min(area.width);
    let qh = 8.min(area.height);
    let quit_rect = Rect {
        x: area.x + area.width.saturating_sub(qw) / 2,
        y: area.y + area.height.saturating_sub(qh) / 2,
        width: qw,
        height: qh,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .style(Style::default().bg(theme.bg))
        .title(" Quit? ");
    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    for (i, opt) in QuitOption::ALL.iter().enumerate() {
        let label = opt.label();
        let style = if *opt == selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.bottom() {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftrow::FieldConfig;

    #[test]
    fn test_required_size_for_classic_field() {
        let g = FieldConfig::default().geometry();
        assert_eq!(board_outer_size(&g), (26, 26));
        assert_eq!(required_terminal_size(&g), (52, 26));
    }

    #[test]
    fn test_required_size_saturates_for_huge_fields() {
        let g = FieldConfig::new(20_000, 40_000, 4).with_animation(1, 1).geometry();
        assert_eq!(required_terminal_size(&g), (u16::MAX, u16::MAX));
    }

    #[test]
    fn test_cell_rect_is_clipped_to_board() {
        let board = Rect::new(1, 1, 8, 4);
        assert_eq!(cell_rect(board, (1, 1)), Rect::new(5, 3, 4, 2));
        assert_eq!(cell_rect(board, (2, 0)).area(), 0);
    }

    #[test]
    fn test_blocks_paint_at_rest_positions() {
        let field = PuzzleField::initialize(FieldConfig::new(2, 2, 1), 3).unwrap();
        let theme = Theme::default();
        let view = View {
            field: &field,
            theme: &theme,
            screen: Screen::Playing,
            paused: false,
            quit_selected: QuitOption::Resume,
        };
        let board = Rect::new(0, 0, 8, 2);
        let canvas = paint_blocks(&view, board);
        assert!(canvas.iter().all(Option::is_some));
        // Rim on the outside, accent inside.
        assert_eq!(canvas[0], Some(theme.block_color(0)));
        assert_eq!(canvas[8 + 1], Some(theme.block_accent(0)));
    }
}

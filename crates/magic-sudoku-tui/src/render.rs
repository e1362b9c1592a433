use crate::app::{App, MenuState, ScreenState};
use crate::stats::format_time;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use magic_sudoku_core::{Difficulty, GameStatus, Position};
use std::io;

/// Grid footprint in terminal cells
const GRID_WIDTH: u16 = 37;
const GRID_HEIGHT: u16 = 19;

const THICK_ROW: &str = "+===+===+===+===+===+===+===+===+===+";
const THIN_ROW: &str = "+---+---+---+---+---+---+---+---+---+";

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, Clear(ClearType::All))?;

    match app.screen_state {
        ScreenState::Win => render_win_screen(stdout, app, term_width, term_height)?,
        ScreenState::Stats => render_stats_screen(stdout, app, term_width)?,
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    // Grid on the left, info panel beside it
    let total_width = GRID_WIDTH + 25;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > GRID_HEIGHT + 8 { 2 } else { 1 };

    render_grid(stdout, app, start_x, start_y)?;
    render_info_panel(stdout, app, start_x + GRID_WIDTH + 3, start_y)?;
    render_controls(stdout, app, start_x, start_y + GRID_HEIGHT + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width, term_height)?;
    }

    if app.menu != MenuState::None {
        render_menu(stdout, app, term_width, term_height)?;
    }

    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print(THICK_ROW)
    )?;

    for row in 0..9 {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..9 {
            // Thick borders at 3x3 boundaries
            if col % 3 == 0 {
                execute!(stdout, SetForegroundColor(theme.box_border), Print("║"))?;
            } else {
                execute!(stdout, SetForegroundColor(theme.border), Print("│"))?;
            }
            render_cell(stdout, app, Position::new(row, col))?;
        }
        execute!(stdout, SetForegroundColor(theme.box_border), Print("║"))?;

        let sep = if row == 8 || (row + 1) % 3 == 0 {
            (THICK_ROW, theme.box_border)
        } else {
            (THIN_ROW, theme.border)
        };
        execute!(
            stdout,
            MoveTo(x, cell_y + 1),
            SetForegroundColor(sep.1),
            Print(sep.0)
        )?;
    }

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;
    let cell = app.session.cell_display(pos);
    let solved = app.session.status() == GameStatus::Solved;

    let bg = if cell.is_selected {
        theme.selected_bg
    } else if app.errors.contains(&pos) {
        theme.error_bg
    } else {
        theme.bg
    };

    let fg = if cell.is_given {
        theme.given
    } else if solved {
        theme.success
    } else {
        theme.filled
    };

    let text = match cell.value {
        0 => String::from("   "),
        v => format!(" {} ", v),
    };

    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(text),
        SetBackgroundColor(theme.bg)
    )?;
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("MAGIC SUDOKU")
    )?;

    let status = match session.status() {
        GameStatus::NotStarted => "Select a cell to start",
        GameStatus::InProgress => "In progress",
        GameStatus::Solved => "Solved!",
    };
    let status_color = if session.status() == GameStatus::Solved {
        theme.success
    } else {
        theme.info
    };

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.fg),
        Print(format!("Difficulty: {}", session.difficulty())),
        MoveTo(x, y + 3),
        SetForegroundColor(theme.fg),
        Print(format!("Time:       {}", session.elapsed_string())),
        MoveTo(x, y + 4),
        SetForegroundColor(theme.fg),
        Print(format!("Open cells: {}", session.empty_count())),
        MoveTo(x, y + 6),
        SetForegroundColor(status_color),
        Print(status)
    )?;

    let best = app.stats.for_difficulty(session.difficulty()).best_time_secs;
    if let Some(best) = best {
        execute!(
            stdout,
            MoveTo(x, y + 8),
            SetForegroundColor(theme.info),
            Print(format!("Best {}: {}", session.difficulty(), format_time(best)))
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let hints: [&[(&str, &str)]; 2] = [
        &[
            ("arrows/hjkl", "move"),
            ("1-9", "place"),
            ("0/del", "clear"),
            ("enter/c", "check"),
        ],
        &[
            ("n", "new game"),
            ("t", "theme"),
            ("i", "stats"),
            ("S/L", "save/load"),
            ("q", "quit"),
        ],
    ];

    for (line, row) in hints.iter().enumerate() {
        execute!(stdout, MoveTo(x, y + line as u16))?;
        for (key, desc) in row.iter() {
            execute!(
                stdout,
                SetForegroundColor(app.theme.key),
                Print(format!("[{}] ", key)),
                SetForegroundColor(app.theme.info),
                Print(format!("{}  ", desc))
            )?;
        }
    }
    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let x = (term_width.saturating_sub(msg.len() as u16)) / 2;
    execute!(
        stdout,
        MoveTo(x, term_height.saturating_sub(2)),
        SetForegroundColor(app.theme.key),
        Print(msg)
    )?;
    Ok(())
}

fn render_menu(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let levels = Difficulty::all_levels();

    let width: u16 = 24;
    let height = levels.len() as u16 + 4;
    let x = (term_width.saturating_sub(width)) / 2;
    let y = (term_height.saturating_sub(height)) / 2;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print(format!("+{}+", "-".repeat(width as usize - 2))),
        MoveTo(x, y + 1),
        Print("|"),
        SetForegroundColor(theme.key),
        Print(format!("{:^width$}", "New game", width = width as usize - 2)),
        SetForegroundColor(theme.box_border),
        Print("|")
    )?;

    for (index, level) in levels.iter().enumerate() {
        let selected = index == app.menu_selection;
        let marker = if selected { "> " } else { "  " };
        let color = if selected { theme.key } else { theme.fg };
        execute!(
            stdout,
            MoveTo(x, y + 2 + index as u16),
            SetForegroundColor(theme.box_border),
            Print("|"),
            SetForegroundColor(color),
            Print(format!(
                "{:width$}",
                format!(" {}{}", marker, level),
                width = width as usize - 2
            )),
            SetForegroundColor(theme.box_border),
            Print("|")
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, y + 2 + levels.len() as u16),
        Print(format!("|{:width$}|", "", width = width as usize - 2)),
        MoveTo(x, y + 3 + levels.len() as u16),
        Print(format!("+{}+", "-".repeat(width as usize - 2)))
    )?;

    Ok(())
}

fn render_stats_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let x = (term_width.saturating_sub(52)) / 2;

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, 2),
        SetForegroundColor(theme.key),
        Print("STATISTICS"),
        MoveTo(x, 4),
        SetForegroundColor(theme.info),
        Print(format!(
            "{:<10} {:>8} {:>6} {:>8} {:>8}",
            "Level", "Started", "Won", "Best", "Average"
        ))
    )?;

    for (index, &difficulty) in Difficulty::all_levels().iter().enumerate() {
        let stats = app.stats.for_difficulty(difficulty);
        let best = stats
            .best_time_secs
            .map(format_time)
            .unwrap_or_else(|| String::from("--:--"));
        let avg = stats
            .avg_time_secs()
            .map(format_time)
            .unwrap_or_else(|| String::from("--:--"));

        execute!(
            stdout,
            MoveTo(x, 5 + index as u16),
            SetForegroundColor(theme.fg),
            Print(format!(
                "{:<10} {:>8} {:>6} {:>8} {:>8}",
                difficulty.to_string(),
                stats.games_started,
                stats.games_won,
                best,
                avg
            ))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, 6 + Difficulty::all_levels().len() as u16 + 1),
        SetForegroundColor(theme.info),
        Print("[esc] back")
    )?;

    Ok(())
}

fn render_win_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let x = if term_width > GRID_WIDTH {
        (term_width - GRID_WIDTH) / 2
    } else {
        1
    };
    let y = if term_height > GRID_HEIGHT + 6 { 2 } else { 1 };

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print(THICK_ROW)
    )?;

    // Solved board with the celebration wave sweeping over it
    for row in 0..9 {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..9 {
            let border = if col % 3 == 0 { "║" } else { "│" };
            let border_color = if col % 3 == 0 {
                theme.box_border
            } else {
                theme.border
            };
            execute!(stdout, SetForegroundColor(border_color), Print(border))?;

            let value = app.session.working().get(Position::new(row, col));
            let color = app
                .win_screen
                .cell_color(row, col)
                .unwrap_or(theme.fg);
            execute!(
                stdout,
                SetForegroundColor(color),
                Print(format!(" {} ", value))
            )?;
        }
        execute!(stdout, SetForegroundColor(theme.box_border), Print("║"))?;

        let sep = if row == 8 || (row + 1) % 3 == 0 {
            (THICK_ROW, theme.box_border)
        } else {
            (THIN_ROW, theme.border)
        };
        execute!(
            stdout,
            MoveTo(x, cell_y + 1),
            SetForegroundColor(sep.1),
            Print(sep.0)
        )?;
    }

    let banner_y = y + GRID_HEIGHT + 1;
    if app.win_screen.sweep_done() {
        let banner = format!("SOLVED in {}", app.session.elapsed_string());
        let banner_x = x + (GRID_WIDTH.saturating_sub(banner.len() as u16)) / 2;
        execute!(
            stdout,
            MoveTo(banner_x, banner_y),
            SetForegroundColor(theme.success),
            Print(banner)
        )?;
    }

    let hint = "[enter] new game  [i] stats  [q] quit";
    let hint_x = x + (GRID_WIDTH.saturating_sub(hint.len() as u16)) / 2;
    execute!(
        stdout,
        MoveTo(hint_x, banner_y + 2),
        SetForegroundColor(theme.info),
        Print(hint)
    )?;

    Ok(())
}

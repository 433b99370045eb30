// src/chart/tui.rs
//! Full-screen bar chart on the alternate screen.

use super::{IpTally, CHART_TITLE, X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::error::{DmarcError, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use std::io::{self, IsTerminal};
use std::time::Duration;

const MAX_BAR_WIDTH: u16 = 15;
/// Fits a two-digit rank label.
const MIN_BAR_WIDTH: u16 = 2;
const MIN_LEGEND_WIDTH: u16 = 16;
const BAR_GAP: u16 = 1;

/// Shows the chart until the user presses `q`, `Esc` or `Enter`.
///
/// # Errors
/// Returns `ChartRender` if stdout is not a terminal or terminal setup fails.
pub fn show(bars: &[IpTally]) -> Result<()> {
    if !io::stdout().is_terminal() {
        return Err(DmarcError::ChartRender("stdout is not a terminal".into()));
    }

    setup_terminal()?;
    let result = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(chart_err)
        .and_then(|mut term| run(&mut term, bars));
    let restored = restore_terminal();

    result.and(restored)
}

fn setup_terminal() -> Result<()> {
    enable_raw_mode().map_err(chart_err)?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(chart_err(e));
    }
    Ok(())
}

fn restore_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).map_err(chart_err)?;
    disable_raw_mode().map_err(chart_err)
}

fn run<B: Backend>(terminal: &mut Terminal<B>, bars: &[IpTally]) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, bars)).map_err(chart_err)?;

        if event::poll(Duration::from_millis(250)).map_err(chart_err)? {
            if let Event::Key(key) = event::read().map_err(chart_err)? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
                {
                    return Ok(());
                }
            }
        }
    }
}

pub fn draw(f: &mut Frame, bars: &[IpTally]) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Chart + legend
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    let legend = legend_lines(bars);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(legend_width(&legend, rows[0].width)),
        ])
        .split(rows[0]);

    f.render_widget(bar_chart(bars, columns[0].width), columns[0]);
    f.render_widget(
        Paragraph::new(legend).block(Block::default().borders(Borders::ALL).title(X_AXIS_LABEL)),
        columns[1],
    );

    let footer = Paragraph::new(Line::from(format!(
        "x: {X_AXIS_LABEL} (numbered, see legend)   y: {Y_AXIS_LABEL}   [q] close"
    )))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, rows[1]);
}

/// Bars are labelled by rank; an IP rarely fits under a bar.
fn bar_chart(bars: &[IpTally], width: u16) -> BarChart<'static> {
    let data: Vec<Bar<'static>> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::default()
                .value(b.total)
                .label(Line::from((i + 1).to_string()))
                .text_value(b.total.to_string())
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{CHART_TITLE} (top {})", bars.len())),
        )
        .data(BarGroup::default().bars(&data))
        .bar_width(bar_width(bars.len(), width))
        .bar_gap(BAR_GAP)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
}

fn legend_lines(bars: &[IpTally]) -> Vec<Line<'static>> {
    let ip_width = bars.iter().map(|b| b.label().len()).max().unwrap_or(0);
    let rank_width = bars.len().to_string().len();
    bars.iter()
        .enumerate()
        .map(|(i, b)| {
            Line::from(format!(
                "{:>rank_width$}  {:<ip_width$}  {}",
                i + 1,
                b.label(),
                b.total
            ))
        })
        .collect()
}

/// Room for the longest legend line plus borders, capped at half the area.
fn legend_width(lines: &[Line<'_>], area_width: u16) -> u16 {
    let longest = lines.iter().map(Line::width).max().unwrap_or(0);
    let wanted = u16::try_from(longest).unwrap_or(u16::MAX).saturating_add(2);
    wanted.max(MIN_LEGEND_WIDTH).min(area_width / 2)
}

/// Widest bar that lets every bar fit inside the bordered area.
fn bar_width(count: usize, area_width: u16) -> u16 {
    let inner = area_width.saturating_sub(2);
    let count = u16::try_from(count.max(1)).unwrap_or(u16::MAX);
    (inner / count).saturating_sub(BAR_GAP).clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH)
}

fn chart_err(e: io::Error) -> DmarcError {
    DmarcError::ChartRender(e.to_string())
}

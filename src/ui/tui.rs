// src/ui/tui.rs

use std::{io, time::Instant};

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Tabs, Wrap},
    Terminal,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    llm::prompt::{self, PromptTarget},
    state::{AppState, LogLevel, SourceSelection, Tab},
};

const BG_MAIN: Color = Color::Rgb(22, 22, 22);
const BG_INPUT: Color = Color::Rgb(40, 40, 40);

const GREEN: Color = Color::Rgb(0, 220, 140);
const DIM: Color = Color::Rgb(140, 140, 140);

const HEADER: [&str; 6] = [
    "███████╗ ██████╗███████╗███╗   ██╗ ██████╗ ███████╗███╗   ██╗",
    "██╔════╝██╔════╝██╔════╝████╗  ██║██╔════╝ ██╔════╝████╗  ██║",
    "███████╗██║     █████╗  ██╔██╗ ██║██║  ███╗█████╗  ██╔██╗ ██║",
    "╚════██║██║     ██╔══╝  ██║╚██╗██║██║   ██║██╔══╝  ██║╚██╗██║",
    "███████║╚██████╗███████╗██║ ╚████║╚██████╔╝███████╗██║ ╚████║",
    "╚══════╝ ╚═════╝╚══════╝╚═╝  ╚═══╝ ╚═════╝ ╚══════╝╚═╝  ╚═══╝",
];

pub fn draw_ui<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
) -> io::Result<()> {
    terminal.draw(|f| {
        let area = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6), // HEADER
                Constraint::Length(1), // TABS
                Constraint::Min(5),    // TAB BODY
                Constraint::Length(8), // LOG PANE
                Constraint::Length(3), // INPUT
                Constraint::Length(1), // STATUS + HINTS
            ])
            .split(area);

        render_header(f, chunks[0]);
        render_tabs(f, chunks[1], state);
        render_body(f, chunks[2], state);
        render_logs(f, chunks[3], state);
        render_input(f, chunks[4], state);
        render_status(f, chunks[5], state);
    })?;

    Ok(())
}

fn render_header(f: &mut ratatui::Frame, area: Rect) {
    let lines = HEADER.iter().map(|l| {
        Line::from(Span::styled(
            *l,
            Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
        ))
    });

    f.render_widget(
        Paragraph::new(lines.collect::<Vec<_>>())
            .alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn render_tabs(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let titles = [Tab::Setup, Tab::Scenarios, Tab::Automation]
        .iter()
        .map(|t| Line::from(t.title()))
        .collect::<Vec<_>>();

    f.render_widget(
        Tabs::new(titles)
            .select(state.ui.tab.index())
            .style(Style::default().fg(DIM).bg(BG_MAIN))
            .highlight_style(Style::default().fg(GREEN).add_modifier(Modifier::BOLD)),
        area,
    );
}

fn render_body(f: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    f.render_widget(Block::default().style(Style::default().bg(BG_MAIN)), area);

    let padded = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let lines = match state.ui.tab {
        Tab::Setup => setup_lines(state),
        Tab::Scenarios => text_lines(
            &state.scenarios,
            "No scenarios yet. Configure tab 1, then /generate.",
        ),
        Tab::Automation => automation_lines(state),
    };

    let height = padded.height.max(1) as usize;
    let max_scroll = lines.len().saturating_sub(height);
    state.ui.body_max_scroll = max_scroll;

    let scroll = if state.ui.body_scroll == usize::MAX {
        max_scroll
    } else {
        state.ui.body_scroll.min(max_scroll)
    };

    f.render_widget(
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false }),
        padded,
    );
}

fn setup_lines(state: &AppState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let field = |label: &str, value: String| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:18}", label), Style::default().fg(DIM)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };

    lines.push(field("Model", state.model.clone()));
    lines.push(field(
        "Automation model",
        if state.automation_model.is_empty() {
            format!("{} (same as model)", state.model)
        } else {
            state.automation_model.clone()
        },
    ));
    lines.push(field(
        "Test name",
        if state.test_name.is_empty() {
            "test".into()
        } else {
            state.test_name.clone()
        },
    ));
    lines.push(field("Source type", state.source.as_str().to_string()));
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        format!("Files ({})", state.files.len()),
        Style::default().fg(GREEN),
    )));
    if state.files.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none — /add <path or glob>",
            Style::default().fg(DIM),
        )));
    } else {
        for (i, path) in state.files.paths().iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("  {:3}. {}", i + 1, path.display()),
                Style::default().fg(Color::White),
            )));
        }
    }
    lines.push(Line::default());

    lines.push(Line::from(Span::styled(
        "Scenario prompt preview",
        Style::default().fg(GREEN),
    )));
    let preview = prompt::build_prompt(state.source, PromptTarget::Scenarios);
    for l in preview.lines() {
        lines.push(Line::from(Span::styled(
            l.to_string(),
            Style::default().fg(DIM),
        )));
    }

    lines
}

fn text_lines(text: &str, placeholder: &str) -> Vec<Line<'static>> {
    if text.is_empty() {
        return vec![Line::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(DIM),
        ))];
    }

    text.lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White))))
        .collect()
}

fn automation_lines(state: &AppState) -> Vec<Line<'static>> {
    if state.source == SourceSelection::Analysis {
        return prompt::AUTOMATION_UNAVAILABLE
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Yellow))))
            .collect();
    }

    if state.automation_code.is_empty() {
        let mut lines = vec![Line::from(Span::styled(
            "No automation code yet. Save scenarios on tab 2, then /automation.",
            Style::default().fg(DIM),
        ))];
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Automation prompt preview",
            Style::default().fg(GREEN),
        )));
        let preview = prompt::build_prompt(state.source, PromptTarget::Automation);
        for l in preview.lines() {
            lines.push(Line::from(Span::styled(
                l.to_string(),
                Style::default().fg(DIM),
            )));
        }
        return lines;
    }

    text_lines(&state.automation_code, "")
}

fn render_logs(f: &mut ratatui::Frame, area: Rect, state: &mut AppState) {
    f.render_widget(Block::default().style(Style::default().bg(BG_MAIN)), area);

    let padded = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(1),
    };

    let mut lines: Vec<Line> = Vec::new();
    for log in state.logs.iter() {
        let color = match log.level {
            LogLevel::Success => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
            LogLevel::Info => Color::Gray,
        };

        lines.push(Line::from(Span::styled(
            log.text.clone(),
            Style::default().fg(color),
        )));
    }

    let height = padded.height.max(1) as usize;
    let max_scroll = lines.len().saturating_sub(height);
    state.ui.log_max_scroll = max_scroll;

    let scroll = if state.ui.log_scroll == usize::MAX {
        max_scroll
    } else {
        state.ui.log_scroll.min(max_scroll)
    };

    f.render_widget(
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .wrap(Wrap { trim: false }),
        padded,
    );
}

fn render_input(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    f.render_widget(Block::default().style(Style::default().bg(BG_INPUT)), area);

    let input_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: 1,
    };

    let mut spans = Vec::new();
    spans.push(Span::raw("  "));
    spans.push(Span::styled(">_ ", Style::default().fg(GREEN)));
    spans.push(Span::styled(
        state.ui.input.clone(),
        Style::default().fg(Color::White),
    ));

    if let Some(ac) = &state.ui.autocomplete {
        if let Some(rest) = ac.strip_prefix(state.ui.input.as_str()) {
            spans.push(Span::styled(rest.to_string(), Style::default().fg(DIM)));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), input_area);

    let cursor_x = input_area.x + 5 + state.ui.input.width() as u16;
    f.set_cursor(cursor_x, input_area.y);
}

fn render_status(f: &mut ratatui::Frame, area: Rect, state: &AppState) {
    let pulse = running_pulse(state.ui.spinner_started_at);
    let left = match (&state.ui.hint, &state.ui.status, pulse) {
        (Some(hint), _, _) => hint.clone(),
        (None, Some(status), Some(p)) => format!("{} {}", p, status),
        (None, Some(status), None) => status.clone(),
        (None, None, Some(p)) => p,
        (None, None, None) => String::new(),
    };

    let right = vec![
        Span::styled("[esc]", Style::default().fg(GREEN)),
        Span::styled(" exit  ", Style::default().fg(DIM)),
        Span::styled("[enter]", Style::default().fg(GREEN)),
        Span::styled(" run  ", Style::default().fg(DIM)),
        Span::styled("[tab]", Style::default().fg(GREEN)),
        Span::styled(" complete  ", Style::default().fg(DIM)),
        Span::styled("[shift+tab]", Style::default().fg(GREEN)),
        Span::styled(" next tab", Style::default().fg(DIM)),
    ];

    let right_width: usize = right.iter().map(|s| s.content.width()).sum();
    let spacing = area
        .width
        .saturating_sub(left.width() as u16 + right_width as u16)
        .max(1) as usize;

    let mut spans = Vec::new();
    spans.push(Span::styled(left, Style::default().fg(GREEN)));
    spans.push(Span::raw(" ".repeat(spacing)));
    spans.extend(right);

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(BG_MAIN)),
        area,
    );
}

fn running_pulse(start: Option<Instant>) -> Option<String> {
    let start = start?;
    let t = (start.elapsed().as_millis() / 120) as usize;

    let pos = match t % 6 {
        0 => 0,
        1 => 1,
        2 => 2,
        3 => 3,
        4 => 2,
        _ => 1,
    };

    let tail = if pos == 0 { 3 } else { pos - 1 };

    let mut s = String::with_capacity(4);
    for i in 0..4 {
        if i == pos {
            s.push('■');
        } else if i == tail {
            s.push('▪');
        } else {
            s.push('·');
        }
    }

    Some(s)
}

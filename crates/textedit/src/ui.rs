use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::ops::Range;

use crate::app::App;
use crate::session::DialogKind;
use crate::status_manager::MessageType;
use crate::text_width;
use crate::theme;
use crate::ui_state::Mode;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(1), // Menu
            Constraint::Min(0),    // Text area
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    f.render_widget(Block::default().style(theme::text()), f.size());

    draw_title_bar(f, app, chunks[0]);
    draw_menu(f, chunks[1]);
    draw_text_area(f, app, chunks[2]);
    draw_status_bar(f, app, chunks[3]);

    match app.mode() {
        Mode::SavePrompt => draw_save_prompt(f),
        Mode::RecentFiles => draw_recent_files(f, app),
        Mode::Dialog => draw_dialog(f, app),
        Mode::Editing | Mode::Input(_) => {}
    }
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(app.session.title())
        .style(theme::title())
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn draw_menu(f: &mut Frame, area: Rect) {
    let entries = [
        ("^N", "New"),
        ("^O", "Open"),
        ("^S", "Save"),
        ("^E", "Recent"),
        ("^F", "Find"),
        ("^R", "Replace"),
        ("^W", "Count"),
        ("^+/-", "Zoom"),
        ("^Q", "Quit"),
    ];

    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (keys, label) in entries {
        spans.push(Span::styled(
            format!(" {}", keys),
            theme::bar().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {} ", label), theme::bar()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(theme::bar()), area);
}

fn draw_text_area(f: &mut Frame, app: &mut App, area: Rect) {
    app.text_area = area;
    app.session
        .editor_mut()
        .set_viewport_height(usize::from(area.height));

    let editor = app.session.editor();
    let (cursor_line, cursor_col) = editor.cursor_position();
    let cursor_x = text_width::char_index_to_col(&editor.line_text(cursor_line), cursor_col);

    // Keep the cursor column on screen
    let width = usize::from(area.width).max(1);
    if cursor_x < app.scroll_x {
        app.scroll_x = cursor_x;
    } else if cursor_x >= app.scroll_x + width {
        app.scroll_x = cursor_x + 1 - width;
    }

    let editor = app.session.editor();
    let selection = editor.selection();
    let highlights = app.session.highlights();
    let base = if app.session.has_default_text() {
        theme::placeholder()
    } else {
        theme::text()
    };

    let lines: Vec<Line> = editor
        .viewport_lines()
        .into_iter()
        .map(|(index, text)| {
            render_line(
                &text,
                editor.line_start(index),
                app.scroll_x,
                width,
                base,
                selection.as_ref(),
                highlights,
            )
        })
        .collect();

    f.render_widget(Paragraph::new(lines).style(theme::text()), area);

    if !app.ui_state.is_editing() {
        return;
    }
    let row = cursor_line.checked_sub(editor.viewport_offset());
    if let Some(row) = row.filter(|r| *r < usize::from(area.height)) {
        let x = area.x + (cursor_x - app.scroll_x) as u16;
        let y = area.y + row as u16;
        f.set_cursor(x, y);
    }
}

/// Styled cells of one line. Tabs are expanded, the selection wins over
/// find highlights, and everything left of `scroll_x` is skipped.
fn render_line(
    text: &str,
    line_start: usize,
    scroll_x: usize,
    width: usize,
    base: Style,
    selection: Option<&Range<usize>>,
    highlights: &[Range<usize>],
) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = base;
    let mut col = 0;

    for (i, c) in text.chars().enumerate() {
        let idx = line_start + i;
        let cell_width = text_width::char_width(c, col);
        let start = col;
        col += cell_width;
        if col <= scroll_x {
            continue;
        }
        if start >= scroll_x + width {
            break;
        }

        let style = if selection.is_some_and(|r| r.contains(&idx)) {
            theme::selection()
        } else if is_highlighted(highlights, idx) {
            theme::find_match()
        } else {
            base
        };

        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;

        if c == '\t' {
            // Only the visible part of a tab that straddles scroll_x
            let visible = col - start.max(scroll_x);
            run.extend(std::iter::repeat(' ').take(visible));
        } else if start < scroll_x {
            // Wide char cut by the left edge
            run.push(' ');
        } else {
            run.push(c);
        }
    }

    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

/// `highlights` is sorted and non-overlapping, as `find_all` returns it.
fn is_highlighted(highlights: &[Range<usize>], idx: usize) -> bool {
    let i = highlights.partition_point(|r| r.end <= idx);
    highlights.get(i).is_some_and(|r| r.start <= idx)
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    if let Mode::Input(kind) = app.mode() {
        let prompt = Line::from(vec![
            Span::styled(kind.label(), theme::bar().add_modifier(Modifier::BOLD)),
            Span::styled(app.ui_state.input.clone(), theme::bar()),
        ]);
        f.render_widget(Paragraph::new(prompt).style(theme::bar()), area);

        let x = area.x
            + (text_width::str_width(kind.label()) + text_width::str_width(&app.ui_state.input))
                .min(usize::from(area.width.saturating_sub(1))) as u16;
        f.set_cursor(x, area.y);
        return;
    }

    let right = format!(
        "{}  Font {}  ",
        app.session.status().cursor_label(),
        app.session.font_size()
    );
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(text_width::str_width(&right) as u16),
        ])
        .split(area);

    let status = app.session.status();
    let message_style = match status.current_message().map(|m| m.message_type) {
        Some(MessageType::Error) => theme::bar().fg(theme::ERROR),
        Some(MessageType::Warning) => theme::bar().fg(theme::WARNING),
        Some(MessageType::Success) => theme::bar().fg(theme::SUCCESS),
        Some(MessageType::Info) | None => theme::bar(),
    };

    f.render_widget(
        Paragraph::new(format!(" {}", status.text())).style(message_style),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(right)
            .style(theme::bar())
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_save_prompt(f: &mut Frame) {
    let area = centered_rect(60, 7, f.size());
    let text = vec![
        Line::from(""),
        Line::from("Do you want to save changes to the current document?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y]", theme::bar().add_modifier(Modifier::BOLD)),
            Span::raw(" Save   "),
            Span::styled("[n]", theme::bar().add_modifier(Modifier::BOLD)),
            Span::raw(" Don't Save   "),
            Span::styled("[c]", theme::bar().add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ]),
    ];

    draw_popup(f, area, " Save Changes? ", text, theme::HIGHLIGHT);
}

fn draw_recent_files(f: &mut Frame, app: &App) {
    let recent = app.session.recent_files();
    let height = (recent.len() as u16).saturating_add(4);
    let area = centered_rect(70, height, f.size());

    let mut text = vec![Line::from("")];
    for (row, (_, path)) in recent.iter().enumerate() {
        let style = if row == app.ui_state.recent_index {
            theme::selection().add_modifier(Modifier::BOLD)
        } else {
            theme::bar()
        };
        text.push(Line::from(Span::styled(
            format!(" {}. {}", row + 1, path.display()),
            style,
        )));
    }

    draw_popup(f, area, " Recent Files ", text, theme::HIGHLIGHT);
}

fn draw_dialog(f: &mut Frame, app: &App) {
    let Some(dialog) = app.session.dialog() else {
        return;
    };

    let mut text = vec![Line::from("")];
    text.extend(dialog.message.lines().map(|l| Line::from(format!(" {}", l))));
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        " Press any key to close",
        theme::bar().add_modifier(Modifier::ITALIC),
    )));

    let height = (text.len() as u16).saturating_add(2);
    let area = centered_rect(60, height, f.size());
    let border = match dialog.kind {
        DialogKind::Error => theme::ERROR,
        DialogKind::Info => theme::HIGHLIGHT,
    };
    draw_popup(f, area, &format!(" {} ", dialog.title), text, border);
}

fn draw_popup(
    f: &mut Frame,
    area: Rect,
    title: &str,
    text: Vec<Line<'_>>,
    border: ratatui::style::Color,
) {
    let popup = Paragraph::new(text)
        .style(theme::bar())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(border)),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// A `width`% wide, `height` rows tall rectangle centred in `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = (u32::from(area.width) * u32::from(width.min(100)) / 100) as u16;
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

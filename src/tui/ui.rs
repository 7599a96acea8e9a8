use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap},
};

use crate::board::{Focus, PendingChange};
use crate::store::{Comment, Task, TaskStatus};

use super::app::{App, InputMode};
use super::form;
use super::theme::Theme;

const TABLE_WIDTHS: [Constraint; 6] = [
    Constraint::Length(5),
    Constraint::Fill(3),
    Constraint::Length(9),
    Constraint::Length(12),
    Constraint::Length(11),
    Constraint::Fill(2),
];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [title, search, tabs, table, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_title(frame, app, title);
    form::render_input(
        frame,
        search,
        "Search",
        (app.filter_input.as_str(), app.filter_cursor),
        app.input_mode == InputMode::Filter,
        "Press / to filter by id, name, priority, status or label",
        &app.theme,
    );
    draw_tabs(frame, app, tabs);
    draw_table(frame, app, table);
    draw_hints(frame, app, hints);

    let mut chips = Vec::new();
    if let Some(task) = app.board.selected_task() {
        chips = draw_detail(frame, app, task);
        if let Some(change) = app.board.pending() {
            draw_confirm(frame, &app.theme, task, change);
        }
    }
    app.status_chips = chips;

    if app.input_mode == InputMode::Help {
        draw_help(frame, app);
    }
}

fn draw_title(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = Line::from(vec![
        Span::styled(" Taskboard ", theme.accent()),
        Span::styled(
            format!("{} tasks", app.board.store().tasks.len()),
            theme.secondary(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let titles: Vec<Line> = TaskStatus::ALL
        .iter()
        .map(|&status| {
            Line::from(format!(
                " {} ({}) ",
                status.label(),
                app.board.status_count(status)
            ))
        })
        .collect();
    let selected = TaskStatus::ALL
        .iter()
        .position(|&s| s == app.board.active_tab());

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(theme.tab_inactive_style())
        .highlight_style(theme.tab_active_style())
        .divider(Span::styled("│", theme.secondary()));
    frame.render_widget(tabs, area);
}

fn draw_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.board.focus() == Focus::Table && app.input_mode == InputMode::Normal;
    let pages = app.board.pages();
    let visible = app.board.visible();
    let hovered = app.board.hovered();

    let footer = if pages.is_loading() {
        Some(Span::styled(
            " Loading more tasks... ",
            Style::default().fg(app.theme.spinner),
        ))
    } else if !pages.has_more() && !visible.is_empty() {
        Some(Span::styled(" No more tasks to load ", app.theme.secondary()))
    } else {
        None
    };

    let mut block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.board.active_tab().label()),
            app.theme.accent(),
        ))
        .borders(Borders::ALL)
        .border_style(if focused {
            app.theme.focused_border()
        } else {
            app.theme.unfocused_border()
        });
    if let Some(footer) = footer {
        block = block.title_bottom(Line::from(footer).right_aligned());
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [header_area, rows_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    if visible.is_empty() {
        let message = if pages.is_loading() {
            "  Loading..."
        } else if !app.board.is_filtered() {
            "  No tasks with this status."
        } else {
            "  No loaded tasks match the search."
        };
        frame.render_widget(Paragraph::new(message).style(app.theme.secondary()), rows_area);
    }

    let header = Row::new(["ID", "Name", "Priority", "Status", "Created", "Labels"])
        .style(app.theme.header_style());
    frame.render_widget(Table::new(Vec::<Row>::new(), TABLE_WIDTHS).header(header), header_area);

    app.table.layout(rows_area, visible.len(), hovered);
    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(app.table.offset)
        .take(usize::from(rows_area.height))
        .map(|(i, task)| task_row(task, &app.theme, i == hovered))
        .collect();
    frame.render_widget(Table::new(rows, TABLE_WIDTHS), rows_area);
}

fn task_row<'a>(task: &'a Task, theme: &Theme, hovered: bool) -> Row<'a> {
    let labels: Vec<Span> = task
        .labels
        .iter()
        .flat_map(|l| [Span::styled(format!("[{l}]"), theme.label_style()), Span::raw(" ")])
        .collect();
    let style = if hovered {
        theme.primary().patch(theme.hover_style())
    } else {
        theme.primary()
    };
    Row::new(vec![
        Cell::from(task.id.to_string()),
        Cell::from(task.name.as_str()),
        Cell::from(Span::styled(task.priority.as_str(), theme.priority_style(task.priority))),
        Cell::from(Span::styled(task.status.label(), theme.task_status_style(task.status))),
        Cell::from(local_date(task.created_at)),
        Cell::from(Line::from(labels)),
    ])
    .style(style)
}

fn local_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn draw_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = match (app.input_mode, app.board.focus()) {
        (InputMode::Help, _) => &[("Esc", "close help")],
        (InputMode::Filter, _) => &[
            ("Enter", "done"),
            ("Esc", "clear"),
            ("Ctrl+U", "clear line"),
        ],
        (InputMode::Comment, _) => &[("Enter", "add comment"), ("Esc", "stop editing")],
        (InputMode::Normal, Focus::Table) => &[
            ("↑↓", "move"),
            ("Enter", "open"),
            ("Tab", "status"),
            ("/", "search"),
            ("m", "load more"),
            ("?", "help"),
            ("q", "quit"),
        ],
        (InputMode::Normal, Focus::Detail) => &[
            ("←→", "prev/next"),
            ("1-3", "status"),
            ("c", "comment"),
            ("Esc", "close"),
        ],
        (InputMode::Normal, Focus::Confirm) => &[("y", "proceed"), ("n", "cancel")],
    };
    form::render_hints(frame, area, hints, &app.theme);
}

fn cells(span: &Span<'_>) -> u16 {
    u16::try_from(span.width()).unwrap_or(u16::MAX)
}

/// Returns the screen area of each status chip.
fn draw_detail(frame: &mut Frame, app: &App, task: &Task) -> Vec<(Rect, TaskStatus)> {
    let theme = &app.theme;
    let area = frame.area();
    let title = Line::from(Span::styled(format!(" Task #{} ", task.id), theme.accent()));
    let border = if app.board.focus() == Focus::Detail {
        Style::default().fg(theme.detail_border)
    } else {
        theme.unfocused_border()
    };
    let inner = form::render_modal(
        frame,
        title,
        border,
        area.width.saturating_sub(8).min(90),
        area.height.saturating_sub(4),
    );

    let [fields, shortcuts, comment_box, comments] = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(inner);

    let label = |name: &'static str| Span::styled(format!("{name:<10}"), theme.secondary());
    let labels = task.labels.join(", ");
    let lines = vec![
        Line::from(vec![
            label("Name"),
            Span::styled(task.name.as_str(), theme.primary().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            label("Priority"),
            Span::styled(task.priority.as_str(), theme.priority_style(task.priority)),
        ]),
        Line::from(vec![
            label("Status"),
            Span::styled(task.status.label(), theme.task_status_style(task.status)),
        ]),
        Line::from(vec![label("Created"), Span::raw(local_time(task.created_at))]),
        Line::from(vec![label("Updated"), Span::raw(local_time(task.updated_at))]),
        Line::from(vec![label("Labels"), Span::styled(labels, theme.label_style())]),
    ];
    frame.render_widget(Paragraph::new(lines), fields);

    let prompt = Span::styled("Change status: ", theme.secondary());
    // Text sits on the line below the rule.
    let row = shortcuts.y.saturating_add(1);
    let mut x = shortcuts.x.saturating_add(cells(&prompt));
    let mut chips = Vec::new();
    let mut spans = vec![prompt];
    for (i, status) in TaskStatus::ALL.iter().enumerate() {
        let style = if *status == task.status {
            theme.task_status_style(*status).add_modifier(Modifier::REVERSED)
        } else {
            theme.task_status_style(*status)
        };
        let chip = Span::styled(format!(" {}-{} ", i + 1, status.label()), style);
        let width = cells(&chip);
        let hit = Rect::new(x, row, width, 1).intersection(shortcuts);
        if !hit.is_empty() {
            chips.push((hit, *status));
        }
        x = x.saturating_add(width).saturating_add(1);
        spans.push(chip);
        spans.push(Span::raw(" "));
    }
    let rule = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.unfocused_border());
    frame.render_widget(Paragraph::new(Line::from(spans)).block(rule), shortcuts);

    let detail = app.board.detail();
    form::render_input(
        frame,
        comment_box,
        "Add Comment",
        (detail.draft(), detail.cursor()),
        app.input_mode == InputMode::Comment,
        "Press c to write a comment",
        theme,
    );

    draw_comments(frame, theme, &app.board.selected_comments(), comments);
    chips
}

fn draw_comments(frame: &mut Frame, theme: &Theme, comments: &[&Comment], area: Rect) {
    let block = Block::default()
        .title(Span::styled(format!(" Comments ({}) ", comments.len()), theme.accent()))
        .borders(Borders::TOP)
        .border_style(theme.unfocused_border());

    if comments.is_empty() {
        let empty = Paragraph::new("  No comments yet.")
            .style(theme.secondary())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::with_capacity(comments.len() * 3);
    for comment in comments {
        lines.push(Line::from(vec![
            Span::styled(comment.name_of_sender.as_str(), theme.accent()),
            Span::styled(format!("  {}", local_time(comment.created_at)), theme.secondary()),
        ]));
        lines.push(Line::from(Span::styled(comment.content.as_str(), theme.primary())));
        lines.push(Line::default());
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn draw_confirm(frame: &mut Frame, theme: &Theme, task: &Task, change: PendingChange) {
    let title = Line::from(Span::styled(
        " Confirm Status Change ",
        Style::default().fg(theme.confirm_border).add_modifier(Modifier::BOLD),
    ));
    let inner = form::render_modal(
        frame,
        title,
        Style::default().fg(theme.confirm_border),
        60,
        8,
    );

    let [question, buttons] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
    let text = format!(
        "Are you sure you want to change the status of task \"{}\" from {} to {}?",
        task.name, task.status, change.status
    );
    frame.render_widget(
        Paragraph::new(text)
            .style(theme.primary())
            .wrap(Wrap { trim: true }),
        question,
    );
    let buttons_line = Line::from(vec![
        Span::styled(
            " [y] Proceed ",
            Style::default()
                .fg(theme.form_highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(" [n] Cancel ", theme.secondary()),
    ])
    .centered();
    frame.render_widget(Paragraph::new(buttons_line), buttons);
}

fn draw_help(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let groups = app.keymap.help_entries();
    let mut lines = Vec::new();
    for (category, entries) in &groups {
        lines.push(Line::from(Span::styled(*category, theme.accent())));
        for entry in entries {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<12}", entry.label),
                    Style::default().fg(theme.form_highlight),
                ),
                Span::styled(entry.description, theme.primary()),
            ]));
        }
        lines.push(Line::default());
    }
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let inner = form::render_modal(
        frame,
        Line::from(" Keys "),
        theme.focused_border(),
        56,
        height,
    );
    frame.render_widget(Paragraph::new(lines), inner);
}

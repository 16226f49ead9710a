use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use evg_league::filters;
use evg_league::ranking::{self, StatView};
use evg_league::{Match, Snapshot, StandingsRow};

static TABS: &[&str; 5] = &["Standings", "Stats", "Schedule", "Groups", "Team"];

const TABLE_WIDTHS: [Constraint; 10] = [
    Constraint::Length(4),
    Constraint::Fill(1),
    Constraint::Length(4),
    Constraint::Length(3),
    Constraint::Length(3),
    Constraint::Length(3),
    Constraint::Length(3),
    Constraint::Length(4),
    Constraint::Length(4),
    Constraint::Length(5),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status(f, layout.status, app);
            if app.state.show_logs {
                draw_logs(f, layout.logs);
            }
        }

        match app.state.active_tab {
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Stats => draw_stats(f, layout.main, app),
            MenuItem::Schedule => draw_schedule(f, layout.main, app),
            MenuItem::Groups => draw_groups(f, layout.main, app),
            MenuItem::TeamDetail => draw_team_detail(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Standings => 0,
        MenuItem::Stats => 1,
        MenuItem::Schedule => 2,
        MenuItem::Groups => 3,
        MenuItem::TeamDetail => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// "Group A | B" with the current group highlighted.
fn group_selector(app: &App, selected: usize) -> Line<'static> {
    let mut spans = vec![Span::styled("Group ", Style::default().fg(Color::Gray))];
    for (idx, label) in app.group_labels().iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" | "));
        }
        let style = if idx == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label.to_string(), style));
    }
    Line::from(spans)
}

fn no_data(f: &mut Frame, area: Rect, app: &App, what: &str) {
    let msg = match app.state.last_error.as_deref() {
        Some(err) => format!("{what} unavailable:\n{err}"),
        None => "Loading tournament data...".to_string(),
    };
    f.render_widget(
        Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(label) = app.selected_table_group() else {
        no_data(f, inner, app, "Standings");
        return;
    };

    let [selector_area, table_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(Paragraph::new(group_selector(app, app.state.table.group)), selector_area);

    let header = Row::new(["POS", "TEAM", "PTS", "P", "W", "D", "L", "GF", "GA", "GD"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let rows = app
        .ranked_table(&label)
        .iter()
        .enumerate()
        .map(|(idx, row)| standings_row(idx + 1, row))
        .collect::<Vec<_>>();

    let table = Table::new(rows, TABLE_WIDTHS)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">");
    let mut state = TableState::default().with_selected(Some(app.state.table.row));
    f.render_stateful_widget(table, table_area, &mut state);
}

fn standings_row(pos: usize, row: &StandingsRow) -> Row<'static> {
    let gd_style = match row.goal_difference {
        gd if gd > 0 => Style::default().fg(Color::Green),
        gd if gd < 0 => Style::default().fg(Color::Red),
        _ => Style::default(),
    };
    Row::new(vec![
        Cell::from(pos.to_string()),
        Cell::from(row.team_name.clone()),
        Cell::from(row.points.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(row.played.to_string()),
        Cell::from(row.wins.to_string()),
        Cell::from(row.draws.to_string()),
        Cell::from(row.losses.to_string()),
        Cell::from(row.goals_for.to_string()),
        Cell::from(row.goals_against.to_string()),
        Cell::from(format!("{:+}", row.goal_difference)).style(gd_style),
    ])
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Stats ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.state.snapshot.is_none() {
        no_data(f, inner, app, "Stats");
        return;
    }

    let [selector_area, table_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);

    let current = app.state.stat_view;
    let mut spans = Vec::new();
    for (idx, view) in StatView::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" | "));
        }
        let style = if *view == current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(view.label(), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), selector_area);

    let board = ranking::leaderboard(&app.state.standings.pool(), current);
    if board.is_empty() {
        f.render_widget(Paragraph::new("No teams yet"), table_area);
        return;
    }

    let header = Row::new(["#", "TEAM", current.stat_label(), "PTS", "GD"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let rows = board.iter().enumerate().map(|(idx, row)| {
        Row::new(vec![
            Cell::from((idx + 1).to_string()),
            Cell::from(row.team_name.clone()),
            Cell::from(current.headline(row).to_string())
                .style(Style::default().fg(Color::Yellow)),
            Cell::from(row.points.to_string()),
            Cell::from(format!("{:+}", row.goal_difference)),
        ])
    });
    let widths = [
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
    ];
    f.render_widget(Table::new(rows, widths).header(header), table_area);
}

fn match_line(snapshot: &Snapshot, m: &Match, with_date: bool) -> Line<'static> {
    let when = match m.scheduled_at {
        Some(at) if with_date => at.with_timezone(&Local).format("%d/%m %H:%M").to_string(),
        Some(at) => at.with_timezone(&Local).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    };
    let home = snapshot.team_name(m.home_team_id).to_string();
    let away = snapshot.team_name(m.away_team_id).to_string();
    let score = match m.score() {
        Some((h, a)) => Span::styled(format!(" {h} - {a} "), Style::default().fg(Color::Yellow)),
        None => Span::styled(" vs ", Style::default().fg(Color::DarkGray)),
    };
    Line::from(vec![
        Span::styled(format!("{when}  "), Style::default().fg(Color::Gray)),
        Span::styled(format!("[{}] ", m.group), Style::default().fg(Color::DarkGray)),
        Span::raw(home),
        score,
        Span::raw(away),
    ])
}

fn draw_schedule(f: &mut Frame, area: Rect, app: &mut App) {
    let schedule = &app.state.schedule;
    let title = match schedule.selected_week {
        Some(week) => format!(" Schedule | Week {week} "),
        None => " Schedule | All weeks ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(snapshot) = app.state.snapshot.as_ref() else {
        no_data(f, inner, app, "Schedule");
        return;
    };

    let selected: Vec<Match> = filters::matches_in_week(&snapshot.matches, schedule.selected_week)
        .into_iter()
        .cloned()
        .collect();
    if selected.is_empty() {
        f.render_widget(Paragraph::new("No matches scheduled"), inner);
        return;
    }

    let mut lines = vec![
        Line::from(Span::styled(
            "h/l week, a all weeks, j/k scroll",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    for day in filters::matches_by_day(&selected, &Local) {
        lines.push(Line::from(Span::styled(
            day.date.format("%A %d %B %Y").to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for m in day.matches {
            lines.push(match_line(snapshot, m, false));
        }
        lines.push(Line::from(""));
    }

    let undated: Vec<&Match> = selected.iter().filter(|m| m.scheduled_at.is_none()).collect();
    if !undated.is_empty() {
        lines.push(Line::from(Span::styled("Date TBD", Style::default().add_modifier(Modifier::BOLD))));
        for m in undated {
            lines.push(match_line(snapshot, m, false));
        }
    }

    app.state.schedule.scroll.fit(lines.len(), inner.height);
    let offset = app.state.schedule.scroll.offset;
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
}

fn draw_groups(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Groups ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (Some(label), Some(snapshot)) = (app.selected_roster_group(), app.state.snapshot.as_ref())
    else {
        no_data(f, inner, app, "Groups");
        return;
    };

    let [selector_area, body] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(Paragraph::new(group_selector(app, app.state.roster.group)), selector_area);

    let [roster_area, pending_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);

    let rows = app
        .roster(&label)
        .into_iter()
        .map(|t| Row::new(vec![Cell::from(t.id.to_string()), Cell::from(t.name.clone())]))
        .collect::<Vec<_>>();
    let table = Table::new(rows, [Constraint::Length(5), Constraint::Fill(1)])
        .header(Row::new(["ID", "TEAM"]).style(Style::default().fg(Color::Gray)))
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">");
    let mut state = TableState::default().with_selected(Some(app.state.roster.row));
    f.render_stateful_widget(table, roster_area, &mut state);

    let selected = app.highlighted_roster_team();
    let pending = filters::eligible_opponents(&snapshot.teams, &snapshot.matches, &label, selected);
    let mut lines = vec![Line::from(Span::styled(
        "Still to play",
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    ))];
    if pending.is_empty() {
        lines.push(Line::from(Span::styled("(none)", Style::default().fg(Color::DarkGray))));
    }
    lines.extend(pending.iter().map(|t| Line::from(t.name.clone())));
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::LEFT)),
        pending_area,
    );
}

fn draw_team_detail(f: &mut Frame, area: Rect, app: &mut App) {
    let team = app
        .state
        .team_detail
        .team_id
        .and_then(|id| app.team(id));
    let title = team
        .map(|t| format!(" {} ", t.name))
        .unwrap_or_else(|| " Team ".to_string());
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (Some(team), Some(snapshot)) = (team, app.state.snapshot.as_ref()) else {
        f.render_widget(
            Paragraph::new("Select a team in Standings or Groups and press Enter")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let mut lines = Vec::new();
    lines.push(Line::from(format!("Group {}", team.group)));
    if let Some(row) = app.state.standings.row(team.id) {
        lines.push(Line::from(format!(
            "{} PTS  {}-{}-{}  GF {}  GA {}  GD {:+}",
            row.points, row.wins, row.draws, row.losses, row.goals_for, row.goals_against, row.goal_difference
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Results (j/k scroll)",
        Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
    )));

    let history = filters::team_history(&snapshot.matches, team.id);
    if history.is_empty() {
        lines.push(Line::from(Span::styled("No results yet", Style::default().fg(Color::DarkGray))));
    }
    let header = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.state.team_detail.scroll.fit(history.len(), inner.height.saturating_sub(header));
    let offset = usize::from(app.state.team_detail.scroll.offset);
    for m in history.into_iter().skip(offset) {
        lines.push(match_line(snapshot, m, true));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let help = [
        ("1-5", "switch tab"),
        ("h/l", "previous/next group, view or week"),
        ("j/k", "move selection or scroll"),
        ("Enter", "open team history (Standings, Groups)"),
        ("a", "all weeks (Schedule)"),
        ("s", "next leaderboard (Stats)"),
        ("r", "reload now"),
        ("f", "full screen"),
        ("\"", "toggle log pane"),
        ("Esc", "back"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = help
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>6}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = match (&app.state.last_error, app.state.last_updated) {
        (Some(err), _) => Line::from(Span::styled(format!(" {err}"), Style::default().fg(Color::Red))),
        (None, Some(at)) => Line::from(Span::styled(
            format!(" Updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )),
        (None, None) => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

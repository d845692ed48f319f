use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use expense_tracker::controller::EMPTY_NOTICE;
use expense_tracker::db::DATE_FORMAT;
use expense_tracker::export::EXPORT_FILE_NAME;
use expense_tracker::{
    Category, Credentials, Currency, ExpenseForm, ExpenseRecord, Language, Page, Request, Screen,
    StaticCredentials, Submission, Summary, TrackerError, ValidationError, ViewController,
    Visualization,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
        Row, Table, TableState, Wrap,
    },
    Frame, Terminal,
};
use std::io;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Login,
    Browse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Amount,
    Category,
    Description,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Date => FormField::Amount,
            FormField::Amount => FormField::Category,
            FormField::Category => FormField::Description,
            FormField::Description => FormField::Date,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Date => FormField::Description,
            FormField::Amount => FormField::Date,
            FormField::Category => FormField::Amount,
            FormField::Description => FormField::Category,
        }
    }
}

/// Text typed into the add-expense form. Values persist across interactions.
#[derive(Debug, Clone)]
pub struct FormState {
    pub date: String,
    pub amount: String,
    pub category: Category,
    pub description: String,
    pub focus: FormField,
}

impl FormState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            amount: "0.01".to_string(),
            category: Category::Food,
            description: String::new(),
            focus: FormField::Date,
        }
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            FormField::Date if c.is_ascii_digit() || c == '-' => self.date.push(c),
            FormField::Amount if c.is_ascii_digit() || c == '.' => self.amount.push(c),
            FormField::Description => self.description.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Date => {
                self.date.pop();
            }
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Category => {}
        }
    }

    pub fn to_form(&self) -> Result<ExpenseForm, ValidationError> {
        ExpenseForm::parse(
            &self.date,
            &self.amount,
            self.category.as_str(),
            &self.description,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

pub struct App {
    controller: ViewController<StaticCredentials>,
    pub mode: Mode,
    pub username: String,
    pub password: String,
    pub login_focus: LoginField,
    pub login_warning: Option<String>,
    pub page: Page,
    pub currency: Currency,
    pub language: Language,
    pub form: FormState,
    pub screen: Option<Screen>,
    pub state: TableState,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(
        controller: ViewController<StaticCredentials>,
        currency: Currency,
        today: NaiveDate,
    ) -> Self {
        Self {
            controller,
            mode: Mode::Login,
            username: String::new(),
            password: String::new(),
            login_focus: LoginField::Username,
            login_warning: None,
            page: Page::Dashboard,
            currency,
            language: Language::default(),
            form: FormState::new(today),
            screen: None,
            state: TableState::default(),
            notice: None,
        }
    }

    fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    /// One interaction: resend everything, redraw from the result.
    pub fn refresh(&mut self, submission: Option<ExpenseForm>) {
        let mut request = Request::new(self.credentials(), self.page)
            .with_currency(self.currency)
            .with_language(self.language);
        if let Some(form) = submission {
            request = request.with_submission(form);
        }

        match self.controller.handle(&request) {
            Ok(screen) => {
                self.notice = match submission_of(&screen) {
                    Some(Submission::Added(_)) => {
                        Some(Notice::Success("Expense Added Successfully".to_string()))
                    }
                    Some(Submission::Rejected(e)) => Some(Notice::Warning(e.to_string())),
                    None => None,
                };
                self.reset_selection(&screen);
                self.screen = Some(screen);
            }
            Err(TrackerError::AuthFailure) => {
                self.mode = Mode::Login;
                self.login_warning = Some(TrackerError::AuthFailure.to_string());
                self.screen = None;
            }
            Err(e) => {
                error!(error = %e, "interaction failed");
                self.notice = Some(Notice::Error(e.to_string()));
                self.screen = None;
            }
        }
    }

    fn reset_selection(&mut self, screen: &Screen) {
        match screen {
            Screen::ViewExpenses { records, .. } if !records.is_empty() => {
                let selected = self.state.selected().unwrap_or(0).min(records.len() - 1);
                self.state.select(Some(selected));
            }
            _ => self.state.select(None),
        }
    }

    pub fn login(&mut self) {
        self.login_warning = None;
        self.mode = Mode::Browse;
        self.refresh(None);
        if self.mode == Mode::Browse {
            debug!(username = %self.username, "logged in");
        }
    }

    pub fn submit_form(&mut self) {
        match self.form.to_form() {
            Ok(form) => self.refresh(Some(form)),
            // Rejected by the form control; never reaches the store.
            Err(e) => self.notice = Some(Notice::Warning(e.to_string())),
        }
    }

    pub fn next_page(&mut self) {
        self.page = self.page.next();
        self.refresh(None);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.previous();
        self.refresh(None);
    }

    pub fn cycle_currency(&mut self) {
        self.currency = self.currency.next();
        self.refresh(None);
    }

    pub fn cycle_language(&mut self, forward: bool) {
        self.language = if forward {
            self.language.next()
        } else {
            self.language.previous()
        };
        self.refresh(None);
    }

    pub fn export(&mut self) {
        self.notice = Some(match &self.screen {
            Some(Screen::ViewExpenses {
                export: Some(csv), ..
            }) => match std::fs::write(EXPORT_FILE_NAME, csv) {
                Ok(()) => Notice::Success(format!("Saved {}", EXPORT_FILE_NAME)),
                Err(e) => Notice::Error(format!("Could not write {}: {}", EXPORT_FILE_NAME, e)),
            },
            _ => Notice::Warning("No expenses to export".to_string()),
        });
    }

    fn row_count(&self) -> usize {
        match &self.screen {
            Some(Screen::ViewExpenses { records, .. }) => records.len(),
            _ => 0,
        }
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i < len - 1 => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

fn submission_of(screen: &Screen) -> Option<&Submission> {
    match screen {
        Screen::Dashboard { submission, .. } | Screen::AddExpense { submission, .. } => {
            submission.as_ref()
        }
        _ => None,
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Esc
                || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
            {
                return Ok(());
            }

            let quit = match app.mode {
                Mode::Login => handle_login_key(app, key),
                Mode::Browse => handle_browse_key(app, key),
            };
            if quit {
                return Ok(());
            }
        }
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => app.login(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
        }
        KeyCode::Backspace => {
            match app.login_focus {
                LoginField::Username => app.username.pop(),
                LoginField::Password => app.password.pop(),
            };
        }
        KeyCode::Char(c) => match app.login_focus {
            LoginField::Username => app.username.push(c),
            LoginField::Password => app.password.push(c),
        },
        _ => {}
    }
    false
}

fn handle_browse_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Tab => app.next_page(),
        KeyCode::BackTab => app.previous_page(),
        KeyCode::F(2) => app.cycle_currency(),
        KeyCode::F(5) => app.refresh(None),
        _ if app.page.has_form() => match key.code {
            KeyCode::Enter => app.submit_form(),
            KeyCode::Down => app.form.focus = app.form.focus.next(),
            KeyCode::Up => app.form.focus = app.form.focus.previous(),
            KeyCode::Left if app.form.focus == FormField::Category => {
                app.form.category = app.form.category.previous()
            }
            KeyCode::Right if app.form.focus == FormField::Category => {
                app.form.category = app.form.category.next()
            }
            KeyCode::Backspace => app.form.backspace(),
            KeyCode::Char(c) => app.form.input(c),
            _ => {}
        },
        KeyCode::Char('q') => return true,
        KeyCode::Char('e') if app.page == Page::ViewExpenses => app.export(),
        KeyCode::Down | KeyCode::Char('j') => app.next(),
        KeyCode::Up | KeyCode::Char('k') => app.previous(),
        KeyCode::Right if app.page == Page::CodeExamples => app.cycle_language(true),
        KeyCode::Left if app.page == Page::CodeExamples => app.cycle_language(false),
        _ => {}
    }
    false
}

// ============================================================================
// Rendering
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    if app.mode == Mode::Login {
        let area = f.size();
        render_login(f, area, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_content(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_login(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(10),
            Constraint::Min(0),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(rows[1]);

    let field = |label: &'static str, value: String, focused: bool| {
        Line::from(vec![
            if focused {
                Span::styled("→ ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                Span::raw("  ")
            },
            Span::styled(label, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(value),
        ])
    };

    let mut content = vec![
        Line::from(""),
        field(
            "Username: ",
            app.username.clone(),
            app.login_focus == LoginField::Username,
        ),
        field(
            "Password: ",
            "*".repeat(app.password.chars().count()),
            app.login_focus == LoginField::Password,
        ),
        Line::from(""),
    ];

    if let Some(warning) = &app.login_warning {
        content.push(Line::from(Span::styled(
            format!("  {}", warning),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    content.push(Line::from(Span::styled(
        "  Enter login | Tab switch field | Esc quit",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let login = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" 💰 Expense Tracker - Login "),
    );

    f.render_widget(login, columns[1]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Currency: {}", app.currency),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" 💰 Expense Tracker "),
    );

    f.render_widget(header, area);
}

fn render_content(f: &mut Frame, area: Rect, app: &mut App) {
    match &app.screen {
        None => {
            let message = match &app.notice {
                Some(Notice::Error(e)) => e.clone(),
                _ => "Nothing to show".to_string(),
            };
            let paragraph = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Error "));
            f.render_widget(paragraph, area);
        }
        Some(Screen::Dashboard {
            currency, recent, ..
        }) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            render_form(f, columns[0], &app.form, *currency, " Quick Add Expense ");
            render_records(f, columns[1], recent, *currency, " Recent Expenses ", None);
        }
        Some(Screen::AddExpense { currency, .. }) => {
            render_form(f, area, &app.form, *currency, " Add New Expense ");
        }
        Some(Screen::ViewExpenses {
            currency, records, ..
        }) => {
            let title = format!(" Expense List ({}) ", records.len());
            render_records(f, area, records, *currency, &title, Some(&mut app.state));
        }
        Some(Screen::Visualize {
            visualization: Visualization::Empty { notice },
            ..
        }) => {
            let paragraph = Paragraph::new(format!("\n  {}", notice))
                .style(Style::default().fg(Color::Yellow))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Expense Analysis "),
                );
            f.render_widget(paragraph, area);
        }
        Some(Screen::Visualize {
            currency,
            visualization: Visualization::Charts(summary),
        }) => render_charts(f, area, summary, *currency),
        Some(Screen::CodeExamples { language, snippet }) => {
            render_code_examples(f, area, *language, snippet)
        }
    }
}

fn render_form(f: &mut Frame, area: Rect, form: &FormState, currency: Currency, title: &str) {
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let amount_label = format!("  Amount ({}): ", currency);

    let field = |which: FormField, label: String, value: String| {
        Line::from(vec![
            if form.focus == which {
                Span::styled("→", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                Span::raw(" ")
            },
            Span::styled(label, label_style),
            Span::raw(value),
        ])
    };

    let content = vec![
        Line::from(""),
        field(FormField::Date, "  Date: ".to_string(), form.date.clone()),
        Line::from(""),
        field(FormField::Amount, amount_label, form.amount.clone()),
        Line::from(""),
        field(
            FormField::Category,
            "  Category: ".to_string(),
            format!("◀ {} ▶", form.category),
        ),
        Line::from(""),
        field(
            FormField::Description,
            "  Description: ".to_string(),
            form.description.clone(),
        ),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "[ Enter: Add Expense ]",
                Style::default().fg(Color::Black).bg(Color::Green),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title.to_string()),
    );

    f.render_widget(paragraph, area);
}

fn render_records(
    f: &mut Frame,
    area: Rect,
    records: &[ExpenseRecord],
    currency: Currency,
    title: &str,
    state: Option<&mut TableState>,
) {
    let header_cells = ["Date", "Amount", "Category", "Description"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = records.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.date.format(DATE_FORMAT).to_string()),
            Cell::from(currency.format(r.amount)).style(Style::default().fg(Color::Red)),
            Cell::from(r.category.clone()),
            Cell::from(truncate(&r.description, 40)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title.to_string()),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    match state {
        Some(state) => f.render_stateful_widget(table, area, state),
        None => f.render_widget(table, area),
    }
}

fn cents(amount: f64) -> u64 {
    (amount * 100.0).round().max(0.0) as u64
}

fn render_charts(f: &mut Frame, area: Rect, summary: &Summary, currency: Currency) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Min(5),
        ])
        .split(area);

    // Total Spending
    let total = Paragraph::new(Line::from(vec![
        Span::styled(
            "  Total Spending: ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            currency.format(summary.total),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Expense Analysis "));
    f.render_widget(total, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    // Spending by Category, as shares of the total
    let category_bars: Vec<Bar> = summary
        .by_category
        .iter()
        .map(|(category, amount)| {
            let share = if summary.total > 0.0 {
                amount / summary.total * 100.0
            } else {
                0.0
            };
            Bar::default()
                .label(Line::from(category.clone()))
                .value(cents(*amount))
                .text_value(format!("{:.1}%", share))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();
    let by_category = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Spending by Category "))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&category_bars));
    f.render_widget(by_category, columns[0]);

    // Top 5 Expenses
    let top_bars: Vec<Bar> = summary
        .top
        .iter()
        .map(|r| {
            Bar::default()
                .label(Line::from(truncate(&r.description, 16)))
                .value(cents(r.amount))
                .text_value(currency.format(r.amount))
                .style(Style::default().fg(Color::Red))
        })
        .collect();
    let top = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Top 5 Expenses "))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&top_bars));
    f.render_widget(top, columns[1]);

    // Daily Spending Trend
    let points: Vec<(f64, f64)> = summary
        .by_day
        .values()
        .enumerate()
        .map(|(i, amount)| (i as f64, *amount))
        .collect();
    let max_amount = summary.by_day.values().cloned().fold(0.0, f64::max);
    let first_day = summary.by_day.keys().next().map(|d| d.to_string()).unwrap_or_default();
    let last_day = summary.by_day.keys().last().map(|d| d.to_string()).unwrap_or_default();

    let trend = Chart::new(vec![Dataset::default()
        .name("spent")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&points)])
    .block(Block::default().borders(Borders::ALL).title(" Daily Spending Trend "))
    .x_axis(
        Axis::default()
            .style(Style::default().fg(Color::DarkGray))
            .bounds([0.0, (points.len().max(2) - 1) as f64])
            .labels(vec![Span::raw(first_day), Span::raw(last_day)]),
    )
    .y_axis(
        Axis::default()
            .style(Style::default().fg(Color::DarkGray))
            .bounds([0.0, max_amount * 1.1])
            .labels(vec![
                Span::raw("0"),
                Span::raw(format!("{:.0}", max_amount)),
            ]),
    );
    f.render_widget(trend, rows[2]);

    // Monthly Summary
    let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let header = Row::new(
        ["Month", "Total Spent", "Average Expense", "Number of Expenses"]
            .iter()
            .map(|h| Cell::from(*h).style(header_style)),
    )
    .style(Style::default().bg(Color::DarkGray));

    let rows_monthly = summary.by_month.iter().map(|m| {
        Row::new(vec![
            Cell::from(m.month.clone()),
            Cell::from(currency.format(m.total)),
            Cell::from(currency.format(m.mean)),
            Cell::from(m.count.to_string()),
        ])
    });

    let monthly = Table::new(
        rows_monthly,
        [
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Monthly Summary "));
    f.render_widget(monthly, rows[3]);
}

fn render_code_examples(f: &mut Frame, area: Rect, selected: Language, snippet: &str) {
    let mut tabs = vec![Span::raw("  ")];
    for (i, language) in Language::ALL.iter().enumerate() {
        if i > 0 {
            tabs.push(Span::raw(" │ "));
        }
        let style = if *language == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tabs.push(Span::styled(language.title(), style));
    }

    let mut content = vec![Line::from(""), Line::from(tabs), Line::from("")];
    content.extend(snippet.lines().map(|l| {
        Line::from(Span::styled(
            format!("  {}", l),
            Style::default().fg(Color::Green),
        ))
    }));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Code Examples in Different Languages "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    match &app.notice {
        Some(Notice::Success(m)) => {
            status_spans.push(Span::styled(
                format!(" ✓ {} ", m),
                Style::default().fg(Color::Green),
            ))
        }
        Some(Notice::Warning(m)) => {
            status_spans.push(Span::styled(
                format!(" ⚠ {} ", m),
                Style::default().fg(Color::Yellow),
            ))
        }
        Some(Notice::Error(m)) => {
            status_spans.push(Span::styled(
                format!(" ✗ {} ", m),
                Style::default().fg(Color::Red),
            ))
        }
        None => {}
    }

    let hints: &[(&str, &str)] = match app.page {
        Page::Dashboard | Page::AddExpense => {
            &[("Enter", "Add"), ("↑/↓", "Field"), ("←/→", "Category")]
        }
        Page::ViewExpenses => &[("↑/↓", "Nav"), ("e", "Export CSV")],
        Page::Visualize => &[],
        Page::CodeExamples => &[("←/→", "Language")],
    };

    for (key, action) in hints
        .iter()
        .chain([("Tab", "Page"), ("F2", "Currency"), ("Esc", "Quit")].iter())
    {
        if !status_spans.is_empty() {
            status_spans.push(Span::raw(" | "));
        }
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", action)));
    }

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_tracker::{Credentials, Store};
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App {
        let controller = ViewController::new(
            dir.path().join("expenses.db"),
            StaticCredentials::default(),
        );
        App::new(
            controller,
            Currency::Usd,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn log_in(app: &mut App) {
        app.username = "admin".to_string();
        app.password = "password".to_string();
        app.login();
    }

    #[test]
    fn test_wrong_password_stays_on_login() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.username = "admin".to_string();
        app.password = "nope".to_string();
        app.login();

        assert_eq!(app.mode, Mode::Login);
        assert_eq!(app.login_warning.as_deref(), Some("Incorrect Username/Password"));
        assert!(app.screen.is_none());
    }

    #[test]
    fn test_submit_from_dashboard() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        log_in(&mut app);
        assert_eq!(app.mode, Mode::Browse);

        app.form.amount = "12.50".to_string();
        app.form.description = "Lunch".to_string();
        app.submit_form();

        assert_eq!(
            app.notice,
            Some(Notice::Success("Expense Added Successfully".to_string()))
        );
        match &app.screen {
            Some(Screen::Dashboard { recent, .. }) => {
                assert_eq!(recent.len(), 1);
                assert_eq!(recent[0].amount, 12.5);
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_bad_amount_rejected_before_store() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        log_in(&mut app);

        app.form.amount = String::new();
        app.submit_form();
        assert!(matches!(app.notice, Some(Notice::Warning(_))));

        let credentials = Credentials::new("admin", "password");
        let count = app
            .controller
            .with_store(&credentials, |store: &Store| store.count())
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_visualize_empty_notice() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        log_in(&mut app);

        app.page = Page::ViewExpenses;
        app.next_page();
        assert_eq!(app.page, Page::Visualize);
        assert!(matches!(
            app.screen,
            Some(Screen::Visualize {
                visualization: Visualization::Empty { notice: EMPTY_NOTICE },
                ..
            })
        ));
    }

    #[test]
    fn test_form_input_filters_characters() {
        let mut form = FormState::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        form.focus = FormField::Amount;
        form.amount.clear();
        for c in "1a2.b5".chars() {
            form.input(c);
        }
        assert_eq!(form.amount, "12.5");

        form.focus = FormField::Category;
        form.input('x');
        assert_eq!(form.category, Category::Food);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer description", 10), "a much ...");
    }
}

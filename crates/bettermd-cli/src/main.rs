use anyhow::{Context, Result};
use bettermd_config::Config;
use bettermd_engine::{
    BlockKind, BuiltinPlugin, Document, EditingSession, KeyChord, Keymap, PluginKind,
    PluginRegistry, Selection, decode, encode,
    editing::Modifiers,
    io,
    parsing::{self, MarkdownLineClassifier},
    render::PreviewSequencer,
};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    cell::Cell,
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    rc::Rc,
};
use tokio::runtime::Runtime;

const UNTITLED: &str = "untitled.md";

struct App {
    path: PathBuf,
    session: EditingSession,
    keymap: Keymap,
    registry: PluginRegistry,
    preview: PreviewSequencer,
    runtime: Runtime,
    block_state: ListState,
    dirty: Rc<Cell<bool>>,
    status: String,
    pending_render: String,
}

impl App {
    fn new(path: PathBuf, config: Option<&Config>) -> Result<Self> {
        let text = if path.exists() {
            io::read_markdown_file(&path)?
        } else {
            String::new()
        };

        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        let registry = runtime.block_on(PluginRegistry::with_builtins())?;
        let mut preview = PreviewSequencer::default();
        if let Some(config) = config {
            runtime.block_on(registry.enable_all(&config.enabled_plugins))?;
            preview.set_template(config.template.as_str());
        }

        let mut session = EditingSession::from_markdown(&text)?;
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        session.subscribe(move |change| {
            log::debug!("document version {} changed", change.version);
            flag.set(true);
        });

        let mut app = Self {
            path,
            session,
            keymap: Keymap::default(),
            registry,
            preview,
            runtime,
            block_state: ListState::default(),
            dirty,
            status: String::from("Ready"),
            pending_render: String::new(),
        };
        app.select_block(0);
        app.refresh_preview();
        Ok(app)
    }

    fn select_block(&mut self, index: usize) {
        let Some(block) = self.session.document().block(index) else {
            return;
        };
        let selection = Selection::within_block(index, 0, block.text_len());
        self.session.set_selection(selection);
        self.block_state.select(Some(index));
    }

    fn next_block(&mut self) {
        let len = self.session.document().len();
        let i = match self.block_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.select_block(i);
    }

    fn previous_block(&mut self) {
        let len = self.session.document().len();
        let i = match self.block_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select_block(i);
    }

    fn run_chord(&mut self, chord: KeyChord) {
        let Some(command) = self.keymap.lookup(&chord).map(str::to_string) else {
            return;
        };
        self.status = match self.session.run(&command) {
            Ok(version) => {
                self.refresh_preview();
                format!("{command} (v{version})")
            }
            Err(e) => format!("{command} failed: {e}"),
        };
        // Commands never change the block count, but keep the whole block selected.
        if let Some(index) = self.block_state.selected() {
            self.select_block(index);
        }
    }

    fn toggle_plugin(&mut self, kind: PluginKind) {
        let id = kind.id();
        let result = if self.registry.is_enabled(id) {
            self.runtime.block_on(self.registry.disable(id))
        } else {
            self.runtime.block_on(self.registry.enable(id))
        };
        self.status = match result {
            Ok(_) if self.registry.is_enabled(id) => format!("{id} enabled"),
            Ok(_) => format!("{id} disabled"),
            Err(e) => e.to_string(),
        };
    }

    fn save(&mut self) {
        self.status = match io::write_markdown_file(&self.path, self.session.markdown()) {
            Ok(()) => {
                self.dirty.set(false);
                format!("Saved {}", self.path.display())
            }
            Err(e) => format!("Save failed: {e}"),
        };
    }

    /// Issue the render request for the current text. There is no renderer in
    /// the terminal, so only the pending request is shown.
    fn refresh_preview(&mut self) {
        self.pending_render = match self.preview.begin(self.session.markdown()) {
            Some((ticket, request)) => format!(
                "{ticket:?} template {} | {} bytes",
                request.template,
                request.content.len()
            ),
            None => format!("template {} | empty", self.preview.template()),
        };
    }
}

fn block_label(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Paragraph => "P ",
        BlockKind::Heading1 => "H1",
        BlockKind::Heading2 => "H2",
        BlockKind::Heading3 => "H3",
        BlockKind::ListItem => "LI",
        BlockKind::BlockQuote => "> ",
        BlockKind::CodeBlock => "``",
        BlockKind::TaskList => "TL",
        BlockKind::TaskItem => "TI",
        BlockKind::Math => "$$",
    }
}

fn key_chord(key: &KeyEvent) -> Option<KeyChord> {
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let modifiers = Modifiers {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT) && !c.is_ascii_alphabetic(),
    };
    Some(KeyChord::new(modifiers, c))
}

/// Print how each line of a file is classified and what it encodes back to.
fn dump(path: &Path, config: Option<&Config>) -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    log::info!("dumping {}", path.display());

    let text = io::read_markdown_file(path)?;
    let classifier = MarkdownLineClassifier;
    for (i, line) in parsing::lines(&text).enumerate() {
        let class = classifier.classify(line);
        println!("{i:>4} {:<10} {:?} {:?}", format!("{:?}", class.kind), class.rule, class.text);
    }

    let doc: Document = decode(&text);
    println!("--- encoded ({} blocks)", doc.len());
    println!("{}", encode(&doc)?);

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let registry = runtime.block_on(PluginRegistry::with_builtins())?;
    if let Some(config) = config {
        runtime.block_on(registry.enable_all(&config.enabled_plugins))?;
    }
    println!("--- plugins");
    for plugin in BuiltinPlugin::all() {
        let d = registry
            .descriptor(plugin.kind().id())
            .context("built-in plugin missing from registry")?;
        let state = if registry.is_enabled(&d.id) { "on " } else { "off" };
        println!("{state} {} {} by {}", d.id, d.version, d.author);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let (dump_mode, file) = match args.get(1).map(String::as_str) {
        Some("--dump") => (true, args.get(2).map(PathBuf::from)),
        Some(path) => (false, Some(PathBuf::from(path))),
        None => (false, None),
    };

    let path = match (file, &config) {
        (Some(path), _) => path,
        (None, Some(config)) => config.document_path(UNTITLED),
        (None, None) => {
            eprintln!("Error: No document provided and no config file found");
            eprintln!("Usage: {} [--dump] <file.md>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
    };

    if !io::is_markdown_file(&path.to_string_lossy()) {
        eprintln!("Error: '{}' is not a .md or .markdown file", path.display());
        process::exit(1);
    }

    if dump_mode {
        return dump(&path, config.as_ref());
    }

    let mut app = App::new(path, config.as_ref())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('q') if key.modifiers.is_empty() => return Ok(()),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => app.save(),
                KeyCode::Down | KeyCode::Char('j') => app.next_block(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_block(),
                KeyCode::F(n @ 1..=4) => app.toggle_plugin(PluginKind::ALL[usize::from(n) - 1]),
                _ => {
                    if let Some(chord) = key_chord(&key) {
                        app.run_chord(chord);
                    }
                }
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ])
        .split(rows[0]);

    // Blocks panel
    let block_items: Vec<ListItem> = app
        .session
        .document()
        .blocks()
        .iter()
        .map(|block| {
            let mut spans = vec![Span::styled(
                format!("{} ", block_label(block.kind)),
                Style::default().fg(Color::DarkGray),
            )];
            for leaf in &block.children {
                let mut style = Style::default();
                if leaf.marks.bold {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if leaf.marks.italic {
                    style = style.add_modifier(Modifier::ITALIC);
                }
                if leaf.marks.underline {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                if leaf.marks.code {
                    style = style.fg(Color::Cyan);
                }
                spans.push(Span::styled(leaf.text.clone(), style));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let dirty = if app.dirty.get() { " *" } else { "" };
    let blocks = List::new(block_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{}{dirty}", app.path.display())),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(blocks, columns[0], &mut app.block_state);

    // Markdown panel
    let markdown_title = format!("Markdown ({})", app.pending_render);
    let markdown = Paragraph::new(app.session.markdown().to_string())
        .block(Block::default().borders(Borders::ALL).title(markdown_title))
        .wrap(Wrap { trim: false });
    f.render_widget(markdown, columns[1]);

    // Plugins panel
    let mut plugin_lines = Vec::new();
    for (i, descriptor) in app.registry.descriptors().iter().enumerate() {
        let mark = if app.registry.is_enabled(&descriptor.id) {
            "[x]"
        } else {
            "[ ]"
        };
        plugin_lines.push(Line::from(format!(
            "F{} {mark} {} {}",
            i + 1,
            descriptor.name,
            descriptor.version
        )));
    }
    for (_, panel) in app.registry.enabled_panels() {
        plugin_lines.push(Line::from(""));
        plugin_lines.push(Line::from(Span::styled(
            panel.title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        plugin_lines.push(Line::from(panel.body));
        for action in panel.actions {
            plugin_lines.push(Line::from(format!("  <{action}>")));
        }
    }
    let plugins = Paragraph::new(plugin_lines)
        .block(Block::default().borders(Borders::ALL).title("Plugins"))
        .wrap(Wrap { trim: true });
    f.render_widget(plugins, columns[2]);

    // Status and instructions
    let help_text = vec![
        Line::from(app.status.clone()),
        Line::from(vec![
            Span::raw("q/Esc: Quit | "),
            Span::raw("↑↓: Block | "),
            Span::raw("Ctrl+B/I/`: Bold/Italic/Code | "),
            Span::raw("Ctrl+1/2/3: Heading | "),
            Span::raw("F1-F4: Plugins | Ctrl+S: Save"),
        ]),
    ];
    let help = Paragraph::new(help_text).block(Block::default());
    f.render_widget(help, rows[1]);
}

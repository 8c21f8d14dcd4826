use anyhow::{Context, Result};
use clap::Parser;
use mazerunner_core::{
    Direction, Item, Position, Tile,
    command::{Command, Outcome},
    inventory::Inventory,
    loader::load_levels,
    map::Grid,
    model::Model,
    rules::Rules,
    save::SaveData,
    shop::Shop,
};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    layout,
    prelude::*,
    widgets::*,
};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{self, Stdout},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(version, about = "A maze survival game for the terminal", long_about = None)]
struct Args {
    /// Game file to load
    #[arg(short, long, value_name = "GAME_FILE", default_value = "games/game1.txt")]
    game: PathBuf,

    /// Where 'v' saves and 'l' loads
    #[arg(short, long, value_name = "SAVE_FILE", default_value = "save.json")]
    save: PathBuf,

    /// JSON file overriding the default rules
    #[arg(short, long, value_name = "RULES_FILE")]
    rules: Option<PathBuf>,

    /// Log file (the terminal is busy drawing the game)
    #[arg(short, long, value_name = "LOG_FILE", default_value = "mazerunner.log")]
    log: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Playing,
    Shop,
}

struct App {
    /// The game state machine.
    model: Model,
    shop: Shop,
    rules: Rules,
    game_file: PathBuf,
    save_file: PathBuf,
    mode: Mode,
    /// Last thing worth telling the player.
    message: Option<String>,
    /// Timer start, reset on restart and load.
    started: Instant,
    /// Seconds carried over from a loaded save.
    elapsed_before: u64,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(args: &Args) -> Result<Self> {
        let rules = match &args.rules {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read rules file {}", path.display()))?;
                Rules::from_json(&text)
                    .with_context(|| format!("Invalid rules file {}", path.display()))?
            }
            None => Rules::default(),
        };
        let levels = load_levels(&args.game)?;
        let model = Model::new(levels, rules.clone())?;

        Ok(App {
            model,
            shop: Shop::default(),
            rules,
            game_file: args.game.clone(),
            save_file: args.save.clone(),
            mode: Mode::Playing,
            message: Some("Collect every coin to unlock the door.".into()),
            started: Instant::now(),
            elapsed_before: 0,
            should_quit: false,
        })
    }

    fn elapsed_secs(&self) -> u64 {
        self.elapsed_before + self.started.elapsed().as_secs()
    }

    fn reset_timer(&mut self, elapsed_before: u64) {
        self.started = Instant::now();
        self.elapsed_before = elapsed_before;
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.mode {
            Mode::Playing => self.handle_playing_key(code),
            Mode::Shop => self.handle_shop_key(code),
        }
    }

    fn handle_playing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('b') => {
                self.mode = Mode::Shop;
                self.message = Some(format!("You have {} coin(s).", self.model.player().coins()));
            }
            KeyCode::Char('r') => self.run(Command::Restart),
            KeyCode::Char('v') => self.save(),
            KeyCode::Char('l') => self.load(),
            KeyCode::Up => self.run(Command::Move(Direction::Up)),
            KeyCode::Down => self.run(Command::Move(Direction::Down)),
            KeyCode::Left => self.run(Command::Move(Direction::Left)),
            KeyCode::Right => self.run(Command::Move(Direction::Right)),
            KeyCode::Char(c) => {
                if let Some(direction) = Direction::from_key(c) {
                    self.run(Command::Move(direction));
                } else if let Some(item) = slot(c).and_then(|i| Item::CONSUMABLES.get(i).copied()) {
                    self.run(Command::UseItem(item));
                }
            }
            _ => {}
        }
    }

    fn handle_shop_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('b') => self.mode = Mode::Playing,
            KeyCode::Char(c) => {
                let choice = slot(c).and_then(|i| self.shop.catalog().nth(i));
                if let Some((item, _)) = choice {
                    self.run(Command::Buy(item));
                }
            }
            _ => {}
        }
    }

    fn run(&mut self, command: Command) {
        let outcome = self.model.dispatch(&self.shop, command);
        if outcome == Outcome::Restarted {
            self.reset_timer(0);
        }
        if let Some(message) = outcome.message() {
            self.message = Some(message);
        }
    }

    fn save(&mut self) {
        let save = SaveData::capture(&self.model, &self.game_file, self.elapsed_secs());
        self.message = Some(match save.save_to_path(&self.save_file) {
            Ok(()) => format!("Saved to {}.", self.save_file.display()),
            Err(err) => {
                log::warn!("Save failed: {err}");
                format!("Save failed: {err}")
            }
        });
    }

    fn load(&mut self) {
        match self.try_load() {
            Ok(()) => {
                self.message = Some(format!("Loaded {}.", self.save_file.display()));
            }
            Err(err) => {
                log::warn!("Load failed: {err:#}");
                self.message = Some(format!("Load failed: {err:#}"));
            }
        }
    }

    /// Leaves the current game untouched unless the whole save restores.
    fn try_load(&mut self) -> Result<()> {
        let save = SaveData::load_from_path(&self.save_file)?;
        let levels = load_levels(&save.game_file)?;
        self.model = save.restore(levels, self.rules.clone())?;
        self.game_file = save.game_file;
        self.reset_timer(save.elapsed_secs);
        Ok(())
    }
}

/// Maps '1'..='9' to a zero-based slot.
fn slot(c: char) -> Option<usize> {
    c.to_digit(10)
        .filter(|d| *d > 0)
        .map(|d| d as usize - 1)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log)?;
    log::info!("Starting MazeRunner v{}", env!("CARGO_PKG_VERSION"));

    // Load everything before touching the terminal so errors print normally
    let mut app = App::new(&args)?;

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    if let Err(ref e) = result {
        log::error!("Game exited with error: {e}");
    }
    log::info!("MazeRunner shut down");
    result
}

/// Sends log output to a file so it never draws over the game.
fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop. The model only changes on key presses; the timeout
/// just keeps the timer display ticking.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let redraw_rate = Duration::from_millis(250);

    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if crossterm::event::poll(redraw_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(layout::Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // maze and side panel
            Constraint::Length(3), // stats
            Constraint::Length(3), // message and help
        ])
        .split(frame.area());
    let top = Layout::default()
        .direction(layout::Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[0]);

    let model = &app.model;
    let level = model.level();
    render_maze(
        frame,
        top[0],
        level.maze(),
        level.items(),
        model.player().position(),
        level.is_door_unlocked(),
        model.level_num(),
    );
    match app.mode {
        Mode::Playing => render_inventory(frame, top[1], model.inventory()),
        Mode::Shop => render_shop(frame, top[1], &app.shop, model.player().coins()),
    }
    render_stats(
        frame,
        rows[1],
        model.get_player_stats(),
        model.player().coins(),
        app.elapsed_secs(),
    );

    let help = match app.mode {
        Mode::Playing => "wasd/arrows move | 1-5 use | b shop | v save | l load | r restart | q quit",
        Mode::Shop => "1-5 buy | b/Esc back",
    };
    let status = Paragraph::new(vec![
        Line::from(app.message.clone().unwrap_or_default()).bold(),
        Line::from(help).dark_gray(),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, rows[2]);
}

fn tile_span(tile: Tile, door_unlocked: bool) -> Span<'static> {
    match tile {
        Tile::Empty => Span::raw(tile.symbol().to_string()),
        Tile::Wall => Span::styled(tile.symbol().to_string(), Style::default().fg(Color::DarkGray)),
        Tile::Lava => Span::styled("~", Style::default().fg(Color::LightRed).bg(Color::Red)),
        Tile::Door if door_unlocked => Span::styled("+", Style::default().fg(Color::Green).bold()),
        Tile::Door => Span::styled(tile.symbol().to_string(), Style::default().fg(Color::Yellow)),
    }
}

fn item_color(item: Item) -> Color {
    match item {
        Item::Coin => Color::Yellow,
        Item::Potion => Color::Magenta,
        Item::Apple => Color::Red,
        Item::Honey => Color::LightYellow,
        Item::Water => Color::Blue,
        Item::Candy => Color::LightMagenta,
    }
}

fn item_span(item: Item) -> Span<'static> {
    Span::styled(item.symbol().to_string(), Style::default().fg(item_color(item)))
}

/// Renders the maze, items and player.
fn render_maze(
    frame: &mut Frame,
    area: Rect,
    maze: &Grid<Tile>,
    items: &BTreeMap<Position, Item>,
    player_position: Position,
    door_unlocked: bool,
    level_num: usize,
) {
    let lines: Vec<Line> = maze
        .row_slices()
        .enumerate()
        .map(|(row, tiles)| {
            let spans: Vec<Span> = tiles
                .iter()
                .enumerate()
                .map(|(col, tile)| {
                    let position = Position { row, col };
                    if position == player_position {
                        Span::styled("@", Style::default().fg(Color::Cyan).bold())
                    } else if let Some(item) = items.get(&position) {
                        item_span(*item)
                    } else {
                        tile_span(*tile, door_unlocked)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = format!("MazeRunner - Level {}", level_num + 1);
    let maze_paragraph = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(maze_paragraph, area);
}

/// Renders the non-coin inventory with the key that uses each item.
fn render_inventory(frame: &mut Frame, area: Rect, inventory: &Inventory) {
    let rows: Vec<ListItem> = Item::CONSUMABLES
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let count = inventory.count(*item);
            let style = if count == 0 {
                Style::default().dark_gray()
            } else {
                Style::default().fg(item_color(*item))
            };
            ListItem::new(Line::from(format!("{}. {}: {}", i + 1, item, count)).style(style))
        })
        .collect();

    let inventory_widget =
        List::new(rows).block(Block::default().borders(Borders::ALL).title("Inventory"));
    frame.render_widget(inventory_widget, area);
}

fn render_shop(frame: &mut Frame, area: Rect, shop: &Shop, coins: u32) {
    let rows: Vec<ListItem> = shop
        .catalog()
        .enumerate()
        .map(|(i, (item, price))| {
            let style = if price <= coins {
                Style::default().fg(item_color(item))
            } else {
                Style::default().dark_gray()
            };
            ListItem::new(Line::from(format!("{}. {} - {}$", i + 1, item, price)).style(style))
        })
        .collect();

    let shop_widget = List::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Shop ({coins} coins)")),
    );
    frame.render_widget(shop_widget, area);
}

fn render_stats(
    frame: &mut Frame,
    area: Rect,
    (health, hunger, thirst): (u32, u32, u32),
    coins: u32,
    elapsed_secs: u64,
) {
    let stats = Line::from(vec![
        Span::styled(format!("HP {health}"), Style::default().fg(Color::Red)),
        Span::raw("   "),
        Span::styled(format!("Hunger {hunger}"), Style::default().fg(Color::LightYellow)),
        Span::raw("   "),
        Span::styled(format!("Thirst {thirst}"), Style::default().fg(Color::Blue)),
        Span::raw("   "),
        Span::styled(format!("Coins {coins}"), Style::default().fg(Color::Yellow)),
        Span::raw("   "),
        Span::raw(format!("Time {}m {}s", elapsed_secs / 60, elapsed_secs % 60)),
    ]);
    let stats_widget = Paragraph::new(stats)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Stats"));
    frame.render_widget(stats_widget, area);
}

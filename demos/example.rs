use crossterm::event::{Event, KeyCode};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::widgets::Block;
use ratatui::Terminal;

use tree_diagram::{DrawOptions, Node};

const PADDINGS: [&str; 4] = ["", "  ", "·····", "■"];

struct App {
    root: Node,
    border: bool,
    debug: bool,
    align_right: bool,
    padding: usize,
}

impl App {
    fn new() -> Self {
        let root = Node::new("NATO");
        root.new_child("Alfa");
        let bravo = root.new_child("Bravo");
        bravo.new_child("Charlie");
        let delta = bravo.new_child("Delta");
        delta.new_child("Echo");
        delta.new_child("Foxtrot");
        bravo.new_child("Golf");
        root.new_child("Hotel");
        let india = root.new_child("India").set_color_yellow();
        for name in ["Juliett", "Kilo", "Lima", "Mike", "November"] {
            india.new_child(name);
        }
        root.new_child("Oscar");
        let papa = root.new_child("Papa");
        for name in ["Quebec", "Romeo", "Sierra", "Tango", "Uniform"] {
            papa.new_child(name);
        }
        let victor = papa.new_child("Victor").set_color_red();
        for name in ["Whiskey", "Xray", "Yankee"] {
            victor.new_child(name).set_color_magenta();
        }
        root.new_child("Zulu");
        Self {
            root,
            border: false,
            debug: false,
            align_right: false,
            padding: 0,
        }
    }

    fn options(&self) -> DrawOptions {
        DrawOptions::new()
            .border(self.border)
            .debug(self.debug)
            .align_right(self.align_right)
            .padding(PADDINGS[self.padding])
    }
}

fn main() -> std::io::Result<()> {
    // Terminal initialization
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // App
    let app = App::new();
    let res = run_app(&mut terminal, app);

    // restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.size();
            let options = app.options();
            let diagram = app.root.diagram(&options);
            let block = Block::bordered()
                .title("Tree Diagram")
                .title_bottom(format!("{options:?}"));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(&diagram, inner);
        })?;

        if let Event::Key(key) = crossterm::event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('b') => app.border = !app.border,
                KeyCode::Char('d') => app.debug = !app.debug,
                KeyCode::Char('r') => app.align_right = !app.align_right,
                KeyCode::Char('p') => app.padding = (app.padding + 1) % PADDINGS.len(),
                _ => {}
            }
        }
    }
}

use std::cell::Cell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Position, Rect},
    Terminal,
};

use fillup::audio::{AudioBackend, KiraBackend, NullBackend, SoundCuePlayer};
use fillup::binding::{LabelBinding, Point};
use fillup::button::HoldButton;
use fillup::clock::{Clock, SystemClock};
use fillup::config::{FileStyleStore, StyleStore};
use fillup::haptics::LogHaptics;
use fillup::ripple::RippleBurst;
use fillup::runtime::{CrosstermEventSource, Runner, UiEvent};
use fillup::ui::{button_rect, Screen};

const TICK_RATE_MS: u64 = 33;
const REST_LABEL: &str = "Press and hold button";
const DONE_LABEL: &str = "Button complete!";

/// press-and-hold to confirm button demo
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Demo screen for the press-and-hold confirm button: hold it with the mouse until it fills, then watch the ripple."
)]
struct Cli {
    /// seconds of continuous press needed to complete
    #[clap(short = 'd', long)]
    fill_secs: Option<f32>,

    /// directory holding the sound clips
    #[clap(short = 's', long)]
    sound_dir: Option<PathBuf>,

    /// disable audio output
    #[clap(long)]
    mute: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut style = FileStyleStore::new().load();
    if let Some(fill_secs) = cli.fill_secs {
        style.fill_secs = fill_secs.max(0.1);
    }

    let backend: Box<dyn AudioBackend> = if cli.mute {
        Box::new(NullBackend)
    } else {
        match KiraBackend::new() {
            Ok(backend) => Box::new(backend),
            Err(err) => {
                warn!("audio unavailable, continuing muted: {err:#}");
                Box::new(NullBackend)
            }
        }
    };
    let sound_dir = cli.sound_dir.unwrap_or_else(|| PathBuf::from("assets"));
    let sounds = SoundCuePlayer::new(sound_dir, backend)
        .with_clips(style.buildup_clip.clone(), style.release_clip.clone());

    let completions = Rc::new(Cell::new(0u32));
    let trigger = completions.clone();
    let button = HoldButton::new(style, sounds, Box::new(LogHaptics))
        .with_label(LabelBinding::new(REST_LABEL))
        .with_on_complete(move |_center, text| {
            trigger.set(trigger.get() + 1);
            *text = DONE_LABEL.to_string();
        });

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, button, completions);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn should_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut button: HoldButton,
    completions: Rc<Cell<u32>>,
) -> Result<()> {
    let clock = SystemClock::new();
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let mut ripple = RippleBurst::new();
    let mut ripples_seen = 0u32;

    loop {
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let rect = button_rect(area, button.scale(), button.shake_offset());
        button.set_center(Point::new(
            rect.x as f32 + rect.width as f32 / 2.0,
            rect.y as f32 + rect.height as f32 / 2.0,
        ));

        match runner.step() {
            UiEvent::Key(key) => {
                if should_quit(&key) {
                    break;
                }
                if key.code == KeyCode::Char('r') {
                    button.reset();
                    button.label().set(REST_LABEL);
                }
            }
            UiEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if rect.contains(Position::new(mouse.column, mouse.row)) {
                        button.press_begin(clock.now());
                    }
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    button.press_end(clock.now());
                }
                _ => {}
            },
            UiEvent::Tick => {
                button.tick(clock.now());
                ripple.update(TICK_RATE_MS as f64 / 1000.0);
            }
        }

        if completions.get() > ripples_seen {
            ripples_seen = completions.get();
            let center = button.center();
            ripple.spawn(center.x as f64, center.y as f64, area.width, area.height);
        }

        terminal.draw(|f| {
            f.render_widget(
                Screen {
                    button: &button,
                    ripple: &ripple,
                    completions: completions.get(),
                },
                f.area(),
            );
        })?;
    }

    Ok(())
}

use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};
use snowdrift_config::{Config, MAX_INTENSITY};
use snowdrift_core::SnowPalette;
use snowdrift_fonts::{GLYPH_HEIGHT, art_size, build_countdown_art};
use snowdrift_sim::{Backdrop, Bounds3, Vec3, time_seed};

mod countdown;
mod logging;
mod scene;

use countdown::{Countdown, CountdownEvent};
use scene::{Projection, SceneWidget, surface_size};

/// Intensity change per key press.
const INTENSITY_STEP: f32 = 10.0;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    logging::init(&config)?;

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Loaded settings, written back on quit when changed.
    config: Config,
    /// Whether runtime changes should be saved.
    config_dirty: bool,
    /// Snowfall and explosion.
    backdrop: Backdrop,
    countdown: Countdown,
    /// Whether the digits are on screen (hidden once they explode).
    digits_visible: bool,
    /// Cycle position for the snow color.
    palette: SnowPalette,
    /// Where the digits were last drawn.
    art_area: Rect,
    /// Reference point for simulation timestamps.
    started_at: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(time_seed);
        let mut backdrop = Backdrop::new(seed, config.snow.max_accumulation);
        let snow_color = config.snow_color();
        backdrop.configure_snow(config.snow.intensity, snow_color);

        Self {
            running: false,
            countdown: Countdown::new(config.countdown.minutes, config.countdown.seconds),
            config_dirty: false,
            backdrop,
            digits_visible: true,
            palette: SnowPalette::from_color(snow_color).unwrap_or_default(),
            art_area: Rect::default(),
            started_at: Instant::now(),
            config,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        while self.running {
            let size = terminal.size()?;
            let (width, height) = surface_size(Rect::new(0, 0, size.width, size.height));
            self.backdrop.resize(width, height);

            self.update()?;
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        self.save_config();
        Ok(())
    }

    /// Milliseconds since startup, the simulation clock.
    fn now_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    /// Advance the countdown and the simulation by one frame.
    fn update(&mut self) -> color_eyre::Result<()> {
        if self.countdown.update(Instant::now()) == Some(CountdownEvent::Finished) {
            log::info!("countdown finished");
            self.explode();
        }
        self.backdrop.tick(self.now_ms())?;
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let commands = self.backdrop.draw_commands();
        frame.render_widget(SceneWidget::new(&commands), area);

        let chunks = Layout::vertical([
            Constraint::Fill(1),                     // Top padding
            Constraint::Length(GLYPH_HEIGHT as u16), // Countdown digits
            Constraint::Length(2),                   // Spacing
            Constraint::Length(1),                   // Date and status
            Constraint::Fill(1),                     // Bottom padding
            Constraint::Length(1),                   // Help text
        ])
        .split(area);

        let color: Color = self.config.countdown_color().into();
        self.art_area = chunks[1];

        if self.digits_visible {
            let (minutes, seconds) = self.countdown.remaining();
            let art: Vec<Line> = build_countdown_art(minutes, seconds)
                .into_iter()
                .map(|s| Line::from(s).style(Style::new().fg(color)))
                .collect();
            frame.render_widget(Paragraph::new(art).alignment(Alignment::Center), chunks[1]);
        }

        let snowfall = self.backdrop.snowfall();
        let status = format!(
            "{}  ·  {} snow, {} flakes{}",
            Local::now().format("%A, %B %d, %Y  %H:%M:%S"),
            self.palette.name(),
            snowfall.flakes().len(),
            if self.countdown.is_running() { "  ·  running" } else { "" },
        );
        let status = Paragraph::new(status)
            .style(Style::new().fg(color))
            .alignment(Alignment::Center);
        frame.render_widget(status, chunks[3]);

        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "s".bold().fg(color),
            " start/stop  ".dark_gray(),
            "↑↓←→".bold().fg(color),
            " set time  ".dark_gray(),
            "+/-".bold().fg(color),
            " snow  ".dark_gray(),
            "c".bold().fg(color),
            " color  ".dark_gray(),
            "e".bold().fg(color),
            " explode  ".dark_gray(),
            "r".bold().fg(color),
            " reset".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, chunks[5]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls for at most one frame so the animation keeps moving.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(Duration::from_millis(self.config.frame_ms))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(_) => {}
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('s') | KeyCode::Char(' ')) => self.toggle_countdown(),
            (_, KeyCode::Up) => self.adjust_time(1, 0),
            (_, KeyCode::Down) => self.adjust_time(-1, 0),
            (_, KeyCode::Right) => self.adjust_time(0, 1),
            (_, KeyCode::Left) => self.adjust_time(0, -1),
            (_, KeyCode::Char('+') | KeyCode::Char('=')) => self.adjust_intensity(INTENSITY_STEP),
            (_, KeyCode::Char('-')) => self.adjust_intensity(-INTENSITY_STEP),
            (_, KeyCode::Char('c')) => self.cycle_snow_color(),
            (_, KeyCode::Char('e')) => self.explode(),
            (_, KeyCode::Char('r')) => self.reset(),
            _ => {}
        }
    }

    /// Start or pause the countdown.
    fn toggle_countdown(&mut self) {
        if self.countdown.is_running() {
            self.countdown.stop();
        } else if self.countdown.start(Instant::now()) {
            self.digits_visible = true;
        }
    }

    /// Edit the countdown while it is stopped.
    fn adjust_time(&mut self, minutes: i32, seconds: i32) {
        if self.countdown.is_running() {
            return;
        }
        self.countdown.adjust_minutes(minutes);
        self.countdown.adjust_seconds(seconds);
        self.digits_visible = true;

        let (m, s) = self.countdown.remaining();
        self.config.countdown.minutes = m;
        self.config.countdown.seconds = s;
        self.config_dirty = true;
    }

    /// Change snowfall intensity, rebuilding the flake pool.
    fn adjust_intensity(&mut self, delta: f32) {
        let intensity = (self.config.snow.intensity + delta).clamp(0.0, MAX_INTENSITY);
        self.config.snow.intensity = intensity;
        self.config_dirty = true;
        let color = self.backdrop.snowfall().color();
        self.backdrop.configure_snow(intensity, color);
    }

    /// Cycle through the snow palettes.
    fn cycle_snow_color(&mut self) {
        self.palette = self.palette.next();
        let color = self.palette.color();
        self.backdrop.set_snow_color(color);
        self.config.snow.color = color.to_hex();
        self.config_dirty = true;
    }

    /// Burst the digits into debris.
    fn explode(&mut self) {
        let (columns, rows) = art_size(&build_countdown_art(0, 0));
        let source = Bounds3::new(
            Vec3::new(0.0, -(rows as f32), 0.0),
            Vec3::new(columns as f32, 0.0, 1.0),
        );
        let left = self.art_area.x + self.art_area.width.saturating_sub(columns as u16) / 2;
        let screen = Rect::new(0, 0, self.frame_width(), self.frame_height());
        let base = Projection::new(screen).cell_to_world(left, self.art_area.y);

        let now_ms = self.now_ms();
        self.backdrop.trigger_explosion(
            now_ms,
            source,
            base,
            self.config.explosion.particle_count,
            self.config.countdown_color(),
        );
        self.digits_visible = false;
    }

    /// Clear the pile, stop the countdown and bring the digits back.
    fn reset(&mut self) {
        self.backdrop.clear_pile();
        self.countdown.stop();
        self.digits_visible = true;
    }

    fn frame_width(&self) -> u16 {
        (self.backdrop.size().0 / scene::DOTS_PER_CELL_X) as u16
    }

    fn frame_height(&self) -> u16 {
        (self.backdrop.size().1 / scene::DOTS_PER_CELL_Y) as u16
    }

    /// Persist runtime changes, logging rather than failing on error.
    fn save_config(&self) {
        if !self.config_dirty {
            return;
        }
        match self.config.save() {
            Ok(()) => log::debug!("config saved"),
            Err(e) => log::warn!("could not save config: {e}"),
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowdrift_sim::ExplosionPhase;

    fn app() -> App {
        let config = Config {
            seed: Some(1),
            ..Default::default()
        };
        let mut app = App::new(config);
        app.backdrop.resize(160, 96);
        app.art_area = Rect::new(0, 10, 80, 5);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.running = true;
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_explode_hides_digits_and_starts_burst() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        assert!(!app.digits_visible);
        assert!(app.backdrop.explosion().is_active());
        assert_eq!(app.backdrop.explosion().debris().len(), 1000);
        let now = app.now_ms();
        assert_eq!(app.backdrop.tick(now), Ok(ExplosionPhase::Exploding));
    }

    #[test]
    fn test_explosion_starts_at_digits() {
        let mut app = app();
        app.explode();
        // 80x24 screen, digits 25 wide centered in an 80 wide row at y = 10.
        for d in app.backdrop.explosion().debris() {
            assert!(d.position.x >= -13.0 && d.position.x <= 12.0);
            assert!(d.position.y >= -3.0 && d.position.y <= 2.0);
        }
    }

    #[test]
    fn test_intensity_keys_rebuild_pool() {
        let mut app = app();
        let before = app.backdrop.snowfall().flakes().len();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.backdrop.snowfall().flakes().len(), before + 20);
        assert!(app.config_dirty);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.config.snow.intensity, 0.0);
        assert!(app.backdrop.snowfall().flakes().is_empty());

        for _ in 0..20 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.config.snow.intensity, MAX_INTENSITY);
        assert_eq!(app.backdrop.snowfall().flakes().len(), 300);
    }

    #[test]
    fn test_cycle_color() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.backdrop.snowfall().color(), SnowPalette::Ice.color());
        assert_eq!(app.config.snow.color, SnowPalette::Ice.color().to_hex());
    }

    #[test]
    fn test_time_editing_blocked_while_running() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.countdown.remaining(), (1, 10));
        press(&mut app, KeyCode::Char('s'));
        assert!(app.countdown.is_running());
        press(&mut app, KeyCode::Up);
        assert_eq!(app.countdown.remaining(), (1, 10));
        press(&mut app, KeyCode::Char('s'));
        assert!(!app.countdown.is_running());
    }

    #[test]
    fn test_reset_restores_digits() {
        let mut app = app();
        app.explode();
        press(&mut app, KeyCode::Char('r'));
        assert!(app.digits_visible);
        let acc = app.backdrop.snowfall().accumulator();
        assert!(acc.heights().iter().all(|&h| h == acc.baseline()));
    }
}

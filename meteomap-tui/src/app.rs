use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use meteomap_core::{
    Config, Coordinate, FetchError, Forecast, ForecastSession, OpenMeteoProvider, RequestToken,
    RetryPolicy, fetch_with_retry,
};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

const TICK: Duration = Duration::from_millis(50);

/// Cursor step per arrow keypress, in degrees.
const STEP: f64 = 1.0;
const STEP_FINE: f64 = 0.1;
const STEP_COARSE: f64 = 10.0;

type FetchOutcome = (RequestToken, Coordinate, Result<Forecast, FetchError>);

pub async fn run(config: Config, start: Coordinate) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = App::new(config, start).event_loop(&mut terminal).await;
    ratatui::restore();
    result
}

pub struct App {
    pub session: ForecastSession,
    /// Movable crosshair; becomes the selected coordinate on Enter.
    pub cursor_lat: f64,
    pub cursor_lon: f64,
    /// True while the newest request is still in flight.
    pub fetching: bool,
    provider: Arc<OpenMeteoProvider>,
    retry: RetryPolicy,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl App {
    fn new(config: Config, start: Coordinate) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = Self {
            session: ForecastSession::new(start),
            cursor_lat: start.latitude,
            cursor_lon: start.longitude,
            fetching: false,
            provider: Arc::new(OpenMeteoProvider::new()),
            retry: config.retry,
            tx,
            rx,
        };

        // One fetch for the startup coordinate before any input arrives.
        app.select(start);
        app
    }

    async fn event_loop(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            self.drain_completions();
            terminal.draw(|frame| crate::ui::render(frame, &self))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            STEP_FINE
        } else if key.modifiers.contains(KeyModifiers::CONTROL) {
            STEP_COARSE
        } else {
            STEP
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_cursor(step, 0.0),
            KeyCode::Down => self.move_cursor(-step, 0.0),
            KeyCode::Left => self.move_cursor(0.0, -step),
            KeyCode::Right => self.move_cursor(0.0, step),
            KeyCode::Enter => self.select(Coordinate::new(self.cursor_lat, self.cursor_lon)),
            KeyCode::Char('r') => self.select(self.session.coordinate()),
            _ => {}
        }

        false
    }

    fn move_cursor(&mut self, dlat: f64, dlon: f64) {
        self.cursor_lat = (self.cursor_lat + dlat).clamp(-90.0, 90.0);
        self.cursor_lon = (self.cursor_lon + dlon).clamp(-180.0, 180.0);
    }

    /// Issue exactly one fetch for `coordinate`. An in-flight request is
    /// left to finish; its response loses the token comparison instead.
    fn select(&mut self, coordinate: Coordinate) {
        let token = self.session.select(coordinate);
        self.fetching = true;

        let provider = Arc::clone(&self.provider);
        let retry = self.retry;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = fetch_with_retry(provider.as_ref(), coordinate, &retry).await;
            let _ = tx.send((token, coordinate, outcome));
        });
    }

    fn drain_completions(&mut self) {
        while let Ok((token, coordinate, outcome)) = self.rx.try_recv() {
            if self.session.is_latest(token) {
                self.fetching = false;
            }

            match outcome {
                Ok(forecast) => {
                    self.session.apply(token, forecast);
                }
                // Sole error log site: one line per failed fetch, the panel
                // keeps whatever it was showing.
                Err(err) => log::error!("forecast fetch failed for {coordinate}: {err}"),
            }
        }
    }
}

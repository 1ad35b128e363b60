use std::time::{Duration, Instant};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chart::{ChartFrame, RollingChart, TradeMark};
use crate::config::Config;
use crate::error::SimError;
use crate::input::Command;
use crate::ledger::{PositionLedger, TradeRecord};
use crate::market;

const MAX_NOTES: usize = 200;
const HELP_LINE: &str = "keys: [c] buy  [v] sell  [s] status  [q] help  [Esc] quit";

/// Display and input capability the session loop drives.
///
/// `present` receives a fresh snapshot every iteration; `poll_command` waits
/// up to `timeout` for one command and is the loop's only suspension point.
pub trait Console {
    fn present(&mut self, view: &SessionView<'_>) -> Result<()>;
    fn poll_command(&mut self, timeout: Duration) -> Result<Option<Command>>;
}

/// Borrowed snapshot handed to the console each iteration.
pub struct SessionView<'a> {
    pub frame: &'a ChartFrame,
    pub notes: &'a [String],
    pub price: i64,
    pub fair_value: i64,
    pub position_avg: Option<f64>,
    pub open_entries: usize,
    pub realized_profit: f64,
    pub trade_count: usize,
    pub tick_count: u64,
}

/// One interactive market session.
///
/// Owns the walk state, chart, ledger and pacing. The walk advances every
/// loop iteration; the chart commits one bar per `t_update` window, and at
/// most one transaction lands per window.
pub struct Session {
    chart: RollingChart,
    ledger: PositionLedger,
    rng: StdRng,
    price: i64,
    fair: i64,
    tick_interval: Duration,
    poll_timeout: Duration,
    last_tick: Instant,
    traded_this_tick: bool,
    tick_count: u64,
    notes: Vec<String>,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;

        let fair = market::fair_value(config.market.n_max, config.market.n_min);
        let range = market::possible_range(config.market.n_max, config.market.n_min);
        let chart = RollingChart::new(&config.chart, fair, range)?;
        let rng = match config.market.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            chart,
            ledger: PositionLedger::new(),
            rng,
            price: fair,
            fair,
            tick_interval: config.ui.tick_interval(),
            poll_timeout: config.ui.poll_timeout(),
            last_tick: Instant::now(),
            traded_this_tick: false,
            tick_count: 0,
            notes: Vec::new(),
        })
    }

    /// Drive the session until the user quits or the console fails.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<()> {
        self.push_note(HELP_LINE.to_string());
        self.last_tick = Instant::now();

        loop {
            self.price = market::next_price(self.price, self.fair, &mut self.rng);

            console.present(&self.view())?;

            if let Some(command) = console.poll_command(self.poll_timeout)? {
                match command {
                    Command::Quit => {
                        tracing::info!("user quit");
                        break;
                    }
                    Command::Buy => self.handle_buy(),
                    Command::Sell => self.handle_sell(),
                    Command::Status => self.handle_status(),
                    Command::Help => self.push_note(HELP_LINE.to_string()),
                }
            }

            if self.last_tick.elapsed() > self.tick_interval {
                self.commit_tick();
            }
        }
        Ok(())
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            frame: self.chart.frame(),
            notes: &self.notes,
            price: self.price,
            fair_value: self.fair,
            position_avg: self.ledger.status(),
            open_entries: self.ledger.open_entries(),
            realized_profit: self.ledger.realized_profit(),
            trade_count: self.ledger.trade_count(),
            tick_count: self.tick_count,
        }
    }

    pub fn trades(&self) -> &[TradeRecord] {
        self.ledger.trades()
    }

    fn handle_buy(&mut self) {
        if self.traded_this_tick {
            return;
        }
        self.ledger.buy(self.price);
        self.chart.push(self.price, Some(TradeMark::Bought));
        self.traded_this_tick = true;
        self.push_note(format!("BUY @ {}", self.price));
        tracing::info!(price = self.price, "manual buy");
    }

    fn handle_sell(&mut self) {
        if self.traded_this_tick {
            return;
        }
        if !self.ledger.is_open() {
            self.push_note("No open position".to_string());
            return;
        }
        if let Some(summary) = self.ledger.sell(self.price) {
            self.chart.push(self.price, Some(TradeMark::Sold));
            self.traded_this_tick = true;
            self.push_note(format!(
                "SELL @ {} | avg entry {:.2} | profit {:.2}",
                self.price, summary.avg_entry, summary.profit
            ));
            tracing::info!(
                price = self.price,
                profit = summary.profit,
                executed_at_ms = summary.executed_at_ms,
                "manual sell"
            );
        }
    }

    fn handle_status(&mut self) {
        match self.ledger.status() {
            Some(avg) => {
                let note = format!(
                    "position: {} open | avg {:.2}",
                    self.ledger.open_entries(),
                    avg
                );
                self.push_note(note);
            }
            None => {
                self.push_note(format!(
                    "position: flat | realized {:.2}",
                    self.ledger.realized_profit()
                ));
            }
        }
    }

    /// Commit the current tick window: one neutral bar unless a transaction
    /// already pushed a marked one, then reopen the window.
    fn commit_tick(&mut self) {
        if !self.traded_this_tick {
            self.chart.push(self.price, None);
        }
        self.traded_this_tick = false;
        self.last_tick = Instant::now();
        self.tick_count += 1;
        tracing::debug!(tick = self.tick_count, price = self.price, "tick committed");
    }

    fn push_note(&mut self, message: String) {
        let stamped = format!("{} {}", chrono::Local::now().format("%H:%M:%S"), message);
        self.notes.push(stamped);
        if self.notes.len() > MAX_NOTES {
            self.notes.remove(0);
        }
    }
}

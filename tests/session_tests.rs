use std::time::Duration;

use anyhow::{anyhow, Result};

use paper_pit::chart::Rgb;
use paper_pit::config::Config;
use paper_pit::input::Command;
use paper_pit::session::{Console, Session, SessionView};

/// Console that replays a fixed command script and records what it was shown.
#[derive(Default)]
struct ScriptedConsole {
    script: Vec<Option<Command>>,
    cursor: usize,
    presents: usize,
    prices: Vec<i64>,
}

impl ScriptedConsole {
    fn new(script: Vec<Option<Command>>) -> Self {
        Self {
            script,
            ..Default::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn present(&mut self, view: &SessionView<'_>) -> Result<()> {
        self.presents += 1;
        self.prices.push(view.price);
        Ok(())
    }

    fn poll_command(&mut self, _timeout: Duration) -> Result<Option<Command>> {
        match self.script.get(self.cursor) {
            Some(cmd) => {
                self.cursor += 1;
                Ok(*cmd)
            }
            None => Err(anyhow!("script exhausted without a quit command")),
        }
    }
}

struct FailingConsole {
    presents: usize,
}

impl Console for FailingConsole {
    fn present(&mut self, _view: &SessionView<'_>) -> Result<()> {
        self.presents += 1;
        Err(anyhow!("terminal gone"))
    }

    fn poll_command(&mut self, _timeout: Duration) -> Result<Option<Command>> {
        Ok(None)
    }
}

/// Console that sleeps before selected polls so the tick gate can fire
/// between scripted commands.
struct PacedConsole {
    script: Vec<(u64, Option<Command>)>,
    cursor: usize,
}

impl PacedConsole {
    fn new(script: Vec<(u64, Option<Command>)>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl Console for PacedConsole {
    fn present(&mut self, _view: &SessionView<'_>) -> Result<()> {
        Ok(())
    }

    fn poll_command(&mut self, _timeout: Duration) -> Result<Option<Command>> {
        match self.script.get(self.cursor) {
            Some((delay_ms, cmd)) => {
                self.cursor += 1;
                std::thread::sleep(Duration::from_millis(*delay_ms));
                Ok(*cmd)
            }
            None => Err(anyhow!("script exhausted without a quit command")),
        }
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.market.seed = Some(42);
    config.chart.n_ticks = 10;
    config.chart.image_width = 100;
    config.chart.image_height = 50;
    config.ui.t_update = 3600.0; // the tick gate never fires mid-test
    config
}

fn fast_tick_config() -> Config {
    let mut config = test_config();
    config.ui.t_update = 0.0; // the tick gate fires every iteration
    config
}

#[test]
fn one_transaction_per_tick_window() {
    let mut session = Session::new(&test_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![
        Some(Command::Buy),
        Some(Command::Buy),
        Some(Command::Quit),
    ]);

    session.run(&mut console).expect("run");

    // the second buy landed in the same tick window and was dropped
    assert_eq!(session.view().open_entries, 1);
    assert_eq!(console.presents, 3);

    // the buy pushed its bar immediately even though the gate never fired
    let view = session.view();
    assert_eq!(view.tick_count, 0);
    let x = view.frame.width() - 1;
    let any_white = (0..view.frame.height()).any(|y| view.frame.pixel(x, y) == Rgb::WHITE);
    assert!(any_white, "expected the buy to push a bar before any tick");
}

#[test]
fn transaction_flag_resets_at_the_tick_gate() {
    let mut session = Session::new(&fast_tick_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![
        Some(Command::Buy),
        Some(Command::Buy),
        Some(Command::Quit),
    ]);

    session.run(&mut console).expect("run");

    let view = session.view();
    assert_eq!(view.open_entries, 2);
    assert_eq!(view.tick_count, 2);
}

#[test]
fn a_sell_sharing_the_buy_window_is_dropped_silently() {
    let mut session = Session::new(&test_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![
        Some(Command::Buy),
        Some(Command::Sell),
        Some(Command::Quit),
    ]);

    session.run(&mut console).expect("run");

    let view = session.view();
    assert_eq!(view.trade_count, 0, "the sell shares the buy's tick window");
    assert_eq!(view.open_entries, 1);
    assert!(!view.notes.iter().any(|n| n.contains("SELL @")));
    assert!(
        !view.notes.iter().any(|n| n.contains("No open position")),
        "a gated sell must not be reported as a flat sell"
    );
}

#[test]
fn a_gated_sell_after_a_close_stays_silent() {
    let mut config = test_config();
    config.ui.t_update = 0.1;
    let mut session = Session::new(&config).expect("session");
    // the sleep lets the gate commit the buy's window, so the sell fills in a
    // fresh one; the second sell lands while the flag is still set
    let mut console = PacedConsole::new(vec![
        (0, Some(Command::Buy)),
        (300, None),
        (0, Some(Command::Sell)),
        (0, Some(Command::Sell)),
        (0, Some(Command::Quit)),
    ]);

    session.run(&mut console).expect("run");

    let view = session.view();
    assert_eq!(view.trade_count, 1);
    assert_eq!(view.open_entries, 0);
    let sell_notes = view.notes.iter().filter(|n| n.contains("SELL @")).count();
    assert_eq!(sell_notes, 1, "the gated repeat sell must not fill");
    assert!(
        !view.notes.iter().any(|n| n.contains("No open position")),
        "a gated sell stays silent even though the position is flat"
    );
}

#[test]
fn construction_rejects_an_oversized_tick_period() {
    let mut config = test_config();
    config.ui.t_update = 1e300;
    assert!(Session::new(&config).is_err());
}

#[test]
fn quit_stops_frame_presentation() {
    let mut session = Session::new(&test_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![None, Some(Command::Quit)]);

    session.run(&mut console).expect("run");

    assert_eq!(console.presents, 2);
}

#[test]
fn selling_while_flat_only_leaves_a_note() {
    let mut session = Session::new(&test_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![Some(Command::Sell), Some(Command::Quit)]);

    session.run(&mut console).expect("run");

    let view = session.view();
    assert_eq!(view.trade_count, 0);
    assert_eq!(view.open_entries, 0);
    assert!(view.notes.iter().any(|n| n.contains("No open position")));
}

#[test]
fn buy_then_sell_records_the_shown_prices() {
    let mut session = Session::new(&fast_tick_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![
        Some(Command::Buy),
        Some(Command::Sell),
        Some(Command::Quit),
    ]);

    session.run(&mut console).expect("run");

    assert_eq!(session.trades().len(), 1);
    let trade = &session.trades()[0];
    assert!((trade.buy - console.prices[0] as f64).abs() < f64::EPSILON);
    assert!((trade.sell - console.prices[1] as f64).abs() < f64::EPSILON);

    let view = session.view();
    assert_eq!(view.open_entries, 0);
    assert!((view.realized_profit - (trade.buy - trade.sell)).abs() < f64::EPSILON);
}

#[test]
fn status_reports_the_open_position() {
    let mut session = Session::new(&fast_tick_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![
        Some(Command::Buy),
        Some(Command::Status),
        Some(Command::Quit),
    ]);

    session.run(&mut console).expect("run");

    let view = session.view();
    assert!(view.notes.iter().any(|n| n.contains("position: 1 open")));
}

#[test]
fn help_command_repeats_the_key_listing() {
    let mut session = Session::new(&test_config()).expect("session");
    let mut console = ScriptedConsole::new(vec![Some(Command::Help), Some(Command::Quit)]);

    session.run(&mut console).expect("run");

    let view = session.view();
    let help_lines = view.notes.iter().filter(|n| n.contains("keys:")).count();
    // one from the session banner, one from the command
    assert_eq!(help_lines, 2);
}

#[test]
fn console_failure_aborts_the_run() {
    let mut session = Session::new(&test_config()).expect("session");
    let mut console = FailingConsole { presents: 0 };

    assert!(session.run(&mut console).is_err());
    assert_eq!(console.presents, 1);
    // the session stays inspectable for the shutdown report
    assert!(session.trades().is_empty());
}

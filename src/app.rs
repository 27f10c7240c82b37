//! Game loop: terminal input, effect wakeups and frame ticks on one task

use crate::cli::keyboard::KeyboardLayout;
use crate::cli::{Command, Display, Frame, InputHandler, InputMsg, InputPump};
use crate::config::GameConfig;
use crate::effects::{AnyPresenter, Capabilities, Delivery, TicketBook};
use crate::session::{Phase, ProgressionController, SessionState};
use anyhow::{bail, Context, Result};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Interval, MissedTickBehavior};

/// ~30 fps while animations play
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

type Game = ProgressionController<AnyPresenter>;

/// What the player achieved, printed after the terminal is restored
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub letters_answered: u32,
    pub wrong_guesses: u32,
    pub stages_cleared: usize,
    pub total_stages: usize,
    pub completed: bool,
    pub duration_secs: f64,
}

impl Summary {
    fn from_state(state: &SessionState, total_stages: usize) -> Self {
        Summary {
            letters_answered: state.letters_answered,
            wrong_guesses: state.wrong_guesses,
            stages_cleared: state.stage_index.min(total_stages),
            total_stages,
            completed: state.completed,
            duration_secs: state.duration_secs(),
        }
    }
}

/// Run one interactive session until the player quits
pub async fn run(config: GameConfig) -> Result<Summary> {
    let caps = Capabilities::detect();
    let presenter = AnyPresenter::select(config.presentation, &caps, config.timings, config.sound);
    let (tickets, mut wakeups) = TicketBook::channel();
    let mut game = ProgressionController::new(config.stages, config.timings, presenter, tickets);

    let mut display = Display::enter(config.sound).context("failed to set up terminal")?;
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = event_loop(&mut game, &mut display, &mut input, &mut wakeups, &mut frames).await;

    input.shutdown();
    display.shutdown().context("failed to restore terminal")?;
    result?;

    Ok(Summary::from_state(game.state(), game.stages().len()))
}

async fn event_loop(
    game: &mut Game,
    display: &mut Display,
    input: &mut InputPump,
    wakeups: &mut UnboundedReceiver<Delivery>,
    frames: &mut Interval,
) -> Result<()> {
    loop {
        tokio::select! {
            msg = input.recv() => match msg {
                Some(InputMsg::Event(event)) => {
                    if let Some(command) = InputHandler::classify(&event) {
                        if let Command::Resize { width, height } = command {
                            display.resize(width, height);
                        }
                        if apply(game, display.keyboard(), command).is_break() {
                            return Ok(());
                        }
                    }
                }
                Some(InputMsg::Error(e)) => bail!("input error: {e}"),
                None => bail!("input pump disconnected"),
            },
            Some(delivery) = wakeups.recv() => game.handle(delivery),
            _ = frames.tick() => {}
        }

        let now = Instant::now();
        game.presenter_mut().tick(now);
        let cues = game.presenter_mut().scene_mut().take_cues();
        display.play(&cues).context("failed to play sound cue")?;

        let frame = Frame {
            scene: game.presenter().scene(),
            phase: game.phase(),
            accepting: game.accepts_input(),
        };
        display.render(&frame, now).context("failed to draw frame")?;
    }
}

/// Apply one input command to the game. The display is resized by the caller.
fn apply(game: &mut Game, keyboard: &KeyboardLayout, command: Command) -> ControlFlow<()> {
    match command {
        Command::Quit => {
            tracing::info!(
                phase = ?game.phase(),
                pending_effects = game.pending_effects(),
                "player quit"
            );
            return ControlFlow::Break(());
        }
        Command::Start => match game.phase() {
            Phase::Idle => {
                game.start_game();
            }
            Phase::Completed => {
                game.reset();
                game.start_game();
            }
            _ => {}
        },
        Command::Key(key) => {
            let outcome = game.submit_input(key);
            tracing::trace!(?key, ?outcome, "key");
        }
        Command::Click { column, row } => {
            if let Some(letter) = keyboard.hit(column, row) {
                let outcome = game.submit_input(letter.lower());
                tracing::trace!(%letter, ?outcome, "on-screen key");
            }
        }
        Command::Resize { width, height } => game.presenter_mut().resize(width, height),
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timings;
    use crate::effects::MinimalPresenter;
    use crate::session::{Letter, StageTable};

    fn new_game(stages: &str) -> (Game, UnboundedReceiver<Delivery>) {
        let table = StageTable::from_json_str(stages).unwrap();
        let presenter = AnyPresenter::Minimal(MinimalPresenter::new(Timings::default(), false));
        let (tickets, wakeups) = TicketBook::channel();
        (
            ProgressionController::new(table, Timings::default(), presenter, tickets),
            wakeups,
        )
    }

    async fn settle(game: &mut Game, wakeups: &mut UnboundedReceiver<Delivery>) {
        while game.pending_effects() > 0 {
            let delivery = wakeups.recv().await.unwrap();
            game.handle(delivery);
        }
    }

    fn keyboard() -> KeyboardLayout {
        KeyboardLayout::centered(80, 14)
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_restarts_completed_game() {
        let (mut game, mut wakeups) = new_game(r#"{"stages": ["AB"]}"#);
        let keys = keyboard();

        // Enter before the game starts begins it
        assert!(apply(&mut game, &keys, Command::Start).is_continue());
        settle(&mut game, &mut wakeups).await;
        for key in ['a', 'b'] {
            apply(&mut game, &keys, Command::Key(key));
            settle(&mut game, &mut wakeups).await;
        }
        assert_eq!(game.phase(), Phase::Completed);
        assert_eq!(game.state().letters_answered, 2);

        apply(&mut game, &keys, Command::Start);
        assert!(game.state().active);
        assert_eq!(game.state().letters_answered, 0);
        assert_eq!(game.state().current_letter, Letter::from_char('a'));
        settle(&mut game, &mut wakeups).await;
        assert!(game.accepts_input());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_mid_game_changes_nothing() {
        let (mut game, mut wakeups) = new_game(r#"{"stages": ["AB"]}"#);
        let keys = keyboard();
        apply(&mut game, &keys, Command::Start);
        settle(&mut game, &mut wakeups).await;
        apply(&mut game, &keys, Command::Key('a'));
        settle(&mut game, &mut wakeups).await;

        apply(&mut game, &keys, Command::Start);
        assert_eq!(game.state().letter_index, 1);
        assert_eq!(game.state().letters_answered, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_goes_through_input_gate() {
        let (mut game, mut wakeups) = new_game(r#"{"stages": ["AB"]}"#);
        let keys = keyboard();
        let a = *keys.cell(Letter::from_char('a').unwrap()).unwrap();
        let click = Command::Click {
            column: a.column,
            row: a.row,
        };

        // before start and during the entrance the click is ignored
        apply(&mut game, &keys, click);
        assert_eq!(game.phase(), Phase::Idle);
        apply(&mut game, &keys, Command::Start);
        apply(&mut game, &keys, click);
        assert_eq!(game.state().letters_answered, 0);

        settle(&mut game, &mut wakeups).await;
        apply(&mut game, &keys, click);
        assert_eq!(game.state().letters_answered, 1);
        settle(&mut game, &mut wakeups).await;
        assert_eq!(game.state().current_letter, Letter::from_char('b'));

        // a click off the keyboard does nothing
        apply(&mut game, &keys, Command::Click { column: 0, row: 0 });
        assert_eq!(game.state().wrong_guesses, 0);
    }

    #[test]
    fn test_quit_breaks_the_loop() {
        let (mut game, _wakeups) = new_game(r#"{"stages": ["AB"]}"#);
        assert!(apply(&mut game, &keyboard(), Command::Quit).is_break());
    }

    #[test]
    fn test_summary_counts_cleared_stages() {
        let state = SessionState {
            stage_index: 2,
            letters_answered: 11,
            wrong_guesses: 4,
            active: true,
            ..SessionState::default()
        };
        let summary = Summary::from_state(&state, 5);
        assert_eq!(summary.stages_cleared, 2);
        assert_eq!(summary.letters_answered, 11);
        assert_eq!(summary.wrong_guesses, 4);
        assert!(!summary.completed);

        let done = SessionState {
            stage_index: 5,
            completed: true,
            ..SessionState::default()
        };
        let summary = Summary::from_state(&done, 5);
        assert_eq!(summary.stages_cleared, 5);
        assert!(summary.completed);
    }
}

//! Full-screen interactive mode: one sound bar, driven by mouse drags.
//!
//! The event loop uses `tokio::select!` to handle:
//! - Terminal input forwarded from a dedicated polling thread
//! - Animation ticks while the expand or fill transition is running
//!
//! Committed values are forwarded to the volume sync task when enabled.

use crate::geometry::{CellScale, LAYOUT, Placement};
use crate::gesture::{DragRecognizer, GestureEvent};
use crate::state::{ProgressState, on_drag_changed, on_drag_end};
use crate::transition::{Animation, DEFAULT_DURATION, TransitionChannels};
use crate::ui::sound_bar::{Backdrop, SoundBar};
use crate::ui::styles::BarStyles;
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::Backend, backend::CrosstermBackend};
use std::error::Error;
use std::io;
use std::pin::Pin;
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::Sleep;

/// Redraw interval while a transition is running.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// UI state for the interactive bar
pub struct BarUiState {
    pub progress: ProgressState,
    pub channels: TransitionChannels,
    pub gesture: DragRecognizer,
    /// Container placement of the last drawn frame; the drag surface.
    pub container: Option<Placement>,
    pub should_exit: bool,
    commit_tx: Option<mpsc::Sender<f64>>,
}

impl BarUiState {
    pub fn new(progress: ProgressState, animation: Duration) -> Self {
        Self {
            progress,
            channels: TransitionChannels::new(&progress, animation),
            gesture: DragRecognizer::new(),
            container: None,
            should_exit: false,
            commit_tx: None,
        }
    }

    pub fn with_commits(mut self, commit_tx: mpsc::Sender<f64>) -> Self {
        self.commit_tx = Some(commit_tx);
        self
    }

    /// Apply one gesture callback to the state and retarget the transitions.
    pub fn handle_gesture(&mut self, event: GestureEvent, now: Instant) {
        match event {
            GestureEvent::Changed { .. } => {
                // Full container height, including rows clipped by the frame.
                let height = self.container.map(|p| p.rows as f64).unwrap_or(0.0);
                self.progress = on_drag_changed(self.progress, event.offset(), height);
                self.channels.apply(&self.progress, Animation::Tracking, now);
            }
            GestureEvent::Ended => {
                let before = self.progress.committed;
                self.progress = on_drag_end(self.progress);
                self.channels.apply(&self.progress, Animation::Animated, now);
                if self.progress.committed != before {
                    self.commit();
                }
            }
        }
    }

    /// End an active drag as if the pointer had been released.
    fn cancel_drag(&mut self, now: Instant) {
        if let Some(gesture) = self.gesture.cancel() {
            self.handle_gesture(gesture, now);
        }
    }

    fn commit(&self) {
        let Some(tx) = &self.commit_tx else { return };
        let value = self.progress.committed;
        tracing::debug!(value, "progress committed");
        if let Err(e) = tx.try_send(value) {
            tracing::warn!(error = %e, value, "dropping committed value");
        }
    }
}

/// Run the interactive bar until the user quits. Returns the final
/// committed progress.
pub async fn run_interactive(
    progress: ProgressState,
    config: crate::Config,
) -> Result<f64, Box<dyn Error + Send + Sync>> {
    let animation = if config.no_animation { Duration::ZERO } else { DEFAULT_DURATION };
    let mut state = BarUiState::new(progress, animation);

    let mut terminal = setup_terminal().map_err(to_boxed_err)?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let sync_handle = if config.mpris {
        let (commit_tx, commit_rx) = mpsc::channel(32);
        state = state.with_commits(commit_tx);
        Some(tokio::spawn(crate::volume_sync::listen(commit_rx, shutdown_rx, config.clone())))
    } else {
        None
    };

    let result = event_loop(&mut terminal, &mut state).await;
    let restored = restore_terminal(&mut terminal);

    // Hang up so the sync task applies whatever is still queued, then stops.
    let committed = state.progress.committed;
    state.commit_tx = None;
    if let Some(handle) = sync_handle {
        if tokio::time::timeout(Duration::from_secs(1), handle).await.is_err() {
            tracing::warn!("volume sync did not finish in time");
            let _ = shutdown_tx.send(()).await;
        }
    }

    result?;
    restored.map_err(to_boxed_err)?;
    Ok(committed)
}

/// Enter raw mode and the alternate screen with mouse and focus reporting.
/// Raw mode is switched off again if any later step fails.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let entered = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)
        .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
    or_undo(entered, || {
        let mut stdout = io::stdout();
        let left = execute!(stdout, DisableFocusChange, DisableMouseCapture, LeaveAlternateScreen);
        first_failure([("disable raw mode", disable_raw_mode()), ("leave screen", left)])
    })
}

/// Put the terminal back. Every step runs even if an earlier one fails.
fn restore_terminal<W: io::Write>(terminal: &mut Terminal<CrosstermBackend<W>>) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
    let cursor = terminal.show_cursor();
    first_failure([
        ("disable raw mode", raw),
        ("leave screen", screen),
        ("show cursor", cursor),
    ])
}

/// Hand back `result`, running `undo` first when it is an error.
fn or_undo<T>(result: io::Result<T>, undo: impl FnOnce() -> io::Result<()>) -> io::Result<T> {
    result.or_else(|e| {
        if let Err(undo_err) = undo() {
            tracing::warn!(error = %undo_err, "terminal cleanup failed");
        }
        Err(e)
    })
}

/// Log every failed step and return the first failure.
fn first_failure<const N: usize>(steps: [(&str, io::Result<()>); N]) -> io::Result<()> {
    let mut first = Ok(());
    for (step, outcome) in steps {
        if let Err(e) = outcome {
            tracing::warn!(error = %e, step, "terminal restore step failed");
            if first.is_ok() {
                first = Err(e);
            }
        }
    }
    first
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut BarUiState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let styles = BarStyles::default();
    let scale = CellScale::default();
    // Single background thread to poll for crossterm events and forward them
    // to the async runtime. It exits once the receiver is dropped.
    let (event_tx, mut event_rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            match crossterm::event::poll(Duration::from_millis(100)) {
                Ok(true) => match crossterm::event::read() {
                    Ok(ev) => {
                        if event_tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => {}
                },
                Ok(false) => {
                    if event_tx.is_closed() {
                        break;
                    }
                }
                Err(_) => thread::sleep(Duration::from_millis(100)),
            }
        }
    });

    let mut next_tick: Option<Pin<Box<Sleep>>> = None;
    redraw_and_reschedule(terminal, state, &styles, scale, &mut next_tick)?;

    while !state.should_exit {
        tokio::select! {
            biased;

            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(event) => process_event(event, state, Instant::now()),
                    None => state.should_exit = true,
                }
                redraw_and_reschedule(terminal, state, &styles, scale, &mut next_tick)?;
            }

            _ = async {
                if let Some(s) = &mut next_tick {
                    s.as_mut().await;
                } else {
                    futures_util::future::pending::<()>().await;
                }
            } => {
                redraw_and_reschedule(terminal, state, &styles, scale, &mut next_tick)?;
            }
        }
    }
    Ok(())
}

/// Draw the current frame and schedule the next tick if a transition is
/// still running.
fn redraw_and_reschedule<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut BarUiState,
    styles: &BarStyles,
    scale: CellScale,
    next_tick: &mut Option<Pin<Box<Sleep>>>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let now = Instant::now();
    let mut placed = None;
    terminal
        .draw(|f| placed = Some(render_frame(f, state, styles, scale, now)))
        .map_err(to_boxed_err)?;
    state.container = placed;

    *next_tick = if state.channels.is_animating(now) {
        Some(Box::pin(tokio::time::sleep(FRAME_INTERVAL)))
    } else {
        None
    };
    Ok(())
}

/// Compose backdrop, track and fill for `now`. Returns where the bar landed.
pub fn render_frame(
    f: &mut Frame,
    state: &BarUiState,
    styles: &BarStyles,
    scale: CellScale,
    now: Instant,
) -> Placement {
    let area = f.area();
    f.render_widget(Backdrop { styles }, area);

    let (geometry, fill) = state.channels.frame_at(now);
    let placement = scale.place(geometry, area);
    f.render_widget(
        SoundBar {
            fill,
            corner_radius: LAYOUT.corner_radius,
            scale,
            placement,
            styles,
        },
        placement.visible,
    );
    placement
}

/// Handle user input events (mouse, keyboard, focus)
fn process_event(event: Event, state: &mut BarUiState, now: Instant) {
    match event {
        Event::Mouse(mouse) => {
            let surface = state.container.map(|p| p.visible);
            if let Some(gesture) = state.gesture.handle_mouse(&mouse, surface) {
                state.handle_gesture(gesture, now);
            }
        }
        Event::FocusLost => state.cancel_drag(now),
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Esc if state.gesture.is_dragging() => state.cancel_drag(now),
            KeyCode::Char('q') | KeyCode::Esc => {
                state.cancel_drag(now);
                state.should_exit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                state.cancel_drag(now);
                state.should_exit = true;
            }
            _ => {}
        },
        _ => {}
    }
}

fn to_boxed_err<E: std::error::Error + Send + Sync + 'static>(
    e: E,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}

//! Main event loop and deferred action event processing

use anyhow::Result;
use crossterm::event;
use std::time::{Duration, Instant};

use crate::constants::{COUNTDOWN_TICK_MS, FAST_POLL_MS, IDLE_POLL_MS};
use crate::deferred::ActionEvent;
use crate::input::{InputResult, handle_input};

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        let mut last_tick = Instant::now();

        loop {
            // Process queue events FIRST (non-blocking) - commits land here
            if self.process_action_events() {
                self.sync_view();
            }

            // Clear expired errors
            if self.state.clear_error_if_expired() {
                self.dirty = true;
            }

            // Keep undo countdowns moving
            if self.state.has_countdown()
                && last_tick.elapsed() >= Duration::from_millis(COUNTDOWN_TICK_MS)
            {
                self.sync_view();
                last_tick = Instant::now();
            }

            // Render only when dirty (non-blocking - sends to render thread)
            if self.dirty {
                render_thread.render(self.state.clone());
                self.dirty = false;
            }

            // Handle input (adaptive timeout: faster while loading or counting down)
            let poll_timeout = if self.state.status.loading || self.state.has_countdown() {
                FAST_POLL_MS
            } else {
                IDLE_POLL_MS
            };
            // Timer tasks run on the other runtime workers while this blocks
            if event::poll(Duration::from_millis(poll_timeout))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.state, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => {
                        self.state.acknowledge_error();
                        self.handle_action(action).await?;
                    }
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }

    /// Drain lifecycle events from the queue. Returns true if any arrived.
    pub(crate) fn process_action_events(&mut self) -> bool {
        let mut had_events = false;

        while let Ok(event) = self.action_events.try_recv() {
            had_events = true;
            tracing::debug!("Received action event: {:?}", event);

            match event {
                ActionEvent::Committed { count, .. } => {
                    self.state.set_status(format!("Deleted {} email(s)", count));
                }
                ActionEvent::Failed { count, reason, .. } => {
                    self.state.set_error(format!(
                        "Failed to delete {} email(s): {}. R to retry, x to keep.",
                        count, reason
                    ));
                }
                ActionEvent::Scheduled { .. } | ActionEvent::Cancelled { .. } => {}
            }
        }

        had_events
    }
}

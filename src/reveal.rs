//! Typewriter Reveal Scheduling
//!
//! Decouples network delivery from on-screen pacing: deltas land in the
//! message buffer as fast as they arrive, but the display exposes them at
//! a constant rate so bursty delivery still reads as smooth typing.
//!
//! The scheduler is a pure tick-driven state machine; the caller owns the
//! timer (typically a `tokio::time::interval`) and must cancel it when
//! [`tick`](RevealScheduler::tick) reports catch-up or when the display
//! component is torn down, so no recurring tick outlives its message.
//!
//! ```ignore
//! let mut reveal = RevealScheduler::new(RevealConfig::default());
//! let mut timer = tokio::time::interval(reveal.tick_interval());
//! timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
//! loop {
//!     timer.tick().await;
//!     if !reveal.tick() {
//!         break; // caught up, stop the timer until the next delta
//!     }
//!     redraw(reveal.visible(message.content()));
//! }
//! ```

use std::time::Duration;

/// Pacing configuration for the reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealConfig {
    /// Characters exposed per tick. A small constant, not proportional to
    /// the remaining gap: the reveal runs at a fixed rate instead of
    /// sprinting to catch up.
    pub chars_per_tick: usize,
    /// Interval between ticks.
    pub tick_interval: Duration,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            chars_per_tick: 3,
            tick_interval: Duration::from_millis(30),
        }
    }
}

/// Where the scheduler is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    /// Not streaming; content is static.
    Idle,
    /// Revealed length is chasing the target; timer should be running.
    Revealing,
    /// Revealed length has reached the target; timer should be stopped.
    CaughtUp,
}

/// Per-message reveal state: a (revealed, target) pair of character
/// counts, both monotonically non-decreasing, with revealed ≤ target.
#[derive(Clone, Debug)]
pub struct RevealScheduler {
    config: RevealConfig,
    revealed: usize,
    target: usize,
    phase: RevealPhase,
    finalized: bool,
}

impl RevealScheduler {
    /// Create a scheduler in the idle phase.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            revealed: 0,
            target: 0,
            phase: RevealPhase::Idle,
            finalized: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Characters currently exposed to the display.
    #[must_use]
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Characters received so far (the reveal ceiling).
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Whether the message has been finalized.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The configured tick interval, for driving the caller's timer.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval
    }

    /// Record that a delta of `added_chars` characters arrived.
    ///
    /// Returns `true` when the timer must be (re)started: the first delta
    /// while idle, or a delta arriving after the scheduler caught up.
    /// After finalization this is a no-op; content is static then.
    pub fn push_target(&mut self, added_chars: usize) -> bool {
        if self.finalized || added_chars == 0 {
            return false;
        }
        self.target += added_chars;

        if self.phase == RevealPhase::Revealing {
            return false;
        }
        self.phase = RevealPhase::Revealing;
        true
    }

    /// Advance the reveal by one tick.
    ///
    /// Exposes at most `chars_per_tick` more characters, never past the
    /// target. Returns `true` while the timer should keep running; `false`
    /// means caught up (timer cancelled until the next delta).
    pub fn tick(&mut self) -> bool {
        if self.phase != RevealPhase::Revealing {
            return false;
        }
        self.revealed = (self.revealed + self.config.chars_per_tick).min(self.target);
        if self.revealed == self.target {
            self.phase = RevealPhase::CaughtUp;
            return false;
        }
        true
    }

    /// Streaming ended: snap straight to the full content.
    ///
    /// `total_chars` is the final content length in characters. From here
    /// on the scheduler is bypassed entirely.
    pub fn finalize(&mut self, total_chars: usize) {
        self.revealed = total_chars;
        self.target = total_chars;
        self.phase = RevealPhase::Idle;
        self.finalized = true;
    }

    /// Slice the currently visible prefix of `content`.
    ///
    /// Cuts on character boundaries only, so a multi-byte character is
    /// never split. A finalized message is fully visible regardless of
    /// counts.
    #[must_use]
    pub fn visible<'a>(&self, content: &'a str) -> &'a str {
        if self.finalized {
            return content;
        }
        match content.char_indices().nth(self.revealed) {
            Some((idx, _)) => &content[..idx],
            None => content,
        }
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scheduler(chars_per_tick: usize) -> RevealScheduler {
        RevealScheduler::new(RevealConfig {
            chars_per_tick,
            tick_interval: Duration::from_millis(30),
        })
    }

    #[test]
    fn test_starts_idle() {
        let reveal = RevealScheduler::default();
        assert_eq!(reveal.phase(), RevealPhase::Idle);
        assert_eq!(reveal.revealed(), 0);
        assert_eq!(reveal.target(), 0);
    }

    #[test]
    fn test_first_delta_starts_timer() {
        let mut reveal = scheduler(3);
        assert!(reveal.push_target(5));
        assert_eq!(reveal.phase(), RevealPhase::Revealing);
        // Further deltas while revealing do not restart the timer.
        assert!(!reveal.push_target(5));
    }

    #[test]
    fn test_tick_reveals_constant_chunk() {
        let mut reveal = scheduler(3);
        reveal.push_target(10);

        assert!(reveal.tick());
        assert_eq!(reveal.revealed(), 3);
        assert!(reveal.tick());
        assert_eq!(reveal.revealed(), 6);
        assert!(reveal.tick());
        assert_eq!(reveal.revealed(), 9);
        // Final tick clamps to target and reports catch-up.
        assert!(!reveal.tick());
        assert_eq!(reveal.revealed(), 10);
        assert_eq!(reveal.phase(), RevealPhase::CaughtUp);
    }

    #[test]
    fn test_tick_after_caught_up_is_noop() {
        let mut reveal = scheduler(4);
        reveal.push_target(4);
        assert!(!reveal.tick());
        assert_eq!(reveal.revealed(), 4);
        // A stray tick after catch-up must not reveal past the target.
        assert!(!reveal.tick());
        assert_eq!(reveal.revealed(), 4);
    }

    #[test]
    fn test_delta_after_caught_up_restarts_timer() {
        let mut reveal = scheduler(4);
        reveal.push_target(4);
        assert!(!reveal.tick());
        assert_eq!(reveal.phase(), RevealPhase::CaughtUp);

        assert!(reveal.push_target(2));
        assert_eq!(reveal.phase(), RevealPhase::Revealing);
        assert!(!reveal.tick());
        assert_eq!(reveal.revealed(), 6);
    }

    #[test]
    fn test_revealed_never_exceeds_target() {
        let mut reveal = scheduler(7);
        reveal.push_target(5);
        for _ in 0..10 {
            reveal.tick();
            assert!(reveal.revealed() <= reveal.target());
        }
        assert_eq!(reveal.revealed(), 5);
    }

    #[test]
    fn test_finalize_snaps_immediately() {
        let mut reveal = scheduler(3);
        reveal.push_target(100);
        reveal.tick();
        assert_eq!(reveal.revealed(), 3);

        reveal.finalize(120);
        assert_eq!(reveal.revealed(), 120);
        assert_eq!(reveal.target(), 120);
        assert_eq!(reveal.phase(), RevealPhase::Idle);
        assert!(reveal.is_finalized());
    }

    #[test]
    fn test_updates_after_finalize_are_bypassed() {
        let mut reveal = scheduler(3);
        reveal.finalize(10);
        assert!(!reveal.push_target(5));
        assert!(!reveal.tick());
        assert_eq!(reveal.target(), 10);
    }

    #[test]
    fn test_visible_respects_char_boundaries() {
        let mut reveal = scheduler(1);
        let content = "héllo 🎓!";
        reveal.push_target(content.chars().count());

        let mut last_len = 0;
        loop {
            let keep_going = reveal.tick();
            let visible = reveal.visible(content);
            // Always a valid prefix, never sliced mid-character.
            assert!(content.starts_with(visible));
            assert!(visible.chars().count() >= last_len);
            last_len = visible.chars().count();
            if !keep_going {
                break;
            }
        }
        assert_eq!(reveal.visible(content), content);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_driven_reveal() {
        let mut reveal = scheduler(2);
        reveal.push_target(6);

        let mut timer = tokio::time::interval(reveal.tick_interval());
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        timer.tick().await; // first tick fires immediately

        while reveal.tick() {
            timer.tick().await;
        }
        assert_eq!(reveal.revealed(), 6);
        assert_eq!(reveal.phase(), RevealPhase::CaughtUp);
    }

    #[test]
    fn test_visible_after_finalize_is_full_content() {
        let mut reveal = scheduler(1);
        reveal.push_target(3);
        reveal.finalize(3);
        assert_eq!(reveal.visible("abc"), "abc");
    }
}

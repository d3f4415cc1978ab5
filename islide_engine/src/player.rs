//! Timeline playback.
//!
//! ```text
//! Stopped --play--> Playing --pause--> Paused --play--> Playing
//!    ^                 |                  |
//!    +------stop-------+-------stop-------+
//!    +--last step------+
//! ```
//!
//! Seeking is transient: the target step fires and the player goes back
//! to the state it was in, rescheduling the next advance when playing.

use std::time::Duration;

use islide_model::position::DeviceClass;
use smallvec::SmallVec;

use crate::{
    cue::EffectCue,
    interaction::cue_for,
    timeline::{TimelineConfig, TimelineStep},
    timer::Timer,
};

pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
    Seeking,
}

#[derive(Debug)]
pub struct TimelinePlayer {
    steps: Vec<TimelineStep>,
    current: Option<usize>,
    state: PlaybackState,
    speed: f32,
    timer: Timer,
    config: TimelineConfig,
    device_class: DeviceClass,
}

impl TimelinePlayer {
    pub fn new(steps: Vec<TimelineStep>, config: TimelineConfig) -> Self {
        Self {
            steps,
            current: None,
            state: PlaybackState::Stopped,
            speed: 1.0,
            timer: Timer::default(),
            config,
            device_class: DeviceClass::default(),
        }
    }

    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_step(&self) -> Option<&TimelineStep> {
        self.steps.get(self.current?)
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// When the next automatic advance is due, if one is scheduled
    pub const fn next_advance_at(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Rectangles of fired effects are resolved for this device class
    pub fn set_device_class(&mut self, device_class: DeviceClass) {
        self.device_class = device_class;
    }

    /// Starts or resumes playback.
    ///
    /// Resuming continues after the current step without firing it
    /// again. Playing from before the first step, or from the last one,
    /// starts over at step 1.
    pub fn play(&mut self, now: Duration) -> Option<EffectCue> {
        if self.steps.is_empty() || self.state == PlaybackState::Playing {
            return None;
        }

        self.state = PlaybackState::Playing;
        match self.current {
            Some(index) if index + 1 < self.steps.len() => {
                tracing::debug!(index, "Resuming playback");
                self.schedule_next(now);
                None
            }
            _ => {
                tracing::debug!("Starting playback");
                let cue = self.fire(0);
                self.schedule_next(now);
                Some(cue)
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.timer.cancel();
            self.state = PlaybackState::Paused;
            tracing::debug!(index = ?self.current, "Paused");
        }
    }

    pub fn toggle_play_pause(&mut self, now: Duration) -> Option<EffectCue> {
        if self.state == PlaybackState::Playing {
            self.pause();
            None
        } else {
            self.play(now)
        }
    }

    /// Stops playback, staying on the current step
    pub fn stop(&mut self) {
        self.timer.cancel();
        if self.state != PlaybackState::Stopped {
            tracing::debug!(index = ?self.current, "Stopped");
        }
        self.state = PlaybackState::Stopped;
    }

    /// Stops and rewinds to before the first step
    pub fn reset(&mut self) {
        self.stop();
        self.current = None;
    }

    /// Jumps to step `index` (clamped) and fires it. Steps in between are
    /// skipped. A pending advance is dropped and, while playing, the next
    /// one is scheduled from the target.
    pub fn seek(&mut self, index: usize, now: Duration) -> Option<EffectCue> {
        let last = self.steps.len().checked_sub(1)?;
        let index = index.min(last);

        self.timer.cancel();
        let resume = self.state;
        self.state = PlaybackState::Seeking;
        tracing::debug!(index, "Seeking");
        let cue = self.fire(index);

        self.state = resume;
        if resume == PlaybackState::Playing {
            self.schedule_next(now);
        }
        Some(cue)
    }

    pub fn step_forward(&mut self, now: Duration) -> Option<EffectCue> {
        let target = self.current.map_or(0, |index| index + 1);
        if target >= self.steps.len() {
            return None;
        }
        self.seek(target, now)
    }

    pub fn step_back(&mut self, now: Duration) -> Option<EffectCue> {
        let target = match self.current {
            Some(0) => return None,
            Some(index) => index - 1,
            None => 0,
        };
        self.seek(target, now)
    }

    /// Seeks to a 1 based step number, as typed on a number key
    pub fn jump_to_step(&mut self, step_number: usize, now: Duration) -> Option<EffectCue> {
        let index = step_number.checked_sub(1)?;
        self.seek(index, now)
    }

    /// Playback speed, clamped to `MIN_SPEED..=MAX_SPEED`. It applies from
    /// the next scheduled advance and never changes effect durations.
    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_finite() || speed <= 0.0 {
            tracing::warn!(speed, "Ignoring invalid playback speed");
            return;
        }
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Swaps in freshly derived steps, e.g. after the deck was edited
    pub fn set_steps(&mut self, steps: Vec<TimelineStep>) {
        self.stop();
        self.steps = steps;
        self.current = match self.steps.len().checked_sub(1) {
            Some(last) => self.current.map(|index| index.min(last)),
            None => None,
        };
    }

    /// Stops and forgets every step
    pub fn close(&mut self) {
        self.reset();
        self.steps.clear();
    }

    /// Advances for every deadline that passed by `now`, returning the
    /// cues of the steps fired on the way
    pub fn poll(&mut self, now: Duration) -> SmallVec<[EffectCue; 1]> {
        let mut fired = SmallVec::new();
        while let Some(deadline) = self.timer.fire_if_due(now) {
            let Some(next) = self.current.map(|index| index + 1).filter(|&n| n < self.steps.len())
            else {
                self.stop();
                break;
            };
            fired.push(self.fire(next));
            self.schedule_next(deadline);
        }
        fired
    }

    fn fire(&mut self, index: usize) -> EffectCue {
        self.current = Some(index);
        let step = &self.steps[index];
        tracing::trace!(step = step.step_number, element = %step.element_id, "Firing step");
        cue_for(
            &step.element_id,
            &step.element_position,
            &step.interaction,
            self.device_class,
            Some(step.step_number),
        )
    }

    /// Arms the timer for the step after the current one, or stops when
    /// the current step is the last
    fn schedule_next(&mut self, from: Duration) {
        let Some(current) = self.current else {
            return;
        };
        let Some(next) = self.steps.get(current + 1) else {
            self.stop();
            return;
        };

        let gap = (next.timestamp - self.steps[current].timestamp).max(0.0);
        let delay = Duration::try_from_secs_f64(gap / f64::from(self.speed))
            .unwrap_or(Duration::MAX)
            .max(self.config.min_advance_delay());
        self.timer.schedule(from, delay);
    }
}

#[cfg(test)]
mod tests {
    use islide_model::interaction::Trigger;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::config::EngineConfig;
    use crate::timeline::{
        derive_steps,
        tests::{deck, element},
    };

    const fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn player(durations: &[u64]) -> TimelinePlayer {
        let bindings: Vec<(Trigger, u64)> =
            durations.iter().map(|d| (Trigger::Click, *d)).collect();
        let deck = deck(vec![vec![element("el", &bindings)]]);
        let config = TimelineConfig::default();
        TimelinePlayer::new(derive_steps(&deck, &config), config)
    }

    #[test]
    fn plays_to_the_end_and_stops() {
        let deck = deck(vec![vec![
            element("first", &[(Trigger::Click, 1000)]),
            element("second", &[(Trigger::Click, 0)]),
        ]]);
        let config = TimelineConfig::default();
        let mut player = TimelinePlayer::new(derive_steps(&deck, &config), config);
        let timestamps: Vec<f64> = player.steps().iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, [0.0, 2.0]);

        let first = player.play(ms(0)).unwrap();
        assert_eq!(first.step, Some(1));
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.next_advance_at(), Some(ms(2000)));

        assert!(player.poll(ms(1999)).is_empty());
        let fired = player.poll(ms(2000));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].step, Some(2));

        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.current_index(), Some(1));
        assert_eq!(player.next_advance_at(), None);
        assert!(player.poll(ms(10_000)).is_empty());
    }

    #[test]
    fn huge_step_gap_waits_forever() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"timeline":{"stepGapSecs":1e20}}"#).unwrap();
        let deck = deck(vec![vec![
            element("first", &[(Trigger::Click, 0)]),
            element("second", &[(Trigger::Click, 0)]),
        ]]);
        let steps = derive_steps(&deck, &config.timeline);
        let mut player = TimelinePlayer::new(steps, config.timeline);

        let first = player.play(ms(5)).unwrap();
        assert_eq!(first.step, Some(1));
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.next_advance_at(), Some(Duration::MAX));
        assert!(player.poll(ms(1_000_000)).is_empty());
    }

    #[test]
    fn late_poll_catches_up() {
        let mut player = player(&[0, 0, 0, 0]);
        player.play(ms(0));

        let fired = player.poll(ms(3500));
        let steps: Vec<Option<u32>> = fired.iter().map(|c| c.step).collect();
        assert_eq!(steps, [Some(2), Some(3), Some(4)]);
        assert_eq!(player.state(), PlaybackState::Stopped);
    }

    #[test]
    fn scrub_cancels_pending_advance() {
        let mut player = player(&[3000, 3000, 3000]);
        player.play(ms(0));
        assert_eq!(player.next_advance_at(), Some(ms(4000)));
        player.pause();
        assert_eq!(player.next_advance_at(), None);

        let cue = player.seek(2, ms(500)).unwrap();
        assert_eq!(cue.step, Some(3));
        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.next_advance_at(), None);
        // The deadline from before the pause is gone for good
        assert!(player.poll(ms(4000)).is_empty());
        assert_eq!(player.current_index(), Some(2));
    }

    #[test]
    fn seeking_while_playing_continues_from_target() {
        let mut player = player(&[0, 0, 0, 0]);
        player.play(ms(0));

        let cue = player.seek(99, ms(300)).unwrap();
        assert_eq!(cue.step, Some(4));
        assert_eq!(player.current_index(), Some(3));
        // Last step, nothing left to schedule
        assert_eq!(player.state(), PlaybackState::Stopped);

        let mut player = self::player(&[0, 0, 0, 0]);
        player.play(ms(0));
        player.seek(1, ms(300));
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.next_advance_at(), Some(ms(1300)));
    }

    #[rstest]
    #[case(1.0, 3000)]
    #[case(2.0, 1500)]
    #[case(4.0, 1000)]
    #[case(100.0, 1000)]
    #[case(0.5, 6000)]
    #[case(0.01, 12_000)]
    fn speed_only_scales_scheduling(#[case] speed: f32, #[case] delay_ms: u64) {
        let mut player = player(&[2000, 500]);
        player.set_speed(speed);

        let cue = player.play(ms(0)).unwrap();
        assert_eq!(player.next_advance_at(), Some(ms(delay_ms)));
        assert_eq!(cue.effect.duration, ms(2000));
    }

    #[test]
    fn speed_change_applies_from_next_scheduling() {
        let mut player = player(&[1000, 1000, 1000]);
        player.play(ms(0));
        assert_eq!(player.next_advance_at(), Some(ms(2000)));

        player.set_speed(2.0);
        assert_eq!(player.next_advance_at(), Some(ms(2000)));
        player.poll(ms(2000));
        assert_eq!(player.next_advance_at(), Some(ms(3000)));

        player.set_speed(f32::NAN);
        player.set_speed(-1.0);
        assert_eq!(player.speed(), 2.0);
    }

    #[test]
    fn pause_and_resume_without_refiring() {
        let mut player = player(&[1000, 1000, 1000]);
        player.play(ms(0));
        player.pause();
        assert_eq!(player.state(), PlaybackState::Paused);

        assert_eq!(player.play(ms(5000)), None);
        assert_eq!(player.current_index(), Some(0));
        assert_eq!(player.next_advance_at(), Some(ms(7000)));

        assert_eq!(player.toggle_play_pause(ms(5100)), None);
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[test]
    fn play_from_the_end_restarts() {
        let mut player = player(&[0, 0]);
        player.seek(1, ms(0));
        let cue = player.play(ms(10)).unwrap();
        assert_eq!(cue.step, Some(1));
        assert_eq!(player.current_index(), Some(0));
    }

    #[test]
    fn stepping_and_number_keys() {
        let mut player = player(&[0, 0, 0]);

        assert_eq!(player.step_back(ms(0)).and_then(|c| c.step), Some(1));
        assert_eq!(player.step_back(ms(0)), None);
        assert_eq!(player.step_forward(ms(0)).and_then(|c| c.step), Some(2));
        assert_eq!(player.step_forward(ms(0)).and_then(|c| c.step), Some(3));
        assert_eq!(player.step_forward(ms(0)), None);

        assert_eq!(player.jump_to_step(2, ms(0)).and_then(|c| c.step), Some(2));
        assert_eq!(player.jump_to_step(0, ms(0)), None);
        assert_eq!(player.jump_to_step(9, ms(0)).and_then(|c| c.step), Some(3));
        assert_eq!(player.state(), PlaybackState::Stopped);

        player.reset();
        assert_eq!(player.current_index(), None);
        assert_eq!(player.step_forward(ms(0)).and_then(|c| c.step), Some(1));
    }

    #[test]
    fn empty_timeline_ignores_transport() {
        let mut player = TimelinePlayer::new(Vec::new(), TimelineConfig::default());

        assert_eq!(player.play(ms(0)), None);
        assert_eq!(player.seek(3, ms(0)), None);
        assert_eq!(player.step_forward(ms(0)), None);
        assert_eq!(player.step_back(ms(0)), None);
        assert_eq!(player.jump_to_step(1, ms(0)), None);
        assert!(player.poll(ms(10_000)).is_empty());
        assert_eq!(player.state(), PlaybackState::Stopped);
    }

    #[test]
    fn new_steps_stop_and_clamp() {
        let mut player = player(&[0, 0, 0]);
        player.play(ms(0));
        player.seek(2, ms(0));

        let shorter = self::player(&[0]).steps().to_vec();
        player.set_steps(shorter);
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.current_index(), Some(0));
        assert_eq!(player.next_advance_at(), None);

        player.set_steps(Vec::new());
        assert_eq!(player.current_index(), None);
    }

    #[test]
    fn close_clears_timer_and_steps() {
        let mut player = player(&[0, 0]);
        player.play(ms(0));
        player.close();

        assert!(player.steps().is_empty());
        assert_eq!(player.next_advance_at(), None);
        assert!(player.poll(ms(60_000)).is_empty());
    }
}

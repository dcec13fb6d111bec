//! Gesture handling: turns taps and swipes into sound, bounce and movement.
//!
//! Nothing here waits. Every handler runs to completion on the event
//! thread, retargets whatever animations it touches and returns; the frame
//! loop then calls [`Controller::advance`] to move animations forward and
//! to step the tap bounce sequence. A new gesture never queues behind an
//! animation in flight: it overwrites targets, and the sequence reads the
//! latest targets on the next tick.

use std::time::Duration;

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::engine::audio::{AudioPlayer, Playback, PlaybackHandle};
use crate::engine::input::Gesture;
use crate::game::catalog::{Catalog, Color, Item, ItemId};
use crate::game::state::frame_clock::MAX_FRAME_STEP;
use crate::game::state::{BouncePhase, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing animating
    Idle,
    /// Bounce, color pulse or relocation in flight
    Reacting,
}

/// What the render surface needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    pub background: Color,
    /// Top-left corner of the unscaled icon (logical px)
    pub position: Vec2,
    pub scale: f32,
    pub item: ItemId,
    pub icon_size: f32,
}

pub struct Controller<A: AudioPlayer, R: Rng> {
    catalog: Catalog,
    audio: A,
    rng: R,
    config: GameConfig,
    screen: Vec2,
    session: Session,
}

impl<A: AudioPlayer, R: Rng> Controller<A, R> {
    /// Pick a random first item and position, and start loading every
    /// item's sound
    pub fn new(catalog: Catalog, mut audio: A, mut rng: R, config: GameConfig, screen: Vec2) -> Self {
        for item in catalog.items() {
            audio.prepare(item);
        }
        let current = catalog.pick_random(&mut rng);
        let position = random_position(&mut rng, screen, config.icon_size);
        info!(
            "Session started with {} items, first: {}",
            catalog.len(),
            catalog.get(current).name
        );
        Self {
            catalog,
            audio,
            rng,
            config,
            screen,
            session: Session::new(current, position),
        }
    }

    /// Route a recognized gesture to its handler
    pub fn handle_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Tap { at } => {
                if self.hit_test(at) {
                    self.on_tap();
                }
            }
            Gesture::DragSample { .. } => {
                self.on_drag_sample();
            }
            Gesture::DragEnd { total } => {
                self.on_swipe(total);
            }
            Gesture::DragCancel => {}
        }
    }

    /// Sound, bounce, color pulse and relocation, all at once
    pub fn on_tap(&mut self) {
        // newest wins: the previous tap sound is cut off
        if let Some(previous) = self.session.active_playback.take() {
            self.audio.stop(previous);
        }
        let item = self.catalog.get(self.session.current);
        self.session.active_playback = self.audio.play(item, Playback::FULL);
        let pulse = item.color.with_alpha(self.config.pulse_alpha);
        debug!("Tap on {}", item.name);

        self.session
            .background
            .animate_to(pulse.to_vec4(), self.config.settle_spring);
        self.session
            .scale
            .animate_to(self.config.bounce_peak, self.config.bounce_spring);
        self.session.bounce = BouncePhase::Rising;
        self.relocate();
    }

    /// Switch to another item if the drag was long enough.
    /// Returns whether the drag counted as a swipe.
    pub fn on_swipe(&mut self, drag: Vec2) -> bool {
        let magnitude = self.config.swipe_axis.magnitude(drag);
        if magnitude <= self.config.swipe_threshold {
            debug!("Drag of {:.1} below swipe threshold", magnitude);
            return false;
        }
        if let Some(previous) = self.session.active_playback.take() {
            self.audio.stop(previous);
        }
        self.session.current = self
            .catalog
            .pick_random_excluding(self.session.current, &mut self.rng);
        debug!("Swipe to {}", self.catalog.get(self.session.current).name);
        self.relocate();
        true
    }

    /// Maybe play a quiet, short sound for one drag movement sample.
    ///
    /// Each sample is an independent trial with probability
    /// `1 / drag_sound_odds`, so faster input polling means more sounds.
    /// These sounds are not tracked and never cut off a tap sound.
    pub fn on_drag_sample(&mut self) -> Option<PlaybackHandle> {
        if !self.rng.gen_ratio(1, self.config.drag_sound_odds) {
            return None;
        }
        let item = self.catalog.get(self.session.current);
        self.audio.play(item, self.config.ambient)
    }

    /// Move every animation forward by `dt` and step the bounce sequence
    pub fn advance(&mut self, dt: Duration) {
        self.audio.poll();
        let dt = dt.min(MAX_FRAME_STEP).as_secs_f32();
        self.session.step(dt);

        match self.session.bounce {
            BouncePhase::Rising if self.session.scale.is_settled() => {
                self.session.scale.animate_to(1.0, self.config.settle_spring);
                self.session.bounce = BouncePhase::Settling;
            }
            BouncePhase::Settling if self.session.scale.is_settled() => {
                self.session
                    .background
                    .animate_to(Color::WHITE.to_vec4(), self.config.settle_spring);
                self.session.bounce = BouncePhase::Idle;
            }
            _ => {}
        }
    }

    /// Window resized or rotated; keep the icon on screen
    pub fn set_screen_size(&mut self, screen: Vec2) {
        self.screen = screen;
        let max = self.max_position();
        self.session.position.constrain(|p| p.clamp(Vec2::ZERO, max));
    }

    /// Whether `at` falls on the icon as currently drawn
    pub fn hit_test(&self, at: Vec2) -> bool {
        let half = Vec2::splat(self.config.icon_size * self.session.scale.value() * 0.5);
        let center = self.position() + Vec2::splat(self.config.icon_size * 0.5);
        let offset = (at - center).abs();
        offset.x <= half.x && offset.y <= half.y
    }

    pub fn state(&self) -> InteractionState {
        if self.session.bounce != BouncePhase::Idle || self.session.is_moving() {
            InteractionState::Reacting
        } else {
            InteractionState::Idle
        }
    }

    pub fn frame(&self) -> FrameSnapshot {
        FrameSnapshot {
            background: self.background_color(),
            position: self.position(),
            scale: self.scale(),
            item: self.session.current,
            icon_size: self.config.icon_size,
        }
    }

    pub fn current_id(&self) -> ItemId {
        self.session.current
    }

    pub fn current_item(&self) -> &Item {
        self.catalog.get(self.session.current)
    }

    pub fn background_color(&self) -> Color {
        Color::from_vec4(self.session.background.value())
    }

    pub fn background_target(&self) -> Color {
        Color::from_vec4(self.session.background.target())
    }

    /// Current icon position, always inside the screen
    pub fn position(&self) -> Vec2 {
        self.session.position.value().clamp(Vec2::ZERO, self.max_position())
    }

    pub fn position_target(&self) -> Vec2 {
        self.session.position.target()
    }

    pub fn scale(&self) -> f32 {
        self.session.scale.value()
    }

    pub fn bounce_phase(&self) -> BouncePhase {
        self.session.bounce
    }

    pub fn active_playback(&self) -> Option<PlaybackHandle> {
        self.session.active_playback
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Release audio; the screen is going away
    pub fn shutdown(&mut self) {
        self.session.active_playback = None;
        self.audio.release();
    }

    fn relocate(&mut self) {
        let target = random_position(&mut self.rng, self.screen, self.config.icon_size);
        self.session.position.animate_to(target, self.config.move_spring);
    }

    fn max_position(&self) -> Vec2 {
        max_position(self.screen, self.config.icon_size)
    }
}

fn max_position(screen: Vec2, icon_size: f32) -> Vec2 {
    (screen - Vec2::splat(icon_size)).max(Vec2::ZERO)
}

/// Uniform point in `[0, screen - icon]` on both axes
pub fn random_position(rng: &mut impl Rng, screen: Vec2, icon_size: f32) -> Vec2 {
    let max = max_position(screen, icon_size);
    Vec2::new(rng.gen::<f32>() * max.x, rng.gen::<f32>() * max.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::{Instrument, SoundSource};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Hands out handles for everything and remembers what is still playing
    #[derive(Default)]
    struct FakeAudio {
        next: u64,
        playing: Vec<PlaybackHandle>,
        played: Vec<(&'static str, Playback)>,
        released: bool,
    }

    impl AudioPlayer for FakeAudio {
        fn prepare(&mut self, _item: &Item) {}

        fn play(&mut self, item: &Item, playback: Playback) -> Option<PlaybackHandle> {
            self.next += 1;
            let handle = PlaybackHandle(self.next);
            self.playing.push(handle);
            self.played.push((item.name, playback));
            Some(handle)
        }

        fn stop(&mut self, handle: PlaybackHandle) {
            self.playing.retain(|h| *h != handle);
        }

        fn release(&mut self) {
            self.playing.clear();
            self.released = true;
        }
    }

    fn catalog() -> Catalog {
        let item = |name, argb| Item {
            name,
            image: None,
            color: Color::from_argb(argb),
            sound: SoundSource::Synth(Instrument::Bell),
        };
        Catalog::new(vec![item("a", 0xFF00FF00), item("b", 0xFFFF0000)]).unwrap()
    }

    fn controller(seed: u64) -> Controller<FakeAudio, ChaCha8Rng> {
        Controller::new(
            catalog(),
            FakeAudio::default(),
            ChaCha8Rng::seed_from_u64(seed),
            GameConfig::default(),
            Vec2::new(480.0, 800.0),
        )
    }

    fn settle(c: &mut Controller<FakeAudio, ChaCha8Rng>) {
        for _ in 0..1200 {
            if c.state() == InteractionState::Idle {
                return;
            }
            c.advance(Duration::from_millis(16));
        }
        panic!("never settled");
    }

    #[test]
    fn bounce_runs_rising_settling_idle() {
        let mut c = controller(1);
        c.on_tap();
        assert_eq!(c.bounce_phase(), BouncePhase::Rising);
        assert_eq!(c.state(), InteractionState::Reacting);

        let mut saw_settling = false;
        for _ in 0..600 {
            c.advance(Duration::from_millis(16));
            if c.bounce_phase() == BouncePhase::Settling {
                saw_settling = true;
                // the pulse holds until the scale is back
                assert_eq!(c.background_target().a, 0.1);
            }
        }
        assert!(saw_settling);
        assert_eq!(c.bounce_phase(), BouncePhase::Idle);
        assert_eq!(c.scale(), 1.0);
        assert_eq!(c.background_color(), Color::WHITE);
        assert_eq!(c.state(), InteractionState::Idle);
    }

    #[test]
    fn tap_mid_bounce_restarts_from_current_scale() {
        let mut c = controller(2);
        c.on_tap();
        for _ in 0..20 {
            c.advance(Duration::from_millis(16));
        }
        let mid = c.scale();
        c.on_tap();
        assert_eq!(c.scale(), mid);
        assert_eq!(c.bounce_phase(), BouncePhase::Rising);
        settle(&mut c);
        assert_eq!(c.scale(), 1.0);
    }

    #[test]
    fn newest_tap_wins() {
        let mut c = controller(3);
        c.on_tap();
        let first = c.active_playback().unwrap();
        c.on_tap();
        let second = c.active_playback().unwrap();
        assert_ne!(first, second);
        assert_eq!(c.audio().playing, vec![second]);
    }

    #[test]
    fn drag_sounds_are_ambient_and_untracked() {
        let mut c = Controller::new(
            catalog(),
            FakeAudio::default(),
            ChaCha8Rng::seed_from_u64(4),
            GameConfig { drag_sound_odds: 1, ..Default::default() },
            Vec2::new(480.0, 800.0),
        );
        c.on_tap();
        let tap = c.active_playback();
        assert!(c.on_drag_sample().is_some());
        assert_eq!(c.active_playback(), tap);
        assert_eq!(c.audio().played.last().unwrap().1, Playback::AMBIENT);
        assert_eq!(c.audio().playing.len(), 2);
    }

    #[test]
    fn hit_test_follows_scale() {
        let mut c = controller(5);
        c.set_screen_size(Vec2::splat(150.0));
        // screen equals the icon: the icon sits at the origin
        assert_eq!(c.position(), Vec2::ZERO);
        assert!(c.hit_test(Vec2::new(75.0, 75.0)));
        assert!(c.hit_test(Vec2::new(1.0, 149.0)));
        assert!(!c.hit_test(Vec2::new(160.0, 75.0)));
    }

    #[test]
    fn tap_outside_icon_is_ignored() {
        let mut c = controller(6);
        let far = c.position() + Vec2::splat(1000.0);
        c.handle_gesture(Gesture::Tap { at: far });
        assert!(c.audio().played.is_empty());
        assert_eq!(c.bounce_phase(), BouncePhase::Idle);

        let center = c.position() + Vec2::splat(75.0);
        c.handle_gesture(Gesture::Tap { at: center });
        assert_eq!(c.audio().played.len(), 1);
    }

    #[test]
    fn shrinking_screen_clamps_target_and_value() {
        let mut c = controller(7);
        c.on_tap();
        c.set_screen_size(Vec2::new(200.0, 160.0));
        let max = Vec2::new(50.0, 10.0);
        assert!(c.position_target().cmple(max).all());
        assert!(c.position().cmple(max).all());
        settle(&mut c);
        assert!(c.position().cmple(max).all());
    }

    #[test]
    fn shutdown_releases_audio() {
        let mut c = controller(8);
        c.on_tap();
        c.shutdown();
        assert!(c.audio().released);
        assert_eq!(c.active_playback(), None);
    }
}

use tracing::{info, warn};

use crate::config::ScrollConfig;
use crate::constants::MAX_SETTLE_TIME;
use crate::presentation::Presentation;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum PlaybackState {
    Browsing,      // Scrolling is driven by user input
    Autoscrolling, // Scrolling down at a fixed speed
    Holding,       // Reached the bottom, letting the last transition settle
    Finished,      // Autoplay done
}

pub struct Playback {
    state: PlaybackState,
    speed: f32,
    hold_duration: f32,
    hold_timer: f32,
}

impl Playback {
    pub fn interactive() -> Self {
        Self { state: PlaybackState::Browsing, speed: 0.0, hold_duration: 0.0, hold_timer: 0.0 }
    }

    pub fn autoplay(scroll: &ScrollConfig) -> Self {
        Self {
            state: PlaybackState::Autoscrolling,
            speed: scroll.autoplay_speed,
            hold_duration: scroll.hold_duration,
            hold_timer: 0.0,
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.state == PlaybackState::Browsing
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    pub fn advance(&mut self, dt: f32, presentation: &mut Presentation) -> PlaybackState {
        match self.state {
            PlaybackState::Browsing | PlaybackState::Finished => {}
            PlaybackState::Autoscrolling => {
                presentation.scroll_by(self.speed * dt);
                if presentation.at_end() {
                    info!(scroll = presentation.scroll_offset(), "autoplay reached the last step");
                    self.state = PlaybackState::Holding;
                    self.hold_timer = 0.0;
                }
            }
            PlaybackState::Holding => {
                self.hold_timer += dt;
                if self.hold_timer < self.hold_duration {
                    return self.state;
                }
                if presentation.is_settled() {
                    info!("autoplay finished");
                    self.state = PlaybackState::Finished;
                } else if self.hold_timer >= self.hold_duration + MAX_SETTLE_TIME {
                    warn!(held = self.hold_timer, "panel did not settle, finishing autoplay anyway");
                    self.state = PlaybackState::Finished;
                }
            }
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Viewport;
    use crate::registry::{Ordinal, StepRegistry};
    use crate::spring::SpringConfig;

    const DT: f32 = 1.0 / 60.0;

    fn presentation(scroll: &ScrollConfig) -> Presentation {
        Presentation::new(
            StepRegistry::builtin(),
            SpringConfig::default(),
            scroll,
            Viewport::new(1280.0, 720.0),
        )
    }

    #[test]
    fn autoplay_visits_every_step_and_finishes() {
        let scroll = ScrollConfig { autoplay_speed: 1200.0, hold_duration: 0.5, ..ScrollConfig::default() };
        let mut p = presentation(&scroll);
        let mut playback = Playback::autoplay(&scroll);
        let mut entered = Vec::new();

        let mut frames = 0;
        while !playback.is_finished() && frames < 10_000 {
            playback.advance(DT, &mut p);
            if let Some(event) = p.update(DT) {
                entered.push(event.ordinal.0);
            }
            frames += 1;
        }

        assert!(playback.is_finished());
        assert_eq!(entered, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(p.active(), Ordinal(5));
        assert!(p.is_settled());
        assert!(!playback.accepts_input());
    }

    #[test]
    fn holding_waits_for_the_hold_duration() {
        let scroll = ScrollConfig { autoplay_speed: 1e6, hold_duration: 1.0, ..ScrollConfig::default() };
        let mut p = presentation(&scroll);
        let mut playback = Playback::autoplay(&scroll);

        assert_eq!(playback.advance(DT, &mut p), PlaybackState::Holding);
        for _ in 0..30 {
            p.update(DT);
            assert_eq!(playback.advance(DT, &mut p), PlaybackState::Holding);
        }
    }

    #[test]
    fn autoplay_finishes_even_if_the_panel_never_settles() {
        let scroll = ScrollConfig { autoplay_speed: 1e6, hold_duration: 0.5, ..ScrollConfig::default() };
        let undamped = SpringConfig { damping: 0.0, ..SpringConfig::default() };
        let mut p = Presentation::new(StepRegistry::builtin(), undamped, &scroll, Viewport::new(1280.0, 720.0));
        // Send the panel right, then autoplay back to a left-anchored step mid-flight
        p.scroll_to_step(Ordinal(2));
        p.update(DT);
        let mut playback = Playback::autoplay(&scroll);

        let limit = ((scroll.hold_duration + MAX_SETTLE_TIME) / DT) as usize + 10;
        let mut frames = 0;
        while !playback.is_finished() && frames < limit {
            p.update(DT);
            playback.advance(DT, &mut p);
            frames += 1;
        }

        assert!(playback.is_finished());
        assert!(!p.is_settled());
    }

    #[test]
    fn browsing_never_moves_on_its_own() {
        let scroll = ScrollConfig::default();
        let mut p = presentation(&scroll);
        let mut playback = Playback::interactive();
        for _ in 0..120 {
            assert_eq!(playback.advance(DT, &mut p), PlaybackState::Browsing);
        }
        assert_eq!(p.scroll_offset(), 0.0);
        assert!(playback.accepts_input());
    }
}

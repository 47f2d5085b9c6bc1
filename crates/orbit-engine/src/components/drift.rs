//! Vertical drift — the idle bobbing of orbiting cards.
//!
//! Each leg travels between the spawn height and `base_y + deviation`,
//! reversing at every bound. The first leg overshoots (`BackOut`), every
//! later leg eases in and out. Height is a pure function of time since the
//! leg started, so re-sampling a timestamp is free of side effects.

use rand::Rng;
use crate::extensions::easing::{ease, Easing};

/// Shorter legs are treated as no drift at all.
const MIN_LEG_DURATION: f32 = 1e-3;

/// Which way the current leg travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// From the spawn height toward the bound.
    Out,
    /// From the bound back toward the spawn height.
    Back,
}

#[derive(Debug, Clone)]
pub struct DriftComponent {
    base_y: f32,
    /// Signed: the sign is the initial direction.
    deviation: f32,
    /// Seconds per leg.
    duration: f32,
    heading: Heading,
    easing: Easing,
    /// Start time of the current leg; set on the first sample.
    leg_start: Option<f32>,
    paused_at: Option<f32>,
    legs: u32,
}

impl DriftComponent {
    pub fn new(base_y: f32, deviation: f32, duration: f32) -> Self {
        Self {
            base_y,
            deviation,
            duration: duration.max(0.0),
            heading: Heading::Out,
            easing: Easing::BackOut,
            leg_start: None,
            paused_at: None,
            legs: 0,
        }
    }

    /// Random direction (50/50) and a leg duration drawn uniformly from
    /// `[min_duration, max_duration]`.
    pub fn random<R: Rng + ?Sized>(
        base_y: f32,
        deviation: f32,
        min_duration: f32,
        max_duration: f32,
        rng: &mut R,
    ) -> Self {
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let duration = if max_duration > min_duration {
            rng.gen_range(min_duration..=max_duration)
        } else {
            min_duration
        };
        Self::new(base_y, sign * deviation.abs(), duration)
    }

    /// Advance to `now` and return the height, or `None` while paused.
    pub fn sample(&mut self, now: f32) -> Option<f32> {
        if self.paused_at.is_some() {
            return None;
        }
        let mut leg_start = *self.leg_start.get_or_insert(now);

        if self.duration < MIN_LEG_DURATION {
            return Some(self.base_y);
        }

        while now - leg_start >= self.duration {
            leg_start += self.duration;
            self.on_bound();
        }
        self.leg_start = Some(leg_start);

        let elapsed = (now - leg_start).max(0.0);
        Some(self.height_at(elapsed / self.duration))
    }

    /// Freeze progress at `now`. Repeats do not fire while paused.
    pub fn pause(&mut self, now: f32) {
        if self.paused_at.is_none() {
            self.leg_start.get_or_insert(now);
            self.paused_at = Some(now);
        }
    }

    /// Continue from the progress frozen by [`pause`](Self::pause).
    pub fn resume(&mut self, now: f32) {
        if let Some(paused_at) = self.paused_at.take() {
            if let Some(start) = self.leg_start {
                self.leg_start = Some(now - (paused_at - start));
            }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn base_y(&self) -> f32 {
        self.base_y
    }

    pub fn deviation(&self) -> f32 {
        self.deviation
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Number of bounds reached so far.
    pub fn legs(&self) -> u32 {
        self.legs
    }

    fn on_bound(&mut self) {
        // Only reachable from `sample`, which bails out while paused.
        self.heading = match self.heading {
            Heading::Out => Heading::Back,
            Heading::Back => Heading::Out,
        };
        self.easing = Easing::QuadInOut;
        self.legs += 1;
    }

    fn height_at(&self, t: f32) -> f32 {
        let bound = self.base_y + self.deviation;
        match self.heading {
            Heading::Out => ease(self.base_y, bound, t, self.easing),
            Heading::Back => ease(bound, self.base_y, t, self.easing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn starts_at_spawn_height() {
        let mut drift = DriftComponent::new(1.0, 0.5, 2.0);
        assert_eq!(drift.sample(3.0), Some(1.0));
    }

    #[test]
    fn reaches_bound_then_reverses() {
        let mut drift = DriftComponent::new(0.0, 0.5, 2.0);
        drift.sample(0.0);
        let near_end = drift.sample(1.999).unwrap();
        assert!((near_end - 0.5).abs() < 0.01, "end of first leg sits on the bound, got {}", near_end);
        assert_eq!(drift.heading(), Heading::Out);

        let at_bound = drift.sample(2.0).unwrap();
        assert!((at_bound - 0.5).abs() < 1e-5);
        assert_eq!(drift.heading(), Heading::Back);
        assert_eq!(drift.legs(), 1);

        let midway = drift.sample(3.0).unwrap();
        assert!((midway - 0.25).abs() < 1e-5, "second leg eases in-out, got {}", midway);
    }

    #[test]
    fn negative_direction_goes_down() {
        let mut drift = DriftComponent::new(2.0, -0.5, 1.0);
        drift.sample(0.0);
        let y = drift.sample(0.99).unwrap();
        assert!(y < 2.0);
    }

    #[test]
    fn pause_and_resume_is_continuous() {
        let mut drift = DriftComponent::new(0.0, 1.0, 2.0);
        drift.sample(0.0);
        let before = drift.sample(0.7).unwrap();
        drift.pause(0.7);

        assert_eq!(drift.sample(5.0), None);
        assert_eq!(drift.sample(9.0), None);
        assert_eq!(drift.legs(), 0, "no bookkeeping while paused");

        drift.resume(9.0);
        let after = drift.sample(9.0).unwrap();
        assert!((after - before).abs() < 1e-4, "{} vs {}", before, after);
    }

    #[test]
    fn resampling_same_time_is_idempotent() {
        let mut drift = DriftComponent::new(0.0, 1.0, 1.0);
        drift.sample(0.0);
        let a = drift.sample(3.4).unwrap();
        let legs = drift.legs();
        let b = drift.sample(3.4).unwrap();
        assert_eq!(a, b);
        assert_eq!(legs, drift.legs());
    }

    #[test]
    fn random_is_deterministic_per_seed() {
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);
        let da = DriftComponent::random(0.0, 0.4, 2.0, 4.0, &mut a);
        let db = DriftComponent::random(0.0, 0.4, 2.0, 4.0, &mut b);
        assert_eq!(da.deviation(), db.deviation());
        assert_eq!(da.duration(), db.duration());
        assert!(da.duration() >= 2.0 && da.duration() <= 4.0);
        assert_eq!(da.deviation().abs(), 0.4);
    }
}

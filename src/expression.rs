//! Expressions and transient animation state.
//!
//! The engine consumes expressions and an [`AnimationPose`] as immutable
//! inputs. The pose is produced by an [`AnimationDriver`] the embedding
//! layer owns and advances with an explicit `tick(dt)`; the core never
//! starts, advances, or cancels timers.

use crate::rng;

/// The fourteen named expressions the simulation emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    #[default]
    Neutral,
    Happy,
    Amused,
    Excited,
    Smirk,
    Sad,
    Worried,
    Annoyed,
    Angry,
    Scowl,
    Tired,
    Determined,
    Suspicious,
    Surprise,
}

impl Expression {
    pub const ALL: [Expression; 14] = [
        Expression::Neutral,
        Expression::Happy,
        Expression::Amused,
        Expression::Excited,
        Expression::Smirk,
        Expression::Sad,
        Expression::Worried,
        Expression::Annoyed,
        Expression::Angry,
        Expression::Scowl,
        Expression::Tired,
        Expression::Determined,
        Expression::Suspicious,
        Expression::Surprise,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| format!("{e:?}").to_ascii_lowercase() == lower)
    }
}

/// The five broad mouth-curve classes every expression maps onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouthFamily {
    Neutral,
    Smile,
    Frown,
    Flat,
    Pursed,
}

/// Resolved mouth geometry selector. `Surprise` short-circuits the curve
/// path entirely and renders an open mouth with teeth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MouthShape {
    Open,
    Curve {
        family: MouthFamily,
        /// Curvature amplitude relative to the family baseline (1.0).
        amplitude: f64,
        /// Left/right bias in [-1,1]; positive lifts the right corner.
        asymmetry: f64,
    },
}

impl MouthShape {
    pub fn for_expression(expr: Expression) -> Self {
        use Expression::*;
        let (family, amplitude, asymmetry) = match expr {
            Surprise => return MouthShape::Open,
            Neutral => (MouthFamily::Neutral, 0.0, 0.0),
            Happy => (MouthFamily::Smile, 1.0, 0.0),
            Amused => (MouthFamily::Smile, 1.1, 0.0),
            Excited => (MouthFamily::Smile, 1.4, 0.0),
            Smirk => (MouthFamily::Smile, 0.8, 0.5),
            Sad => (MouthFamily::Frown, 1.0, 0.0),
            Worried => (MouthFamily::Frown, 0.8, 0.0),
            Annoyed => (MouthFamily::Frown, 1.1, 0.3),
            Angry => (MouthFamily::Frown, 1.3, 0.0),
            Scowl => (MouthFamily::Frown, 1.5, 0.0),
            Tired => (MouthFamily::Flat, 0.3, 0.0),
            Suspicious => (MouthFamily::Flat, 0.2, 0.4),
            Determined => (MouthFamily::Pursed, 1.0, 0.0),
        };
        MouthShape::Curve {
            family,
            amplitude,
            asymmetry,
        }
    }
}

/// Eyebrow vertical offsets per expression, in canvas rows. Negative
/// raises the brow. The pair is (left, right).
pub fn brow_offsets(expr: Expression) -> (f64, f64) {
    use Expression::*;
    match expr {
        Neutral => (0.0, 0.0),
        Happy => (-0.3, -0.3),
        Amused => (-0.4, -0.4),
        Excited => (-0.8, -0.8),
        Smirk => (-0.6, 0.0),
        Sad => (-0.2, -0.2),
        Worried => (-0.5, -0.5),
        Annoyed => (0.6, 0.2),
        Angry => (0.8, 0.8),
        Scowl => (1.0, 1.0),
        Tired => (0.3, 0.3),
        Determined => (0.5, 0.5),
        Suspicious => (0.6, -0.4),
        Surprise => (-1.2, -1.2),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeDirection {
    #[default]
    Center,
    Left,
    Right,
    Up,
    Down,
}

impl GazeDirection {
    /// Iris/pupil offset in canvas units, kept within eye-white bounds by
    /// the eye renderer.
    pub fn offset(self) -> (f64, f64) {
        match self {
            GazeDirection::Center => (0.0, 0.0),
            GazeDirection::Left => (-0.8, 0.0),
            GazeDirection::Right => (0.8, 0.0),
            GazeDirection::Up => (0.0, -0.5),
            GazeDirection::Down => (0.0, 0.5),
        }
    }
}

/// Immutable per-frame animation snapshot handed to the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationPose {
    /// Blink progress in [0,1]; 1.0 fully occludes the eye.
    pub blink: f64,
    pub gaze: GazeDirection,
    /// Transient idle expression; overrides nothing when `None`.
    pub idle_expression: Option<Expression>,
}

// Reactive-expression thresholds. Tuned values carried over from the
// simulation; treated as configuration, not re-derived.
pub const HEALTH_DELTA_HEALED: f64 = 10.0;
pub const HEALTH_DELTA_HURT: f64 = 10.0;
pub const NIGHTLY_TIRED_CHANCE: f64 = 0.30;

/// Maps a recent health delta and a nightly fatigue roll to a transient
/// expression, if any. Deterministic in `(seed, offset)`.
pub fn reactive_expression(health_delta: f64, seed: u64, offset: u64) -> Option<Expression> {
    if health_delta >= HEALTH_DELTA_HEALED {
        return Some(Expression::Happy);
    }
    if health_delta <= -HEALTH_DELTA_HURT {
        return Some(Expression::Sad);
    }
    if rng::chance(seed, offset, NIGHTLY_TIRED_CHANCE) {
        return Some(Expression::Tired);
    }
    None
}

const BLINK_DURATION_SECS: f64 = 0.25;
const BLINK_GAP_MIN_SECS: f64 = 2.0;
const BLINK_GAP_SPAN_SECS: f64 = 4.0;
const GAZE_HOLD_MIN_SECS: f64 = 1.5;
const GAZE_HOLD_SPAN_SECS: f64 = 2.5;
const IDLE_PERIOD_MIN_SECS: f64 = 6.0;
const IDLE_PERIOD_SPAN_SECS: f64 = 6.0;
const IDLE_HOLD_SECS: f64 = 2.0;
const IDLE_EXPRESSION_CHANCE: f64 = 0.2;

/// Wall-clock animation state, owned by the embedding layer.
///
/// Advancing with a fixed `dt` sequence reproduces the same pose sequence
/// for the same seed, so replays stay deterministic.
#[derive(Clone, Debug)]
pub struct AnimationDriver {
    seed: u64,
    draws: u64,
    until_blink: f64,
    blink_elapsed: Option<f64>,
    gaze: GazeDirection,
    gaze_hold: f64,
    idle: Option<(Expression, f64)>,
    until_idle: f64,
}

impl AnimationDriver {
    pub fn new(seed: u64) -> Self {
        let mut driver = Self {
            seed,
            draws: 0,
            until_blink: 0.0,
            blink_elapsed: None,
            gaze: GazeDirection::Center,
            gaze_hold: 0.0,
            idle: None,
            until_idle: 0.0,
        };
        driver.until_blink = BLINK_GAP_MIN_SECS + driver.draw() * BLINK_GAP_SPAN_SECS;
        driver.gaze_hold = GAZE_HOLD_MIN_SECS + driver.draw() * GAZE_HOLD_SPAN_SECS;
        driver.until_idle = IDLE_PERIOD_MIN_SECS + driver.draw() * IDLE_PERIOD_SPAN_SECS;
        driver
    }

    fn draw(&mut self) -> f64 {
        let v = rng::draw(self.seed, self.draws);
        self.draws += 1;
        v
    }

    /// Advances by `dt` seconds and returns the pose for the new instant.
    pub fn tick(&mut self, dt: f64) -> AnimationPose {
        let dt = dt.max(0.0);
        self.tick_blink(dt);
        self.tick_gaze(dt);
        self.tick_idle(dt);

        AnimationPose {
            blink: self.blink_progress(),
            gaze: self.gaze,
            idle_expression: self.idle.map(|(e, _)| e),
        }
    }

    fn tick_blink(&mut self, dt: f64) {
        match self.blink_elapsed {
            Some(elapsed) => {
                let elapsed = elapsed + dt;
                if elapsed >= BLINK_DURATION_SECS {
                    self.blink_elapsed = None;
                    self.until_blink = BLINK_GAP_MIN_SECS + self.draw() * BLINK_GAP_SPAN_SECS;
                } else {
                    self.blink_elapsed = Some(elapsed);
                }
            }
            None => {
                self.until_blink -= dt;
                if self.until_blink <= 0.0 {
                    self.blink_elapsed = Some(0.0);
                }
            }
        }
    }

    fn blink_progress(&self) -> f64 {
        match self.blink_elapsed {
            // Triangular: closes over the first half, opens over the second.
            Some(elapsed) => {
                let t = (elapsed / BLINK_DURATION_SECS).clamp(0.0, 1.0);
                if t < 0.5 { t * 2.0 } else { (1.0 - t) * 2.0 }
            }
            None => 0.0,
        }
    }

    fn tick_gaze(&mut self, dt: f64) {
        self.gaze_hold -= dt;
        if self.gaze_hold > 0.0 {
            return;
        }
        // Center-weighted redirection.
        let roll = self.draw();
        self.gaze = if roll < 0.5 {
            GazeDirection::Center
        } else if roll < 0.65 {
            GazeDirection::Left
        } else if roll < 0.8 {
            GazeDirection::Right
        } else if roll < 0.9 {
            GazeDirection::Up
        } else {
            GazeDirection::Down
        };
        self.gaze_hold = GAZE_HOLD_MIN_SECS + self.draw() * GAZE_HOLD_SPAN_SECS;
    }

    fn tick_idle(&mut self, dt: f64) {
        if let Some((expr, remaining)) = self.idle {
            let remaining = remaining - dt;
            self.idle = (remaining > 0.0).then_some((expr, remaining));
            return;
        }
        self.until_idle -= dt;
        if self.until_idle > 0.0 {
            return;
        }
        if self.draw() < IDLE_EXPRESSION_CHANCE {
            let pick = self.draw();
            let expr = if pick < 0.4 {
                Expression::Amused
            } else if pick < 0.7 {
                Expression::Tired
            } else {
                Expression::Worried
            };
            self.idle = Some((expr, IDLE_HOLD_SECS));
        }
        self.until_idle = IDLE_PERIOD_MIN_SECS + self.draw() * IDLE_PERIOD_SPAN_SECS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surprise_never_takes_the_curve_path() {
        assert_eq!(MouthShape::for_expression(Expression::Surprise), MouthShape::Open);
    }

    #[test]
    fn scowl_exceeds_neutral_frown_baseline() {
        let MouthShape::Curve {
            family, amplitude, ..
        } = MouthShape::for_expression(Expression::Scowl)
        else {
            panic!("scowl must be a curve");
        };
        assert_eq!(family, MouthFamily::Frown);
        let MouthShape::Curve {
            amplitude: baseline,
            ..
        } = MouthShape::for_expression(Expression::Sad)
        else {
            panic!("sad must be a curve");
        };
        assert!(amplitude >= baseline);
    }

    #[test]
    fn every_expression_maps_to_a_family() {
        for expr in Expression::ALL {
            // Must not panic; surprise is the only open-mouth path.
            let shape = MouthShape::for_expression(expr);
            if expr != Expression::Surprise {
                assert!(matches!(shape, MouthShape::Curve { .. }));
            }
        }
    }

    #[test]
    fn parse_roundtrips_debug_names() {
        assert_eq!(Expression::parse("scowl"), Some(Expression::Scowl));
        assert_eq!(Expression::parse(" SURPRISE "), Some(Expression::Surprise));
        assert_eq!(Expression::parse("grimace"), None);
    }

    #[test]
    fn reactive_thresholds() {
        assert_eq!(reactive_expression(HEALTH_DELTA_HEALED, 1, 0), Some(Expression::Happy));
        assert_eq!(reactive_expression(-HEALTH_DELTA_HURT, 1, 0), Some(Expression::Sad));
        // Below both thresholds the outcome is the seeded tired roll.
        let out = reactive_expression(0.0, 1, 0);
        assert!(out.is_none() || out == Some(Expression::Tired));
    }

    #[test]
    fn driver_is_deterministic_per_seed() {
        let mut a = AnimationDriver::new(9);
        let mut b = AnimationDriver::new(9);
        for _ in 0..600 {
            assert_eq!(a.tick(1.0 / 30.0), b.tick(1.0 / 30.0));
        }
    }

    #[test]
    fn driver_blinks_eventually() {
        let mut d = AnimationDriver::new(3);
        let mut saw_blink = false;
        for _ in 0..1200 {
            if d.tick(1.0 / 30.0).blink > 0.0 {
                saw_blink = true;
                break;
            }
        }
        assert!(saw_blink);
    }

    #[test]
    fn blink_progress_peaks_inside_window() {
        let mut d = AnimationDriver::new(5);
        let mut max = 0.0f64;
        for _ in 0..2400 {
            max = max.max(d.tick(1.0 / 60.0).blink);
        }
        assert!(max > 0.5, "blink never approached closure: {max}");
        assert!(max <= 1.0);
    }
}

//! Geometry derivation.
//!
//! The head silhouette is a per-row half-width function driven by
//! face-shape curve parameters; the body silhouette scales per-gender base
//! widths by strength/build/age multipliers. Everything downstream anchors
//! to fractions of head size, so a geometry change moves every dependent
//! layer together and no seams open up between them.

use crate::{
    foundation::math::{Point, eased, lerp},
    model::{Build, Cheekbones, FaceShape, Gender, HairLength, Jawline},
    resolve::{AgeGroup, ResolvedAttributes},
    rng,
};

pub const HEAD_BASE_WIDTH: f64 = 22.0;
pub const HEAD_HEIGHT: f64 = 26.0;
pub const HEAD_TOP_Y: f64 = 5.0;
pub const HEAD_CENTER_X: f64 = 32.0;
pub const HEAD_ROWS: u32 = 26;

/// Clamp band for the per-row half-width as a fraction of the nominal
/// half-width. Correctness invariant, not a tuning knob: it guarantees no
/// renderer can paint outside the canvas from a malformed curve.
pub const HALF_WIDTH_MIN: f64 = 0.50;
pub const HALF_WIDTH_MAX: f64 = 1.12;

const ASYMMETRY_SPAN: f64 = 0.04;

/// Default full-figure height the body profile is tuned against; an
/// explicit appearance height rescales vertically relative to this.
const REFERENCE_HEIGHT: f64 = 64.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceCurve {
    pub crown_roundness: f64,
    /// Row fraction where the cheek band starts.
    pub cheek_top: f64,
    /// Row fraction where the cheek band ends and the chin taper begins.
    pub cheek_bot: f64,
    pub chin_taper: f64,
    pub jaw_softness: f64,
    pub top_w: f64,
    pub cheek_w: f64,
    pub chin_w: f64,
}

fn base_curve(shape: FaceShape) -> FaceCurve {
    match shape {
        FaceShape::Oval => FaceCurve {
            crown_roundness: 0.80,
            cheek_top: 0.30,
            cheek_bot: 0.62,
            chin_taper: 1.00,
            jaw_softness: 0.30,
            top_w: 0.82,
            cheek_w: 1.00,
            chin_w: 0.62,
        },
        FaceShape::Round => FaceCurve {
            crown_roundness: 0.95,
            cheek_top: 0.32,
            cheek_bot: 0.68,
            chin_taper: 0.60,
            jaw_softness: 0.50,
            top_w: 0.90,
            cheek_w: 1.04,
            chin_w: 0.78,
        },
        FaceShape::Square => FaceCurve {
            crown_roundness: 0.60,
            cheek_top: 0.28,
            cheek_bot: 0.70,
            chin_taper: 0.35,
            jaw_softness: 0.10,
            top_w: 0.92,
            cheek_w: 1.00,
            chin_w: 0.88,
        },
        FaceShape::Heart => FaceCurve {
            crown_roundness: 0.85,
            cheek_top: 0.26,
            cheek_bot: 0.55,
            chin_taper: 1.30,
            jaw_softness: 0.40,
            top_w: 0.95,
            cheek_w: 1.02,
            chin_w: 0.52,
        },
        FaceShape::Oblong => FaceCurve {
            crown_roundness: 0.70,
            cheek_top: 0.30,
            cheek_bot: 0.66,
            chin_taper: 0.80,
            jaw_softness: 0.30,
            top_w: 0.80,
            cheek_w: 0.92,
            chin_w: 0.66,
        },
        FaceShape::Diamond => FaceCurve {
            crown_roundness: 0.65,
            cheek_top: 0.38,
            cheek_bot: 0.58,
            chin_taper: 1.10,
            jaw_softness: 0.35,
            top_w: 0.72,
            cheek_w: 1.06,
            chin_w: 0.58,
        },
    }
}

fn perturbed_curve(attrs: &ResolvedAttributes) -> FaceCurve {
    let mut c = base_curve(attrs.face_shape);

    match attrs.cheekbones {
        Cheekbones::High => c.cheek_w += 0.04,
        Cheekbones::Low => c.cheek_w -= 0.03,
        Cheekbones::Average => {}
    }
    match attrs.jawline {
        Jawline::Strong => {
            c.chin_w += 0.06;
            c.jaw_softness = (c.jaw_softness - 0.15).max(0.0);
        }
        Jawline::Soft => {
            c.chin_w -= 0.04;
            c.jaw_softness += 0.15;
        }
        Jawline::Defined => {}
    }
    // Long hair visually widens the crown band.
    if attrs.hair.length >= HairLength::Long {
        c.top_w += 0.02;
    }

    // Independent bone-structure difference: narrower chin and cheeks,
    // softened taper.
    if attrs.gender == Gender::Female {
        c.chin_w *= 0.92;
        c.cheek_w *= 0.97;
        c.chin_taper *= 1.10;
        c.jaw_softness += 0.10;
    }

    c
}

fn build_head_factor(build: Build) -> f64 {
    match build {
        Build::Gaunt => 0.96,
        Build::Slim | Build::Lean => 0.98,
        Build::Average | Build::Athletic => 1.00,
        Build::Muscular => 1.02,
        Build::Stocky => 1.03,
        Build::Heavy => 1.05,
    }
}

fn build_shoulder_factor(build: Build) -> f64 {
    match build {
        Build::Gaunt => 0.82,
        Build::Slim => 0.88,
        Build::Lean => 0.94,
        Build::Average => 1.00,
        Build::Athletic => 1.08,
        Build::Muscular => 1.16,
        Build::Stocky => 1.12,
        Build::Heavy => 1.22,
    }
}

fn build_waist_factor(build: Build) -> f64 {
    match build {
        Build::Gaunt => 0.78,
        Build::Slim => 0.85,
        Build::Lean => 0.90,
        Build::Average => 1.00,
        Build::Athletic => 0.95,
        Build::Muscular => 1.00,
        Build::Stocky => 1.18,
        Build::Heavy => 1.30,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadSpec {
    pub shape: FaceShape,
    pub center_x: f64,
    pub top_y: f64,
    pub width: f64,
    pub height: f64,
    pub rows: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySpec {
    pub shoulder: f64,
    pub chest: f64,
    pub waist: f64,
    pub hip: f64,
    pub arm_width: f64,
    pub body_height: f64,
    pub leg_length: f64,
    pub height_scale: f64,
}

/// Feature anchor points, all derived from head size so dependent layers
/// track geometry changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchors {
    pub eye_left: Point,
    pub eye_right: Point,
    pub brow_y: f64,
    pub nose: Point,
    pub mouth: Point,
    pub ear_left: Point,
    pub ear_right: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometrySpec {
    pub head: HeadSpec,
    pub body: BodySpec,
    pub anchors: Anchors,
    curve: FaceCurve,
}

impl GeometrySpec {
    pub fn derive(attrs: &ResolvedAttributes) -> Self {
        let curve = perturbed_curve(attrs);
        let width = HEAD_BASE_WIDTH * build_head_factor(attrs.build);
        let head = HeadSpec {
            shape: attrs.face_shape,
            center_x: HEAD_CENTER_X,
            top_y: HEAD_TOP_Y,
            width,
            height: HEAD_HEIGHT,
            rows: HEAD_ROWS,
        };

        let height_scale = attrs
            .height
            .map(|h| (h / REFERENCE_HEIGHT).clamp(0.6, 1.4))
            .unwrap_or(1.0);

        let gender_base = match attrs.gender {
            Gender::Male => 26.0,
            Gender::Female => 22.0,
        };
        let strength_mult = strength_multiplier(attrs.stats.strength);
        let age_damp = match attrs.age_group {
            AgeGroup::Young => 0.97,
            AgeGroup::Adult => 1.0,
            AgeGroup::Old => 0.95,
        };

        let shoulder = gender_base * strength_mult * build_shoulder_factor(attrs.build) * age_damp;
        let chest = shoulder
            * match attrs.gender {
                Gender::Male => 0.94,
                Gender::Female => 0.90,
            };
        let waist_base = shoulder * 0.82 * build_waist_factor(attrs.build) / build_shoulder_factor(attrs.build);
        let waist = waist_base
            * match attrs.gender {
                Gender::Male => 1.0,
                Gender::Female => 0.88,
            };
        let hip = waist
            * match attrs.gender {
                Gender::Male => 1.02,
                Gender::Female => 1.08,
            };
        let arm_width = (2.6 + 0.6 * (strength_mult - 1.0) * 10.0).clamp(2.0, 4.2);

        let body = BodySpec {
            shoulder,
            chest,
            waist,
            hip,
            arm_width,
            body_height: 35.0 * height_scale,
            leg_length: 12.0 * height_scale,
            height_scale,
        };

        let anchors = Anchors {
            eye_left: Point::new(
                head.center_x - head.width * 0.22,
                head.top_y + head.height * 0.42,
            ),
            eye_right: Point::new(
                head.center_x + head.width * 0.22,
                head.top_y + head.height * 0.42,
            ),
            brow_y: head.top_y + head.height * 0.34,
            nose: Point::new(head.center_x, head.top_y + head.height * 0.60),
            mouth: Point::new(head.center_x, head.top_y + head.height * 0.74),
            ear_left: Point::new(
                head.center_x - head.width * 0.5,
                head.top_y + head.height * 0.46,
            ),
            ear_right: Point::new(
                head.center_x + head.width * 0.5,
                head.top_y + head.height * 0.46,
            ),
        };

        Self {
            head,
            body,
            anchors,
            curve,
        }
    }

    pub fn row_t(&self, row: u32) -> f64 {
        if self.head.rows <= 1 {
            return 0.0;
        }
        f64::from(row.min(self.head.rows - 1)) / f64::from(self.head.rows - 1)
    }

    pub fn head_row_y(&self, row: u32) -> f64 {
        self.head.top_y + f64::from(row)
    }

    /// Per-row half-width as a fraction of the nominal half-width,
    /// interpolating the three height bands with eased blending. Clamped
    /// to the documented band.
    pub fn half_width_frac(&self, t: f64) -> f64 {
        let c = &self.curve;
        let t = t.clamp(0.0, 1.0);

        let mut w = if t < c.cheek_top {
            let u = t / c.cheek_top;
            lerp(c.top_w, c.cheek_w, eased(u, c.crown_roundness))
        } else if t < c.cheek_bot {
            let v = (t - c.cheek_top) / (c.cheek_bot - c.cheek_top);
            // slight bulge at the cheekbone midpoint
            let bump = 1.0 - (2.0 * v - 1.0) * (2.0 * v - 1.0);
            c.cheek_w + 0.02 * bump
        } else {
            let v = (t - c.cheek_bot) / (1.0 - c.cheek_bot);
            lerp(c.cheek_w, c.chin_w, eased(v, c.chin_taper))
        };

        if t > 0.85 {
            w -= c.jaw_softness * ((t - 0.85) / 0.15) * 0.06;
        }

        w.clamp(HALF_WIDTH_MIN, HALF_WIDTH_MAX)
    }

    /// Stable left/right asymmetry bias for a row, hashed from head
    /// position and size so it is independent of the portrait seed.
    pub fn asymmetry_bias(&self, row: u32) -> f64 {
        let qx = (self.head.center_x * 8.0 + self.head.width * 4.0) as i64;
        let qy = (self.head.top_y * 8.0) as i64 + i64::from(row);
        (rng::hash2(qx, qy) - 0.5) * ASYMMETRY_SPAN
    }

    /// Left and right head edge x for a row, asymmetry applied.
    pub fn head_edges(&self, row: u32) -> (f64, f64) {
        let half = self.half_width_frac(self.row_t(row)) * self.head.width * 0.5;
        let bias = self.asymmetry_bias(row);
        let left = self.head.center_x - half * (1.0 + bias);
        let right = self.head.center_x + half * (1.0 - bias);
        (left, right)
    }
}

fn strength_multiplier(strength: f64) -> f64 {
    (1.0 + 0.035 * (strength - 5.0)).clamp(0.84, 1.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AppearanceDescriptor, CharacterSnapshot, CulturalZone, Gender, RenderOptions, Stats,
        WealthLevel,
    };
    use crate::resolve::resolve;

    fn attrs_with(f: impl FnOnce(&mut CharacterSnapshot)) -> ResolvedAttributes {
        let mut snap = CharacterSnapshot {
            age: 30,
            gender: Gender::Male,
            health: 100.0,
            max_health: 100.0,
            fatigue: 0.0,
            max_fatigue: 100.0,
            disease_state: None,
            stats: Stats::default(),
            equipped_items: None,
            appearance: AppearanceDescriptor::default(),
            wealth_level: WealthLevel::Modest,
            era: "MEDIEVAL".to_string(),
            cultural_zone: CulturalZone::European,
            portrait_seed: Some(12345),
        };
        f(&mut snap);
        resolve(&snap, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn male_average_head_width_matches_base_formula() {
        let geo = GeometrySpec::derive(&attrs_with(|_| {}));
        assert_eq!(geo.head.width, HEAD_BASE_WIDTH);
        assert_eq!(geo.head.height, HEAD_HEIGHT);
    }

    #[test]
    fn half_width_stays_in_clamp_band() {
        for shape in [
            FaceShape::Oval,
            FaceShape::Round,
            FaceShape::Square,
            FaceShape::Heart,
            FaceShape::Oblong,
            FaceShape::Diamond,
        ] {
            let geo = GeometrySpec::derive(&attrs_with(|s| {
                s.appearance.face_shape = Some(shape);
            }));
            for row in 0..HEAD_ROWS {
                let w = geo.half_width_frac(geo.row_t(row));
                assert!((HALF_WIDTH_MIN..=HALF_WIDTH_MAX).contains(&w), "{shape:?} row {row}: {w}");
            }
        }
    }

    #[test]
    fn shoulder_width_is_monotone_in_strength() {
        let mut prev = 0.0;
        for s in 0..=20 {
            let strength = f64::from(s) * 0.5;
            let geo = GeometrySpec::derive(&attrs_with(|snap| {
                snap.stats.strength = strength;
            }));
            assert!(
                geo.body.shoulder >= prev,
                "shoulder shrank at strength {strength}"
            );
            prev = geo.body.shoulder;
        }
    }

    #[test]
    fn heart_tapers_harder_than_square() {
        let heart = GeometrySpec::derive(&attrs_with(|s| {
            s.appearance.face_shape = Some(FaceShape::Heart);
        }));
        let square = GeometrySpec::derive(&attrs_with(|s| {
            s.appearance.face_shape = Some(FaceShape::Square);
        }));
        assert!(heart.half_width_frac(1.0) < square.half_width_frac(1.0));
    }

    #[test]
    fn female_chin_narrows() {
        let male = GeometrySpec::derive(&attrs_with(|_| {}));
        let female = GeometrySpec::derive(&attrs_with(|s| {
            s.gender = Gender::Female;
        }));
        assert!(female.half_width_frac(0.98) < male.half_width_frac(0.98));
    }

    #[test]
    fn asymmetry_is_seed_independent_and_small() {
        let a = GeometrySpec::derive(&attrs_with(|s| s.portrait_seed = Some(1)));
        let b = GeometrySpec::derive(&attrs_with(|s| s.portrait_seed = Some(999)));
        for row in 0..HEAD_ROWS {
            assert_eq!(a.asymmetry_bias(row), b.asymmetry_bias(row));
            assert!(a.asymmetry_bias(row).abs() <= ASYMMETRY_SPAN / 2.0);
        }
    }

    #[test]
    fn edges_straddle_the_center() {
        let geo = GeometrySpec::derive(&attrs_with(|_| {}));
        for row in 0..HEAD_ROWS {
            let (l, r) = geo.head_edges(row);
            assert!(l < geo.head.center_x && geo.head.center_x < r);
        }
    }

    #[test]
    fn explicit_height_rescales_vertical_profile() {
        let short = GeometrySpec::derive(&attrs_with(|s| {
            s.appearance.height = Some(48.0);
        }));
        let tall = GeometrySpec::derive(&attrs_with(|s| {
            s.appearance.height = Some(64.0);
        }));
        assert!(short.body.body_height < tall.body.body_height);
        assert_eq!(
            short.body.leg_length / tall.body.leg_length,
            short.body.body_height / tall.body.body_height
        );
    }

    #[test]
    fn anchors_scale_with_head() {
        let geo = GeometrySpec::derive(&attrs_with(|_| {}));
        assert!(geo.anchors.eye_left.x < geo.anchors.eye_right.x);
        assert!(geo.anchors.brow_y < geo.anchors.eye_left.y);
        assert!(geo.anchors.eye_left.y < geo.anchors.nose.y);
        assert!(geo.anchors.nose.y < geo.anchors.mouth.y);
        assert!((geo.anchors.ear_left.x - (geo.head.center_x - geo.head.width * 0.5)).abs() < 1e-9);
    }
}

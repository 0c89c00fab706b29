//! Additive overlays: disease symptoms, markings, eyewear.
//!
//! All of these paint after the base face so they never alter geometry;
//! they only add cells on top of it.

use crate::{
    color::{self, Rgb},
    frame::CommandBuf,
    model::{DiseaseKind, GlassesStyle, SeverityTier},
    resolve::{AdornmentLocation, MarkingKind, MarkingPattern},
    rng::{self, offsets},
};

use super::RenderCtx;

fn tier_factor(severity: SeverityTier) -> u64 {
    match severity {
        SeverityTier::Mild => 1,
        SeverityTier::Moderate => 2,
        SeverityTier::Severe => 3,
    }
}

pub(crate) fn symptoms(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let Some(kind) = color::dominant_disease(&ctx.attrs.diseases) else {
        return;
    };
    let tier = tier_factor(ctx.attrs.severity);
    let geo = ctx.geo;
    let seed = ctx.attrs.seed;

    match kind {
        DiseaseKind::Smallpox => {
            // raised pocks scattered across the whole face
            let pock = ctx.skin.deep_shadow.shifted(20, -6, -6);
            for i in 0..(6 * tier) {
                let (x, y) = face_scatter(ctx, offsets::SYMPTOM_BASE + i * 2);
                buf.cell_a(x, y, pock, 0.8);
            }
        }
        DiseaseKind::Plague => {
            // lymph swelling at the neck and below the ears
            let swell = ctx.skin.shadow.shifted(-6, -10, 6);
            for side in [-1.0, 1.0] {
                let x = geo.head.center_x + side * geo.head.width * 0.38;
                let y = geo.head.top_y + geo.head.height - 1.0;
                buf.rect(x - 1.0, y, 2.0, 2.0, swell, Some(0.85));
                if tier > 1 {
                    buf.cell_a(x - side, y + 2.0, swell, 0.6);
                }
            }
        }
        DiseaseKind::Tuberculosis => {
            // sunken shadow under each eye
            let hollow = ctx.skin.complementary_shadow;
            for anchor in [geo.anchors.eye_left, geo.anchors.eye_right] {
                buf.rect(anchor.x - 1.5, anchor.y + 1.0, 3.0, 1.0, hollow, Some(0.6));
                if tier > 2 {
                    buf.rect(anchor.x - 1.0, anchor.y + 2.0, 2.0, 1.0, hollow, Some(0.4));
                }
            }
        }
        DiseaseKind::Cholera => {
            let patch = ctx.skin.base.shifted(-18, -8, 16);
            for i in 0..(3 * tier) {
                let (x, y) = face_scatter(ctx, offsets::SYMPTOM_BASE + 100 + i * 2);
                buf.rect(x, y, 2.0, 1.0, patch, Some(0.55));
            }
        }
        DiseaseKind::Leprosy => {
            let ashen = ctx.skin.base.mixed(Rgb::new(0xb8, 0xb4, 0xac), 0.6);
            for i in 0..(2 * tier) {
                let (x, y) = face_scatter(ctx, offsets::SYMPTOM_BASE + 200 + i * 2);
                buf.rect(x, y, 2.0, 2.0, ashen, Some(0.7));
            }
        }
        DiseaseKind::Fever => {
            let rash = ctx.skin.subsurface.shifted(24, -10, -8);
            for i in 0..(4 * tier) {
                let (x, y) = face_scatter(ctx, offsets::SYMPTOM_BASE + 300 + i * 2);
                buf.cell_a(x, y, rash, 0.5);
            }
        }
    }
}

/// Seeded scatter point kept inside the face silhouette.
fn face_scatter(ctx: &RenderCtx, offset: u64) -> (f64, f64) {
    let geo = ctx.geo;
    let rx = rng::draw(ctx.attrs.seed, offset);
    let ry = rng::draw(ctx.attrs.seed, offset + 1);
    let row = 6 + (ry * f64::from(geo.head.rows - 10)) as u32;
    let (left, right) = geo.head_edges(row);
    let x = left + 1.0 + rx * (right - left - 2.0);
    (x.floor(), geo.head_row_y(row))
}

pub(crate) fn markings(ctx: &RenderCtx, buf: &mut CommandBuf) {
    for marking in &ctx.attrs.markings {
        let (x, y) = location_point(ctx, marking.location);
        let color = match marking.kind {
            MarkingKind::Scar => ctx.skin.deep_shadow.shifted(18, 0, 0),
            MarkingKind::Tattoo => Rgb::new(0x3a, 0x4f, 0x66),
            MarkingKind::Birthmark => ctx.skin.shadow.shifted(14, -4, -2),
            MarkingKind::Mole => ctx.skin.deep_shadow,
        };
        match marking.pattern {
            MarkingPattern::Line => {
                for d in 0..3 {
                    buf.cell(x + f64::from(d) * 0.5, y + f64::from(d), color);
                }
            }
            MarkingPattern::Cross => {
                buf.cell(x, y, color);
                buf.cell(x - 1.0, y, color);
                buf.cell(x + 1.0, y, color);
                buf.cell(x, y - 1.0, color);
                buf.cell(x, y + 1.0, color);
            }
            MarkingPattern::Dots => {
                buf.cell(x, y, color);
                buf.cell(x + 1.5, y + 1.0, color);
                buf.cell(x - 1.0, y + 1.5, color);
            }
            MarkingPattern::Patch => {
                buf.rect(x, y, 2.0, 2.0, color, Some(0.7));
            }
        }
    }
}

fn location_point(ctx: &RenderCtx, location: AdornmentLocation) -> (f64, f64) {
    let geo = ctx.geo;
    let cx = geo.head.center_x;
    match location {
        AdornmentLocation::Forehead => (cx - 1.0, geo.anchors.brow_y - 3.0),
        AdornmentLocation::LeftCheek => (cx - geo.head.width * 0.27, geo.anchors.nose.y),
        AdornmentLocation::RightCheek => (cx + geo.head.width * 0.27, geo.anchors.nose.y),
        AdornmentLocation::Chin => (cx, geo.anchors.mouth.y + 2.5),
        AdornmentLocation::Neck => (cx - 1.0, geo.head.top_y + geo.head.height + 2.0),
    }
}

const FRAME_COLOR: Rgb = Rgb::new(0x2a, 0x26, 0x20);

pub(crate) fn eyewear(ctx: &RenderCtx, buf: &mut CommandBuf) {
    if !ctx.attrs.has_glasses {
        return;
    }
    let geo = ctx.geo;
    let l = geo.anchors.eye_left;
    let r = geo.anchors.eye_right;
    let y = l.y.floor();

    match ctx.attrs.glasses_style {
        GlassesStyle::Round => {
            for anchor in [l, r] {
                ring(buf, anchor.x, y, 2.0);
            }
            bridge(buf, l.x, r.x, y);
            temples(ctx, buf, y);
        }
        GlassesStyle::Square => {
            for anchor in [l, r] {
                buf.rect(anchor.x - 2.0, y - 1.0, 4.0, 0.5, FRAME_COLOR, None);
                buf.rect(anchor.x - 2.0, y + 1.5, 4.0, 0.5, FRAME_COLOR, None);
                buf.rect(anchor.x - 2.0, y - 1.0, 0.5, 3.0, FRAME_COLOR, None);
                buf.rect(anchor.x + 1.5, y - 1.0, 0.5, 3.0, FRAME_COLOR, None);
            }
            bridge(buf, l.x, r.x, y);
            temples(ctx, buf, y);
        }
        GlassesStyle::Monocle => {
            ring(buf, r.x, y, 2.2);
            // hanging cord
            for d in 1..4 {
                buf.cell_a(r.x + 2.0, y + f64::from(d) * 1.5, FRAME_COLOR, 0.8);
            }
        }
        GlassesStyle::Spectacles => {
            for anchor in [l, r] {
                buf.rect(anchor.x - 1.5, y + 1.2, 3.0, 0.4, FRAME_COLOR, None);
            }
            bridge(buf, l.x, r.x, y);
            temples(ctx, buf, y);
        }
    }
}

fn ring(buf: &mut CommandBuf, cx: f64, y: f64, radius: f64) {
    buf.rect(cx - radius, y - 1.0, radius * 2.0, 0.5, FRAME_COLOR, None);
    buf.rect(cx - radius, y + 1.5, radius * 2.0, 0.5, FRAME_COLOR, None);
    buf.rect(cx - radius, y - 1.0, 0.5, 3.0, FRAME_COLOR, None);
    buf.rect(cx + radius - 0.5, y - 1.0, 0.5, 3.0, FRAME_COLOR, None);
}

fn bridge(buf: &mut CommandBuf, lx: f64, rx: f64, y: f64) {
    buf.rect(lx + 2.0, y, rx - lx - 4.0, 0.5, FRAME_COLOR, None);
}

fn temples(ctx: &RenderCtx, buf: &mut CommandBuf, y: f64) {
    let geo = ctx.geo;
    let l = geo.anchors.eye_left;
    let r = geo.anchors.eye_right;
    buf.rect(geo.anchors.ear_left.x, y, l.x - 2.0 - geo.anchors.ear_left.x, 0.5, FRAME_COLOR, None);
    buf.rect(r.x + 2.0, y, geo.anchors.ear_right.x - r.x - 2.0, 0.5, FRAME_COLOR, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdornmentEntry, DiseaseState};
    use crate::render::tests::{render_layer, test_attrs};

    fn sick(kind: DiseaseKind, severity: SeverityTier) -> crate::resolve::ResolvedAttributes {
        test_attrs(|s| {
            s.disease_state = Some(DiseaseState {
                diseases: vec![kind],
                severity,
            });
        })
    }

    #[test]
    fn healthy_face_has_no_symptoms() {
        let attrs = test_attrs(|_| {});
        assert!(render_layer(&attrs, symptoms).is_empty());
    }

    #[test]
    fn severity_scales_pock_count() {
        let mild = render_layer(&sick(DiseaseKind::Smallpox, SeverityTier::Mild), symptoms);
        let severe = render_layer(&sick(DiseaseKind::Smallpox, SeverityTier::Severe), symptoms);
        assert!(severe.len() > mild.len());
    }

    #[test]
    fn one_disease_pattern_at_a_time() {
        // plague wins over fever; no rash cells appear
        let attrs = test_attrs(|s| {
            s.disease_state = Some(DiseaseState {
                diseases: vec![DiseaseKind::Fever, DiseaseKind::Plague],
                severity: SeverityTier::Moderate,
            });
        });
        let plague_only = sick(DiseaseKind::Plague, SeverityTier::Moderate);
        assert_eq!(
            render_layer(&attrs, symptoms),
            render_layer(&plague_only, symptoms)
        );
    }

    #[test]
    fn markings_paint_at_their_location() {
        let attrs = test_attrs(|s| {
            s.appearance.markings = vec![AdornmentEntry {
                kind: "scar".to_string(),
                pattern: None,
                location: Some("left cheek".to_string()),
            }];
        });
        let geo = crate::geometry::GeometrySpec::derive(&attrs);
        let cmds = render_layer(&attrs, markings);
        assert!(!cmds.is_empty());
        for c in &cmds {
            assert!(c.x < geo.head.center_x, "scar cell strayed right");
        }
    }

    #[test]
    fn monocle_covers_one_eye_only() {
        let attrs = test_attrs(|s| {
            s.appearance.has_glasses = true;
            s.appearance.glasses_style = Some(GlassesStyle::Monocle);
        });
        let geo = crate::geometry::GeometrySpec::derive(&attrs);
        let cmds = render_layer(&attrs, eyewear);
        assert!(!cmds.is_empty());
        for c in &cmds {
            assert!(c.x >= geo.head.center_x - 1.0, "frame cell on the bare eye");
        }
    }

    #[test]
    fn no_glasses_no_frames() {
        let attrs = test_attrs(|_| {});
        assert!(render_layer(&attrs, eyewear).is_empty());
    }
}

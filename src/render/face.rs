//! Facial features: eyes, brows, nose, mouth.
//!
//! The mouth is a five-way curve switch keyed by expression family;
//! surprise short-circuits the curve path for an open mouth. Gaze shifts
//! the iris within the eye whites and blink grows an eyelid overlay that
//! fully occludes the eye at 1.0.

use crate::{
    expression::{MouthFamily, MouthShape, brow_offsets},
    frame::CommandBuf,
    foundation::math::Point,
    model::{EyeShape, Gender, LipShape, NoseShape},
};

use super::RenderCtx;

pub(crate) fn render(ctx: &RenderCtx, buf: &mut CommandBuf) {
    eye(ctx, buf, ctx.geo.anchors.eye_left, true);
    eye(ctx, buf, ctx.geo.anchors.eye_right, false);
    brows(ctx, buf);
    nose(ctx, buf);
    mouth(ctx, buf);
}

fn eye(ctx: &RenderCtx, buf: &mut CommandBuf, anchor: Point, is_left: bool) {
    let white = crate::color::Rgb::new(0xf2, 0xf0, 0xe8);
    let (half_w, tall) = match ctx.attrs.eye_shape {
        EyeShape::Almond => (1.5, false),
        EyeShape::Round => (1.5, true),
        EyeShape::Hooded => (1.5, false),
        EyeShape::Narrow => (1.0, false),
    };
    let x0 = anchor.x - half_w;
    let y = anchor.y.floor();

    // lid line
    buf.rect(x0, y - 1.0, half_w * 2.0, 1.0, ctx.skin.shadow, Some(0.7));
    if ctx.attrs.eye_shape == EyeShape::Hooded {
        buf.rect(x0, y - 1.0, half_w * 2.0, 1.0, ctx.skin.midtone, None);
    }

    // whites
    buf.rect(x0, y, half_w * 2.0, 1.0, white, None);
    if tall {
        buf.rect(x0 + 0.5, y + 1.0, half_w * 2.0 - 1.0, 0.5, white, None);
    }

    // iris and pupil, gaze-shifted but kept inside the whites
    let (gdx, gdy) = ctx.pose.gaze.offset();
    let iris_x = (anchor.x - 0.5 + gdx).clamp(x0, x0 + half_w * 2.0 - 1.0);
    let iris_y = y + gdy.clamp(-0.3, 0.3);
    buf.rect(iris_x, iris_y, 1.0, 1.0, ctx.attrs.eye_color, None);
    buf.rect(iris_x + 0.25, iris_y + 0.2, 0.5, 0.6, crate::color::Rgb::new(0x14, 0x12, 0x10), None);

    // blink: the lid grows downward and fully occludes at 1.0
    let blink = ctx.pose.blink.clamp(0.0, 1.0);
    if blink > 0.0 {
        let eye_h = if tall { 1.5 } else { 1.0 };
        buf.rect(x0, y, half_w * 2.0, eye_h * blink, ctx.skin.base, None);
    }

    // asymmetry accent under the outer corner
    let outer = if is_left { x0 } else { x0 + half_w * 2.0 - 1.0 };
    buf.cell_a(outer, y + 1.0, ctx.skin.shadow, 0.25);
}

fn brows(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let (dl, dr) = brow_offsets(ctx.expr);
    let geo = ctx.geo;
    let color = ctx.hair.deep_shadow;
    let width = match ctx.attrs.gender {
        Gender::Male => 3.0,
        Gender::Female => 2.5,
    };

    for (anchor, dy) in [(geo.anchors.eye_left, dl), (geo.anchors.eye_right, dr)] {
        buf.rect(
            anchor.x - width / 2.0,
            geo.anchors.brow_y + dy,
            width,
            1.0,
            color,
            None,
        );
    }
}

fn nose(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let n = geo.anchors.nose;
    let bridge = ctx.skin.shadow;
    let lit = ctx.skin.highlight;

    match ctx.attrs.nose_shape {
        NoseShape::Straight => {
            for dy in 1..4 {
                buf.cell_a(n.x - 1.0, n.y - f64::from(dy), bridge, 0.6);
            }
            buf.cell_a(n.x, n.y - 2.0, lit, 0.4);
            nostrils(ctx, buf, 1.5);
        }
        NoseShape::Aquiline => {
            for dy in 1..4 {
                buf.cell_a(n.x - 1.0, n.y - f64::from(dy), bridge, 0.6);
            }
            // the bump catches light mid-bridge
            buf.cell_a(n.x + 0.5, n.y - 2.5, lit, 0.7);
            buf.cell_a(n.x - 0.5, n.y - 1.0, bridge, 0.5);
            nostrils(ctx, buf, 1.5);
        }
        NoseShape::Button => {
            buf.cell_a(n.x - 0.5, n.y - 1.5, bridge, 0.4);
            buf.cell_a(n.x - 0.5, n.y - 0.8, lit, 0.6);
            nostrils(ctx, buf, 1.0);
        }
        NoseShape::Broad => {
            for dy in 1..3 {
                buf.cell_a(n.x - 1.5, n.y - f64::from(dy), bridge, 0.5);
                buf.cell_a(n.x + 0.5, n.y - f64::from(dy), bridge, 0.35);
            }
            buf.rect(n.x - 2.0, n.y - 0.5, 4.0, 1.0, ctx.skin.midtone, Some(0.5));
            nostrils(ctx, buf, 2.2);
        }
    }
}

fn nostrils(ctx: &RenderCtx, buf: &mut CommandBuf, spread: f64) {
    let n = ctx.geo.anchors.nose;
    buf.cell_a(n.x - spread, n.y, ctx.skin.deep_shadow, 0.7);
    buf.cell_a(n.x + spread - 1.0, n.y, ctx.skin.deep_shadow, 0.7);
}

fn mouth(ctx: &RenderCtx, buf: &mut CommandBuf) {
    match MouthShape::for_expression(ctx.expr) {
        MouthShape::Open => open_mouth(ctx, buf),
        MouthShape::Curve {
            family,
            amplitude,
            asymmetry,
        } => curved_mouth(ctx, buf, family, amplitude, asymmetry),
    }
}

/// Surprise: open mouth with teeth, bypassing the curve families.
fn open_mouth(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let m = ctx.geo.anchors.mouth;
    let cavity = crate::color::Rgb::new(0x3a, 0x1f, 0x1e);
    let teeth = crate::color::Rgb::new(0xe9, 0xe4, 0xd8);

    buf.rect(m.x - 1.5, m.y - 1.0, 3.0, 3.0, cavity, None);
    buf.rect(m.x - 1.0, m.y - 1.0, 2.0, 0.8, teeth, None);
    // lip ring
    buf.rect(m.x - 2.0, m.y - 1.5, 4.0, 0.5, ctx.attrs.lip_color, None);
    buf.rect(m.x - 2.0, m.y + 2.0, 4.0, 0.5, ctx.attrs.lip_color, None);
}

fn curved_mouth(
    ctx: &RenderCtx,
    buf: &mut CommandBuf,
    family: MouthFamily,
    amplitude: f64,
    asymmetry: f64,
) {
    let m = ctx.geo.anchors.mouth;
    let half_w = match (ctx.attrs.lip_shape, family) {
        (_, MouthFamily::Pursed) => 1.0,
        (LipShape::Thin, _) => 2.0,
        (LipShape::Average, _) => 2.5,
        (LipShape::Full, _) => 2.5,
    };
    let lip = ctx.attrs.lip_color;

    let direction = match family {
        MouthFamily::Smile => -1.0,
        MouthFamily::Frown => 1.0,
        MouthFamily::Neutral | MouthFamily::Pursed => 0.0,
        MouthFamily::Flat => 0.5, // the variant droops, it does not arc
    };
    let amp_units = (amplitude * 1.2).round().min(2.0);
    let asym_units = (asymmetry * 2.0).round();

    let mut x = -half_w;
    while x < half_w {
        let t = x / half_w;
        let mut dy = direction * amp_units * t * t;
        if t > 0.0 {
            // positive asymmetry biases the right corner along the curve
            dy += direction * asym_units * t;
        }
        buf.cell(m.x + x, m.y + dy.round(), lip);
        x += 1.0;
    }

    if family == MouthFamily::Pursed {
        buf.cell_a(m.x - 0.5, m.y + 1.0, ctx.skin.shadow, 0.5);
    }
    if ctx.attrs.lip_shape == LipShape::Full && family != MouthFamily::Pursed {
        buf.rect(m.x - half_w + 0.5, m.y + 1.0, half_w * 2.0 - 1.0, 0.6, ctx.skin.subsurface, Some(0.8));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{AnimationPose, Expression, GazeDirection};
    use crate::render::tests::{render_layer_with, test_attrs};

    #[test]
    fn surprise_paints_teeth() {
        let attrs = test_attrs(|_| {});
        let open = render_layer_with(&attrs, Expression::Surprise, AnimationPose::default(), render);
        let teeth = crate::color::Rgb::new(0xe9, 0xe4, 0xd8);
        assert!(open.iter().any(|c| c.color == teeth));
    }

    #[test]
    fn neutral_never_paints_teeth() {
        let attrs = test_attrs(|_| {});
        let cmds = render_layer_with(&attrs, Expression::Neutral, AnimationPose::default(), render);
        let teeth = crate::color::Rgb::new(0xe9, 0xe4, 0xd8);
        assert!(!cmds.iter().any(|c| c.color == teeth));
    }

    #[test]
    fn smile_and_frown_curve_opposite_ways() {
        let attrs = test_attrs(|_| {});
        let geo = crate::geometry::GeometrySpec::derive(&attrs);
        let lip = attrs.lip_color;
        let corner_y = |expr: Expression| -> f64 {
            render_layer_with(&attrs, expr, AnimationPose::default(), render)
                .into_iter()
                .filter(|c| c.color == lip)
                .map(|c| (c.x, c.y))
                .filter(|(x, _)| (*x - (geo.anchors.mouth.x - 2.5)).abs() < 0.6)
                .map(|(_, y)| y)
                .next()
                .unwrap()
        };
        assert!(corner_y(Expression::Happy) < corner_y(Expression::Neutral));
        assert!(corner_y(Expression::Scowl) > corner_y(Expression::Neutral));
    }

    #[test]
    fn blink_fully_occludes_at_one() {
        let attrs = test_attrs(|_| {});
        let pose = AnimationPose {
            blink: 1.0,
            ..AnimationPose::default()
        };
        let cmds = render_layer_with(&attrs, Expression::Neutral, pose, render);
        let geo = crate::geometry::GeometrySpec::derive(&attrs);
        // a full-height skin-colored lid sits over the left eye
        assert!(cmds.iter().any(|c| {
            c.color == crate::color::ColorRamp::derive(attrs.skin).base
                && (c.y - geo.anchors.eye_left.y.floor()).abs() < 0.1
                && c.height >= 0.99
        }));
    }

    #[test]
    fn gaze_shifts_the_iris_within_bounds() {
        let attrs = test_attrs(|_| {});
        let geo = crate::geometry::GeometrySpec::derive(&attrs);
        let iris_xs = |gaze: GazeDirection| -> Vec<f64> {
            let pose = AnimationPose {
                gaze,
                ..AnimationPose::default()
            };
            render_layer_with(&attrs, Expression::Neutral, pose, render)
                .into_iter()
                .filter(|c| c.color == attrs.eye_color)
                .map(|c| c.x)
                .collect()
        };
        let center = iris_xs(GazeDirection::Center);
        let left = iris_xs(GazeDirection::Left);
        assert!(left[0] < center[0]);
        // still inside the white span
        let white_x0 = geo.anchors.eye_left.x - 1.5;
        assert!(left[0] >= white_x0);
    }
}

//! Head and skin layer.
//!
//! Fills each head row between the geometry edges with lateral shading
//! bands, then layers temple/cheekbone/nose-bridge highlights, disease
//! flush, and per-cell skin-texture noise. Ears are a separate C-curve
//! anchored to the same half-width function.

use crate::{
    frame::CommandBuf,
    model::{Cheekbones, DiseaseKind, SkinTexture},
    rng::{self, offsets},
};

use super::RenderCtx;

const AGE_SPOT_CELLS: u64 = 7;
const FRECKLE_CHANCE: f64 = 0.18;
const WEATHER_CHANCE: f64 = 0.12;

pub(crate) fn render(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let skip_rows = if ctx.attrs.coverage.top {
        ctx.attrs.coverage.rows
    } else {
        0
    };

    for row in skip_rows..geo.head.rows {
        let y = geo.head_row_y(row);
        let (left, right) = geo.head_edges(row);
        let x0 = left.floor() as i32;
        let x1 = right.ceil() as i32;
        let span = (right - left).max(1.0);

        for x in x0..x1 {
            let xc = f64::from(x) + 0.5;
            if xc < left || xc > right {
                continue;
            }
            let u = (xc - left) / span; // 0 at left edge, 1 at right
            let color = if u < 0.08 {
                ctx.skin.complementary_shadow
            } else if u < 0.22 {
                ctx.skin.shadow
            } else if u > 0.92 {
                ctx.skin.highlight
            } else if u > 0.8 {
                ctx.skin.subsurface
            } else {
                ctx.skin.base
            };
            buf.cell(f64::from(x), y, color);
        }
    }

    highlights(ctx, buf);
    cheek_flush(ctx, buf);
    skin_noise(ctx, buf);
    if ctx.attrs.wrinkles {
        wrinkles(ctx, buf);
    }
    ears(ctx, buf);
}

fn highlights(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;

    // temples
    for row in [6u32, 7] {
        let (left, right) = geo.head_edges(row);
        buf.cell_a(left + 1.0, geo.head_row_y(row), ctx.skin.highlight, 0.6);
        buf.cell_a(right - 2.0, geo.head_row_y(row), ctx.skin.highlight, 0.6);
    }

    // cheekbones, stronger when prominent
    let cheek_row = (geo.head.rows as f64 * 0.52) as u32;
    let strength = match ctx.attrs.cheekbones {
        Cheekbones::High => 0.8,
        Cheekbones::Average => 0.5,
        Cheekbones::Low => 0.3,
    };
    let (left, right) = geo.head_edges(cheek_row);
    let y = geo.head_row_y(cheek_row);
    buf.cell_a(left + 2.0, y, ctx.skin.bright_highlight, strength);
    buf.cell_a(right - 3.0, y, ctx.skin.bright_highlight, strength);

    // nose bridge
    let bridge_top = geo.anchors.eye_left.y as u32;
    for dy in 0..3 {
        buf.cell_a(
            geo.head.center_x - 0.5,
            f64::from(bridge_top + dy),
            ctx.skin.highlight,
            0.5,
        );
    }
}

/// Fever and consumption put color high on the cheeks even while the base
/// skin tone pales.
fn cheek_flush(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let flushed = ctx
        .attrs
        .diseases
        .iter()
        .any(|d| matches!(d, DiseaseKind::Fever | DiseaseKind::Tuberculosis));
    if !flushed {
        return;
    }
    let geo = ctx.geo;
    let flush = ctx.skin.subsurface.shifted(28, -8, -6);
    let y = geo.anchors.nose.y - 1.0;
    for side in [-1.0, 1.0] {
        let x = geo.head.center_x + side * geo.head.width * 0.28;
        buf.cell_a(x, y, flush, 0.55);
        buf.cell_a(x - 0.5 * side, y + 1.0, flush, 0.4);
    }
}

fn skin_noise(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let seed = ctx.attrs.seed;

    match ctx.attrs.skin_texture {
        SkinTexture::Freckled => {
            // speckle band across nose and cheeks
            let rows = 11u32..16;
            let mut cell = 0u64;
            for row in rows {
                let (left, right) = geo.head_edges(row);
                let y = geo.head_row_y(row);
                let mut x = left.ceil();
                while x < right - 1.0 {
                    if rng::chance(seed, offsets::SKIN_NOISE_BASE + cell, FRECKLE_CHANCE) {
                        buf.cell_a(x, y, ctx.skin.shadow, 0.7);
                    }
                    cell += 1;
                    x += 1.0;
                }
            }
        }
        SkinTexture::Weathered => {
            let mut cell = 500u64;
            for row in 6..geo.head.rows - 2 {
                let (left, right) = geo.head_edges(row);
                let y = geo.head_row_y(row);
                let mut x = left.ceil();
                while x < right {
                    if rng::chance(seed, offsets::SKIN_NOISE_BASE + cell, WEATHER_CHANCE) {
                        buf.cell_a(x, y, ctx.skin.midtone, 0.5);
                    }
                    cell += 1;
                    x += 2.0;
                }
            }
        }
        SkinTexture::Smooth => {}
    }

    if ctx.attrs.age_spots {
        for i in 0..AGE_SPOT_CELLS {
            let rx = rng::draw(seed, offsets::SKIN_NOISE_BASE + 900 + i * 2);
            let ry = rng::draw(seed, offsets::SKIN_NOISE_BASE + 901 + i * 2);
            let row = 5 + (ry * f64::from(geo.head.rows - 8)) as u32;
            let (left, right) = geo.head_edges(row);
            let x = left + 1.0 + rx * (right - left - 2.0);
            buf.cell_a(x.floor(), geo.head_row_y(row), ctx.skin.deep_shadow, 0.45);
        }
    }
}

fn wrinkles(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let line = ctx.skin.shadow;

    // forehead furrows
    let brow = geo.anchors.brow_y;
    for dy in [-3.0, -5.0] {
        buf.rect(geo.head.center_x - 3.0, brow + dy, 6.0, 1.0, line, Some(0.35));
    }
    // nasolabial folds
    let mouth = geo.anchors.mouth;
    for side in [-1.0, 1.0] {
        buf.cell_a(mouth.x + side * 3.0, mouth.y - 2.0, line, 0.4);
        buf.cell_a(mouth.x + side * 3.5, mouth.y - 1.0, line, 0.4);
    }
    // crow's feet
    for (anchor, side) in [(geo.anchors.eye_left, -1.0), (geo.anchors.eye_right, 1.0)] {
        buf.cell_a(anchor.x + side * 3.0, anchor.y, line, 0.35);
        buf.cell_a(anchor.x + side * 3.0, anchor.y + 1.0, line, 0.3);
    }
}

/// Ears as a three-row C-curve hugging the head edge at the ear band.
fn ears(ctx: &RenderCtx, buf: &mut CommandBuf) {
    if ctx.attrs.coverage.sides {
        return;
    }
    let geo = ctx.geo;
    let ear_row = ((geo.anchors.ear_left.y - geo.head.top_y) as u32).min(geo.head.rows - 1);

    for dy in 0..3u32 {
        let row = (ear_row + dy).min(geo.head.rows - 1);
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let depth = if dy == 1 { 1.6 } else { 1.0 };
        buf.cell(left - depth, y, ctx.skin.base);
        buf.cell(right + depth - 1.0, y, ctx.skin.base);
        if dy == 1 {
            // inner shadow of the C
            buf.cell_a(left - 0.6, y, ctx.skin.shadow, 0.8);
            buf.cell_a(right - 0.4, y, ctx.skin.shadow, 0.8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use crate::render::tests::{render_layer, test_attrs};

    #[test]
    fn covered_top_rows_are_suppressed() {
        let bare = test_attrs(|_| {});
        let helmed = test_attrs(|s| {
            s.equipped_items = Some(crate::model::EquippedItems {
                head: Some(Item::named("great helm")),
                ..Default::default()
            });
        });
        let bare_cmds = render_layer(&bare, render);
        let helm_cmds = render_layer(&helmed, render);
        let min_y = |cmds: &[crate::frame::DrawCommand]| {
            cmds.iter().map(|c| c.y).fold(f64::INFINITY, f64::min)
        };
        assert!(min_y(&helm_cmds) > min_y(&bare_cmds));
    }

    #[test]
    fn crown_suppresses_nothing() {
        let bare = test_attrs(|_| {});
        let crowned = test_attrs(|s| {
            s.equipped_items = Some(crate::model::EquippedItems {
                head: Some(Item::named("golden crown")),
                ..Default::default()
            });
        });
        let min_y = |cmds: &[crate::frame::DrawCommand]| {
            cmds.iter().map(|c| c.y).fold(f64::INFINITY, f64::min)
        };
        assert_eq!(
            min_y(&render_layer(&bare, render)),
            min_y(&render_layer(&crowned, render))
        );
    }

    #[test]
    fn freckles_add_cells_over_smooth_skin() {
        let smooth = test_attrs(|_| {});
        let freckled = test_attrs(|s| {
            s.appearance.skin_texture = Some(SkinTexture::Freckled);
        });
        assert!(render_layer(&freckled, render).len() > render_layer(&smooth, render).len());
    }

    #[test]
    fn fever_flushes_the_cheeks() {
        let healthy = test_attrs(|_| {});
        let feverish = test_attrs(|s| {
            s.disease_state = Some(crate::model::DiseaseState {
                diseases: vec![DiseaseKind::Fever],
                severity: Default::default(),
            });
        });
        assert!(render_layer(&feverish, render).len() > render_layer(&healthy, render).len());
    }

    #[test]
    fn full_helm_hides_the_ears() {
        let helmed = test_attrs(|s| {
            s.equipped_items = Some(crate::model::EquippedItems {
                head: Some(Item::named("closed helm")),
                ..Default::default()
            });
        });
        let geo = crate::geometry::GeometrySpec::derive(&helmed);
        let cmds = render_layer(&helmed, render);
        // no ear cells protrude past the head edge at the ear band
        let ear_row = (geo.anchors.ear_left.y - geo.head.top_y) as u32;
        let (left, _) = geo.head_edges(ear_row);
        for c in cmds {
            if (c.y - geo.anchors.ear_left.y).abs() < 1.5 {
                assert!(c.x >= left - 1.0, "ear cell at {},{}", c.x, c.y);
            }
        }
    }
}

//! Facial hair layer: thirteen styles, each its own geometric
//! sub-renderer over the jaw/chin/lip bands of the head silhouette.

use crate::{
    frame::CommandBuf,
    model::{FacialHairStyle, Gender},
    rng::{self, offsets},
};

use super::RenderCtx;

const CLEFT_CHIN_CHANCE: f64 = 0.25;
const STUBBLE_CHANCE: f64 = 0.45;

pub(crate) fn render(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let style = ctx.attrs.facial_hair;

    match style {
        FacialHairStyle::CleanShaven => {}
        FacialHairStyle::Stubble => stubble(ctx, buf),
        FacialHairStyle::Mustache => mustache(ctx, buf, false),
        FacialHairStyle::HandlebarMustache => mustache(ctx, buf, true),
        FacialHairStyle::Goatee => chin_patch(ctx, buf, 0),
        FacialHairStyle::VanDyke => {
            mustache(ctx, buf, false);
            chin_patch(ctx, buf, 1);
        }
        FacialHairStyle::CircleBeard => {
            mustache(ctx, buf, false);
            chin_ring(ctx, buf);
        }
        FacialHairStyle::ShortBeard => jaw_band(ctx, buf, 2, 0),
        FacialHairStyle::FullBeard => {
            mustache(ctx, buf, false);
            jaw_band(ctx, buf, 4, 0);
        }
        FacialHairStyle::LongBeard => {
            mustache(ctx, buf, false);
            jaw_band(ctx, buf, 4, 4);
        }
        FacialHairStyle::ForkedBeard => {
            mustache(ctx, buf, false);
            jaw_band(ctx, buf, 4, 0);
            fork(ctx, buf);
        }
        FacialHairStyle::MuttonChops => chops(ctx, buf, true),
        FacialHairStyle::Sideburns => chops(ctx, buf, false),
    }

    // chin-exposing styles may reveal a cleft chin
    if matches!(
        style,
        FacialHairStyle::CleanShaven
            | FacialHairStyle::Stubble
            | FacialHairStyle::Mustache
            | FacialHairStyle::HandlebarMustache
    ) && ctx.attrs.gender == Gender::Male
        && rng::chance(ctx.attrs.seed, offsets::CLEFT_CHIN, CLEFT_CHIN_CHANCE)
    {
        let m = ctx.geo.anchors.mouth;
        buf.cell_a(m.x - 0.5, m.y + 3.0, ctx.skin.shadow, 0.5);
    }
}

fn mouth_row(ctx: &RenderCtx) -> u32 {
    (ctx.geo.anchors.mouth.y - ctx.geo.head.top_y) as u32
}

fn stubble(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let start = mouth_row(ctx).saturating_sub(1);
    let p = STUBBLE_CHANCE * ctx.attrs.facial_hair_thickness;
    let mut cell = 0u64;
    for row in start..geo.head.rows {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let mut x = left.ceil();
        while x < right.floor() {
            if rng::chance(ctx.attrs.seed, offsets::STUBBLE_BASE + cell, p) {
                buf.cell_a(x, y, ctx.hair.shadow, 0.5);
            }
            cell += 1;
            x += 1.0;
        }
    }
}

fn mustache(ctx: &RenderCtx, buf: &mut CommandBuf, handlebar: bool) {
    let m = ctx.geo.anchors.mouth;
    let y = m.y - 1.0;
    buf.rect(m.x - 2.5, y, 5.0, 1.0, ctx.hair.base, None);
    buf.rect(m.x - 1.0, y, 2.0, 0.5, ctx.hair.highlight, Some(0.5));
    if handlebar {
        for side in [-1.0, 1.0] {
            buf.cell(m.x + side * 3.0 - 0.5, y + 1.0, ctx.hair.base);
            buf.cell(m.x + side * 3.5 - 0.5, y + 2.0, ctx.hair.shadow);
        }
    }
}

fn chin_patch(ctx: &RenderCtx, buf: &mut CommandBuf, extra_rows: u32) {
    let m = ctx.geo.anchors.mouth;
    for dy in 0..(2 + extra_rows) {
        let y = m.y + 1.0 + f64::from(dy);
        let w = if dy == 0 { 3.0 } else { 2.0 };
        buf.rect(m.x - w / 2.0, y, w, 1.0, ctx.hair.base, None);
    }
}

fn chin_ring(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let m = ctx.geo.anchors.mouth;
    for side in [-1.0, 1.0] {
        buf.cell(m.x + side * 2.0 - 0.5, m.y, ctx.hair.base);
        buf.cell(m.x + side * 1.5 - 0.5, m.y + 1.0, ctx.hair.base);
    }
    buf.rect(m.x - 1.5, m.y + 2.0, 3.0, 1.0, ctx.hair.base, None);
}

/// Beard mass along the jaw. `depth` rows rise from the jawline toward
/// the ears; `below` rows hang under the chin.
fn jaw_band(ctx: &RenderCtx, buf: &mut CommandBuf, depth: u32, below: u32) {
    let geo = ctx.geo;
    let start = mouth_row(ctx).saturating_sub(depth / 2);
    for row in start..geo.head.rows {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let inset = if row < start + 2 { 2.5 } else { 0.0 };
        let mut x = left.ceil();
        while x < right.floor() {
            let edge_dist = (x - left).min(right - x);
            // the top rows climb the cheeks near the edges only
            if !(row < start + 2 && edge_dist > inset) {
                buf.cell(x, y, texture(ctx, x, y));
            }
            x += 1.0;
        }
    }
    // hang below the chin
    let chin_y = geo.head.top_y + f64::from(geo.head.rows);
    let (left, right) = geo.head_edges(geo.head.rows - 1);
    for dy in 0..below {
        let y = chin_y + f64::from(dy);
        let shrink = f64::from(dy) * 0.8;
        let mut x = (left + shrink).ceil();
        while x < (right - shrink).floor() {
            buf.cell(x, y, texture(ctx, x, y));
            x += 1.0;
        }
    }
}

fn fork(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let chin_y = geo.head.top_y + f64::from(geo.head.rows);
    let cx = geo.head.center_x;
    for dy in 0..4 {
        let y = chin_y + f64::from(dy);
        let spread = 1.5 + f64::from(dy) * 0.5;
        buf.cell(cx - spread - 0.5, y, texture(ctx, cx - spread, y));
        buf.cell(cx + spread - 0.5, y, texture(ctx, cx + spread, y));
    }
}

fn chops(ctx: &RenderCtx, buf: &mut CommandBuf, full: bool) {
    let geo = ctx.geo;
    let ear_row = (geo.anchors.ear_left.y - geo.head.top_y) as u32;
    let end = if full { geo.head.rows } else { ear_row + 5 };
    let width = if full { 3.0 } else { 1.5 };
    for row in ear_row..end.min(geo.head.rows) {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let mut d = 0.0;
        while d < width {
            buf.cell((left + d).floor(), y, texture(ctx, left + d, y));
            buf.cell((right - 1.0 - d).floor(), y, texture(ctx, right - d, y));
            d += 1.0;
        }
    }
}

fn texture(ctx: &RenderCtx, x: f64, y: f64) -> crate::color::Rgb {
    let xi = x.floor() as i64;
    let yi = y.floor() as i64;
    if (xi + yi * 3).rem_euclid(5) == 0 {
        ctx.hair.shadow
    } else if (xi * 2 + yi).rem_euclid(7) == 6 {
        ctx.hair.highlight
    } else {
        ctx.hair.base
    }
}

//! Hair layer.
//!
//! Each named style is its own sub-renderer; all of them share the same
//! color ramps and the same texture pattern function, and all respect the
//! headgear coverage mask resolved during attribute resolution.

use crate::{
    color::Rgb,
    frame::CommandBuf,
    model::{HairLength, HairTexture},
    resolve::HairStyle,
    rng::{self, offsets},
};

use super::RenderCtx;

const FLYAWAY_STRANDS: u64 = 4;

pub(crate) fn render(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let hair = &ctx.attrs.hair;
    if hair.style == HairStyle::None || hair.length == HairLength::Bald {
        return;
    }

    match hair.style {
        HairStyle::None => {}
        HairStyle::Simple => {
            cap(ctx, buf);
            sides(ctx, buf, side_end(hair.length).min(14), 0.5);
        }
        HairStyle::Flowing => {
            cap(ctx, buf);
            sides(ctx, buf, side_end(hair.length), 1.5);
            back_mass(ctx, buf, side_end(hair.length));
        }
        HairStyle::Afro => afro(ctx, buf),
        HairStyle::Locs => {
            cap(ctx, buf);
            locs(ctx, buf, side_end(hair.length));
        }
        HairStyle::Braided => {
            cap(ctx, buf);
            braids(ctx, buf, side_end(hair.length) + 4);
        }
        HairStyle::BraidedCrown => {
            cap(ctx, buf);
            braided_crown(ctx, buf);
        }
        HairStyle::BraidedBun => {
            cap(ctx, buf);
            bun(ctx, buf, true);
        }
        HairStyle::Bun => {
            cap(ctx, buf);
            bun(ctx, buf, false);
        }
        HairStyle::Ponytail => {
            cap(ctx, buf);
            sides(ctx, buf, 10, 0.5);
            ponytail(ctx, buf, side_end(hair.length) + 8);
        }
        HairStyle::Topknot => {
            cap(ctx, buf);
            topknot(ctx, buf);
        }
        HairStyle::Mohawk => mohawk(ctx, buf),
        HairStyle::Pageboy => {
            cap(ctx, buf);
            fringe(ctx, buf, false);
            sides(ctx, buf, 16, 1.0);
        }
        HairStyle::Bowl => {
            cap(ctx, buf);
            fringe(ctx, buf, true);
            sides(ctx, buf, 12, 0.5);
        }
        HairStyle::RenaissanceRolls => {
            cap(ctx, buf);
            rolls(ctx, buf);
        }
    }

    if matches!(hair.style, HairStyle::Flowing | HairStyle::Simple)
        && hair.length >= HairLength::Medium
    {
        flyaways(ctx, buf);
    }
}

/// Row (in head rows, may exceed the head) where the side fall ends.
fn side_end(length: HairLength) -> u32 {
    match length {
        HairLength::Bald => 0,
        HairLength::VeryShort => 10,
        HairLength::Short => 13,
        HairLength::Medium => 20,
        HairLength::Long => 30,
        HairLength::VeryLong => 40,
    }
}

/// Texture-driven shadow/highlight pick per cell. Deterministic in the
/// cell coordinates and the portrait seed.
fn strand_color(ctx: &RenderCtx, x: f64, y: f64) -> Rgb {
    let xi = x.floor() as i64;
    let yi = y.floor() as i64;
    let ramp = &ctx.hair;
    match ctx.attrs.hair.texture {
        HairTexture::Straight => {
            if xi.rem_euclid(7) == 3 {
                ramp.highlight
            } else if xi.rem_euclid(3) == 0 {
                ramp.shadow
            } else {
                ramp.base
            }
        }
        HairTexture::Wavy => match (xi + yi.div_euclid(2)).rem_euclid(4) {
            0 => ramp.shadow,
            2 => ramp.highlight,
            _ => ramp.base,
        },
        HairTexture::Curly => {
            if (xi * 3 + yi * 5).rem_euclid(7) < 2 {
                ramp.shadow
            } else if rng::hash2(xi, yi) < 0.12 {
                ramp.highlight
            } else {
                ramp.base
            }
        }
        HairTexture::Coily => {
            if (xi + yi).rem_euclid(2) == 0 {
                ramp.shadow
            } else if rng::hash2(xi.wrapping_mul(3), yi) < 0.1 {
                ramp.highlight
            } else {
                ramp.midtone
            }
        }
        HairTexture::Kinky => {
            if (xi * 5 + yi * 3).rem_euclid(4) == 0 {
                ramp.midtone
            } else if (xi + yi).rem_euclid(3) == 0 {
                ramp.deep_shadow
            } else {
                ramp.shadow
            }
        }
    }
}

/// Crown cap: fills the top of the skull down to the hairline.
fn cap(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let cover = &ctx.attrs.coverage;
    let start = if cover.top { cover.rows } else { 0 };
    let end = if cover.front { 4u32 } else { 6 };
    if start >= end {
        return;
    }

    let overhang = if ctx.attrs.hair.length >= HairLength::Medium {
        1.0
    } else {
        0.5
    };
    for row in start..end {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let mut x = (left - overhang).floor();
        while x < (right + overhang).ceil() {
            buf.cell(x, y, strand_color(ctx, x, y));
            x += 1.0;
        }
    }
}

/// Side curtains hugging the head edges.
fn sides(ctx: &RenderCtx, buf: &mut CommandBuf, end_row: u32, spread: f64) {
    if ctx.attrs.coverage.sides {
        return;
    }
    let geo = ctx.geo;
    let start = if ctx.attrs.coverage.top {
        ctx.attrs.coverage.rows.max(4)
    } else {
        4
    };

    for row in start..end_row {
        let y = geo.head.top_y + f64::from(row);
        let head_row = row.min(geo.head.rows - 1);
        let (left, right) = geo.head_edges(head_row);
        // below the chin the curtain keeps the jaw-row width
        for d in 0..=(spread.ceil() as i32) {
            let off = f64::from(d);
            buf.cell((left - 1.0 - off).floor(), y, strand_color(ctx, left - 1.0 - off, y));
            buf.cell((right + off).floor(), y, strand_color(ctx, right + off, y));
        }
    }
}

/// Mass of hair behind the shoulders for flowing styles.
fn back_mass(ctx: &RenderCtx, buf: &mut CommandBuf, end_row: u32) {
    if ctx.attrs.coverage.back || end_row <= 22 {
        return;
    }
    let geo = ctx.geo;
    for row in 22..end_row {
        let y = geo.head.top_y + f64::from(row);
        let (left, right) = geo.head_edges(geo.head.rows - 1);
        let sway = if row % 4 < 2 { 0.0 } else { 1.0 };
        for d in 0..2 {
            let off = 2.0 + f64::from(d) + sway;
            buf.cell((left - off).floor(), y, strand_color(ctx, left - off, y));
            buf.cell((right + off - 1.0).floor(), y, strand_color(ctx, right + off, y));
        }
    }
}

fn afro(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let cover = &ctx.attrs.coverage;
    if cover.top && cover.rows >= 4 {
        // a wrap swallows the halo; keep only the uncovered fringe rows
        cap(ctx, buf);
        return;
    }
    let cx = geo.head.center_x;
    let cy = geo.head.top_y + 6.0;
    let rx = geo.head.width * 0.5 + 3.0;
    let ry = 9.0;
    let y0 = (cy - ry).floor() as i32;
    let y1 = (cy + ry * 0.55).ceil() as i32;
    for yi in y0..y1 {
        let y = f64::from(yi);
        for xi in (cx - rx).floor() as i32..(cx + rx).ceil() as i32 {
            let x = f64::from(xi);
            let dx = (x + 0.5 - cx) / rx;
            let dy = (y + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                buf.cell(x, y, strand_color(ctx, x, y));
            }
        }
    }
}

fn locs(ctx: &RenderCtx, buf: &mut CommandBuf, end_row: u32) {
    let geo = ctx.geo;
    if ctx.attrs.coverage.sides {
        return;
    }
    let (left, right) = geo.head_edges(6);
    let mut strand = 0u64;
    let mut x = left - 1.0;
    while x < right + 1.0 {
        let jitter = (rng::draw(ctx.attrs.seed, offsets::FLYAWAY_BASE + strand) * 4.0) as u32;
        let fall = end_row.saturating_sub(jitter);
        for row in 5..fall {
            let y = geo.head.top_y + f64::from(row);
            // strands hang outside the face past the hairline
            let head_row = row.min(geo.head.rows - 1);
            let (l, r) = geo.head_edges(head_row);
            if x < l - 0.5 || x > r - 0.5 || row < 8 {
                buf.cell(x.floor(), y, strand_color(ctx, x, y));
            }
        }
        strand += 1;
        x += 2.0;
    }
}

fn braids(ctx: &RenderCtx, buf: &mut CommandBuf, end_row: u32) {
    if ctx.attrs.coverage.sides {
        return;
    }
    let geo = ctx.geo;
    for row in 6..end_row {
        let y = geo.head.top_y + f64::from(row);
        let head_row = row.min(geo.head.rows - 1);
        let (left, right) = geo.head_edges(head_row);
        // alternating plait segments
        let color = if row % 2 == 0 {
            ctx.hair.shadow
        } else {
            ctx.hair.highlight
        };
        buf.cell((left - 1.5).floor(), y, color);
        buf.cell((right + 0.5).floor(), y, color);
    }
    // tied ends
    let y = ctx.geo.head.top_y + f64::from(end_row);
    let (left, right) = geo.head_edges(geo.head.rows - 1);
    buf.cell((left - 1.5).floor(), y, ctx.attrs.palette_accent);
    buf.cell((right + 0.5).floor(), y, ctx.attrs.palette_accent);
}

fn braided_crown(ctx: &RenderCtx, buf: &mut CommandBuf) {
    if ctx.attrs.coverage.top && ctx.attrs.coverage.rows >= 3 {
        return;
    }
    let geo = ctx.geo;
    for row in 3..5u32 {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let mut x = (left - 0.5).floor();
        let mut i = 0i64;
        while x < right + 0.5 {
            let color = if i.rem_euclid(2) == 0 {
                ctx.hair.shadow
            } else {
                ctx.hair.highlight
            };
            buf.cell(x, y, color);
            x += 1.0;
            i += 1;
        }
    }
}

fn bun(ctx: &RenderCtx, buf: &mut CommandBuf, braided: bool) {
    if ctx.attrs.coverage.top && ctx.attrs.coverage.rows > 0 {
        return;
    }
    let geo = ctx.geo;
    let cx = geo.head.center_x;
    let top = geo.head.top_y;
    for dy in 0..3 {
        let y = top - 3.0 + f64::from(dy);
        let w = if dy == 1 { 5.0 } else { 3.0 };
        let mut x = (cx - w / 2.0).floor();
        while x < cx + w / 2.0 {
            let color = if braided && (x as i64 + dy as i64).rem_euclid(2) == 0 {
                ctx.hair.shadow
            } else {
                strand_color(ctx, x, y)
            };
            buf.cell(x, y, color);
            x += 1.0;
        }
    }
}

fn ponytail(ctx: &RenderCtx, buf: &mut CommandBuf, end_row: u32) {
    if ctx.attrs.coverage.back {
        return;
    }
    let geo = ctx.geo;
    let x_base = geo.head.center_x + geo.head.width * 0.48;
    for row in 4..end_row {
        let y = geo.head.top_y + f64::from(row);
        let width = if row < 8 || row % 3 == 0 { 2.0 } else { 1.0 };
        let mut x = x_base;
        while x < x_base + width {
            buf.cell(x.floor(), y, strand_color(ctx, x, y));
            x += 1.0;
        }
    }
    // tie
    buf.cell(x_base.floor(), geo.head.top_y + 6.0, ctx.attrs.palette_accent);
}

fn topknot(ctx: &RenderCtx, buf: &mut CommandBuf) {
    if ctx.attrs.coverage.top && ctx.attrs.coverage.rows > 0 {
        return;
    }
    let geo = ctx.geo;
    let cx = geo.head.center_x;
    for dy in 0..3 {
        let y = geo.head.top_y - 4.0 + f64::from(dy);
        let w = if dy == 2 { 2.0 } else { 3.0 };
        let mut x = (cx - w / 2.0).floor();
        while x < cx + w / 2.0 {
            buf.cell(x, y, strand_color(ctx, x, y));
            x += 1.0;
        }
    }
    buf.cell(cx - 0.5, geo.head.top_y - 1.0, ctx.hair.deep_shadow);
}

fn mohawk(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    let cover = &ctx.attrs.coverage;
    if cover.top && cover.rows >= 3 {
        return;
    }
    let cx = geo.head.center_x;
    for row in -3i32..9 {
        let y = geo.head.top_y + f64::from(row);
        let crest = if row < 2 { 1.5 } else { 1.0 };
        let mut x = (cx - crest).floor();
        while x < cx + crest {
            buf.cell(x, y, strand_color(ctx, x, y));
            x += 1.0;
        }
    }
}

fn fringe(ctx: &RenderCtx, buf: &mut CommandBuf, hard_line: bool) {
    if ctx.attrs.coverage.front {
        return;
    }
    let geo = ctx.geo;
    let row = 6u32;
    let (left, right) = geo.head_edges(row);
    let y = geo.head_row_y(row);
    let mut x = left.ceil();
    while x < right.floor() {
        let color = if hard_line {
            ctx.hair.deep_shadow
        } else {
            strand_color(ctx, x, y)
        };
        buf.cell(x, y, color);
        x += 1.0;
    }
}

fn rolls(ctx: &RenderCtx, buf: &mut CommandBuf) {
    if ctx.attrs.coverage.sides {
        return;
    }
    let geo = ctx.geo;
    for row in 4..8u32 {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        for d in 0..3 {
            let off = f64::from(d);
            let color = if d == 1 {
                ctx.hair.highlight
            } else {
                ctx.hair.base
            };
            buf.cell((left - 1.0 - off).floor(), y, color);
            buf.cell((right + off).floor(), y, color);
        }
    }
}

/// A few stray strands just off the silhouette for loose styles.
fn flyaways(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;
    for i in 0..FLYAWAY_STRANDS {
        let rx = rng::draw(ctx.attrs.seed, offsets::FLYAWAY_BASE + 10 + i * 2);
        let ry = rng::draw(ctx.attrs.seed, offsets::FLYAWAY_BASE + 11 + i * 2);
        let row = 5 + (ry * 10.0) as u32;
        let (left, right) = geo.head_edges(row.min(geo.head.rows - 1));
        let side = if i % 2 == 0 { left - 2.0 - rx } else { right + 1.0 + rx };
        buf.cell_a(side.floor(), geo.head_row_y(row), ctx.hair.base, 0.6);
    }
}

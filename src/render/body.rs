//! Body and clothing layer.
//!
//! Paints the neck/shoulder/chest/waist taper row by row, choosing bare
//! skin or garment per row, then arms, then the cloak as its own slot so
//! it can cover the shoulder silhouette independent of the torso garment.

use crate::{color::ColorRamp, frame::CommandBuf, geometry::BodySpec, resolve::GarmentFamily};

use super::{RenderCtx, item_color};

/// First painted body row; the chin overlaps the top two rows.
pub(crate) const NECK_TOP: f64 = 29.0;
const SHOULDER_Y: f64 = 37.0;
const CHEST_Y: f64 = 45.0;
const WAIST_Y: f64 = 55.0;

fn body_half_width(body: &BodySpec, y: f64) -> f64 {
    let neck = body.shoulder * 0.30;
    let shoulder = body.shoulder * 0.5;
    let chest = body.chest * 0.5;
    let waist = body.waist * 0.5;
    let hip = body.hip * 0.5;

    let blend = |a: f64, b: f64, y0: f64, y1: f64| -> f64 {
        let t = ((y - y0) / (y1 - y0)).clamp(0.0, 1.0);
        a + (b - a) * t * t * (3.0 - 2.0 * t)
    };

    if y < 33.0 {
        neck
    } else if y < SHOULDER_Y {
        blend(neck, shoulder, 33.0, SHOULDER_Y)
    } else if y < CHEST_Y {
        blend(shoulder, chest, SHOULDER_Y, CHEST_Y)
    } else if y < WAIST_Y {
        blend(chest, waist, CHEST_Y, WAIST_Y)
    } else {
        blend(waist, hip, WAIST_Y, 64.0)
    }
}

fn garment_top(family: GarmentFamily) -> f64 {
    match family {
        GarmentFamily::Robe | GarmentFamily::Dress => 31.0,
        GarmentFamily::Hoodie => 32.0,
        GarmentFamily::BusinessSuit => 33.0,
        GarmentFamily::TankTop => 36.0,
        _ => 34.0,
    }
}

/// Sleeves: how far down the arm the garment reaches.
fn sleeve_end(family: GarmentFamily) -> f64 {
    match family {
        GarmentFamily::TankTop => SHOULDER_Y, // straps only
        GarmentFamily::TShirt => 46.0,
        _ => 64.0,
    }
}

pub(crate) fn render(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let body = &ctx.geo.body;
    let cx = ctx.geo.head.center_x;
    let bottom = (NECK_TOP + body.body_height).min(64.0);

    let garment = ctx.attrs.garment.as_ref();
    let family = ctx.attrs.garment_family;
    let gc = item_color(garment, ctx.attrs.palette_secondary);
    let garment_ramp = ColorRamp::derive(gc);
    let top = if garment.is_some() {
        garment_top(family)
    } else {
        f64::INFINITY
    };

    let mut y = NECK_TOP;
    while y < bottom {
        let half = body_half_width(body, y);
        let with_arms = y >= SHOULDER_Y;
        let arm_half = if with_arms { half + body.arm_width } else { half };

        let x0 = (cx - arm_half).floor() as i32;
        let x1 = (cx + arm_half).ceil() as i32;
        for x in x0..x1 {
            let xc = f64::from(x) + 0.5;
            let in_torso = (xc - cx).abs() <= half;
            let garment_here = y >= top && (in_torso || y < sleeve_end(family));
            if garment_here {
                let color = garment_cell(ctx, &garment_ramp, xc - cx, y, half);
                buf.cell(f64::from(x), y, color);
            } else {
                // bare skin: neck, collarbone, or uncovered arms
                let shade = (xc - cx) / half.max(1.0);
                let color = if shade < -0.55 {
                    ctx.skin.shadow
                } else if shade > 0.6 {
                    ctx.skin.highlight
                } else {
                    ctx.skin.base
                };
                buf.cell(f64::from(x), y, color);
            }
        }
        y += 1.0;
    }

    if garment.is_some() {
        collar(ctx, &garment_ramp, buf, top);
    }

    if let Some(cloak) = ctx.attrs.cloak.as_ref() {
        let cc = item_color(Some(cloak), ctx.attrs.palette_primary);
        render_cloak(ctx, &ColorRamp::derive(cc), buf, bottom);
    }
}

fn garment_cell(
    ctx: &RenderCtx,
    ramp: &ColorRamp,
    dx: f64,
    y: f64,
    half: f64,
) -> crate::color::Rgb {
    let edge = dx / half.max(1.0);
    // lateral shading shared by every family
    if edge < -0.7 {
        return ramp.deep_shadow;
    }
    if edge > 0.75 {
        return ramp.highlight;
    }

    let xi = dx.floor() as i64;
    let yi = y as i64;
    match ctx.attrs.garment_family {
        GarmentFamily::PlateArmor => {
            // banded plates with a polished line every fourth row
            if yi % 4 == 0 {
                ramp.bright_highlight
            } else if yi % 4 == 3 {
                ramp.shadow
            } else {
                ramp.midtone
            }
        }
        GarmentFamily::ChainArmor => {
            if (xi + yi) % 2 == 0 {
                ramp.shadow
            } else {
                ramp.midtone
            }
        }
        GarmentFamily::LeatherArmor => {
            if xi.rem_euclid(5) == 0 && yi % 3 == 0 {
                ramp.shadow // stitch dots
            } else {
                ramp.midtone
            }
        }
        GarmentFamily::Robe | GarmentFamily::Dress => {
            if xi.rem_euclid(4) == 0 {
                ramp.shadow // vertical folds
            } else {
                ramp.base
            }
        }
        GarmentFamily::BusinessSuit => {
            if dx.abs() < 1.5 && y < CHEST_Y {
                // shirt and tie column inside the jacket
                if yi % 2 == 0 {
                    crate::color::Rgb::new(0xe8, 0xe8, 0xe2)
                } else {
                    ctx.attrs.palette_accent
                }
            } else {
                ramp.base
            }
        }
        GarmentFamily::Hoodie => {
            // kangaroo pocket
            if (50.0..56.0).contains(&y) && dx.abs() < half * 0.45 {
                ramp.shadow
            } else {
                ramp.base
            }
        }
        _ => {
            if y as i64 % 9 == 8 {
                ramp.midtone // hem hint
            } else {
                ramp.base
            }
        }
    }
}

fn collar(ctx: &RenderCtx, ramp: &ColorRamp, buf: &mut CommandBuf, top: f64) {
    let cx = ctx.geo.head.center_x;
    match ctx.attrs.garment_family {
        GarmentFamily::BusinessSuit => {
            // lapel V
            for i in 0..3 {
                let d = f64::from(i);
                buf.cell(cx - 2.0 - d, top + d, ramp.deep_shadow);
                buf.cell(cx + 1.0 + d, top + d, ramp.deep_shadow);
            }
        }
        GarmentFamily::Robe | GarmentFamily::Dress => {
            buf.rect(cx - 4.0, top, 8.0, 1.0, ramp.shadow, None);
        }
        GarmentFamily::Hoodie => {
            // hood bulge behind the neck
            buf.rect(cx - 5.0, top - 1.0, 10.0, 1.0, ramp.shadow, None);
            buf.cell(cx - 1.0, top + 1.0, ramp.deep_shadow);
            buf.cell(cx, top + 1.0, ramp.deep_shadow);
        }
        GarmentFamily::TankTop => {
            // straps above the neckline
            let half = body_half_width(&ctx.geo.body, SHOULDER_Y);
            for dy in 0..2 {
                let y = 34.0 + f64::from(dy);
                buf.cell(cx - half * 0.55, y, ramp.base);
                buf.cell(cx + half * 0.55 - 1.0, y, ramp.base);
            }
        }
        _ => {
            // crew line
            buf.rect(cx - 2.0, top, 4.0, 1.0, ramp.shadow, None);
        }
    }
}

fn render_cloak(ctx: &RenderCtx, ramp: &ColorRamp, buf: &mut CommandBuf, bottom: f64) {
    let body = &ctx.geo.body;
    let cx = ctx.geo.head.center_x;

    // drape over the shoulder line first
    for x in -6..6 {
        let y = 34.0;
        buf.cell(cx + f64::from(x), y, ramp.base);
    }

    let mut y = 35.0;
    while y < bottom {
        let half = body_half_width(body, y) + body.arm_width;
        // outer fall of fabric covering the arm silhouette
        for d in 0..3 {
            let off = half - 1.0 + f64::from(d);
            let color = if d == 2 { ramp.shadow } else { ramp.base };
            buf.cell((cx - off - 1.0).floor(), y, color);
            buf.cell((cx + off).floor(), y, color);
        }
        y += 1.0;
    }

    // clasp
    buf.cell(cx - 0.5, 34.0, ctx.attrs.palette_accent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, Item};
    use crate::render::tests::{ctx_pieces, test_attrs};

    #[test]
    fn taper_profile_narrows_at_the_waist_for_women() {
        let attrs = test_attrs(|s| s.gender = Gender::Female);
        let (geo, _, _) = ctx_pieces(&attrs);
        let shoulder = body_half_width(&geo.body, SHOULDER_Y);
        let waist = body_half_width(&geo.body, WAIST_Y - 0.5);
        assert!(waist < shoulder);
    }

    #[test]
    fn bare_torso_emits_only_skin_colors() {
        let attrs = test_attrs(|s| {
            s.equipped_items = Some(Default::default()); // all slots bare
        });
        let (geo, skin, hair) = ctx_pieces(&attrs);
        let ctx = RenderCtx {
            attrs: &attrs,
            geo: &geo,
            skin,
            hair,
            expr: Default::default(),
            pose: Default::default(),
        };
        let mut buf = CommandBuf::new();
        render(&ctx, &mut buf);
        let skin_set = [
            skin.base,
            skin.shadow,
            skin.highlight,
        ];
        for cmd in buf.into_commands() {
            assert!(skin_set.contains(&cmd.color), "non-skin color on bare torso");
        }
    }

    #[test]
    fn tank_top_leaves_arms_bare() {
        assert_eq!(sleeve_end(GarmentFamily::TankTop), SHOULDER_Y);
        assert!(sleeve_end(GarmentFamily::Robe) > 60.0);
    }

    #[test]
    fn cloak_paints_after_torso() {
        let attrs = test_attrs(|s| {
            s.equipped_items = Some(crate::model::EquippedItems {
                torso: Some(Item::named("simple tunic")),
                cloak: Some(Item::named("wool cloak")),
                ..Default::default()
            });
        });
        let (geo, skin, hair) = ctx_pieces(&attrs);
        let ctx = RenderCtx {
            attrs: &attrs,
            geo: &geo,
            skin,
            hair,
            expr: Default::default(),
            pose: Default::default(),
        };
        let mut without = CommandBuf::new();
        let mut with = CommandBuf::new();
        let mut bare = attrs.clone();
        bare.cloak = None;
        let bare_ctx = RenderCtx {
            attrs: &bare,
            geo: &geo,
            skin,
            hair,
            expr: Default::default(),
            pose: Default::default(),
        };
        render(&bare_ctx, &mut without);
        render(&ctx, &mut with);
        // cloak adds commands strictly after the torso's
        assert!(with.len() > without.len());
    }
}

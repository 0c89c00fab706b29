//! Headgear and jewelry layers.
//!
//! Headgear silhouettes are table-driven on the resolved category crossed
//! with culture and era; jewelry iterates the typed entries resolved from
//! the catalogs.

use crate::{
    color::{ColorRamp, Rgb},
    frame::CommandBuf,
    model::{CulturalZone, WealthLevel},
    resolve::{EraBucket, HeadgearCategory, JewelryKind},
};

use super::{RenderCtx, item_color};

const GOLD: Rgb = Rgb::new(0xd4, 0xaf, 0x37);
const STEEL: Rgb = Rgb::new(0x9a, 0x9f, 0xa6);

pub(crate) fn headgear(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let category = ctx.attrs.headgear_category;
    if category == HeadgearCategory::None {
        return;
    }
    let fallback = match category {
        HeadgearCategory::Crown => GOLD,
        HeadgearCategory::Helm | HeadgearCategory::FullHelm => STEEL,
        _ => ctx.attrs.palette_primary,
    };
    let color = item_color(ctx.attrs.headgear.as_ref(), fallback);
    let ramp = ColorRamp::derive(color);

    match category {
        HeadgearCategory::None => {}
        HeadgearCategory::Crown => crown(ctx, buf, &ramp),
        HeadgearCategory::Helm => helm(ctx, buf, &ramp, false),
        HeadgearCategory::FullHelm => helm(ctx, buf, &ramp, true),
        HeadgearCategory::Turban => turban(ctx, buf, &ramp),
        HeadgearCategory::Hood => hood(ctx, buf, &ramp),
        HeadgearCategory::Veil => veil(ctx, buf, &ramp),
        HeadgearCategory::Cap => cap(ctx, buf, &ramp),
    }
}

fn crown(ctx: &RenderCtx, buf: &mut CommandBuf, ramp: &ColorRamp) {
    let geo = ctx.geo;
    let row = 2u32;
    let (left, right) = geo.head_edges(row);
    let y = geo.head_row_y(row);

    buf.rect(left - 0.5, y, right - left + 1.0, 1.0, ramp.base, None);
    // points
    let mut x = left;
    while x < right {
        buf.cell(x.floor(), y - 1.0, ramp.highlight);
        x += 3.0;
    }
    // jewels
    buf.cell(geo.head.center_x - 0.5, y, ctx.attrs.palette_accent);
    if ctx.attrs.wealth >= WealthLevel::Wealthy {
        buf.cell(left + 1.0, y, Rgb::new(0x9c, 0x2c, 0x3a));
        buf.cell(right - 2.0, y, Rgb::new(0x2c, 0x52, 0x9c));
    }
}

fn helm(ctx: &RenderCtx, buf: &mut CommandBuf, ramp: &ColorRamp, full: bool) {
    let geo = ctx.geo;
    let dome_rows = if full { 6u32 } else { 4 };

    for row in 0..dome_rows {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let mut x = (left - 0.5).floor();
        while x < right + 0.5 {
            let shade = if x < left + 2.0 {
                ramp.shadow
            } else if x > right - 3.0 {
                ramp.highlight
            } else {
                ramp.base
            };
            buf.cell(x, y, shade);
            x += 1.0;
        }
    }
    // crest line
    buf.rect(geo.head.center_x - 0.5, geo.head.top_y - 1.0, 1.0, 1.0, ramp.highlight, None);

    if full {
        // face guard: cheek plates and an eye slit left open
        let eye_y = geo.anchors.eye_left.y;
        for row in dome_rows..geo.head.rows {
            let (left, right) = geo.head_edges(row);
            let y = geo.head_row_y(row);
            if (y - eye_y).abs() < 1.0 {
                // the slit: only the outer rim
                buf.cell(left.floor(), y, ramp.shadow);
                buf.cell((right - 1.0).floor(), y, ramp.shadow);
                continue;
            }
            let mut x = left.floor();
            while x < right {
                buf.cell(x, y, if x as i64 % 5 == 0 { ramp.shadow } else { ramp.midtone });
                x += 1.0;
            }
        }
        // breath holes
        let m = ctx.geo.anchors.mouth;
        buf.cell_a(m.x - 1.0, m.y, ramp.deep_shadow, 0.9);
        buf.cell_a(m.x + 0.5, m.y, ramp.deep_shadow, 0.9);
    } else {
        // nose guard
        let n = geo.anchors.nose;
        buf.rect(n.x - 0.5, geo.anchors.brow_y, 1.0, n.y - geo.anchors.brow_y, ramp.midtone, None);
    }
}

/// Regional trim color worn on wraps and veils.
fn zone_accent(zone: CulturalZone) -> Rgb {
    match zone {
        CulturalZone::MiddleEastern | CulturalZone::NorthAfrican => Rgb::new(0x1f, 0x4e, 0x5f),
        CulturalZone::SouthAsian => Rgb::new(0x8f, 0x2d, 0x56),
        CulturalZone::CentralAsian => Rgb::new(0x6e, 0x3b, 0x1e),
        CulturalZone::EastAsian | CulturalZone::SoutheastAsian => Rgb::new(0x7a, 0x1f, 0x23),
        CulturalZone::SubSaharan => Rgb::new(0xc2, 0x7b, 0x13),
        CulturalZone::European | CulturalZone::Mediterranean => Rgb::new(0x3d, 0x4a, 0x2f),
    }
}

fn turban(ctx: &RenderCtx, buf: &mut CommandBuf, ramp: &ColorRamp) {
    let geo = ctx.geo;
    let trim = zone_accent(ctx.attrs.zone);
    // one trim band woven through the wrap
    {
        let (left, right) = geo.head_edges(4);
        buf.rect(left - 1.0, geo.head_row_y(4), right - left + 2.0, 1.0, trim, None);
    }
    for row in 0..6u32 {
        if row == 4 {
            continue;
        }
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let mut x = (left - 1.0).floor();
        let mut i = 0i64;
        while x < right + 1.0 {
            // diagonal wrap folds
            let color = if (i + i64::from(row) * 2).rem_euclid(5) == 0 {
                ramp.shadow
            } else if (i + i64::from(row) * 2).rem_euclid(5) == 2 {
                ramp.highlight
            } else {
                ramp.base
            };
            buf.cell(x, y, color);
            x += 1.0;
            i += 1;
        }
    }
    if ctx.attrs.wealth >= WealthLevel::Prosperous {
        // front jewel on the wrap
        buf.cell(geo.head.center_x - 0.5, geo.head_row_y(2), ctx.attrs.palette_accent);
    }
}

fn hood(ctx: &RenderCtx, buf: &mut CommandBuf, ramp: &ColorRamp) {
    let geo = ctx.geo;
    for row in 0..geo.head.rows {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let drape = if row < 3 { 1.5 } else { 2.5 };
        // fabric frames the face, open in front
        for d in 0..(drape as i32 + 1) {
            let off = f64::from(d);
            buf.cell((left - 1.5 - off).floor(), y, if d == 0 { ramp.shadow } else { ramp.base });
            buf.cell((right + 0.5 + off).floor(), y, if d == 0 { ramp.shadow } else { ramp.base });
        }
        if row < 3 {
            let mut x = (left - 0.5).floor();
            while x < right + 0.5 {
                buf.cell(x, y, ramp.base);
                x += 1.0;
            }
        }
    }
}

fn veil(ctx: &RenderCtx, buf: &mut CommandBuf, ramp: &ColorRamp) {
    let geo = ctx.geo;
    // regional trim along the brow edge
    let (left, right) = geo.head_edges(2);
    buf.rect(
        left - 0.5,
        geo.head_row_y(2),
        right - left + 1.0,
        0.5,
        zone_accent(ctx.attrs.zone),
        None,
    );
    for row in 0..(geo.head.rows + 4) {
        let head_row = row.min(geo.head.rows - 1);
        let (left, right) = geo.head_edges(head_row);
        let y = geo.head.top_y + f64::from(row);
        if row < 3 {
            let mut x = (left - 0.5).floor();
            while x < right + 0.5 {
                buf.cell_a(x, y, ramp.base, 0.85);
                x += 1.0;
            }
        } else {
            // translucent fall past the shoulders
            for d in 0..2 {
                let off = f64::from(d);
                buf.cell_a((left - 1.0 - off).floor(), y, ramp.base, 0.6);
                buf.cell_a((right + off).floor(), y, ramp.base, 0.6);
            }
        }
    }
}

fn cap(ctx: &RenderCtx, buf: &mut CommandBuf, ramp: &ColorRamp) {
    let geo = ctx.geo;
    for row in 0..3u32 {
        let (left, right) = geo.head_edges(row);
        let y = geo.head_row_y(row);
        let mut x = (left - 0.5).floor();
        while x < right + 0.5 {
            buf.cell(x, y, if x > right - 3.0 { ramp.highlight } else { ramp.base });
            x += 1.0;
        }
    }
    let (left, right) = geo.head_edges(3);
    let y = geo.head_row_y(3);
    match ctx.attrs.era {
        EraBucket::Renaissance => {
            // brimmed with a feather
            buf.rect(left - 1.5, y, right - left + 3.0, 1.0, ramp.shadow, None);
            buf.cell(right + 1.0, y - 3.0, ctx.attrs.palette_accent);
            buf.cell(right + 1.5, y - 2.0, ctx.attrs.palette_accent);
        }
        EraBucket::Ancient => {
            // band, no brim
            buf.rect(left, y, right - left, 1.0, ramp.shadow, None);
        }
        _ => {
            buf.rect(left - 1.0, y, right - left + 2.0, 1.0, ramp.shadow, None);
        }
    }
}

pub(crate) fn jewelry(ctx: &RenderCtx, buf: &mut CommandBuf) {
    let geo = ctx.geo;

    for piece in &ctx.attrs.jewelry {
        match piece.kind {
            JewelryKind::Earring => {
                for anchor in [geo.anchors.ear_left, geo.anchors.ear_right] {
                    buf.cell(anchor.x - 0.5, anchor.y + 3.0, GOLD);
                }
            }
            JewelryKind::NoseRing => {
                buf.cell_a(geo.anchors.nose.x + 0.8, geo.anchors.nose.y + 0.3, GOLD, 0.9);
            }
            JewelryKind::Pendant => pendant(ctx, buf, GOLD, ctx.attrs.palette_accent),
            JewelryKind::Circlet => {
                let row = 4u32;
                let (left, right) = geo.head_edges(row);
                buf.rect(left, geo.head_row_y(row), right - left, 0.5, GOLD, None);
            }
        }
    }

    // the equipped necklace slot renders as a pendant in its own color
    if let Some(necklace) = ctx.attrs.necklace.as_ref() {
        let metal = item_color(Some(necklace), GOLD);
        pendant(ctx, buf, metal, ctx.attrs.palette_accent);
    }

    if ctx.attrs.accessory.is_some() {
        // brooch at the shoulder line
        let x = geo.head.center_x - geo.body.shoulder * 0.3;
        buf.cell(x.floor(), 36.0, ctx.attrs.palette_accent);
        buf.cell_a(x.floor(), 37.0, ctx.attrs.palette_accent, 0.5);
    }
}

fn pendant(ctx: &RenderCtx, buf: &mut CommandBuf, metal: Rgb, stone: Rgb) {
    let geo = ctx.geo;
    let cx = geo.head.center_x;
    let neck_y = geo.head.top_y + geo.head.height + 3.0;
    // chain
    for d in -2i32..=2 {
        let x = cx + f64::from(d) * 1.2;
        let y = neck_y + if d.abs() == 2 { 0.0 } else { 0.5 };
        buf.cell_a(x.floor(), y, metal, 0.9);
    }
    // stone
    buf.cell(cx - 0.5, neck_y + 2.0, stone);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdornmentEntry, EquippedItems, Item};
    use crate::render::tests::{render_layer, test_attrs};

    fn with_headgear(name: &str) -> crate::resolve::ResolvedAttributes {
        test_attrs(|s| {
            s.equipped_items = Some(EquippedItems {
                head: Some(Item::named(name)),
                ..Default::default()
            });
        })
    }

    #[test]
    fn bare_head_renders_no_headgear() {
        let attrs = test_attrs(|_| {});
        assert!(render_layer(&attrs, headgear).is_empty());
    }

    #[test]
    fn every_category_paints() {
        for name in [
            "golden crown",
            "iron helm",
            "great helm",
            "silk turban",
            "wool hood",
            "linen veil",
            "felt hat",
        ] {
            assert!(!render_layer(&with_headgear(name), headgear).is_empty(), "{name}");
        }
    }

    #[test]
    fn full_helm_covers_the_face_but_not_the_eye_slit() {
        let geo = crate::geometry::GeometrySpec::derive(&with_headgear("great helm"));
        let cmds = render_layer(&with_headgear("great helm"), headgear);
        let eye_y = geo.anchors.eye_left.y;
        // at the slit row only the two rim cells exist
        let slit_cells: Vec<_> = cmds
            .iter()
            .filter(|c| (c.y - eye_y.floor()).abs() < 0.1 && c.width <= 1.0)
            .collect();
        assert!(slit_cells.len() <= 2);
    }

    #[test]
    fn wealthy_crown_carries_more_jewels() {
        let modest = with_headgear("golden crown");
        let wealthy = test_attrs(|s| {
            s.wealth_level = WealthLevel::Wealthy;
            s.equipped_items = Some(EquippedItems {
                head: Some(Item::named("golden crown")),
                ..Default::default()
            });
        });
        assert!(render_layer(&wealthy, headgear).len() > render_layer(&modest, headgear).len());
    }

    #[test]
    fn turban_trim_follows_the_cultural_zone() {
        let wrap = |zone: CulturalZone| {
            test_attrs(|s| {
                s.cultural_zone = zone;
                s.equipped_items = Some(EquippedItems {
                    head: Some(Item::named("silk turban")),
                    ..Default::default()
                });
            })
        };
        assert_ne!(
            render_layer(&wrap(CulturalZone::MiddleEastern), headgear),
            render_layer(&wrap(CulturalZone::EastAsian), headgear)
        );
    }

    #[test]
    fn jewelry_entries_each_paint() {
        let attrs = test_attrs(|s| {
            s.appearance.jewelry = vec![
                AdornmentEntry {
                    kind: "gold earring".to_string(),
                    ..Default::default()
                },
                AdornmentEntry {
                    kind: "amber pendant".to_string(),
                    ..Default::default()
                },
            ];
        });
        let cmds = render_layer(&attrs, jewelry);
        assert!(cmds.iter().any(|c| c.color == GOLD));
        assert!(cmds.len() >= 4);
    }
}

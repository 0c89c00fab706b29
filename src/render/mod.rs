//! Layer renderers and the compositor.
//!
//! Each renderer is pure, confined to one compositing slot, and shares no
//! mutable state with the others. The compositor concatenates their
//! output in a fixed z-order; that order is the contract.

mod adornments;
mod background;
mod body;
mod face;
mod facial_hair;
mod hair;
mod head;
mod overlays;

use crate::{
    color::{self, ColorRamp, Rgb},
    expression::{AnimationPose, Expression},
    foundation::error::VisageResult,
    frame::{CommandBuf, Frame},
    geometry::GeometrySpec,
    model::{CharacterSnapshot, Item, RenderOptions},
    resolve::{self, ResolvedAttributes},
};

/// Read-only inputs shared by every layer renderer.
pub(crate) struct RenderCtx<'a> {
    pub attrs: &'a ResolvedAttributes,
    pub geo: &'a GeometrySpec,
    pub skin: ColorRamp,
    pub hair: ColorRamp,
    pub expr: Expression,
    pub pose: AnimationPose,
}

/// Resolves a catalog item to a paint color: explicit color first, then a
/// material guess, then the caller's fallback.
pub(crate) fn item_color(item: Option<&Item>, fallback: Rgb) -> Rgb {
    let Some(item) = item else {
        return fallback;
    };
    if let Some(c) = item.color.as_deref() {
        return color::resolve_color(c, fallback);
    }
    let Some(material) = item.material.as_deref() else {
        return fallback;
    };
    let m = material.trim().to_ascii_lowercase();
    let hex = if m.contains("iron") || m.contains("steel") {
        "#9a9fa6"
    } else if m.contains("gold") || m.contains("gilt") {
        "#d4af37"
    } else if m.contains("silver") {
        "#c9c9ce"
    } else if m.contains("leather") {
        "#6b4226"
    } else if m.contains("linen") {
        "#e8e0cc"
    } else if m.contains("wool") {
        "#8a7f6d"
    } else if m.contains("silk") {
        "#b8a9c9"
    } else {
        return fallback;
    };
    Rgb::from_hex(hex).unwrap_or(fallback)
}

/// Renders a portrait end to end: resolve, derive, paint, composite.
#[tracing::instrument(skip(snapshot, options, pose))]
pub fn portrait(
    snapshot: &CharacterSnapshot,
    options: &RenderOptions,
    expression: Option<Expression>,
    pose: &AnimationPose,
) -> VisageResult<Frame> {
    let attrs = resolve::resolve(snapshot, options)?;
    render_resolved(&attrs, options, expression, pose)
}

/// Renders from already-resolved attributes, for callers that memoize the
/// resolution step (see [`crate::fingerprint`]).
pub fn render_resolved(
    attrs: &ResolvedAttributes,
    options: &RenderOptions,
    expression: Option<Expression>,
    pose: &AnimationPose,
) -> VisageResult<Frame> {
    options.validate()?;

    let pose = if options.static_mode {
        AnimationPose::default()
    } else {
        *pose
    };
    let expr = expression
        .or(pose.idle_expression)
        .unwrap_or_default();

    let geo = GeometrySpec::derive(attrs);
    let ctx = RenderCtx {
        attrs,
        geo: &geo,
        skin: ColorRamp::derive(attrs.skin),
        hair: ColorRamp::derive(attrs.hair_color),
        expr,
        pose,
    };

    // Fixed z-order; later layers paint over earlier ones.
    let mut buf = CommandBuf::new();
    body::render(&ctx, &mut buf);
    head::render(&ctx, &mut buf);
    hair::render(&ctx, &mut buf);
    face::render(&ctx, &mut buf);
    facial_hair::render(&ctx, &mut buf);
    overlays::symptoms(&ctx, &mut buf);
    overlays::eyewear(&ctx, &mut buf);
    overlays::markings(&ctx, &mut buf);
    adornments::headgear(&ctx, &mut buf);
    adornments::jewelry(&ctx, &mut buf);

    Ok(Frame {
        background: background::background(attrs),
        commands: buf.into_commands(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::frame::DrawCommand;
    use crate::model::{
        AppearanceDescriptor, CulturalZone, Gender, Stats, WealthLevel,
    };

    pub(crate) fn test_snapshot() -> CharacterSnapshot {
        CharacterSnapshot {
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
        }
    }

    pub(crate) fn test_attrs(
        f: impl FnOnce(&mut CharacterSnapshot),
    ) -> ResolvedAttributes {
        let mut snap = test_snapshot();
        f(&mut snap);
        resolve::resolve(&snap, &RenderOptions::default()).unwrap()
    }

    pub(crate) fn ctx_pieces(
        attrs: &ResolvedAttributes,
    ) -> (GeometrySpec, ColorRamp, ColorRamp) {
        (
            GeometrySpec::derive(attrs),
            ColorRamp::derive(attrs.skin),
            ColorRamp::derive(attrs.hair_color),
        )
    }

    pub(crate) fn render_layer(
        attrs: &ResolvedAttributes,
        layer: impl Fn(&RenderCtx, &mut CommandBuf),
    ) -> Vec<DrawCommand> {
        render_layer_with(attrs, Expression::Neutral, AnimationPose::default(), layer)
    }

    pub(crate) fn render_layer_with(
        attrs: &ResolvedAttributes,
        expr: Expression,
        pose: AnimationPose,
        layer: impl Fn(&RenderCtx, &mut CommandBuf),
    ) -> Vec<DrawCommand> {
        let (geo, skin, hair) = ctx_pieces(attrs);
        let ctx = RenderCtx {
            attrs,
            geo: &geo,
            skin,
            hair,
            expr,
            pose,
        };
        let mut buf = CommandBuf::new();
        layer(&ctx, &mut buf);
        buf.into_commands()
    }

    #[test]
    fn portrait_is_deterministic() {
        let snap = test_snapshot();
        let opts = RenderOptions::default();
        let pose = AnimationPose::default();
        let a = portrait(&snap, &opts, None, &pose).unwrap();
        let b = portrait(&snap, &opts, None, &pose).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn static_mode_ignores_the_pose() {
        let snap = test_snapshot();
        let opts = RenderOptions {
            static_mode: true,
            ..RenderOptions::default()
        };
        let blinking = AnimationPose {
            blink: 1.0,
            ..AnimationPose::default()
        };
        let a = portrait(&snap, &opts, None, &AnimationPose::default()).unwrap();
        let b = portrait(&snap, &opts, None, &blinking).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn idle_expression_applies_when_no_override() {
        let snap = test_snapshot();
        let opts = RenderOptions::default();
        let idle = AnimationPose {
            idle_expression: Some(Expression::Surprise),
            ..AnimationPose::default()
        };
        let idle_frame = portrait(&snap, &opts, None, &idle).unwrap();
        let overridden = portrait(&snap, &opts, Some(Expression::Neutral), &idle).unwrap();
        assert_ne!(idle_frame, overridden);
    }

    #[test]
    fn body_paints_before_head_and_headgear_after_hair() {
        // z-order sanity: the first command belongs to the body band and
        // a crowned character's last commands sit in the headgear rows.
        let mut snap = test_snapshot();
        snap.equipped_items = Some(crate::model::EquippedItems {
            head: Some(Item::named("golden crown")),
            ..Default::default()
        });
        let frame = portrait(&snap, &RenderOptions::default(), None, &AnimationPose::default())
            .unwrap();
        assert!(frame.commands.first().unwrap().y >= 29.0);
        let gold = Rgb::new(0xd4, 0xaf, 0x37);
        let last_gold = frame
            .commands
            .iter()
            .rposition(|c| c.color == gold)
            .unwrap();
        let first_skin = frame
            .commands
            .iter()
            .position(|c| c.y < 29.0)
            .unwrap();
        assert!(last_gold > first_skin);
    }

    #[test]
    fn all_commands_are_in_bounds() {
        let frame = portrait(
            &test_snapshot(),
            &RenderOptions::default(),
            None,
            &AnimationPose::default(),
        )
        .unwrap();
        for c in &frame.commands {
            assert!(c.x >= crate::frame::MIN_EXTENT);
            assert!(c.y >= crate::frame::MIN_EXTENT);
            assert!(c.x + c.width <= crate::frame::MAX_EXTENT);
            assert!(c.y + c.height <= crate::frame::MAX_EXTENT);
            assert!(c.width > 0.0 && c.height > 0.0);
        }
    }

    #[test]
    fn item_color_prefers_explicit_then_material() {
        let explicit = Item {
            name: "cloak".to_string(),
            material: Some("wool".to_string()),
            color: Some("#112233".to_string()),
        };
        assert_eq!(
            item_color(Some(&explicit), Rgb::new(0, 0, 0)),
            Rgb::from_hex("#112233").unwrap()
        );
        let material = Item {
            name: "helm".to_string(),
            material: Some("steel".to_string()),
            color: None,
        };
        assert_eq!(
            item_color(Some(&material), Rgb::new(0, 0, 0)),
            Rgb::from_hex("#9a9fa6").unwrap()
        );
        assert_eq!(item_color(None, Rgb::new(7, 7, 7)), Rgb::new(7, 7, 7));
    }
}

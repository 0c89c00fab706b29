//! Background gradient selection.

use crate::{
    color::Rgb,
    frame::{BackgroundSpec, GradientStop},
    model::{CulturalZone, Gender, WealthLevel},
    resolve::{EraBucket, ResolvedAttributes},
};

const TEXTURE_OPACITY: f64 = 0.06;
const TEXTURE_OPACITY_RICH: f64 = 0.10;

/// Base hue per cultural zone; eras shift warmth, gender nudges value.
fn zone_base(zone: CulturalZone) -> Rgb {
    match zone {
        CulturalZone::European => Rgb::new(0x5a, 0x6b, 0x7e),
        CulturalZone::Mediterranean => Rgb::new(0x4f, 0x76, 0x82),
        CulturalZone::MiddleEastern => Rgb::new(0x8a, 0x6d, 0x4a),
        CulturalZone::NorthAfrican => Rgb::new(0x9c, 0x7a, 0x4e),
        CulturalZone::SubSaharan => Rgb::new(0x7d, 0x5a, 0x3c),
        CulturalZone::CentralAsian => Rgb::new(0x6b, 0x6f, 0x5a),
        CulturalZone::SouthAsian => Rgb::new(0x7e, 0x5d, 0x6b),
        CulturalZone::EastAsian => Rgb::new(0x54, 0x64, 0x6e),
        CulturalZone::SoutheastAsian => Rgb::new(0x4e, 0x6e, 0x5d),
    }
}

fn era_shift(era: EraBucket) -> (i16, i16, i16) {
    match era {
        EraBucket::Ancient => (10, 6, -6),
        EraBucket::Medieval => (0, 0, 0),
        EraBucket::Renaissance => (8, 2, 4),
        EraBucket::EarlyModern => (-4, -2, 6),
        EraBucket::Modern => (-8, -8, -4),
    }
}

pub(crate) fn background(attrs: &ResolvedAttributes) -> BackgroundSpec {
    let (dr, dg, db) = era_shift(attrs.era);
    let mut base = zone_base(attrs.zone).shifted(dr, dg, db);
    if attrs.gender == Gender::Female {
        base = base.scaled(1.05);
    }

    let rich = attrs.wealth >= WealthLevel::Prosperous;
    let top = base.scaled(1.18);
    let bottom = base.scaled(0.72);

    let gradient_stops = if rich {
        // Richer variant: a lifted center band and a vignette foot.
        vec![
            GradientStop {
                offset: 0.0,
                color: top.shifted(12, 8, 0),
            },
            GradientStop {
                offset: 0.45,
                color: base.scaled(1.08),
            },
            GradientStop {
                offset: 0.8,
                color: base.scaled(0.9),
            },
            GradientStop {
                offset: 1.0,
                color: bottom.scaled(0.85),
            },
        ]
    } else {
        vec![
            GradientStop { offset: 0.0, color: top },
            GradientStop {
                offset: 1.0,
                color: bottom,
            },
        ]
    };

    BackgroundSpec {
        gradient_stops,
        texture_opacity: if rich {
            TEXTURE_OPACITY_RICH
        } else {
            TEXTURE_OPACITY
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::test_attrs;

    #[test]
    fn modest_background_has_two_stops() {
        let attrs = test_attrs(|_| {});
        let bg = background(&attrs);
        assert_eq!(bg.gradient_stops.len(), 2);
        assert_eq!(bg.gradient_stops[0].offset, 0.0);
        assert_eq!(bg.gradient_stops.last().unwrap().offset, 1.0);
    }

    #[test]
    fn wealthy_background_is_richer() {
        let attrs = test_attrs(|s| s.wealth_level = WealthLevel::Wealthy);
        let bg = background(&attrs);
        assert!(bg.gradient_stops.len() >= 3);
        assert!(bg.texture_opacity > TEXTURE_OPACITY);
    }

    #[test]
    fn zones_differ() {
        let a = background(&test_attrs(|s| {
            s.cultural_zone = CulturalZone::European;
        }));
        let b = background(&test_attrs(|s| {
            s.cultural_zone = CulturalZone::SubSaharan;
        }));
        assert_ne!(a.gradient_stops[0].color, b.gradient_stops[0].color);
    }
}

//! Attribute resolution.
//!
//! Turns a raw [`CharacterSnapshot`] into the fully-defaulted,
//! equipment-overridden, text-parsed view every renderer consumes. All
//! free-text dispatch (hairstyle, garment family, headgear buckets,
//! adornment kinds) happens exactly once here; renderers branch on closed
//! enums and never re-run substring search.

use crate::{
    color::{self, Rgb},
    foundation::error::VisageResult,
    foundation::math::Fnv1a64,
    model::{
        AdornmentEntry, Build, CharacterSnapshot, Cheekbones, CulturalZone, DiseaseKind, EyeShape,
        FaceShape, FacialHairStyle, Gender, GlassesStyle, HairLength, HairTexture, Item, Jawline,
        LipShape, NoseShape, RenderOptions, SeverityTier, SkinTexture, Stats, WealthLevel,
    },
    rng::{self, offsets},
};

pub const AGE_YOUNG_BELOW: u32 = 25;
pub const AGE_OLD_FROM: u32 = 60;

const WRINKLES_CHANCE: f64 = 0.8;
const GRAY_HAIR_CHANCE: f64 = 0.75;
const AGE_SPOTS_CHANCE: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Young,
    Adult,
    Old,
}

impl AgeGroup {
    pub fn from_age(age: u32) -> Self {
        if age < AGE_YOUNG_BELOW {
            AgeGroup::Young
        } else if age >= AGE_OLD_FROM {
            AgeGroup::Old
        } else {
            AgeGroup::Adult
        }
    }
}

/// The closed hairstyle set the hair renderer recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HairStyle {
    None,
    Simple,
    Flowing,
    Afro,
    Locs,
    Braided,
    BraidedCrown,
    BraidedBun,
    Bun,
    Ponytail,
    Topknot,
    Mohawk,
    Pageboy,
    Bowl,
    RenaissanceRolls,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ParsedHairstyle {
    pub length: HairLength,
    pub texture: HairTexture,
    pub style: HairStyle,
}

/// Parses free-text hairstyle into `{length, style, texture}`.
///
/// Keyword detection for texture and length is independent; explicit
/// appearance fields are the fallback, then "medium". Unmatched style text
/// reads as flowing hair when there is enough length to flow, simple
/// otherwise.
pub fn parse_hairstyle(
    text: &str,
    explicit_texture: Option<HairTexture>,
    explicit_length: Option<HairLength>,
) -> ParsedHairstyle {
    let text = text.trim().to_ascii_lowercase();
    let fallback_texture = explicit_texture.unwrap_or_default();
    let fallback_length = explicit_length.unwrap_or_default();

    if text.is_empty() {
        return ParsedHairstyle {
            length: fallback_length,
            texture: fallback_texture,
            style: HairStyle::Simple,
        };
    }
    if text.contains("bald") {
        return ParsedHairstyle {
            length: HairLength::Bald,
            texture: fallback_texture,
            style: HairStyle::None,
        };
    }

    let texture = detect_texture(&text).unwrap_or(fallback_texture);
    let length = detect_length(&text).unwrap_or(fallback_length);
    let style = detect_style(&text).unwrap_or(if length >= HairLength::Medium {
        HairStyle::Flowing
    } else {
        HairStyle::Simple
    });

    ParsedHairstyle {
        length,
        texture,
        style,
    }
}

fn detect_texture(text: &str) -> Option<HairTexture> {
    if text.contains("coily") {
        Some(HairTexture::Coily)
    } else if text.contains("kinky") {
        Some(HairTexture::Kinky)
    } else if text.contains("curl") {
        Some(HairTexture::Curly)
    } else if text.contains("wavy") || text.contains("wave") {
        Some(HairTexture::Wavy)
    } else if text.contains("straight") {
        Some(HairTexture::Straight)
    } else {
        None
    }
}

fn detect_length(text: &str) -> Option<HairLength> {
    // Compound phrases first so "very short" does not read as "short".
    if text.contains("very short") || text.contains("cropped") || text.contains("buzz") {
        Some(HairLength::VeryShort)
    } else if text.contains("very long") || text.contains("waist") {
        Some(HairLength::VeryLong)
    } else if text.contains("shoulder") {
        Some(HairLength::Medium)
    } else if text.contains("short") {
        Some(HairLength::Short)
    } else if text.contains("long") {
        Some(HairLength::Long)
    } else if text.contains("medium") {
        Some(HairLength::Medium)
    } else {
        None
    }
}

fn detect_style(text: &str) -> Option<HairStyle> {
    // Longest phrases first; "braided crown" must not read as "braided".
    if text.contains("renaissance roll") {
        Some(HairStyle::RenaissanceRolls)
    } else if text.contains("braided crown") || text.contains("crown braid") {
        Some(HairStyle::BraidedCrown)
    } else if text.contains("braided bun") {
        Some(HairStyle::BraidedBun)
    } else if text.contains("afro") {
        Some(HairStyle::Afro)
    } else if text.contains("dread") || text.contains("locs") {
        Some(HairStyle::Locs)
    } else if text.contains("braid") || text.contains("plait") {
        Some(HairStyle::Braided)
    } else if text.contains("ponytail") || text.contains("pony tail") {
        Some(HairStyle::Ponytail)
    } else if text.contains("topknot") || text.contains("top knot") {
        Some(HairStyle::Topknot)
    } else if text.contains("bun") {
        Some(HairStyle::Bun)
    } else if text.contains("mohawk") {
        Some(HairStyle::Mohawk)
    } else if text.contains("pageboy") || text.contains("page boy") {
        Some(HairStyle::Pageboy)
    } else if text.contains("bowl") {
        Some(HairStyle::Bowl)
    } else {
        None
    }
}

/// Garment families the body renderer paints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentFamily {
    #[default]
    Plain,
    TankTop,
    TShirt,
    Tunic,
    Robe,
    Dress,
    Hoodie,
    BusinessSuit,
    PlateArmor,
    ChainArmor,
    LeatherArmor,
}

impl GarmentFamily {
    /// Case-insensitive substring detection on the item name. Unmatched
    /// names degrade to `Plain`.
    pub fn detect(name: &str) -> Self {
        let n = name.trim().to_ascii_lowercase();
        if n.contains("tank") {
            GarmentFamily::TankTop
        } else if n.contains("t-shirt") || n.contains("tshirt") || n.contains("tee ") || n == "tee" {
            GarmentFamily::TShirt
        } else if n.contains("hoodie") {
            GarmentFamily::Hoodie
        } else if n.contains("suit") {
            GarmentFamily::BusinessSuit
        } else if n.contains("robe") {
            GarmentFamily::Robe
        } else if n.contains("dress") || n.contains("gown") {
            GarmentFamily::Dress
        } else if n.contains("plate") {
            GarmentFamily::PlateArmor
        } else if n.contains("chain") || n.contains("mail") || n.contains("hauberk") {
            GarmentFamily::ChainArmor
        } else if n.contains("brigandine") || n.contains("jerkin") || n.contains("leather") {
            GarmentFamily::LeatherArmor
        } else if n.contains("armor") || n.contains("armour") {
            GarmentFamily::PlateArmor
        } else if n.contains("tunic") {
            GarmentFamily::Tunic
        } else {
            GarmentFamily::Plain
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadgearCategory {
    #[default]
    None,
    Crown,
    Helm,
    FullHelm,
    Turban,
    Hood,
    Veil,
    Cap,
}

/// Which head regions a headgear item occludes, and how many top rows of
/// hair/head painting it suppresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct HeadgearCoverage {
    pub rows: u32,
    pub top: bool,
    pub sides: bool,
    pub front: bool,
    pub back: bool,
}

impl HeadgearCategory {
    pub fn detect(item: Option<&Item>) -> Self {
        let Some(item) = item else {
            return HeadgearCategory::None;
        };
        if item.is_none() {
            return HeadgearCategory::None;
        }
        let n = item.name.trim().to_ascii_lowercase();
        if n.contains("crown") || n.contains("diadem") || n.contains("tiara") {
            HeadgearCategory::Crown
        } else if n.contains("turban") {
            HeadgearCategory::Turban
        } else if (n.contains("helm") || n.contains("helmet"))
            && (n.contains("full") || n.contains("great") || n.contains("closed") || n.contains("bascinet"))
        {
            HeadgearCategory::FullHelm
        } else if n.contains("bascinet") {
            HeadgearCategory::FullHelm
        } else if n.contains("helm") || n.contains("helmet") {
            HeadgearCategory::Helm
        } else if n.contains("hood") || n.contains("cowl") {
            HeadgearCategory::Hood
        } else if n.contains("veil") || n.contains("wimple") {
            HeadgearCategory::Veil
        } else {
            // hats, caps, coifs, anything else worn on the head
            HeadgearCategory::Cap
        }
    }

    /// Crowns sit above the hairline; full helms and turbans swallow it.
    pub fn coverage(self) -> HeadgearCoverage {
        match self {
            HeadgearCategory::None => HeadgearCoverage::default(),
            HeadgearCategory::Crown => HeadgearCoverage {
                rows: 0,
                ..HeadgearCoverage::default()
            },
            HeadgearCategory::FullHelm => HeadgearCoverage {
                rows: 3,
                top: true,
                sides: true,
                front: true,
                back: true,
            },
            HeadgearCategory::Turban => HeadgearCoverage {
                rows: 5,
                top: true,
                sides: true,
                front: false,
                back: true,
            },
            HeadgearCategory::Hood => HeadgearCoverage {
                rows: 2,
                top: true,
                sides: true,
                front: false,
                back: true,
            },
            HeadgearCategory::Veil => HeadgearCoverage {
                rows: 2,
                top: true,
                sides: true,
                front: false,
                back: true,
            },
            HeadgearCategory::Helm | HeadgearCategory::Cap => HeadgearCoverage {
                rows: 2,
                top: true,
                sides: false,
                front: false,
                back: false,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JewelryKind {
    Earring,
    NoseRing,
    #[default]
    Pendant,
    Circlet,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingKind {
    Scar,
    Tattoo,
    #[default]
    Birthmark,
    Mole,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingPattern {
    #[default]
    Line,
    Cross,
    Dots,
    Patch,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdornmentLocation {
    Forehead,
    #[default]
    LeftCheek,
    RightCheek,
    Chin,
    Neck,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct JewelryPiece {
    pub kind: JewelryKind,
    pub location: AdornmentLocation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Marking {
    pub kind: MarkingKind,
    pub pattern: MarkingPattern,
    pub location: AdornmentLocation,
}

fn resolve_jewelry(entry: &AdornmentEntry) -> JewelryPiece {
    let k = entry.kind.trim().to_ascii_lowercase();
    let kind = if k.contains("earring") || k.contains("ear ") {
        JewelryKind::Earring
    } else if k.contains("nose") {
        JewelryKind::NoseRing
    } else if k.contains("circlet") || k.contains("diadem") {
        JewelryKind::Circlet
    } else {
        JewelryKind::Pendant
    };
    let location = entry
        .location
        .as_deref()
        .and_then(parse_location)
        .unwrap_or(match kind {
            JewelryKind::Earring => AdornmentLocation::LeftCheek,
            JewelryKind::NoseRing => AdornmentLocation::Chin,
            JewelryKind::Pendant => AdornmentLocation::Neck,
            JewelryKind::Circlet => AdornmentLocation::Forehead,
        });
    JewelryPiece { kind, location }
}

fn resolve_marking(entry: &AdornmentEntry) -> Marking {
    let k = entry.kind.trim().to_ascii_lowercase();
    let kind = if k.contains("scar") {
        MarkingKind::Scar
    } else if k.contains("tattoo") {
        MarkingKind::Tattoo
    } else if k.contains("mole") {
        MarkingKind::Mole
    } else {
        MarkingKind::Birthmark
    };
    let pattern = entry
        .pattern
        .as_deref()
        .and_then(|p| {
            let p = p.trim().to_ascii_lowercase();
            if p.contains("cross") {
                Some(MarkingPattern::Cross)
            } else if p.contains("dot") {
                Some(MarkingPattern::Dots)
            } else if p.contains("patch") {
                Some(MarkingPattern::Patch)
            } else if p.contains("line") {
                Some(MarkingPattern::Line)
            } else {
                None
            }
        })
        .unwrap_or(match kind {
            MarkingKind::Scar => MarkingPattern::Line,
            MarkingKind::Tattoo => MarkingPattern::Cross,
            MarkingKind::Birthmark => MarkingPattern::Patch,
            MarkingKind::Mole => MarkingPattern::Dots,
        });
    let location = entry
        .location
        .as_deref()
        .and_then(parse_location)
        .unwrap_or_default();
    Marking {
        kind,
        pattern,
        location,
    }
}

fn parse_location(s: &str) -> Option<AdornmentLocation> {
    let s = s.trim().to_ascii_lowercase();
    if s.contains("forehead") || s.contains("brow") {
        Some(AdornmentLocation::Forehead)
    } else if s.contains("left") {
        Some(AdornmentLocation::LeftCheek)
    } else if s.contains("right") {
        Some(AdornmentLocation::RightCheek)
    } else if s.contains("chin") || s.contains("jaw") {
        Some(AdornmentLocation::Chin)
    } else if s.contains("neck") {
        Some(AdornmentLocation::Neck)
    } else {
        None
    }
}

/// Historical era buckets; free-text tags normalize here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraBucket {
    Ancient,
    #[default]
    Medieval,
    Renaissance,
    EarlyModern,
    Modern,
}

impl EraBucket {
    pub fn from_tag(tag: &str) -> Self {
        let t = tag.trim().to_ascii_lowercase();
        if t.contains("ancient") || t.contains("classical") || t.contains("antiquity") {
            EraBucket::Ancient
        } else if t.contains("renaissance") {
            EraBucket::Renaissance
        } else if t.contains("early") && t.contains("modern") {
            EraBucket::EarlyModern
        } else if t.contains("modern") || t.contains("industrial") {
            EraBucket::Modern
        } else {
            // medieval is the simulation's home era and the generic bucket
            EraBucket::Medieval
        }
    }
}

/// Fully-defaulted, equipment-overridden, text-parsed view of one
/// character. Pure function of `(snapshot, seed)`; renderers treat it as
/// read-only.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedAttributes {
    pub seed: u64,
    pub gender: Gender,
    pub age: u32,
    pub age_group: AgeGroup,
    pub stats: Stats,
    pub build: Build,
    pub height: Option<f64>,

    pub skin: Rgb,
    pub hair_color: Rgb,
    pub eye_color: Rgb,
    pub lip_color: Rgb,
    pub palette_primary: Rgb,
    pub palette_secondary: Rgb,
    pub palette_accent: Rgb,

    pub face_shape: FaceShape,
    pub eye_shape: EyeShape,
    pub nose_shape: NoseShape,
    pub cheekbones: Cheekbones,
    pub jawline: Jawline,
    pub skin_texture: SkinTexture,
    pub lip_shape: LipShape,

    pub hair: ParsedHairstyle,
    pub facial_hair: FacialHairStyle,
    pub facial_hair_thickness: f64,

    pub garment: Option<Item>,
    pub garment_family: GarmentFamily,
    pub cloak: Option<Item>,
    pub headgear: Option<Item>,
    pub headgear_category: HeadgearCategory,
    pub coverage: HeadgearCoverage,
    pub necklace: Option<Item>,
    pub accessory: Option<Item>,

    pub has_glasses: bool,
    pub glasses_style: GlassesStyle,
    pub jewelry: Vec<JewelryPiece>,
    pub markings: Vec<Marking>,

    pub wealth: WealthLevel,
    pub era: EraBucket,
    pub zone: CulturalZone,

    pub diseases: Vec<DiseaseKind>,
    pub severity: SeverityTier,
    pub health_frac: f64,
    pub fatigue_frac: f64,

    pub wrinkles: bool,
    pub gray_hair: bool,
    pub age_spots: bool,
}

/// Derives the portrait seed: the explicit one when present, otherwise a
/// stable hash of identity-grade appearance fields.
pub fn derive_seed(snapshot: &CharacterSnapshot) -> u64 {
    if let Some(seed) = snapshot.portrait_seed {
        return seed;
    }
    let mut h = Fnv1a64::new_default();
    h.write_u8(match snapshot.gender {
        Gender::Male => 0,
        Gender::Female => 1,
    });
    h.write_u8(snapshot.cultural_zone as u8);
    for s in [
        &snapshot.appearance.skin_color,
        &snapshot.appearance.hair_color,
        &snapshot.appearance.eye_color,
        &snapshot.appearance.hairstyle,
    ] {
        h.write_bytes(s.as_bytes());
        h.write_u8(0);
    }
    h.finish()
}

#[tracing::instrument(skip(snapshot, options))]
pub fn resolve(
    snapshot: &CharacterSnapshot,
    options: &RenderOptions,
) -> VisageResult<ResolvedAttributes> {
    snapshot.validate()?;
    options.validate()?;

    let app = &snapshot.appearance;
    let seed = derive_seed(snapshot);
    let age_group = AgeGroup::from_age(snapshot.age);

    let palette_primary = color::resolve_color(&app.palette.primary, Rgb::new(0x6b, 0x7a, 0x8f));
    let palette_secondary =
        color::resolve_color(&app.palette.secondary, Rgb::new(0x8f, 0x6e, 0x56));
    let palette_accent = color::resolve_color(&app.palette.accent, Rgb::new(0xb0, 0x8d, 0x2e));

    let diseases = snapshot
        .disease_state
        .as_ref()
        .map(|d| d.diseases.clone())
        .unwrap_or_default();
    let severity = snapshot
        .disease_state
        .as_ref()
        .map(|d| d.severity)
        .unwrap_or_default();

    let skin_base = color::resolve_color(&app.skin_color, palette_primary);
    let skin = color::retint_skin(skin_base, &diseases);
    let eye_color = color::resolve_color(&app.eye_color, palette_primary);

    let old = age_group == AgeGroup::Old;
    let wrinkles = old && rng::chance(seed, offsets::WRINKLES, WRINKLES_CHANCE);
    let gray_hair = old && rng::chance(seed, offsets::GRAY_HAIR, GRAY_HAIR_CHANCE);
    let age_spots = old && rng::chance(seed, offsets::AGE_SPOTS, AGE_SPOTS_CHANCE);

    let hair_base = color::resolve_color(&app.hair_color, palette_secondary);
    let hair_color = if gray_hair {
        hair_base.mixed(Rgb::new(0xc9, 0xc9, 0xce), 0.7)
    } else {
        hair_base
    };

    let lip_color = app
        .lip_color
        .as_deref()
        .map(|c| color::resolve_color(c, skin))
        .unwrap_or_else(|| skin.scaled(0.82).shifted(14, -4, -2));

    let hair = parse_hairstyle(&app.hairstyle, app.hair_texture, app.hair_length);

    let facial_hair = if app.facial_hair {
        app.facial_hair_style.unwrap_or(FacialHairStyle::ShortBeard)
    } else {
        FacialHairStyle::CleanShaven
    };
    let facial_hair_thickness = app
        .facial_hair_thickness
        .map(|t| t.clamp(0.0, 1.0))
        .unwrap_or(0.7);

    // Equipment override: a present map wins slot-by-slot; an empty slot
    // in a present map means "bare", an absent map falls back to
    // appearance.
    let equipped = options
        .use_equipped_items
        .then_some(snapshot.equipped_items.as_ref())
        .flatten();
    let appearance_garment = (!app.garment.is_none()).then(|| app.garment.clone());
    let appearance_headgear = (!app.headgear.is_none()).then(|| app.headgear.clone());
    let (garment, headgear, cloak, necklace, accessory) = match equipped {
        Some(map) => (
            map.torso.clone().filter(|i| !i.is_none()),
            map.head.clone().filter(|i| !i.is_none()),
            map.cloak.clone().filter(|i| !i.is_none()),
            map.necklace.clone().filter(|i| !i.is_none()),
            map.accessory.clone().filter(|i| !i.is_none()),
        ),
        None => (appearance_garment, appearance_headgear, None, None, None),
    };

    let garment_family = garment
        .as_ref()
        .map(|i| GarmentFamily::detect(&i.name))
        .unwrap_or_default();
    let headgear_category = HeadgearCategory::detect(headgear.as_ref());
    let coverage = headgear_category.coverage();

    let health_frac = (snapshot.health / snapshot.max_health).clamp(0.0, 1.0);
    let fatigue_frac = if snapshot.max_fatigue > 0.0 {
        (snapshot.fatigue / snapshot.max_fatigue).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Ok(ResolvedAttributes {
        seed,
        gender: snapshot.gender,
        age: snapshot.age,
        age_group,
        stats: snapshot.stats,
        build: app.build,
        height: app.height,
        skin,
        hair_color,
        eye_color,
        lip_color,
        palette_primary,
        palette_secondary,
        palette_accent,
        face_shape: app.face_shape.unwrap_or_default(),
        eye_shape: app.eye_shape.unwrap_or_default(),
        nose_shape: app.nose_shape.unwrap_or_default(),
        cheekbones: app.cheekbones.unwrap_or_default(),
        jawline: app.jawline.unwrap_or_default(),
        skin_texture: app.skin_texture.unwrap_or_default(),
        lip_shape: app.lip_shape.unwrap_or_default(),
        hair,
        facial_hair,
        facial_hair_thickness,
        garment,
        garment_family,
        cloak,
        headgear,
        headgear_category,
        coverage,
        necklace,
        accessory,
        has_glasses: app.has_glasses,
        glasses_style: app.glasses_style.unwrap_or_default(),
        jewelry: app.jewelry.iter().map(resolve_jewelry).collect(),
        markings: app.markings.iter().map(resolve_marking).collect(),
        wealth: snapshot.wealth_level,
        era: EraBucket::from_tag(&snapshot.era),
        zone: snapshot.cultural_zone,
        diseases,
        severity,
        health_frac,
        fatigue_frac,
        wrinkles,
        gray_hair,
        age_spots,
    })
}

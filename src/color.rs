//! Color resolution and ramp derivation.
//!
//! Every painted layer shades with a [`ColorRamp`]: a fixed set of
//! brightness/hue derivatives of one base color. Deriving all variants from
//! one triple keeps shading consistent across layers and keeps the output a
//! pure function of the resolved attributes.

use crate::model::DiseaseKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`. Returns `None` for anything else.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        match hex.len() {
            3 => {
                let v = u16::from_str_radix(hex, 16).ok()?;
                let (r, g, b) = ((v >> 8) & 0xF, (v >> 4) & 0xF, v & 0xF);
                Some(Self::new((r * 17) as u8, (g * 17) as u8, (b * 17) as u8))
            }
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel multiply, clamped to the byte range.
    pub fn scaled(self, f: f64) -> Self {
        Self::new(scale(self.r, f), scale(self.g, f), scale(self.b, f))
    }

    /// Per-channel signed shift, clamped.
    pub fn shifted(self, dr: i16, dg: i16, db: i16) -> Self {
        Self::new(shift(self.r, dr), shift(self.g, dg), shift(self.b, db))
    }

    /// Linear blend toward `other` by `t` in [0,1].
    pub fn mixed(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
        };
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s).ok_or_else(|| format!("not a hex color: '{s}'"))
    }
}

fn scale(c: u8, f: f64) -> u8 {
    (f64::from(c) * f).round().clamp(0.0, 255.0) as u8
}

fn shift(c: u8, d: i16) -> u8 {
    (i16::from(c) + d).clamp(0, 255) as u8
}

/// Named colors the appearance catalogs emit. Unrecognized names fall back
/// to the palette primary at the call site.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#1a1a1a"),
    ("raven", "#0f0f14"),
    ("ebony", "#231f20"),
    ("white", "#f5f5f0"),
    ("ivory", "#f2ead6"),
    ("gray", "#8a8a8a"),
    ("grey", "#8a8a8a"),
    ("silver", "#c9c9ce"),
    ("blonde", "#e8c56f"),
    ("blond", "#e8c56f"),
    ("flaxen", "#e3cf9b"),
    ("golden", "#d9a936"),
    ("auburn", "#7a3b1d"),
    ("chestnut", "#6b4226"),
    ("brown", "#6f4e37"),
    ("dark brown", "#4a3424"),
    ("light brown", "#96714f"),
    ("red", "#a52a2a"),
    ("ginger", "#c15c2e"),
    ("copper", "#b3672b"),
    ("hazel", "#8e7618"),
    ("amber", "#c8901a"),
    ("green", "#4d7c43"),
    ("emerald", "#2e8b57"),
    ("blue", "#4a6d9c"),
    ("violet", "#7a5c9e"),
    ("tan", "#c8a47a"),
    ("olive", "#9b8a5c"),
    ("pale", "#ecd8c3"),
    ("fair", "#f4dcc2"),
];

/// Resolves a color description to a concrete triple.
///
/// Hex input passes through, a recognized name maps via the static table,
/// anything else degrades to `fallback`.
pub fn resolve_color(input: &str, fallback: Rgb) -> Rgb {
    let trimmed = input.trim();
    if trimmed.starts_with('#') {
        return Rgb::from_hex(trimmed).unwrap_or(fallback);
    }
    let lower = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .and_then(|(_, hex)| Rgb::from_hex(hex))
        .unwrap_or(fallback)
}

/// Fixed brightness/hue derivatives of one base color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorRamp {
    pub base: Rgb,
    pub shadow: Rgb,
    pub deep_shadow: Rgb,
    pub highlight: Rgb,
    pub bright_highlight: Rgb,
    pub midtone: Rgb,
    pub subsurface: Rgb,
    pub complementary_shadow: Rgb,
}

const SHADOW_SCALE: f64 = 0.72;
const DEEP_SHADOW_SCALE: f64 = 0.52;
const HIGHLIGHT_SCALE: f64 = 1.22;
const BRIGHT_HIGHLIGHT_SCALE: f64 = 1.40;
const MIDTONE_SCALE: f64 = 0.88;

impl ColorRamp {
    /// Multiply-and-clamp for the brightness rungs; channel-selective
    /// shifts for subsurface (warm) and complementary shadow (cool) so the
    /// result stays plausible as lighting rather than a hue rotation.
    pub fn derive(base: Rgb) -> Self {
        Self {
            base,
            shadow: base.scaled(SHADOW_SCALE),
            deep_shadow: base.scaled(DEEP_SHADOW_SCALE),
            highlight: base.scaled(HIGHLIGHT_SCALE),
            bright_highlight: base.scaled(BRIGHT_HIGHLIGHT_SCALE),
            midtone: base.scaled(MIDTONE_SCALE),
            subsurface: base.scaled(1.04).shifted(10, -2, -8),
            complementary_shadow: base.scaled(0.68).shifted(-8, 0, 14),
        }
    }
}

/// Per-disease skin retint, applied to the base skin color before ramp
/// derivation. Tuned against the simulation's disease art direction.
const SMALLPOX_DELTA: (i16, i16, i16) = (-18, -24, -20);
const PLAGUE_DELTA: (i16, i16, i16) = (-30, -26, -12);
const TUBERCULOSIS_DELTA: (i16, i16, i16) = (-20, -16, -10);
const CHOLERA_DELTA: (i16, i16, i16) = (-24, -18, -4);
const LEPROSY_DELTA: (i16, i16, i16) = (-12, -10, -8);
const FEVER_DELTA: (i16, i16, i16) = (14, -6, -8);

/// Picks the single disease whose retint applies. Most specific first,
/// generic fever last; the order of this chain is the contract.
pub fn dominant_disease(diseases: &[DiseaseKind]) -> Option<DiseaseKind> {
    for kind in [
        DiseaseKind::Smallpox,
        DiseaseKind::Plague,
        DiseaseKind::Tuberculosis,
        DiseaseKind::Cholera,
        DiseaseKind::Leprosy,
        DiseaseKind::Fever,
    ] {
        if diseases.contains(&kind) {
            return Some(kind);
        }
    }
    None
}

pub fn disease_delta(kind: DiseaseKind) -> (i16, i16, i16) {
    match kind {
        DiseaseKind::Smallpox => SMALLPOX_DELTA,
        DiseaseKind::Plague => PLAGUE_DELTA,
        DiseaseKind::Tuberculosis => TUBERCULOSIS_DELTA,
        DiseaseKind::Cholera => CHOLERA_DELTA,
        DiseaseKind::Leprosy => LEPROSY_DELTA,
        DiseaseKind::Fever => FEVER_DELTA,
    }
}

/// Applies at most one disease retint to a skin base color.
pub fn retint_skin(base: Rgb, diseases: &[DiseaseKind]) -> Rgb {
    match dominant_disease(diseases) {
        Some(kind) => {
            let (dr, dg, db) = disease_delta(kind);
            base.shifted(dr, dg, db)
        }
        None => base,
    }
}

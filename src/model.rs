//! Caller-facing data model.
//!
//! A [`CharacterSnapshot`] is immutable and caller-owned; the engine never
//! mutates it. Everything optional has a documented default so a sparse
//! snapshot and a fully spelled-out one resolve identically.

use crate::foundation::error::{VisageError, VisageResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    pub strength: f64,
    pub intelligence: f64,
    pub charisma: f64,
    pub constitution: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            strength: 5.0,
            intelligence: 5.0,
            charisma: 5.0,
            constitution: 5.0,
        }
    }
}

/// Body build, an 8-value scale from the appearance catalogs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Build {
    Gaunt,
    Slim,
    Lean,
    #[default]
    Average,
    Athletic,
    Muscular,
    Stocky,
    Heavy,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceShape {
    #[default]
    Oval,
    Round,
    Square,
    Heart,
    Oblong,
    Diamond,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeShape {
    #[default]
    Almond,
    Round,
    Hooded,
    Narrow,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoseShape {
    #[default]
    Straight,
    Aquiline,
    Button,
    Broad,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cheekbones {
    Low,
    #[default]
    Average,
    High,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Jawline {
    Soft,
    #[default]
    Defined,
    Strong,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HairTexture {
    #[default]
    Straight,
    Wavy,
    Curly,
    Coily,
    Kinky,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HairLength {
    Bald,
    VeryShort,
    Short,
    #[default]
    Medium,
    Long,
    VeryLong,
}

/// The thirteen facial-hair styles the facial-hair renderer recognizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacialHairStyle {
    #[default]
    CleanShaven,
    Stubble,
    Mustache,
    HandlebarMustache,
    Goatee,
    VanDyke,
    CircleBeard,
    ShortBeard,
    FullBeard,
    LongBeard,
    ForkedBeard,
    MuttonChops,
    Sideburns,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinTexture {
    #[default]
    Smooth,
    Freckled,
    Weathered,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LipShape {
    Thin,
    #[default]
    Average,
    Full,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlassesStyle {
    #[default]
    Round,
    Square,
    Monocle,
    Spectacles,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WealthLevel {
    Destitute,
    Poor,
    #[default]
    Modest,
    Prosperous,
    Wealthy,
}

/// The nine cultural zones of the simulated world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CulturalZone {
    #[default]
    European,
    Mediterranean,
    MiddleEastern,
    NorthAfrican,
    SubSaharan,
    CentralAsian,
    SouthAsian,
    EastAsian,
    SoutheastAsian,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseKind {
    Smallpox,
    Plague,
    Tuberculosis,
    Cholera,
    Leprosy,
    Fever,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    #[default]
    Mild,
    Moderate,
    Severe,
}

/// Symptom summary produced by the external disease-severity calculator.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DiseaseState {
    pub diseases: Vec<DiseaseKind>,
    #[serde(default)]
    pub severity: SeverityTier,
}

/// One catalog item: a garment, headgear, or adornment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Item {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
            color: None,
        }
    }

    /// "none"/empty item names mean the slot is bare.
    pub fn is_none(&self) -> bool {
        let n = self.name.trim();
        n.is_empty() || n.eq_ignore_ascii_case("none")
    }
}

/// Equipped-item map. A present map with an empty slot means "bare"; an
/// absent map falls back to appearance.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EquippedItems {
    #[serde(default)]
    pub head: Option<Item>,
    #[serde(default)]
    pub torso: Option<Item>,
    #[serde(default)]
    pub cloak: Option<Item>,
    #[serde(default)]
    pub necklace: Option<Item>,
    #[serde(default)]
    pub accessory: Option<Item>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#6b7a8f".to_string(),
            secondary: "#8f6e56".to_string(),
            accent: "#b08d2e".to_string(),
        }
    }
}

/// One jewelry or marking entry; kind/pattern/location are catalog strings
/// resolved to closed enums during attribute resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AdornmentEntry {
    pub kind: String,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppearanceDescriptor {
    pub skin_color: String,
    pub hair_color: String,
    pub eye_color: String,
    /// Free text from the catalogs, e.g. "long wavy ponytail".
    pub hairstyle: String,
    pub build: Build,
    pub face_shape: Option<FaceShape>,
    pub eye_shape: Option<EyeShape>,
    pub nose_shape: Option<NoseShape>,
    pub cheekbones: Option<Cheekbones>,
    pub jawline: Option<Jawline>,
    pub hair_texture: Option<HairTexture>,
    pub hair_length: Option<HairLength>,
    pub facial_hair: bool,
    pub facial_hair_style: Option<FacialHairStyle>,
    /// 0..1; scales stubble/beard density.
    pub facial_hair_thickness: Option<f64>,
    pub skin_texture: Option<SkinTexture>,
    pub lip_shape: Option<LipShape>,
    pub lip_color: Option<String>,
    /// Optional explicit body height in canvas units; rescales the
    /// vertical profile uniformly.
    pub height: Option<f64>,
    pub garment: Item,
    pub headgear: Item,
    pub palette: Palette,
    pub has_glasses: bool,
    pub glasses_style: Option<GlassesStyle>,
    pub jewelry: Vec<AdornmentEntry>,
    pub markings: Vec<AdornmentEntry>,
}

impl Default for AppearanceDescriptor {
    fn default() -> Self {
        Self {
            skin_color: "#e0b89a".to_string(),
            hair_color: "#6f4e37".to_string(),
            eye_color: "#5d4e37".to_string(),
            hairstyle: "short".to_string(),
            build: Build::Average,
            face_shape: None,
            eye_shape: None,
            nose_shape: None,
            cheekbones: None,
            jawline: None,
            hair_texture: None,
            hair_length: None,
            facial_hair: false,
            facial_hair_style: None,
            facial_hair_thickness: None,
            skin_texture: None,
            lip_shape: None,
            lip_color: None,
            height: None,
            garment: Item::named("simple tunic"),
            headgear: Item::named("none"),
            palette: Palette::default(),
            has_glasses: false,
            glasses_style: None,
            jewelry: Vec::new(),
            markings: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CharacterSnapshot {
    pub age: u32,
    pub gender: Gender,
    #[serde(default = "default_health")]
    pub health: f64,
    #[serde(default = "default_health")]
    pub max_health: f64,
    #[serde(default)]
    pub fatigue: f64,
    #[serde(default = "default_health")]
    pub max_fatigue: f64,
    #[serde(default)]
    pub disease_state: Option<DiseaseState>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub equipped_items: Option<EquippedItems>,
    #[serde(default)]
    pub appearance: AppearanceDescriptor,
    #[serde(default)]
    pub wealth_level: WealthLevel,
    /// Free-text era tag, e.g. "MEDIEVAL"; normalized during resolution.
    #[serde(default)]
    pub era: String,
    #[serde(default)]
    pub cultural_zone: CulturalZone,
    /// Explicit seed; when absent the engine derives one from stable
    /// character fields.
    #[serde(default)]
    pub portrait_seed: Option<u64>,
}

fn default_health() -> f64 {
    100.0
}

impl CharacterSnapshot {
    /// The one hard precondition: a snapshot whose numeric core is not a
    /// usable quantity must fail fast instead of rendering a blank frame.
    pub fn validate(&self) -> VisageResult<()> {
        if !self.health.is_finite() || !self.max_health.is_finite() {
            return Err(VisageError::invalid_input("health must be finite"));
        }
        if self.max_health <= 0.0 {
            return Err(VisageError::invalid_input("max_health must be > 0"));
        }
        if !self.fatigue.is_finite() || !self.max_fatigue.is_finite() {
            return Err(VisageError::invalid_input("fatigue must be finite"));
        }
        let s = &self.stats;
        for v in [s.strength, s.intelligence, s.charisma, s.constitution] {
            if !v.is_finite() {
                return Err(VisageError::invalid_input("stats must be finite"));
            }
        }
        if let Some(h) = self.appearance.height
            && !(h.is_finite() && h > 0.0)
        {
            return Err(VisageError::invalid_input("explicit height must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Logical reference size; the canvas is always 64x64 units and
    /// callers rescale, so this only has to be non-zero.
    pub canvas_size: u32,
    pub use_equipped_items: bool,
    /// Static mode ignores the animation pose (no blink/gaze/idle); used
    /// for list and grid thumbnails.
    pub static_mode: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas_size: 64,
            use_equipped_items: true,
            static_mode: false,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> VisageResult<()> {
        if self.canvas_size == 0 {
            return Err(VisageError::invalid_input("canvas_size must be > 0"));
        }
        Ok(())
    }
}

//! Stable fingerprint of resolved attributes.
//!
//! The engine stays cache-free; callers that want recomputation avoidance
//! key their own cache on this value plus canvas size and the
//! equipped-items flag. Two independent FNV streams keep accidental
//! collisions out of practical reach.

use crate::{color::Rgb, model::Item, resolve::ResolvedAttributes};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttributeFingerprint {
    pub hi: u64,
    pub lo: u64,
}

pub fn fingerprint_attributes(attrs: &ResolvedAttributes) -> AttributeFingerprint {
    let mut a = Fnv1a64::new(0xcbf2_9ce4_8422_2325);
    let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);

    u64p(&mut a, &mut b, attrs.seed);
    u8p(&mut a, &mut b, attrs.gender as u8);
    u64p(&mut a, &mut b, u64::from(attrs.age));
    u8p(&mut a, &mut b, attrs.age_group as u8);
    u8p(&mut a, &mut b, attrs.build as u8);
    for v in [
        attrs.stats.strength,
        attrs.stats.intelligence,
        attrs.stats.charisma,
        attrs.stats.constitution,
        attrs.height.unwrap_or(-1.0),
        attrs.facial_hair_thickness,
        attrs.health_frac,
        attrs.fatigue_frac,
    ] {
        u64p(&mut a, &mut b, v.to_bits());
    }

    for c in [
        attrs.skin,
        attrs.hair_color,
        attrs.eye_color,
        attrs.lip_color,
        attrs.palette_primary,
        attrs.palette_secondary,
        attrs.palette_accent,
    ] {
        write_rgb(&mut a, &mut b, c);
    }

    for v in [
        attrs.face_shape as u8,
        attrs.eye_shape as u8,
        attrs.nose_shape as u8,
        attrs.cheekbones as u8,
        attrs.jawline as u8,
        attrs.skin_texture as u8,
        attrs.lip_shape as u8,
        attrs.hair.length as u8,
        attrs.hair.texture as u8,
        attrs.hair.style as u8,
        attrs.facial_hair as u8,
        attrs.garment_family as u8,
        attrs.headgear_category as u8,
        attrs.glasses_style as u8,
        attrs.wealth as u8,
        attrs.era as u8,
        attrs.zone as u8,
        attrs.severity as u8,
        u8::from(attrs.has_glasses),
        u8::from(attrs.wrinkles),
        u8::from(attrs.gray_hair),
        u8::from(attrs.age_spots),
    ] {
        u8p(&mut a, &mut b, v);
    }

    for item in [
        &attrs.garment,
        &attrs.cloak,
        &attrs.headgear,
        &attrs.necklace,
        &attrs.accessory,
    ] {
        write_item(&mut a, &mut b, item.as_ref());
    }

    u64p(&mut a, &mut b, attrs.diseases.len() as u64);
    for d in &attrs.diseases {
        u8p(&mut a, &mut b, *d as u8);
    }
    u64p(&mut a, &mut b, attrs.jewelry.len() as u64);
    for j in &attrs.jewelry {
        u8p(&mut a, &mut b, j.kind as u8);
        u8p(&mut a, &mut b, j.location as u8);
    }
    u64p(&mut a, &mut b, attrs.markings.len() as u64);
    for m in &attrs.markings {
        u8p(&mut a, &mut b, m.kind as u8);
        u8p(&mut a, &mut b, m.pattern as u8);
        u8p(&mut a, &mut b, m.location as u8);
    }

    AttributeFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn u8p(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn u64p(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_rgb(a: &mut Fnv1a64, b: &mut Fnv1a64, c: Rgb) {
    for v in [c.r, c.g, c.b] {
        a.write_u8(v);
        b.write_u8(v);
    }
}

fn write_item(a: &mut Fnv1a64, b: &mut Fnv1a64, item: Option<&Item>) {
    match item {
        Some(item) => {
            write_str(a, b, &item.name);
            write_str(a, b, item.material.as_deref().unwrap_or(""));
            write_str(a, b, item.color.as_deref().unwrap_or(""));
        }
        None => {
            a.write_u8(0);
            b.write_u8(0);
        }
    }
}

fn write_str(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    a.write_u64(s.len() as u64);
    b.write_u64(s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0000_0100_0000_01B3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RenderOptions;
    use crate::render::tests::test_snapshot;
    use crate::resolve::resolve;

    #[test]
    fn fingerprint_is_deterministic() {
        let attrs = resolve(&test_snapshot(), &RenderOptions::default()).unwrap();
        assert_eq!(fingerprint_attributes(&attrs), fingerprint_attributes(&attrs));
    }

    #[test]
    fn fingerprint_changes_with_appearance() {
        let a = resolve(&test_snapshot(), &RenderOptions::default()).unwrap();
        let mut snap = test_snapshot();
        snap.appearance.hair_color = "auburn".to_string();
        let b = resolve(&snap, &RenderOptions::default()).unwrap();
        assert_ne!(fingerprint_attributes(&a), fingerprint_attributes(&b));
    }

    #[test]
    fn fingerprint_changes_with_seed() {
        let a = resolve(&test_snapshot(), &RenderOptions::default()).unwrap();
        let mut snap = test_snapshot();
        snap.portrait_seed = Some(54321);
        let b = resolve(&snap, &RenderOptions::default()).unwrap();
        assert_ne!(fingerprint_attributes(&a), fingerprint_attributes(&b));
    }
}

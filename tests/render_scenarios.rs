//! End-to-end scenarios over the public API.

use visage::{
    AnimationPose, CharacterSnapshot, Expression, GeometrySpec, RenderOptions, portrait, resolve,
};
use visage::model::{Build, DiseaseKind, DiseaseState, EquippedItems, Gender, Item, SeverityTier};
use visage::resolve::{GarmentFamily, HeadgearCategory};

fn guardsman() -> CharacterSnapshot {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    serde_json::from_str(include_str!("data/guardsman.json")).unwrap()
}

#[test]
fn guardsman_resolves_per_the_documented_scenario() {
    let snap = guardsman();
    let attrs = resolve(&snap, &RenderOptions::default()).unwrap();

    assert_eq!(attrs.garment_family, GarmentFamily::Tunic);
    assert_eq!(attrs.headgear_category, HeadgearCategory::None);
    // headgear "none": no coverage mask suppresses anything
    assert_eq!(attrs.coverage.rows, 0);
    assert!(!attrs.coverage.top && !attrs.coverage.sides);

    // male/average: head width matches the base formula
    let geo = GeometrySpec::derive(&attrs);
    assert_eq!(geo.head.width, visage::geometry::HEAD_BASE_WIDTH);
}

#[test]
fn every_command_stays_inside_the_documented_band() {
    let variations: Vec<CharacterSnapshot> = vec![
        guardsman(),
        {
            let mut s = guardsman();
            s.gender = Gender::Female;
            s.appearance.hairstyle = "very long wavy braided crown".to_string();
            s
        },
        {
            let mut s = guardsman();
            s.age = 70;
            s.appearance.build = Build::Heavy;
            s.appearance.hairstyle = "afro".to_string();
            s.appearance.facial_hair = true;
            s
        },
        {
            let mut s = guardsman();
            s.equipped_items = Some(EquippedItems {
                head: Some(Item::named("silk turban")),
                torso: Some(Item::named("steel plate armor")),
                cloak: Some(Item::named("wool cloak")),
                necklace: Some(Item::named("gold chain")),
                accessory: Some(Item::named("brooch")),
            });
            s
        },
        {
            let mut s = guardsman();
            s.disease_state = Some(DiseaseState {
                diseases: vec![DiseaseKind::Smallpox, DiseaseKind::Fever],
                severity: SeverityTier::Severe,
            });
            s
        },
    ];

    let opts = RenderOptions::default();
    for (i, snap) in variations.iter().enumerate() {
        for expression in [None, Some(Expression::Surprise), Some(Expression::Scowl)] {
            let frame = portrait(snap, &opts, expression, &AnimationPose::default()).unwrap();
            assert!(!frame.commands.is_empty());
            for c in &frame.commands {
                assert!(
                    c.x >= -8.0 && c.x + c.width <= 72.0,
                    "variation {i}: x extent out of band: {c:?}"
                );
                assert!(
                    c.y >= -8.0 && c.y + c.height <= 72.0,
                    "variation {i}: y extent out of band: {c:?}"
                );
                assert!(c.width > 0.0 && c.height > 0.0);
                if let Some(o) = c.opacity {
                    assert!((0.0..=1.0).contains(&o));
                }
            }
        }
    }
}

#[test]
fn background_descriptor_is_well_formed() {
    let frame = portrait(
        &guardsman(),
        &RenderOptions::default(),
        None,
        &AnimationPose::default(),
    )
    .unwrap();
    let stops = &frame.background.gradient_stops;
    assert!((2..=4).contains(&stops.len()));
    assert_eq!(stops.first().unwrap().offset, 0.0);
    assert_eq!(stops.last().unwrap().offset, 1.0);
    for w in stops.windows(2) {
        assert!(w[0].offset < w[1].offset);
    }
    assert!((0.0..=1.0).contains(&frame.background.texture_opacity));
}

#[test]
fn sparse_snapshot_renders_like_the_explicit_default() {
    let sparse: CharacterSnapshot =
        serde_json::from_str(r#"{"age": 30, "gender": "male", "portrait_seed": 7}"#).unwrap();
    let mut explicit = sparse.clone();
    explicit.appearance = visage::AppearanceDescriptor::default();

    let opts = RenderOptions::default();
    let pose = AnimationPose::default();
    assert_eq!(
        portrait(&sparse, &opts, None, &pose).unwrap(),
        portrait(&explicit, &opts, None, &pose).unwrap()
    );
}

#[test]
fn invalid_snapshot_fails_fast() {
    let mut snap = guardsman();
    snap.max_health = 0.0;
    let err = portrait(
        &snap,
        &RenderOptions::default(),
        None,
        &AnimationPose::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid input"));
}

#[test]
fn concurrent_renders_agree() {
    let snap = guardsman();
    let opts = RenderOptions::default();
    let reference = portrait(&snap, &opts, None, &AnimationPose::default()).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let snap = snap.clone();
            std::thread::spawn(move || {
                portrait(&snap, &RenderOptions::default(), None, &AnimationPose::default()).unwrap()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), reference);
    }
}

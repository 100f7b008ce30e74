//! serialization of the scalar types used in font metadata

use super::*;

#[test]
fn metadata_survives_json() {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct FaceSummary {
        tag: Tag,
        glyph: GlyphId,
        name_id: NameId,
        italic_angle: Fixed,
        size: F26Dot6,
        coord: F2Dot14,
        bounds: BoundingBox<i16>,
        origin: Point<f32>,
        table_len: Uint24,
        table_version: MajorMinor,
        post_version: Version16Dot16,
    }

    let summary = FaceSummary {
        tag: Tag::new(b"wght"),
        glyph: GlyphId::new(42),
        name_id: NameId::new(256),
        italic_angle: Fixed::from_f64(-12.5),
        size: F26Dot6::from_f64(14.25),
        coord: F2Dot14::from_f32(-0.5),
        bounds: BoundingBox {
            x_min: -10,
            y_min: -200,
            x_max: 900,
            y_max: 750,
        },
        origin: Point::new(0.5, -3.0),
        table_len: Uint24::new(70_000),
        table_version: MajorMinor::VERSION_1_1,
        post_version: Version16Dot16::VERSION_2_5,
    };

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains(r#""tag":"wght""#));
    let loaded: FaceSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(summary, loaded);
}

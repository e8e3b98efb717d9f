//! End-to-end conversions from parser JSON to mesh records.

use approx::assert_relative_eq;
use glam::DVec3;
use vrml_mesh::{convert_json, ConvertOptions, DiagnosticKind, Geometry, Material, Severity};

fn convert(source: &str) -> vrml_mesh::SceneOutput {
    convert_json(source, &ConvertOptions::default()).expect("conversion succeeds")
}

#[test]
fn box_size_maps_to_half_extents() {
    let scene = convert(r#"{"node": "Shape", "geometry": {"node": "Box", "size": [2, 4, 6]}}"#);
    let mesh = scene.records[0].mesh().unwrap();
    let (min, max) = mesh.bounding_box();
    assert_eq!(min, DVec3::new(-1.0, -2.0, -3.0));
    assert_eq!(max, DVec3::new(1.0, 2.0, 3.0));
}

#[test]
fn quad_face_set_triangulates_into_two() {
    let scene = convert(
        r#"{"node": "Shape", "geometry": {"node": "IndexedFaceSet",
            "coord": {"point": [[0,0,0],[1,0,0],[1,1,0],[0,1,0]]},
            "coordIndex": [0, 1, 2, 3, -1]}}"#,
    );
    let mesh = scene.records[0].mesh().unwrap();
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.vertex_count(), 4);
    // Fan (0,2,1),(0,3,2); welding numbers positions by first use.
    assert_eq!(mesh.triangles(), &[[0, 1, 2], [0, 3, 1]]);
}

#[test]
fn ccw_false_flips_winding() {
    let source = |ccw: bool| {
        format!(
            r#"{{"node": "IndexedFaceSet", "ccw": {ccw},
                "coord": {{"point": [[0,0,0],[1,0,0],[0,1,0]]}},
                "coordIndex": [[0, 1, 2]]}}"#
        )
    };
    let normal = |ccw: bool| convert(&source(ccw)).records[0].mesh().unwrap().vertices()[0].normal;
    assert_eq!(normal(true), -normal(false));
}

#[test]
fn pentagon_and_short_loops() {
    let scene = convert(
        r#"{"node": "IndexedFaceSet",
            "coord": {"point": [[0,0,0],[2,0,0],[3,1,0],[1,2,0],[-1,1,0]]},
            "coordIndex": [0, 1, 2, 3, 4, -1, 0, 1, -1]}"#,
    );
    assert_eq!(scene.records[0].mesh().unwrap().triangle_count(), 3);
    assert!(scene.diagnostics.is_empty());
}

#[test]
fn smooth_cube_corners_stay_hard_below_crease() {
    let cube = |crease: f64| {
        format!(
            r#"{{"node": "IndexedFaceSet", "creaseAngle": {crease},
                "coord": {{"point": [[0,0,0],[1,0,0],[1,1,0],[0,1,0],
                                     [0,0,1],[1,0,1],[1,1,1],[0,1,1]]}},
                "coordIndex": [[0,3,2,1],[4,5,6,7],[0,1,5,4],[2,3,7,6],[1,2,6,5],[0,4,7,3]]}}"#
        )
    };
    let hard = convert(&cube(0.5));
    let soft = convert(&cube(2.0));
    let hard_mesh = hard.records[0].mesh().unwrap();
    let soft_mesh = soft.records[0].mesh().unwrap();
    // Hard edges keep one vertex per face corner; smoothing merges them.
    assert!(hard_mesh.vertex_count() > soft_mesh.vertex_count());
    for v in hard_mesh.vertices().iter().chain(soft_mesh.vertices()) {
        assert_relative_eq!(v.normal.length(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn degenerate_faces_get_up_axis() {
    let scene = convert(
        r#"{"node": "IndexedFaceSet",
            "coord": {"point": [[0,0,0],[1,0,0],[2,0,0],[0,0,1]]},
            "coordIndex": [[0, 1, 2], [0, 3, 1]]}"#,
    );
    let mesh = scene.records[0].mesh().unwrap();
    assert_eq!(mesh.triangle_count(), 2);
    assert!(mesh.vertices().iter().any(|v| v.normal == DVec3::Y));
    assert!(mesh.validate());
}

#[test]
fn alpha_is_one_minus_transparency() {
    let scene = convert(
        r#"{"node": "Shape",
            "appearance": {"node": "Appearance",
                "material": {"node": "Material", "transparency": 0.3,
                             "emissiveColor": [0.1, 0.2, 0.3]}},
            "geometry": {"node": "Sphere"}}"#,
    );
    let material = scene.records[0].material;
    assert_relative_eq!(material.alpha, 0.7, epsilon = 1e-6);
    assert_relative_eq!(material.emissive[2], 0.3, epsilon = 1e-6);
    assert_eq!(material.diffuse, Material::default().diffuse);
}

#[test]
fn bad_box_does_not_stop_good_sphere() {
    let scene = convert(
        r#"[{"node": "Shape", "geometry": {"node": "Box", "size": [0, 1, 1]}},
            {"node": "Shape", "geometry": {"node": "Sphere", "radius": 1}}]"#,
    );
    assert_eq!(scene.records.len(), 1);
    assert_eq!(scene.diagnostics.len(), 1);
    assert_eq!(scene.diagnostics[0].kind, DiagnosticKind::InvalidGeometryParameter);
    assert!(scene.has_errors());
}

#[test]
fn malformed_face_set_is_contained() {
    let scene = convert(
        r#"[{"node": "IndexedFaceSet",
             "coord": {"point": [[0,0,0],[1,0,0],[0,1,0]]},
             "coordIndex": [0, 1, 5]},
            {"node": "Box"}]"#,
    );
    assert_eq!(scene.records.len(), 1);
    assert_eq!(scene.diagnostics[0].kind, DiagnosticKind::MalformedFaceSet);
    assert_eq!(scene.diagnostics[0].severity, Severity::Error);
}

#[test]
fn lights_and_untyped_nodes_warn() {
    let scene = convert(
        r#"[{"node": "PointLight"}, {"node": "Viewpoint"}, {"children": [{"node": "Box"}]}]"#,
    );
    assert_eq!(scene.records.len(), 1);
    assert_eq!(scene.diagnostics.len(), 3);
    assert!(!scene.has_errors());
    assert_eq!(scene.diagnostics[2].kind, DiagnosticKind::UndefinedNodeType);
}

#[test]
fn def_use_across_the_document() {
    let scene = convert(
        r#"[{"node": "Transform", "name": "Left", "translation": [-2, 0, 0],
             "children": [{"node": "Shape", "name": "Pillar",
                           "appearance": {"material": {"node": "Material", "name": "Stone",
                                                       "diffuseColor": [0.5, 0.5, 0.5]}},
                           "geometry": {"node": "Cylinder", "radius": 0.5, "height": 3}}]},
            {"node": "Transform", "translation": [2, 0, 0],
             "children": [{"node": "USE", "name": "Pillar"}]},
            {"node": "Shape",
             "appearance": {"material": {"node": "USE", "name": "Stone"}},
             "geometry": {"node": "Cone"}}]"#,
    );
    assert_eq!(scene.records.len(), 3);
    assert!(scene.diagnostics.is_empty());

    let left = &scene.records[0];
    let right = &scene.records[1];
    assert_eq!(left.geometry, right.geometry);
    assert_eq!(left.world.transform_point3(DVec3::ZERO), DVec3::new(-2.0, 0.0, 0.0));
    assert_eq!(right.world.transform_point3(DVec3::ZERO), DVec3::new(2.0, 0.0, 0.0));
    assert_eq!(scene.records[2].material.diffuse, [0.5, 0.5, 0.5]);
    assert_eq!(scene.registry.len(), 3);
}

#[test]
fn line_and_point_sets() {
    let scene = convert(
        r#"[{"node": "IndexedLineSet",
             "coord": {"point": [[0,0,0],[1,0,0],[1,1,0]]},
             "coordIndex": [0, 1, 2, -1]},
            {"node": "PointSet", "coord": {"point": [[0,0,0],[5,5,5]]}}]"#,
    );
    match &scene.records[0].geometry {
        Geometry::Lines(lines) => assert_eq!(lines.segments.len(), 2),
        other => panic!("expected lines, got {other:?}"),
    }
    match &scene.records[1].geometry {
        Geometry::Points(points) => assert_eq!(points.positions.len(), 2),
        other => panic!("expected points, got {other:?}"),
    }
}

#[test]
fn welding_is_idempotent_on_output() {
    let epsilon = ConvertOptions::default().weld_epsilon;
    let scene = convert(r#"[{"node": "Sphere"}, {"node": "Cone"}, {"node": "Box"}]"#);
    for record in &scene.records {
        let mesh = record.mesh().unwrap();
        assert_eq!(&mesh.reweld(epsilon), mesh);
        assert!(mesh.vertex_count() <= mesh.triangle_count() * 3);
    }
}

#[test]
fn options_from_json() {
    let options: ConvertOptions =
        serde_json::from_str(r#"{"emitUv": false, "segments": 6, "creaseAngle": false}"#).unwrap();
    let scene = convert_json(r#"{"node": "Cylinder"}"#, &options).unwrap();
    let mesh = scene.records[0].mesh().unwrap();
    assert!(!mesh.has_uvs());
    assert_eq!(mesh.triangle_count(), 4 * 6);
}

#[test]
fn output_serializes_to_json() {
    let scene = convert(r#"{"node": "Shape", "name": "Ball", "geometry": {"node": "Sphere"}}"#);
    let json = serde_json::to_value(&scene).unwrap();
    assert_eq!(json["records"][0]["name"], "Ball");
    assert!(json["registry"]["entries"]["Ball"].is_object());
}

#[test]
fn zero_height_cylinder_is_a_disk() {
    let scene = convert(r#"{"node": "Shape", "geometry": {"node": "Cylinder", "height": 0}}"#);
    assert!(scene.diagnostics.is_empty());
    let mesh = scene.records[0].mesh().unwrap();
    assert!(mesh.triangle_count() > 0);
    let (min, max) = mesh.bounding_box();
    assert_eq!(min.y, max.y);
}

#[test]
fn solid_false_marks_record_double_sided() {
    let scene = convert(
        r#"[{"node": "IndexedFaceSet", "solid": false,
             "coord": {"point": [[0,0,0],[1,0,0],[0,1,0]]}, "coordIndex": [0, 1, 2]},
            {"node": "IndexedFaceSet",
             "coord": {"point": [[0,0,0],[1,0,0],[0,1,0]]}, "coordIndex": [0, 1, 2]},
            {"node": "Sphere"}]"#,
    );
    let sides: Vec<bool> = scene.records.iter().map(|r| r.double_sided).collect();
    assert_eq!(sides, vec![true, false, false]);
}

#[test]
fn appearance_def_use() {
    let scene = convert(
        r#"[{"node": "Shape",
             "appearance": {"node": "Appearance", "name": "Look",
                            "material": {"node": "Material", "diffuseColor": [0, 0, 1]}},
             "geometry": {"node": "Box"}},
            {"node": "Shape", "appearance": {"node": "USE", "name": "Look"},
             "geometry": {"node": "Sphere"}},
            {"node": "Shape", "appearance": {"node": "USE", "name": "Nowhere"},
             "geometry": {"node": "Sphere"}}]"#,
    );
    assert_eq!(scene.records.len(), 3);
    assert_eq!(scene.records[1].material.diffuse, [0.0, 0.0, 1.0]);
    assert_eq!(scene.records[2].material, Material::fallback());
    assert_eq!(scene.diagnostics.len(), 1);
    assert_eq!(scene.diagnostics[0].kind, DiagnosticKind::UnresolvedReference);
}

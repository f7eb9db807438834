use chart_digitizer::core::{
    AxisRange, AxisScale, Calibration, CalibrationAnchors, CanvasPoint, CoordinateTransformer,
    Dataset, HexColor, Point, Rgb,
};
use chart_digitizer::io::{PROJECT_FIELDS_V1, Project, ProjectMeta, load_project, save_project};
use chart_digitizer::trace::{AutoTracer, RgbBuffer};
use chart_digitizer::DigitizerError;
use proptest::prelude::*;
use serde_json::{Value, json};

fn sample_project() -> Project {
    let primary = Dataset::new("Signal", "#0072B2")
        .expect("valid color")
        .with_points(vec![Point::new(0.5, 12.25), Point::new(1.5, 40.0)]);
    let secondary = Dataset::new("Ratio", "#e69f00")
        .expect("valid color")
        .with_visible(false)
        .with_secondary_y(true)
        .with_points(vec![Point::new(0.1, 1e-3), Point::new(0.2, 0.1)]);

    Project {
        title: "Spectrum".to_owned(),
        x_label: "Frequency".to_owned(),
        y_label: "Power".to_owned(),
        y2_label: Some("Ratio".to_owned()),
        x_axis: AxisRange::log10(1.0, 1000.0).expect("x range"),
        y_axis: AxisRange::linear(-5.0, 100.0).expect("y range"),
        secondary_y_axis: Some(AxisRange::log10(1e-4, 1.0).expect("y2 range")),
        datasets: vec![primary, secondary],
    }
}

#[test]
fn project_round_trips_through_json() {
    let project = sample_project();
    let text = project.to_json_pretty().expect("serialize");
    let parsed = Project::from_json_str(&text).expect("parse");

    assert_eq!(parsed, project);
    assert_eq!(parsed.datasets[1].color().as_str(), "#e69f00");
    assert!(!parsed.datasets[1].is_visible());
    assert!(parsed.datasets[1].uses_secondary_y());
}

#[test]
fn compact_output_round_trips_too() {
    let project = sample_project();
    let text = project.to_json_string(false).expect("serialize");
    assert!(!text.contains('\n'));
    assert_eq!(Project::from_json_str(&text).expect("parse"), project);
}

#[test]
fn output_uses_wire_field_names_in_order() {
    let value = sample_project().to_json_value().expect("json value");
    let object = value.as_object().expect("object root");
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "title", "xlabel", "ylabel", "y2label", "x_min", "x_max", "y_min", "y_max", "x_log",
            "y_log", "y2_min", "y2_max", "y2_log", "datasets",
        ]
    );
    assert_eq!(object[PROJECT_FIELDS_V1.x_log], Value::Bool(true));
    assert_eq!(
        object["datasets"][0]["points"],
        json!([[0.5, 12.25], [1.5, 40.0]])
    );
}

#[test]
fn empty_datasets_are_not_written() {
    let mut project = sample_project();
    project
        .datasets
        .push(Dataset::new("Empty", "#009E73").expect("valid color"));

    let value = project.to_json_value().expect("json value");
    let names: Vec<&str> = value["datasets"]
        .as_array()
        .expect("datasets array")
        .iter()
        .map(|d| d["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Signal", "Ratio"]);
}

#[test]
fn secondary_fields_are_omitted_without_secondary_axis() {
    let mut project = sample_project();
    project.secondary_y_axis = None;
    project.y2_label = None;

    let value = project.to_json_value().expect("json value");
    for key in ["y2_min", "y2_max", "y2_log", "y2label"] {
        assert!(value.get(key).is_none(), "{key} must be absent");
    }
    let parsed = Project::from_json_value(&value).expect("parse");
    assert_eq!(parsed.secondary_y_axis, None);
}

/// Wraps `fields` in a document that carries the required axis bounds.
fn with_axes(fields: &str) -> String {
    let mut doc = String::from(r#"{ "x_min": 0, "x_max": 10, "y_min": 0, "y_max": 100"#);
    if !fields.trim().is_empty() {
        doc.push_str(", ");
        doc.push_str(fields);
    }
    doc.push_str(" }");
    doc
}

#[test]
fn missing_optional_fields_take_defaults() {
    let parsed = Project::from_json_str(&with_axes(
        r##""datasets": [ { "name": "A", "color": "#CC79A7", "points": [[1, 2]] } ]"##,
    ))
    .expect("minimal project");

    assert_eq!(parsed.title, "");
    assert_eq!(parsed.x_axis, AxisRange::linear(0.0, 10.0).expect("x range"));
    assert_eq!(parsed.y_axis.scale(), AxisScale::Linear);
    assert_eq!(parsed.secondary_y_axis, None);
    assert!(parsed.datasets[0].is_visible());
    assert!(!parsed.datasets[0].uses_secondary_y());
    assert_eq!(parsed.datasets[0].points(), &[Point::new(1.0, 2.0)]);

    let bare = Project::from_json_str(&with_axes("")).expect("axes only");
    assert!(bare.datasets.is_empty());
}

#[test]
fn missing_axis_bounds_are_rejected() {
    for key in ["x_min", "x_max", "y_min", "y_max"] {
        let mut value: Value =
            serde_json::from_str(&with_axes("")).expect("valid document");
        value
            .as_object_mut()
            .expect("object root")
            .remove(key);
        let err = Project::from_json_value(&value).expect_err(key);
        assert!(
            matches!(&err, DigitizerError::InvalidProject(message) if message.contains(key)),
            "unexpected error without {key}: {err}"
        );
    }
    assert!(Project::from_json_str("{}").is_err());
}

#[test]
fn secondary_axis_without_log_flag_is_linear() {
    let parsed =
        Project::from_json_str(&with_axes(r#""y2_min": 0, "y2_max": 5"#)).expect("parse");
    let axis = parsed.secondary_y_axis.expect("secondary axis");
    assert_eq!(axis.scale(), AxisScale::Linear);
    assert_eq!(axis.max(), 5.0);
}

#[test]
fn partial_secondary_range_is_rejected() {
    let err = Project::from_json_str(&with_axes(r#""y2_min": 1.0"#)).expect_err("half a range");
    assert!(
        matches!(&err, DigitizerError::InvalidProject(message) if message.contains("y2_max")),
        "unexpected error: {err}"
    );
}

#[test]
fn invalid_documents_are_rejected() {
    let cases = [
        "{ not json".to_owned(),
        "[1, 2, 3]".to_owned(),
        r#"{ "x_min": "zero", "x_max": 1, "y_min": 0, "y_max": 1 }"#.to_owned(),
        r#"{ "x_log": true, "x_min": 0, "x_max": 10, "y_min": 0, "y_max": 1 }"#.to_owned(),
        with_axes(r#""datasets": {}"#),
        with_axes(r##""datasets": [ { "color": "#000000" } ]"##),
        with_axes(r#""datasets": [ { "name": "A", "color": "black" } ]"#),
        with_axes(r##""datasets": [ { "name": "A", "color": "#000", "visible": "yes" } ]"##),
    ];
    for input in &cases {
        let err = Project::from_json_str(input).expect_err(input);
        assert!(
            matches!(err, DigitizerError::InvalidProject(_)),
            "unexpected error for {input}: {err}"
        );
    }
}

#[test]
fn malformed_point_entries_are_dropped() {
    let parsed = Project::from_json_str(&with_axes(
        r##""datasets": [ { "name": "A", "color": "#000",
              "points": [[1, 2], [3], "x", [4, "5"], [6, 7, 8], null] } ]"##,
    ))
    .expect("parse");
    assert_eq!(
        parsed.datasets[0].points(),
        &[Point::new(1.0, 2.0), Point::new(6.0, 7.0)]
    );
}

#[test]
fn non_finite_points_fail_export_instead_of_becoming_null() {
    for bad in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let mut project = sample_project();
        project.datasets[0].push(Point::new(2.0, bad));

        let err = project.to_json_string(false).expect_err("non-finite point");
        assert!(
            matches!(&err, DigitizerError::InvalidProject(message) if message.contains("Signal")),
            "unexpected error: {err}"
        );
        assert!(project.to_json_value().is_err());
    }
}

#[test]
fn overflowing_log_trace_still_round_trips() {
    // Y anchors one pixel apart over 600 decades: rows past the anchors overflow to inf.
    let calibration = Calibration::new(
        AxisRange::linear(0.0, 9.0).expect("x range"),
        AxisRange::log10(1e-300, 1e300).expect("y range"),
    )
    .with_anchors(CalibrationAnchors {
        x_min: CanvasPoint::new(0.0, 0.0),
        x_max: CanvasPoint::new(9.0, 0.0),
        y_min: CanvasPoint::new(0.0, 0.0),
        y_max: CanvasPoint::new(0.0, 1.0),
    });
    let transformer = CoordinateTransformer::new(&calibration);
    let red = Rgb::new(255, 0, 0);
    let mut image = RgbBuffer::new(10, 50, Rgb::WHITE);
    for column in 0..10 {
        image.set(column, if column < 5 { 40 } else { 1 }, red);
    }

    let points = AutoTracer::default().trace(&image, red, &transformer, false);
    assert_eq!(points.len(), 5);
    assert!(points.iter().all(|p| p.is_finite()));

    let dataset = Dataset::new("Red", "#FF0000")
        .expect("valid color")
        .with_points(points);
    let project = Project::from_session(ProjectMeta::default(), &calibration, &[dataset]);
    let text = project.to_json_string(false).expect("serialize");
    assert_eq!(Project::from_json_str(&text).expect("parse"), project);
}

#[test]
fn session_snapshot_and_apply_axes() {
    let calibration = Calibration::new(
        AxisRange::linear(0.0, 10.0).expect("x range"),
        AxisRange::log10(1.0, 1e4).expect("y range"),
    );
    let meta = ProjectMeta {
        title: "Run 7".to_owned(),
        ..ProjectMeta::default()
    };
    let datasets = vec![Dataset::with_palette_index("A", 0).with_points(vec![Point::new(1.0, 2.0)])];
    let project = Project::from_session(meta.clone(), &calibration, &datasets);
    assert_eq!(project.meta(), meta);

    let mut target = Calibration::default();
    project.apply_axes(&mut target);
    assert_eq!(target.x_axis(), calibration.x_axis());
    assert_eq!(target.y_axis(), calibration.y_axis());
    assert_eq!(target.secondary_y_axis(), None);
}

#[test]
fn save_and_load_project_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("project.json");
    let project = sample_project();

    save_project(&path, &project, true).expect("save");
    let loaded = load_project(&path).expect("load");
    assert_eq!(loaded, project);

    let missing = load_project(&dir.path().join("missing.json")).expect_err("missing file");
    assert!(matches!(missing, DigitizerError::Io { .. }));
}

fn arb_axis() -> impl Strategy<Value = AxisRange> {
    prop_oneof![
        (-1e6f64..1e6, -1e6f64..1e6)
            .prop_map(|(a, b)| AxisRange::linear(a, b).expect("finite linear range")),
        (1e-6f64..1e3, 1e-6f64..1e6)
            .prop_map(|(a, b)| AxisRange::log10(a, b).expect("positive log range")),
    ]
}

fn arb_dataset() -> impl Strategy<Value = Dataset> {
    (
        "[A-Za-z0-9 _,.-]{1,12}",
        any::<(u8, u8, u8)>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec((-1e9f64..1e9, -1e9f64..1e9), 1..24),
    )
        .prop_map(|(name, (r, g, b), short_hex, visible, secondary, points)| {
            let color = if short_hex {
                HexColor::parse(&format!("#{:x}{:x}{:x}", r >> 4, g >> 4, b >> 4))
                    .expect("short hex")
            } else {
                HexColor::from(Rgb::new(r, g, b))
            };
            Dataset::with_color(name, color)
                .with_visible(visible)
                .with_secondary_y(secondary)
                .with_points(points.into_iter().map(Point::from).collect())
        })
}

proptest! {
    #[test]
    fn json_round_trip_property(
        title in ".{0,16}",
        x_label in ".{0,8}",
        y2_label in prop::option::of(".{0,8}"),
        x_axis in arb_axis(),
        y_axis in arb_axis(),
        secondary_y_axis in prop::option::of(arb_axis()),
        datasets in prop::collection::vec(arb_dataset(), 0..5),
        pretty in any::<bool>(),
    ) {
        let project = Project {
            title,
            x_label,
            y_label: String::new(),
            y2_label,
            x_axis,
            y_axis,
            secondary_y_axis,
            datasets,
        };

        let text = project.to_json_string(pretty).expect("serialize");
        let parsed = Project::from_json_str(&text).expect("parse");
        prop_assert_eq!(parsed, project);
    }
}

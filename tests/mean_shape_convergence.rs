//! End-to-end mean shape estimation on posed copies of a known face.

use landmark_align::{
    compute_mean_shape, covariance, covariance_columns, covariance_n, normalized, variance,
    AlignmentConfig, ColumnMatrix, Error, MeanShapeEstimator, MeanShapeOptions, Point, Shape,
    SimilarityTransform,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Eyes, nose tip and mouth corners in normalized face-box coordinates.
fn base_face() -> Shape {
    Shape::new(vec![
        Point::new(0.30, 0.30),
        Point::new(0.70, 0.30),
        Point::new(0.50, 0.55),
        Point::new(0.35, 0.75),
        Point::new(0.65, 0.75),
    ])
}

fn posed(shape: &Shape, scale: f64, theta: f64, dx: f64, dy: f64) -> Shape {
    let mut tform = SimilarityTransform::from_scale_rotation(scale, theta);
    tform.translation = Point::new(dx, dy);
    tform.transformed(shape)
}

fn training_set() -> Vec<Shape> {
    let base = base_face();
    vec![
        posed(&base, 1.0, 0.0, 120.0, -35.0),
        posed(&base, 240.0, 0.0, 0.0, 0.0),
        posed(&base, 1.0, 0.6, 0.0, 0.0),
    ]
}

#[test]
fn converges_to_normalized_base_shape() {
    let config = AlignmentConfig::five_point();
    let expected = normalized(&base_face(), &config).unwrap();

    let mean = compute_mean_shape(&training_set(), &config, 10).unwrap();
    assert!(
        mean.max_displacement(&expected) < 1e-9,
        "mean {:?} differs from {:?}",
        mean,
        expected
    );
}

#[test]
fn small_faces_far_from_origin_converge() {
    let config = AlignmentConfig::five_point();
    let expected = normalized(&base_face(), &config).unwrap();
    let mut rng = StdRng::seed_from_u64(43);

    for _ in 0..20 {
        // A handful of faces a few units wide scattered across a 10^4 canvas
        let shapes: Vec<Shape> = (0..6)
            .map(|_| {
                posed(
                    &base_face(),
                    rng.gen_range(2.0..10.0),
                    rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI),
                    rng.gen_range(-1e4..1e4),
                    rng.gen_range(-1e4..1e4),
                )
            })
            .collect();

        let mean = compute_mean_shape(&shapes, &config, 10).unwrap();
        assert!(
            mean.max_displacement(&expected) < 1e-6,
            "mean {:?} differs from {:?}",
            mean,
            expected
        );
    }
}

#[test]
fn result_does_not_depend_on_input_order() {
    let config = AlignmentConfig::five_point();
    let shapes = training_set();
    let reference = compute_mean_shape(&shapes, &config, 10).unwrap();

    let orders = [[1, 0, 2], [2, 1, 0], [0, 2, 1]];
    for order in orders {
        let reordered: Vec<Shape> = order.iter().map(|&i| shapes[i].clone()).collect();
        let mean = compute_mean_shape(&reordered, &config, 10).unwrap();
        assert!(mean.max_displacement(&reference) < 1e-9);
    }
}

#[test]
fn noisy_annotations_average_out() {
    let config = AlignmentConfig::five_point();
    let base = base_face();
    let mut rng = StdRng::seed_from_u64(31);

    let shapes: Vec<Shape> = (0..200)
        .map(|_| {
            let noisy: Shape = base
                .iter()
                .map(|p| *p + Point::new(rng.gen_range(-0.01..0.01), rng.gen_range(-0.01..0.01)))
                .collect();
            posed(
                &noisy,
                rng.gen_range(50.0..300.0),
                rng.gen_range(-0.5..0.5),
                rng.gen_range(0.0..640.0),
                rng.gen_range(0.0..480.0),
            )
        })
        .collect();

    let estimate = MeanShapeEstimator::new(config).estimate(&shapes).unwrap();
    let expected = normalized(&base, &config).unwrap();

    assert_eq!(estimate.iterations_run, 10);
    // Noise of ±0.01 on a 0.4 eye distance is ±0.025 after normalization;
    // averaging 200 samples leaves far less than that
    assert!(estimate.shape.max_displacement(&expected) < 0.01);

    let mean = &estimate.shape;
    assert!(mean.centroid().norm() < 1e-9);
    assert!((mean[0].distance(&mean[1]) - 1.0).abs() < 1e-9);
    assert!((mean[0].y - mean[1].y).abs() < 1e-9);
}

#[test]
fn early_exit_matches_fixed_iterations() {
    let config = AlignmentConfig::five_point();
    let shapes = training_set();

    let fixed = compute_mean_shape(&shapes, &config, 10).unwrap();
    let early = MeanShapeEstimator::with_options(
        config,
        MeanShapeOptions {
            iterations: 10,
            convergence_threshold: Some(1e-9),
        },
    )
    .estimate(&shapes)
    .unwrap();

    assert!(early.iterations_run < 10);
    assert!(early.shape.max_displacement(&fixed) < 1e-9);
}

#[test]
fn estimate_owned_matches_borrowed_estimate() {
    let estimator = MeanShapeEstimator::new(AlignmentConfig::five_point()).iterations(4);
    let borrowed = estimator.estimate(&training_set()).unwrap();
    let owned = estimator.estimate_owned(training_set()).unwrap();
    assert_eq!(borrowed, owned);
}

#[test]
fn collapsed_mean_reports_degenerate_geometry() {
    // Eyes coincide in every training shape, so the averaged mean cannot be
    // normalized
    let shape = Shape::new(vec![
        Point::new(1.0, 1.0),
        Point::new(1.0, 1.0),
        Point::new(3.0, 0.0),
    ]);
    let err = compute_mean_shape(&[shape.clone(), shape], &AlignmentConfig::five_point(), 5)
        .unwrap_err();
    assert!(matches!(err, Error::DegenerateGeometry(_)));
}

#[test]
fn config_deserializes_with_defaults() {
    let config: AlignmentConfig =
        serde_json::from_str(r#"{ "left_eye_index": 36, "right_eye_index": 45 }"#).unwrap();
    assert_eq!(config, AlignmentConfig::ibug_68());

    let legacy: AlignmentConfig = serde_json::from_str(
        r#"{ "left_eye_index": 0, "right_eye_index": 1, "eye_axis": "ratio" }"#,
    )
    .unwrap();
    assert_eq!(legacy.eye_axis, landmark_align::EyeAxisAngle::Ratio);

    let options: MeanShapeOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, MeanShapeOptions::default());

    let options: MeanShapeOptions =
        serde_json::from_str(r#"{ "iterations": 25, "convergence_threshold": 0.001 }"#).unwrap();
    assert_eq!(options.iterations, 25);
    assert_eq!(options.convergence_threshold, Some(0.001));
}

#[test]
fn covariance_entry_points_agree() {
    let mut rng = StdRng::seed_from_u64(37);
    let x: Vec<f64> = (0..68).map(|_| rng.gen_range(-10.0..10.0)).collect();
    let y: Vec<f64> = (0..68).map(|_| rng.gen_range(-10.0..10.0)).collect();

    let slices = covariance(&x, &y);
    assert_eq!(slices, covariance(&y, &x));
    assert_eq!(slices, covariance_n(&x, &y, x.len()));
    assert_eq!(
        slices,
        covariance_columns(&ColumnMatrix::new(x.clone()), &ColumnMatrix::new(y.clone()))
    );

    // Two-pass population variance
    let mean = x.iter().sum::<f64>() / x.len() as f64;
    let two_pass = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / x.len() as f64;
    assert!((variance(&x) - two_pass).abs() < 1e-9);
    assert_eq!(variance(&x), covariance(&x, &x));
}

use crate::config::{AlignmentConfig, EyeAxisAngle};
use crate::error::{Error, Result};
use crate::transform::{SimilarityTransform, Translation};
use crate::types::{Shape, RELATIVE_EPSILON};

/// Bring `shape` into the canonical pose, in place.
///
/// The shape is centered on its centroid, scaled so the eyes named by
/// `config` are one unit apart, and rotated about the origin so the eye line
/// is horizontal. Centering happens first and the scale/rotation is applied
/// without translation, so the centroid stays at the origin.
///
/// An invalid `config` leaves the shape untouched; degenerate eye landmarks
/// leave it centered but otherwise unchanged.
pub fn normalize(shape: &mut Shape, config: &AlignmentConfig) -> Result<()> {
    config.validate(shape.num_landmarks())?;

    let centroid = shape.centroid();
    shape.translate(centroid * -1.0);

    let tform = eye_alignment(shape, config)?;
    tform.apply(shape, Translation::Skip);
    Ok(())
}

/// Copying variant of [`normalize`].
pub fn normalized(shape: &Shape, config: &AlignmentConfig) -> Result<Shape> {
    let mut out = shape.clone();
    normalize(&mut out, config)?;
    Ok(out)
}

/// Scale/rotation (no translation) that puts the eyes of a centered shape
/// one unit apart on a horizontal line.
///
/// The eyes coincide when their distance is negligible against the shape's
/// RMS radius, the same criterion the Procrustes solver uses for a collapsed
/// target.
fn eye_alignment(shape: &Shape, config: &AlignmentConfig) -> Result<SimilarityTransform> {
    let left_eye = shape[config.left_eye_index];
    let right_eye = shape[config.right_eye_index];
    let eye_vector = right_eye - left_eye;

    let eye_distance = eye_vector.norm();
    if !eye_distance.is_finite() {
        return Err(Error::NonFiniteResult("eye distance"));
    }
    if !(eye_distance > RELATIVE_EPSILON * shape.rms_radius()) {
        return Err(Error::DegenerateGeometry(format!(
            "eye landmarks {} and {} coincide",
            config.left_eye_index, config.right_eye_index
        )));
    }

    let theta = match config.eye_axis {
        EyeAxisAngle::TwoArgument => -eye_vector.y.atan2(eye_vector.x),
        EyeAxisAngle::Ratio => {
            if eye_vector.x == 0.0 {
                return Err(Error::DegenerateGeometry(
                    "eye line is vertical".to_string(),
                ));
            }
            -(eye_vector.y / eye_vector.x).atan()
        }
    };

    Ok(SimilarityTransform::from_scale_rotation(
        1.0 / eye_distance,
        theta,
    ))
}

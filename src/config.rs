use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the normalizer derives the angle that levels the eye line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeAxisAngle {
    /// `-atan2(dy, dx)`: defined for any non-zero eye vector and always puts
    /// the right eye on the positive x side of the left eye.
    #[default]
    TwoArgument,
    /// `-atan(dy / dx)`: levels the eye line but keeps a flipped face
    /// flipped, and is undefined for a vertical eye line.
    Ratio,
}

/// Landmarks that anchor scale and rotation during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    pub left_eye_index: usize,
    pub right_eye_index: usize,
    #[serde(default)]
    pub eye_axis: EyeAxisAngle,
}

impl AlignmentConfig {
    pub const fn new(left_eye_index: usize, right_eye_index: usize) -> Self {
        Self {
            left_eye_index,
            right_eye_index,
            eye_axis: EyeAxisAngle::TwoArgument,
        }
    }

    /// 5-point layout: left eye, right eye, nose tip, mouth corners.
    pub const fn five_point() -> Self {
        Self::new(0, 1)
    }

    /// iBUG 68-point layout anchored on the outer eye corners.
    pub const fn ibug_68() -> Self {
        Self::new(36, 45)
    }

    pub fn with_eye_axis(mut self, eye_axis: EyeAxisAngle) -> Self {
        self.eye_axis = eye_axis;
        self
    }

    /// Check that both eye indices address a landmark of an
    /// `num_landmarks`-point shape.
    pub fn validate(&self, num_landmarks: usize) -> Result<()> {
        for index in [self.left_eye_index, self.right_eye_index] {
            if index >= num_landmarks {
                return Err(Error::LandmarkOutOfRange {
                    index,
                    num_landmarks,
                });
            }
        }
        if self.left_eye_index == self.right_eye_index {
            return Err(Error::DegenerateGeometry(format!(
                "left and right eye share landmark index {}",
                self.left_eye_index
            )));
        }
        Ok(())
    }
}

fn default_iterations() -> usize {
    crate::mean_shape::DEFAULT_ITERATIONS
}

/// Tunables for mean shape estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanShapeOptions {
    /// Upper bound on alignment rounds.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Stop early once no landmark of the mean moves further than this
    /// between two rounds. `None` always runs every iteration.
    #[serde(default)]
    pub convergence_threshold: Option<f64>,
}

impl Default for MeanShapeOptions {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            convergence_threshold: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(AlignmentConfig::five_point().left_eye_index, 0);
        assert_eq!(AlignmentConfig::five_point().right_eye_index, 1);
        assert_eq!(AlignmentConfig::ibug_68().right_eye_index, 45);
        assert_eq!(AlignmentConfig::ibug_68().eye_axis, EyeAxisAngle::TwoArgument);
    }

    #[test]
    fn validate_rejects_out_of_range_indices() {
        let config = AlignmentConfig::ibug_68();
        assert!(config.validate(68).is_ok());
        assert_eq!(
            config.validate(5),
            Err(Error::LandmarkOutOfRange {
                index: 36,
                num_landmarks: 5
            })
        );
    }

    #[test]
    fn validate_rejects_shared_eye_index() {
        let config = AlignmentConfig::new(2, 2);
        assert!(matches!(
            config.validate(5),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn options_default_to_ten_fixed_iterations() {
        let options = MeanShapeOptions::default();
        assert_eq!(options.iterations, 10);
        assert_eq!(options.convergence_threshold, None);
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Procrustes system is singular: the target shape has no spatial extent")]
    SingularSystem,

    #[error("Landmark index {index} out of range for a shape with {num_landmarks} landmarks")]
    LandmarkOutOfRange { index: usize, num_landmarks: usize },

    #[error("Mean shape estimation needs at least one training shape")]
    EmptyTrainingSet,

    #[error("Non-finite value produced by {0}")]
    NonFiniteResult(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CubeScanError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to read {path}: {source}")]
    UnreadableFile {
        path: String,
        source: std::io::Error,
    },

    #[error("#of lines in {path} is {found}, not the same as the number of frames ({expected})")]
    FrameCountMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid value at {path}:{line}: {content:?}")]
    InvalidMetadataLine {
        path: String,
        line: usize,
        content: String,
    },

    #[error("Pixel type mismatch: cube stores {found} bytes per element, expected {expected}")]
    PixelTypeMismatch { expected: usize, found: usize },

    #[error("Cube file {path} holds {found} bytes, expected {expected} for the given extents")]
    CubeSizeMismatch {
        path: String,
        expected: u64,
        found: u64,
    },

    #[error("Pixel buffer holds {found} elements, expected {expected} for the given extents")]
    PixelBufferSizeMismatch { expected: usize, found: usize },

    #[error("Metadata list {name} has {found} entries, fewer than the {expected} frames")]
    MetadataTooShort {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Cube buffer is not aligned for the pixel type")]
    MisalignedCube,

    #[error("Cube extents must be non-zero, got ({0}, {1}, {2})")]
    EmptyCube(usize, usize, usize),

    #[error("Cube extents ({0}, {1}, {2}) exceed the addressable size")]
    CubeExtentsOverflow(usize, usize, usize),

    #[error("Invalid {name} for frame {frame}: {value} (must be {requirement})")]
    InvalidMetadataValue {
        name: &'static str,
        frame: usize,
        value: f64,
        requirement: &'static str,
    },

    #[error("Invalid slope distribution: {0}")]
    InvalidSlopeDistribution(String),

    #[error("Invalid search parameter: {0}")]
    InvalidSearchParameter(String),

    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidConfigValue { key: String, value: String },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to build the worker pool: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
}

impl From<rand_distr::BetaError> for CubeScanError {
    fn from(err: rand_distr::BetaError) -> Self {
        CubeScanError::InvalidSlopeDistribution(format!("{err}"))
    }
}

impl From<rand::distr::weighted::Error> for CubeScanError {
    fn from(err: rand::distr::weighted::Error) -> Self {
        CubeScanError::InvalidSlopeDistribution(format!("{err}"))
    }
}

impl PartialEq for CubeScanError {
    fn eq(&self, other: &Self) -> bool {
        use CubeScanError::*;
        match (self, other) {
            // I/O-backed errors are compared on their variant only
            (IoError(_), IoError(_)) => true,
            (UnreadableFile { path: a, .. }, UnreadableFile { path: b, .. }) => a == b,
            (CsvError(_), CsvError(_)) => true,
            (ThreadPoolError(_), ThreadPoolError(_)) => true,

            (
                FrameCountMismatch {
                    path: pa,
                    expected: ea,
                    found: fa,
                },
                FrameCountMismatch {
                    path: pb,
                    expected: eb,
                    found: fb,
                },
            ) => pa == pb && ea == eb && fa == fb,
            (
                InvalidMetadataLine {
                    path: pa,
                    line: la,
                    content: ca,
                },
                InvalidMetadataLine {
                    path: pb,
                    line: lb,
                    content: cb,
                },
            ) => pa == pb && la == lb && ca == cb,
            (
                PixelTypeMismatch {
                    expected: ea,
                    found: fa,
                },
                PixelTypeMismatch {
                    expected: eb,
                    found: fb,
                },
            ) => ea == eb && fa == fb,
            (
                CubeSizeMismatch {
                    path: pa,
                    expected: ea,
                    found: fa,
                },
                CubeSizeMismatch {
                    path: pb,
                    expected: eb,
                    found: fb,
                },
            ) => pa == pb && ea == eb && fa == fb,
            (
                PixelBufferSizeMismatch {
                    expected: ea,
                    found: fa,
                },
                PixelBufferSizeMismatch {
                    expected: eb,
                    found: fb,
                },
            ) => ea == eb && fa == fb,
            (
                MetadataTooShort {
                    name: na,
                    expected: ea,
                    found: fa,
                },
                MetadataTooShort {
                    name: nb,
                    expected: eb,
                    found: fb,
                },
            ) => na == nb && ea == eb && fa == fb,
            (EmptyCube(a0, a1, a2), EmptyCube(b0, b1, b2)) => a0 == b0 && a1 == b1 && a2 == b2,
            (CubeExtentsOverflow(a0, a1, a2), CubeExtentsOverflow(b0, b1, b2)) => {
                a0 == b0 && a1 == b1 && a2 == b2
            }
            // NaN values compare equal to themselves here
            (
                InvalidMetadataValue {
                    name: na,
                    frame: fa,
                    value: va,
                    ..
                },
                InvalidMetadataValue {
                    name: nb,
                    frame: fb,
                    value: vb,
                    ..
                },
            ) => na == nb && fa == fb && va.to_bits() == vb.to_bits(),
            (InvalidSlopeDistribution(a), InvalidSlopeDistribution(b)) => a == b,
            (InvalidSearchParameter(a), InvalidSearchParameter(b)) => a == b,
            (
                InvalidConfigValue { key: ka, value: va },
                InvalidConfigValue { key: kb, value: vb },
            ) => ka == kb && va == vb,

            (MisalignedCube, MisalignedCube) => true,

            _ => false,
        }
    }
}

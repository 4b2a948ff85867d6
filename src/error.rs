use thiserror::Error;

/// Everything that can go wrong inside the viewer pipeline.
///
/// None of these are fatal to a running session: a failed load leaves the
/// previously displayed model (and the rest of the session state) untouched.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The uploaded bytes could not be decoded as GLB/glTF.
    #[error("failed to decode asset '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: gltf::Error,
    },

    /// The file extension is neither `.glb` nor `.gltf`.
    #[error("unsupported asset format '{0}' (expected GLB or glTF)")]
    UnsupportedFormat(String),

    /// The panoramic environment image could not be decoded.
    #[error("failed to load environment image: {0}")]
    Environment(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}

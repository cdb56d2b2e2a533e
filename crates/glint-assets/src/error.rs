use std::path::PathBuf;

/// Errors that abort a whole model load.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse glTF container: {0}")]
    Parse(String),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Errors reading typed data out of the document's binary buffers.
///
/// Reported per primitive: the offending primitive is skipped, the load continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("index component type {0:?} not supported")]
    UnsupportedIndexType(crate::document::ComponentType),

    #[error("attribute {semantic} has unsupported format {component_type:?} x{components}")]
    UnsupportedAttributeFormat {
        semantic: &'static str,
        component_type: crate::document::ComponentType,
        components: usize,
    },

    #[error("primitive has no {0} attribute")]
    MissingAttribute(&'static str),

    #[error("accessor {0} does not exist")]
    MissingAccessor(usize),

    #[error("accessor {0} has no buffer view")]
    MissingView(usize),

    #[error("accessor {accessor} references missing buffer view {view}")]
    MissingBufferView { accessor: usize, view: usize },

    #[error("buffer {0} does not exist")]
    MissingBuffer(usize),

    #[error("accessor {accessor} reads bytes {start}..{end} but its source holds {len}")]
    OutOfBounds {
        accessor: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("{semantic} has {actual} elements, primitive has {expected} vertices")]
    CountMismatch {
        semantic: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("index {index} at position {position} exceeds vertex count {vertex_count}")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },
}

/// Errors normalizing pixel data to RGBA8.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u8),

    #[error("pixel buffer holds {actual} bytes, {width}x{height}x{channels} needs {expected}")]
    TruncatedPixels {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },
}

/// Structural problems found while walking the node hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} reached more than once; cycle or shared subtree not re-entered")]
    Cycle(usize),

    #[error("node {node} is deeper than the limit of {limit}")]
    TooDeep { node: usize, limit: usize },

    #[error("node {0} does not exist")]
    MissingNode(usize),

    #[error("node {node} references missing mesh {mesh}")]
    MissingMesh { node: usize, mesh: usize },
}

/// Errors reported by a [`TextureUploader`](crate::TextureUploader).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("texture failed to load: empty pixel buffer")]
    EmptyPixels,

    #[error("texture upload failed: {0}")]
    Backend(String),
}

/// A non-fatal problem recorded while building a model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    #[error("model left empty: {0}")]
    Parse(String),

    #[error("image {image}: {error}")]
    Image { image: usize, error: ImageError },

    #[error("image {image}: {error}")]
    Upload { image: usize, error: UploadError },

    #[error("scene graph: {0}")]
    Scene(SceneError),

    #[error("node {node}, mesh {mesh}, primitive {primitive}: attribute ignored: {error}")]
    Attribute {
        node: usize,
        mesh: usize,
        primitive: usize,
        error: DecodeError,
    },

    #[error("node {node}, mesh {mesh}, primitive {primitive} skipped: {error}")]
    Primitive {
        node: usize,
        mesh: usize,
        primitive: usize,
        error: DecodeError,
    },

    #[error("{0} dangling material/texture/image references cleared")]
    DanglingReferences(usize),
}

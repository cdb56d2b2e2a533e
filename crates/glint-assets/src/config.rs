use serde::{Deserialize, Serialize};

/// Options controlling how a document is turned into a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Deepest node nesting walked below a scene root; deeper subtrees are skipped.
    pub max_depth: usize,
    /// Bake each node's world transform into its vertices. Off: geometry stays in mesh space.
    pub apply_node_transforms: bool,
    /// Give primitives without an index accessor the sequential list `0..vertex_count`.
    /// Off: such primitives are skipped.
    pub generate_missing_indices: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            apply_node_transforms: false,
            generate_missing_indices: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = LoadOptions::default();
        assert_eq!(options.max_depth, 64);
        assert!(!options.apply_node_transforms);
        assert!(options.generate_missing_indices);
    }
}

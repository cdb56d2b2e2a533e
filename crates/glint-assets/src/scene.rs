//! Scene graph traversal.
//!
//! Nodes are walked with an explicit stack: a node's children are fully visited
//! before the node's own mesh is emitted, children in listed order.

use glint_core::Mat4;
use tracing::warn;

use crate::document::{AssetDocument, PrimitiveDesc};
use crate::error::SceneError;

/// A primitive found during the walk, with the node it hangs from.
#[derive(Debug, Clone, Copy)]
pub struct ScenePrimitive<'a> {
    pub node: usize,
    pub mesh: usize,
    /// Position within the mesh's primitive list
    pub primitive: usize,
    pub desc: &'a PrimitiveDesc,
    /// Composed transform from the scene root down to `node`
    pub world: Mat4,
}

enum Visit {
    Enter {
        node: usize,
        depth: usize,
        parent: Mat4,
    },
    Emit {
        node: usize,
        world: Mat4,
    },
}

/// Walk the node trees under `roots`, appending every mesh primitive to `out`.
///
/// Structural problems are logged and returned; the offending node or subtree is
/// skipped and the walk carries on with the rest.
pub fn collect_primitives<'a>(
    doc: &'a AssetDocument,
    roots: &[usize],
    max_depth: usize,
    out: &mut Vec<ScenePrimitive<'a>>,
) -> Vec<SceneError> {
    let mut errors = Vec::new();
    let mut visited = vec![false; doc.nodes.len()];
    let mut stack: Vec<Visit> = roots
        .iter()
        .rev()
        .map(|&node| Visit::Enter {
            node,
            depth: 0,
            parent: Mat4::IDENTITY,
        })
        .collect();

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter {
                node,
                depth,
                parent,
            } => {
                let Some(desc) = doc.nodes.get(node) else {
                    errors.push(SceneError::MissingNode(node));
                    continue;
                };
                if depth > max_depth {
                    errors.push(SceneError::TooDeep {
                        node,
                        limit: max_depth,
                    });
                    continue;
                }
                if std::mem::replace(&mut visited[node], true) {
                    errors.push(SceneError::Cycle(node));
                    continue;
                }

                let world = parent * desc.transform.matrix();
                stack.push(Visit::Emit { node, world });
                stack.extend(desc.children.iter().rev().map(|&child| Visit::Enter {
                    node: child,
                    depth: depth + 1,
                    parent: world,
                }));
            }
            Visit::Emit { node, world } => {
                let Some(mesh) = doc.nodes[node].mesh else {
                    continue;
                };
                let Some(mesh_desc) = doc.meshes.get(mesh) else {
                    errors.push(SceneError::MissingMesh { node, mesh });
                    continue;
                };
                out.extend(
                    mesh_desc
                        .primitives
                        .iter()
                        .enumerate()
                        .map(|(primitive, desc)| ScenePrimitive {
                            node,
                            mesh,
                            primitive,
                            desc,
                            world,
                        }),
                );
            }
        }
    }

    for error in &errors {
        warn!("Scene graph: {}", error);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MeshDesc, NodeDesc};
    use glint_core::{Transform, Vec3};

    fn mesh(primitives: usize) -> MeshDesc {
        MeshDesc {
            name: None,
            primitives: (0..primitives)
                .map(|i| PrimitiveDesc {
                    material: Some(i),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn node(children: Vec<usize>, mesh: Option<usize>) -> NodeDesc {
        NodeDesc {
            children,
            mesh,
            ..Default::default()
        }
    }

    fn walk(doc: &AssetDocument, roots: &[usize], max_depth: usize) -> (Vec<(usize, usize, usize)>, Vec<SceneError>) {
        let mut out = Vec::new();
        let errors = collect_primitives(doc, roots, max_depth, &mut out);
        let found = out.iter().map(|p| (p.node, p.mesh, p.primitive)).collect();
        (found, errors)
    }

    #[test]
    fn chain_with_mesh_on_leaf() {
        // A -> B -> C, only C has a mesh
        let doc = AssetDocument {
            meshes: vec![mesh(3)],
            nodes: vec![node(vec![1], None), node(vec![2], None), node(vec![], Some(0))],
            ..Default::default()
        };
        let mut out = Vec::new();
        let errors = collect_primitives(&doc, &[0], 64, &mut out);

        assert!(errors.is_empty());
        assert_eq!(out.len(), 3);
        for (i, p) in out.iter().enumerate() {
            assert_eq!(p.node, 2);
            assert_eq!(p.primitive, i);
            assert_eq!(p.desc.material, Some(i));
        }
    }

    #[test]
    fn children_before_parent_in_listed_order() {
        //      0 (mesh 0)
        //     / \
        //    1   2 (mesh 2)
        //    |
        //    3 (mesh 1)
        let doc = AssetDocument {
            meshes: vec![mesh(1), mesh(1), mesh(1)],
            nodes: vec![
                node(vec![1, 2], Some(0)),
                node(vec![3], None),
                node(vec![], Some(2)),
                node(vec![], Some(1)),
            ],
            ..Default::default()
        };
        let (found, errors) = walk(&doc, &[0], 64);
        assert!(errors.is_empty());
        let nodes: Vec<usize> = found.iter().map(|f| f.0).collect();
        assert_eq!(nodes, vec![3, 2, 0]);
    }

    #[test]
    fn multiple_roots_keep_order() {
        let doc = AssetDocument {
            meshes: vec![mesh(1), mesh(1)],
            nodes: vec![node(vec![], Some(1)), node(vec![], Some(0))],
            ..Default::default()
        };
        let (found, _) = walk(&doc, &[1, 0], 64);
        assert_eq!(found, vec![(1, 0, 0), (0, 1, 0)]);
    }

    #[test]
    fn cycle_is_reported_not_followed() {
        let doc = AssetDocument {
            meshes: vec![mesh(1)],
            nodes: vec![node(vec![1], None), node(vec![0], Some(0))],
            ..Default::default()
        };
        let (found, errors) = walk(&doc, &[0], 64);
        assert_eq!(found, vec![(1, 0, 0)]);
        assert_eq!(errors, vec![SceneError::Cycle(0)]);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let doc = AssetDocument {
            meshes: vec![mesh(1)],
            nodes: vec![node(vec![0], Some(0))],
            ..Default::default()
        };
        let (found, errors) = walk(&doc, &[0], 64);
        assert_eq!(found.len(), 1);
        assert_eq!(errors, vec![SceneError::Cycle(0)]);
    }

    #[test]
    fn depth_limit_skips_subtree() {
        // Chain of 5 nodes, each with a mesh
        let doc = AssetDocument {
            meshes: vec![mesh(1)],
            nodes: (0..5)
                .map(|i| node(if i < 4 { vec![i + 1] } else { vec![] }, Some(0)))
                .collect(),
            ..Default::default()
        };
        let (found, errors) = walk(&doc, &[0], 2);
        let nodes: Vec<usize> = found.iter().map(|f| f.0).collect();
        assert_eq!(nodes, vec![2, 1, 0]);
        assert_eq!(errors, vec![SceneError::TooDeep { node: 3, limit: 2 }]);
    }

    #[test]
    fn missing_references() {
        let doc = AssetDocument {
            meshes: vec![mesh(1)],
            nodes: vec![node(vec![7], Some(3)), node(vec![], Some(0))],
            ..Default::default()
        };
        let (found, errors) = walk(&doc, &[0, 1], 64);
        assert_eq!(found, vec![(1, 0, 0)]);
        assert_eq!(
            errors,
            vec![
                SceneError::MissingNode(7),
                SceneError::MissingMesh { node: 0, mesh: 3 },
            ]
        );
    }

    #[test]
    fn world_transform_composes_parent_first() {
        let mut parent = node(vec![1], None);
        parent.transform = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        let mut child = node(vec![], Some(0));
        child.transform = Transform::from_trs([0.0, 2.0, 0.0], [0.0, 0.0, 0.0, 1.0], [2.0, 2.0, 2.0]);

        let doc = AssetDocument {
            meshes: vec![mesh(1)],
            nodes: vec![parent, child],
            ..Default::default()
        };
        let mut out = Vec::new();
        collect_primitives(&doc, &[0], 64, &mut out);

        let p = out[0].world.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(3.0, 2.0, 0.0)).length() < 1e-6);
    }
}

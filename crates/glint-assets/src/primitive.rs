use glint_core::{normal_matrix, Mat4, Vec3, Vertex};

use crate::accessor::{FloatView, IndexView};
use crate::config::LoadOptions;
use crate::document::{AssetDocument, PrimitiveDesc};
use crate::error::DecodeError;
use crate::mesh::Mesh;

/// Build one mesh from one primitive.
///
/// POSITION is required and fixes the vertex count. Missing normals are the zero
/// vector and missing texture coordinates are (0, 0). Normals are normalized, and
/// zero-length normals stay zero. When `world` is given, positions and normals are
/// carried into that space.
///
/// A NORMAL or TEXCOORD_0 accessor in a format that cannot be read as floats is
/// treated as absent and its error pushed onto `ignored`.
pub fn convert_primitive(
    doc: &AssetDocument,
    desc: &PrimitiveDesc,
    world: Option<&Mat4>,
    options: &LoadOptions,
    ignored: &mut Vec<DecodeError>,
) -> Result<Mesh, DecodeError> {
    let position_index = desc.position.ok_or(DecodeError::MissingAttribute("POSITION"))?;
    let positions = FloatView::<3>::new(doc, position_index, "POSITION")?;
    let vertex_count = positions.len();

    let normals = optional::<3>(doc, desc.normal, "NORMAL", ignored)?;
    let tex_coords = optional::<2>(doc, desc.tex_coord, "TEXCOORD_0", ignored)?;

    if let Some(normals) = &normals {
        check_count("NORMAL", vertex_count, normals.len())?;
    }
    if let Some(tex_coords) = &tex_coords {
        check_count("TEXCOORD_0", vertex_count, tex_coords.len())?;
    }

    let transform = world.map(|m| (*m, normal_matrix(m)));

    let vertices: Vec<Vertex> = (0..vertex_count)
        .map(|v| {
            let mut position = Vec3::from(positions.get(v).unwrap_or_default());
            let mut normal = normals
                .as_ref()
                .and_then(|n| n.get(v))
                .map(Vec3::from)
                .unwrap_or(Vec3::ZERO);
            let uv = tex_coords
                .as_ref()
                .and_then(|t| t.get(v))
                .unwrap_or([0.0; 2]);

            if let Some((matrix, normal_to_world)) = &transform {
                position = matrix.transform_point3(position);
                normal = *normal_to_world * normal;
            }

            Vertex::new(
                position.to_array(),
                normal.normalize_or_zero().to_array(),
                uv,
            )
        })
        .collect();

    let indices = match desc.indices {
        Some(i) => IndexView::new(doc, i)?.to_vec(),
        None if options.generate_missing_indices => (0..vertex_count as u32).collect(),
        None => return Err(DecodeError::MissingAttribute("indices")),
    };

    if let Some((position, &index)) = indices
        .iter()
        .enumerate()
        .find(|(_, &index)| index as usize >= vertex_count)
    {
        return Err(DecodeError::IndexOutOfRange {
            index,
            position,
            vertex_count,
        });
    }

    Ok(Mesh {
        vertices,
        indices,
        material: desc.material,
    })
}

fn optional<'a, const N: usize>(
    doc: &'a AssetDocument,
    index: Option<usize>,
    semantic: &'static str,
    ignored: &mut Vec<DecodeError>,
) -> Result<Option<FloatView<'a, N>>, DecodeError> {
    let Some(index) = index else {
        return Ok(None);
    };
    match FloatView::<N>::new(doc, index, semantic) {
        Ok(view) => Ok(Some(view)),
        Err(e @ DecodeError::UnsupportedAttributeFormat { .. }) => {
            ignored.push(e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn check_count(semantic: &'static str, expected: usize, actual: usize) -> Result<(), DecodeError> {
    if actual < expected {
        return Err(DecodeError::CountMismatch {
            semantic,
            expected,
            actual,
        });
    }
    Ok(())
}

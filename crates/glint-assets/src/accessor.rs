//! Typed, bounds-checked views over accessor data.
//!
//! Resolving an accessor validates the whole byte range it covers once; reads after
//! that are plain little-endian decodes of borrowed document bytes.

use crate::document::{AssetDocument, ComponentType};
use crate::error::DecodeError;

/// The bytes an accessor covers, borrowed from the owning buffer.
#[derive(Debug, Clone, Copy)]
pub struct BufferSlice<'a> {
    bytes: &'a [u8],
    count: usize,
    stride: usize,
    element_size: usize,
    component_type: ComponentType,
    components: usize,
    normalized: bool,
}

impl<'a> BufferSlice<'a> {
    /// Locate accessor `index` in its buffer: `accessor.byte_offset + view.byte_offset`,
    /// checked against both the view and the buffer.
    pub fn resolve(doc: &'a AssetDocument, index: usize) -> Result<Self, DecodeError> {
        let accessor = doc
            .accessors
            .get(index)
            .ok_or(DecodeError::MissingAccessor(index))?;
        let view_index = accessor.view.ok_or(DecodeError::MissingView(index))?;
        let view = doc
            .views
            .get(view_index)
            .ok_or(DecodeError::MissingBufferView {
                accessor: index,
                view: view_index,
            })?;
        let buffer = doc
            .buffers
            .get(view.buffer)
            .ok_or(DecodeError::MissingBuffer(view.buffer))?;

        let out_of_bounds = |start: usize, end: usize, len: usize| DecodeError::OutOfBounds {
            accessor: index,
            start,
            end,
            len,
        };

        let view_end = view
            .byte_offset
            .checked_add(view.byte_length)
            .filter(|&end| end <= buffer.data.len())
            .ok_or_else(|| {
                out_of_bounds(
                    view.byte_offset,
                    view.byte_offset.saturating_add(view.byte_length),
                    buffer.data.len(),
                )
            })?;

        let element_size = accessor.element_size();
        let stride = view.byte_stride.unwrap_or(element_size);
        let span = match accessor.count {
            0 => Some(0),
            n => stride
                .checked_mul(n - 1)
                .and_then(|s| s.checked_add(element_size)),
        };

        let start = view.byte_offset.saturating_add(accessor.byte_offset);
        let end = span
            .and_then(|span| accessor.byte_offset.checked_add(span))
            .filter(|&end| end <= view.byte_length)
            .map(|end| view.byte_offset + end)
            .ok_or_else(|| out_of_bounds(start, start.saturating_add(span.unwrap_or(usize::MAX)), view_end))?;

        Ok(Self {
            bytes: &buffer.data[start..end],
            count: accessor.count,
            stride,
            element_size,
            component_type: accessor.component_type,
            components: accessor.components,
            normalized: accessor.normalized,
        })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Raw bytes of element `i`
    pub fn element(&self, i: usize) -> Option<&'a [u8]> {
        if i >= self.count {
            return None;
        }
        let start = i * self.stride;
        self.bytes.get(start..start + self.element_size)
    }
}

/// An accessor read as `N` float components per element.
///
/// Components are little-endian `f32`, or normalized integers scaled into
/// [0, 1] (unsigned) and [-1, 1] (signed).
#[derive(Debug, Clone, Copy)]
pub struct FloatView<'a, const N: usize> {
    slice: BufferSlice<'a>,
}

impl<'a, const N: usize> FloatView<'a, N> {
    /// Resolve accessor `index` for the attribute `semantic`.
    ///
    /// Exactly `N` components per element are required. Integer components are
    /// accepted only when the accessor is normalized.
    pub fn new(
        doc: &'a AssetDocument,
        index: usize,
        semantic: &'static str,
    ) -> Result<Self, DecodeError> {
        let slice = BufferSlice::resolve(doc, index)?;
        let readable = match slice.component_type {
            ComponentType::F32 => true,
            ComponentType::U32 => false,
            _ => slice.normalized,
        };
        if !readable || slice.components != N {
            return Err(DecodeError::UnsupportedAttributeFormat {
                semantic,
                component_type: slice.component_type,
                components: slice.components,
            });
        }
        Ok(Self { slice })
    }

    pub fn len(&self) -> usize {
        self.slice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slice.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<[f32; N]> {
        let bytes = self.slice.element(i)?;
        let ty = self.slice.component_type;
        let mut out = [0.0f32; N];
        for (value, chunk) in out.iter_mut().zip(bytes.chunks_exact(ty.size())) {
            *value = match ty {
                ComponentType::F32 => f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                ComponentType::U8 => f32::from(chunk[0]) / 255.0,
                ComponentType::I8 => (f32::from(chunk[0] as i8) / 127.0).max(-1.0),
                ComponentType::U16 => f32::from(u16::from_le_bytes([chunk[0], chunk[1]])) / 65535.0,
                ComponentType::I16 => {
                    (f32::from(i16::from_le_bytes([chunk[0], chunk[1]])) / 32767.0).max(-1.0)
                }
                ComponentType::U32 => return None,
            };
        }
        Some(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = [f32; N]> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

/// An index accessor of `u8`, `u16` or `u32` components, widened to `u32` on read.
#[derive(Debug, Clone, Copy)]
pub struct IndexView<'a> {
    slice: BufferSlice<'a>,
}

impl<'a> IndexView<'a> {
    pub fn new(doc: &'a AssetDocument, index: usize) -> Result<Self, DecodeError> {
        let slice = BufferSlice::resolve(doc, index)?;
        match slice.component_type {
            ComponentType::U8 | ComponentType::U16 | ComponentType::U32 => Ok(Self { slice }),
            other => Err(DecodeError::UnsupportedIndexType(other)),
        }
    }

    pub fn len(&self) -> usize {
        self.slice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slice.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        let b = self.slice.element(i)?;
        Some(match self.slice.component_type {
            ComponentType::U8 => u32::from(b[0]),
            ComponentType::U16 => u32::from(u16::from_le_bytes([b[0], b[1]])),
            _ => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Widen every index into an owned list
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

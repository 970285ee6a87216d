// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounds-checked views over raw mesh buffers
//!
//! Capture devices hand out interleaved byte buffers described by an offset,
//! a stride and an element count. Every read here validates the element index
//! and the byte range before decoding, so a malformed anchor yields an error
//! instead of reading past the allocation. Multi-byte values are
//! little-endian.

use crate::error::BufferError;
use serde::{Deserialize, Serialize};

/// Byte buffer holding `count` elements, element `i` starting at
/// `offset + i * stride`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StridedBuffer {
    pub bytes: Vec<u8>,
    pub offset: usize,
    pub stride: usize,
    pub count: usize,
}

impl StridedBuffer {
    pub fn new(bytes: Vec<u8>, offset: usize, stride: usize, count: usize) -> Self {
        Self {
            bytes,
            offset,
            stride,
            count,
        }
    }

    /// Tightly packed `[f32; 3]` elements
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let bytes = points
            .iter()
            .flat_map(|p| p.iter().flat_map(|c| c.to_le_bytes()))
            .collect();
        Self::new(bytes, 0, 12, points.len())
    }

    /// One byte per element
    pub fn from_bytes(values: &[u8]) -> Self {
        Self::new(values.to_vec(), 0, 1, values.len())
    }

    /// Declared count, capped by the number of elements that start inside
    /// `bytes`
    pub fn len(&self) -> usize {
        let available = self
            .bytes
            .len()
            .saturating_sub(self.offset)
            .div_ceil(self.stride.max(1));
        self.count.min(available)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn element(&self, index: usize, len: usize) -> Result<&[u8], BufferError> {
        if index >= self.count {
            return Err(BufferError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        let start = index
            .checked_mul(self.stride)
            .and_then(|o| o.checked_add(self.offset))
            .ok_or(BufferError::Truncated {
                start: usize::MAX,
                len,
                available: self.bytes.len(),
            })?;
        self.bytes.get(start..start.saturating_add(len)).ok_or(BufferError::Truncated {
            start,
            len,
            available: self.bytes.len(),
        })
    }

    pub fn read_f32x3(&self, index: usize) -> Result<[f32; 3], BufferError> {
        let raw = self.element(index, 12)?;
        let mut out = [0.0f32; 3];
        for (value, chunk) in out.iter_mut().zip(raw.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(out)
    }

    pub fn read_u8(&self, index: usize) -> Result<u8, BufferError> {
        Ok(self.element(index, 1)?[0])
    }
}

/// Width of a single vertex index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    U16,
    #[default]
    U32,
}

impl IndexFormat {
    pub fn bytes_per_index(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Packed triangle index buffer with three indices per face
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceBuffer {
    pub bytes: Vec<u8>,
    pub format: IndexFormat,
    pub count: usize,
}

impl FaceBuffer {
    pub fn from_u32(faces: &[[u32; 3]]) -> Self {
        let bytes = faces
            .iter()
            .flat_map(|f| f.iter().flat_map(|i| i.to_le_bytes()))
            .collect();
        Self {
            bytes,
            format: IndexFormat::U32,
            count: faces.len(),
        }
    }

    pub fn from_u16(faces: &[[u16; 3]]) -> Self {
        let bytes = faces
            .iter()
            .flat_map(|f| f.iter().flat_map(|i| i.to_le_bytes()))
            .collect();
        Self {
            bytes,
            format: IndexFormat::U16,
            count: faces.len(),
        }
    }

    /// Declared face count, capped by the whole faces held in `bytes`
    pub fn len(&self) -> usize {
        self.count.min(self.bytes.len() / (3 * self.format.bytes_per_index()))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vertex indices of face `face`
    pub fn read_triangle_indices(&self, face: usize) -> Result<[u32; 3], BufferError> {
        if face >= self.count {
            return Err(BufferError::IndexOutOfRange {
                index: face,
                count: self.count,
            });
        }
        let width = self.format.bytes_per_index();
        let start = face.saturating_mul(3 * width);
        let raw = self
            .bytes
            .get(start..start.saturating_add(3 * width))
            .ok_or(BufferError::Truncated {
                start,
                len: 3 * width,
                available: self.bytes.len(),
            })?;

        let mut out = [0u32; 3];
        for (value, chunk) in out.iter_mut().zip(raw.chunks_exact(width)) {
            *value = match self.format {
                IndexFormat::U16 => u16::from_le_bytes([chunk[0], chunk[1]]) as u32,
                IndexFormat::U32 => u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
            };
        }
        Ok(out)
    }
}

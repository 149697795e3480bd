//! Plain data handed to a backend's draw and lighting operations.

use std::marker::PhantomData;

use crate::foundation::{
    core::{Color, Dot4, Vec4},
    error::{R3dError, R3dResult},
};

/// Light source model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    /// Disabled slot.
    #[default]
    None,
    /// Omnidirectional light at `position`.
    Point,
    /// Parallel rays along `direction`.
    Directional,
    /// Cone at `position` along `direction`, limited by `cutoff`.
    Spot,
}

/// Light source parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
pub struct Light {
    pub kind: LightKind,
    pub position: Dot4,
    pub direction: Vec4,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Constant attenuation.
    pub constant: f32,
    /// Linear attenuation.
    pub linear: f32,
    /// Quadratic attenuation.
    pub quadratic: f32,
    /// Spot cutoff angle, degrees.
    pub cutoff: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::None,
            position: Dot4::new(0.0, 0.0, 0.0, 1.0),
            direction: Vec4::new(0.0, 0.0, -1.0, 0.0),
            ambient: Color::BLACK,
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
            cutoff: 180.0,
        }
    }
}

/// How vertices of a [`Buffer`] are grouped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Filled triangles, three vertices each.
    Triangles,
    /// Triangle outlines, three vertices each.
    WireframeTriangles,
    /// Line segments, two vertices each.
    Lines,
    /// Single points.
    Points,
}

impl PrimitiveKind {
    /// Vertices consumed per primitive.
    pub fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Triangles | Self::WireframeTriangles => 3,
            Self::Lines => 2,
            Self::Points => 1,
        }
    }
}

bitflags::bitflags! {
    /// Per-buffer render switches.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct BufferFlags: u32 {
        /// Alpha-blend into the frame.
        const BLENDING = 1 << 0;
        /// Apply the bound lights.
        const LIGHTING = 1 << 1;
        /// Draw back faces too.
        const NO_CULLING = 1 << 2;
    }
}

/// A strided view over `T` elements stored in raw bytes.
///
/// Each attribute carries its own stride so positions, normals and colors
/// can live in separate arrays or be interleaved in one.
#[derive(Clone, Copy, Debug)]
pub struct Attribute<'a, T> {
    bytes: &'a [u8],
    stride: usize,
    _elem: PhantomData<T>,
}

impl<'a, T: bytemuck::Pod> Attribute<'a, T> {
    /// Tightly packed elements.
    pub fn packed(items: &'a [T]) -> Self {
        Self {
            bytes: bytemuck::cast_slice(items),
            stride: std::mem::size_of::<T>(),
            _elem: PhantomData,
        }
    }

    /// Elements every `stride` bytes starting at `bytes[0]`; a zero stride
    /// means tightly packed.
    pub fn strided(bytes: &'a [u8], stride: usize) -> R3dResult<Self> {
        let size = std::mem::size_of::<T>();
        let stride = if stride == 0 { size } else { stride };
        if stride < size {
            return Err(R3dError::validation(format!(
                "attribute stride {stride} is smaller than element size {size}"
            )));
        }
        Ok(Self {
            bytes,
            stride,
            _elem: PhantomData,
        })
    }

    /// Distance between elements, bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of whole elements addressable through this view.
    pub fn len(&self) -> usize {
        let size = std::mem::size_of::<T>();
        if self.bytes.len() < size {
            0
        } else {
            (self.bytes.len() - size) / self.stride + 1
        }
    }

    /// `true` when no whole element fits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `idx`, or `None` past the end.
    pub fn get(&self, idx: usize) -> Option<T> {
        let start = idx.checked_mul(self.stride)?;
        let end = start.checked_add(std::mem::size_of::<T>())?;
        self.bytes.get(start..end).map(bytemuck::pod_read_unaligned)
    }
}

/// Geometry submitted to a backend in one draw call.
///
/// `count` is the number of primitives; the vertex count follows from
/// [`PrimitiveKind::vertices_per_primitive`]. With `indices` present, vertex
/// `i` of the draw is `vertices[indices[i]]`.
#[derive(Clone, Copy, Debug)]
pub struct Buffer<'a> {
    /// Vertex grouping.
    pub primitive: PrimitiveKind,
    /// Render switches.
    pub flags: BufferFlags,
    /// Point size or line width.
    pub width: f32,
    /// Number of primitives.
    pub count: usize,
    /// Positions; required whenever `count > 0`.
    pub vertices: Option<Attribute<'a, Dot4>>,
    /// Per-vertex normals.
    pub normals: Option<Attribute<'a, Vec4>>,
    /// Per-vertex colors.
    pub colors: Option<Attribute<'a, Color>>,
    /// Used for every vertex when `colors` is absent.
    pub default_color: Color,
    /// Packed vertex indices.
    pub indices: Option<&'a [u32]>,
}

impl<'a> Buffer<'a> {
    /// Unindexed buffer over packed `vertices`, as many whole primitives as fit.
    pub fn new(primitive: PrimitiveKind, vertices: &'a [Dot4]) -> Self {
        let per = primitive.vertices_per_primitive();
        Self {
            primitive,
            flags: BufferFlags::empty(),
            width: 1.0,
            count: vertices.len() / per,
            vertices: Some(Attribute::packed(vertices)),
            normals: None,
            colors: None,
            default_color: Color::WHITE,
            indices: None,
        }
    }

    /// Vertices the draw touches.
    pub fn vertex_count(&self) -> usize {
        self.count
            .saturating_mul(self.primitive.vertices_per_primitive())
    }

    /// Check that every present array covers the vertices the draw will touch.
    pub fn validate(&self) -> R3dResult<()> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(R3dError::validation(format!(
                "buffer width {} must be finite and non-negative",
                self.width
            )));
        }

        let verts = self.vertex_count();
        if verts == 0 {
            return Ok(());
        }
        let Some(vertices) = &self.vertices else {
            return Err(R3dError::bad_arguments("buffer has no vertex array"));
        };

        // Highest vertex slot referenced by the draw.
        let span = match self.indices {
            Some(indices) => {
                if indices.len() < verts {
                    return Err(R3dError::validation(format!(
                        "index array holds {} entries, draw needs {verts}",
                        indices.len()
                    )));
                }
                indices[..verts]
                    .iter()
                    .map(|&i| i as usize + 1)
                    .max()
                    .unwrap_or(0)
            }
            None => verts,
        };

        check_len("vertex", vertices.len(), span)?;
        if let Some(normals) = &self.normals {
            check_len("normal", normals.len(), span)?;
        }
        if let Some(colors) = &self.colors {
            check_len("color", colors.len(), span)?;
        }
        Ok(())
    }

    /// Color of vertex slot `idx`, falling back to the default color.
    pub fn color_at(&self, idx: usize) -> Color {
        self.colors
            .as_ref()
            .and_then(|c| c.get(idx))
            .unwrap_or(self.default_color)
    }
}

fn check_len(what: &str, have: usize, need: usize) -> R3dResult<()> {
    if have < need {
        return Err(R3dError::validation(format!(
            "{what} array holds {have} elements, draw needs {need}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geometry.rs"]
mod tests;

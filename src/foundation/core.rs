use crate::foundation::error::{R3dError, R3dResult};

/// 4x4 transform matrix, column-major, indexed `row + 4 * col`.
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Mat4 {
    /// Packed elements, column after column.
    pub m: [f32; 16],
}

impl Mat4 {
    /// All elements zero.
    pub const ZERO: Self = Self { m: [0.0; 16] };

    /// Multiplicative identity.
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Wrap 16 column-major elements.
    pub fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Element at `row`, `col` (both in `0..4`).
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.m[row + 4 * col]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// RGBA color, components nominally in `[0, 1]`.
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha, 1.0 is opaque.
    pub a: f32,
}

impl Color {
    /// Opaque black, the default background.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Build a color from its components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// `true` when no component is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Quantize to 8-bit channels, clamping out-of-range components.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn q(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A point in homogeneous space.
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Dot4 {
    #[allow(missing_docs)]
    pub x: f32,
    #[allow(missing_docs)]
    pub y: f32,
    #[allow(missing_docs)]
    pub z: f32,
    /// Homogeneous weight, 1.0 for positions.
    pub w: f32,
}

impl Dot4 {
    /// Build a point from its coordinates.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// A direction in homogeneous space.
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Vec4 {
    #[allow(missing_docs)]
    pub dx: f32,
    #[allow(missing_docs)]
    pub dy: f32,
    #[allow(missing_docs)]
    pub dz: f32,
    /// Homogeneous weight, 0.0 for directions.
    pub dw: f32,
}

impl Vec4 {
    /// Build a direction from its components.
    pub const fn new(dx: f32, dy: f32, dz: f32, dw: f32) -> Self {
        Self { dx, dy, dz, dw }
    }
}

/// Screen rectangle a backend renders into. Stored verbatim; `width` and
/// `height` may be zero or negative.
#[repr(C)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Viewport {
    /// Left edge, pixels.
    pub left: isize,
    /// Top edge, pixels.
    pub top: isize,
    /// Width, pixels.
    pub width: isize,
    /// Height, pixels.
    pub height: isize,
}

impl Viewport {
    /// Build a viewport rectangle.
    pub const fn new(left: isize, top: isize, width: isize, height: isize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Pixel extent usable for allocation; negative sizes map to zero.
    pub fn extent(self) -> (usize, usize) {
        (
            usize::try_from(self.width).unwrap_or(0),
            usize::try_from(self.height).unwrap_or(0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0, 0, 1, 1)
    }
}

/// Transform slot selector. The discriminants are the values exchanged with
/// hosts as a plain integer.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixKind {
    /// Camera-to-clip projection.
    Projection = 0,
    /// World-to-camera transform.
    View = 1,
    /// Extra model transform applied before the view.
    World = 2,
}

impl MatrixKind {
    /// Every kind, in wire order.
    pub const ALL: [Self; 3] = [Self::Projection, Self::View, Self::World];

    /// Wire integer for this kind.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for MatrixKind {
    type Error = R3dError;

    fn try_from(v: u32) -> R3dResult<Self> {
        match v {
            0 => Ok(Self::Projection),
            1 => Ok(Self::View),
            2 => Ok(Self::World),
            other => Err(R3dError::invalid_value(format!(
                "unknown matrix kind {other}"
            ))),
        }
    }
}

/// Native window handle family a backend can attach to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowHandleKind {
    /// X11 `Window`.
    X11,
    /// Win32 `HWND`.
    WinNt,
}

/// Pixel layout a backend produces on readback.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum PixelFormat {
    #[default]
    Rgba,
    Bgra,
    Rgb,
    Bgr,
}

impl PixelFormat {
    /// Bytes per pixel in this layout.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba | Self::Bgra => 4,
            Self::Rgb | Self::Bgr => 3,
        }
    }

    /// Write one RGBA8 pixel into `dst` using this layout. `dst` must hold
    /// exactly [`Self::bytes_per_pixel`] bytes.
    pub fn store(self, rgba: [u8; 4], dst: &mut [u8]) {
        let [r, g, b, a] = rgba;
        match self {
            Self::Rgba => dst.copy_from_slice(&[r, g, b, a]),
            Self::Bgra => dst.copy_from_slice(&[b, g, r, a]),
            Self::Rgb => dst.copy_from_slice(&[r, g, b]),
            Self::Bgr => dst.copy_from_slice(&[b, g, r]),
        }
    }

    /// Read one pixel in this layout back as RGBA8. Layouts without alpha
    /// come back opaque.
    pub fn load(self, src: &[u8]) -> [u8; 4] {
        match (self, src) {
            (Self::Rgba, &[r, g, b, a]) => [r, g, b, a],
            (Self::Bgra, &[b, g, r, a]) => [r, g, b, a],
            (Self::Rgb, &[r, g, b]) => [r, g, b, 255],
            (Self::Bgr, &[b, g, r]) => [r, g, b, 255],
            _ => [0, 0, 0, 0],
        }
    }

    /// Convert a tightly packed image in this layout to RGBA8. A trailing
    /// partial pixel is dropped.
    pub fn convert_to_rgba8(self, src: &[u8]) -> Vec<u8> {
        let bpp = self.bytes_per_pixel();
        let mut out = Vec::with_capacity(src.len() / bpp * 4);
        for px in src.chunks_exact(bpp) {
            out.extend_from_slice(&self.load(px));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

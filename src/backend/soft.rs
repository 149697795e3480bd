//! CPU reference backend.
//!
//! Keeps a float framebuffer the size of the viewport, clears it to the
//! background color on [`Backend::start`] and hands it back through
//! [`Backend::read_pixels`]. Draw calls are validated and counted but not
//! rasterized.

use crate::{
    backend::{api::Backend, state::BaseBackend},
    factory::registry::{BackendMetadata, Factory},
    foundation::{
        core::{Color, PixelFormat, WindowHandleKind},
        error::{R3dError, R3dResult},
        geometry::{Buffer, Light},
        math::swap_rows,
    },
};

/// Largest frame [`Backend::start`] will allocate, in pixels.
pub const MAX_FRAME_PIXELS: usize = 8192 * 8192;

/// Per-frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Accepted [`Backend::draw_primitives`] calls.
    pub draw_calls: usize,
    /// Primitives across those calls.
    pub primitives: usize,
    /// Vertices across those calls.
    pub vertices: usize,
    /// Lights bound when the frame started or last rebound.
    pub lights: usize,
}

/// Backend rendering into host memory.
pub struct SoftwareBackend {
    base: BaseBackend,
    window: WindowHandleKind,
    native_format: PixelFormat,
    // Rows stored bottom-up, like a GL default framebuffer.
    frame: Vec<Color>,
    width: usize,
    height: usize,
    lights: Vec<Light>,
    stats: FrameStats,
    in_frame: bool,
}

impl SoftwareBackend {
    /// Initialized backend for `window`, reading back natively in `native_format`.
    pub fn new(window: WindowHandleKind, native_format: PixelFormat) -> Self {
        Self {
            base: BaseBackend::new(),
            window,
            native_format,
            frame: Vec::new(),
            width: 0,
            height: 0,
            lights: Vec::new(),
            stats: FrameStats::default(),
            in_frame: false,
        }
    }

    /// Window system this instance was created for.
    pub fn window(&self) -> WindowHandleKind {
        self.window
    }

    /// Layout advertised for this instance.
    pub fn native_format(&self) -> PixelFormat {
        self.native_format
    }

    /// Framebuffer size as of the last [`Backend::start`].
    pub fn frame_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Counters of the current or last frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Lights last passed to [`Backend::set_lights`].
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Bytes [`Backend::read_pixels`] writes for `format`.
    pub fn pixel_bytes(&self, format: PixelFormat) -> usize {
        self.width * self.height * format.bytes_per_pixel()
    }
}

impl Backend for SoftwareBackend {
    fn base(&self) -> &BaseBackend {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseBackend {
        &mut self.base
    }

    fn init(&mut self) -> R3dResult<()> {
        self.base.init();
        self.frame.clear();
        self.width = 0;
        self.height = 0;
        self.lights.clear();
        self.stats = FrameStats::default();
        self.in_frame = false;
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        tracing::debug!(
            window = ?self.window,
            pixels = self.frame.len(),
            "software backend destroyed"
        );
    }

    fn start(&mut self) -> R3dResult<()> {
        let (width, height) = self.base.location().extent();
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= MAX_FRAME_PIXELS)
            .ok_or_else(|| {
                R3dError::validation(format!(
                    "viewport {width}x{height} exceeds {MAX_FRAME_PIXELS} pixels"
                ))
            })?;

        let mut frame = Vec::new();
        frame.try_reserve_exact(len).map_err(|err| {
            R3dError::validation(format!("cannot allocate {width}x{height} frame: {err}"))
        })?;
        frame.resize(len, self.base.bg_color());

        self.frame = frame;
        self.width = width;
        self.height = height;
        self.stats = FrameStats {
            lights: self.lights.len(),
            ..FrameStats::default()
        };
        self.in_frame = true;
        tracing::trace!(width, height, "frame started");
        Ok(())
    }

    fn set_lights(&mut self, lights: &[Light]) -> R3dResult<()> {
        self.lights.clear();
        self.lights.extend_from_slice(lights);
        self.stats.lights = lights.len();
        Ok(())
    }

    fn draw_primitives(&mut self, buffer: &Buffer<'_>) -> R3dResult<()> {
        if !self.in_frame {
            return Err(R3dError::validation("draw_primitives outside of a frame"));
        }
        buffer.validate()?;
        self.stats.draw_calls += 1;
        self.stats.primitives += buffer.count;
        self.stats.vertices += buffer.vertex_count();
        Ok(())
    }

    fn read_pixels(&mut self, buf: &mut [u8], format: PixelFormat) -> R3dResult<()> {
        let bpp = format.bytes_per_pixel();
        let need = self.pixel_bytes(format);
        if buf.len() < need {
            return Err(R3dError::validation(format!(
                "pixel buffer holds {} bytes, frame needs {need}",
                buf.len()
            )));
        }
        let out = &mut buf[..need];
        for (dst, px) in out.chunks_exact_mut(bpp).zip(&self.frame) {
            format.store(px.to_rgba8(), dst);
        }
        swap_rows(out, self.height, self.width * bpp)
    }

    fn finish(&mut self) -> R3dResult<()> {
        self.in_frame = false;
        Ok(())
    }
}

const SOFTWARE_BACKENDS: [BackendMetadata; 2] = [
    BackendMetadata {
        id: "soft_x11",
        display: "Software renderer (X11)",
        window: WindowHandleKind::X11,
        format: PixelFormat::Rgba,
    },
    BackendMetadata {
        id: "soft_winnt",
        display: "Software renderer (Windows)",
        window: WindowHandleKind::WinNt,
        format: PixelFormat::Bgra,
    },
];

/// Factory advertising the software backend for each supported window system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareFactory;

impl Factory for SoftwareFactory {
    fn name(&self) -> &str {
        "software"
    }

    fn metadata(&self, id: usize) -> Option<BackendMetadata> {
        SOFTWARE_BACKENDS.get(id).copied()
    }

    fn create(&self, id: usize) -> R3dResult<Box<dyn Backend>> {
        let meta = self
            .metadata(id)
            .ok_or_else(|| R3dError::not_found(format!("software backend #{id}")))?;
        tracing::debug!(id = meta.id, "creating software backend");
        Ok(Box::new(SoftwareBackend::new(meta.window, meta.format)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/soft.rs"]
mod tests;

use crate::{
    backend::state::BaseBackend,
    foundation::{
        core::{Color, Mat4, MatrixKind, PixelFormat},
        error::{R3dError, R3dResult},
        geometry::{Buffer, Light},
    },
};

/// The operation table every rendering backend provides.
///
/// State operations default to the embedded [`BaseBackend`]; a backend only
/// has to expose it through [`Backend::base`] / [`Backend::base_mut`] and
/// implement [`Backend::read_pixels`]. Anything else may be overridden, for
/// example to push a new projection to the device as it is set.
pub trait Backend: Send {
    /// Embedded state record.
    fn base(&self) -> &BaseBackend;

    /// Embedded state record, mutably.
    fn base_mut(&mut self) -> &mut BaseBackend;

    /// Reset transforms, viewport and background color.
    fn init(&mut self) -> R3dResult<()> {
        self.base_mut().init();
        Ok(())
    }

    /// Release the backend. The handle is consumed, so it cannot be used again.
    fn destroy(self: Box<Self>) {
        tracing::debug!("backend destroyed");
    }

    /// Set the viewport rectangle, stored without validation.
    fn locate(&mut self, left: isize, top: isize, width: isize, height: isize) -> R3dResult<()> {
        self.base_mut().locate(left, top, width, height);
        Ok(())
    }

    /// Write the requested viewport fields; `None` slots are skipped.
    fn get_location(
        &self,
        left: Option<&mut isize>,
        top: Option<&mut isize>,
        width: Option<&mut isize>,
        height: Option<&mut isize>,
    ) -> R3dResult<()> {
        self.base().get_location(left, top, width, height);
        Ok(())
    }

    /// Replace the `kind` transform. Fails with [`R3dError::BadArguments`] on `None`.
    fn set_matrix(&mut self, kind: MatrixKind, m: Option<&Mat4>) -> R3dResult<()> {
        self.base_mut().set_matrix(kind, m)
    }

    /// Read the `kind` transform into `out`.
    fn get_matrix(&self, kind: MatrixKind, out: Option<&mut Mat4>) -> R3dResult<()> {
        self.base().get_matrix(kind, out)
    }

    /// [`Backend::set_matrix`] with the kind given as its wire integer.
    fn set_matrix_raw(&mut self, kind: u32, m: Option<&Mat4>) -> R3dResult<()> {
        if m.is_none() {
            return Err(R3dError::bad_arguments("set_matrix: no matrix given"));
        }
        self.set_matrix(MatrixKind::try_from(kind)?, m)
    }

    /// [`Backend::get_matrix`] with the kind given as its wire integer.
    fn get_matrix_raw(&self, kind: u32, out: Option<&mut Mat4>) -> R3dResult<()> {
        if out.is_none() {
            return Err(R3dError::bad_arguments("get_matrix: no output slot"));
        }
        self.get_matrix(MatrixKind::try_from(kind)?, out)
    }

    /// Replace the background color.
    fn set_bg_color(&mut self, color: Option<&Color>) -> R3dResult<()> {
        self.base_mut().set_bg_color(color)
    }

    /// Read the background color into `out`.
    fn get_bg_color(&self, out: Option<&mut Color>) -> R3dResult<()> {
        self.base().get_bg_color(out)
    }

    /// Begin a frame.
    fn start(&mut self) -> R3dResult<()> {
        Ok(())
    }

    /// Bind the lights used by buffers drawn with [`crate::BufferFlags::LIGHTING`].
    fn set_lights(&mut self, _lights: &[Light]) -> R3dResult<()> {
        Ok(())
    }

    /// Submit geometry for the current frame.
    fn draw_primitives(&mut self, buffer: &Buffer<'_>) -> R3dResult<()> {
        buffer.validate()
    }

    /// Wait until submitted work is complete.
    fn sync(&mut self) -> R3dResult<()> {
        Ok(())
    }

    /// Copy the current frame into `buf`, top row first, in `format`.
    fn read_pixels(&mut self, buf: &mut [u8], format: PixelFormat) -> R3dResult<()>;

    /// End a frame.
    fn finish(&mut self) -> R3dResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/api.rs"]
mod tests;

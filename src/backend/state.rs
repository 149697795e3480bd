use crate::foundation::{
    core::{Color, Mat4, MatrixKind, Viewport},
    error::{R3dError, R3dResult},
    math,
};

/// Transform, viewport and clear-color bookkeeping shared by every backend.
///
/// Concrete backends hold one of these and delegate the state half of the
/// [`Backend`](crate::Backend) contract to it. Every setter is a flat copy; no
/// derived state is cached.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseBackend {
    projection: Mat4,
    view: Mat4,
    world: Mat4,
    background: Color,
    viewport: Viewport,
}

impl BaseBackend {
    /// A freshly initialized state, equivalent to calling [`Self::init`].
    pub fn new() -> Self {
        let mut state = Self {
            projection: Mat4::ZERO,
            view: Mat4::ZERO,
            world: Mat4::ZERO,
            background: Color::BLACK,
            viewport: Viewport::new(0, 0, 0, 0),
        };
        state.init();
        state
    }

    /// Reset matrices to identity, viewport to `(0, 0, 1, 1)` and the
    /// background to opaque black.
    pub fn init(&mut self) {
        self.viewport = Viewport::default();
        self.background = Color::BLACK;
        math::identity(&mut self.projection);
        math::identity(&mut self.view);
        math::identity(&mut self.world);
    }

    /// Store the viewport rectangle verbatim. No range checks are made.
    pub fn locate(&mut self, left: isize, top: isize, width: isize, height: isize) {
        tracing::trace!(left, top, width, height, "locate");
        self.viewport = Viewport::new(left, top, width, height);
    }

    /// Current viewport.
    pub fn location(&self) -> Viewport {
        self.viewport
    }

    /// Write the requested viewport fields; absent slots are skipped.
    pub fn get_location(
        &self,
        left: Option<&mut isize>,
        top: Option<&mut isize>,
        width: Option<&mut isize>,
        height: Option<&mut isize>,
    ) {
        let vp = self.viewport;
        if let Some(left) = left {
            *left = vp.left;
        }
        if let Some(top) = top {
            *top = vp.top;
        }
        if let Some(width) = width {
            *width = vp.width;
        }
        if let Some(height) = height {
            *height = vp.height;
        }
    }

    /// Stored transform of `kind`.
    pub fn matrix(&self, kind: MatrixKind) -> &Mat4 {
        match kind {
            MatrixKind::Projection => &self.projection,
            MatrixKind::View => &self.view,
            MatrixKind::World => &self.world,
        }
    }

    fn matrix_mut(&mut self, kind: MatrixKind) -> &mut Mat4 {
        match kind {
            MatrixKind::Projection => &mut self.projection,
            MatrixKind::View => &mut self.view,
            MatrixKind::World => &mut self.world,
        }
    }

    /// Copy `m` into the `kind` slot. `None` is rejected with
    /// [`R3dError::BadArguments`] and changes nothing.
    pub fn set_matrix(&mut self, kind: MatrixKind, m: Option<&Mat4>) -> R3dResult<()> {
        let m = m.ok_or_else(|| R3dError::bad_arguments("set_matrix: no matrix given"))?;
        tracing::trace!(?kind, "set_matrix");
        *self.matrix_mut(kind) = *m;
        Ok(())
    }

    /// Copy the `kind` slot into `out`.
    pub fn get_matrix(&self, kind: MatrixKind, out: Option<&mut Mat4>) -> R3dResult<()> {
        let out = out.ok_or_else(|| R3dError::bad_arguments("get_matrix: no output slot"))?;
        *out = *self.matrix(kind);
        Ok(())
    }

    /// `projection * view * world`, the full object-to-clip transform.
    pub fn combined(&self) -> Mat4 {
        self.projection * self.view * self.world
    }

    /// Current background color.
    pub fn bg_color(&self) -> Color {
        self.background
    }

    /// Copy `color` into the background slot.
    pub fn set_bg_color(&mut self, color: Option<&Color>) -> R3dResult<()> {
        let color =
            color.ok_or_else(|| R3dError::bad_arguments("set_bg_color: no color given"))?;
        tracing::trace!(?color, "set_bg_color");
        self.background = *color;
        Ok(())
    }

    /// Copy the background color into `out`.
    pub fn get_bg_color(&self, out: Option<&mut Color>) -> R3dResult<()> {
        let out = out.ok_or_else(|| R3dError::bad_arguments("get_bg_color: no output slot"))?;
        *out = self.background;
        Ok(())
    }
}

impl Default for BaseBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/state.rs"]
mod tests;

use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    backend::api::Backend,
    foundation::{
        core::{Color, PixelFormat, Viewport},
        error::{R3dError, R3dResult},
    },
};

/// Host-side defaults applied to a freshly created backend.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSettings {
    /// Initial viewport.
    pub viewport: Viewport,
    /// Clear color.
    pub background: Color,
    /// Layout requested by [`Self::read_pixels`].
    pub pixel_format: PixelFormat,
}

impl BackendSettings {
    /// Parse and validate settings from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(s: &str) -> R3dResult<Self> {
        let settings: Self =
            serde_json::from_str(s).map_err(|e| R3dError::serde(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// [`Self::from_json_str`] over the contents of `path`.
    pub fn from_json_file(path: &Path) -> R3dResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open settings '{}'", path.display()))?;
        let settings: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| R3dError::serde(format!("{}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> R3dResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| R3dError::serde(e.to_string()))
    }

    /// Reject negative viewport sizes and non-finite colors.
    pub fn validate(&self) -> R3dResult<()> {
        if self.viewport.width < 0 || self.viewport.height < 0 {
            return Err(R3dError::validation(format!(
                "viewport size {}x{} must not be negative",
                self.viewport.width, self.viewport.height
            )));
        }
        if !self.background.is_finite() {
            return Err(R3dError::validation("background color must be finite"));
        }
        Ok(())
    }

    /// Push viewport and background color into `backend`.
    pub fn apply(&self, backend: &mut dyn Backend) -> R3dResult<()> {
        let vp = self.viewport;
        backend.locate(vp.left, vp.top, vp.width, vp.height)?;
        backend.set_bg_color(Some(&self.background))
    }

    /// Read the current frame of `backend` in [`Self::pixel_format`], sized by
    /// the configured viewport.
    pub fn read_pixels(&self, backend: &mut dyn Backend) -> R3dResult<Vec<u8>> {
        let (width, height) = self.viewport.extent();
        let len = width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(self.pixel_format.bytes_per_pixel()))
            .ok_or_else(|| {
                R3dError::validation(format!("{width}x{height} pixel buffer overflows"))
            })?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(len).map_err(|err| {
            R3dError::validation(format!("cannot allocate {len}-byte pixel buffer: {err}"))
        })?;
        buf.resize(len, 0);
        backend.read_pixels(&mut buf, self.pixel_format)?;
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;

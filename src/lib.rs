//! r3d is the seam between a host application and swappable 3D rendering
//! backends.
//!
//! # Overview
//!
//! - **Value types**: [`Mat4`], [`Color`], [`Viewport`] and the geometry
//!   records ([`Buffer`], [`Light`]) passed to draw operations.
//! - **Base state**: [`BaseBackend`] tracks projection/view/world transforms,
//!   the viewport and the clear color. Backends embed it and delegate.
//! - **Operation table**: the [`Backend`] trait. Every backend implements it;
//!   state operations default to the embedded [`BaseBackend`].
//! - **Discovery**: [`Factory`] implementations are registered in a
//!   [`Registry`] (or the process-wide one via [`register`]) and probed id by
//!   id for [`BackendMetadata`].
//!
//! A host typically calls [`register_builtin_factories`] plus any of its own
//! `register` calls at startup, then [`discover`]s backends, picks one and
//! calls [`DiscoveredBackend::create`]. The backend is released with
//! [`Backend::destroy`].
//!
//! Everything is synchronous and single-threaded per backend instance.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod backend;
mod factory;
mod foundation;
mod settings;

pub use backend::api::Backend;
pub use backend::soft::{FrameStats, MAX_FRAME_PIXELS, SoftwareBackend, SoftwareFactory};
pub use backend::state::BaseBackend;
pub use factory::builtin::register_builtin_factories;
pub use factory::registry::{
    BackendMetadata, DiscoveredBackend, FACTORY_FUNCTION_NAME, FACTORY_VERSION_NAME, Factory,
    INTERFACE_VERSION, Registry, Version, discover, factories, register, with_registry,
};
pub use foundation::core::{
    Color, Dot4, Mat4, MatrixKind, PixelFormat, Vec4, Viewport, WindowHandleKind,
};
pub use foundation::error::{R3dError, R3dResult};
pub use foundation::geometry::{
    Attribute, Buffer, BufferFlags, Light, LightKind, PrimitiveKind,
};
pub use foundation::math::{identity, multiply, swap_rows};
pub use settings::BackendSettings;

use super::*;
use crate::foundation::core::{Dot4, Viewport};
use crate::foundation::geometry::PrimitiveKind;

/// Backend that only carries the base state and records overridden calls.
#[derive(Default)]
struct MockBackend {
    base: BaseBackend,
    projections_pushed: usize,
}

impl Backend for MockBackend {
    fn base(&self) -> &BaseBackend {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseBackend {
        &mut self.base
    }

    fn set_matrix(&mut self, kind: MatrixKind, m: Option<&Mat4>) -> R3dResult<()> {
        self.base.set_matrix(kind, m)?;
        if kind == MatrixKind::Projection {
            self.projections_pushed += 1;
        }
        Ok(())
    }

    fn read_pixels(&mut self, buf: &mut [u8], _format: PixelFormat) -> R3dResult<()> {
        buf.fill(0);
        Ok(())
    }
}

#[test]
fn defaults_delegate_to_base_state() {
    let mut b = MockBackend::default();
    b.locate(10, 20, 800, 600).unwrap();
    assert_eq!(b.base().location(), Viewport::new(10, 20, 800, 600));

    let (mut w, mut h) = (0, 0);
    b.get_location(None, None, Some(&mut w), Some(&mut h))
        .unwrap();
    assert_eq!((w, h), (800, 600));

    let c = Color::rgba(0.1, 0.2, 0.3, 1.0);
    b.set_bg_color(Some(&c)).unwrap();
    let mut out = Color::BLACK;
    b.get_bg_color(Some(&mut out)).unwrap();
    assert_eq!(out, c);

    b.init().unwrap();
    assert_eq!(b.base().location(), Viewport::new(0, 0, 1, 1));
    assert_eq!(b.base().bg_color(), Color::BLACK);
}

#[test]
fn overrides_are_dispatched_through_trait_objects() {
    let mut boxed: Box<dyn Backend> = Box::new(MockBackend::default());
    let m = Mat4::from_cols_array([2.0; 16]);
    boxed.set_matrix(MatrixKind::Projection, Some(&m)).unwrap();
    boxed.set_matrix_raw(1, Some(&m)).unwrap();

    let mut out = Mat4::ZERO;
    boxed.get_matrix_raw(0, Some(&mut out)).unwrap();
    assert_eq!(out, m);
    boxed.get_matrix(MatrixKind::World, Some(&mut out)).unwrap();
    assert_eq!(out, Mat4::IDENTITY);

    boxed.destroy();
}

#[test]
fn raw_kind_out_of_range_is_invalid_value() {
    let mut b = MockBackend::default();
    let m = Mat4::IDENTITY;
    let garbage = Mat4::from_cols_array([5.0; 16]);
    assert!(matches!(
        b.set_matrix_raw(3, Some(&garbage)),
        Err(R3dError::InvalidValue(_))
    ));
    for kind in MatrixKind::ALL {
        assert_eq!(*b.base().matrix(kind), m);
    }
    assert_eq!(b.projections_pushed, 0);
    let mut out = Mat4::ZERO;
    assert!(matches!(
        b.get_matrix_raw(u32::MAX, Some(&mut out)),
        Err(R3dError::InvalidValue(_))
    ));
    assert_eq!(out, Mat4::ZERO);
}

#[test]
fn raw_absent_value_is_checked_before_kind() {
    let mut b = MockBackend::default();
    assert!(matches!(
        b.set_matrix_raw(9, None),
        Err(R3dError::BadArguments(_))
    ));
    assert!(matches!(
        b.get_matrix_raw(9, None),
        Err(R3dError::BadArguments(_))
    ));
    assert_eq!(b.projections_pushed, 0);
}

#[test]
fn default_draw_validates_buffer() {
    let mut b = MockBackend::default();
    let v = [Dot4::new(0.0, 0.0, 0.0, 1.0); 3];
    let mut buf = Buffer::new(PrimitiveKind::Triangles, &v);
    b.start().unwrap();
    b.draw_primitives(&buf).unwrap();
    buf.count = 5;
    assert!(b.draw_primitives(&buf).is_err());
    b.set_lights(&[Light::default()]).unwrap();
    b.sync().unwrap();
    b.finish().unwrap();
}

use super::*;
use crate::backend::soft::SoftwareBackend;

/// Factory advertising one backend per entry of `ids`.
struct TestFactory {
    name: &'static str,
    ids: &'static [&'static str],
    window: WindowHandleKind,
    format: PixelFormat,
    version: Version,
}

impl TestFactory {
    fn new(name: &'static str, ids: &'static [&'static str]) -> Self {
        Self {
            name,
            ids,
            window: WindowHandleKind::X11,
            format: PixelFormat::Rgba,
            version: INTERFACE_VERSION,
        }
    }
}

impl Factory for TestFactory {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> Version {
        self.version
    }

    fn metadata(&self, id: usize) -> Option<BackendMetadata> {
        self.ids.get(id).map(|&bid| BackendMetadata {
            id: bid,
            display: bid,
            window: self.window,
            format: self.format,
        })
    }

    fn create(&self, id: usize) -> R3dResult<Box<dyn Backend>> {
        let meta = self
            .metadata(id)
            .ok_or_else(|| R3dError::not_found(format!("{} #{id}", self.name)))?;
        Ok(Box::new(SoftwareBackend::new(meta.window, meta.format)))
    }
}

fn names(reg: &Registry) -> Vec<String> {
    reg.factories().map(|f| f.name().to_string()).collect()
}

#[test]
fn enumeration_is_most_recent_first() {
    let mut reg = Registry::new();
    assert!(reg.is_empty());
    reg.register(Arc::new(TestFactory::new("f1", &["a"]))).unwrap();
    reg.register(Arc::new(TestFactory::new("f2", &["b"]))).unwrap();
    reg.register(Arc::new(TestFactory::new("f3", &["c"]))).unwrap();

    assert_eq!(reg.len(), 3);
    assert_eq!(names(&reg), vec!["f3", "f2", "f1"]);
}

#[test]
fn discover_probes_ids_until_absent() {
    let mut reg = Registry::new();
    reg.register(Arc::new(TestFactory::new("gl", &["gl2", "gl3"])))
        .unwrap();
    reg.register(Arc::new(TestFactory::new("empty", &[]))).unwrap();
    reg.register(Arc::new(TestFactory::new("dx", &["dx9"]))).unwrap();

    let found: Vec<_> = reg
        .discover()
        .into_iter()
        .map(|b| (b.metadata.id, b.index))
        .collect();
    assert_eq!(found, vec![("dx9", 0), ("gl2", 0), ("gl3", 1)]);
}

#[test]
fn find_creates_the_named_backend() {
    let mut reg = Registry::new();
    reg.register(Arc::new(TestFactory::new("gl", &["gl2", "gl3"])))
        .unwrap();

    let entry = reg.find("gl3").unwrap();
    assert_eq!(entry.index, 1);
    assert_eq!(entry.factory.name(), "gl");
    let backend = entry.create().unwrap();
    backend.destroy();

    assert!(matches!(reg.find("vk"), Err(R3dError::NotFound(_))));
}

#[test]
fn select_filters_by_window_and_prefers_format() {
    let mut reg = Registry::new();
    let mut nt = TestFactory::new("nt", &["nt_rgba"]);
    nt.window = WindowHandleKind::WinNt;
    reg.register(Arc::new(nt)).unwrap();

    let mut bgra = TestFactory::new("x_bgra", &["x_bgra"]);
    bgra.format = PixelFormat::Bgra;
    reg.register(Arc::new(TestFactory::new("x_rgba", &["x_rgba"])))
        .unwrap();
    reg.register(Arc::new(bgra)).unwrap();

    let first = reg.select(WindowHandleKind::X11, None).unwrap();
    assert_eq!(first.metadata.id, "x_bgra");
    let rgba = reg
        .select(WindowHandleKind::X11, Some(PixelFormat::Rgba))
        .unwrap();
    assert_eq!(rgba.metadata.id, "x_rgba");
    let fallback = reg
        .select(WindowHandleKind::WinNt, Some(PixelFormat::Bgr))
        .unwrap();
    assert_eq!(fallback.metadata.id, "nt_rgba");

    assert!(Registry::new().select(WindowHandleKind::X11, None).is_none());
}

#[test]
fn incompatible_interface_version_is_rejected() {
    let mut reg = Registry::new();
    let mut old = TestFactory::new("old", &["old"]);
    old.version = Version::new(INTERFACE_VERSION.major + 1, 0, 0);
    assert!(matches!(
        reg.register(Arc::new(old)),
        Err(R3dError::Validation(_))
    ));
    assert!(reg.is_empty());

    let mut newer_minor = TestFactory::new("minor", &["minor"]);
    newer_minor.version = Version::new(INTERFACE_VERSION.major, 9, 1);
    reg.register(Arc::new(newer_minor)).unwrap();
}

#[test]
fn version_displays_dotted() {
    assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
}

#[test]
fn global_registry_accepts_registration() {
    register(Arc::new(TestFactory::new("global_probe", &["global_probe_0"])))
        .unwrap();

    assert!(factories().iter().any(|f| f.name() == "global_probe"));
    assert!(
        discover()
            .iter()
            .any(|b| b.metadata.id == "global_probe_0")
    );
    assert!(with_registry(|r| r.find("global_probe_0").is_ok()));
}

static WRITER_FACTORIES: [[&str; 4]; 2] = [
    ["w0-0", "w0-1", "w0-2", "w0-3"],
    ["w1-0", "w1-1", "w1-2", "w1-3"],
];

/// Positions of `writer`'s factories in `order` follow reverse registration.
fn assert_writer_order(order: &[&str], writer: &[&str]) {
    let positions: Vec<_> = writer
        .iter()
        .filter_map(|name| order.iter().position(|n| n == name))
        .collect();
    assert!(
        positions.windows(2).all(|w| w[0] > w[1]),
        "{order:?} for {writer:?}"
    );
}

#[test]
fn concurrent_registration_and_discovery_stay_consistent() {
    let reg = parking_lot::RwLock::new(Registry::new());

    std::thread::scope(|s| {
        for writer in &WRITER_FACTORIES {
            let reg = &reg;
            s.spawn(move || {
                for &name in writer {
                    reg.write()
                        .register(Arc::new(TestFactory::new(name, &["lo", "hi"])))
                        .unwrap();
                    std::thread::yield_now();
                }
            });
        }
        for _ in 0..4 {
            let reg = &reg;
            s.spawn(move || {
                for _ in 0..200 {
                    let guard = reg.read();
                    let found = guard.discover();
                    assert_eq!(found.len(), 2 * guard.len());
                    for pair in found.chunks_exact(2) {
                        assert_eq!(pair[0].factory.name(), pair[1].factory.name());
                        assert_eq!((pair[0].index, pair[1].index), (0, 1));
                        assert_eq!(
                            (pair[0].metadata.id, pair[1].metadata.id),
                            ("lo", "hi")
                        );
                    }
                    let order: Vec<_> =
                        found.iter().step_by(2).map(|b| b.factory.name()).collect();
                    for writer in &WRITER_FACTORIES {
                        assert_writer_order(&order, writer);
                    }
                }
            });
        }
    });

    let reg = reg.into_inner();
    assert_eq!(reg.len(), 8);
    let order: Vec<_> = reg.factories().map(|f| f.name()).collect();
    for writer in &WRITER_FACTORIES {
        assert_writer_order(&order, writer);
        assert!(writer.iter().all(|name| order.contains(name)));
    }
}

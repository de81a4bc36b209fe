use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "imgseq_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn directory_source_loads_png() {
    let tmp = temp_dir("dir_source");
    std::fs::create_dir_all(tmp.join("seq")).unwrap();
    let img = image::RgbaImage::from_raw(2, 1, vec![255u8, 0, 0, 255, 0, 255, 0, 255]).unwrap();
    img.save(tmp.join("seq").join("f0.png")).unwrap();

    let src = DirectorySource::new(&tmp);
    let loaded = src.load("seq\\f0.png").unwrap();
    assert_eq!((loaded.width(), loaded.height()), (2, 1));
    assert!(matches!(src.load("seq/missing.png"), Err(SeqError::Source(_))));
    assert!(src.load("../escape.png").is_err());

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn memory_source_round_trips() {
    let mut src = MemorySource::new().with("a", image::DynamicImage::new_rgba8(3, 2));
    assert_eq!(src.load("a").unwrap().width(), 3);
    assert!(src.remove("a"));
    assert!(src.load("a").is_err());
}

#[test]
fn placeholder_is_a_fixed_checkerboard() {
    let p = placeholder_image();
    assert_eq!(p.dimensions(), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
    assert_eq!(p.get_pixel(0, 0).0, [1.0, 0.0, 1.0, 1.0]);
    assert_eq!(p.get_pixel(2, 0).0, [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(placeholder_image(), p);
}

#[test]
fn normalize_path_cross_platform() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

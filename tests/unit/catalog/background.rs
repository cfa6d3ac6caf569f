use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "glasscard_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"clip").unwrap();
}

#[test]
fn existing_override_bypasses_the_cache() {
    let root = temp_dir("catalog_override");
    touch(&root.join("tech/a.mp4"));
    let custom = root.join("elsewhere/clip.mp4");
    touch(&custom);

    let catalog = BackgroundCatalog::new(&root, Some(1));
    let picked = catalog
        .select_background(Category::Tech, Some(&custom))
        .unwrap();
    assert_eq!(picked.path, custom);
    assert_eq!(picked.category, None);
    assert_eq!(catalog.cached_len(Category::Tech), None);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn override_wins_even_when_category_is_empty() {
    let root = temp_dir("catalog_override_empty");
    let custom = root.join("custom_clip.mov");
    touch(&custom);

    let catalog = BackgroundCatalog::new(&root, None);
    let picked = catalog
        .select_background(Category::Tech, Some(&custom))
        .unwrap();
    assert_eq!(picked.path, custom);
    assert_eq!(catalog.cached_len(Category::Tech), None);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_override_falls_back_to_category() {
    let root = temp_dir("catalog_missing_override");
    touch(&root.join("nature/river.mp4"));

    let catalog = BackgroundCatalog::new(&root, Some(3));
    let picked = catalog
        .select_background(Category::Nature, Some(Path::new("/definitely/not/here.mp4")))
        .unwrap();
    assert_eq!(picked.category, Some(Category::Nature));
    assert_eq!(catalog.cached_len(Category::Nature), Some(1));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn scan_filters_extensions_and_sorts() {
    let root = temp_dir("catalog_scan");
    touch(&root.join("urban/b.MP4"));
    touch(&root.join("urban/a.webm"));
    touch(&root.join("urban/notes.txt"));

    let catalog = BackgroundCatalog::new(&root, Some(0));
    let list = catalog.assets(Category::Urban).unwrap();
    let names: Vec<_> = list
        .iter()
        .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.webm", "b.MP4"]);
    assert!(list.iter().all(|a| a.byte_size == 4));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn seeded_selection_is_deterministic() {
    let root = temp_dir("catalog_seeded");
    for i in 0..8 {
        touch(&root.join(format!("business/clip{i}.mp4")));
    }

    let pick = |seed| {
        let catalog = BackgroundCatalog::new(&root, Some(seed));
        (0..5)
            .map(|_| catalog.select_background(Category::Business, None).unwrap().path)
            .collect::<Vec<_>>()
    };
    assert_eq!(pick(42), pick(42));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn vanished_clip_falls_back_within_category() {
    let root = temp_dir("catalog_vanished");
    touch(&root.join("tech/a.mp4"));
    touch(&root.join("tech/b.mp4"));

    let catalog = BackgroundCatalog::new(&root, Some(9));
    assert_eq!(catalog.assets(Category::Tech).unwrap().len(), 2);
    std::fs::remove_file(root.join("tech/a.mp4")).unwrap();

    for _ in 0..5 {
        let picked = catalog.select_background(Category::Tech, None).unwrap();
        assert_eq!(picked.path, root.join("tech/b.mp4"));
    }

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn empty_category_falls_back_to_any_category() {
    let root = temp_dir("catalog_cross");
    touch(&root.join("abstract/swirl.mp4"));

    let catalog = BackgroundCatalog::new(&root, Some(5));
    let picked = catalog.select_background(Category::Tech, None).unwrap();
    assert_eq!(picked.category, Some(Category::Abstract));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn nothing_anywhere_is_an_error() {
    let root = temp_dir("catalog_empty");
    std::fs::create_dir_all(&root).unwrap();

    let catalog = BackgroundCatalog::new(&root, Some(5));
    let err = catalog.select_background(Category::Nature, None).unwrap_err();
    assert!(matches!(err, GlassError::NoBackgroundAvailable(_)));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn empty_lists_are_rescanned_and_invalidate_forces_rescan() {
    let root = temp_dir("catalog_rescan");
    std::fs::create_dir_all(&root).unwrap();

    let catalog = BackgroundCatalog::new(&root, Some(5));
    assert_eq!(catalog.assets(Category::Nature).unwrap().len(), 0);
    touch(&root.join("nature/lake.mp4"));
    assert_eq!(catalog.assets(Category::Nature).unwrap().len(), 1);

    touch(&root.join("nature/sea.mp4"));
    assert_eq!(catalog.assets(Category::Nature).unwrap().len(), 1);
    catalog.invalidate(Category::Nature);
    assert_eq!(catalog.cached_len(Category::Nature), None);
    assert_eq!(catalog.assets(Category::Nature).unwrap().len(), 2);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn warm_scans_all_classifiable_categories() {
    let root = temp_dir("catalog_warm");
    touch(&root.join("tech/a.mp4"));
    touch(&root.join("nature/b.mp4"));
    touch(&root.join("custom/c.mp4"));

    let catalog = BackgroundCatalog::new(&root, Some(5));
    assert_eq!(catalog.warm().unwrap(), 2);
    assert_eq!(catalog.cached_len(Category::Urban), Some(0));
    assert_eq!(catalog.cached_len(Category::Custom), None);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn concurrent_lookups_agree() {
    let root = temp_dir("catalog_concurrent");
    for i in 0..4 {
        touch(&root.join(format!("tech/{i}.mp4")));
    }

    let catalog = std::sync::Arc::new(BackgroundCatalog::new(&root, Some(11)));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let catalog = std::sync::Arc::clone(&catalog);
            std::thread::spawn(move || catalog.assets(Category::Tech).unwrap().len())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 4);
    }

    std::fs::remove_dir_all(&root).ok();
}

#[cfg(unix)]
#[test]
fn symlinked_clips_are_listed_and_selected() {
    let root = temp_dir("catalog_symlink");
    let real = root.join("store/loop.mp4");
    touch(&real);
    std::fs::create_dir_all(root.join("tech")).unwrap();
    std::os::unix::fs::symlink(&real, root.join("tech/loop.mp4")).unwrap();
    std::os::unix::fs::symlink(root.join("store/gone.mp4"), root.join("tech/dangling.mp4"))
        .unwrap();

    let catalog = BackgroundCatalog::new(&root, Some(2));
    let list = catalog.assets(Category::Tech).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].path, root.join("tech/loop.mp4"));
    assert_eq!(list[0].byte_size, 4);

    let picked = catalog.select_background(Category::Tech, None).unwrap();
    assert_eq!(picked.category, Some(Category::Tech));

    std::fs::remove_dir_all(&root).ok();
}

#[cfg(unix)]
#[test]
fn unreadable_category_does_not_block_other_categories() {
    use std::os::unix::fs::PermissionsExt as _;

    let root = temp_dir("catalog_unreadable");
    touch(&root.join("tech/locked.mp4"));
    touch(&root.join("abstract/open.mp4"));
    let locked = root.join("tech");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users read through the mode bits.
    let enforced = std::fs::read_dir(&locked).is_err();

    let catalog = BackgroundCatalog::new(&root, Some(4));
    let requested = catalog.select_background(Category::Tech, None);
    let other = catalog.select_background(Category::Nature, None);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    let requested = requested.unwrap();
    let other = other.unwrap();
    if enforced {
        assert_eq!(requested.category, Some(Category::Abstract));
        assert_eq!(other.category, Some(Category::Abstract));
        assert!(catalog.assets(Category::Tech).is_ok());
    } else {
        assert_eq!(requested.category, Some(Category::Tech));
    }

    std::fs::remove_dir_all(&root).ok();
}

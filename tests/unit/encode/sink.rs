use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("linkcard-sink-{tag}-{}", std::process::id()))
}

#[test]
fn in_memory_sink_records_saves_in_order() {
    let mut sink = InMemorySink::new();
    sink.save("a.png", &[1, 2]).unwrap();
    sink.save("b.png", &[3]).unwrap();
    assert_eq!(sink.files().len(), 2);
    assert_eq!(sink.files()[0], ("a.png".to_string(), vec![1, 2]));
    assert_eq!(sink.files()[1].0, "b.png");
}

#[test]
fn dir_sink_creates_directory_and_writes() {
    let dir = scratch_dir("write").join("nested");
    let _ = std::fs::remove_dir_all(&dir);
    let mut sink = DirSink::new(&dir);
    sink.save("Card_Memories.png", b"png").unwrap();

    let path = dir.join("Card_Memories.png");
    assert_eq!(std::fs::read(&path).unwrap(), b"png");
    assert_eq!(sink.saved(), [path]);
    let _ = std::fs::remove_dir_all(scratch_dir("write"));
}

#[test]
fn dir_sink_rejects_path_like_names() {
    let mut sink = DirSink::new(scratch_dir("reject"));
    for name in ["", "../x.png", "a/b.png", ".."] {
        let err = sink.save(name, b"x").unwrap_err();
        assert!(matches!(err, CardError::Validation(_)), "{name}");
    }
    assert!(sink.saved().is_empty());
}

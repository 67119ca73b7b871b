use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use treelister::{
    CancelToken, FailureKind, LineSink, RootError, TraversalOutcome, WalkOptionsBuilder, walk,
    walk_with,
};
fn line(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
/// Every path's parent appears earlier, and everything between the parent and
/// the path belongs to the parent's subtree.
fn assert_preorder(root: &Path, lines: &[String]) {
    assert_eq!(lines[0], line(root));
    for (i, current) in lines.iter().enumerate().skip(1) {
        let current = PathBuf::from(current);
        let parent = current.parent().unwrap();
        let j = lines
            .iter()
            .position(|l| Path::new(l) == parent)
            .unwrap_or_else(|| panic!("parent of {} never emitted", current.display()));
        assert!(j < i, "{} emitted before its parent", current.display());
        for between in &lines[j + 1..i] {
            assert!(
                Path::new(between).starts_with(parent),
                "{} interleaved into the subtree of {}",
                between,
                parent.display()
            );
        }
    }
}
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}
impl LineSink for Recorder {
    fn on_line(&mut self, line: &str) {
        self.events.push(line.to_owned());
    }
    fn on_complete(&mut self, _outcome: &TraversalOutcome) {
        self.events.push("<complete>".to_owned());
    }
}
#[test]
fn test_small_tree_in_preorder() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("x.txt"), "x").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub/y.txt"), "y").unwrap();
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk(root, &mut lines);
    assert!(outcome.is_success());
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], line(root));
    let pos = |p: PathBuf| lines.iter().position(|l| *l == line(&p)).unwrap();
    assert!(pos(root.join("sub")) < pos(root.join("sub/y.txt")));
    assert!(lines.contains(&line(&root.join("x.txt"))));
    let stats = outcome.stats();
    assert_eq!(stats.directories, 2);
    assert_eq!(stats.files, 2);
}
#[test]
fn test_deep_tree_is_valid_preorder() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for sub in ["a/b/c", "a/d", "e/f", "g"] {
        fs::create_dir_all(root.join(sub)).unwrap();
    }
    for file in ["a/1.txt", "a/b/2.txt", "a/b/c/3.txt", "a/d/4.txt", "e/f/5.txt", "6.txt"] {
        fs::write(root.join(file), file).unwrap();
    }
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk(root, &mut lines);
    assert!(outcome.is_success());
    assert_eq!(lines.len(), 14);
    assert_preorder(root, &lines);
}
#[test]
fn test_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk(&missing, &mut lines);
    assert!(lines.is_empty());
    assert_eq!(
        outcome,
        TraversalOutcome::Failed {
            error: RootError::NotFound { path: missing }
        }
    );
}
#[test]
fn test_file_root() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "plain").unwrap();
    let mut recorder = Recorder::default();
    let outcome = walk(&file, &mut recorder);
    assert!(matches!(
        outcome.root_error(),
        Some(RootError::NotADirectory { .. })
    ));
    assert_eq!(recorder.events, vec!["<complete>"]);
}
#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("open/inner")).unwrap();
    fs::write(root.join("open/inner/a.txt"), "a").unwrap();
    fs::create_dir(root.join("locked")).unwrap();
    fs::write(root.join("locked/hidden.txt"), "h").unwrap();
    fs::write(root.join("top.txt"), "t").unwrap();
    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Running with privileges that ignore permission bits.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk(root, &mut lines);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, locked);
    assert_eq!(failures[0].kind, FailureKind::Io);
    assert!(!outcome.is_success());
    assert!(lines.contains(&line(&locked)));
    assert!(!lines.contains(&line(&locked.join("hidden.txt"))));
    for expected in ["open", "open/inner", "open/inner/a.txt", "top.txt"] {
        assert!(lines.contains(&line(&root.join(expected))), "missing {}", expected);
    }
    assert_preorder(root, &lines);
}
#[test]
fn test_repeat_walks_see_same_paths() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::write(root.join("a/b/c.txt"), "c").unwrap();
    fs::write(root.join("d.txt"), "d").unwrap();
    let mut first: Vec<String> = Vec::new();
    let mut second: Vec<String> = Vec::new();
    walk(root, &mut first);
    walk(root, &mut second);
    first.sort();
    second.sort();
    assert_eq!(first, second);
}
#[test]
fn test_sort_entries_orders_siblings() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("c.txt"), "c").unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::create_dir(root.join("m")).unwrap();
    fs::write(root.join("m/z.txt"), "z").unwrap();
    fs::write(root.join("b.txt"), "b").unwrap();
    let options = WalkOptionsBuilder::new(root).sort_entries(true).build();
    let mut lines: Vec<String> = Vec::new();
    walk_with(&options, &mut lines, &CancelToken::new());
    let expected: Vec<String> = ["", "a.txt", "b.txt", "c.txt", "m", "m/z.txt"]
        .iter()
        .map(|p| if p.is_empty() { line(root) } else { line(&root.join(p)) })
        .collect();
    assert_eq!(lines, expected);
}
struct CancelAfter {
    limit: usize,
    token: CancelToken,
    lines: Vec<String>,
}
impl LineSink for CancelAfter {
    fn on_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
        if self.lines.len() == self.limit {
            self.token.cancel();
        }
    }
}
#[test]
fn test_cancel_stops_emitting() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for i in 0..10 {
        fs::write(root.join(format!("{}.txt", i)), "n").unwrap();
    }
    let token = CancelToken::new();
    let mut sink = CancelAfter {
        limit: 3,
        token: token.clone(),
        lines: Vec::new(),
    };
    let options = WalkOptionsBuilder::new(root).build();
    let outcome = walk_with(&options, &mut sink, &token);
    assert!(outcome.is_cancelled());
    assert_eq!(sink.lines.len(), 3);
    assert_eq!(outcome.stats().total(), 3);
}
#[test]
fn test_pre_cancelled_walk_emits_nothing() {
    let dir = tempdir().unwrap();
    let token = CancelToken::new();
    token.cancel();
    let mut recorder = Recorder::default();
    let options = WalkOptionsBuilder::new(dir.path()).build();
    let outcome = walk_with(&options, &mut recorder, &token);
    assert!(outcome.is_cancelled());
    assert_eq!(recorder.events, vec!["<complete>"]);
}
#[test]
fn test_completion_is_last_and_once() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/f.txt"), "f").unwrap();
    let mut recorder = Recorder::default();
    walk(dir.path(), &mut recorder);
    let completions = recorder.events.iter().filter(|e| *e == "<complete>").count();
    assert_eq!(completions, 1);
    assert_eq!(recorder.events.last().unwrap(), "<complete>");
    assert_eq!(recorder.events.len(), 4);
}
#[cfg(unix)]
#[test]
fn test_symlink_loop_is_reported_once() {
    use std::os::unix::fs::symlink;
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("a")).unwrap();
    fs::write(root.join("a/f.txt"), "f").unwrap();
    symlink(root, root.join("a/back")).unwrap();
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk(root, &mut lines);
    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, root.join("a/back"));
    assert_eq!(
        failures[0].kind,
        FailureKind::SymlinkLoop {
            ancestor: root.to_path_buf()
        }
    );
    assert_eq!(lines.len(), 3);
    assert!(!lines.contains(&line(&root.join("a/back"))));
}
#[cfg(unix)]
#[test]
fn test_symlink_listed_when_not_followed() {
    use std::os::unix::fs::symlink;
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("target")).unwrap();
    fs::write(root.join("target/t.txt"), "t").unwrap();
    symlink(root.join("target"), root.join("link")).unwrap();
    let options = WalkOptionsBuilder::new(root).follow_links(false).build();
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk_with(&options, &mut lines, &CancelToken::new());
    assert!(outcome.is_success());
    assert!(lines.contains(&line(&root.join("link"))));
    assert!(!lines.contains(&line(&root.join("link/t.txt"))));
    assert_eq!(lines.len(), 4);
}
#[cfg(unix)]
#[test]
fn test_followed_symlink_descends() {
    use std::os::unix::fs::symlink;
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("target")).unwrap();
    fs::write(root.join("target/t.txt"), "t").unwrap();
    symlink(root.join("target"), root.join("link")).unwrap();
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk(root, &mut lines);
    assert!(outcome.is_success());
    assert!(lines.contains(&line(&root.join("link/t.txt"))));
    assert_eq!(outcome.stats().directories, 3);
}
#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_a_failure() {
    use std::os::unix::fs::symlink;
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("ok.txt"), "ok").unwrap();
    symlink(root.join("gone"), root.join("dangling")).unwrap();
    let mut lines: Vec<String> = Vec::new();
    let outcome = walk(root, &mut lines);
    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, root.join("dangling"));
    assert_eq!(failures[0].kind, FailureKind::Io);
    assert_eq!(lines, vec![line(root), line(&root.join("ok.txt"))]);
}
/// Removes a directory when a given line arrives, so the walk meets it after
/// it was queued but before it is listed.
struct RemoveOnLine {
    trigger: String,
    doomed: PathBuf,
    lines: Vec<String>,
}
impl LineSink for RemoveOnLine {
    fn on_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
        if line == self.trigger {
            fs::remove_dir_all(&self.doomed).unwrap();
        }
    }
}
#[test]
fn test_vanished_subdirectory_is_skipped() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("a")).unwrap();
    fs::create_dir_all(root.join("m/inner")).unwrap();
    fs::create_dir(root.join("z")).unwrap();
    fs::write(root.join("z/k.txt"), "k").unwrap();
    let mut sink = RemoveOnLine {
        trigger: line(&root.join("a")),
        doomed: root.join("m"),
        lines: Vec::new(),
    };
    let options = WalkOptionsBuilder::new(root).sort_entries(true).build();
    let outcome = walk_with(&options, &mut sink, &CancelToken::new());
    let failures = outcome.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, root.join("m"));
    assert_eq!(failures[0].kind, FailureKind::Io);
    assert!(!outcome.is_cancelled());
    assert_eq!(outcome.exit_status(), 2);
    let mut expected = vec![line(root)];
    for rel in ["a", "m", "z", "z/k.txt"] {
        expected.push(line(&root.join(rel)));
    }
    assert_eq!(sink.lines, expected);
    assert_preorder(root, &sink.lines);
}

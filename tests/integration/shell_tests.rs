use dupsweep::duplicates::{FinderConfig, SortOrder};
use dupsweep::scanner::WalkerConfig;
use dupsweep::shell::{SessionState, Shell, ShellOptions};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

fn session(
    root: &Path,
    script: &str,
    config: FinderConfig,
    options: ShellOptions,
) -> (dupsweep::shell::SessionOutcome, String) {
    let mut shell = Shell::new(Cursor::new(script.to_string()), Vec::new(), config, options);
    let outcome = shell.run(root).unwrap();
    (outcome, String::from_utf8(shell.into_output()).unwrap())
}

#[test]
fn test_transcript_of_full_session() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let c = dir.path().join("c.txt");
    fs::write(&a, b"XXXXXXXXXX").unwrap();
    fs::write(&b, b"XXXXXXXXXX").unwrap();
    fs::write(&c, b"YYYYYYYYYY").unwrap();
    fs::write(dir.path().join("d.txt"), b"ZZZZZ").unwrap();

    let hash = blake3::hash(b"XXXXXXXXXX").to_hex().to_string();
    let (outcome, text) = session(
        dir.path(),
        "\n1\nyes\nyes\n2\n",
        FinderConfig::default(),
        ShellOptions::default(),
    );

    let expected = format!(
        "Enter file format:\n\
         Size sorting options:\n1. Descending\n2. Ascending\n\
         Enter a sorting option:\n\
         \n10 bytes\n{a}\n{b}\n{c}\n\
         \nCheck for duplicates?\n\
         \n10 bytes\nHash: {hash}\n1. {a}\n2. {b}\n\
         \nDelete files?\n\
         \nEnter file numbers to delete:\n\
         \nTotal freed up space: 10 bytes\n",
        a = a.display(),
        b = b.display(),
        c = c.display(),
    );
    assert_eq!(text, expected);
    assert_eq!(outcome.state, SessionState::Deleted);
    assert_eq!(outcome.freed, 10);
    assert!(!b.exists());
}

#[test]
fn test_invalid_selection_is_reprompted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();

    let (outcome, text) = session(
        dir.path(),
        "\n2\nyes\nyes\n3\n\n1\n",
        FinderConfig::default(),
        ShellOptions::default(),
    );

    assert_eq!(text.matches("Enter file numbers to delete:").count(), 3);
    assert_eq!(text.matches("Wrong format").count(), 2);
    assert_eq!(outcome.freed, 3);
    assert!(!dir.path().join("a").exists());
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_ascending_listing_and_suffix_answer() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("s1.jpg"), b"ab").unwrap();
    fs::write(dir.path().join("s2.jpg"), b"ab").unwrap();
    fs::write(dir.path().join("l1.jpg"), b"abcd").unwrap();
    fs::write(dir.path().join("l2.jpg"), b"abcd").unwrap();
    fs::write(dir.path().join("l1.png"), b"abcd").unwrap();

    let (outcome, text) = session(
        dir.path(),
        ".jpg\n2\nyes\nno\n",
        FinderConfig::default(),
        ShellOptions::default(),
    );

    assert_eq!(outcome.state, SessionState::Grouped);
    assert!(!text.contains(".png"));
    let small = text.find("\n2 bytes\n").unwrap();
    let large = text.find("\n4 bytes\n").unwrap();
    assert!(small < large);
    assert!(text.contains(&format!("3. {}", dir.path().join("l1.jpg").display())));
}

#[test]
fn test_hidden_files_skipped_when_configured() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("visible"), b"same").unwrap();
    fs::write(dir.path().join(".hidden"), b"same").unwrap();

    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::default().with_skip_hidden(true));
    let options = ShellOptions {
        suffix: Some(String::new()),
        order: Some(SortOrder::Descending),
        ..Default::default()
    };
    let (outcome, text) = session(dir.path(), "yes\n", config, options);

    assert_eq!(outcome.state, SessionState::Grouped);
    assert!(!text.contains(".hidden"));
    assert!(text.contains("No duplicates found"));
}

#[test]
fn test_parallel_session_numbers_like_sequential() {
    let dir = tempdir().unwrap();
    for i in 0..8 {
        fs::write(dir.path().join(format!("f{i}")), format!("{}", i % 2)).unwrap();
    }

    let script = "\n1\nyes\nno\n";
    let (_, sequential) = session(
        dir.path(),
        script,
        FinderConfig::default(),
        ShellOptions::default(),
    );
    let (_, parallel) = session(
        dir.path(),
        script,
        FinderConfig::default().with_io_threads(3),
        ShellOptions::default(),
    );

    assert_eq!(sequential, parallel);
}

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use restyle::rules::{resolve, RuleSet, RuleSpec};
use restyle::{BatchRewriter, FileStatus, Targets};

fn body_rule() -> RuleSpec {
    RuleSpec::regex("body-class", r#"<body class="[^"]*">"#, "<body>")
}

fn page_container_rule() -> RuleSpec {
    RuleSpec::literal(
        "page-container",
        r#"<div class="flex min-h-screen">"#,
        r#"<div class="page-container">"#,
    )
}

fn rewriter(root: &Path, specs: &[RuleSpec]) -> BatchRewriter {
    BatchRewriter::new(root, RuleSet::compile(specs).unwrap()).unwrap()
}

fn write(root: &Path, name: &str, content: &str) {
    fs::write(root.join(name), content).unwrap();
}

fn read(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join(name)).unwrap()
}

#[test]
fn test_body_class_stripped_exactly() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "index.html",
        r#"<body class="bg-white text-gray-800 antialiased">"#,
    );

    let report = rewriter(temp.path(), &[body_rule()]).run(&["index.html"]);

    assert_eq!(report.updated, 1);
    assert_eq!(read(temp.path(), "index.html"), "<body>");
}

#[test]
fn test_page_container_rest_unchanged() {
    let temp = TempDir::new().unwrap();
    let before = "<main>\n<div class=\"flex min-h-screen\">\n<p class=\"flex\">x</p>\n</div>\n</main>\n";
    write(temp.path(), "index.html", before);

    rewriter(temp.path(), &[page_container_rule()]).run(&["index.html"]);

    assert_eq!(
        read(temp.path(), "index.html"),
        "<main>\n<div class=\"page-container\">\n<p class=\"flex\">x</p>\n</div>\n</main>\n"
    );
}

#[test]
fn test_no_match_leaves_bytes_and_mtime() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("plain.html");
    fs::write(&path, "<p>nothing utility-ish here</p>\n").unwrap();
    let before = fs::metadata(&path).unwrap().modified().unwrap();

    let report = rewriter(temp.path(), &[body_rule(), page_container_rule()]).run(&["plain.html"]);

    assert_eq!(report.files[0].status, FileStatus::Unchanged);
    assert_eq!(report.updated, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "<p>nothing utility-ish here</p>\n");
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);
}

#[test]
fn test_one_missing_file_others_processed() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.html", r#"<body class="x">"#);
    write(temp.path(), "c.html", r#"<body class="y">"#);

    let report = rewriter(temp.path(), &[body_rule()]).run(&["a.html", "b.html", "c.html"]);

    let missing: Vec<_> = report
        .files
        .iter()
        .filter(|f| f.status == FileStatus::Missing)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].path, Path::new("b.html"));
    assert!(!temp.path().join("b.html").exists());
    assert_eq!(report.updated, 2);
    assert_eq!(read(temp.path(), "c.html"), "<body>");
}

#[test]
fn test_errors_do_not_stop_the_batch() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.html", r#"<body class="x">"#);
    fs::write(temp.path().join("broken.html"), [0xff, 0xfe, 0x3c]).unwrap();
    fs::create_dir(temp.path().join("dir.html")).unwrap();
    write(temp.path(), "z.html", r#"<body class="z">"#);

    let report =
        rewriter(temp.path(), &[body_rule()]).run(&["a.html", "broken.html", "dir.html", "z.html"]);

    assert_eq!(report.updated, 2);
    assert_eq!(report.errored, 2);
    assert!(report.has_errors());
    let statuses: Vec<_> = report.files.iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        vec![
            FileStatus::Updated,
            FileStatus::Errored,
            FileStatus::Errored,
            FileStatus::Updated
        ]
    );
    assert!(report.files[1]
        .message
        .as_deref()
        .unwrap_or_default()
        .contains("UTF-8"));
    assert_eq!(
        fs::read(temp.path().join("broken.html")).unwrap(),
        vec![0xff, 0xfe, 0x3c]
    );
    assert_eq!(read(temp.path(), "z.html"), "<body>");
}

#[test]
fn test_second_run_is_noop() {
    let temp = TempDir::new().unwrap();
    let page = r#"<!DOCTYPE html>
<html>
<head>
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="stylesheet" href="styles.css">
</head>
<body class="bg-white text-gray-800 antialiased">
    <div class="flex min-h-screen">
        <main class="flex-1 ml-[280px]">
            <p class="text-gray-700 mb-6">Hello</p>
        </main>
    </div>
</body>
</html>
"#;
    write(temp.path(), "index.html", page);

    let rewriter = BatchRewriter::new(temp.path(), resolve(&["html"]).unwrap()).unwrap();

    let first = rewriter.run(&["index.html"]);
    assert_eq!(first.updated, 1);
    let after_first = read(temp.path(), "index.html");
    assert!(after_first.contains(r#"href="css/main.css""#));
    assert!(after_first.contains(r#"<p class="paragraph">Hello</p>"#));

    let second = rewriter.run(&["index.html"]);
    assert_eq!(second.unchanged, 1);
    assert_eq!(read(temp.path(), "index.html"), after_first);
}

#[test]
fn test_rule_order_matters() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "one.html", r#"<div class="flex min-h-screen">"#);
    write(temp.path(), "two.html", r#"<div class="flex min-h-screen">"#);

    // Only matches text produced by the page-container rule.
    let follow_up = RuleSpec::literal(
        "page-container-id",
        r#"<div class="page-container">"#,
        r#"<div class="page-container" id="page">"#,
    );

    let forward = RuleSet::compile(&[page_container_rule(), follow_up]).unwrap();
    let backward = RuleSet::compile(&[follow_up, page_container_rule()]).unwrap();
    let input = r#"<div class="flex min-h-screen">"#;
    assert_ne!(forward.apply(input).text, backward.apply(input).text);

    let report = BatchRewriter::new(temp.path(), forward).unwrap().run(&["one.html"]);
    assert_eq!(report.updated, 1);
    assert_eq!(
        read(temp.path(), "one.html"),
        r#"<div class="page-container" id="page">"#
    );

    // In reverse order a second pass would fire the follow-up rule, so the
    // file is rejected rather than written.
    let report = BatchRewriter::new(temp.path(), backward).unwrap().run(&["two.html"]);
    assert_eq!(report.errored, 1);
    assert_eq!(read(temp.path(), "two.html"), r#"<div class="flex min-h-screen">"#);
}

#[test]
fn test_discovered_targets_skip_templates() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "faq.html", r#"<body class="x">"#);
    write(temp.path(), "UNIFIED_NAV_TEMPLATE.html", r#"<body class="x">"#);

    let files = Targets::glob("*.html").resolve(temp.path()).unwrap();
    let report = rewriter(temp.path(), &[body_rule()]).run(files.as_slice());

    assert_eq!(report.total(), 1);
    assert_eq!(
        read(temp.path(), "UNIFIED_NAV_TEMPLATE.html"),
        r#"<body class="x">"#
    );
}

#[test]
fn test_invalid_rule_fails_before_touching_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.html", r#"<body class="x">"#);

    let err = RuleSet::compile(&[body_rule(), RuleSpec::regex("bad", "([", "")]).unwrap_err();

    assert!(err.is_config());
    assert_eq!(read(temp.path(), "a.html"), r#"<body class="x">"#);
}

#[cfg(unix)]
#[test]
fn test_write_failure_leaves_file_and_continues() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write(&locked, "a.html", r#"<body class="x">"#);
    write(temp.path(), "z.html", r#"<body class="z">"#);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Permission bits are not enforced for privileged users.
    if fs::write(locked.join("check.tmp"), "").is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        eprintln!("skipping: directory permissions not enforced for this user");
        return;
    }

    let report = rewriter(temp.path(), &[body_rule()]).run(&["locked/a.html", "z.html"]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.files[0].status, FileStatus::Errored);
    assert!(report.files[0]
        .message
        .as_deref()
        .unwrap_or_default()
        .contains("IO error"));
    assert_eq!(read(&locked, "a.html"), r#"<body class="x">"#);
    assert_eq!(report.files[1].status, FileStatus::Updated);
    assert_eq!(read(temp.path(), "z.html"), "<body>");
}

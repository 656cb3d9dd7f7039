//! End-to-end and golden test suite for epointer-core.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_package() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("epointer_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn dir_arg(dir: &Path) -> String {
    dir.display().to_string()
}

/// Runs the pipeline over in-memory sources and returns the method text.
fn methods_for(sources: &[(&str, &str)]) -> String {
    let package = package_from_sources("/virtual", sources).unwrap();
    let groups = analyze_package(&package).unwrap();
    emit_methods(&groups)
}

fn method(ty: &str) -> String {
    accessor_method(ty)
}

// ============================================================================
// Golden cases
// ============================================================================

struct Golden {
    name: &'static str,
    input: &'static str,
    output: &'static str,
}

const INT_ENUM_IN: &str = "type Day int
const (
\tMonday Day = iota
\tTuesday
\tWednesday
\tThursday
\tFriday
\tSaturday
\tSunday
)
";

const INT_ENUM_OUT: &str = "
func (i Day) Pointer() *Day {
\treturn &i
}
";

const STR_ENUM_IN: &str = "
type Status string
const (
\tOK Status = \"ok\"
\tNotOK Status = \"not ok\"
)
";

const STR_ENUM_OUT: &str = "
func (i Status) Pointer() *Status {
\treturn &i
}
";

const CONV_ENUM_IN: &str = "
type Conv int

const (
\tAlpha = Conv(alpha)
\tBeta  = Conv(beta)
\tGamma = Conv(gamma)
\tDelta = Conv(delta)
)
";

const CONV_ENUM_OUT: &str = "
func (i Conv) Pointer() *Conv {
\treturn &i
}
";

const MIXED_ENUMS_IN: &str = "
type Status string

const (
\tposStart = iota
\tposMiddle
\tposEnd
)

type Weekend int

var (
\tSaturday Weekend = iota
\tSunday
)

const (
\tOK Status = \"ok\"
\tNotOK Status = \"not ok\"
)
";

const MIXED_ENUMS_OUT: &str = "
func (i Status) Pointer() *Status {
\treturn &i
}
";

const GOLDEN: &[Golden] = &[
    Golden { name: "int_enum", input: INT_ENUM_IN, output: INT_ENUM_OUT },
    Golden { name: "str_enum", input: STR_ENUM_IN, output: STR_ENUM_OUT },
    Golden { name: "conv_enum", input: CONV_ENUM_IN, output: CONV_ENUM_OUT },
    Golden { name: "mixed_enums", input: MIXED_ENUMS_IN, output: MIXED_ENUMS_OUT },
];

#[test]
fn test_golden() {
    let dir = setup_temp_package();
    for golden in GOLDEN {
        let file = dir.join(format!("{}.go", golden.name));
        write_file(&file, &format!("package test\n{}", golden.input));

        let generation = Epointer::new([file.display().to_string()])
            .output(dir.join(DEFAULT_OUTPUT_NAME))
            .generate()
            .unwrap();
        let methods = emit_methods(&generation.groups);
        assert_eq!(methods, golden.output, "{}: unexpected output", golden.name);
    }
    fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Package-level behavior
// ============================================================================

const NUMBER_GO: &str = "package main

import \"fmt\"

type Number int

const (
\t_ Number = iota
\tOne
\tTwo
\tThree
\tAnotherOne = One
)

func main() {
\tck(One)
\tck(Two)
\tck(Three)
\tck(AnotherOne)
\tck(127)
}

func ck(num Number) {
\tif *num.Pointer() != num {
\t\tpanic(fmt.Sprint(\"number.go: \", *num.Pointer()))
\t}
}
";

const MIXED_GO: &str = "package main

import \"fmt\"

type (
\tStatus string
\tUnum   uint8
)

const (
\tStatusOK    Status = \"OK\"
\tm2          Unum   = 1
\tStatusError Status = \"ERROR\"
\tm1          Unum   = 2
)

func main() {
\tckStatus(StatusOK)
\tckUnum(m1)
}

func ckStatus(status Status) {
\tif *status.Pointer() != status {
\t\tpanic(fmt.Sprint(\"mixed.go: \", *status.Pointer()))
\t}
}

func ckUnum(unum Unum) {
\tif *unum.Pointer() != unum {
\t\tpanic(fmt.Sprint(\"mixed.go: \", *unum.Pointer()))
\t}
}
";

const CONV_GO: &str = "package main

type Other int // Imagine this is in another package.

const (
\talpha Other = iota
\tbeta
\tgamma
\tdelta
)

type Conv int

const (
\tAlpha = Conv(alpha)
\tBeta  = Conv(beta)
\tGamma = Conv(gamma)
\tDelta = Conv(delta)
)
";

const CGO_GO: &str = "// Import \"C\" shouldn't be imported.

package main

/*
#define HELLO 1
*/
import \"C\"
import \"fmt\"

type Cgo uint32

const (
\t// MustScanSubDirs indicates that events were coalesced hierarchically.
\tMustScanSubDirs Cgo = 1 << iota
)

func main() {
\t_ = C.HELLO
\tck(MustScanSubDirs)
}

func ck(cgo Cgo) {
\tif *cgo.Pointer() != cgo {
\t\tpanic(fmt.Sprintf(\"cgo.go: %v\", *cgo.Pointer()))
\t}
}
";

#[test]
fn test_discard_and_alias_constant() {
    let package = package_from_sources("/virtual", &[("number.go", NUMBER_GO)]).unwrap();
    let groups = analyze_package(&package).unwrap();
    assert_eq!(groups.type_names(), vec!["Number"]);
    assert_eq!(
        groups.get("Number").unwrap().constants,
        vec!["One", "Two", "Three", "AnotherOne"]
    );
    assert_eq!(emit_methods(&groups), method("Number"));
}

#[test]
fn test_mixed_types_in_first_encounter_order() {
    assert_eq!(
        methods_for(&[("mixed.go", MIXED_GO)]),
        format!("{}{}", method("Status"), method("Unum"))
    );
}

#[test]
fn test_conversion_wins_over_argument_type() {
    let package = package_from_sources("/virtual", &[("conv.go", CONV_GO)]).unwrap();
    let groups = analyze_package(&package).unwrap();
    assert_eq!(groups.type_names(), vec!["Other", "Conv"]);
    assert_eq!(
        groups.get("Conv").unwrap().constants,
        vec!["Alpha", "Beta", "Gamma", "Delta"]
    );
    assert_eq!(
        groups.get("Other").unwrap().constants,
        vec!["alpha", "beta", "gamma", "delta"]
    );
}

#[test]
fn test_cgo_output_has_no_imports() {
    let dir = setup_temp_package();
    write_file(&dir.join("cgo.go"), CGO_GO);

    let generation = Epointer::new([dir_arg(&dir)])
        .invocation(dir_arg(&dir))
        .write()
        .unwrap();
    let written = fs::read_to_string(dir.join(DEFAULT_OUTPUT_NAME)).unwrap();
    assert_eq!(written, generation.source);
    assert!(written.starts_with("// Code generated by \"epointer "));
    assert!(written.contains("\npackage main\n"));
    assert!(!written.contains("import"));
    assert!(written.ends_with(&method("Cgo")));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_untyped_constants_only_gives_header() {
    let dir = setup_temp_package();
    write_file(
        &dir.join("pos.go"),
        "package pos\nconst (\n\tposStart = iota\n\tposMiddle\n\tposEnd\n)\n",
    );
    let generation = Epointer::new([dir_arg(&dir)]).generate().unwrap();
    assert!(!generation.has_methods());
    assert_eq!(generation.source, file_header("pos", ""));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_no_constants_gives_header_only() {
    assert_eq!(
        methods_for(&[("main.go", "package main\nfunc main() {}\n")]),
        ""
    );
}

#[test]
fn test_var_declarations_ignored() {
    let out = methods_for(&[(
        "w.go",
        "package p\ntype Weekend int\nvar (\n\tSaturday Weekend = iota\n\tSunday\n)\n",
    )]);
    assert_eq!(out, "");
}

#[test]
fn test_constants_across_files() {
    let out = methods_for(&[
        ("b.go", "package p\nconst (\n\tRed Color = iota\n\tGreen\n)\n"),
        ("a.go", "package p\ntype Color int\ntype Size int\nconst Small Size = 1\n"),
    ]);
    assert_eq!(out, format!("{}{}", method("Size"), method("Color")));
}

#[test]
fn test_output_is_deterministic() {
    let dir = setup_temp_package();
    write_file(&dir.join("mixed.go"), MIXED_GO);
    write_file(&dir.join("number.go"), NUMBER_GO);

    let first = Epointer::new([dir_arg(&dir)]).generate().unwrap().source;
    for _ in 0..5 {
        let again = Epointer::new([dir_arg(&dir)]).generate().unwrap().source;
        assert_eq!(first, again);
    }
    fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Build tags
// ============================================================================

const TAG_MAIN_GO: &str = "package main

type Visible int

const (
\tShown Visible = iota
)

func main() {}
";

const TAG_TAG_GO: &str = "//go:build tag

package main

type ProtectedConst int

const (
\tHidden ProtectedConst = iota
)
";

#[test]
fn test_tags_select_files() {
    let dir = setup_temp_package();
    write_file(&dir.join("tag_main.go"), TAG_MAIN_GO);
    write_file(&dir.join("tag_tag.go"), TAG_TAG_GO);
    let output = dir.join(DEFAULT_OUTPUT_NAME);

    Epointer::new([dir_arg(&dir)]).write().unwrap();
    let untagged = fs::read_to_string(&output).unwrap();
    assert!(untagged.contains("Visible"));
    assert!(!untagged.contains("ProtectedConst"), "tagged type appears in untagged run");

    fs::remove_file(&output).unwrap();
    Epointer::new([dir_arg(&dir)]).tags(["tag"]).write().unwrap();
    let tagged = fs::read_to_string(&output).unwrap();
    assert!(tagged.contains("ProtectedConst"), "tagged type does not appear in tagged run");
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_previous_output_is_not_input() {
    let dir = setup_temp_package();
    write_file(&dir.join("day.go"), &format!("package test\n{}", INT_ENUM_IN));
    write_file(
        &dir.join(DEFAULT_OUTPUT_NAME),
        "package test\ntype Stale int\nconst Old Stale = 1\n",
    );

    let generation = Epointer::new([dir_arg(&dir)]).write().unwrap();
    assert_eq!(generation.groups.type_names(), vec!["Day"]);
    assert!(!generation.write_to_disk().unwrap(), "unchanged output is not rewritten");
    fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_resolution_failure_writes_nothing() {
    let dir = setup_temp_package();
    write_file(
        &dir.join("bad.go"),
        "package bad\nimport \"C\"\nconst (\n\tA = C.VALUE\n\tB\n)\n",
    );

    let err = Epointer::new([dir_arg(&dir)]).write().unwrap_err();
    match &err {
        EpointerError::Resolution { name, line, .. } => {
            assert_eq!(name, "B");
            assert_eq!(*line, 5);
        }
        other => panic!("expected resolution error, got {:?}", other),
    }
    assert!(!err.is_input_error());
    assert!(!dir.join(DEFAULT_OUTPUT_NAME).exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_syntax_error_aborts() {
    let dir = setup_temp_package();
    write_file(&dir.join("broken.go"), "package p\nconst (\n\tA = \n");

    let err = Epointer::new([dir_arg(&dir)]).generate().unwrap_err();
    assert!(matches!(err, EpointerError::Parse { .. }));
    assert!(err.is_input_error());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_directory() {
    let dir = setup_temp_package();
    let err = Epointer::new([dir_arg(&dir)]).generate().unwrap_err();
    assert!(matches!(err, EpointerError::NoSourceFiles { .. }));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_mismatched_packages() {
    let dir = setup_temp_package();
    write_file(&dir.join("a.go"), "package a\n");
    write_file(&dir.join("b.go"), "package b\n");
    let err = Epointer::new([dir_arg(&dir)]).generate().unwrap_err();
    assert!(matches!(err, EpointerError::PackageMismatch { .. }));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_config_file_in_package_dir() {
    let dir = setup_temp_package();
    write_file(
        &dir.join(CONFIG_FILE_NAME),
        "tags = [\"tag\"]\n[output]\nfile = \"ptr_gen.go\"\n",
    );
    let cfg = load_config(&dir).unwrap().unwrap();
    assert_eq!(cfg.tags(), ["tag"]);
    assert_eq!(cfg.output_file(), Some("ptr_gen.go"));

    write_file(&dir.join(CONFIG_FILE_NAME), "tags = 3\n");
    assert!(load_config(&dir).is_err());
    fs::remove_dir_all(&dir).ok();
}

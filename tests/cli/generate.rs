use std::fs;

use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const THING: &str = r#"syntax = "proto3";

package foo.bar;

message Thing_KEYS {
    string name = 1;
}

message Thing {
    uint32 count = 1;
}
"#;

const BAZ: &str = r#"syntax = "proto3";

package baz;

message Baz {
    string name = 1;
}
"#;

fn two_file_project() -> Result<CliTest> {
    let test = CliTest::with_file("staging/foo/thing.proto", THING)?;
    test.write_file("staging/baz/baz.proto", BAZ)?;
    Ok(test)
}

#[test]
fn test_generate_plugins() -> Result<()> {
    let test = two_file_project()?;

    let output = test
        .generate_command()
        .args(["--plugin", "--plugin-all", "all.so"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Reading protos from: staging\n"));
    assert!(out.contains("warning: skipping plugin build for baz.proto  no-key-message\n"));
    assert!(out.contains("Wrote 1 plugin stub\n"));
    assert!(out.contains("with 1 symbol entry\n"));
    assert!(out.ends_with("Done.\n"));

    let root = test.root().display().to_string();
    let stub = test.read_file("proto_go/foo/plugin/thing.plugin.go")?;
    assert_eq!(
        stub,
        format!(
            "//go:generate go build -buildmode=plugin -o {root}/proto_go/foo/plugin/thing.so {root}/proto_go/foo/plugin/thing.plugin.go\n\
             \n\
             package main\n\
             \n\
             import (\n\
             \t. \"..\"\n\
             )\n\
             \n\
             var PluginMsg_KEYS Thing_KEYS\n\
             var PluginMsg Thing\n"
        )
    );
    assert!(!test.root().join("proto_go/baz/plugin").exists());

    let aggregate = test.read_file("plugin.go")?;
    assert_eq!(
        aggregate,
        "//go:generate go build -buildmode=plugin -o all.so plugin.go\n\
         \n\
         package main\n\
         \n\
         import (\n\
         \tfoo_bar \"./proto_go/foo\"\n\
         )\n\
         \n\
         var KEYS_foo_bar foo_bar.Thing_KEYS\n\
         var CONTENT_foo_bar foo_bar.Thing\n"
    );

    // The file without a key message still gets its directive.
    let baz_log = test.read_file("proto_go/baz/gen.go")?;
    assert!(baz_log.starts_with("package baz\n"));
    assert!(baz_log.contains(&format!(
        "//go:generate protoc --go_out=plugins=grpc:{root}/proto_go/baz -I{root}/proto_go/baz baz.proto\n"
    )));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_generate_links_relative() -> Result<()> {
    let test = two_file_project()?;

    test.generate_command().output()?;

    let link = test.root().join("proto_go/foo/thing.proto");
    assert_eq!(
        fs::read_link(&link)?,
        std::path::PathBuf::from("../../staging/foo/thing.proto")
    );
    assert_eq!(fs::read_to_string(&link)?, THING);

    Ok(())
}

#[test]
fn test_generate_twice_is_idempotent() -> Result<()> {
    let test = two_file_project()?;

    let first = test.generate_command().arg("--plugin").output()?;
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    let log_before = test.read_file("proto_go/foo/gen.go")?;

    let second = test.generate_command().arg("--plugin").output()?;
    assert!(second.status.success(), "stderr: {}", stderr(&second));

    let out = stdout(&second);
    assert!(out.contains("Linked 2 proto files (0 new, 2 existing)\n"));
    assert!(out.contains("Added 0 go:generate directives (2 already present)\n"));
    assert_eq!(test.read_file("proto_go/foo/gen.go")?, log_before);

    Ok(())
}

#[test]
fn test_generate_respects_exceptions() -> Result<()> {
    let test = CliTest::with_file("staging/dpm_oper_if.proto", THING)?;
    test.write_file("staging/ok.proto", BAZ)?;

    let output = test.generate_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(stdout(&output).contains("Linked 1 proto file (1 new, 0 existing)\n"));
    assert!(!test.root().join("proto_go/dpm_oper_if.proto").exists());

    Ok(())
}

#[test]
fn test_generate_with_config_and_overrides() -> Result<()> {
    let test = CliTest::with_file(
        ".protoplugrc.json",
        r#"{ "sourceRoot": "protos", "exceptions": [] }"#,
    )?;
    test.write_file("protos/dpm_oper_if.proto", BAZ)?;

    let output = test.generate_command().args(["--dst", "out/"]).output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert!(test.root().join("out/dpm_oper_if.proto").exists());
    assert!(test.root().join("out/gen.go").exists());

    Ok(())
}

#[test]
fn test_generate_missing_source_dir() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.generate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Source directory does not exist"));

    Ok(())
}

#[test]
fn test_generate_toolchain_failure() -> Result<()> {
    let test = two_file_project()?;
    test.write_file(
        ".protoplugrc.json",
        r#"{ "generateCommand": ["protoplug-definitely-not-a-program"] }"#,
    )?;

    let output = test.command().args(["generate", "--plugin"]).output()?;

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("error: `protoplug-definitely-not-a-program` did not run clean"));
    assert!(out.contains("hint: protoc must be in PATH"));
    assert!(out.ends_with("Done.\n"));
    // Work done before the failure stays.
    assert!(
        test.root()
            .join("proto_go/foo/plugin/thing.plugin.go")
            .exists()
    );

    Ok(())
}

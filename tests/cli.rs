use std::error::Error;
use std::fs;
use std::process::{Command, Output};
use tempfile::tempdir;

const SEPARATOR: &str = "\n---PAYLOAD---\n";

fn zetpkg_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zetpkg"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(zetpkg_command().args(args).output()?)
}

#[test]
fn cli_end_to_end_flow() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let game = dir.path().join("game");
    fs::create_dir_all(game.join("assets"))?;
    fs::write(game.join("main.js"), b"console.log('boot')")?;
    fs::write(game.join("assets/sprite.bin"), [0u8, 1, 2, 250, 251, 252])?;

    let package = dir.path().join("game.zetpkg");
    let out_dir = dir.path().join("out");

    // Pack
    let pack = run(&[
        "pack",
        game.to_str().unwrap(),
        "--entry",
        "main.js",
        "-o",
        package.to_str().unwrap(),
        "--version",
        "2.1.0",
        "--meta",
        "title=Demo",
    ])?;
    assert!(
        pack.status.success(),
        "pack command failed: {}",
        String::from_utf8_lossy(&pack.stderr)
    );
    let pack_stdout = String::from_utf8(pack.stdout)?;
    assert!(pack_stdout.contains("Created"), "pack output missing confirmation");
    assert!(pack_stdout.contains("SHA-256:"));
    assert!(package.exists(), "package file should exist after pack");

    // Info
    let info = run(&["info", package.to_str().unwrap()])?;
    let info_stdout = String::from_utf8(info.stdout)?;
    assert!(info_stdout.contains("Format: ZetPkg"));
    assert!(info_stdout.contains("Version: 2.1.0"));
    assert!(info_stdout.contains("Entry: main.js"));
    assert!(info_stdout.contains("Assets (2):"));
    assert!(info_stdout.contains("title: \"Demo\""));

    // Check, shallow and deep
    for args in [vec!["check"], vec!["check", "--deep"]] {
        let mut args = args;
        args.push(package.to_str().unwrap());
        let check = run(&args)?;
        assert!(
            check.status.success(),
            "check failed: {}",
            String::from_utf8_lossy(&check.stderr)
        );
        assert!(String::from_utf8(check.stdout)?.contains("valid"));
    }

    // Extract
    let extract = run(&[
        "extract",
        package.to_str().unwrap(),
        "-C",
        out_dir.to_str().unwrap(),
    ])?;
    assert!(
        extract.status.success(),
        "extract command failed: {}",
        String::from_utf8_lossy(&extract.stderr)
    );
    assert!(String::from_utf8(extract.stdout)?.contains("Extracted 2 assets"));
    assert_eq!(fs::read(out_dir.join("main.js"))?, b"console.log('boot')");
    assert_eq!(
        fs::read(out_dir.join("assets/sprite.bin"))?,
        [0u8, 1, 2, 250, 251, 252]
    );

    // Detect
    let detect = run(&["detect", package.to_str().unwrap()])?;
    assert!(detect.status.success());
    assert!(String::from_utf8(detect.stdout)?.contains("ZetPkg"));

    Ok(())
}

#[test]
fn deep_check_catches_what_shallow_check_misses() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let main = dir.path().join("main.js");
    let package = dir.path().join("app.zetpkg");
    fs::write(&main, b"run()")?;

    let pack = run(&[
        "pack",
        main.to_str().unwrap(),
        "--entry",
        "main.js",
        "-o",
        package.to_str().unwrap(),
    ])?;
    assert!(pack.status.success());

    // Drop every payload entry but keep the header intact
    let content = fs::read_to_string(&package)?;
    let (head, _) = content.split_once(SEPARATOR).unwrap();
    fs::write(&package, format!("{}{}{{}}", head, SEPARATOR))?;

    let shallow = run(&["check", package.to_str().unwrap()])?;
    assert!(shallow.status.success(), "shallow check should pass");

    let deep = run(&["check", "--deep", package.to_str().unwrap()])?;
    assert!(!deep.status.success(), "deep check should fail");
    assert!(String::from_utf8(deep.stderr)?.contains("Missing asset: main.js"));

    let extract = run(&[
        "extract",
        package.to_str().unwrap(),
        "-C",
        dir.path().join("out").to_str().unwrap(),
    ])?;
    assert!(!extract.status.success());
    assert!(!dir.path().join("out/main.js").exists());

    Ok(())
}

#[test]
fn pack_reports_missing_entry() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let main = dir.path().join("main.js");
    let package = dir.path().join("app.zetpkg");
    fs::write(&main, b"run()")?;

    let pack = run(&[
        "pack",
        main.to_str().unwrap(),
        "--entry",
        "index.js",
        "-o",
        package.to_str().unwrap(),
    ])?;
    assert!(!pack.status.success());
    assert!(String::from_utf8(pack.stderr)?.contains("Entry file not found: index.js"));
    assert!(!package.exists());

    Ok(())
}

#[test]
fn version_flag_prints_build_information() -> Result<(), Box<dyn Error>> {
    let output = run(&["--version"])?;
    assert!(
        output.status.success(),
        "version command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("zetpkg "), "unexpected version line: {}", stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "version output should include the package version: {}",
        stdout
    );
    Ok(())
}

#[test]
fn running_without_subcommand_displays_help() -> Result<(), Box<dyn Error>> {
    let output = zetpkg_command().output()?;
    assert!(
        output.status.success(),
        "help output failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "help text missing: {}", stdout);
    assert!(stdout.contains("pack"));
    assert!(stdout.contains("extract"));
    Ok(())
}

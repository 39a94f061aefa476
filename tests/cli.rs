//! Runs the compiled tools against an on-disk fixture tree.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const TOOLS: [&str; 4] = ["cpuinfo", "meminfo", "diskls", "osinfo"];

fn binary(tool: &str) -> &'static str {
    match tool {
        "cpuinfo" => env!("CARGO_BIN_EXE_cpuinfo"),
        "meminfo" => env!("CARGO_BIN_EXE_meminfo"),
        "diskls" => env!("CARGO_BIN_EXE_diskls"),
        "osinfo" => env!("CARGO_BIN_EXE_osinfo"),
        other => panic!("unknown tool {}", other),
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small host under `proc/`, `sys/` and `etc/`.
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(
        root,
        "proc/cpuinfo",
        "processor\t: 0\nvendor_id\t: GenuineIntel\nmodel name\t: Fixture CPU\ncore id\t\t: 0\n\n\
         processor\t: 1\nvendor_id\t: GenuineIntel\nmodel name\t: Fixture CPU\ncore id\t\t: 1\n",
    );
    write(root, "proc/loadavg", "0.50 0.25 0.10 1/99 100\n");
    write(root, "proc/stat", "cpu  100 0 100 800 0 0 0 0 0 0\n");
    write(
        root,
        "proc/meminfo",
        "MemTotal:        8000000 kB\nMemFree:         2000000 kB\nMemAvailable:    4000000 kB\n\
         SwapTotal:             0 kB\nSwapFree:              0 kB\n",
    );
    write(root, "proc/42/status", "Name:\tfixture\nVmRSS:\t2048 kB\n");
    write(root, "proc/42/cmdline", "fixture\0--run\0");
    write(
        root,
        "proc/mounts",
        &format!("/dev/fix1 {} ext4 rw,relatime 0 0\nproc /proc proc rw 0 0\n", root.display()),
    );
    write(root, "proc/diskstats", "   8       0 sda 1 0 8 0 2 0 16 0 0 0 0\n");
    write(root, "proc/version", "Linux version 6.0.0-fixture\n");

    write(root, "sys/block/sda/size", "2048\n");
    write(root, "sys/block/sda/queue/rotational", "1\n");
    write(root, "sys/block/sda/removable", "0\n");
    write(root, "sys/devices/system/cpu/online", "0-1\n");
    write(root, "sys/devices/system/cpu/cpu0/topology/physical_package_id", "0\n");
    write(root, "sys/devices/system/cpu/cpu0/topology/core_id", "0\n");
    write(root, "sys/devices/system/cpu/cpu1/topology/physical_package_id", "0\n");
    write(root, "sys/devices/system/cpu/cpu1/topology/core_id", "1\n");

    write(
        root,
        "etc/os-release",
        "NAME=\"Fixture Linux\"\nVERSION=\"1.0\"\nID=fixture\nVERSION_CODENAME=test\n",
    );

    dir
}

fn run(tool: &str, root: &Path, args: &[&str]) -> Output {
    Command::new(binary(tool))
        .arg("--proc-path")
        .arg(root.join("proc"))
        .arg("--sys-path")
        .arg(root.join("sys"))
        .arg("--etc-path")
        .arg(root.join("etc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tool")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_invalid_option_exits_one() {
    let dir = fixture();
    for tool in TOOLS {
        let output = run(tool, dir.path(), &["--bogus"]);
        assert_eq!(output.status.code(), Some(1), "{}", tool);
        let err = stderr(&output);
        assert!(err.contains("invalid option"), "{}: {}", tool, err);
        assert!(err.contains(&format!("{}: ", tool)));
        assert_eq!(err.lines().count(), 1);
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn test_help_and_version_exit_zero() {
    for tool in TOOLS {
        let output = Command::new(binary(tool)).arg("--help").output().unwrap();
        assert!(output.status.success());
        assert!(stdout(&output).starts_with(&format!("Usage: {} [OPTION]...", tool)));

        let output = Command::new(binary(tool)).arg("-V").output().unwrap();
        assert!(output.status.success());
        assert!(stdout(&output).starts_with(&format!("{} (QCO InfoUtils) 1.0", tool)));
    }
}

#[test]
fn test_no_color_has_no_escapes() {
    let dir = fixture();
    for tool in TOOLS {
        let output = run(tool, dir.path(), &["-a", "--no-color"]);
        assert!(output.status.success(), "{}: {}", tool, stderr(&output));
        assert!(!stdout(&output).contains("\x1b["), "{}", tool);
    }
}

#[test]
fn test_cpuinfo_reads_fixture() {
    let dir = fixture();
    let output = run("cpuinfo", dir.path(), &["-l", "-t"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.starts_with("CPU Information\n===============\n"));
    assert!(out.contains("Model:            Fixture CPU\n"));
    assert!(out.contains("Logical cores:    2\n"));
    assert!(out.contains("\nCPU Load\n"));
    assert!(out.contains("\nCPU Topology\n"));
}

#[test]
fn test_cpuinfo_missing_frequency_warns() {
    let dir = fixture();
    let output = run("cpuinfo", dir.path(), &["-f"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Warning: CPU frequency information not available"));
}

#[test]
fn test_meminfo_reads_fixture() {
    let dir = fixture();
    let output = run("meminfo", dir.path(), &["-p"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Memory Information\n"));
    assert!(out.contains("7.6 GiB"));
    assert!(out.contains("fixture"));
}

#[test]
fn test_diskls_reads_fixture() {
    let dir = fixture();
    let output = run("diskls", dir.path(), &["-u", "-t"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("/dev/sda\n  Type:           HDD\n  Size:           1.0 MiB\n"));
    assert!(out.contains("/dev/fix1"));
    assert!(out.contains("Filesystems:\n  ext4:\n    fix1\n"));
}

#[test]
fn test_osinfo_reads_fixture() {
    let dir = fixture();
    let output = run("osinfo", dir.path(), &["-r"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Operating System: Fixture Linux 1.0\n"));
    assert!(out.contains("Codename:         test\n"));
}

#[test]
fn test_source_paths_from_environment() {
    let dir = fixture();
    let output = Command::new(binary("osinfo"))
        .args(["-r", "--no-color"])
        .env("INFOUTILS_ETC_PATH", dir.path().join("etc"))
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Name:             Fixture Linux\n"));
}

#[test]
fn test_empty_sources_still_succeed() {
    let dir = tempfile::tempdir().unwrap();
    for tool in TOOLS {
        let output = run(tool, dir.path(), &["-a"]);
        assert_eq!(output.status.code(), Some(0), "{}", tool);
        assert!(stdout(&output).contains("Warning:"), "{}", tool);
    }
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let dir = tempfile::tempdir().unwrap();
    let output = run("cpuinfo", dir.path(), &["-f", "-vv", "--no-color"]);
    assert!(output.status.success());
    assert!(!stdout(&output).contains("DEBUG"));
}

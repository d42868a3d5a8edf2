// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("s3io").chain(args.iter().copied())).unwrap()
}

fn defaults() -> EnvDefaults {
    EnvDefaults {
        endpoint: Some("http://env.store".into()),
        staging_dir: None,
        kill_grace: Duration::from_secs(5),
    }
}

#[test]
fn command_arguments_pass_through_untouched() {
    let cli = parse(&["-b", "logs", "-d", "runs/1", "ls", "-la", "--color", "/tmp"]);
    let settings = Settings::resolve(cli, defaults()).unwrap();

    assert_eq!(settings.program, "ls");
    assert_eq!(settings.args, vec!["-la", "--color", "/tmp"]);
    assert_eq!(settings.run_dir.as_str(), "runs/1");
    assert_eq!(settings.out_bucket, "logs");
    assert_eq!(settings.input, None);
}

#[test]
fn flags_override_environment() {
    let env = EnvDefaults {
        endpoint: Some("http://env.store".into()),
        staging_dir: Some("/env/staging".into()),
        kill_grace: Duration::from_secs(9),
    };
    let cli = parse(&[
        "--endpoint",
        "file:///srv/store",
        "--out-bucket",
        "logs",
        "--out-dir",
        "r",
        "--staging-dir",
        "/flag/staging",
        "--kill-grace-ms",
        "250",
        "--timeout",
        "3",
        "true",
    ]);
    let settings = Settings::resolve(cli, env).unwrap();

    assert_eq!(settings.endpoint, "file:///srv/store");
    assert_eq!(settings.staging_dir, Some(PathBuf::from("/flag/staging")));
    assert_eq!(settings.kill_grace, Duration::from_millis(250));
    assert_eq!(settings.timeout, Some(Duration::from_secs(3)));
}

#[test]
fn environment_fills_in_missing_flags() {
    let env = EnvDefaults {
        endpoint: Some("http://env.store".into()),
        staging_dir: Some("/env/staging".into()),
        kill_grace: Duration::from_secs(9),
    };
    let settings = Settings::resolve(parse(&["-b", "logs", "-d", "r", "true"]), env).unwrap();

    assert_eq!(settings.endpoint, "http://env.store");
    assert_eq!(settings.staging_dir, Some(PathBuf::from("/env/staging")));
    assert_eq!(settings.kill_grace, Duration::from_secs(9));
    assert_eq!(settings.timeout, None);
}

#[test]
fn input_object_is_resolved() {
    let cli = parse(&["-b", "logs", "-d", "r", "--in-bucket", "inputs", "--in-path", "/data/in.txt", "cat"]);
    let settings = Settings::resolve(cli, defaults()).unwrap();

    let input = settings.input.unwrap();
    assert_eq!(input.bucket, "inputs");
    assert_eq!(input.path.as_str(), "data/in.txt");
}

#[yare::parameterized(
    no_endpoint = { &["-b", "logs", "-d", "r", "true"], false },
    bad_out_dir = { &["-b", "logs", "-d", "a/../b", "true"], true },
    empty_out_dir = { &["-b", "logs", "-d", "/", "true"], true },
    empty_bucket = { &["-b", "", "-d", "r", "true"], true },
    empty_program = { &["-b", "logs", "-d", "r", ""], true },
)]
fn invalid_settings_are_usage_errors(args: &[&str], with_endpoint: bool) {
    let env = if with_endpoint { defaults() } else { EnvDefaults::default() };
    let err = Settings::resolve(parse(args), env).unwrap_err();
    assert_eq!(err.code, 255);
}

#[yare::parameterized(
    missing_command = { &["-b", "logs", "-d", "r"] },
    missing_out_bucket = { &["-d", "r", "true"] },
    missing_out_dir = { &["-b", "logs", "true"] },
    in_bucket_without_path = { &["-b", "logs", "-d", "r", "--in-bucket", "x", "cat"] },
    in_path_without_bucket = { &["-b", "logs", "-d", "r", "--in-path", "x", "cat"] },
)]
fn incomplete_command_lines_are_rejected(args: &[&str]) {
    assert!(Cli::try_parse_from(std::iter::once("s3io").chain(args.iter().copied())).is_err());
}

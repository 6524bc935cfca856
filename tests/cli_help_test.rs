#[cfg(test)]
mod cli_help_tests {
    use assert_cmd::prelude::*;
    use predicates::prelude::*;
    use std::process::Command;

    #[test]
    fn test_cli_help_output() {
        let mut cmd = Command::cargo_bin("oscli").unwrap();
        let assert_result = cmd.arg("--help").assert().success();
        let output = assert_result.get_output();
        let help_output = String::from_utf8_lossy(&output.stdout);

        assert!(help_output.contains("Usage:"));
        assert!(help_output.contains("Commands:"));

        for group in ["server", "volume", "alarm", "meter", "user", "tenant", "auth", "config"] {
            assert!(help_output.contains(group), "missing command group '{}'", group);
        }

        assert!(help_output.contains("--os-auth-url"));
        assert!(help_output.contains("-h, --help"));
        assert!(help_output.contains("-V, --version"));
    }

    #[test]
    fn test_cli_subcommand_help_outputs() {
        let expected = [
            ("server", vec!["list", "show", "create", "update", "delete", "start", "stop", "reboot"]),
            ("volume", vec!["list", "show", "create", "update", "delete", "extend"]),
            ("alarm", vec!["list", "show", "create", "update", "delete", "state"]),
            ("meter", vec!["list", "samples", "statistics"]),
            ("user", vec!["list", "show", "create", "update", "delete"]),
            ("tenant", vec!["list", "show", "create", "update", "delete"]),
            ("auth", vec!["login", "logout", "token", "catalog", "endpoint"]),
            ("config", vec!["path", "show", "export", "import"]),
        ];

        for (group, subcommands) in expected {
            let mut cmd = Command::cargo_bin("oscli").unwrap();
            let assert_result = cmd.arg(group).arg("--help").assert().success();
            let output = assert_result.get_output();
            let help_output = String::from_utf8_lossy(&output.stdout);

            for subcommand in subcommands {
                assert!(
                    help_output.contains(subcommand),
                    "'{}' help does not mention '{}'",
                    group,
                    subcommand
                );
            }
        }
    }

    #[test]
    fn test_version_output() {
        let mut cmd = Command::cargo_bin("oscli").unwrap();
        cmd.arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_invalid_format_is_a_usage_error() {
        let mut cmd = Command::cargo_bin("oscli").unwrap();
        cmd.args(["volume", "list", "--format", "xml"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid value"));
    }

    #[test]
    fn test_missing_subcommand_shows_help() {
        let mut cmd = Command::cargo_bin("oscli").unwrap();
        cmd.arg("server")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage:"));
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn program() -> String {
    "job".to_string()
}

#[yare::parameterized(
    exit_one = { ChildError::Exited { program: program(), code: 1 }, 1 },
    exit_42 = { ChildError::Exited { program: program(), code: 42 }, 42 },
    exit_out_of_range = { ChildError::Exited { program: program(), code: -1 }, 1 },
    sigkill = { ChildError::Signaled { program: program(), signal: 9 }, 137 },
    cancelled = { ChildError::Cancelled { program: program() }, 130 },
    spawn = {
        ChildError::Spawn { program: program(), source: std::io::ErrorKind::NotFound.into() },
        127
    },
)]
fn child_outcomes_map_to_shell_codes(err: ChildError, code: i32) {
    let exit = ExitError::from_child(&err);
    assert_eq!(exit.code, code);
    assert_eq!(exit.message, err.to_string());
}

#[test]
fn usage_errors_exit_255() {
    let exit = ExitError::usage("missing --out-bucket");
    assert_eq!(exit.code, 255);
    assert_eq!(exit.to_string(), "missing --out-bucket");
}

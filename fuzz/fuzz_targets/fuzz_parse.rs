#![no_main]

//! Plan parser fuzzer.
//!
//! Any input must either parse or produce a syntax error with a line
//! number inside the input.

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(src) = std::str::from_utf8(data) else {
        return;
    };
    match crewplan::parse(src) {
        Ok(plan) => assert!(!plan.statements.is_empty(), "parsed an empty plan"),
        Err(err) => {
            let lines = src.lines().count().max(1);
            assert!(
                err.line() >= 1 && err.line() <= lines + 1,
                "error line {} outside input of {} lines",
                err.line(),
                lines
            );
        }
    }
});

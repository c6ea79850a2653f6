//! Ad-hoc benchmark executable for the compiled graph (spec section 6:
//! "`<build-tool> run` -- run the benchmark").
//!
//! This binary is intentionally thin: the CLI benchmark harness's design is
//! an external-collaborator boundary (spec section 1), so all this does is
//! exercise the specialized executor enough times to print a throughput
//! number. The `criterion` benches under `benches/` are the tool for
//! rigorous measurement; this binary is what `xtask run` shells out to for
//! a quick, dependency-free smoke number.

use std::time::Instant;

use zigdag_specialize::{Executor, NUMERIC_INPUT_IDS, STRING_INPUT_IDS};

const ITERATIONS: u32 = 1_000_000;

fn main() {
    let mut exec = Executor::new();
    for id in NUMERIC_INPUT_IDS {
        let _ = exec.set_input_num(id, 1.0);
    }
    for id in STRING_INPUT_IDS {
        let _ = exec.set_input_str(id, "");
    }

    let start = Instant::now();
    let mut last = 0.0f64;
    for _ in 0..ITERATIONS {
        match exec.get_output() {
            Ok(v) => last = v,
            Err(_) => continue, // string inputs may not resolve any conditional mapping
        }
    }
    let elapsed = start.elapsed();

    println!("iterations: {ITERATIONS}");
    println!("elapsed: {elapsed:?}");
    println!(
        "throughput: {:.0} calls/sec",
        ITERATIONS as f64 / elapsed.as_secs_f64()
    );
    println!("last output: {last}");
}

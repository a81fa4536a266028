//! rTimeTracker main entrypoint.

use rtimetracker::run;
use rtimetracker::ui::messages::{error, warning};

fn main() {
    match run() {
        Ok(()) => {}
        // Already explained to the user; the command still counts as done.
        Err(e) if !e.is_blocking() => warning(format!("Not completed: {e}")),
        Err(e) => {
            error(format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}

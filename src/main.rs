//! schooldesk main entrypoint.

use schooldesk::run;
use schooldesk::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}

//! # snapsort CLI
//!
//! Command-line interface for sorting photos into duplicate and blurred folders.
//!
//! ## Usage
//! ```bash
//! snapsort sort ~/Photos --dry-run
//! snapsort sort ~/Photos --blur-on image --blur-threshold 80 --keep-originals
//! ```

mod cli;

use snapsort::Result;

fn main() -> Result<()> {
    cli::run()
}

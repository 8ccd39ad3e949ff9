use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use env_logger::{Builder, Target};

/// Environment variable holding the log filter, e.g. `WORDPACE_LOG=debug`
pub const LOG_ENV: &str = "WORDPACE_LOG";

/// Send log records to `path` when `WORDPACE_LOG` is set.
///
/// The terminal belongs to the UI, so records never go to stderr. Returns
/// whether a logger was installed.
pub fn init_file_logger(path: &Path) -> io::Result<bool> {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return Ok(false);
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let installed = Builder::new()
        .parse_filters(&filter)
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .is_ok();

    Ok(installed)
}

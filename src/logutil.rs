//! Logging setup and helpers.
//!
//! Log lines look like `2024-01-01T00:00:00Z [INFO] message`. When a log file is
//! configured every line is appended to it, and mirrored to the console only if
//! stdout is a terminal.

use crate::config::LoggingConfig;
use std::borrow::Cow;
use std::io::Write;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const MAX_PREVIEW: usize = 120;

/// Make a database string safe for a single log line.
///
/// Control characters are escaped (`\n`, `\r`, `\t`, `\xNN`), backslashes are
/// doubled, and anything past `MAX_PREVIEW` characters is cut with an ellipsis.
/// Strings that need none of that are returned borrowed.
pub fn escape_log(s: &str) -> Cow<'_, str> {
    let clean = s.chars().count() <= MAX_PREVIEW
        && !s.chars().any(|c| c == '\\' || c.is_control());
    if clean {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Pick the level filter: `-v` flags win over the configured level.
pub fn level_filter(config: Option<&LoggingConfig>, verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => config
            .and_then(|cfg| log::LevelFilter::from_str(&cfg.level).ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// Open `path` for appending. The logger is not installed yet at this point,
/// so a failure is reported on stderr and logging stays console-only.
pub fn open_log_file(path: &str) -> Option<std::fs::File> {
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Cannot open log file {}: {} (logging to console only)", path, e);
            None
        }
    }
}

/// Install the global `env_logger` backend. Safe to call more than once.
pub fn init_logging(config: Option<&LoggingConfig>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_filter(config, verbosity));

    let log_file = config
        .and_then(|cfg| cfg.file.as_deref())
        .and_then(open_log_file);

    match log_file {
        Some(file) => {
            let file = Arc::new(Mutex::new(file));
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = file.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    }
    let _ = builder.try_init();
}

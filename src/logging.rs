use colored::{ColoredString, Colorize};
use log::Level;

/// Sets up output for the CLI: terse prefixed lines on stdout. Our own
/// messages show from info up; other crates only get through with warnings
/// and errors.
pub fn init_logger() {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {}",
                level_label(record.level()),
                message
            ))
        })
        .filter(|meta| {
            let cutoff = if is_local(meta.target()) {
                Level::Info
            } else {
                Level::Warn
            };

            meta.level() <= cutoff
        })
        .chain(std::io::stdout())
        .apply()
        .expect("logging is initialized")
}

fn is_local(target: &str) -> bool {
    target == "contrail" || target.starts_with("contrail::")
}

fn level_label(level: Level) -> ColoredString {
    match level {
        Level::Error => "error:".red().bold(),
        Level::Warn => "warning:".yellow().bold(),
        Level::Info => "info:".bright_blue(),
        Level::Debug => "debug:".bright_black(),
        Level::Trace => "trace:".bright_black(),
    }
}

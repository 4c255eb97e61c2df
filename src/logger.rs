use colored::{Color, ColoredString, Colorize};
use log::{Level, SetLoggerError};

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Blue,
        Level::Debug => Color::Magenta,
        Level::Trace => Color::Green,
    }
}

/// Formats records as `<level>: <message>` with a coloured level and sends
/// them to stderr, keeping stdout free for encoded output.
pub fn stderr(level: log::LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new()
        .level(level)
        .format(move |out, message, record| {
            let level = record.level();
            out.finish(format_args!(
                "{} {}",
                ColoredString::from((level.to_string().to_lowercase() + ":").as_str())
                    .color(level_color(level))
                    .to_string(),
                message
            ))
        })
        .chain(std::io::stderr())
}

pub fn init(level: log::LevelFilter) -> Result<(), SetLoggerError> {
    stderr(level).apply()
}

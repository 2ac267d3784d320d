use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Send log records to stderr, leaving stdout to the generated source
pub fn enable_logging(verbosity: usize) -> anyhow::Result<()> {
    let line_colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .trace(Color::BrightBlack);

    let level_colors = line_colors.clone().info(Color::Green);

    fern::Dispatch::new()
        .format(move |out, msg, record| {
            out.finish(format_args!(
                "{line_color}[{level}{line_color}] {msg}\x1B[0m",
                line_color = format_args!(
                    "\x1B[{}m",
                    line_colors.get_color(&record.level()).to_fg_str()
                ),
                level = level_colors.color(record.level()),
                msg = msg
            ))
        })
        .level(level_filter(verbosity))
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn level_filter(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter(0), LevelFilter::Warn);
        assert_eq!(level_filter(1), LevelFilter::Info);
        assert_eq!(level_filter(2), LevelFilter::Debug);
        assert_eq!(level_filter(3), LevelFilter::Trace);
        assert_eq!(level_filter(10), LevelFilter::Trace);
    }
}

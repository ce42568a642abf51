use std::sync::Once;

use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

static INIT: Once = Once::new();

/// Initialise console logging at the given level.
///
/// Only the first call takes effect, so embedders and tests may both call
/// this without fighting over the global logger.
pub fn init(level: LevelFilter) {
    INIT.call_once(|| {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
            )))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(level))
            .expect("Failed to build logging config");
        log4rs::init_config(config).expect("Failed to initialise logging");
    });
}

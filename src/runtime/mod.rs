use std::io;
use std::sync::Arc;

use tracing::{info, warn};

use crate::audio::SpeakerConnector;
use crate::cache::{DirCache, InFlight};
use crate::session::{Services, SessionRegistry};
use crate::source::HttpTrackSource;

mod console;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();
    logging::init_tracing(&settings.log);
    if let Some(reason) = fallback {
        warn!("{}", reason);
    }

    let cache = DirCache::open(&settings.cache)?;
    let registry = SessionRegistry::new(Services {
        source: Arc::new(HttpTrackSource::new(&settings.source)),
        media_dir: cache.dir().to_path_buf(),
        cache: Arc::new(cache),
        voice: Arc::new(SpeakerConnector::new(settings.audio.clone())),
        downloads: Arc::new(InFlight::new()),
        library: settings.library.clone(),
    });

    info!(
        "listening for `{}` commands on stdin (default channel {})",
        settings.bot.prefix, settings.bot.default_channel
    );
    let served = console::serve(io::stdin().lock(), &registry, &settings.bot);

    info!("input closed, shutting down");
    registry.shutdown();
    served?;
    Ok(())
}

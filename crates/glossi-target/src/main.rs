//! GlosSI target entry point.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ logging::init()          -- subscriber at info / RUST_LOG
//!  └─ TargetContext::load()    -- OS probe, settings load, optional store
//!  └─ logging::apply_settings  -- debug level if extendedLogging, then
//!                                 the loaded settings are dumped
//! ```
//!
//! Launching the game and the overlay session consume `TargetContext` and
//! are not part of this binary yet.

use std::io::Write;

use clap::Parser;
use tracing::{debug, info};

use glossi_settings::NativeVersionSource;
use glossi_target::application::startup::{TargetArgs, TargetContext};
use glossi_target::infrastructure::logging;

fn main() -> anyhow::Result<()> {
    let args = TargetArgs::parse();
    let log_filter = logging::init()?;

    info!("GlosSI target starting");

    let context = TargetContext::load(&args, &NativeVersionSource::default())?;
    if logging::apply_settings(&log_filter, context.settings()) {
        debug!("effective settings: {}", context.settings_json()?);
    }

    info!("{}", context.summary());

    if args.print {
        let mut stdout = std::io::stdout().lock();
        context.settings().write_pretty(&mut stdout)?;
        writeln!(stdout)?;
    }

    info!("GlosSI target stopped");
    Ok(())
}

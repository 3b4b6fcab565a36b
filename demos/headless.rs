//! Runs a few toasts against the in-memory platform and logs their lifecycle
//!
//! `cargo run --example headless -- --verbose` for debug output.

use anyhow::Result;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use toaster::{
    HeadlessPlatform, Orientation, PlatformEvent, Point, Runtime, Settings, Toast, ToastManager,
};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|arg| arg == "--verbose" || arg == "-v");
    let log_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting headless toast demo...");

    let settings = Settings::load().unwrap_or_default();
    let platform = Arc::new(HeadlessPlatform::phone());
    let runtime = Runtime::builder(platform.clone())
        .settings(&settings)
        .build();
    let manager = ToastManager::new(Arc::clone(&runtime));
    ToastManager::install(Arc::clone(&manager));

    let events = manager.events();
    let dispatcher = Arc::clone(runtime.dispatcher());

    Toast::text("Welcome back").show();
    Toast::text("Photo deleted")
        .button("Undo")
        .on_tap(|| info!("Undo requested"))
        .show();
    manager.show(manager.toast("Synced").duration(Duration::from_secs(1)));

    // A worker thread can show toasts too; they are admitted on the next turn
    std::thread::spawn(|| {
        Toast::text("Background job finished").delay(Duration::from_millis(300)).show();
    })
    .join()
    .map_err(|_| anyhow::anyhow!("worker thread panicked"))?;

    dispatcher.run_for(Duration::from_millis(3200));

    // The second toast is up now; tap its button
    if let Some(layout) = manager
        .queue()
        .current_task()
        .and_then(|task| task.view().lock().current_layout().copied())
    {
        if let Some(button) = layout.button {
            let button = button.offset_by(layout.frame.origin);
            let center = Point::new(
                button.origin.x + button.size.width / 2.0,
                button.origin.y + button.size.height / 2.0,
            );
            manager.handle_tap(center);
        }
    }

    platform.set_orientation(Orientation::LandscapeLeft);
    runtime.publish(PlatformEvent::InterfaceOrientationWillChange);
    runtime.publish(PlatformEvent::InterfaceOrientationDidChange(Orientation::LandscapeLeft));

    dispatcher.run_until_idle();

    for event in events.try_iter() {
        info!("{:?}", event);
    }
    for text in platform.announcements() {
        info!("Announced: {}", text);
    }

    info!("Demo finished");
    Ok(())
}

use color_eyre::{Report, Result};
use globe_renderer::{app::ApplicationRunner, control::background_runner::BackgroundNotification};
use tokio::runtime::Runtime;
use tokio_with_wasm::alias as tokio;
use winit::{dpi::LogicalSize, window::Window};

pub fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let (width, height) = (1024, 768);
    let window_attributes = Window::default_attributes()
        .with_title("globe")
        .with_min_inner_size(LogicalSize::new(320.0, 240.0))
        .with_inner_size(LogicalSize::new(width as f64, height as f64));

    let background_runtime = Runtime::new()?;

    let mut app_runner = ApplicationRunner::new(window_attributes)?;

    if let Some(mut notifications) = app_runner.subscribe_to_background_notifications() {
        background_runtime.spawn(async move {
            while let Ok(notification) = notifications.recv().await {
                match notification {
                    BackgroundNotification::TaskErrored { task, error } => {
                        log::warn!("{}: {error}", task.task)
                    }
                    notification => log::debug!("{notification:?}"),
                }
            }
        });
    }

    app_runner.add_intro_listener(|| log::info!("Globe ready"));

    if let Err(err) = app_runner.configure_background_runner(|f| background_runtime.spawn(f)) {
        log::error!("{err:?}");
    }

    Ok::<(), Report>(app_runner.run()?)
}

use std::{pin::Pin, sync::Arc};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use color_eyre::{Report, Result};
use globe_common::GeoCoord;
use tokio::{
    sync::{
        broadcast,
        mpsc::{Sender, channel},
    },
    task::JoinHandle,
};
use tokio_with_wasm::alias as tokio;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
use winit::{event::WindowEvent, event_loop::EventLoopProxy};

use crate::{
    app::{ApplicationEvent, ApplicationSettings},
    control::{
        background_runner::{BackgroundEvent, BackgroundNotification, BackgroundRunner},
        input_controller::{InputCommand, InputController},
    },
    data::application_data::ApplicationData,
};

pub enum RunnerState {
    Initialized(BackgroundRunner),
    Started(JoinHandle<()>),
}

pub struct ApplicationControllers {
    runner_state: Option<RunnerState>,
    event_sender: Sender<BackgroundEvent>,
    pub input_controller: InputController,
    previous_instant: Instant,
}

impl ApplicationControllers {
    pub fn new(
        render_event_loopback: EventLoopProxy<ApplicationEvent>,
        settings: Arc<ApplicationSettings>,
    ) -> Self {
        let (event_sender, event_receiver) = channel(128);

        let runner = BackgroundRunner::new(event_receiver, render_event_loopback, settings);

        let input_controller = InputController::new(GeoCoord::new(49.35135, 20.21139));

        ApplicationControllers {
            runner_state: Some(RunnerState::Initialized(runner)),
            event_sender,
            input_controller,
            previous_instant: Instant::now(),
        }
    }

    pub fn configure_background_runner(
        &mut self,
        async_runner: impl FnOnce(
            Pin<Box<dyn Future<Output = ()> + Send + Sync + 'static>>,
        ) -> JoinHandle<()>,
    ) -> Result<(), Report> {
        if let Some(RunnerState::Initialized(mut runner)) = self.runner_state.take() {
            let pinned = Box::pin(async move { runner.run().await });
            self.runner_state = Some(RunnerState::Started(async_runner(pinned)));
        }

        Ok(())
    }

    /// Only available before the runner is started.
    pub fn subscribe_to_notifications(&self) -> Option<broadcast::Receiver<BackgroundNotification>> {
        match &self.runner_state {
            Some(RunnerState::Initialized(runner)) => Some(runner.get_notification_receiver()),
            _ => None,
        }
    }

    pub fn send_event(&mut self, event: BackgroundEvent) -> Result<()> {
        self.event_sender.blocking_send(event)?;
        Ok(())
    }

    pub fn input(&self, event: &WindowEvent, data: &ApplicationData) -> Option<InputCommand> {
        self.input_controller.process_events(event, &data.inputs)
    }

    /// Restarts frame timing so time spent suspended does not count as one frame.
    pub fn reset_clock(&mut self) {
        self.previous_instant = Instant::now();
    }

    /// Advances the scene by the wall clock time since the previous frame;
    /// true on the frame the intro animation finishes.
    pub fn update(&mut self, data: &mut ApplicationData) -> bool {
        let current_instant = Instant::now();
        let time_delta = current_instant - self.previous_instant;
        self.previous_instant = current_instant;

        data.advance(time_delta)
    }
}

impl Drop for ApplicationControllers {
    fn drop(&mut self) {
        if let Some(RunnerState::Started(handle)) = &mut self.runner_state {
            handle.abort();
        }
    }
}

use std::{pin::Pin, sync::Arc};

use color_eyre::Report;
use futures::channel::oneshot;
use globe_common::{GeoCoord, GeoFeature};
use tokio::{sync::broadcast::Receiver, task::JoinHandle};
use tokio_with_wasm::alias as tokio;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowAttributes},
};

use crate::{
    control::{
        application_controllers::ApplicationControllers,
        background_runner::{BackgroundEvent, BackgroundNotification},
        input_controller::InputCommand,
    },
    data::application_data::ApplicationData,
    render::{data::SegmentBuffer, render_engine::RenderEngine},
};

#[derive(Debug, Clone)]
pub struct ApplicationSettings {
    pub dataset_url: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            dataset_url: env!("GLOBE_dataset_url").to_string(),
        }
    }
}

pub enum ApplicationEvent {
    TerminateWithError(Report),
    BoundariesLoaded {
        generation: u64,
        features: Vec<GeoFeature>,
    },
    SetActive(bool),
    SelectPosition(Option<GeoCoord>),
    IntroFinished,
}

impl From<InputCommand> for ApplicationEvent {
    fn from(command: InputCommand) -> Self {
        match command {
            InputCommand::SetActive(active) => ApplicationEvent::SetActive(active),
            InputCommand::SelectPosition(selected) => ApplicationEvent::SelectPosition(selected),
        }
    }
}

pub struct Application {
    engine: Option<RenderEngine>,
    controllers: ApplicationControllers,
    data: ApplicationData,
    window_attributes: WindowAttributes,
    event_loop_proxy: EventLoopProxy<ApplicationEvent>,
    surface_configured: bool,
    receiver: Option<oneshot::Receiver<RenderEngine>>,
    resized: Option<PhysicalSize<u32>>,
    boundary_mesh: Option<SegmentBuffer>,
    intro_listener: Option<Box<dyn FnMut()>>,
}

impl Application {
    pub fn new(
        window_attributes: WindowAttributes,
        event_loop_proxy: EventLoopProxy<ApplicationEvent>,
        settings: ApplicationSettings,
    ) -> Self {
        let controllers = ApplicationControllers::new(event_loop_proxy.clone(), Arc::new(settings));

        Self {
            engine: None,
            controllers,
            data: ApplicationData::new(),
            window_attributes,
            event_loop_proxy,
            surface_configured: false,
            receiver: None,
            resized: None,
            boundary_mesh: None,
            intro_listener: None,
        }
    }

    fn mount(&mut self) {
        let generation = self.data.mount();
        self.controllers.reset_clock();
        if let Err(err) = self
            .controllers
            .send_event(BackgroundEvent::BoundariesRequested { generation })
        {
            // the globe still renders, only without boundaries
            log::error!("Unable to request boundaries: {err:?}");
        }
    }

    fn apply(&mut self, event: ApplicationEvent, event_loop: &ActiveEventLoop) {
        match event {
            ApplicationEvent::TerminateWithError(err) => {
                log::error!("{err:?}");
                event_loop.exit();
            }
            ApplicationEvent::BoundariesLoaded {
                generation,
                features,
            } => {
                if !self.data.is_current(generation) {
                    log::debug!("Dropping boundaries of stale generation {generation}");
                    return;
                }
                let mesh = self.data.mesh_builder.build(&features);
                if let Some(engine) = self.engine.as_mut() {
                    engine.set_boundaries(&mesh);
                }
                self.boundary_mesh = Some(mesh);
            }
            ApplicationEvent::SetActive(active) => self.data.set_active(active),
            ApplicationEvent::SelectPosition(selected) => self.data.select(selected),
            ApplicationEvent::IntroFinished => {
                log::info!("Intro animation finished");
                if let Some(listener) = self.intro_listener.as_mut() {
                    listener();
                }
            }
        }
    }

    fn attach_engine(&mut self, mut engine: RenderEngine) {
        if let Some(physical_size) = self.resized.take() {
            self.surface_configured = engine.resize(physical_size);
        } else {
            self.surface_configured = engine.resize(engine.size());
        }
        if let Some(mesh) = &self.boundary_mesh {
            engine.set_boundaries(mesh);
        }
        engine.window().request_redraw();
        self.engine = Some(engine);
    }
}

pub struct ApplicationRunner {
    event_loop: EventLoop<ApplicationEvent>,
    app: Application,
}

impl ApplicationRunner {
    pub fn new(window_attributes: WindowAttributes) -> Result<Self, EventLoopError> {
        Self::with_settings(window_attributes, ApplicationSettings::default())
    }

    pub fn with_settings(
        window_attributes: WindowAttributes,
        settings: ApplicationSettings,
    ) -> Result<Self, EventLoopError> {
        let event_loop = EventLoop::<ApplicationEvent>::with_user_event().build()?;
        let event_loop_proxy = event_loop.create_proxy();

        let app = Application::new(window_attributes, event_loop_proxy, settings);

        Ok(Self { app, event_loop })
    }

    /// Lets the surrounding UI deliver `SetActive` and `SelectPosition`.
    pub fn get_event_loop_proxy(&self) -> EventLoopProxy<ApplicationEvent> {
        self.event_loop.create_proxy()
    }

    pub fn configure_background_runner(
        &mut self,
        async_runner: impl FnOnce(Pin<Box<dyn Future<Output = ()> + Send + Sync>>) -> JoinHandle<()>,
    ) -> Result<(), Report> {
        self.app
            .controllers
            .configure_background_runner(async_runner)
    }

    pub fn subscribe_to_background_notifications(
        &mut self,
    ) -> Option<Receiver<BackgroundNotification>> {
        self.app.controllers.subscribe_to_notifications()
    }

    pub fn add_intro_listener(&mut self, listener: impl FnMut() + 'static) {
        self.app.intro_listener = Some(Box::new(listener));
    }

    pub fn run(self) -> Result<(), EventLoopError> {
        let mut app = self.app;
        self.event_loop.run_app(&mut app)
    }
}

impl ApplicationHandler<ApplicationEvent> for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() || self.receiver.is_some() {
            return;
        }

        let window: Arc<Window> = match event_loop.create_window(self.window_attributes.clone()) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Unable to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        self.mount();

        let event_loop_proxy = self.event_loop_proxy.clone();

        let (sender, receiver) = oneshot::channel();
        self.receiver = Some(receiver);

        let initialize_engine = {
            let window = Arc::clone(&window);
            async move {
                match RenderEngine::new(window).await {
                    Ok(render_engine) => {
                        if sender.send(render_engine).is_err() {
                            log::error!("Unable to use render engine: receiver dropped");
                        }
                    }
                    Err(err) => {
                        log::error!("{err:?}");
                        if let Err(err) =
                            event_loop_proxy.send_event(ApplicationEvent::TerminateWithError(err))
                        {
                            log::error!("{err}");
                        }
                    }
                }
            }
        };

        #[cfg(target_arch = "wasm32")]
        tokio::spawn(initialize_engine);
        #[cfg(not(target_arch = "wasm32"))]
        match tokio::runtime::Builder::new_current_thread().build() {
            Ok(runtime) => runtime.block_on(initialize_engine),
            Err(err) => {
                log::error!("Unable to start the engine runtime: {err}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // the view is gone: anything still loading belongs to a stale generation
        self.data.unmount();
        self.boundary_mesh = None;
        self.receiver = None;
        self.surface_configured = false;
        self.engine = None;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.engine.is_none() {
            // always check for resized as it may happen before the
            // wgpu engine gets initialized (e.g. in the browser)
            if let WindowEvent::Resized(physical_size) = event {
                self.resized = Some(physical_size);
            }

            if let Some(receiver) = self.receiver.as_mut() {
                match receiver.try_recv() {
                    Ok(Some(engine)) => {
                        self.receiver = None;
                        self.attach_engine(engine);
                    }
                    Ok(None) => {
                        log::debug!("Render engine not ready yet");
                    }
                    Err(err) => {
                        log::debug!("Canceled engine initialization: {err:?}");
                        self.receiver = None;
                    }
                }
            }
            return;
        }

        if let Some(command) = self.controllers.input(&event, &self.data) {
            self.apply(command.into(), event_loop);
            return;
        }

        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        match event {
            WindowEvent::Resized(physical_size) => {
                self.surface_configured = engine.resize(physical_size);
                // On macos the window needs to be redrawn manually after resizing
                engine.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                engine.window().request_redraw();

                if !self.surface_configured {
                    return;
                }

                if self.controllers.update(&mut self.data) {
                    if let Err(err) = self
                        .event_loop_proxy
                        .send_event(ApplicationEvent::IntroFinished)
                    {
                        log::error!("{err}");
                    }
                }

                engine.update(&self.data);
                match engine.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        self.surface_configured = engine.resize(engine.size());
                    }
                    // The system is out of memory, we should probably quit
                    Err(wgpu::SurfaceError::OutOfMemory | wgpu::SurfaceError::Other) => {
                        log::error!("OutOfMemory");
                        event_loop.exit()
                    }

                    // This happens when the a frame takes too long to present
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Surface timeout")
                    }
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ApplicationEvent) {
        self.apply(event, event_loop);
    }
}

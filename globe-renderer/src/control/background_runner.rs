use std::{fmt::Display, sync::Arc};

use bytes::Bytes;
use color_eyre::{Result, eyre::Context};
use globe_common::{FeatureCollection, GeoFeature};
use tokio::{
    select,
    sync::{broadcast, mpsc::Receiver},
    task::{JoinSet, spawn_blocking},
};
use tokio_with_wasm::alias as tokio;
use winit::event_loop::EventLoopProxy;

use crate::app::{ApplicationEvent, ApplicationSettings};

#[derive(Debug, Clone)]
pub enum BackgroundEvent {
    /// Fetch and parse the boundary dataset for the view lifetime `generation`.
    BoundariesRequested { generation: u64 },
}

impl Display for BackgroundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackgroundEvent::BoundariesRequested { generation } => {
                write!(f, "Boundaries requested, generation {generation}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub task: String,
    pub running_tasks_left: usize,
}

impl TaskInfo {
    pub fn new(task: String, running_tasks_left: usize) -> Self {
        Self {
            task,
            running_tasks_left,
        }
    }
}

#[derive(Debug, Clone)]
pub enum BackgroundNotification {
    TaskStarted(TaskInfo),
    TaskFinished(TaskInfo),
    TaskErrored { task: TaskInfo, error: String },
    JoinError(String),
}

/// This handles async operations of the application:
/// the boundary dataset download and its parsing
#[derive(Debug)]
pub struct BackgroundRunner {
    settings: Arc<ApplicationSettings>,
    event_receiver: Receiver<BackgroundEvent>,
    render_event_loopback: EventLoopProxy<ApplicationEvent>,
    notification_broadcaster: broadcast::Sender<BackgroundNotification>,
    running_tasks: JoinSet<(String, Result<()>)>,
}

async fn get_dataset_from_http(dataset_url: &str) -> Result<Bytes> {
    reqwest::get(dataset_url)
        .await
        .wrap_err_with(|| format!("Error trying to fetch from {dataset_url}"))?
        .error_for_status()
        .wrap_err_with(|| format!("Error status fetching {dataset_url}"))?
        .bytes()
        .await
        .wrap_err_with(|| format!("Error decoding response from {dataset_url}"))
}

pub async fn fetch_boundaries(settings: &ApplicationSettings) -> Result<Vec<GeoFeature>> {
    let dataset = get_dataset_from_http(&settings.dataset_url).await?;
    log::info!("Downloaded boundary dataset: {} bytes", dataset.len());

    let features = spawn_blocking(move || FeatureCollection::from_slice(&dataset))
        .await?
        .wrap_err("Boundary dataset is not a feature collection")?;

    Ok(features)
}

impl BackgroundRunner {
    pub fn new(
        event_receiver: Receiver<BackgroundEvent>,
        render_event_loopback: EventLoopProxy<ApplicationEvent>,
        settings: Arc<ApplicationSettings>,
    ) -> Self {
        let (notification_broadcaster, _notification_subscriber) = broadcast::channel(128);
        Self {
            settings,
            event_receiver,
            render_event_loopback,
            running_tasks: JoinSet::new(),
            notification_broadcaster,
        }
    }

    pub async fn process_event(
        render_event_loopback: EventLoopProxy<ApplicationEvent>,
        event: BackgroundEvent,
        settings: Arc<ApplicationSettings>,
    ) -> Result<()> {
        use BackgroundEvent::*;

        match event {
            BoundariesRequested { generation } => {
                let features = fetch_boundaries(&settings).await?;

                if let Err(err) = render_event_loopback.send_event(
                    ApplicationEvent::BoundariesLoaded {
                        generation,
                        features,
                    },
                ) {
                    log::error!("{err}");
                }

                Ok(())
            }
        }
    }

    pub async fn run(&mut self) {
        loop {
            let notification = select! {
                Some(event) = self.event_receiver.recv() => {
                    let sender = self.render_event_loopback.clone();
                    let settings = Arc::clone(&self.settings);
                    let event_name = format!("{event}");
                    {
                        let event_name = event_name.clone();
                        self.running_tasks.spawn(async move {
                            (event_name, Self::process_event(sender, event, settings).await)
                        });
                    }
                    BackgroundNotification::TaskStarted(TaskInfo::new(event_name, self.running_tasks.len()))
                }
                Some(result) = self.running_tasks.join_next() => {
                    match result {
                        Ok((event, task_result)) => {
                            let task = TaskInfo::new(event, self.running_tasks.len());
                            match task_result {
                                Ok(()) => BackgroundNotification::TaskFinished(task),
                                Err(err) => {
                                    // the globe keeps rendering without borders
                                    log::error!("Background task failed: {err:?}");
                                    BackgroundNotification::TaskErrored {
                                        task,
                                        error: format!("{err:}")
                                    }
                                }
                            }
                        }
                        Err(err) => {
                            log::error!("Error joining task: {err:?}");
                            BackgroundNotification::JoinError(format!("{err:}"))
                        }
                    }
                }
                else => break,
            };
            let _ = self.notification_broadcaster.send(notification);
        }
    }

    pub fn get_notification_receiver(&self) -> broadcast::Receiver<BackgroundNotification> {
        self.notification_broadcaster.subscribe()
    }
}

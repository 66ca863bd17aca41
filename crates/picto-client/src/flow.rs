//! Client-side lifecycle of one image-tool submission
//!
//! A [`SubmissionFlow`] moves through `Idle -> Submitting -> Success | Failed`.
//! Only one submission is in flight at a time; observers follow the state
//! through a `watch` channel, which is how a UI renders the progress bar.

use std::{
    path::{Path, PathBuf},
    pin::pin,
    time::Duration,
};

use picto_core::ImageRef;
use tokio::sync::watch;

use crate::{error::ClientError, service::ImageService, types::SelectedImage};

/// Client-side bound on a whole submission
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Background colour used when the user does not pick one
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// The tool a submission runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Text-to-image generation
    Generate,
    /// Background removal
    RemoveBackground,
}

impl Tool {
    /// File name offered when saving the result
    pub const fn download_filename(self) -> &'static str {
        match self {
            Self::Generate => "generated-image.png",
            Self::RemoveBackground => "processed-image.png",
        }
    }
}

/// Progress shown while a submission is in flight
///
/// Purely cosmetic: it advances by [`Self::STEP`] every [`Self::INTERVAL`]
/// up to [`Self::CAP`] and says nothing about how far the provider actually is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CosmeticProgress(u8);

impl CosmeticProgress {
    pub const STEP: u8 = 10;
    pub const CAP: u8 = 90;
    pub const COMPLETE: u8 = 100;
    pub const INTERVAL: Duration = Duration::from_millis(500);

    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Move one step forward; returns `false` once the cap is reached
    pub fn advance(&mut self) -> bool {
        if self.0 >= Self::CAP {
            return false;
        }

        self.0 = self.0.saturating_add(Self::STEP).min(Self::CAP);
        true
    }
}

/// Where a flow currently is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Submitting {
        tool: Tool,
        progress: CosmeticProgress,
    },
    Success {
        tool: Tool,
        image: ImageRef,
    },
    Failed {
        tool: Tool,
        message: String,
    },
}

impl FlowState {
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Progress bar value: 0 when idle, 100 once resolved either way
    pub const fn progress(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Submitting { progress, .. } => progress.value(),
            Self::Success { .. } | Self::Failed { .. } => CosmeticProgress::COMPLETE,
        }
    }

    pub const fn image(&self) -> Option<&ImageRef> {
        match self {
            Self::Success { image, .. } => Some(image),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// User input for one submission
#[derive(Debug, Clone)]
pub enum Submission {
    Generate {
        prompt: String,
    },
    RemoveBackground {
        image: Option<SelectedImage>,
        background_color: Option<String>,
    },
}

impl Submission {
    pub fn generate(prompt: impl Into<String>) -> Self {
        Self::Generate { prompt: prompt.into() }
    }

    pub fn remove_background(image: Option<SelectedImage>) -> Self {
        Self::RemoveBackground {
            image,
            background_color: None,
        }
    }

    /// Pick the background colour; ignored for generation
    #[must_use]
    pub fn with_background_color(self, color: impl Into<String>) -> Self {
        match self {
            Self::RemoveBackground { image, .. } => Self::RemoveBackground {
                image,
                background_color: Some(color.into()),
            },
            generate @ Self::Generate { .. } => generate,
        }
    }

    pub const fn tool(&self) -> Tool {
        match self {
            Self::Generate { .. } => Tool::Generate,
            Self::RemoveBackground { .. } => Tool::RemoveBackground,
        }
    }

    fn prepare(self) -> Result<Job, FlowError> {
        match self {
            Self::Generate { prompt } if prompt.trim().is_empty() => Err(FlowError::MissingInput("Prompt is required")),
            Self::Generate { prompt } => Ok(Job::Generate(prompt)),
            Self::RemoveBackground { image, background_color } => {
                let image = image
                    .filter(|image| !image.bytes.is_empty())
                    .ok_or(FlowError::MissingInput("No image selected"))?;

                let background_color = background_color
                    .filter(|color| !color.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_owned());

                Ok(Job::RemoveBackground { image, background_color })
            }
        }
    }
}

/// A submission whose required input is present
enum Job {
    Generate(String),
    RemoveBackground {
        image: SelectedImage,
        background_color: String,
    },
}

/// Errors returned by [`SubmissionFlow`]
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Required input is absent; the state did not change
    #[error("{0}")]
    MissingInput(&'static str),

    /// Another submission is still in flight
    #[error("a submission is already in progress")]
    InFlight,

    /// The submission ran and failed; the flow is now `Failed`
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ClientError,
    },

    /// Download requested without a successful result
    #[error("there is no result to download")]
    NotReady,

    /// Fetching the result bytes failed; the flow state is unchanged
    #[error("download failed: {0}")]
    Download(#[source] ClientError),
}

/// A downloadable result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write the artifact into `dir` under its file name
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub async fn save(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// Message shown when a submission is abandoned before it resolves
pub const CANCELLED_MESSAGE: &str = "The submission was cancelled. Please try again.";

/// Moves a `Submitting` flow to `Failed` if the submit future is dropped early
struct InFlightGuard<'a> {
    state: &'a watch::Sender<FlowState>,
    tool: Tool,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        tracing::debug!(tool = ?self.tool, "submission dropped before it resolved");
        self.state.send_replace(FlowState::Failed {
            tool: self.tool,
            message: CANCELLED_MESSAGE.to_owned(),
        });
    }
}

/// State machine for one tool's submissions
pub struct SubmissionFlow<S> {
    service: S,
    state: watch::Sender<FlowState>,
    timeout: Duration,
}

impl<S: ImageService> SubmissionFlow<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: watch::Sender::new(FlowState::Idle),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the client-side timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FlowState {
        self.state.borrow().clone()
    }

    /// Follow state changes, progress ticks included
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    /// Run one submission to completion
    ///
    /// Invalid input is rejected without touching the state or the network.
    /// Otherwise exactly one service call is made, bounded by the flow
    /// timeout, and the flow ends in `Success` or `Failed`.
    ///
    /// # Errors
    ///
    /// [`FlowError::MissingInput`] and [`FlowError::InFlight`] leave the state
    /// as it was; [`FlowError::Failed`] means the flow is now `Failed`.
    /// Dropping the returned future before it completes also leaves the flow
    /// `Failed`, so the next submit is accepted.
    pub async fn submit(&self, submission: Submission) -> Result<ImageRef, FlowError> {
        let tool = submission.tool();
        let job = submission.prepare()?;

        let guard = self.begin(tool)?;
        tracing::debug!(?tool, "submission started");

        let result = match tokio::time::timeout(self.timeout, self.run_with_progress(job)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        };

        guard.disarm();
        self.resolve(tool, result)
    }

    /// Produce the downloadable artifact for the current `Success`
    ///
    /// URL results are fetched with a plain `GET`; inline results are used as
    /// they are. Never calls a provider, so repeating it is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NotReady`] outside `Success`, or
    /// [`FlowError::Download`] if the image cannot be fetched
    pub async fn download(&self) -> Result<Artifact, FlowError> {
        let FlowState::Success { tool, image } = self.state() else {
            return Err(FlowError::NotReady);
        };

        let filename = tool.download_filename().to_owned();

        match image {
            ImageRef::Inline { content_type, data } => Ok(Artifact {
                filename,
                content_type,
                bytes: data,
            }),
            ImageRef::Url(url) => {
                let fetched = self.service.fetch(&url).await.map_err(FlowError::Download)?;
                Ok(Artifact {
                    filename,
                    content_type: fetched.content_type,
                    bytes: fetched.bytes,
                })
            }
        }
    }

    fn begin(&self, tool: Tool) -> Result<InFlightGuard<'_>, FlowError> {
        let mut accepted = false;

        self.state.send_if_modified(|state| {
            if state.is_submitting() {
                return false;
            }

            *state = FlowState::Submitting {
                tool,
                progress: CosmeticProgress::new(),
            };
            accepted = true;
            true
        });

        if accepted {
            Ok(InFlightGuard {
                state: &self.state,
                tool,
                armed: true,
            })
        } else {
            Err(FlowError::InFlight)
        }
    }

    fn tick(&self) {
        self.state.send_if_modified(|state| match state {
            FlowState::Submitting { progress, .. } => progress.advance(),
            _ => false,
        });
    }

    fn resolve(&self, tool: Tool, result: Result<ImageRef, ClientError>) -> Result<ImageRef, FlowError> {
        match result {
            Ok(image) => {
                tracing::debug!(?tool, "submission succeeded");
                self.state.send_replace(FlowState::Success {
                    tool,
                    image: image.clone(),
                });
                Ok(image)
            }
            Err(source) => {
                let message = source.user_message();
                tracing::warn!(?tool, error = %source, "submission failed");
                self.state.send_replace(FlowState::Failed {
                    tool,
                    message: message.clone(),
                });
                Err(FlowError::Failed { message, source })
            }
        }
    }

    async fn run_with_progress(&self, job: Job) -> Result<ImageRef, ClientError> {
        let mut call = pin!(self.dispatch(job));

        let interval = CosmeticProgress::INTERVAL;
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);

        loop {
            tokio::select! {
                result = &mut call => return result,
                _ = ticker.tick() => self.tick(),
            }
        }
    }

    async fn dispatch(&self, job: Job) -> Result<ImageRef, ClientError> {
        match job {
            Job::Generate(prompt) => self.service.generate(&prompt).await,
            Job::RemoveBackground { image, background_color } => {
                self.service.remove_background(&image, &background_color).await
            }
        }
    }
}

use iced::event::{self, Event};
use iced::widget::stack;
use iced::{window, Element, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::AssetError;
use crate::service::ExtractionService;
use crate::state::asset::{self, AssetFile, AssetSelector, DropBatch, PICKER_EXTENSIONS};
use crate::state::carrier::{ResultCarrier, Route};
use crate::state::params::ExtractionParameters;
use crate::state::preview::PreviewRegistry;
use crate::state::request::ExtractionRequest;
use crate::state::submission::{Settlement, SubmissionController, SubmissionState};
use crate::ui::entry::{self, EntryProps};
use crate::ui::loading;
use crate::ui::results::ResultsView;

/// Main application state
pub struct PaletteExtractor {
    config: AppConfig,
    selector: AssetSelector,
    params: ExtractionParameters,
    /// Raw text of the color-count field, kept so partial input survives
    color_count_input: String,
    controller: SubmissionController,
    carrier: ResultCarrier,
    route: Route,
    /// Present only while the results route is shown
    results: Option<ResultsView>,
    drop_batch: DropBatch,
    /// Bumped by every load and by clearing; only the latest load may land
    load_generation: u64,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Choose Image…"
    PickFile,
    /// A file is being dragged over the window
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    /// Background read of a picked or dropped file finished, tagged with
    /// the load generation it was started for
    AssetLoaded(u64, Result<AssetFile, AssetError>),
    ClearAsset,
    ColorCountChanged(String),
    BrightnessChanged(i32),
    ContrastChanged(i32),
    GrayscaleToggled(bool),
    ResetParameters,
    Submit,
    CancelSubmission,
    /// The extraction request came back (or timed out)
    Settled(Settlement),
    Navigate(Route),
    /// A swatch or marker was clicked in the results view
    SwatchPressed(usize),
}

impl Message {
    /// Messages still handled while a request is in flight.
    ///
    /// Hover tracking never touches the selection, and a drag may start
    /// before the request settles.
    fn allowed_in_flight(&self) -> bool {
        matches!(
            self,
            Message::Settled(_)
                | Message::CancelSubmission
                | Message::Submit
                | Message::FileHovered
                | Message::FilesHoveredLeft
        )
    }
}

impl PaletteExtractor {
    pub fn new(
        config: AppConfig,
        service: Arc<dyn ExtractionService>,
        registry: PreviewRegistry,
    ) -> Self {
        let params = config.default_parameters;
        let controller = SubmissionController::new(service, config.request_timeout());

        Self {
            color_count_input: params.color_count.to_string(),
            params,
            selector: AssetSelector::new(registry),
            controller,
            carrier: ResultCarrier::new(),
            route: Route::Entry,
            results: None,
            drop_batch: DropBatch::default(),
            load_generation: 0,
            status: "Choose an image to extract its palette.".to_string(),
            config,
        }
    }

    /// Initial state for `iced::application(..).run_with`
    pub fn boot(
        config: AppConfig,
        service: Arc<dyn ExtractionService>,
        registry: PreviewRegistry,
    ) -> (Self, Task<Message>) {
        info!(endpoint = %config.endpoint, "Palette extractor initialized");
        (Self::new(config, service, registry), Task::none())
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        if self.controller.is_in_flight() && !message.allowed_in_flight() {
            debug!("Ignoring input while extraction is in flight");
            return Task::none();
        }

        match message {
            Message::PickFile => {
                let picked = FileDialog::new()
                    .set_title("Select an Image")
                    .add_filter("Images", PICKER_EXTENSIONS)
                    .pick_files()
                    .and_then(asset::first_file);

                match picked {
                    Some(path) => self.load(path),
                    None => Task::none(),
                }
            }
            Message::FileHovered => {
                self.drop_batch.hovered();
                Task::none()
            }
            Message::FilesHoveredLeft => {
                self.drop_batch.left();
                Task::none()
            }
            Message::FileDropped(path) => match self.drop_batch.dropped(path) {
                Some(path) => self.load(path),
                None => Task::none(),
            },
            Message::AssetLoaded(generation, _) if generation != self.load_generation => {
                debug!(
                    generation,
                    current = self.load_generation,
                    "Dropping superseded image load"
                );
                Task::none()
            }
            Message::AssetLoaded(_, Ok(file)) => {
                self.status = format!("Ready to extract colors from {}.", file.file_name);
                self.selector.set_asset(file);
                Task::none()
            }
            Message::AssetLoaded(_, Err(e)) => {
                warn!(error = %e, "Could not load image");
                self.status = e.to_string();
                Task::none()
            }
            Message::ClearAsset => {
                self.load_generation += 1;
                self.selector.clear();
                self.status = "Choose an image to extract its palette.".to_string();
                Task::none()
            }
            Message::ColorCountChanged(text) => {
                self.params.set_color_count_text(&text);
                self.color_count_input = text;
                Task::none()
            }
            Message::BrightnessChanged(value) => {
                self.params.set_brightness(value);
                Task::none()
            }
            Message::ContrastChanged(value) => {
                self.params.set_contrast(value);
                Task::none()
            }
            Message::GrayscaleToggled(grayscale) => {
                self.params.grayscale = grayscale;
                Task::none()
            }
            Message::ResetParameters => {
                self.params = self.config.default_parameters;
                self.color_count_input = self.params.color_count.to_string();
                Task::none()
            }
            Message::Submit => {
                let request = ExtractionRequest::build(self.selector.current(), &self.params);
                match self.controller.submit(request) {
                    Ok(dispatch) => {
                        self.status = format!("Uploading to {}", self.config.endpoint);
                        Task::perform(dispatch.run(), Message::Settled)
                    }
                    Err(rejected) => {
                        if !self.controller.is_in_flight() {
                            self.status = rejected.to_string();
                        }
                        Task::none()
                    }
                }
            }
            Message::CancelSubmission => {
                if self.controller.abort() {
                    self.status = "Extraction cancelled.".to_string();
                }
                Task::none()
            }
            Message::Settled(settlement) => {
                self.settle(settlement);
                Task::none()
            }
            Message::Navigate(route) => {
                self.enter(route);
                Task::none()
            }
            Message::SwatchPressed(index) => {
                let Some(color) = self.results.as_mut().and_then(|view| view.select(index)) else {
                    return Task::none();
                };
                self.status = format!("Copied {} to the clipboard.", color);
                iced::clipboard::write(color.to_string())
            }
        }
    }

    fn load(&mut self, path: PathBuf) -> Task<Message> {
        self.load_generation += 1;
        let generation = self.load_generation;

        self.status = format!("Loading {}…", path.display());
        Task::perform(
            AssetFile::load(path, self.config.max_asset_bytes),
            move |result| Message::AssetLoaded(generation, result),
        )
    }

    fn settle(&mut self, settlement: Settlement) {
        let was_in_flight = self.controller.is_in_flight();
        let Some(result) = self.controller.settle(settlement).cloned() else {
            if let (true, SubmissionState::Failed(e)) = (was_in_flight, self.controller.state()) {
                self.status = format!("Extraction failed: {}", e);
            }
            return;
        };

        match self.selector.take() {
            Some(asset) => {
                let route = self.carrier.handoff(result, asset.preview);
                self.enter(route);
            }
            None => {
                // Selection is locked while in flight, so this means a bug upstream
                warn!("Extraction succeeded but no image is selected");
                self.status = "Extraction finished without an image to show.".to_string();
            }
        }
    }

    fn enter(&mut self, route: Route) {
        match route {
            Route::Entry => {
                if self.results.take().is_some() {
                    debug!("Leaving results view");
                }
                self.route = Route::Entry;
            }
            Route::Results if self.results.is_some() => {}
            Route::Results => match self.carrier.receive() {
                Ok(payload) => {
                    self.status = format!("Extracted {} colors.", payload.result.len());
                    self.results = Some(ResultsView::new(payload));
                    self.route = Route::Results;
                }
                Err(e) => {
                    warn!(error = %e, "Results view opened without a result, redirecting");
                    self.status = e.to_string();
                    self.route = Route::Entry;
                }
            },
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let content = match (self.route, &self.results) {
            (Route::Results, Some(results)) => results.view(),
            _ => entry::view(EntryProps {
                asset: self.selector.current(),
                params: &self.params,
                defaults: &self.config.default_parameters,
                color_count_input: &self.color_count_input,
                submission: self.controller.state(),
                status: &self.status,
                drop_hovering: self.drop_batch.is_hovering(),
            }),
        };

        if self.controller.is_in_flight() {
            stack![content, loading::overlay(&self.status)].into()
        } else {
            content
        }
    }

    /// Window drag-and-drop events
    pub fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

// lib.rs - shared core for the address pin map

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod capabilities;
pub mod config;
pub mod dataset;
pub mod event;
pub mod filter;
pub mod list_view;
pub mod map_view;
pub mod model;
pub mod selection;
pub mod view_model;
pub mod view_state;
pub mod viewport;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::MapConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{Coordinate, LoadState, Location, Model, RecordId};
pub use view_model::ViewModel;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 19.0;
/// Wide continental view used when nothing can be fitted.
pub const FALLBACK_ZOOM: f64 = 4.0;
pub const DETAIL_ZOOM: f64 = 15.0;
pub const FALLBACK_CENTER: Coordinate = Coordinate::fixed(-14.235, -51.925);

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_DATA_PATH: &str = "address.json";
pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/50/CCCCCC/000000?text=NoImg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    NotFound,
    Deserialization,
    Validation,
    Configuration,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network => ErrorSeverity::Transient,
            Self::NotFound | Self::Deserialization | Self::Validation | Self::Configuration => {
                ErrorSeverity::Permanent
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " ({internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

pub mod app {
    use tracing::{debug, error, info, warn};

    use super::{AppError, Event, Model, ViewModel};
    use crate::capabilities::Capabilities;
    use crate::config::MapConfig;
    use crate::dataset::{self, LoadError};
    use crate::filter;
    use crate::model::{LoadState, Location};
    use crate::selection::{self, SelectionOrigin};
    use crate::viewport::ZoomLevel;

    #[derive(Default)]
    pub struct App;

    impl App {
        /// Installs the loaded dataset: fit once to everything, then render
        /// whatever the current filter lets through.
        pub fn apply_load(model: &mut Model, result: Result<Vec<Location>, LoadError>) {
            match result {
                Ok(locations) => {
                    model.dataset = locations;
                    model.view.map.fit_to_records(&model.dataset);
                    model.load_state = LoadState::Loaded {
                        total: model.dataset.len(),
                        mappable: model.mappable_count(),
                    };
                    Self::refresh_views(model);
                }
                Err(e) => {
                    error!(error = %e, "failed to load the address list");
                    model.load_state = LoadState::Failed {
                        error: AppError::from(e),
                    };
                }
            }
        }

        /// Re-runs the filter over the full dataset and rebuilds both views.
        fn refresh_views(model: &mut Model) {
            let ids = filter::filter_dataset(&model.dataset, &model.filter_term);
            model
                .view
                .rebuild(&model.dataset, &ids, &model.config.placeholder_image_url);
        }

        fn start_load(model: &mut Model, caps: &Capabilities) {
            if model.load_state.has_started() {
                warn!(state = ?model.load_state, "dataset load already started, ignoring");
                return;
            }

            match model.config.data_url() {
                Ok(url) => {
                    info!(url = url.as_str(), "fetching address list");
                    model.load_state = LoadState::Loading;
                    caps.http
                        .get(url.as_str())
                        .send(|result| Event::DatasetFetched(Box::new(result)));
                }
                Err(e) => {
                    error!(error = %e, "no usable data source");
                    model.load_state = LoadState::Failed {
                        error: AppError::from(e),
                    };
                }
            }
        }

        fn configure(model: &mut Model, config: MapConfig) {
            if let Err(e) = config.validate() {
                warn!(error = %e, "configuration rejected, keeping the previous one");
                return;
            }
            if model.load_state.has_started() && config.data_url().ok() != model.config.data_url().ok() {
                warn!("data source changed after loading started; it applies to the next session");
            }

            model.view.apply_config(&config);
            model.config = config;
            if !model.dataset.is_empty() {
                Self::refresh_views(model);
            }
            debug!("configuration applied");
        }

        fn select(model: &mut Model, id: crate::RecordId, origin: SelectionOrigin) {
            selection::select(&mut model.view, id, origin);
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            let event_name = event.name();
            if event.is_user_initiated() {
                debug!(event = event_name, "user action");
            }

            match event {
                Event::Noop => {}

                Event::AppStarted => {
                    Self::start_load(model, caps);
                    caps.render.render();
                }

                Event::Configure { config } => {
                    Self::configure(model, *config);
                    caps.render.render();
                }

                Event::DatasetFetched(result) => {
                    if !model.load_state.is_loading() {
                        warn!(state = ?model.load_state, "unexpected dataset response ignored");
                        return;
                    }
                    Self::apply_load(model, dataset::load_from_response(*result));
                    caps.render.render();
                }

                Event::FilterChanged { term } => {
                    model.filter_term = term;
                    Self::refresh_views(model);
                    caps.render.render();
                }

                Event::MarkerSelected { id } => {
                    Self::select(model, id, SelectionOrigin::Marker);
                    caps.render.render();
                }

                Event::EntrySelected { id } => {
                    Self::select(model, id, SelectionOrigin::Entry);
                    caps.render.render();
                }

                Event::ViewportChanged { center, zoom } => {
                    // The shell is already showing this view.
                    model.view.map.set_view(center, ZoomLevel::new(zoom));
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel::from(model)
        }
    }
}

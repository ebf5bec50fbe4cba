use crate::utils::ui::Ui;
use askbox_core::settings::ClientSettings;
use std::sync::Arc;

/// AppContext provides access to shared application resources
pub struct AppContext {
    /// UI instance for managing terminal output
    pub ui: Arc<Ui>,
    /// Job system connection and tracking settings
    pub settings: ClientSettings,
}

impl AppContext {
    pub fn new(settings: ClientSettings) -> Self {
        let ui = Arc::new(Ui::new());

        AppContext { ui, settings }
    }

    pub fn ui(&self) -> &Arc<Ui> {
        &self.ui
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }
}

//! Core SlackrApp struct definition and initialization

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread;

use crate::backend::run_backend;
use crate::config::{load_session, load_settings, save_settings, Settings};
use crate::dialog_manager::DialogManager;
use crate::input_state::InputState;
use crate::model::ChannelId;
use crate::protocol::{BackendAction, GuiEvent};
use crate::state::ClientState;
use crate::ui;
use crate::ui::auth::AuthForm;
use crate::ui::panels::SidebarState;
use crate::ui::theme::SlackrTheme;

pub struct SlackrApp {
    // Session, channels and the feed
    pub state: ClientState,

    // Channels for backend communication
    pub action_tx: Sender<BackendAction>,
    pub event_rx: Receiver<GuiEvent>,

    // Login / register form
    pub auth: AuthForm,

    // Composer text, drafts and history
    pub input: InputState,
    /// Channel the composer text currently belongs to
    pub(super) composer_channel: Option<ChannelId>,

    pub sidebar: SidebarState,

    // Dialogs - managed centrally by DialogManager
    pub dialogs: DialogManager,

    pub settings: Settings,
    pub theme: SlackrTheme,

    /// The feed measures rows with real fonts once the first frame runs
    pub(super) measure_installed: bool,
}

impl SlackrApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Create channels for UI <-> Backend
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<GuiEvent>();

        let settings = load_settings();
        tracing::info!(backend = %settings.backend_url, "starting");

        // Spawn the backend thread
        let base_url = settings.backend_url.clone();
        thread::spawn(move || {
            run_backend(action_rx, event_tx, base_url);
        });

        let theme = SlackrTheme::from_setting(&settings.theme);
        ui::theme::apply_app_style(&cc.egui_ctx, &theme);

        let mut app = Self {
            state: ClientState::new(),
            action_tx,
            event_rx,
            auth: AuthForm::new(&settings.last_email),
            input: InputState::new(),
            composer_channel: None,
            sidebar: SidebarState::default(),
            dialogs: DialogManager::new(),
            settings,
            theme,
            measure_installed: false,
        };

        // Pick up where the last run left off
        if let Some(session) = load_session() {
            app.auth.pending = true;
            app.send(BackendAction::RestoreSession(session));
        }

        app
    }

    pub(super) fn send(&self, action: BackendAction) {
        if self.action_tx.send(action).is_err() {
            tracing::error!("backend thread is gone; dropping action");
        }
    }

    pub(super) fn send_all(&self, actions: impl IntoIterator<Item = BackendAction>) {
        for action in actions {
            self.send(action);
        }
    }

    pub(super) fn toggle_theme(&mut self, ctx: &eframe::egui::Context) {
        let next = if self.settings.theme == "light" { "dark" } else { "light" };
        self.settings.theme = next.to_string();
        self.theme = SlackrTheme::from_setting(next);
        ui::theme::apply_app_style(ctx, &self.theme);
    }

    pub(super) fn save_settings(&self) {
        if let Err(e) = save_settings(&self.settings) {
            tracing::warn!("failed to save settings: {}", e);
        }
    }
}

impl Drop for SlackrApp {
    fn drop(&mut self) {
        // Persist settings on exit and let the backend wind down
        self.save_settings();
        let _ = self.action_tx.send(BackendAction::Shutdown);
    }
}

//! Login and registration screen shown while there is no session.

use eframe::egui;

use crate::protocol::BackendAction;
use crate::ui::theme::SlackrTheme;
use crate::validation::{validate_login, validate_registration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Self-contained auth form state.
#[derive(Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm: String,
    /// Validation or server error shown under the form
    pub error: Option<String>,
    /// A request is on its way; the submit button is disabled
    pub pending: bool,
}

impl AuthForm {
    pub fn new(last_email: &str) -> Self {
        Self {
            email: last_email.to_string(),
            ..Self::default()
        }
    }

    /// Validate the form and build the backend request
    pub fn submit(&self) -> Result<BackendAction, String> {
        let email = self.email.trim().to_string();
        match self.mode {
            AuthMode::Login => {
                validate_login(&email, &self.password)?;
                Ok(BackendAction::Login {
                    email,
                    password: self.password.clone(),
                })
            }
            AuthMode::Register => {
                validate_registration(&email, &self.name, &self.password, &self.confirm)?;
                Ok(BackendAction::Register {
                    email,
                    name: self.name.trim().to_string(),
                    password: self.password.clone(),
                })
            }
        }
    }

    /// The backend answered with an error
    pub fn fail(&mut self, message: impl Into<String>) {
        self.pending = false;
        self.error = Some(message.into());
    }

    /// Clear secrets once a session exists
    pub fn reset_secrets(&mut self) {
        self.password.clear();
        self.confirm.clear();
        self.error = None;
        self.pending = false;
    }

    fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.error = None;
        self.confirm.clear();
    }

    /// Render the form. Returns the request to send when the user submits a
    /// valid form.
    pub fn render(&mut self, ctx: &egui::Context, theme: &SlackrTheme) -> Option<BackendAction> {
        let mut action = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface[0]))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space((ui.available_height() * 0.2).max(24.0));
                    ui.label(egui::RichText::new("Slackr").size(32.0).strong().color(theme.accent));
                    ui.add_space(16.0);

                    egui::Frame::new()
                        .fill(theme.surface[2])
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::same(24))
                        .show(ui, |ui| {
                            ui.set_width(320.0);
                            ui.horizontal(|ui| {
                                if ui.selectable_label(self.mode == AuthMode::Login, "Log in").clicked() {
                                    self.switch_mode(AuthMode::Login);
                                }
                                if ui
                                    .selectable_label(self.mode == AuthMode::Register, "Register")
                                    .clicked()
                                {
                                    self.switch_mode(AuthMode::Register);
                                }
                            });
                            ui.add_space(12.0);

                            let mut enter = false;
                            let mut field = |ui: &mut egui::Ui, label: &str, value: &mut String, secret: bool| {
                                ui.label(egui::RichText::new(label).color(theme.text_secondary));
                                let response = ui.add(
                                    egui::TextEdit::singleline(value)
                                        .password(secret)
                                        .desired_width(f32::INFINITY),
                                );
                                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                    enter = true;
                                }
                                ui.add_space(6.0);
                            };

                            field(ui, "Email", &mut self.email, false);
                            if self.mode == AuthMode::Register {
                                field(ui, "Name", &mut self.name, false);
                            }
                            field(ui, "Password", &mut self.password, true);
                            if self.mode == AuthMode::Register {
                                field(ui, "Confirm password", &mut self.confirm, true);
                            }

                            if let Some(error) = &self.error {
                                ui.colored_label(theme.error, error);
                                ui.add_space(6.0);
                            }

                            let label = match self.mode {
                                AuthMode::Login => "Log in",
                                AuthMode::Register => "Create account",
                            };
                            let clicked = ui
                                .add_enabled(
                                    !self.pending,
                                    egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0)),
                                )
                                .clicked();

                            if (clicked || enter) && !self.pending {
                                match self.submit() {
                                    Ok(request) => {
                                        self.error = None;
                                        self.pending = true;
                                        action = Some(request);
                                    }
                                    Err(e) => self.error = Some(e),
                                }
                            }
                            if self.pending {
                                ui.add_space(6.0);
                                ui.spinner();
                            }
                        });
                });
            });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_submit() {
        let mut form = AuthForm::new("alice@example.com");
        assert_eq!(form.submit().unwrap_err(), "Please enter your email and password");

        form.password = "hunter2".into();
        match form.submit().unwrap() {
            BackendAction::Login { email, password } => {
                assert_eq!(email, "alice@example.com");
                assert_eq!(password, "hunter2");
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_register_requires_matching_passwords() {
        let mut form = AuthForm::new("bob@example.com");
        form.switch_mode(AuthMode::Register);
        form.name = " Bob ".into();
        form.password = "pw".into();
        form.confirm = "px".into();
        assert_eq!(form.submit().unwrap_err(), "Password does not match");

        form.confirm = "pw".into();
        match form.submit().unwrap() {
            BackendAction::Register { name, .. } => assert_eq!(name, "Bob"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_fail_and_reset() {
        let mut form = AuthForm::new("");
        form.pending = true;
        form.password = "secret".into();
        form.fail("Invalid email or password");
        assert!(!form.pending);
        assert_eq!(form.error.as_deref(), Some("Invalid email or password"));

        form.reset_secrets();
        assert!(form.password.is_empty());
        assert!(form.error.is_none());
    }
}

use std::fmt::Write;

use melodex::{MelodexError, auth::Registered, validate::ValidationErrors};

use super::{View, split_command};
use crate::shell::{data::Data, render::heading, router::Route};

/// Credentials refused by the server. Unlike elsewhere a 401/403 here is
/// not an expired session: there is no session yet.
fn rejected(err: &MelodexError) -> bool {
    matches!(
        err.status().map(|s| s.as_u16()),
        Some(400 | 401 | 403 | 404)
    )
}

fn field_line(out: &mut String, label: &str, value: &str, errors: &ValidationErrors, field: &str) {
    writeln!(out, "{label:<10} {value}").ok();
    if let Some(message) = errors.field(field) {
        writeln!(out, "{:<10} ^ {message}", "").ok();
    }
}

fn mask(password: &str) -> String {
    "*".repeat(password.chars().count())
}

#[derive(Default)]
pub struct LoginView {
    email: String,
    password: String,
    errors: ValidationErrors,
}

impl View for LoginView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("set email <address>", "fill in the email field"),
        ("set password <password>", "fill in the password field"),
        ("submit", "log in"),
        ("register", "create an account instead"),
    ];

    async fn mount(&mut self, data: &Data) {
        if data.session().is_authenticated() {
            data.navigator.navigate(Route::Home);
        }
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "set" => {
                let (field, value) = split_command(args);
                match field {
                    "email" => self.email = value.trim().to_string(),
                    // sent exactly as typed
                    "password" => self.password = value.to_string(),
                    _ => data.toasts.warn(format!("Unknown field `{field}`.")),
                }
            }
            "submit" => self.submit(data).await,
            "register" => data.navigator.navigate(Route::Register),
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Login.title());
        field_line(&mut out, "Email", &self.email, &self.errors, "email");
        field_line(
            &mut out,
            "Password",
            &mask(&self.password),
            &self.errors,
            "password",
        );
        out
    }
}

impl LoginView {
    async fn submit(&mut self, data: &Data) {
        self.errors = ValidationErrors::default();

        match data.client.login(&self.email, &self.password).await {
            Ok(_) => {
                data.toasts.success("Logged in successfully.");
                data.navigator.navigate(Route::Home);
            }
            Err(MelodexError::Validation(errors)) => self.errors = errors,
            Err(e) if rejected(&e) => {
                tracing::info!(status = ?e.status(), "login rejected");
                data.toasts.error("Wrong email or password.");
            }
            Err(e) => data.fail(&e, "logging in"),
        }
    }
}

#[derive(Default)]
pub struct RegisterView {
    name: String,
    email: String,
    password: String,
    errors: ValidationErrors,
}

impl View for RegisterView {
    const COMMANDS: &'static [(&'static str, &'static str)] = &[
        ("set name <name>", "fill in your name"),
        ("set email <address>", "fill in the email field"),
        ("set password <password>", "at least 6 characters"),
        ("submit", "create the account"),
        ("login", "log in with an existing account"),
    ];

    async fn mount(&mut self, data: &Data) {
        if data.session().is_authenticated() {
            data.navigator.navigate(Route::Home);
        }
    }

    async fn handle(&mut self, data: &Data, cmd: &str, args: &str) -> bool {
        match cmd {
            "set" => {
                let (field, value) = split_command(args);
                match field {
                    "name" => self.name = value.trim().to_string(),
                    "email" => self.email = value.trim().to_string(),
                    "password" => self.password = value.to_string(),
                    _ => data.toasts.warn(format!("Unknown field `{field}`.")),
                }
            }
            "submit" => self.submit(data).await,
            "login" => data.navigator.navigate(Route::Login),
            _ => return false,
        }
        true
    }

    fn render(&self, _data: &Data) -> String {
        let mut out = String::new();
        heading(&mut out, Route::Register.title());
        field_line(&mut out, "Name", &self.name, &self.errors, "name");
        field_line(&mut out, "Email", &self.email, &self.errors, "email");
        field_line(
            &mut out,
            "Password",
            &mask(&self.password),
            &self.errors,
            "password",
        );
        out
    }
}

impl RegisterView {
    async fn submit(&mut self, data: &Data) {
        self.errors = ValidationErrors::default();

        match data
            .client
            .register(&self.name, &self.email, &self.password)
            .await
        {
            Ok(Registered::LoggedIn) => {
                data.toasts.success("Registration successful!");
                data.navigator.navigate(Route::Home);
            }
            Ok(Registered::LoginRequired) => {
                data.toasts
                    .success("Registration successful! Redirecting to login page...");
                data.navigator
                    .navigate_after(Route::Login, data.config.session.redirect_delay());
            }
            Err(MelodexError::Validation(errors)) => self.errors = errors,
            Err(e) if e.is_unauthorized() => {
                tracing::warn!(error = %e, "registration refused");
                data.toasts.error("An error occurred during registration.");
            }
            Err(e) => data.fail(&e, "registering"),
        }
    }
}

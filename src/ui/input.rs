//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    App, AppState, LoginFocus, PasswordFocus, PlanField, ResetFocus, Screen, Tab,
};
use crate::routes::Route;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Overlay states capture all input first
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key).await;
    }

    if matches!(app.state, AppState::EditingPlan) {
        return handle_plan_editor_input(app, key).await;
    }

    if matches!(app.state, AppState::EditingPassword) {
        return handle_password_form_input(app, key).await;
    }

    match app.screen {
        Screen::Login => handle_login_input(app, key).await,
        Screen::ForgotPassword => handle_forgot_input(app, key).await,
        Screen::VerifyOtp => handle_otp_input(app, key).await,
        Screen::ResetPassword => handle_reset_input(app, key).await,
        Screen::Dashboard => handle_dashboard_input(app, key).await,
    }
}

// ============================================================================
// Auth screens
// ============================================================================

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit from the login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::F(2) => {
            app.forgot.email = app.login.email.clone();
            app.navigate(Route::ForgotPassword);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login.focus = match app.login.focus {
                LoginFocus::Email => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Email,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login.focus = match app.login.focus {
                LoginFocus::Email => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Email,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Email => app.login.focus = LoginFocus::Password,
            LoginFocus::Password => app.login.focus = LoginFocus::Button,
            LoginFocus::Button => app.attempt_login().await,
        },
        KeyCode::Backspace => match app.login.focus {
            LoginFocus::Email => {
                app.login.email.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login.focus {
            LoginFocus::Email => app.login.email.push(c),
            LoginFocus::Password => app.login.password.push(c),
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_forgot_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Enter => app.submit_forgot_password().await,
        KeyCode::Backspace => {
            app.forgot.email.pop();
        }
        KeyCode::Char(c) => app.forgot.email.push(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_otp_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::ForgotPassword),
        KeyCode::Enter => app.submit_verify_otp().await,
        KeyCode::Backspace => {
            app.otp.otp.pop();
        }
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => app.otp.otp.push(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_reset_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::VerifyOtp),
        KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
            app.reset.focus = match app.reset.focus {
                ResetFocus::Password => ResetFocus::Confirm,
                ResetFocus::Confirm => ResetFocus::Password,
            };
        }
        KeyCode::Enter => app.submit_reset_password().await,
        KeyCode::Backspace => match app.reset.focus {
            ResetFocus::Password => {
                app.reset.password.pop();
            }
            ResetFocus::Confirm => {
                app.reset.confirm.pop();
            }
        },
        KeyCode::Char(c) => match app.reset.focus {
            ResetFocus::Password => app.reset.password.push(c),
            ResetFocus::Confirm => app.reset.confirm.push(c),
        },
        _ => {}
    }
    Ok(false)
}

// ============================================================================
// Dashboard
// ============================================================================

async fn handle_dashboard_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.navigate(Route::Dashboard);
            app.tab = Tab::Overview;
        }
        KeyCode::Char('2') => app.navigate(Route::Users),
        KeyCode::Char('3') => app.navigate(Route::Subscriptions),
        KeyCode::Char('4') => app.navigate(Route::Settings),
        KeyCode::Left => app.tab = app.tab.prev(),
        KeyCode::Right => app.tab = app.tab.next(),
        KeyCode::Char('u') => app.refresh_all_background().await,
        KeyCode::Char('/') if matches!(app.tab, Tab::Users | Tab::Plans) => {
            app.search_input = match app.tab {
                Tab::Users => app.users_search.clone(),
                _ => app.plans_search.clone(),
            };
            app.state = AppState::Searching;
        }
        KeyCode::Esc => {
            // Clear an active filter on the list tabs
            match app.tab {
                Tab::Users if !app.users_search.is_empty() => {
                    app.users_search.clear();
                    app.users_page = 1;
                    app.fetch_users_background().await;
                }
                Tab::Plans if !app.plans_search.is_empty() => {
                    app.plans_search.clear();
                    app.plans_page = 1;
                    app.fetch_plans_background().await;
                }
                _ => {}
            }
        }
        _ => match app.tab {
            Tab::Users => handle_users_input(app, key).await?,
            Tab::Plans => handle_plans_input(app, key).await?,
            Tab::Settings => handle_settings_input(app, key).await?,
            Tab::Overview => {}
        },
    }

    Ok(false)
}

async fn handle_users_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let max_index = app.users.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.users_selection = (app.users_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.users_selection = app.users_selection.saturating_sub(1);
        }
        KeyCode::Home => app.users_selection = 0,
        KeyCode::End => app.users_selection = max_index,
        KeyCode::Char('n') => app.users_next_page().await,
        KeyCode::Char('p') => app.users_prev_page().await,
        _ => {}
    }
    Ok(())
}

async fn handle_plans_input(app: &mut App, key: KeyEvent) -> Result<()> {
    let max_index = app.plans.len().saturating_sub(1);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.plans_selection = (app.plans_selection + 1).min(max_index);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.plans_selection = app.plans_selection.saturating_sub(1);
        }
        KeyCode::Home => app.plans_selection = 0,
        KeyCode::End => app.plans_selection = max_index,
        KeyCode::Char('n') => app.plans_next_page().await,
        KeyCode::Char('p') => app.plans_prev_page().await,
        KeyCode::Char('e') | KeyCode::Enter => app.edit_selected_plan().await,
        KeyCode::Char('a') => app.new_plan(),
        _ => {}
    }
    Ok(())
}

async fn handle_settings_input(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.code == KeyCode::Char('c') {
        app.password_form.focus = PasswordFocus::Current;
        app.state = AppState::EditingPassword;
    }
    Ok(())
}

// ============================================================================
// Modal input
// ============================================================================

async fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_input.clear();
        }
        KeyCode::Enter => app.apply_search().await,
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_password_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.password_form = Default::default();
        }
        KeyCode::Tab | KeyCode::Down => {
            app.password_form.focus = match app.password_form.focus {
                PasswordFocus::Current => PasswordFocus::New,
                PasswordFocus::New => PasswordFocus::Confirm,
                PasswordFocus::Confirm => PasswordFocus::Current,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.password_form.focus = match app.password_form.focus {
                PasswordFocus::Current => PasswordFocus::Confirm,
                PasswordFocus::New => PasswordFocus::Current,
                PasswordFocus::Confirm => PasswordFocus::New,
            };
        }
        KeyCode::Enter => {
            app.submit_change_password().await;
            // Leave the form on success; errors keep it open for correction
            if app.password_form.error.is_none() && app.screen == Screen::Dashboard {
                app.state = AppState::Normal;
            }
        }
        KeyCode::Backspace => match app.password_form.focus {
            PasswordFocus::Current => {
                app.password_form.current.pop();
            }
            PasswordFocus::New => {
                app.password_form.new.pop();
            }
            PasswordFocus::Confirm => {
                app.password_form.confirm.pop();
            }
        },
        KeyCode::Char(c) => match app.password_form.focus {
            PasswordFocus::Current => app.password_form.current.push(c),
            PasswordFocus::New => app.password_form.new.push(c),
            PasswordFocus::Confirm => app.password_form.confirm.push(c),
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_plan_editor_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+S saves from any field
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.save_plan().await;
        return Ok(false);
    }

    let Some(editor) = app.plan_editor.as_mut() else {
        app.state = AppState::Normal;
        return Ok(false);
    };

    match key.code {
        KeyCode::Esc => {
            app.plan_editor = None;
            app.state = AppState::Normal;
        }
        KeyCode::Tab | KeyCode::Down => editor.focus = editor.focus.next(),
        KeyCode::BackTab | KeyCode::Up => editor.focus = editor.focus.prev(),
        KeyCode::Enter => {
            if editor.focus == PlanField::Active {
                app.save_plan().await;
            } else {
                editor.focus = editor.focus.next();
            }
        }
        KeyCode::Char(' ') => match editor.focus {
            PlanField::Icon => editor.icon = editor.icon.next(),
            PlanField::BillingCycle => editor.billing_cycle = editor.billing_cycle.toggle(),
            PlanField::Active => editor.is_active = !editor.is_active,
            _ => {}
        },
        KeyCode::Backspace => match editor.focus {
            PlanField::Name => {
                editor.name.pop();
            }
            PlanField::Price => {
                editor.price.pop();
            }
            PlanField::Description => {
                editor.description.pop();
            }
            PlanField::Benefits => {
                editor.benefits.pop();
            }
            PlanField::AccentColor => {
                editor.accent_color.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match editor.focus {
            PlanField::Name => editor.name.push(c),
            PlanField::Price => {
                if c.is_ascii_digit() || c == '.' {
                    editor.price.push(c);
                }
            }
            PlanField::Description => editor.description.push(c),
            PlanField::Benefits => editor.benefits.push(c),
            PlanField::AccentColor => editor.accent_color.push(c),
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_field_cycle_round_trips() {
        let mut field = PlanField::Name;
        for _ in 0..8 {
            field = field.next();
        }
        assert_eq!(field, PlanField::Name);
        assert_eq!(PlanField::Name.prev(), PlanField::Active);
    }
}

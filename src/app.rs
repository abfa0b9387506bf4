//! Application state management for fxadmin.
//!
//! The `App` struct owns the session, the API client, all screen/form state,
//! and the channel that background fetch tasks report back on. Network work
//! for the dashboard tabs runs in spawned tasks; direct user actions (login,
//! the OTP flow, saving a plan) are awaited inline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, SignOutGuard};
use crate::auth::{CredentialStore, Session};
use crate::config::Config;
use crate::models::{
    AdminUser, BillingCycle, DashboardStats, PaginationMeta, PlanIcon, PlanPayload, Profile,
    SubscriptionPlan,
};
use crate::routes::{self, Route};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Server-side page size for both tables.
pub const PAGE_SIZE: u32 = 10;

/// Progress message shown while a background refresh is running.
const REFRESHING_MESSAGE: &str = "Refreshing...";

// ============================================================================
// UI State Types
// ============================================================================

/// Top-level screens, mirroring the navigable routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    ForgotPassword,
    VerifyOtp,
    ResetPassword,
    Dashboard,
}

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Users,
    Plans,
    Settings,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Users => "Users",
            Tab::Plans => "Plans",
            Tab::Settings => "Settings",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Overview => Tab::Users,
            Tab::Users => Tab::Plans,
            Tab::Plans => Tab::Settings,
            Tab::Settings => Tab::Overview,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Overview => Tab::Settings,
            Tab::Users => Tab::Overview,
            Tab::Plans => Tab::Users,
            Tab::Settings => Tab::Plans,
        }
    }
}

/// Overlay / modal state on top of the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    EditingPlan,
    EditingPassword,
    ConfirmingQuit,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginFocus,
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginFocus::Email,
            error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ForgotForm {
    pub email: String,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct OtpForm {
    pub otp: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetFocus {
    Password,
    Confirm,
}

#[derive(Debug)]
pub struct ResetForm {
    pub password: String,
    pub confirm: String,
    pub focus: ResetFocus,
    pub error: Option<String>,
}

impl Default for ResetForm {
    fn default() -> Self {
        Self {
            password: String::new(),
            confirm: String::new(),
            focus: ResetFocus::Password,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordFocus {
    Current,
    New,
    Confirm,
}

#[derive(Debug)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
    pub focus: PasswordFocus,
    pub error: Option<String>,
}

impl Default for PasswordForm {
    fn default() -> Self {
        Self {
            current: String::new(),
            new: String::new(),
            confirm: String::new(),
            focus: PasswordFocus::Current,
            error: None,
        }
    }
}

/// Fields of the plan editor, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    Name,
    Price,
    Description,
    Benefits,
    Icon,
    BillingCycle,
    AccentColor,
    Active,
}

impl PlanField {
    pub fn next(&self) -> Self {
        match self {
            PlanField::Name => PlanField::Price,
            PlanField::Price => PlanField::Description,
            PlanField::Description => PlanField::Benefits,
            PlanField::Benefits => PlanField::Icon,
            PlanField::Icon => PlanField::BillingCycle,
            PlanField::BillingCycle => PlanField::AccentColor,
            PlanField::AccentColor => PlanField::Active,
            PlanField::Active => PlanField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            PlanField::Name => PlanField::Active,
            PlanField::Price => PlanField::Name,
            PlanField::Description => PlanField::Price,
            PlanField::Benefits => PlanField::Description,
            PlanField::Icon => PlanField::Benefits,
            PlanField::BillingCycle => PlanField::Icon,
            PlanField::AccentColor => PlanField::BillingCycle,
            PlanField::Active => PlanField::AccentColor,
        }
    }
}

/// Editable buffer for creating or updating a plan. Benefits are entered as
/// a single semicolon-separated line.
#[derive(Debug)]
pub struct PlanEditor {
    pub id: Option<String>,
    pub name: String,
    pub price: String,
    pub description: String,
    pub benefits: String,
    pub icon: PlanIcon,
    pub billing_cycle: BillingCycle,
    pub accent_color: String,
    pub is_active: bool,
    pub focus: PlanField,
    pub error: Option<String>,
}

impl PlanEditor {
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            price: String::new(),
            description: String::new(),
            benefits: String::new(),
            icon: PlanIcon::Sparkle,
            billing_cycle: BillingCycle::Month,
            accent_color: String::new(),
            is_active: true,
            focus: PlanField::Name,
            error: None,
        }
    }

    pub fn from_plan(plan: &SubscriptionPlan) -> Self {
        Self {
            id: Some(plan.id.clone()),
            name: plan.name.clone(),
            price: if plan.price.fract() == 0.0 {
                format!("{:.0}", plan.price)
            } else {
                plan.price.to_string()
            },
            description: plan.description.clone(),
            benefits: plan.benefits.join("; "),
            icon: plan.icon,
            billing_cycle: plan.billing_cycle,
            accent_color: plan.accent_color.clone(),
            is_active: plan.is_active,
            focus: PlanField::Name,
            error: None,
        }
    }

    /// Client-side validation; invalid editors never reach the network.
    pub fn validate(&self) -> std::result::Result<PlanPayload, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Plan name is required".to_string());
        }

        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| "Price must be a number".to_string())?;
        if price < 0.0 {
            return Err("Price cannot be negative".to_string());
        }

        let benefits: Vec<String> = self
            .benefits
            .split(';')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();

        let accent = self.accent_color.trim();

        Ok(PlanPayload {
            name: name.to_string(),
            price,
            billing_cycle: self.billing_cycle,
            description: self.description.trim().to_string(),
            benefits,
            icon: self.icon,
            accent_color: if accent.is_empty() {
                None
            } else {
                Some(accent.to_string())
            },
            sort_order: None,
            is_active: Some(self.is_active),
        })
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned fetch tasks over the MPSC channel.
pub enum TaskResult {
    Stats(DashboardStats),
    Users(crate::models::AdminUsersResponse),
    Plans(crate::models::SubscriptionPlansResponse),
    Profile(Profile),
    /// A 401 that won the sign-out guard; at most one per window.
    Unauthorized,
    Error(String),
    RefreshComplete,
}

/// Forward a fetch outcome to the main loop. 401s consult the sign-out
/// guard here, at the observation site, so concurrent failures collapse to
/// a single `Unauthorized` message.
async fn send_outcome(
    tx: &mpsc::Sender<TaskResult>,
    guard: &SignOutGuard,
    outcome: std::result::Result<TaskResult, ApiError>,
) {
    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.is_unauthorized() => {
            if guard.begin() {
                TaskResult::Unauthorized
            } else {
                debug!("Suppressing duplicate 401 during sign-out");
                return;
            }
        }
        Err(e) => TaskResult::Error(e.user_message()),
    };

    if let Err(e) = tx.send(result).await {
        error!(error = %e, "Failed to send task result - channel closed");
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,
    guard: Arc<SignOutGuard>,

    // Navigation
    pub screen: Screen,
    pub state: AppState,
    pub tab: Tab,

    // Forms
    pub login: LoginForm,
    pub forgot: ForgotForm,
    pub otp: OtpForm,
    pub reset: ResetForm,
    pub password_form: PasswordForm,
    pub plan_editor: Option<PlanEditor>,
    // Carried through the forgot-password flow
    pub reset_email: String,
    pub reset_otp: String,

    // Fetched data
    pub stats: Option<DashboardStats>,
    pub profile: Option<Profile>,
    pub users: Vec<AdminUser>,
    pub users_meta: PaginationMeta,
    pub users_page: u32,
    pub users_search: String,
    pub users_selection: usize,
    pub plans: Vec<SubscriptionPlan>,
    pub plans_meta: PaginationMeta,
    pub plans_page: u32,
    pub plans_search: String,
    pub plans_selection: usize,

    // Search overlay buffer
    pub search_input: String,

    // Status line
    pub status_message: Option<String>,

    // Background task channel
    rx: Option<mpsc::Receiver<TaskResult>>,
    tx: mpsc::Sender<TaskResult>,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let session_dir = Config::session_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut session = Session::new(session_dir);
        match session.load() {
            Ok(found) => debug!(found, "Session load"),
            Err(e) => warn!(error = %e, "Failed to load session"),
        }

        let api = ApiClient::new(&config.api_base_url())?;

        let login_email = std::env::var("FXADMIN_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let login_password = std::env::var("FXADMIN_PASSWORD")
            .ok()
            .or_else(|| {
                if login_email.is_empty() {
                    None
                } else {
                    CredentialStore::get_password(&login_email).ok()
                }
            })
            .unwrap_or_default();

        let screen = match routes::resolve(Route::Root, session.is_authenticated()) {
            Route::Dashboard => Screen::Dashboard,
            _ => Screen::Login,
        };

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            session,
            api,
            guard: Arc::new(SignOutGuard::new()),

            screen,
            state: AppState::Normal,
            tab: Tab::Overview,

            login: LoginForm {
                email: login_email,
                password: login_password,
                focus: LoginFocus::Email,
                error: None,
            },
            forgot: ForgotForm::default(),
            otp: OtpForm::default(),
            reset: ResetForm::default(),
            password_form: PasswordForm::default(),
            plan_editor: None,
            reset_email: String::new(),
            reset_otp: String::new(),

            stats: None,
            profile: None,
            users: Vec::new(),
            users_meta: PaginationMeta::default(),
            users_page: 1,
            users_search: String::new(),
            users_selection: 0,
            plans: Vec::new(),
            plans_meta: PaginationMeta::default(),
            plans_page: 1,
            plans_search: String::new(),
            plans_selection: 0,

            search_input: String::new(),
            status_message: None,

            rx: Some(rx),
            tx,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Route a navigation request through the guard and land on the
    /// resulting screen.
    pub fn navigate(&mut self, requested: Route) {
        let target = routes::resolve(requested, self.session.is_authenticated());
        self.screen = match target {
            Route::Login => Screen::Login,
            Route::ForgotPassword => Screen::ForgotPassword,
            Route::VerifyOtp => Screen::VerifyOtp,
            Route::ResetPassword => Screen::ResetPassword,
            Route::Users => {
                self.tab = Tab::Users;
                Screen::Dashboard
            }
            Route::Subscriptions => {
                self.tab = Tab::Plans;
                Screen::Dashboard
            }
            Route::Settings => {
                self.tab = Tab::Settings;
                Screen::Dashboard
            }
            Route::Dashboard | Route::Root => Screen::Dashboard,
        };
    }

    // =========================================================================
    // Session & gateway
    // =========================================================================

    /// The lookup-refresh-attach step that precedes every authenticated
    /// dispatch: silently refresh the token pair if it is about to expire,
    /// then hand out a client carrying the bearer token. `None` means the
    /// session is unusable and the caller must force re-authentication.
    pub async fn authed_client(&mut self) -> Option<ApiClient> {
        let api = self.api.clone();
        let data = self.session.data.as_mut()?;

        data.ensure_fresh(move |rt| async move { api.refresh_token(&rt).await })
            .await;

        // token() yields nothing for a session carrying a terminal error
        let token: Arc<str> = match self.session.token() {
            Some(token) => Arc::from(token),
            None => {
                let error = self.session.data.as_ref().and_then(|d| d.error);
                warn!(?error, "Session unusable after refresh check");
                return None;
            }
        };

        if let Err(e) = self.session.save() {
            warn!(error = %e, "Failed to persist refreshed session");
        }
        Some(self.api.with_token(token))
    }

    /// React to a 401 observed on the inline (non-background) path.
    /// The guard keeps the side effect to one firing per window.
    pub fn handle_unauthorized(&mut self) {
        if !self.guard.begin() {
            debug!("Sign-out already in progress");
            return;
        }
        self.sign_out();
        // Reset unconditionally once the sign-out completes.
        self.guard.finish();
    }

    /// Clear the session and return to the login screen. Idempotent.
    pub fn sign_out(&mut self) {
        info!("Signing out");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session file");
        }
        self.stats = None;
        self.profile = None;
        self.users.clear();
        self.plans.clear();
        self.login.password.clear();
        self.plan_editor = None;
        self.state = AppState::Normal;
        self.status_message = Some("Session expired. Please log in again.".to_string());
        self.navigate(Route::Login);
    }

    // =========================================================================
    // Authentication flows
    // =========================================================================

    /// Attempt login with the credentials from the login form.
    pub async fn attempt_login(&mut self) {
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();

        if email.is_empty() || password.is_empty() {
            self.login.error = Some("Email and password are required".to_string());
            return;
        }
        self.login.error = None;

        match self.api.login(&email, &password).await {
            Ok(session_data) => {
                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }
                self.config.last_email = Some(email);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.session.update(session_data);
                if let Err(e) = self.session.save() {
                    warn!(error = %e, "Failed to save session");
                }

                self.login.password.clear();
                self.status_message = None;
                info!("Login successful");
                self.navigate(Route::Root);
                self.refresh_all_background().await;
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                // Credential failures stay generic: no unknown-user vs
                // wrong-password distinction.
                self.login.error = Some(match e {
                    ApiError::Unauthorized | ApiError::Api { .. } => {
                        "Invalid email or password".to_string()
                    }
                    other => other.user_message(),
                });
            }
        }
    }

    /// Request an OTP for the email in the forgot-password form.
    pub async fn submit_forgot_password(&mut self) {
        let email = self.forgot.email.trim().to_string();
        if email.is_empty() {
            self.forgot.error = Some("Email is required".to_string());
            return;
        }
        self.forgot.error = None;

        match self.api.forgot_password(&email).await {
            Ok(message) => {
                self.reset_email = email;
                self.status_message = Some(if message.is_empty() {
                    "OTP sent to your email".to_string()
                } else {
                    message
                });
                self.otp = OtpForm::default();
                self.navigate(Route::VerifyOtp);
            }
            Err(e) => self.forgot.error = Some(e.user_message()),
        }
    }

    /// Validate the entered OTP and move on to the reset form.
    pub async fn submit_verify_otp(&mut self) {
        let otp = self.otp.otp.trim().to_string();
        if otp.is_empty() {
            self.otp.error = Some("Enter the code from your email".to_string());
            return;
        }
        self.otp.error = None;

        match self.api.verify_otp(&self.reset_email, &otp).await {
            Ok(_) => {
                self.reset_otp = otp;
                self.reset = ResetForm::default();
                self.navigate(Route::ResetPassword);
            }
            Err(e) => self.otp.error = Some(e.user_message()),
        }
    }

    /// Set the new password, authorized by the verified OTP.
    pub async fn submit_reset_password(&mut self) {
        if self.reset.password.is_empty() {
            self.reset.error = Some("Password is required".to_string());
            return;
        }
        if self.reset.password != self.reset.confirm {
            self.reset.error = Some("Passwords do not match".to_string());
            return;
        }
        self.reset.error = None;

        match self
            .api
            .reset_password(&self.reset_email, &self.reset_otp, &self.reset.password)
            .await
        {
            Ok(_) => {
                self.status_message = Some("Password reset. Please log in.".to_string());
                self.login.email = self.reset_email.clone();
                self.login.password.clear();
                self.forgot = ForgotForm::default();
                self.otp = OtpForm::default();
                self.reset = ResetForm::default();
                self.reset_email.clear();
                self.reset_otp.clear();
                self.navigate(Route::Login);
            }
            Err(e) => self.reset.error = Some(e.user_message()),
        }
    }

    /// Change the signed-in admin's password from the settings tab.
    pub async fn submit_change_password(&mut self) {
        let form = &self.password_form;
        if form.current.is_empty() || form.new.is_empty() {
            self.password_form.error = Some("All fields are required".to_string());
            return;
        }
        if form.new != form.confirm {
            self.password_form.error = Some("Passwords do not match".to_string());
            return;
        }
        self.password_form.error = None;

        let Some(client) = self.authed_client().await else {
            self.sign_out();
            return;
        };

        let (current, new, confirm) = (
            self.password_form.current.clone(),
            self.password_form.new.clone(),
            self.password_form.confirm.clone(),
        );
        match client.change_password(&current, &new, &confirm).await {
            Ok(message) => {
                self.password_form = PasswordForm::default();
                self.status_message = Some(if message.is_empty() {
                    "Password changed successfully".to_string()
                } else {
                    message
                });
            }
            Err(e) if e.is_unauthorized() => self.handle_unauthorized(),
            Err(e) => self.password_form.error = Some(e.user_message()),
        }
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Fetch stats, the current users page, the current plans page, and the
    /// profile in parallel.
    pub async fn refresh_all_background(&mut self) {
        let Some(client) = self.authed_client().await else {
            self.sign_out();
            return;
        };

        let tx = self.tx.clone();
        let guard = Arc::clone(&self.guard);
        let users_page = self.users_page;
        let users_search = Self::search_param(&self.users_search);
        let plans_page = self.plans_page;
        let plans_search = Self::search_param(&self.plans_search);

        tokio::spawn(async move {
            let (stats, users, plans, profile) = futures::join!(
                client.fetch_dashboard_stats(None),
                client.fetch_users(users_page, PAGE_SIZE, users_search.as_deref()),
                client.fetch_plans(plans_page, PAGE_SIZE, plans_search.as_deref()),
                client.fetch_profile(),
            );

            send_outcome(&tx, &guard, stats.map(TaskResult::Stats)).await;
            send_outcome(&tx, &guard, users.map(TaskResult::Users)).await;
            send_outcome(&tx, &guard, plans.map(TaskResult::Plans)).await;
            send_outcome(&tx, &guard, profile.map(TaskResult::Profile)).await;

            let _ = tx.send(TaskResult::RefreshComplete).await;
        });

        self.status_message = Some(REFRESHING_MESSAGE.to_string());
    }

    /// Fetch one page of the user list.
    pub async fn fetch_users_background(&mut self) {
        let Some(client) = self.authed_client().await else {
            self.sign_out();
            return;
        };
        let tx = self.tx.clone();
        let guard = Arc::clone(&self.guard);
        let page = self.users_page;
        let search = Self::search_param(&self.users_search);

        tokio::spawn(async move {
            let result = client.fetch_users(page, PAGE_SIZE, search.as_deref()).await;
            send_outcome(&tx, &guard, result.map(TaskResult::Users)).await;
        });
    }

    /// Fetch one page of the plan list.
    pub async fn fetch_plans_background(&mut self) {
        let Some(client) = self.authed_client().await else {
            self.sign_out();
            return;
        };
        let tx = self.tx.clone();
        let guard = Arc::clone(&self.guard);
        let page = self.plans_page;
        let search = Self::search_param(&self.plans_search);

        tokio::spawn(async move {
            let result = client.fetch_plans(page, PAGE_SIZE, search.as_deref()).await;
            send_outcome(&tx, &guard, result.map(TaskResult::Plans)).await;
        });
    }

    fn search_param(search: &str) -> Option<String> {
        let trimmed = search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    // =========================================================================
    // Pagination & search
    // =========================================================================

    pub async fn users_next_page(&mut self) {
        if self.users_meta.has_next() {
            self.users_page += 1;
            self.fetch_users_background().await;
        }
    }

    pub async fn users_prev_page(&mut self) {
        if self.users_meta.has_prev() {
            self.users_page -= 1;
            self.fetch_users_background().await;
        }
    }

    pub async fn plans_next_page(&mut self) {
        if self.plans_meta.has_next() {
            self.plans_page += 1;
            self.fetch_plans_background().await;
        }
    }

    pub async fn plans_prev_page(&mut self) {
        if self.plans_meta.has_prev() {
            self.plans_page -= 1;
            self.fetch_plans_background().await;
        }
    }

    /// Apply the search overlay buffer to the current tab and refetch page 1.
    pub async fn apply_search(&mut self) {
        let query = self.search_input.clone();
        match self.tab {
            Tab::Users => {
                self.users_search = query;
                self.users_page = 1;
                self.fetch_users_background().await;
            }
            Tab::Plans => {
                self.plans_search = query;
                self.plans_page = 1;
                self.fetch_plans_background().await;
            }
            _ => {}
        }
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Plan editing
    // =========================================================================

    /// Open the editor for the selected plan, refetching it first so edits
    /// start from the server's current copy.
    pub async fn edit_selected_plan(&mut self) {
        let Some(id) = self.plans.get(self.plans_selection).map(|p| p.id.clone()) else {
            return;
        };

        let Some(client) = self.authed_client().await else {
            self.sign_out();
            return;
        };

        match client.fetch_plan(&id).await {
            Ok(plan) => {
                self.plan_editor = Some(PlanEditor::from_plan(&plan));
                self.state = AppState::EditingPlan;
            }
            Err(e) if e.is_unauthorized() => self.handle_unauthorized(),
            Err(e) => self.status_message = Some(e.user_message()),
        }
    }

    pub fn new_plan(&mut self) {
        self.plan_editor = Some(PlanEditor::blank());
        self.state = AppState::EditingPlan;
    }

    /// Validate and persist the plan editor (create or update).
    pub async fn save_plan(&mut self) {
        let Some(editor) = self.plan_editor.as_mut() else {
            return;
        };

        let payload = match editor.validate() {
            Ok(p) => p,
            Err(msg) => {
                editor.error = Some(msg);
                return;
            }
        };
        let id = editor.id.clone();

        let Some(client) = self.authed_client().await else {
            self.sign_out();
            return;
        };

        let result = match &id {
            Some(id) => client.update_plan(id, &payload).await,
            None => client.create_plan(&payload).await,
        };

        match result {
            Ok(plan) => {
                info!(plan = %plan.name, "Plan saved");
                self.plan_editor = None;
                self.state = AppState::Normal;
                self.status_message = Some(format!("Plan \"{}\" saved", plan.name));
                self.fetch_plans_background().await;
            }
            Err(e) if e.is_unauthorized() => self.handle_unauthorized(),
            Err(e) => {
                if let Some(editor) = self.plan_editor.as_mut() {
                    editor.error = Some(e.user_message());
                }
            }
        }
    }

    // =========================================================================
    // Background task processing
    // =========================================================================

    /// Drain pending background results and fold them into state.
    pub fn check_background_tasks(&mut self) {
        let results: Vec<TaskResult> = {
            if let Some(ref mut rx) = self.rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        for result in results {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Stats(stats) => {
                self.stats = Some(stats);
            }
            TaskResult::Users(resp) => {
                self.users = resp.users;
                self.users_meta = resp.pagination;
                self.users_selection = self
                    .users_selection
                    .min(self.users.len().saturating_sub(1));
            }
            TaskResult::Plans(resp) => {
                self.plans = resp.plans;
                self.plans_meta = resp.pagination;
                self.plans_selection = self
                    .plans_selection
                    .min(self.plans.len().saturating_sub(1));
            }
            TaskResult::Profile(profile) => {
                self.profile = Some(profile);
            }
            TaskResult::Unauthorized => {
                self.sign_out();
                self.guard.finish();
            }
            TaskResult::Error(message) => {
                error!(error = %message, "Background task error");
                self.status_message = Some(message);
            }
            TaskResult::RefreshComplete => {
                if self.status_message.as_deref() == Some(REFRESHING_MESSAGE) {
                    self.status_message = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_round_trips() {
        let mut tab = Tab::Overview;
        for _ in 0..4 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Settings);
    }

    #[test]
    fn test_plan_editor_validation_requires_name() {
        let mut editor = PlanEditor::blank();
        editor.price = "10".to_string();
        assert_eq!(editor.validate().unwrap_err(), "Plan name is required");
    }

    #[test]
    fn test_plan_editor_validation_price() {
        let mut editor = PlanEditor::blank();
        editor.name = "Pro".to_string();
        editor.price = "abc".to_string();
        assert_eq!(editor.validate().unwrap_err(), "Price must be a number");

        editor.price = "-1".to_string();
        assert_eq!(editor.validate().unwrap_err(), "Price cannot be negative");
    }

    #[test]
    fn test_plan_editor_benefits_split() {
        let mut editor = PlanEditor::blank();
        editor.name = "Pro".to_string();
        editor.price = "49.99".to_string();
        editor.benefits = "Unlimited clients;  Priority support ; ;".to_string();

        let payload = editor.validate().expect("valid editor");
        assert_eq!(
            payload.benefits,
            vec!["Unlimited clients".to_string(), "Priority support".to_string()]
        );
        assert_eq!(payload.price, 49.99);
        assert_eq!(payload.accent_color, None);
        assert_eq!(payload.is_active, Some(true));
    }

    #[test]
    fn test_editor_round_trip_from_plan() {
        let plan: SubscriptionPlan = serde_json::from_str(
            r##"{
                "_id": "66c900aa12", "name": "Pro", "price": 49.0,
                "currency": "EUR", "billingCycle": "month",
                "description": "For growing coaches",
                "benefits": ["A", "B"], "icon": "zap",
                "accentColor": "#7c5cff", "isActive": true, "sortOrder": 2,
                "createdAt": "2024-08-01T10:00:00.000Z",
                "updatedAt": "2024-08-20T10:00:00.000Z"
            }"##,
        )
        .unwrap();

        let editor = PlanEditor::from_plan(&plan);
        assert_eq!(editor.price, "49");
        assert_eq!(editor.benefits, "A; B");

        let payload = editor.validate().expect("valid");
        assert_eq!(payload.name, "Pro");
        assert_eq!(payload.benefits, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(payload.accent_color.as_deref(), Some("#7c5cff"));
    }
}

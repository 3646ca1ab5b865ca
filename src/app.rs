use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{admin, employee, manager, public};
use crate::middleware::{admin_auth_middleware, employee_auth_middleware};
use crate::state::AppState;

/// Full application router with shared state applied
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(employee_routes(state.clone()))
        .merge(admin_routes(state.clone()));

    Router::new()
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.security)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/admin/auth/login", post(auth::admin_login))
        .route("/admin/auth/create", post(auth::admin_create))
}

fn employee_routes(state: AppState) -> Router<AppState> {
    use employee::{breaks, calendar, leave, notifications, profile, projects, sessions, tickets};

    Router::new()
        .route("/auth/me", get(profile::me))
        // Attendance
        .route("/sessions/start", post(sessions::start))
        .route("/sessions/end", post(sessions::end))
        .route("/sessions/active", get(sessions::active))
        .route("/sessions/can-start-today", get(sessions::can_start_today))
        .route("/sessions/history", get(sessions::history))
        .route("/breaks/start", post(breaks::start))
        .route("/breaks/end", post(breaks::end))
        .route("/leaves/half-day", post(sessions::half_day))
        // Calendar and dashboard
        .route("/calendar/month", get(calendar::month))
        .route("/dashboard/stats", get(calendar::dashboard_stats))
        .route("/holidays", get(calendar::holidays))
        // Leave
        .route("/employee/leave-balance", get(leave::balance))
        .route("/employee/apply-leave", post(leave::apply))
        .route("/employee/leave-requests", get(leave::my_requests))
        .route("/employee/manager-status", get(leave::manager_status))
        .route("/manager/leave-requests", get(manager::leave::pending))
        .route("/manager/leave-requests/:id", put(manager::leave::decide))
        // Tickets, notifications, projects
        .route("/employee/it-tickets", get(tickets::list).post(tickets::create))
        .route("/employee/notifications", get(notifications::list))
        .route("/employee/notifications/:id/read", put(notifications::mark_read))
        .route("/employee/projects", get(projects::list))
        .route_layer(middleware::from_fn_with_state(state, employee_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use admin::{admins, auth, employees, holidays, leave, org, reports, settings, tickets};

    // Base64 inflates by 4/3; leave room for the JSON envelope
    let logo_body_limit = state.config.uploads.max_logo_bytes * 2 + 64 * 1024;

    Router::new()
        .route("/admin/auth/me", get(auth::me))
        // Admin accounts
        .route("/admin/admin-users", get(admins::list))
        .route("/admin/create-admin", post(admins::create))
        .route("/admin/update-admin/:id", put(admins::update))
        .route("/admin/delete-admin/:id", delete(admins::delete))
        // Employees and reports
        .route("/admin/employees", get(employees::list))
        .route("/admin/create-employee", post(employees::create))
        .route("/admin/update-employee/:id", put(employees::update))
        .route("/admin/delete-employee/:id", delete(employees::delete))
        .route("/admin/users", get(reports::users))
        .route("/admin/user/:id/sessions", get(reports::user_sessions))
        .route("/admin/dashboard-stats", get(reports::dashboard_stats))
        // Leave
        .route(
            "/admin/leave-settings",
            get(settings::get_leave_settings).put(settings::update_leave_settings),
        )
        .route("/admin/leave-requests", get(leave::list))
        .route("/admin/leave-requests/:id", put(leave::decide))
        .route("/admin/users-on-leave", get(leave::users_on_leave))
        // IT tickets
        .route("/admin/it-tickets", get(tickets::list))
        .route("/admin/it-tickets/:id", put(tickets::update))
        // Holidays
        .route("/admin/holidays-management", get(holidays::list))
        .route("/admin/add-holiday", post(holidays::create))
        .route("/admin/update-holiday/:id", put(holidays::update))
        .route("/admin/holiday/:id", delete(holidays::delete))
        // Organization
        .route("/admin/create-department", post(org::create_department))
        .route("/admin/departments", get(org::departments))
        .route("/admin/create-manager", post(org::create_manager))
        .route("/admin/managers", get(org::managers))
        .route("/admin/manager-assignments", get(org::manager_assignments))
        .route("/admin/create-project", post(org::create_project))
        .route("/admin/projects", get(org::projects))
        .route("/admin/organization-tree", get(org::organization_tree))
        // Organization settings and logo
        .route(
            "/admin/organization-settings",
            get(settings::get_organization).put(settings::update_organization),
        )
        .route(
            "/admin/upload-logo-base64",
            post(settings::upload_logo).layer(DefaultBodyLimit::max(logo_body_limit)),
        )
        .route("/admin/remove-logo", delete(settings::remove_logo))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}

/// `*` anywhere in the origin list opens CORS to every origin (without credentials)
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

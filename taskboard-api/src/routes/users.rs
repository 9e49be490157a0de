/// User listing endpoint (admin only)
///
/// # Endpoints
///
/// - `GET /api/auth/users` - List all registered users
///
/// This is the one view-level gate in the system: a non-admin caller gets a
/// plain 403 with a fixed denial message. Everywhere else denial hides
/// behind 404.

use crate::{
    app::AppState,
    error::ApiResult,
    pagination::{Page, PageParams},
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{authorization, middleware::CurrentUser},
    models::user::{User, UserSummary},
};

/// Query parameters for the user listing
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Page number (1-based)
    pub page: Option<u32>,

    /// Rows per page (capped)
    pub page_size: Option<u32>,
}

/// List all users, ordered by registration date
///
/// # Endpoint
///
/// ```text
/// GET /api/auth/users?page=1&page_size=10
/// Authorization: Bearer <access token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: no valid access token
/// - `403 Forbidden`: caller is not an admin
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<Page<UserSummary>>> {
    authorization::require_admin(&current_user)?;

    let params = PageParams::new(query.page, query.page_size);

    let count = User::count(&state.db).await?;
    let users = User::list(&state.db, params.limit(), params.offset()).await?;

    let results = users.into_iter().map(UserSummary::from).collect();

    Ok(Json(Page::new(results, count, params)))
}

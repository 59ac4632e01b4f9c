/*
 * Responsibility
 * - URL layout of the whole API
 * - access groups: public / authenticated / ROLE_ADMIN
 * - auth is applied with route_layer so unknown paths stay 404
 */
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::handlers::{
    account::{authenticate, get_account},
    health::health,
    management::security_metrics,
    produits::{
        create_produit, delete_produit, get_produit, list_produits, partial_update_produit,
        update_produit,
    },
    users::{
        create_user, delete_user, get_user, list_all_users, list_authorities, list_public_users,
        update_user,
    },
};
use crate::middleware::auth::{access, authority::require_admin};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/authenticate", post(authenticate))
        .route("/management/health", get(health));

    let admin = Router::new()
        .route(
            "/api/admin/users",
            get(list_all_users).post(create_user).put(update_user),
        )
        .route("/api/admin/users/{login}", get(get_user).delete(delete_user))
        .route("/api/authorities", get(list_authorities))
        .route("/management/security-metrics", get(security_metrics))
        .route_layer(middleware::from_fn(require_admin));

    let authenticated = Router::new()
        .route("/api/account", get(get_account))
        .route("/api/produits", get(list_produits).post(create_produit))
        .route(
            "/api/produits/{id}",
            get(get_produit)
                .put(update_produit)
                .patch(partial_update_produit)
                .delete(delete_produit),
        )
        .route("/api/users", get(list_public_users))
        .merge(admin);

    public.merge(access::apply(authenticated, state))
}

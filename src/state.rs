/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 * - cheap to Clone (everything inside is Arc / Clone-cheap)
 */
use std::sync::Arc;

use crate::api::headers::AlertHeaders;
use crate::services::auth::{TokenIssuer, TokenValidator};
use crate::services::metrics::SecurityMeters;
use crate::services::{ProduitService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub produits: ProduitService,
    pub users: UserService,
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
    pub meters: Arc<SecurityMeters>,
    pub alerts: AlertHeaders,
}

impl AppState {
    pub fn new(
        produits: ProduitService,
        users: UserService,
        issuer: Arc<TokenIssuer>,
        validator: Arc<TokenValidator>,
        meters: Arc<SecurityMeters>,
        alerts: AlertHeaders,
    ) -> Self {
        Self {
            produits,
            users,
            issuer,
            validator,
            meters,
            alerts,
        }
    }
}

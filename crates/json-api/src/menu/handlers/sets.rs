//! Menu Sets Handler

use std::sync::Arc;

use kaiten_app::domain::catalog::models::Set;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, menu::errors::into_status_error, state::State};

/// A set (bundle of rolls) on the menu.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetResponse {
    /// The set's unique identifier
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Bundle price in minor currency units
    pub set_price: i64,

    /// Optional image URL
    pub image_url: Option<String>,

    /// Featured as popular
    pub is_popular: bool,

    /// Featured as new
    pub is_new: bool,
}

impl From<Set> for SetResponse {
    fn from(set: Set) -> Self {
        SetResponse {
            uuid: set.uuid,
            name: set.name,
            description: set.description,
            set_price: set.set_price,
            image_url: set.image_url,
            is_popular: set.is_popular,
            is_new: set.is_new,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetsResponse {
    /// The sets on the menu
    pub sets: Vec<SetResponse>,
}

/// Menu Sets Handler
///
/// Returns every set on the menu.
#[endpoint(tags("menu"), summary = "List Sets")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SetsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let sets = state.catalog.list_sets().await.map_err(into_status_error)?;

    Ok(Json(SetsResponse {
        sets: sets.into_iter().map(Into::into).collect(),
    }))
}

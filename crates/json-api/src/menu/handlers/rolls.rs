//! Menu Rolls Handler

use std::sync::Arc;

use kaiten_app::domain::catalog::models::Roll;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, menu::errors::into_status_error, state::State};

/// A roll on the menu.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RollResponse {
    /// The roll's unique identifier
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Price per unit in minor currency units
    pub sale_price: i64,

    /// Optional image URL
    pub image_url: Option<String>,

    /// Featured as popular
    pub is_popular: bool,

    /// Featured as new
    pub is_new: bool,
}

impl From<Roll> for RollResponse {
    fn from(roll: Roll) -> Self {
        RollResponse {
            uuid: roll.uuid,
            name: roll.name,
            description: roll.description,
            sale_price: roll.sale_price,
            image_url: roll.image_url,
            is_popular: roll.is_popular,
            is_new: roll.is_new,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RollsResponse {
    /// The rolls on the menu
    pub rolls: Vec<RollResponse>,
}

/// Menu Rolls Handler
///
/// Returns every roll on the menu.
#[endpoint(tags("menu"), summary = "List Rolls")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<RollsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let rolls = state
        .catalog
        .list_rolls()
        .await
        .map_err(into_status_error)?;

    Ok(Json(RollsResponse {
        rolls: rolls.into_iter().map(Into::into).collect(),
    }))
}

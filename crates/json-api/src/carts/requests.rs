//! Cart request payloads shared by several handlers.

use kaiten::lines::LineKind;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// A cart line kind as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ItemKind {
    Roll,
    Set,
    LoyaltyRoll,
    BonusPoints,
}

impl From<ItemKind> for LineKind {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Roll => LineKind::Roll,
            ItemKind::Set => LineKind::Set,
            ItemKind::LoyaltyRoll => LineKind::LoyaltyRoll,
            ItemKind::BonusPoints => LineKind::BonusPoints,
        }
    }
}

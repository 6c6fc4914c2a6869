use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of an authenticated principal.
///
/// Every user is exactly one of these. Moderators have unrestricted read access
/// and may edit any course or lesson, but are never allowed to create or delete
/// them. Roles are assigned administratively; no endpoint changes them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    DeriveActiveEnum,
    EnumIter,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "member")]
    #[default]
    Member,
    #[sea_orm(string_value = "moderator")]
    Moderator,
}

impl Role {
    pub const fn is_moderator(self) -> bool {
        matches!(self, Self::Moderator)
    }
}

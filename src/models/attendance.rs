use crate::entities::{attendance_entity as attendances, user_entity as users};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    #[schema(example = "member@gym.com")]
    pub member_email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<AttendanceMember>,
}

impl From<attendances::Model> for AttendanceResponse {
    fn from(m: attendances::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            check_in_time: m.check_in_time,
            check_out_time: m.check_out_time,
            member: None,
        }
    }
}

impl From<(attendances::Model, Option<users::Model>)> for AttendanceResponse {
    fn from((attendance, user): (attendances::Model, Option<users::Model>)) -> Self {
        let mut resp = AttendanceResponse::from(attendance);
        resp.member = user.map(|u| AttendanceMember {
            id: u.id,
            name: u.name,
            email: u.email,
        });
        resp
    }
}

/// Filters for the front-desk history view.
///
/// Dates accept RFC 3339 timestamps or `YYYY-MM-DD`; a bare `dateTo` date covers the whole day.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceHistoryQuery {
    pub user_id: Option<Uuid>,
    #[schema(example = "2025-01-01")]
    pub date_from: Option<String>,
    #[schema(example = "2025-01-31")]
    pub date_to: Option<String>,
}

use crate::entities::{Role, attendance_entity as attendances, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

const MY_HISTORY_LIMIT: u64 = 50;

/// 当天（UTC）零点
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// A parsed history bound. Bare dates expand to whole days.
#[derive(Debug, PartialEq)]
enum Bound {
    At(DateTime<Utc>),
    Day(NaiveDate),
}

fn parse_bound(field: &str, raw: &str) -> AppResult<Bound> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Bound::At(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Bound::Day)
        .map_err(|_| {
            AppError::ValidationError(format!(
                "{field} must be an RFC 3339 timestamp or YYYY-MM-DD"
            ))
        })
}

/// Inclusive lower and exclusive upper check-in bounds.
fn history_window(
    date_from: Option<String>,
    date_to: Option<String>,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let from = non_empty(date_from)
        .map(|raw| parse_bound("dateFrom", &raw))
        .transpose()?
        .map(|b| match b {
            Bound::At(ts) => ts,
            Bound::Day(d) => d.and_time(NaiveTime::MIN).and_utc(),
        });
    let to = non_empty(date_to)
        .map(|raw| parse_bound("dateTo", &raw))
        .transpose()?
        .map(|b| match b {
            Bound::At(ts) => ts + Duration::microseconds(1),
            Bound::Day(d) => d.and_time(NaiveTime::MIN).and_utc() + Duration::days(1),
        });

    if let (Some(from), Some(to)) = (from, to) {
        if from >= to {
            return Err(AppError::ValidationError(
                "dateFrom must be before dateTo".to_string(),
            ));
        }
    }
    Ok((from, to))
}

#[derive(Clone)]
pub struct AttendanceService {
    pool: Arc<DatabaseConnection>,
}

impl AttendanceService {
    pub fn new(pool: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { pool: pool.into() }
    }

    async fn find_member_by_email(&self, email: &str) -> AppResult<users::Model> {
        let email = normalize_email(email);
        validate_email(&email)?;

        users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .filter(users::Column::Role.eq(Role::Member))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    /// 今天尚未签出的最近一条记录
    async fn open_attendance_today(&self, user_id: Uuid) -> AppResult<Option<attendances::Model>> {
        let since = start_of_day(Utc::now());
        Ok(attendances::Entity::find()
            .filter(attendances::Column::UserId.eq(user_id))
            .filter(attendances::Column::CheckOutTime.is_null())
            .filter(attendances::Column::CheckInTime.gte(since))
            .order_by_desc(attendances::Column::CheckInTime)
            .one(self.pool.as_ref())
            .await?)
    }

    pub async fn check_in(&self, request: AttendanceRequest) -> AppResult<AttendanceResponse> {
        let member = self.find_member_by_email(&request.member_email).await?;

        if !member.is_active {
            return Err(AppError::Forbidden(
                "Membership is inactive, check-in refused".to_string(),
            ));
        }

        if self.open_attendance_today(member.id).await?.is_some() {
            return Err(AppError::Conflict(
                "Member has already checked in today".to_string(),
            ));
        }

        let attendance = attendances::ActiveModel {
            user_id: Set(member.id),
            check_in_time: Set(Utc::now()),
            check_out_time: Set(None),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        log::info!("Member {} checked in", member.id);
        Ok(AttendanceResponse::from((attendance, Some(member))))
    }

    pub async fn check_out(&self, request: AttendanceRequest) -> AppResult<AttendanceResponse> {
        let member = self.find_member_by_email(&request.member_email).await?;

        let open = self
            .open_attendance_today(member.id)
            .await?
            .ok_or_else(|| AppError::NotFound("No open check-in found for today".to_string()))?;

        let mut model = open.into_active_model();
        model.check_out_time = Set(Some(Utc::now()));
        let attendance = model.update(self.pool.as_ref()).await?;

        log::info!("Member {} checked out", member.id);
        Ok(AttendanceResponse::from((attendance, Some(member))))
    }

    pub async fn my_history(&self, user_id: Uuid) -> AppResult<Vec<AttendanceResponse>> {
        let rows = attendances::Entity::find()
            .filter(attendances::Column::UserId.eq(user_id))
            .order_by_desc(attendances::Column::CheckInTime)
            .limit(MY_HISTORY_LIMIT)
            .all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(AttendanceResponse::from).collect())
    }

    pub async fn all_history(
        &self,
        query: AttendanceHistoryQuery,
    ) -> AppResult<Vec<AttendanceResponse>> {
        let (from, to) = history_window(query.date_from, query.date_to)?;

        let mut select = attendances::Entity::find();
        if let Some(user_id) = query.user_id {
            select = select.filter(attendances::Column::UserId.eq(user_id));
        }
        if let Some(from) = from {
            select = select.filter(attendances::Column::CheckInTime.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(attendances::Column::CheckInTime.lt(to));
        }

        let rows = select
            .order_by_desc(attendances::Column::CheckInTime)
            .find_also_related(users::Entity)
            .all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(AttendanceResponse::from).collect())
    }
}

//! Admin dashboard models: aggregate statistics and time-bucketed metrics.

use sea_orm::sea_query::{Expr, SimpleExpr};

use crate::{
    model::admin::{
        AdminStatsDto, MetricPointDto, MetricsResponseDto, TopQueryDto, UserAnalyticsDto,
    },
    server::{
        error::AppError,
        model::{
            api_event::ActionCount, favorite::FavoriteCity, search_history::SearchEntry,
            user::User,
        },
    },
};

/// Time series available on the metrics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    ApiEvents,
    Searches,
    NewUsers,
    DiscordNotifications,
}

impl Metric {
    /// Parses a metric name. Unknown names fall back to `api_events`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("searches") => Self::Searches,
            Some("new_users") => Self::NewUsers,
            Some("discord_notifications") => Self::DiscordNotifications,
            _ => Self::ApiEvents,
        }
    }

    /// Event action filtered on, for metrics backed by the event log.
    pub fn event_action(&self) -> Option<&'static str> {
        match self {
            Self::Searches => Some("search"),
            Self::DiscordNotifications => Some("discord_event"),
            Self::ApiEvents | Self::NewUsers => None,
        }
    }
}

/// Bucket width for metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Hour,
    Day,
}

impl Bucket {
    /// `hour` selects hourly buckets; anything else is daily.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("hour") => Self::Hour,
            _ => Self::Day,
        }
    }

    /// `strftime` pattern producing the bucket label.
    pub fn format(&self) -> &'static str {
        match self {
            Self::Hour => "%Y-%m-%dT%H:00:00",
            Self::Day => "%Y-%m-%d",
        }
    }

    /// SQL expression labelling `column` with its bucket, e.g. `2025-03-02T10:00:00`.
    pub fn sql_label(&self, column: &str) -> SimpleExpr {
        Expr::cust_with_values(format!("strftime(?, {column})"), [self.format()])
    }
}

/// Validated metrics query; doubles as the cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricsParam {
    pub metric: Metric,
    pub days: i64,
    pub bucket: Bucket,
}

/// Parses a look-back window in days, accepting 1..=365.
///
/// # Returns
/// - `Ok(days)` - `default` when absent
/// - `Err(AppError::BadRequest)` - Not a number, or outside the range
pub fn parse_days(raw: Option<&str>, default: i64) -> Result<i64, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|d| (1..=365).contains(d))
            .ok_or_else(|| AppError::BadRequest("Invalid days parameter".to_string())),
    }
}

impl MetricsParam {
    /// # Returns
    /// - `Ok(MetricsParam)` - `days` defaults to 7
    /// - `Err(AppError::BadRequest)` - `days` is not a number in 1..=365
    pub fn parse(
        metric: Option<&str>,
        days: Option<&str>,
        bucket: Option<&str>,
    ) -> Result<Self, AppError> {
        let days = parse_days(days, 7)?;

        Ok(Self {
            metric: Metric::parse(metric),
            days,
            bucket: Bucket::parse(bucket),
        })
    }
}

/// Count of items falling into one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub bucket: String,
    pub count: u64,
}

impl MetricPoint {
    pub fn into_dto(self) -> MetricPointDto {
        MetricPointDto {
            bucket: self.bucket,
            count: self.count,
        }
    }
}

pub fn metrics_into_dto(points: Vec<MetricPoint>, cached: bool) -> MetricsResponseDto {
    MetricsResponseDto {
        cached,
        data: points.into_iter().map(MetricPoint::into_dto).collect(),
    }
}

/// Dashboard totals.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    pub users_count: u64,
    pub banned_count: u64,
    /// Accounts created during the last seven days.
    pub active7d: u64,
    pub events_today: u64,
    pub total_events: u64,
    pub discord_connections: u64,
    pub discord_subscribed: u64,
    /// Most frequent search queries today.
    pub top_cities: Vec<(String, u64)>,
}

impl AdminStats {
    pub fn into_dto(self, cached: bool) -> AdminStatsDto {
        AdminStatsDto {
            cached,
            users_count: self.users_count,
            banned_count: self.banned_count,
            active7d: self.active7d,
            events_today: self.events_today,
            total_events: self.total_events,
            discord_connections: self.discord_connections,
            discord_subscribed: self.discord_subscribed,
            top_cities: self
                .top_cities
                .into_iter()
                .map(|(query, count)| TopQueryDto { query, count })
                .collect(),
        }
    }
}

/// Requested change to an account's ban state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanAction {
    Ban,
    Unban,
}

impl BanAction {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "ban" => Ok(Self::Ban),
            "unban" => Ok(Self::Unban),
            _ => Err(AppError::BadRequest("Invalid action".to_string())),
        }
    }
}

/// Activity summary for one account.
#[derive(Debug, Clone)]
pub struct UserAnalytics {
    pub user: User,
    pub user_events: u64,
    pub searches: Vec<SearchEntry>,
    pub favorites: Vec<FavoriteCity>,
    pub activity_breakdown: Vec<ActionCount>,
    pub recent_searches: Vec<SearchEntry>,
}

impl UserAnalytics {
    pub fn into_dto(self) -> UserAnalyticsDto {
        UserAnalyticsDto {
            user: self.user.into_admin_dto(),
            user_events: self.user_events,
            searches: self.searches.into_iter().map(SearchEntry::into_dto).collect(),
            favorites: self.favorites.into_iter().map(FavoriteCity::into_dto).collect(),
            activity_breakdown: self
                .activity_breakdown
                .into_iter()
                .map(ActionCount::into_dto)
                .collect(),
            recent_searches: self
                .recent_searches
                .into_iter()
                .map(SearchEntry::into_dto)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_days_range() {
        assert_eq!(MetricsParam::parse(None, None, None).unwrap().days, 7);
        assert!(MetricsParam::parse(None, Some("0"), None).is_err());
        assert!(MetricsParam::parse(None, Some("366"), None).is_err());
        assert!(MetricsParam::parse(None, Some("abc"), None).is_err());

        let param = MetricsParam::parse(Some("searches"), Some("30"), Some("hour")).unwrap();
        assert_eq!(param.metric, Metric::Searches);
        assert_eq!(param.bucket, Bucket::Hour);
    }
}

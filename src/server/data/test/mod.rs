mod admin_audit;
mod api_event;
mod favorite_city;
mod search_history;
mod user;

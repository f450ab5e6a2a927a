pub const LEADER_LOCK_KEY: &str = "leader_lock";
pub const GATEWAY_SELECTION_KEY: &str = "gateway_status";
pub const PAYMENTS_BY_DATE_KEY: &str = "payments_by_date";

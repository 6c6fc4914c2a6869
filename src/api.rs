pub mod courses;
pub mod health_checks;
pub mod json_error;
pub mod lessons;
pub mod nullable;
pub mod pagination;
pub mod payments;
pub mod request_result;
pub mod subscriptions;
pub mod unique_constraint;
pub mod users;
pub mod validated_json;
pub mod view_param;

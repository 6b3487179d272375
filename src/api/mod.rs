pub(crate) mod auth;
pub(crate) mod courses;
pub(crate) mod dashboard;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod mentor;
pub(crate) mod notifications;
pub(crate) mod reports;
pub(crate) mod router;
pub(crate) mod users;
pub(crate) mod validation;

pub(crate) mod courses;
pub(crate) mod notifications;
pub(crate) mod options;
pub(crate) mod profiles;
pub(crate) mod progress;
pub(crate) mod reports;
pub(crate) mod users;
pub(crate) mod work_items;

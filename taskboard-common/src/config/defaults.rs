use crate::Secret;

pub(crate) const fn _default_true() -> bool {
    true
}

pub(crate) const fn _default_false() -> bool {
    false
}

#[inline]
pub(crate) fn _default_database_url() -> Secret<String> {
    Secret::new("sqlite:data/db".to_owned())
}

#[inline]
pub(crate) fn _default_http_listen() -> String {
    "0.0.0.0:8888".to_owned()
}

pub(crate) const fn _default_failure_threshold() -> u32 {
    3
}

#[inline]
pub(crate) fn _default_teacher_email() -> String {
    "teacher@example.com".to_owned()
}

#[inline]
pub(crate) fn _default_member_password() -> Secret<String> {
    Secret::new("password123".to_owned())
}

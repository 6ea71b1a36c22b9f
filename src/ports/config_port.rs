//! Configuration access port trait.

/// Sectioned key/value settings, as read from an INI file.
///
/// Numeric getters fall back to `default` when the key is missing or does not
/// parse; use [`crate::domain::config_validation`] to reject bad values first.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    fn has_key(&self, section: &str, key: &str) -> bool {
        self.get_string(section, key)
            .is_some_and(|v| !v.trim().is_empty())
    }
}

use std::fmt::Display;

/// Turns a failed external call into a logged fallback value.
pub trait ResultExt<T, E> {
    fn or_fallback(self, context: &str, fallback: T) -> T;

    fn or_fallback_with<F>(self, context: &str, fallback: F) -> T
    where
        F: FnOnce(&E) -> T;
}

impl<T, E: Display> ResultExt<T, E> for Result<T, E> {
    fn or_fallback(self, context: &str, fallback: T) -> T {
        self.or_fallback_with(context, |_| fallback)
    }

    fn or_fallback_with<F>(self, context: &str, fallback: F) -> T
    where
        F: FnOnce(&E) -> T,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "{context} failed, using fallback");
                fallback(&err)
            }
        }
    }
}

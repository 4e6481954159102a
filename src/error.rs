/// Conversion of a failed operation into absence.
///
/// Used where the contract of an operation is "no value" rather than an
/// error, while keeping the cause visible in the log.
pub trait ResultOkLogExt<T, E> {
    /// Logs the error at `error` level and returns `None`.
    fn ok_log(self) -> Option<T>;

    /// Logs the error at `warn` level, prefixed with `context`, and returns `None`.
    fn ok_warn(self, context: &str) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::error!("{err}");
                None
            }
        }
    }

    fn ok_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::warn!("{context}: {err}");
                None
            }
        }
    }
}

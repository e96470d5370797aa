// Logging is routed through these macros so that the 'log' crate is only a
// dependency when the 'logging' feature is enabled. Without it, every call
// compiles down to nothing and its arguments are never evaluated.

macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}

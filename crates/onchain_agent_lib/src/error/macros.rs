#[macro_export]
macro_rules! err_create {
    ($t:expr) => {
        $crate::error::AgentError::new($crate::error::ErrorBag::from($t), file!(), line!())
    };
}

#[macro_export]
macro_rules! err_custom_create {
    ($($t:tt)*) => {
        $crate::error::AgentError::new(
            $crate::error::ErrorBag::from($crate::error::CustomError::from_owned_string(format!($($t)*))),
            file!(),
            line!(),
        )
    };
}

#[macro_export]
macro_rules! err_from {
    () => {
        |e| $crate::error::AgentError::new($crate::error::ErrorBag::from(e), file!(), line!())
    };
}

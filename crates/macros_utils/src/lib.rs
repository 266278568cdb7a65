//! Small declarative helpers shared by the HTTP apps.

#[cfg(feature = "actix")]
#[doc(hidden)]
pub use actix_web as __actix_web;

/// Generate a `pub fn routes(cfg: &mut ServiceConfig)` for a module
///
/// Entries are either handlers generated by actix's route attributes
/// (`route name`) or child modules that expose their own `routes` function
/// (`mod name`), registered in the order given.
///
/// ```ignore
/// macros_utils::routes! {
///     mod health,
///     route list_watches,
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    ($($body:tt)*) => {
        pub fn routes(cfg: &mut $crate::__actix_web::web::ServiceConfig) {
            $crate::__register_routes!(cfg; $($body)*);
        }
    };
}

#[cfg(feature = "actix")]
#[doc(hidden)]
#[macro_export]
macro_rules! __register_routes {
    ($cfg:ident;) => {};
    ($cfg:ident; route $route:ident $(, $($rest:tt)*)?) => {
        $cfg.service($route);
        $crate::__register_routes!($cfg; $($($rest)*)?);
    };
    ($cfg:ident; mod $module:ident $(, $($rest:tt)*)?) => {
        $module::routes($cfg);
        $crate::__register_routes!($cfg; $($($rest)*)?);
    };
}

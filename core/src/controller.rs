/// Implemented by `#[docview_macros::controller]`; merges into the application router.
pub trait Controller {
    type State: Clone + Send + Sync + 'static;

    fn router() -> axum::Router<Self::State>;

    /// Lowercase `/{controller}` and `/{controller}/{action}` prefixes routed
    /// by convention. Request paths are matched against these case-insensitively.
    fn conventional_routes() -> &'static [&'static str] {
        &[]
    }
}

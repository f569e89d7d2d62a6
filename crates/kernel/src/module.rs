use async_trait::async_trait;
use axum::Router;

/// What a module sees while the application boots.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// A feature area of the shelf application (currently only `books`).
///
/// The registry drives `init` and `start` in registration order before the
/// server binds, and `stop` in reverse order after it shuts down.
#[async_trait]
pub trait Module: Sync + Send {
    /// Also the path segment: routes are nested under `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Load whatever the module needs before serving; an error aborts startup.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
    }

    /// `paths` and `components.schemas` to fold into the served OpenAPI document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release resources once the server has stopped accepting requests.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl Module for Bare {
        fn name(&self) -> &'static str {
            "bare"
        }
    }

    #[tokio::test]
    async fn defaults_do_nothing() {
        let settings = crate::settings::Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };
        let module = Bare;

        module.init(&ctx).await.unwrap();
        module.start(&ctx).await.unwrap();
        module.stop().await.unwrap();
        assert!(module.openapi().is_none());
    }
}

//! Health endpoints.

/// Liveness probe.
///
/// @swagger
/// /health:
///   get:
///     summary: Liveness probe
///     responses:
///       200:
///         description: Service is up
pub async fn health() -> &'static str {
    "ok"
}

pub struct Handlers;

impl Handlers {
    /**
     * @swagger
     * /ready:
     *   get:
     *     summary: Readiness probe
     */
    pub async fn ready(&self) -> &'static str {
        "ready"
    }
}

//! Liveness check

/// Returns "OK" while the service accepts connections
pub async fn health_check() -> &'static str {
	"OK"
}

//! Application configuration and constants

// === Server ===
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const HOST_ENV: &str = "EMBED_CLUSTER_HOST";
pub const PORT_ENV: &str = "EMBED_CLUSTER_PORT";

// === Deduplication ===
pub const DUPLICATE_THRESHOLD: f32 = 0.80;

// === UMAP ===
pub const UMAP_NEIGHBORS: usize = 15;
pub const UMAP_COMPONENTS: usize = 5;
pub const UMAP_MIN_DIST: f32 = 0.1;

// === HDBSCAN ===
pub const MIN_CLUSTER_SIZE: usize = 5;
pub const MIN_SAMPLES: usize = 2;
pub const CLUSTER_EPSILON: f64 = 0.2;

/// Bind host: EMBED_CLUSTER_HOST, else all interfaces
pub fn default_host() -> String {
	match std::env::var(HOST_ENV) {
		Ok(host) if !host.trim().is_empty() => {
			crate::ui::debug(&format!("Using {}: {}", HOST_ENV, host));
			host
		}
		_ => DEFAULT_HOST.to_string(),
	}
}

/// Bind port: EMBED_CLUSTER_PORT, else 5001
pub fn default_port() -> u16 {
	let Ok(raw) = std::env::var(PORT_ENV) else {
		return DEFAULT_PORT;
	};

	match raw.trim().parse() {
		Ok(port) => {
			crate::ui::debug(&format!("Using {}: {}", PORT_ENV, port));
			port
		}
		Err(_) => {
			crate::ui::warn(&format!(
				"Ignoring invalid {}='{}', using {}",
				PORT_ENV, raw, DEFAULT_PORT
			));
			DEFAULT_PORT
		}
	}
}

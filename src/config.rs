//! Client configuration: backend location and layout constants.

use crate::roadmap::Position;

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Where the roadmap backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self::new(option_env!("ROADMAP_API_URL").unwrap_or(DEFAULT_API_URL))
	}
}

impl ApiConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	/// Join an endpoint path onto the base URL.
	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}
}

/// Geometry used when placing children under their parent.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Horizontal distance between neighbouring siblings.
	pub horizontal_spacing: f64,
	/// Row gap below a depth-0 parent.
	pub vertical_spacing: f64,
	/// Row gap multiplier applied once per level of parent depth.
	pub growth_factor: f64,
	/// Where a freshly loaded root is placed.
	pub root_position: Position,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			horizontal_spacing: 250.0,
			vertical_spacing: 150.0,
			growth_factor: 1.2,
			root_position: Position::new(400.0, 50.0),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base_url_is_normalised() {
		let config = ApiConfig::new("https://api.example.com//");
		assert_eq!(config.base_url, "https://api.example.com");
		assert_eq!(
			config.url("/expand_knowledge_node/3"),
			"https://api.example.com/expand_knowledge_node/3"
		);
	}
}

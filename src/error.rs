use crate::roadmap::NodeId;

/// Failures talking to the roadmap backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	/// The request never produced a response.
	#[error("network error: {0}")]
	Transport(String),

	/// Non-2xx response; `detail` comes from the `{detail}` body when present.
	#[error("{detail} (HTTP {status})")]
	Status { status: u16, detail: String },

	/// Response body did not match the expected shape.
	#[error("unexpected response: {0}")]
	Decode(String),

	/// No signed-in session to authorize the request.
	#[error("not signed in")]
	Unauthenticated,
}

impl ApiError {
	/// The message shown to the user.
	pub fn message(&self) -> String {
		match self {
			ApiError::Status { detail, .. } => detail.clone(),
			other => other.to_string(),
		}
	}
}

impl From<reqwest::Error> for ApiError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_decode() {
			ApiError::Decode(err.to_string())
		} else {
			ApiError::Transport(err.to_string())
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum RoadmapError {
	#[error(transparent)]
	Api(#[from] ApiError),

	#[error("node {0} is not part of the open roadmap")]
	UnknownNode(NodeId),
}

impl RoadmapError {
	pub fn message(&self) -> String {
		match self {
			RoadmapError::Api(err) => err.message(),
			other => other.to_string(),
		}
	}
}

pub type Result<T> = std::result::Result<T, RoadmapError>;

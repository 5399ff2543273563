//! Signed-in user state.
//!
//! The login flow persists the session to `localStorage`; this app only
//! restores it from there and hands it explicitly to whatever talks to the
//! backend. Logging out clears it from both places.

use log::warn;
use web_sys::Storage;

const TOKEN_KEY: &str = "token";
const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
	pub token: String,
	pub user_id: String,
	pub username: Option<String>,
}

impl Session {
	/// Name to greet the user with.
	pub fn display_name(&self) -> &str {
		self.username.as_deref().unwrap_or(&self.user_id)
	}

	/// Restore the session saved by the last login, if any.
	pub fn load() -> Option<Self> {
		let storage = local_storage()?;
		let token = storage.get_item(TOKEN_KEY).ok().flatten()?;
		let user_id = storage.get_item(USER_ID_KEY).ok().flatten()?;
		if token.is_empty() || user_id.is_empty() {
			return None;
		}
		let username = storage.get_item(USERNAME_KEY).ok().flatten();
		Some(Self {
			token,
			user_id,
			username,
		})
	}

	/// Forget the persisted session.
	pub fn clear() {
		let Some(storage) = local_storage() else {
			return;
		};
		for key in [TOKEN_KEY, USER_ID_KEY, USERNAME_KEY] {
			if storage.remove_item(key).is_err() {
				warn!("could not forget session key {key}");
			}
		}
	}
}

fn local_storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_name_falls_back_to_user_id() {
		let session = Session {
			token: "tok".into(),
			user_id: "42".into(),
			username: None,
		};
		assert_eq!(session.display_name(), "42");

		let named = Session {
			username: Some("ada".into()),
			..session
		};
		assert_eq!(named.display_name(), "ada");
	}
}

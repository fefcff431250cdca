use crate::{Melodex, MelodexError, id::UserId};
use serde::{Deserialize, Serialize};
use serde_json::json;

const FRIEND: &str = "friend";
const ALL_FRIENDS: &str = const_format::formatcp!("{FRIEND}/getAllFriends");
const ADD_FRIEND: &str = const_format::formatcp!("{FRIEND}/addFriend");
const DELETE_FRIEND: &str = const_format::formatcp!("{FRIEND}/deleteFriend");
const USER_SEARCH: &str = "user/search";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInfo {
    #[serde(rename = "UserID", default)]
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: String,
}

impl UserInfo {
    /// The part of the email before `@`.
    pub fn handle(&self) -> &str {
        self.email.split('@').next().unwrap_or_default()
    }
}

/// One entry of the friend list. There is no pending/accepted distinction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Friend {
    pub friend_info: UserInfo,
}

impl Melodex {
    pub async fn friends(&self) -> Result<Vec<Friend>, MelodexError> {
        self.fetch_list(self.get(ALL_FRIENDS)?).await
    }

    pub async fn add_friend(&self, email: &str) -> Result<(), MelodexError> {
        self.execute(self.post(ADD_FRIEND)?.json(&json!({ "friendEmail": email })))
            .await
    }

    pub async fn delete_friend(&self, user: UserId) -> Result<(), MelodexError> {
        self.execute(self.post(DELETE_FRIEND)?.json(&json!({ "friendUserId": user })))
            .await
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<UserInfo>, MelodexError> {
        self.fetch_list(self.get(USER_SEARCH)?.query(&[("query", query)]))
            .await
    }
}

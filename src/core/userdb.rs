// User (callsign) database input consumed by the callsign DB encoder

use serde::{Deserialize, Serialize};

/// One registered DMR user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// DMR ID (24 bit)
    pub id: u32,
    /// Callsign
    pub call: String,
    /// Descriptive name: nickname, city, state, country
    pub name: String,
}

/// An ID-sorted list of registered users, typically sourced from a
/// public registry export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDatabase {
    users: Vec<User>,
}

impl UserDatabase {
    /// Build a database from arbitrary-order users; sorts ascending by ID
    pub fn new(mut users: Vec<User>) -> Self {
        users.sort_by_key(|u| u.id);
        Self { users }
    }

    /// The users, ascending by ID
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Binary search for a user by DMR ID
    pub fn find(&self, id: u32) -> Option<&User> {
        self.users
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(|i| &self.users[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u32, call: &str) -> User {
        User {
            id,
            call: call.to_string(),
            name: String::new(),
        }
    }

    #[test]
    fn test_sorted_on_construction() {
        let db = UserDatabase::new(vec![
            user(2623001, "DM3MAT"),
            user(262999, "DL1ABC"),
            user(3100001, "W1AW"),
        ]);
        let ids: Vec<u32> = db.users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![262999, 2623001, 3100001]);
    }

    #[test]
    fn test_find() {
        let db = UserDatabase::new(vec![user(100, "A"), user(200, "B")]);
        assert_eq!(db.find(200).unwrap().call, "B");
        assert!(db.find(150).is_none());
    }
}

/// The ordered set of usernames a submission covers.
///
/// Iteration order is insertion order, and the payload follows it. The set
/// can never be emptied: the last remaining traveler cannot be deselected.
#[derive(Debug, Clone)]
pub struct Selection {
    usernames: Vec<String>,
}

impl Selection {
    pub fn new(initial: &str) -> Self {
        Self {
            usernames: vec![initial.to_string()],
        }
    }

    /// Adds the username if absent, removes it otherwise. Returns whether the
    /// username is selected afterwards. Deselecting the sole remaining
    /// traveler is a no-op.
    pub fn toggle(&mut self, username: &str) -> bool {
        if let Some(position) = self.position(username) {
            if self.usernames.len() > 1 {
                self.usernames.remove(position);
                return false;
            }

            return true;
        }

        self.usernames.push(username.to_string());
        true
    }

    pub fn contains(&self, username: &str) -> bool {
        self.position(username).is_some()
    }

    /// The index of the username in iteration order, if selected
    pub fn position(&self, username: &str) -> Option<usize> {
        self.usernames.iter().position(|u| u == username)
    }

    pub fn first(&self) -> &str {
        self.usernames
            .first()
            .map(|u| u.as_str())
            .expect("selection is never empty")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.usernames.iter().map(|u| u.as_str())
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }
}

/// Key of a private conversation: the two member usernames in ascending order.
///
/// `new` is the only constructor, so `PairKey::new(a, b) == PairKey::new(b, a)`
/// holds for every pair and both directions of a chat share one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: String,
    high: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }

    /// The member that is not `user`, or `user` itself for a self-chat.
    /// `None` if `user` is not a member.
    pub fn other(&self, user: &str) -> Option<&str> {
        if self.low == user {
            Some(&self.high)
        } else if self.high == user {
            Some(&self.low)
        } else {
            None
        }
    }
}

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ItemId = i64;
pub type RatingValue = f64;

/// A single user rating; identity is the (user, item) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub value: RatingValue,
}

impl Rating {
    pub fn new(user_id: UserId, item_id: ItemId, value: RatingValue) -> Self {
        Self {
            user_id,
            item_id,
            value,
        }
    }
}

/// Predicted preference of a user for an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub prediction: RatingValue,
}

impl Recommendation {
    pub fn new(item_id: ItemId, prediction: RatingValue) -> Self {
        Self {
            item_id,
            prediction,
        }
    }
}

/// Unordered pair of users, stored with the lower id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserPair {
    pub first: UserId,
    pub second: UserId,
}

impl UserPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_pair_is_unordered() {
        assert_eq!(UserPair::new(5, 2), UserPair::new(2, 5));
        assert_eq!(UserPair::new(5, 2).first, 2);
        assert_eq!(UserPair::new(3, 3).second, 3);
    }
}

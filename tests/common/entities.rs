use uuid::Uuid;

/// Row of the `users` table used by the PostgreSQL tests
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Row of the `orders` table; `user_id` references `users(id)`
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_name: String,
    pub amount: i64,
}

impl Order {
    pub fn for_user(user: &User, product_name: impl Into<String>, amount: i64) -> Self {
        Self::new(user.id, product_name, amount)
    }

    pub fn new(user_id: Uuid, product_name: impl Into<String>, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            product_name: product_name.into(),
            amount,
        }
    }
}

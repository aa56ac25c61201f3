//! The signed-in user's profile (`/users/me`)

use std::sync::RwLock;

use log::info;

use crate::api::ApiClient;
use crate::error::{BudgetwiseError, BudgetwiseResult};
use crate::models::{User, UserUpdate};

const PATH: &str = "/users/me";

pub struct UserResource {
    api: ApiClient,
    cached: RwLock<Option<User>>,
}

impl UserResource {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cached: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> BudgetwiseResult<User> {
        if let Some(user) = self.read_cache()? {
            return Ok(user);
        }
        let user: User = self.api.get_json(PATH).await?;
        self.write_cache(Some(user.clone()))?;
        Ok(user)
    }

    pub async fn update(&self, update: &UserUpdate) -> BudgetwiseResult<User> {
        if let Some(email) = &update.email {
            if !email.contains('@') {
                return Err(BudgetwiseError::Validation(format!(
                    "Not an email address: {}",
                    email
                )));
            }
        }

        let user: User = self.api.put_json(PATH, update).await?;
        self.write_cache(None)?;
        info!("Updated profile for {}", user.email);
        Ok(user)
    }

    fn read_cache(&self) -> BudgetwiseResult<Option<User>> {
        let cached = self
            .cached
            .read()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(cached.clone())
    }

    fn write_cache(&self, user: Option<User>) -> BudgetwiseResult<()> {
        let mut cached = self
            .cached
            .write()
            .map_err(|e| BudgetwiseError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *cached = user;
        Ok(())
    }
}

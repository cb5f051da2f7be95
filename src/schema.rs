use crate::error::ApiError;

// Struct representing the request body for registering a new user
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateUserSchema {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: String,
    pub phone_number: String,
}

// Form body for the token endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LoginSchema {
    pub username: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TokenSchema {
    pub access_token: String,
    pub token_type: String,
}

// Struct representing the request body for creating or replacing a Todo
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct TodoRequestSchema {
    pub title: String,
    pub description: String,
    pub priority: i32,
    pub complete: bool,
}

impl TodoRequestSchema {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.chars().count() < 3 {
            return Err(ApiError::Validation(
                "title must be at least 3 characters".to_string(),
            ));
        }
        let description_len = self.description.chars().count();
        if !(3..=100).contains(&description_len) {
            return Err(ApiError::Validation(
                "description must be between 3 and 100 characters".to_string(),
            ));
        }
        if !(1..=6).contains(&self.priority) {
            return Err(ApiError::Validation(
                "priority must be between 1 and 6".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ChangePasswordSchema {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordSchema {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.new_password.chars().count() < 8 {
            return Err(ApiError::Validation(
                "new_password must be at least 8 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct UpdatePhoneNumberSchema {
    pub phone_number: String,
}

impl UpdatePhoneNumberSchema {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.phone_number.chars().count() > 20 {
            return Err(ApiError::Validation(
                "phone_number must be at most 20 characters".to_string(),
            ));
        }
        Ok(())
    }
}

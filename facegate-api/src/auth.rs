use serde::{Serialize, Deserialize};

use crate::{Validator, ApiError, Detail};
use crate::error::GeneralKind;

#[derive(Debug, Serialize, Deserialize)]
pub struct FederatedLogin {
    pub token: String,
}

impl Validator for FederatedLogin {
    fn validate(&self) -> Result<(), ApiError> {
        if self.token.is_empty() {
            Err(ApiError::from((
                GeneralKind::MissingData,
                Detail::with_key("token")
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailRegister {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Validator for EmailRegister {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !facegate_lib::users::name_valid(&self.name) {
            invalid.push("name");
        }

        if !facegate_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if !facegate_lib::sec::authn::password_valid(&self.password) {
            invalid.push("password");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailOtpVerify {
    pub email: String,
    pub otp: String,
}

impl Validator for EmailOtpVerify {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !facegate_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if !facegate_lib::sec::authn::otp_valid(&self.otp) {
            invalid.push("otp");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailLogin {
    pub email: String,
    pub password: String,
}

impl Validator for EmailLogin {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !facegate_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if self.password.is_empty() {
            invalid.push("password");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhoneOtpRequest {
    pub phone: String,
    pub email: String,
}

impl Validator for PhoneOtpRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !facegate_lib::users::phone_valid(&self.phone) {
            invalid.push("phone");
        }

        if !facegate_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhoneOtpVerify {
    pub phone: String,
    pub code: String,
}

impl Validator for PhoneOtpVerify {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !facegate_lib::users::phone_valid(&self.phone) {
            invalid.push("phone");
        }

        if self.code.is_empty() {
            invalid.push("code");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhoneRegister {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub code: String,
}

impl Validator for PhoneRegister {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !facegate_lib::users::name_valid(&self.name) {
            invalid.push("name");
        }

        if !facegate_lib::users::phone_valid(&self.phone) {
            invalid.push("phone");
        }

        if !facegate_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if self.code.is_empty() {
            invalid.push("code");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhoneLogin {
    pub phone: String,
    pub email: String,
}

impl Validator for PhoneLogin {
    fn validate(&self) -> Result<(), ApiError> {
        let mut invalid = Vec::new();

        if !facegate_lib::users::phone_valid(&self.phone) {
            invalid.push("phone");
        }

        if !facegate_lib::users::email_valid(&self.email) {
            invalid.push("email");
        }

        if !invalid.is_empty() {
            Err(ApiError::from((
                GeneralKind::ValidationFailed,
                Detail::mult_keys(invalid)
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn email_register_validation() {
        let valid = EmailRegister {
            name: String::from("Person"),
            email: String::from("person@example.com"),
            password: String::from("long enough password"),
        };

        assert!(valid.validate().is_ok());

        let invalid = EmailRegister {
            name: String::new(),
            email: String::from("nope"),
            password: String::from("short"),
        };

        assert!(invalid.validate().is_err());
    }

    #[test]
    fn phone_register_validation() {
        let valid = PhoneRegister {
            name: String::from("Person"),
            phone: String::from("+14155550123"),
            email: String::from("person@example.com"),
            code: String::from("1234"),
        };

        assert!(valid.validate().is_ok());

        let invalid = PhoneRegister {
            name: String::from("Person"),
            phone: String::from("call-me"),
            email: String::from("person@example.com"),
            code: String::new(),
        };

        assert!(invalid.validate().is_err());
    }
}

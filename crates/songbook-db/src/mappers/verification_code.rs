//! Verification code entity <-> model mapper

use songbook_core::entities::VerificationCode;
use songbook_core::value_objects::VerificationCodeId;

use crate::models::VerificationCodeModel;

impl From<VerificationCodeModel> for VerificationCode {
    fn from(model: VerificationCodeModel) -> Self {
        VerificationCode {
            id: VerificationCodeId::from_uuid(model.id),
            email: model.email,
            code: model.code,
            expires_at: model.expires_at,
            used: model.used,
            created_at: model.created_at,
        }
    }
}

//! QR and barcode generation.
//!
//! Both codes are derived from a fresh UUID v4. Uniqueness is enforced by the
//! store; a collision is reported back as `ErrorCode::CodeCollision` and the
//! caller draws again.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const QR_PREFIX: &str = "TK";
const BAR_CODE_PREFIX: &str = "BC";
const QR_HEX_LEN: usize = 16;
const BAR_CODE_DIGITS: usize = 20;

/// The pair of scannable codes printed on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCodes {
    pub qr_code: String,
    pub bar_code: String,
}

impl TicketCodes {
    /// Draws a new random pair.
    pub fn generate() -> Self {
        Self::from_uuids(Uuid::new_v4(), Uuid::new_v4())
    }

    fn from_uuids(qr_seed: Uuid, bar_seed: Uuid) -> Self {
        let hex = qr_seed.simple().to_string().to_uppercase();
        let qr_code = format!("{}{}", QR_PREFIX, &hex[..QR_HEX_LEN]);

        let digits = format!("{:0width$}", bar_seed.as_u128(), width = BAR_CODE_DIGITS);
        let bar_code = format!(
            "{}{}",
            BAR_CODE_PREFIX,
            &digits[digits.len() - BAR_CODE_DIGITS..]
        );

        Self { qr_code, bar_code }
    }
}

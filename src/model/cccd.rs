use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use utoipa::ToSchema;

/// Fields read off the front of a CCCD card. Keys keep their Vietnamese names.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CccdDataDto {
    #[serde(default)]
    pub so_cccd: Option<String>,
    #[serde(default)]
    pub ho_va_ten: Option<String>,
    /// `DD/MM/YYYY`.
    #[serde(default)]
    pub ngay_sinh: Option<String>,
    #[serde(default)]
    pub gioi_tinh: Option<String>,
    #[serde(default)]
    pub quoc_tich: Option<String>,
    #[serde(default)]
    pub que_quan: Option<String>,
    #[serde(default)]
    pub noi_thuong_tru: Option<String>,
    #[serde(default)]
    pub ngay_het_han: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct CccdExtractResponseDto {
    pub success: bool,
    pub extracted: CccdDataDto,
    /// Whether an account is already registered with this CCCD number.
    pub exists: bool,
}

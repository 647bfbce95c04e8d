use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::AppError;

/// Fine-grained lifecycle state of a bovine.
///
/// The vocabulary is fixed; the database keeps the reference spelling of each value.
#[derive(diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[ExistingTypePath = "crate::schema::sql_types::BovineStatus"]
#[serde(try_from = "String", into = "String")]
pub enum BovineStatus {
    /// Nursing calf
    #[db_rename = "Mamando"]
    Mamando,
    /// Weaned calf
    #[db_rename = "Destetado"]
    Destetado,
    /// Pregnant cow
    #[db_rename = "Preñada"]
    Prenada,
    /// Cow that is not pregnant
    #[db_rename = "Sin preñez"]
    SinPrenez,
    /// Bull in service
    #[db_rename = "En servicio"]
    EnServicio,
    /// Bull out of service
    #[db_rename = "Fuera de servicio"]
    FueraDeServicio,
    #[db_rename = "Muerto"]
    Muerto,
    #[db_rename = "Vendido"]
    Vendido,
}

impl BovineStatus {
    pub const ALL: [BovineStatus; 8] = [
        BovineStatus::Mamando,
        BovineStatus::Destetado,
        BovineStatus::Prenada,
        BovineStatus::SinPrenez,
        BovineStatus::EnServicio,
        BovineStatus::FueraDeServicio,
        BovineStatus::Muerto,
        BovineStatus::Vendido,
    ];

    /// Reference spelling of the status.
    pub fn display_name(&self) -> &'static str {
        match self {
            BovineStatus::Mamando => "Mamando",
            BovineStatus::Destetado => "Destetado",
            BovineStatus::Prenada => "Preñada",
            BovineStatus::SinPrenez => "Sin preñez",
            BovineStatus::EnServicio => "En servicio",
            BovineStatus::FueraDeServicio => "Fuera de servicio",
            BovineStatus::Muerto => "Muerto",
            BovineStatus::Vendido => "Vendido",
        }
    }

    /// Dead and sold animals leave the herd for good.
    pub fn is_final(&self) -> bool {
        matches!(self, BovineStatus::Muerto | BovineStatus::Vendido)
    }
}

impl fmt::Display for BovineStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for BovineStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        BovineStatus::ALL
            .into_iter()
            .find(|status| status.display_name().to_lowercase() == wanted)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown status: {}", s)))
    }
}

impl TryFrom<String> for BovineStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BovineStatus> for String {
    fn from(status: BovineStatus) -> Self {
        status.display_name().to_string()
    }
}
